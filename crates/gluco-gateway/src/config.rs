//! Application configuration.

use std::path::{Path, PathBuf};

use gluco_core::constants::{DEFAULT_HOST, DEFAULT_MODEL_FILE, DEFAULT_PORT, DEFAULT_SCALER_FILE};
use gluco_core::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Environment variable naming a configuration file
pub const CONFIG_ENV: &str = "GLUCOCAST_CONFIG";

/// Environment variable overriding the listen port
pub const PORT_ENV: &str = "PORT";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application name
    pub name: String,
    /// Log level
    pub log_level: String,
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Model artifact locations
    pub artifacts: ArtifactConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "glucocast".to_string(),
            log_level: "info".to_string(),
            server: ServerConfig::default(),
            artifacts: ArtifactConfig::default(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub host: String,
    /// Listen port
    pub port: u16,
    /// Worker threads (framework default when unset)
    pub workers: Option<usize>,
    /// Value of `Access-Control-Allow-Origin`; CORS headers are omitted when empty
    pub cors_allow_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            workers: None,
            cors_allow_origin: "*".to_string(),
        }
    }
}

/// Model artifact locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    /// Directory holding the artifacts (executable's directory when unset)
    pub dir: Option<PathBuf>,
    /// Model file, relative to `dir` unless absolute
    pub model_file: PathBuf,
    /// Scaler file, relative to `dir` unless absolute
    pub scaler_file: PathBuf,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            dir: None,
            model_file: PathBuf::from(DEFAULT_MODEL_FILE),
            scaler_file: PathBuf::from(DEFAULT_SCALER_FILE),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content).map_err(|e| Error::ConfigError(format!("{}: {e}", path.display())))
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ConfigError(e.to_string()))
    }

    /// Apply environment overrides on top of file values
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_port_override(std::env::var(PORT_ENV).ok().as_deref())
    }

    fn apply_port_override(&mut self, port: Option<&str>) -> Result<()> {
        if let Some(raw) = port {
            self.server.port = raw.trim().parse().map_err(|_| {
                Error::ConfigError(format!("{PORT_ENV} must be a port number, got '{raw}'"))
            })?;
        }
        Ok(())
    }

    /// Allowed CORS origin, if CORS is enabled
    #[must_use]
    pub fn cors_origin(&self) -> Option<String> {
        Some(self.server.cors_allow_origin.clone()).filter(|origin| !origin.is_empty())
    }

    /// Address to bind
    #[must_use]
    pub fn bind_addr(&self) -> (String, u16) {
        (self.server.host.clone(), self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.bind_addr(), ("0.0.0.0".to_string(), 5000));
        assert_eq!(config.artifacts.model_file, PathBuf::from("glucose_model.onnx"));
        assert_eq!(config.artifacts.scaler_file, PathBuf::from("scaler.json"));
        assert!(config.artifacts.dir.is_none());
        assert_eq!(config.cors_origin().as_deref(), Some("*"));
    }

    #[test]
    fn test_parse_partial_file() {
        let config = AppConfig::parse(
            r#"
            log_level = "debug"

            [server]
            port = 8080

            [artifacts]
            dir = "/opt/glucocast"
            "#,
        )
        .unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.artifacts.dir, Some(PathBuf::from("/opt/glucocast")));
        assert_eq!(config.artifacts.scaler_file, PathBuf::from("scaler.json"));
    }

    #[test]
    fn test_empty_origin_disables_cors() {
        let config = AppConfig::parse("[server]\ncors_allow_origin = \"\"").unwrap();
        assert!(config.cors_origin().is_none());
    }

    #[test]
    fn test_parse_invalid() {
        let err = AppConfig::parse("[server]\nport = \"high\"").unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("glucocast.toml");
        std::fs::write(&path, "name = \"clinic-a\"\n[server]\nhost = \"127.0.0.1\"\n").unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.name, "clinic-a");
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_port_override() {
        let mut config = AppConfig::default();
        config.apply_port_override(Some("7000")).unwrap();
        assert_eq!(config.server.port, 7000);

        config.apply_port_override(None).unwrap();
        assert_eq!(config.server.port, 7000);

        let err = config.apply_port_override(Some("not-a-port")).unwrap_err();
        assert!(err.to_string().contains("PORT"));
        assert_eq!(config.server.port, 7000);
    }
}
