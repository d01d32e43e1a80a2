//! Startup resolution and loading of the model and scaler artifacts.

use std::path::{Path, PathBuf};

use gluco_core::error::{Error, Result};
use gluco_model::{Forecaster, MinMaxScaler, ModelConfig, OnnxModel};

use crate::config::ArtifactConfig;

/// Absolute locations of the two required artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// Trained model
    pub model: PathBuf,
    /// Fitted scaler
    pub scaler: PathBuf,
}

impl ArtifactPaths {
    /// Resolve configured file names against the artifact directory.
    ///
    /// Without a configured directory, the running executable's directory is used.
    pub fn resolve(config: &ArtifactConfig) -> Result<Self> {
        let base = match &config.dir {
            Some(dir) => dir.clone(),
            None => install_dir()?,
        };
        Ok(Self::resolve_in(&base, config))
    }

    fn resolve_in(base: &Path, config: &ArtifactConfig) -> Self {
        Self {
            model: base.join(&config.model_file),
            scaler: base.join(&config.scaler_file),
        }
    }

    /// Fail on the first artifact that does not exist
    pub fn ensure_present(&self) -> Result<()> {
        for path in [&self.model, &self.scaler] {
            if !path.is_file() {
                return Err(Error::ArtifactNotFound(path.clone()));
            }
        }
        Ok(())
    }
}

fn install_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| Error::ConfigError(format!("{} has no parent directory", exe.display())))
}

/// Load both artifacts and build the shared forecaster
pub fn load_forecaster(paths: &ArtifactPaths) -> Result<Forecaster> {
    paths.ensure_present()?;

    let model = OnnxModel::load(&paths.model, ModelConfig::default())?;
    let scaler = MinMaxScaler::load(&paths.scaler)?;
    tracing::info!(
        model = %paths.model.display(),
        scaler = %paths.scaler.display(),
        "Artifacts loaded"
    );

    Forecaster::new(scaler, Box::new(model))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_and_absolute() {
        let config = ArtifactConfig {
            dir: Some(PathBuf::from("/srv/glucocast")),
            model_file: PathBuf::from("glucose_model.onnx"),
            scaler_file: PathBuf::from("/etc/glucocast/scaler.json"),
        };
        let paths = ArtifactPaths::resolve(&config).unwrap();

        assert_eq!(paths.model, PathBuf::from("/srv/glucocast/glucose_model.onnx"));
        assert_eq!(paths.scaler, PathBuf::from("/etc/glucocast/scaler.json"));
    }

    #[test]
    fn test_resolve_defaults_to_install_dir() {
        let paths = ArtifactPaths::resolve(&ArtifactConfig::default()).unwrap();
        let exe_dir = std::env::current_exe().unwrap().parent().unwrap().to_path_buf();
        assert_eq!(paths.model, exe_dir.join("glucose_model.onnx"));
    }

    #[test]
    fn test_missing_model_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("scaler.json"), "{}").unwrap();
        let paths = ArtifactPaths::resolve_in(dir.path(), &ArtifactConfig::default());

        let err = load_forecaster(&paths).unwrap_err();
        assert!(matches!(err, Error::ArtifactNotFound(ref p) if *p == paths.model));
    }

    #[test]
    fn test_missing_scaler_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("glucose_model.onnx"), b"onnx").unwrap();
        let paths = ArtifactPaths::resolve_in(dir.path(), &ArtifactConfig::default());

        let err = load_forecaster(&paths).unwrap_err();
        assert!(matches!(err, Error::ArtifactNotFound(ref p) if *p == paths.scaler));
    }
}
