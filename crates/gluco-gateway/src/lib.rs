//! # gluco-gateway
//!
//! HTTP surface and process wiring for the glucocast forecasting service.
//!
//! This crate provides:
//! - Configuration management (file, environment, CLI)
//! - Startup resolution and loading of the model and scaler artifacts
//! - The `/predict` endpoint and the static frontend

#![warn(missing_docs, rust_2018_idioms, clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod api;
pub mod artifacts;
pub mod config;
pub mod server;

pub use artifacts::{load_forecaster, ArtifactPaths};
pub use config::AppConfig;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::artifacts::{load_forecaster, ArtifactPaths};
    pub use crate::config::AppConfig;
}
