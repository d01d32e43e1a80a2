//! # gluco-model
//!
//! Feature construction, scaling, and sequence model inference for glucose
//! forecasting.
//!
//! This crate provides:
//! - Loading of the fitted min-max scaler artifact
//! - Zero-padding of a reading window into the model's feature layout
//! - ONNX model loading and inference via `ort` (feature `onnx`)
//! - The `Forecaster` pipeline tying them together
//!
//! ## Example
//!
//! ```rust,ignore
//! use gluco_model::{Forecaster, MinMaxScaler, ModelConfig, OnnxModel};
//!
//! let scaler = MinMaxScaler::load("scaler.json")?;
//! let model = OnnxModel::load("glucose_model.onnx", ModelConfig::default())?;
//! let forecaster = Forecaster::new(scaler, Box::new(model))?;
//! let forecast = forecaster.forecast(&window)?;
//! ```

#![warn(missing_docs, rust_2018_idioms, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::cast_possible_truncation)]

pub mod forecaster;
pub mod inference;
pub mod preprocessing;
pub mod scaler;

pub use forecaster::Forecaster;
pub use inference::{InferenceStats, ModelConfig, OnnxModel, SequenceModel};
pub use preprocessing::{FeaturePreprocessor, PaddingScheme};
pub use scaler::{MinMaxScaler, ScalerArtifact};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::forecaster::Forecaster;
    pub use crate::inference::{ModelConfig, OnnxModel, SequenceModel};
    pub use crate::preprocessing::FeaturePreprocessor;
    pub use crate::scaler::MinMaxScaler;
}
