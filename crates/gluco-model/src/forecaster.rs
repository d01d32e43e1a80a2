//! End-to-end prediction pipeline.

use gluco_core::error::{Error, Result};
use gluco_core::types::{Forecast, ReadingWindow};

use crate::inference::{timed_forward, InferenceStats, SequenceModel};
use crate::preprocessing::FeaturePreprocessor;
use crate::scaler::MinMaxScaler;

/// Loaded artifacts plus the steps that connect them.
///
/// Built once at startup and shared read-only by every request.
pub struct Forecaster {
    preprocessor: FeaturePreprocessor,
    model: Box<dyn SequenceModel>,
    stats: InferenceStats,
}

impl std::fmt::Debug for Forecaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Forecaster")
            .field("model", &self.model.name())
            .field("features", &self.preprocessor.scaler().n_features())
            .field("inferences", &self.stats.count())
            .finish()
    }
}

impl Forecaster {
    /// Pair a fitted scaler with a loaded model
    pub fn new(scaler: MinMaxScaler, model: Box<dyn SequenceModel>) -> Result<Self> {
        Ok(Self {
            preprocessor: FeaturePreprocessor::new(scaler)?,
            model,
            stats: InferenceStats::default(),
        })
    }

    /// Predict the readings that follow `window`
    pub fn forecast(&self, window: &ReadingWindow) -> Result<Forecast> {
        let input = self.preprocessor.to_model_input(window)?;
        let raw = timed_forward(self.model.as_ref(), &self.stats, &input)?;
        let forecast = self.preprocessor.to_forecast(&raw)?;

        if let Some(idx) = forecast.first_non_finite() {
            return Err(Error::ModelError(format!(
                "model produced a non-finite value at step {idx}"
            )));
        }

        Ok(forecast)
    }

    /// Name of the loaded model
    #[must_use]
    pub fn model_name(&self) -> &str {
        self.model.name()
    }
}
