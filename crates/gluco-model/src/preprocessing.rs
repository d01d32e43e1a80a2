//! Feature construction for the sequence model.

use gluco_core::constants::{FORECAST_HORIZON, NUM_FEATURES, WINDOW_LEN};
use gluco_core::error::{Error, Result};
use gluco_core::types::{Forecast, ReadingWindow};
use ndarray::{s, Array2, Array3};
use serde::{Deserialize, Serialize};

use crate::scaler::MinMaxScaler;

/// Layout of the readings inside the padded feature matrix.
///
/// This is part of the artifact contract: the scaler and model were fitted on
/// exactly one layout and silently produce garbage on any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaddingScheme {
    /// A `WINDOW_LEN x NUM_FEATURES` matrix where every time step holds the
    /// full reading window in its leading columns and zeros elsewhere
    #[default]
    PerTimeStep,
}

/// Turns a reading window into model input and model output into a forecast
#[derive(Debug, Clone)]
pub struct FeaturePreprocessor {
    /// Fitted scaler
    scaler: MinMaxScaler,
    /// Time steps per sample
    sequence_length: usize,
    /// Features per time step
    num_features: usize,
    /// Values kept from the inverse-transformed output row
    horizon: usize,
}

impl FeaturePreprocessor {
    /// Create a preprocessor around a fitted scaler.
    ///
    /// Fails when the scaler was not fitted on `NUM_FEATURES` features.
    pub fn new(scaler: MinMaxScaler) -> Result<Self> {
        if scaler.n_features() != NUM_FEATURES {
            return Err(Error::ShapeMismatch {
                expected: format!("scaler with {NUM_FEATURES} features"),
                actual: format!("scaler with {} features", scaler.n_features()),
            });
        }

        Ok(Self {
            scaler,
            sequence_length: WINDOW_LEN,
            num_features: NUM_FEATURES,
            horizon: FORECAST_HORIZON,
        })
    }

    /// Zero-padded feature matrix, one row per time step.
    ///
    /// Readings are rounded to f32 before being widened back for scaling;
    /// the scaler was fitted against single-precision inputs.
    #[must_use]
    pub fn pad(&self, window: &ReadingWindow) -> Array2<f64> {
        let readings: Vec<f64> = window
            .as_slice()
            .iter()
            .map(|&v| f64::from(v as f32))
            .collect();
        let mut padded = Array2::<f64>::zeros((self.sequence_length, self.num_features));

        for mut row in padded.rows_mut() {
            for (dst, &src) in row.iter_mut().zip(&readings) {
                *dst = src;
            }
        }

        padded
    }

    /// Padded, scaled, and reshaped input of shape `(1, sequence, features)`
    pub fn to_model_input(&self, window: &ReadingWindow) -> Result<Array3<f32>> {
        let mut features = self.pad(window);
        self.scaler.transform(&mut features)?;

        let shape = self.input_shape();
        features
            .mapv(|v| v as f32)
            .into_shape(shape)
            .map_err(|e| Error::Internal(format!("reshape to {shape:?} failed: {e}")))
    }

    /// Inverse-transform raw model output and keep the leading values of row 0
    pub fn to_forecast(&self, raw: &Array2<f32>) -> Result<Forecast> {
        if raw.nrows() == 0 || raw.ncols() != self.num_features {
            return Err(Error::ShapeMismatch {
                expected: format!("(n, {})", self.num_features),
                actual: format!("{:?}", raw.shape()),
            });
        }

        let mut output = raw.mapv(f64::from);
        self.scaler.inverse_transform(&mut output)?;

        Ok(Forecast::new(output.slice(s![0, ..self.horizon]).to_vec()))
    }

    /// Expected model input shape `(batch, sequence, features)`
    #[must_use]
    pub fn input_shape(&self) -> (usize, usize, usize) {
        (1, self.sequence_length, self.num_features)
    }

    /// The fitted scaler
    #[must_use]
    pub fn scaler(&self) -> &MinMaxScaler {
        &self.scaler
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> ReadingWindow {
        ReadingWindow::new(vec![
            100.0, 102.0, 105.0, 107.0, 110.0, 108.0, 106.0, 104.0, 103.0, 101.0,
        ])
        .unwrap()
    }

    fn preprocessor() -> FeaturePreprocessor {
        let scaler = MinMaxScaler::from_bounds(
            vec![40.0; NUM_FEATURES],
            vec![400.0; NUM_FEATURES],
            (0.0, 1.0),
        )
        .unwrap();
        FeaturePreprocessor::new(scaler).unwrap()
    }

    #[test]
    fn test_rejects_scaler_of_wrong_width() {
        let scaler = MinMaxScaler::from_bounds(vec![0.0; 10], vec![1.0; 10], (0.0, 1.0)).unwrap();
        let err = FeaturePreprocessor::new(scaler).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn test_pad_repeats_window_on_every_step() {
        let prep = preprocessor();
        let padded = prep.pad(&window());

        assert_eq!(padded.dim(), (WINDOW_LEN, NUM_FEATURES));
        for row in padded.rows() {
            assert_eq!(row.slice(s![..WINDOW_LEN]).to_vec(), window().as_slice());
            assert!(row.slice(s![WINDOW_LEN..]).iter().all(|&v| v == 0.0));
        }
    }

    #[test]
    fn test_readings_rounded_to_single_precision() {
        let prep = preprocessor();
        let mut values = window().as_slice().to_vec();
        values[0] = 40.0173;
        let window = ReadingWindow::new(values).unwrap();

        let padded = prep.pad(&window);
        assert_eq!(padded[[0, 0]], f64::from(40.0173_f32));
        assert_ne!(padded[[0, 0]], 40.0173);

        let input = prep.to_model_input(&window).unwrap();
        let scale = 1.0 / 360.0;
        let expected = (f64::from(40.0173_f32) * scale + (0.0 - 40.0 * scale)) as f32;
        assert_eq!(input[[0, 0, 0]], expected);
    }

    #[test]
    fn test_model_input_shape_and_scaling() {
        let prep = preprocessor();
        let input = prep.to_model_input(&window()).unwrap();

        assert_eq!(input.dim(), (1, WINDOW_LEN, NUM_FEATURES));
        // (100 - 40) / 360
        assert!((input[[0, 3, 0]] - 60.0 / 360.0).abs() < 1e-6);
        // zero padding scaled by the fitted bounds
        assert!((input[[0, 0, 50]] - (-40.0 / 360.0)).abs() < 1e-6);
    }

    #[test]
    fn test_forecast_takes_leading_values_of_first_row() {
        let prep = preprocessor();
        let mut raw = Array2::<f32>::zeros((2, NUM_FEATURES));
        for (i, v) in raw.row_mut(0).iter_mut().enumerate() {
            *v = i as f32 / 100.0;
        }
        raw.row_mut(1).fill(1.0);

        let forecast = prep.to_forecast(&raw).unwrap();
        assert_eq!(forecast.len(), FORECAST_HORIZON);
        assert!((forecast.values()[0] - 40.0).abs() < 1e-4);
        assert!((forecast.values()[5] - (40.0 + 0.05 * 360.0)).abs() < 1e-3);
    }

    #[test]
    fn test_forecast_rejects_wrong_width() {
        let prep = preprocessor();
        let err = prep.to_forecast(&Array2::zeros((1, 10))).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
        assert!(prep.to_forecast(&Array2::zeros((0, NUM_FEATURES))).is_err());
    }
}
