//! Model output in the original measurement scale.

use serde::Serialize;

/// Predicted future readings, in chronological order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Forecast {
    values: Vec<f64>,
}

impl Forecast {
    /// Wrap predicted values
    #[must_use]
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Predicted values
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of predicted steps
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the forecast holds no values
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Index of the first value that is NaN or infinite, if any
    #[must_use]
    pub fn first_non_finite(&self) -> Option<usize> {
        self.values.iter().position(|v| !v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forecast_serializes_as_list() {
        let forecast = Forecast::new(vec![101.5, 99.25]);
        assert_eq!(serde_json::to_string(&forecast).unwrap(), "[101.5,99.25]");
    }

    #[test]
    fn test_first_non_finite() {
        assert_eq!(Forecast::new(vec![1.0, 2.0]).first_non_finite(), None);
        assert_eq!(
            Forecast::new(vec![1.0, f64::NAN, f64::INFINITY]).first_non_finite(),
            Some(1)
        );
    }
}
