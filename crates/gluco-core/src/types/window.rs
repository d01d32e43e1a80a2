//! Client-supplied reading sequence.

use std::ops::Index;

use crate::constants::WINDOW_LEN;
use crate::error::{Error, Result};

/// An ordered sequence of exactly [`WINDOW_LEN`] finite glucose readings.
///
/// The oldest reading comes first. A window only exists for the duration of
/// one request; construction is the single place its invariants are checked.
///
/// # Example
///
/// ```rust
/// use gluco_core::types::ReadingWindow;
///
/// assert!(ReadingWindow::new(vec![1.0, 2.0, 3.0]).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadingWindow([f64; WINDOW_LEN]);

impl ReadingWindow {
    /// Validate and build a window from raw readings
    pub fn new(values: Vec<f64>) -> Result<Self> {
        let len = values.len();
        let readings: [f64; WINDOW_LEN] = values.try_into().map_err(|_| {
            Error::InvalidReadings(format!(
                "Enter exactly {WINDOW_LEN} glucose readings (received {len})"
            ))
        })?;

        if let Some(idx) = readings.iter().position(|v| !v.is_finite()) {
            return Err(Error::InvalidReadings(format!(
                "Glucose reading at index {idx} is not a finite number"
            )));
        }

        Ok(Self(readings))
    }

    /// Readings in submission order
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Number of readings (always [`WINDOW_LEN`])
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        WINDOW_LEN
    }

    /// Always false; present for API symmetry with `len`
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }
}

impl Index<usize> for ReadingWindow {
    type Output = f64;

    fn index(&self, idx: usize) -> &f64 {
        &self.0[idx]
    }
}
