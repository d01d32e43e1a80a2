//! Fitted min-max scaler loaded from its exported artifact.
//!
//! The artifact is a JSON document holding the per-feature bounds observed
//! when the scaler was fitted:
//!
//! ```json
//! {
//!   "feature_range": [0.0, 1.0],
//!   "data_min": [ ... ],
//!   "data_max": [ ... ],
//!   "clip": false,
//!   "padding": "per_time_step"
//! }
//! ```
//!
//! No fitting happens here; the parameters are immutable once loaded.

use std::path::Path;

use gluco_core::error::{Error, Result};
use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::preprocessing::PaddingScheme;

/// On-disk form of the scaler artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerArtifact {
    /// Target range of the forward transform
    #[serde(default = "default_feature_range")]
    pub feature_range: (f64, f64),
    /// Per-feature minimum seen during fitting
    pub data_min: Vec<f64>,
    /// Per-feature maximum seen during fitting
    pub data_max: Vec<f64>,
    /// Clamp transformed values into `feature_range`
    #[serde(default)]
    pub clip: bool,
    /// Feature layout the scaler was fitted on
    #[serde(default)]
    pub padding: PaddingScheme,
}

fn default_feature_range() -> (f64, f64) {
    (0.0, 1.0)
}

/// Min-max transform with precomputed per-feature scale and offset
#[derive(Debug, Clone)]
pub struct MinMaxScaler {
    feature_range: (f64, f64),
    scale: Vec<f64>,
    min: Vec<f64>,
    clip: bool,
}

impl MinMaxScaler {
    /// Build a scaler from fitted per-feature bounds.
    ///
    /// A feature whose observed range is zero gets a unit range, so constant
    /// features map onto `feature_range.0`.
    pub fn from_bounds(
        data_min: Vec<f64>,
        data_max: Vec<f64>,
        feature_range: (f64, f64),
    ) -> Result<Self> {
        if data_min.len() != data_max.len() {
            return Err(Error::ScalerError(format!(
                "data_min has {} features but data_max has {}",
                data_min.len(),
                data_max.len()
            )));
        }
        if data_min.is_empty() {
            return Err(Error::ScalerError("scaler has no features".to_string()));
        }

        let (lo, hi) = feature_range;
        if !(lo.is_finite() && hi.is_finite() && lo < hi) {
            return Err(Error::ScalerError(format!(
                "invalid feature_range ({lo}, {hi})"
            )));
        }

        let mut scale = Vec::with_capacity(data_min.len());
        let mut min = Vec::with_capacity(data_min.len());
        for (i, (&dmin, &dmax)) in data_min.iter().zip(&data_max).enumerate() {
            if !(dmin.is_finite() && dmax.is_finite()) {
                return Err(Error::ScalerError(format!(
                    "feature {i} has non-finite bounds"
                )));
            }
            let range = dmax - dmin;
            let range = if range == 0.0 { 1.0 } else { range };
            let s = (hi - lo) / range;
            scale.push(s);
            min.push(lo - dmin * s);
        }

        Ok(Self {
            feature_range,
            scale,
            min,
            clip: false,
        })
    }

    /// Enable clamping of transformed values into the feature range
    #[must_use]
    pub fn with_clip(mut self, clip: bool) -> Self {
        self.clip = clip;
        self
    }

    /// Build from a deserialized artifact
    pub fn from_artifact(artifact: ScalerArtifact) -> Result<Self> {
        let clip = artifact.clip;
        Ok(Self::from_bounds(artifact.data_min, artifact.data_max, artifact.feature_range)?
            .with_clip(clip))
    }

    /// Load the scaler artifact from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::ArtifactNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        let artifact: ScalerArtifact = serde_json::from_str(&content)
            .map_err(|e| Error::ScalerError(format!("{}: {e}", path.display())))?;
        let scaler = Self::from_artifact(artifact)?;

        tracing::debug!(
            path = %path.display(),
            features = scaler.n_features(),
            "Loaded scaler artifact"
        );
        Ok(scaler)
    }

    /// Number of features the scaler was fitted on
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.scale.len()
    }

    /// Scale each row of `x` in place
    pub fn transform(&self, x: &mut Array2<f64>) -> Result<()> {
        self.check_width(x)?;
        let (lo, hi) = self.feature_range;

        for mut row in x.axis_iter_mut(Axis(0)) {
            for ((v, &s), &m) in row.iter_mut().zip(&self.scale).zip(&self.min) {
                *v = *v * s + m;
                if self.clip {
                    *v = v.clamp(lo, hi);
                }
            }
        }
        Ok(())
    }

    /// Undo the forward transform on each row of `x` in place
    pub fn inverse_transform(&self, x: &mut Array2<f64>) -> Result<()> {
        self.check_width(x)?;

        for mut row in x.axis_iter_mut(Axis(0)) {
            for ((v, &s), &m) in row.iter_mut().zip(&self.scale).zip(&self.min) {
                *v = (*v - m) / s;
            }
        }
        Ok(())
    }

    fn check_width(&self, x: &Array2<f64>) -> Result<()> {
        if x.ncols() == self.n_features() {
            Ok(())
        } else {
            Err(Error::ShapeMismatch {
                expected: format!("{} features", self.n_features()),
                actual: format!("{} features", x.ncols()),
            })
        }
    }
}
