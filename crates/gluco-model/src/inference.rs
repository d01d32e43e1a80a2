//! Sequence model inference.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use gluco_core::constants::{NUM_FEATURES, WINDOW_LEN};
use gluco_core::error::{Error, Result};
use ndarray::{Array2, Array3, ArrayViewD, Ix2};
use serde::{Deserialize, Serialize};

/// A loaded, immutable sequence-to-sequence regression model.
///
/// `forward` must be a pure function of the weights and the input: the
/// service shares one instance across all requests without locking.
pub trait SequenceModel: Send + Sync {
    /// Model name for logging
    fn name(&self) -> &str;

    /// Run a forward pass on `(batch, sequence, features)` input, returning
    /// one output row per batch element
    fn forward(&self, input: &Array3<f32>) -> Result<Array2<f32>>;
}

/// Model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model name
    pub name: String,
    /// Input shape (batch, sequence, features)
    pub input_shape: Vec<usize>,
    /// Width of each output row
    pub output_width: usize,
    /// Intra-op threads used by the runtime
    pub intra_threads: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: "glucose_lstm".to_string(),
            input_shape: vec![1, WINDOW_LEN, NUM_FEATURES],
            output_width: NUM_FEATURES,
            intra_threads: 1,
        }
    }
}

/// Running latency counters, safe to update from concurrent requests
#[derive(Debug, Default)]
pub struct InferenceStats {
    count: AtomicU64,
    total_ns: AtomicU64,
}

impl InferenceStats {
    /// Record one completed inference
    pub fn record(&self, latency_ns: u64) {
        self.count.fetch_add(1, Ordering::Relaxed);
        self.total_ns.fetch_add(latency_ns, Ordering::Relaxed);
    }

    /// Number of inferences recorded
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Average latency in nanoseconds
    #[must_use]
    pub fn avg_latency_ns(&self) -> u64 {
        let count = self.count();
        if count == 0 {
            0
        } else {
            self.total_ns.load(Ordering::Relaxed) / count
        }
    }
}

/// ONNX model wrapper for inference
pub struct OnnxModel {
    /// Model configuration
    config: ModelConfig,
    /// ONNX Runtime session
    #[cfg(feature = "onnx")]
    session: ort::Session,
    /// Input name
    #[cfg(feature = "onnx")]
    input_name: String,
    /// Output name
    #[cfg(feature = "onnx")]
    output_name: String,
}

impl std::fmt::Debug for OnnxModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxModel")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "onnx")]
fn model_err(e: impl std::fmt::Display) -> Error {
    Error::ModelError(e.to_string())
}

impl OnnxModel {
    /// Load a model from an ONNX file
    #[cfg(feature = "onnx")]
    pub fn load<P: AsRef<Path>>(path: P, config: ModelConfig) -> Result<Self> {
        use ort::{GraphOptimizationLevel, Session};

        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::ArtifactNotFound(path.to_path_buf()));
        }

        let session = Session::builder()
            .map_err(model_err)?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(model_err)?
            .with_intra_threads(config.intra_threads)
            .map_err(model_err)?
            .commit_from_file(path)
            .map_err(model_err)?;

        let input_name = session
            .inputs
            .first()
            .map_or_else(|| "input".to_string(), |i| i.name.clone());
        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| Error::ModelError("model declares no outputs".to_string()))?;

        tracing::info!(
            path = %path.display(),
            input = %input_name,
            output = %output_name,
            "Loaded ONNX model"
        );

        Ok(Self {
            config,
            session,
            input_name,
            output_name,
        })
    }

    /// Load a model from an ONNX file.
    ///
    /// Without the `onnx` feature there is no runtime to execute the graph,
    /// so this always fails once the file is found.
    #[cfg(not(feature = "onnx"))]
    pub fn load<P: AsRef<Path>>(path: P, config: ModelConfig) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::ArtifactNotFound(path.to_path_buf()));
        }

        Err(Error::ModelError(format!(
            "cannot load {} ({}): built without the `onnx` feature",
            path.display(),
            config.name
        )))
    }

    fn check_input(&self, input: &Array3<f32>) -> Result<()> {
        if input.shape() == self.config.input_shape.as_slice() {
            Ok(())
        } else {
            Err(Error::ShapeMismatch {
                expected: format!("{:?}", self.config.input_shape),
                actual: format!("{:?}", input.shape()),
            })
        }
    }
}

impl SequenceModel for OnnxModel {
    fn name(&self) -> &str {
        &self.config.name
    }

    #[cfg(feature = "onnx")]
    fn forward(&self, input: &Array3<f32>) -> Result<Array2<f32>> {
        use ort::Tensor;

        self.check_input(input)?;

        let input_tensor = Tensor::from_array(input.clone()).map_err(model_err)?;
        let outputs = self
            .session
            .run(ort::inputs![self.input_name.as_str() => input_tensor].map_err(model_err)?)
            .map_err(model_err)?;

        let output = outputs
            .get(self.output_name.as_str())
            .ok_or_else(|| Error::ModelError(format!("missing output '{}'", self.output_name)))?;

        let tensor = output.try_extract_tensor::<f32>().map_err(model_err)?;
        output_rows(tensor.view(), self.config.output_width)
    }

    #[cfg(not(feature = "onnx"))]
    fn forward(&self, input: &Array3<f32>) -> Result<Array2<f32>> {
        self.check_input(input)?;
        Err(Error::ModelError(
            "built without the `onnx` feature".to_string(),
        ))
    }
}

/// Convert a raw output tensor into rows of `width` values.
///
/// Only `(width)` and `(rows, width)` tensors are accepted; a sequence-shaped
/// output is a different model and is rejected rather than truncated.
pub fn output_rows(tensor: ArrayViewD<'_, f32>, width: usize) -> Result<Array2<f32>> {
    let actual = format!("{:?}", tensor.shape());
    let mismatch = || Error::ShapeMismatch {
        expected: format!("(n, {width})"),
        actual: actual.clone(),
    };

    let len = tensor.len();
    let rows = match tensor.ndim() {
        1 => tensor
            .into_shape((1, len))
            .map_err(|_| mismatch())?
            .to_owned(),
        2 => tensor
            .into_dimensionality::<Ix2>()
            .map_err(|_| mismatch())?
            .to_owned(),
        _ => return Err(mismatch()),
    };

    if rows.nrows() == 0 || rows.ncols() != width {
        return Err(mismatch());
    }
    Ok(rows)
}

/// Time a forward pass and record it
pub fn timed_forward(
    model: &dyn SequenceModel,
    stats: &InferenceStats,
    input: &Array3<f32>,
) -> Result<Array2<f32>> {
    let start = Instant::now();
    let output = model.forward(input)?;
    let latency_ns = u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX);
    stats.record(latency_ns);

    tracing::debug!(
        model = model.name(),
        latency_us = latency_ns / 1_000,
        avg_latency_us = stats.avg_latency_ns() / 1_000,
        inferences = stats.count(),
        "Inference complete"
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_config_default() {
        let config = ModelConfig::default();
        assert_eq!(config.input_shape, vec![1, 10, 72]);
        assert_eq!(config.output_width, 72);
    }

    #[test]
    fn test_inference_stats() {
        let stats = InferenceStats::default();
        assert_eq!(stats.avg_latency_ns(), 0);

        stats.record(100);
        stats.record(300);
        assert_eq!(stats.count(), 2);
        assert_eq!(stats.avg_latency_ns(), 200);
    }

    #[test]
    fn test_load_missing_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("glucose_model.onnx");
        let err = OnnxModel::load(&path, ModelConfig::default()).unwrap_err();
        assert!(matches!(err, Error::ArtifactNotFound(p) if p == path));
    }

    #[cfg(not(feature = "onnx"))]
    #[test]
    fn test_load_without_runtime_fails() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = OnnxModel::load(file.path(), ModelConfig::default()).unwrap_err();
        assert!(matches!(err, Error::ModelError(_)));
        assert!(err.to_string().contains("onnx"));
    }

    #[test]
    fn test_output_rows_accepts_vector_and_matrix() {
        let flat = ndarray::Array1::<f32>::ones(72).into_dyn();
        assert_eq!(output_rows(flat.view(), 72).unwrap().dim(), (1, 72));

        let matrix = Array2::<f32>::zeros((2, 72)).into_dyn();
        assert_eq!(output_rows(matrix.view(), 72).unwrap().dim(), (2, 72));
    }

    #[test]
    fn test_output_rows_rejects_sequence_output() {
        let sequence = Array3::<f32>::zeros((1, 10, 72)).into_dyn();
        let err = output_rows(sequence.view(), 72).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
        assert!(err.to_string().contains("[1, 10, 72]"));
    }

    #[test]
    fn test_output_rows_rejects_wrong_width() {
        let narrow = Array2::<f32>::zeros((1, 10)).into_dyn();
        assert!(output_rows(narrow.view(), 72).is_err());

        let empty = Array2::<f32>::zeros((0, 72)).into_dyn();
        assert!(output_rows(empty.view(), 72).is_err());
    }

    struct Echo;

    impl SequenceModel for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn forward(&self, input: &Array3<f32>) -> Result<Array2<f32>> {
            let steps = input.dim().1;
            Ok(input.index_axis(ndarray::Axis(1), steps - 1).to_owned())
        }
    }

    #[test]
    fn test_timed_forward_records() {
        let stats = InferenceStats::default();
        let input = Array3::<f32>::ones((1, 10, 72));
        let output = timed_forward(&Echo, &stats, &input).unwrap();

        assert_eq!(output.dim(), (1, 72));
        assert_eq!(stats.count(), 1);
    }
}
