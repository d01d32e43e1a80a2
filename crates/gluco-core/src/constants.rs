//! Constants shared by the model pipeline and the HTTP gateway.
//!
//! The shape constants describe the artifacts the service was fitted with.
//! Changing them without re-exporting the model and scaler breaks inference.

/// Number of sequential readings a client submits
pub const WINDOW_LEN: usize = 10;

/// Width of the per-time-step feature vector the scaler and model expect
pub const NUM_FEATURES: usize = 72;

/// Number of predicted readings returned to the client
pub const FORECAST_HORIZON: usize = 10;

/// Request field holding the reading sequence
pub const READINGS_FIELD: &str = "glucose_values";

/// Response field holding the predicted sequence
pub const PREDICTIONS_FIELD: &str = "predicted_glucose_levels";

/// Default model artifact file name
pub const DEFAULT_MODEL_FILE: &str = "glucose_model.onnx";

/// Default scaler artifact file name
pub const DEFAULT_SCALER_FILE: &str = "scaler.json";

/// Default listen address
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default listen port
pub const DEFAULT_PORT: u16 = 5000;
