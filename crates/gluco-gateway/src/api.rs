//! Wire format of the prediction endpoint.

use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use gluco_core::constants::{READINGS_FIELD, WINDOW_LEN};
use gluco_core::error::{Error, Result};
use gluco_core::types::{Forecast, ReadingWindow};
use serde::Serialize;
use serde_json::Value;

/// Successful prediction body
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    /// Predicted readings in chronological order
    pub predicted_glucose_levels: Forecast,
}

/// Error body shared by every failure response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable reason
    pub error: String,
}

/// Failure as seen by an HTTP client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request was malformed
    BadRequest(String),
    /// The service failed while processing a valid request
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) | ApiError::Internal(msg) => f.write_str(msg),
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        if err.is_client_error() {
            ApiError::BadRequest(err.to_string())
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}

/// Validate a raw request body into a reading window.
///
/// Checks run in order: valid JSON, JSON object, field present, list, length,
/// numeric entries. The first violation is reported.
pub fn parse_readings(body: &[u8]) -> Result<ReadingWindow> {
    let payload: Value = serde_json::from_slice(body)
        .map_err(|_| Error::InvalidPayload("Request body must be valid JSON".to_string()))?;
    let object = payload
        .as_object()
        .ok_or_else(|| Error::InvalidPayload("Request body must be a JSON object".to_string()))?;

    let field = match object.get(READINGS_FIELD) {
        None | Some(Value::Null) => {
            return Err(Error::InvalidPayload(format!(
                "Missing '{READINGS_FIELD}' field"
            )))
        }
        Some(field) => field,
    };

    let items = field.as_array().ok_or_else(|| {
        Error::InvalidReadings(format!(
            "'{READINGS_FIELD}' must be a list of {WINDOW_LEN} numbers"
        ))
    })?;

    if items.len() != WINDOW_LEN {
        return Err(Error::InvalidReadings(format!(
            "Enter exactly {WINDOW_LEN} glucose readings (received {})",
            items.len()
        )));
    }

    let values = items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            item.as_f64().ok_or_else(|| {
                Error::InvalidReadings(format!("Glucose reading at index {idx} is not a number"))
            })
        })
        .collect::<Result<Vec<f64>>>()?;

    ReadingWindow::new(values)
}
