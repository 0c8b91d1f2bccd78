//! Error classification for backend responses.
//!
//! Every caller goes through [`classify`] so the same failure always produces
//! the same user-facing message.

use serde_json::Value;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// Field-level validation failures (HTTP 422), one message per line.
    #[error("{0}")]
    Validation(String),

    #[error("Resource not found")]
    NotFound,

    #[error("Internal server error")]
    Internal,

    #[error("Service temporarily unavailable")]
    Unavailable,

    /// `detail` from any other non-2xx response, verbatim.
    #[error("{0}")]
    Detail(String),

    #[error("Unknown error")]
    Unknown,

    /// The request never got a response.
    #[error("Network error: unable to reach the server")]
    Network(String),

    /// A 2xx response whose body did not match the expected shape.
    #[error("Invalid response from server")]
    InvalidResponse(String),
}

/// Classify a non-2xx response from its status code and raw body.
pub fn classify(status: u16, body: &str) -> ApiError {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|mut value| value.get_mut("detail").map(Value::take));

    match (status, detail) {
        (422, Some(Value::Array(errors))) => {
            let message = join_validation_messages(&errors);
            if message.is_empty() {
                ApiError::Unknown
            } else {
                ApiError::Validation(message)
            }
        }
        (404, _) => ApiError::NotFound,
        (500, _) => ApiError::Internal,
        (503, _) => ApiError::Unavailable,
        (_, Some(Value::String(detail))) => ApiError::Detail(detail),
        (_, Some(Value::Null)) | (_, None) => ApiError::Unknown,
        (_, Some(other)) => ApiError::Detail(other.to_string()),
    }
}

fn join_validation_messages(errors: &[Value]) -> String {
    errors
        .iter()
        .filter_map(|error| error.get("msg").and_then(Value::as_str))
        .collect::<Vec<_>>()
        .join("\n")
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ApiError::InvalidResponse(error.to_string())
        } else {
            ApiError::Network(error.to_string())
        }
    }
}
