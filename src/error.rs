use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single request against the estimation service
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server responded with status {status}")]
    Status {
        status: StatusCode,
        body: Option<Value>,
    },
    #[error("response body is not valid JSON: {0}")]
    Decode(String),
    #[error("request task failed unexpectedly: {0}")]
    Internal(String),
}

impl RequestError {
    /// Error text the server put in a failure payload, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            RequestError::Status { body: Some(body), .. } => error_field(body),
            _ => None,
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, RequestError::Internal(_))
    }
}

/// Non-empty `error` string of a JSON object
pub fn error_field(body: &Value) -> Option<&str> {
    body.get("error")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid API base URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("invalid request timeout {0:?}: expected a positive number of seconds, at most a day")]
    InvalidTimeout(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn server_message_comes_from_status_body() {
        let err = RequestError::Status {
            status: StatusCode::BAD_REQUEST,
            body: Some(json!({ "error": "Prediction failed", "details": "unknown" })),
        };
        assert_eq!(err.server_message(), Some("Prediction failed"));
    }

    #[test]
    fn empty_or_missing_error_is_ignored() {
        let empty = RequestError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: Some(json!({ "error": "" })),
        };
        assert_eq!(empty.server_message(), None);

        let timeout = RequestError::Timeout(Duration::from_secs(10));
        assert_eq!(timeout.server_message(), None);
        assert!(!timeout.is_internal());
    }
}
