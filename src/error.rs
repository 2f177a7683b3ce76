//! Domain-specific error types for footprint-oracle

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Where clients are sent to try the quiz again.
pub const DEFAULT_RETRY_PATH: &str = "/quiz";

/// Main error type for the footprint-oracle service
#[derive(Error, Debug)]
pub enum OracleError {
    #[error("Missing fields: {}", .missing.join(", "))]
    Validation { missing: Vec<String> },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl OracleError {
    pub fn status(&self) -> StatusCode {
        match self {
            OracleError::Validation { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON error body, shared with the panic handler in `http`.
    pub fn to_body(&self, retry_path: &str) -> serde_json::Value {
        match self {
            OracleError::Validation { missing } => json!({
                "error": {
                    "code": 400,
                    "message": self.to_string(),
                    "missing_fields": missing,
                    "retry_path": retry_path,
                }
            }),
            other => internal_body(&other.to_string(), retry_path),
        }
    }

    /// Attach the configured retry path so the error can be rendered.
    pub fn with_retry_path(self, retry_path: impl Into<String>) -> RoutedError {
        RoutedError {
            error: self,
            retry_path: retry_path.into(),
        }
    }
}

pub(crate) fn internal_body(details: &str, retry_path: &str) -> serde_json::Value {
    json!({
        "error": {
            "code": 500,
            "message": format!(
                "Oops! Something went wrong. Please try again or contact support if the problem persists. Error: {details}"
            ),
            "retry_path": retry_path,
        }
    })
}

impl From<anyhow::Error> for OracleError {
    fn from(err: anyhow::Error) -> Self {
        OracleError::Internal {
            message: err.to_string(),
        }
    }
}

/// An error paired with the retry path it should point clients back to.
#[derive(Debug)]
pub struct RoutedError {
    pub error: OracleError,
    pub retry_path: String,
}

impl IntoResponse for RoutedError {
    fn into_response(self) -> Response {
        let status = self.error.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.error);
        }
        (
            status,
            [(header::CONTENT_TYPE, "application/json")],
            self.error.to_body(&self.retry_path).to_string(),
        )
            .into_response()
    }
}

/// Result type alias for footprint-oracle operations
pub type Result<T> = std::result::Result<T, OracleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_names_fields() {
        let err = OracleError::Validation {
            missing: vec!["flights".into(), "food_waste".into()],
        };
        assert_eq!(err.to_string(), "Missing fields: flights, food_waste");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let body = err.to_body("/quiz");
        assert_eq!(body["error"]["code"], 400);
        assert_eq!(body["error"]["missing_fields"][0], "flights");
        assert_eq!(body["error"]["retry_path"], "/quiz");
    }

    #[test]
    fn config_errors_are_server_errors() {
        let err = OracleError::Config {
            message: "bad client".to_string(),
        };
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Configuration error: bad client");
    }

    #[test]
    fn internal_errors_map_to_500() {
        let err = OracleError::from(anyhow::anyhow!("boom"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = err.to_body("/again");
        assert_eq!(body["error"]["code"], 500);
        assert_eq!(body["error"]["retry_path"], "/again");
        assert!(
            body["error"]["message"]
                .as_str()
                .unwrap()
                .contains("Something went wrong")
        );
    }
}
