//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! Every error renders as JSON:
//!
//! ```text
//! 400 {"success": false, "error": "Validation failed", "details": [{"field": ..., "message": ...}]}
//! 404 {"success": false, "error": "Not found"}
//! 500 {"success": false, "error": "<delivery detail>"}
//! ```

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use icedelights_core::{FieldError, ValidationError};
use serde::Serialize;
use thiserror::Error;

use crate::services::RelayError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Submitted fields failed validation.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A submission could not be relayed.
    #[error("Relay error: {0}")]
    Relay(#[from] RelayError),

    /// The request body could not be read as JSON.
    #[error("Invalid request body: {0}")]
    Payload(#[from] JsonRejection),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Rate limited.
    #[error("Rate limited")]
    RateLimited,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body.
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a [FieldError]>,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Relay(RelayError::Validation(_)) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Payload(rejection) => rejection.status(),
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::Relay(_) | Self::Session(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) | Self::Relay(RelayError::Validation(err)) => Some(err),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(
            self,
            Self::Relay(RelayError::Transport(_) | RelayError::Timeout(_))
                | Self::Session(_)
                | Self::Internal(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();

        // Delivery failures are reported as-is; other internals stay hidden
        let error = match &self {
            Self::Validation(_) | Self::Relay(RelayError::Validation(_)) => {
                "Validation failed".to_string()
            }
            Self::Relay(err) => err.to_string(),
            Self::Payload(rejection) => rejection.body_text(),
            Self::Session(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::NotFound(what) => what.clone(),
            Self::BadRequest(message) => message.clone(),
            Self::RateLimited => "Too many requests, please try again later.".to_string(),
        };

        let body = ErrorBody {
            success: false,
            error,
            details: self.validation().map(|err| err.fields.as_slice()),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use http_body_util::BodyExt;
    use icedelights_core::{ContactSubmission, Submission};

    use super::*;
    use crate::services::TransportError;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn validation_error() -> ValidationError {
        Submission::Contact(ContactSubmission::default())
            .validate()
            .unwrap_err()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product-123".to_string());
        assert_eq!(err.to_string(), "Not found: product-123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            AppError::NotFound("test".to_string()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::BadRequest("test".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::RateLimited.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            AppError::Internal("test".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Relay(RelayError::Validation(validation_error())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Relay(RelayError::Timeout(Duration::from_secs(30))).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_validation_body_lists_fields() {
        let (status, body) = body_json(AppError::Validation(validation_error())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Validation failed");
        let fields: Vec<&str> = body["details"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["field"].as_str().unwrap())
            .collect();
        assert!(fields.contains(&"firstName"));
        assert!(fields.contains(&"message"));
    }

    #[tokio::test]
    async fn test_transport_detail_is_exposed() {
        let err = AppError::Relay(RelayError::Transport(TransportError::Api {
            status: 400,
            message: "Recipient phone number not in allowed list".to_string(),
        }));
        let (status, body) = body_json(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            serde_json::json!({
                "success": false,
                "error": "Recipient phone number not in allowed list"
            })
        );
    }

    #[tokio::test]
    async fn test_internal_detail_is_hidden() {
        let (_, body) = body_json(AppError::Internal("db exploded".to_string())).await;
        assert_eq!(body["error"], "Internal server error");
    }
}
