//! HTTP-boundary errors.
//!
//! Handlers return [`Result<T>`]; [`AppError`] turns into a JSON body of the
//! form `{ "error": "<message>" }`. 5xx errors are reported to Sentry and
//! logged, and their details are never sent to the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::cosmic::ContentError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Content API operation failed.
    #[error("Content error: {0}")]
    Content(#[from] ContentError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Content(ContentError::NotFound(_)) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Content(_) => StatusCode::BAD_GATEWAY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let message = match &self {
            Self::Content(ContentError::NotFound(_)) => "Not found".to_string(),
            Self::Content(_) => "External service error".to_string(),
            Self::Internal(_) => "Internal server error".to_string(),
            Self::NotFound(what) => format!("Not found: {what}"),
            Self::BadRequest(msg) => msg.clone(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Record a Sentry breadcrumb for a shopper action.
///
/// Breadcrumbs are attached to any later error event from the same request.
pub fn add_breadcrumb(category: &str, message: &str, data: &[(&str, &str)]) {
    sentry::add_breadcrumb(sentry::Breadcrumb {
        category: Some(category.to_owned()),
        message: Some(message.to_owned()),
        level: sentry::Level::Info,
        data: data
            .iter()
            .map(|(key, value)| ((*key).to_owned(), serde_json::Value::from(*value)))
            .collect(),
        ..Default::default()
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_display() {
        assert_eq!(
            AppError::NotFound("product red-shirt".to_string()).to_string(),
            "Not found: product red-shirt"
        );
        assert_eq!(
            AppError::BadRequest("quantity".to_string()).to_string(),
            "Bad request: quantity"
        );
    }

    #[test]
    fn test_content_not_found_is_404() {
        let err = AppError::from(ContentError::NotFound("query".to_string()));
        assert_eq!(status_of(err), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_other_content_errors_are_502() {
        assert_eq!(
            status_of(ContentError::RateLimited(5).into()),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(
                ContentError::Status {
                    status: 500,
                    body: "boom".to_string(),
                }
                .into()
            ),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_client_and_server_errors() {
        assert_eq!(
            status_of(AppError::NotFound("x".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::BadRequest("x".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Internal("x".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
