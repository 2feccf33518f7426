//! API error types.
//!
//! Every handler returns `Result<_, ApiError>`. The `IntoResponse` impl is the
//! single place where an error kind becomes an HTTP status and an
//! `{"error": message}` body.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by the service layer and the HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed or missing required fields
    #[error("{0}")]
    Validation(String),

    /// Bad credentials, or a bad or absent token
    #[error("{0}")]
    Authentication(String),

    /// Authenticated, but not permitted to touch the resource
    #[error("{0}")]
    Authorization(String),

    #[error("{0}")]
    NotFound(String),

    /// Duplicate unique key
    #[error("{0}")]
    Conflict(String),

    /// Persistence layer or other internal failure
    #[error(transparent)]
    Infrastructure(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn authentication(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    pub fn authorization(msg: impl Into<String>) -> Self {
        Self::Authorization(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Get error name string.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Authentication(_) => "AUTHENTICATION_ERROR",
            Self::Authorization(_) => "AUTHORIZATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Infrastructure(_) => "INFRASTRUCTURE_ERROR",
        }
    }

    /// Get HTTP status code.
    ///
    /// An ownership mismatch maps to 400, not 403.
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Authorization(_) | Self::Conflict(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Authentication(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let msg = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(m) => m.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .collect::<Vec<_>>()
            .join(", ");
        Self::Validation(msg)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

/// JSON response body for errors.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        let error = match &self {
            Self::Infrastructure(e) => {
                tracing::error!("Internal error: {:?}", e);
                "internal server error".to_string()
            }
            other => {
                tracing::debug!(kind = other.name(), "Request rejected: {}", other);
                other.to_string()
            }
        };
        (status, Json(ErrorBody { error })).into_response()
    }
}

/// Result alias used by handlers and services.
pub type ApiResult<T> = Result<T, ApiError>;
