//! JSON body extractor whose rejections go through [`ApiError`]

use axum::extract::FromRequest;

use crate::error::ApiError;

/// Like `axum::Json`, but a malformed body becomes a 400 `{"error": ...}`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
