use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::account::Account;
use crate::error::{ApiError, ApiResult};
use crate::gateway::state::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Caller identity resolved from the bearer token.
///
/// Inserted into request extensions for every request that passes through
/// [`token_extractor`]. Both fields are `None` when no token was sent.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    pub account: Option<Account>,
    pub token: Option<String>,
}

impl AuthContext {
    /// The authenticated account, or 401.
    pub fn require_account(&self) -> ApiResult<&Account> {
        self.account
            .as_ref()
            .ok_or_else(|| ApiError::authentication("token missing or invalid"))
    }
}

/// Token from an `Authorization: Bearer <token>` header.
///
/// The scheme prefix is case-sensitive; any other value counts as no token.
pub fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix(BEARER_PREFIX))
}

/// Resolve the bearer token, if any, into an [`AuthContext`].
///
/// Absent token: continue with an empty context. Present but invalid, or
/// naming an account that no longer exists: fail with 401.
pub async fn token_extractor(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(request.headers()).map(str::to_owned);

    let ctx = match token {
        None => AuthContext::default(),
        Some(token) => {
            let claims = state.tokens.verify(&token)?;
            let account = state
                .repo
                .find_account(&claims.sub)
                .await?
                .ok_or_else(|| ApiError::authentication("token invalid"))?;
            tracing::debug!(account_id = %account.id, "Bearer token accepted");
            AuthContext {
                account: Some(account),
                token: Some(token),
            }
        }
    };

    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}
