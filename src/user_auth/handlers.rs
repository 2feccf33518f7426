use axum::{Json, extract::State, http::StatusCode};
use std::sync::Arc;

use crate::account::{AccountListing, AccountResponse, LoginRequest, LoginResponse, RegisterRequest};
use crate::error::ApiResult;
use crate::gateway::extract::ApiJson;
use crate::gateway::state::AppState;

/// List accounts
///
/// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All accounts with their posts", body = Vec<AccountListing>)
    ),
    tag = "Users"
)]
pub async fn list_users(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<AccountListing>>> {
    Ok(Json(state.credentials.list().await?))
}

/// Register a new account
///
/// POST /api/users
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AccountResponse),
        (status = 400, description = "Password or username too short, or username taken")
    ),
    tag = "Users"
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AccountResponse>)> {
    let account = state.credentials.register(req).await?;
    Ok((StatusCode::CREATED, Json(AccountResponse::from(&account))))
}

/// Login
///
/// POST /api/login
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let account = match state.credentials.verify(&req.username, &req.password).await {
        Ok(a) => a,
        Err(e) => {
            tracing::warn!(username = %req.username, "Login failed: {}", e);
            return Err(e);
        }
    };
    let token = state.tokens.issue(&account)?;

    tracing::info!(account_id = %account.id, "Login succeeded");
    Ok(Json(LoginResponse {
        token,
        username: account.username,
        name: account.name,
    }))
}
