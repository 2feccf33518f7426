use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::models::{CreatePostRequest, Post, PostListing, UpdatePostRequest};
use crate::error::ApiResult;
use crate::gateway::extract::ApiJson;
use crate::gateway::state::AppState;
use crate::user_auth::AuthContext;

/// List blogs
///
/// GET /api/blogs
#[utoipa::path(
    get,
    path = "/api/blogs",
    responses(
        (status = 200, description = "All blogs with their creators", body = Vec<PostListing>)
    ),
    tag = "Blogs"
)]
pub async fn list_blogs(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<PostListing>>> {
    Ok(Json(state.blogs.list().await?))
}

/// Create a blog
///
/// POST /api/blogs
#[utoipa::path(
    post,
    path = "/api/blogs",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Blog created", body = Post),
        (status = 400, description = "Missing title, author or url"),
        (status = 401, description = "Token missing or invalid")
    ),
    security(("bearer_auth" = [])),
    tag = "Blogs"
)]
pub async fn create_blog(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    ApiJson(req): ApiJson<CreatePostRequest>,
) -> ApiResult<(StatusCode, Json<Post>)> {
    let post = state.blogs.create(&ctx, req).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// Update a blog
///
/// PUT /api/blogs/{id}
#[utoipa::path(
    put,
    path = "/api/blogs/{id}",
    params(("id" = String, Path, description = "Blog id")),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Blog updated", body = Post),
        (status = 404, description = "Blog not found")
    ),
    tag = "Blogs"
)]
pub async fn update_blog(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdatePostRequest>,
) -> ApiResult<Json<Post>> {
    Ok(Json(state.blogs.update(&id, req).await?))
}

/// Delete a blog
///
/// DELETE /api/blogs/{id}
#[utoipa::path(
    delete,
    path = "/api/blogs/{id}",
    params(("id" = String, Path, description = "Blog id")),
    responses(
        (status = 204, description = "Blog deleted"),
        (status = 400, description = "Caller is not the creator"),
        (status = 401, description = "Token missing or invalid"),
        (status = 404, description = "Blog not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Blogs"
)]
pub async fn delete_blog(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.blogs.delete(&ctx, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
