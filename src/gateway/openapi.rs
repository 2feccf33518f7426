//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:3003/docs`
//! - OpenAPI JSON: `http://localhost:3003/api-docs/openapi.json`

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::account::{
    AccountListing, AccountResponse, LoginRequest, LoginResponse, OwnedPostSummary,
    RegisterRequest,
};
use crate::blog::{CreatePostRequest, OwnerSummary, Post, PostListing, UpdatePostRequest};
use crate::gateway::health::HealthResponse;

/// Bearer token security scheme
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token from POST /api/login: `Bearer <token>`"))
                        .build(),
                ),
            );
        }
    }
}

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bloglist API",
        version = "0.1.0",
        description = "Blogs, their creators, and password login issuing bearer tokens.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:3003", description = "Development"),
    ),
    paths(
        crate::gateway::health::health_check,
        crate::blog::handlers::list_blogs,
        crate::blog::handlers::create_blog,
        crate::blog::handlers::update_blog,
        crate::blog::handlers::delete_blog,
        crate::user_auth::handlers::list_users,
        crate::user_auth::handlers::register,
        crate::user_auth::handlers::login,
    ),
    components(
        schemas(
            HealthResponse,
            Post,
            PostListing,
            OwnerSummary,
            CreatePostRequest,
            UpdatePostRequest,
            AccountResponse,
            AccountListing,
            OwnedPostSummary,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Blogs", description = "Blog listing and owner-gated mutation"),
        (name = "Users", description = "Account registration and listing"),
        (name = "Auth", description = "Password login"),
        (name = "System", description = "Health checks")
    )
)]
pub struct ApiDoc;
