//! Bloglist - blogs, their creators, and bearer-token auth over HTTP
//!
//! # Modules
//!
//! - [`account`] - Account records and their outward views
//! - [`blog`] - Posts, owner-gated create/update/delete, handlers
//! - [`user_auth`] - Credential store, token service, bearer middleware
//! - [`store`] - Repository trait with PostgreSQL and in-memory backends
//! - [`db`] - PostgreSQL pool lifecycle and schema
//! - [`gateway`] - Router, shared state, OpenAPI docs
//! - [`error`] - `ApiError` and its HTTP mapping
//! - [`config`] / [`logging`] - Process bootstrap

pub mod account;
pub mod blog;
pub mod config;
pub mod db;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod store;
pub mod user_auth;

// Convenient re-exports at crate root
pub use account::Account;
pub use blog::{BlogService, Post};
pub use config::AppConfig;
pub use error::{ApiError, ApiResult};
pub use gateway::{build_router, state::AppState};
pub use store::{MemoryStore, PgStore, Repository};
pub use user_auth::{AuthContext, CredentialStore, TokenService};
