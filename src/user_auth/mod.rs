//! Password credentials and bearer-token authentication.
//!
//! ## Components
//! - `service`: credential store (registration, password verification)
//! - `token`: HS256 token issue and verification
//! - `middleware`: bearer extraction into an [`AuthContext`]
//! - `handlers`: `/api/users` and `/api/login`

pub mod handlers;
pub mod middleware;
pub mod service;
pub mod token;

pub use middleware::{AuthContext, extract_bearer, token_extractor};
pub use service::{CredentialStore, INVALID_CREDENTIALS};
pub use token::{Claims, TokenService};
