use std::sync::Arc;

use crate::blog::BlogService;
use crate::store::Repository;
use crate::user_auth::{CredentialStore, TokenService};

/// Gateway application state (shared)
#[derive(Clone)]
pub struct AppState {
    /// Persistence handle, injected at startup
    pub repo: Arc<dyn Repository>,
    pub credentials: Arc<CredentialStore>,
    pub tokens: Arc<TokenService>,
    pub blogs: Arc<BlogService>,
}

impl AppState {
    pub fn new(repo: Arc<dyn Repository>, tokens: TokenService) -> Self {
        Self {
            credentials: Arc::new(CredentialStore::new(repo.clone())),
            blogs: Arc::new(BlogService::new(repo.clone())),
            tokens: Arc::new(tokens),
            repo,
        }
    }
}
