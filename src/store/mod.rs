//! Repository trait for post and account persistence
//!
//! Two implementations:
//! - [`PgStore`]: PostgreSQL via sqlx
//! - [`MemoryStore`]: process-local, used when no database is configured and in tests

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

use crate::account::{Account, AccountListing, OwnedPostSummary};
use crate::blog::{OwnerSummary, Post, PostListing, PostPatch};
use crate::error::ApiError;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("expected `{0}` to be unique")]
    Duplicate(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(_) => ApiError::conflict(e.to_string()),
            StoreError::Database(db) => ApiError::Infrastructure(db.into()),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Generate a new opaque, URL-safe record identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Document store over posts and accounts
#[async_trait]
pub trait Repository: Send + Sync {
    /// All posts, in creation order
    async fn list_posts(&self) -> StoreResult<Vec<Post>>;

    async fn find_post(&self, id: &str) -> StoreResult<Option<Post>>;

    /// Persist `post` and append its id to the owner's `blogs` list, as a
    /// single atomic step. Owner-less posts only get the first write.
    async fn insert_owned_post(&self, post: Post) -> StoreResult<Post>;

    /// Returns the updated post, or `None` if no post has this id
    async fn update_post(&self, id: &str, patch: &PostPatch) -> StoreResult<Option<Post>>;

    /// Returns whether a post was removed. The owner's `blogs` list is left as is.
    async fn delete_post(&self, id: &str) -> StoreResult<bool>;

    /// All accounts, in creation order
    async fn list_accounts(&self) -> StoreResult<Vec<Account>>;

    async fn find_account(&self, id: &str) -> StoreResult<Option<Account>>;

    async fn find_account_by_username(&self, username: &str) -> StoreResult<Option<Account>>;

    /// Fails with [`StoreError::Duplicate`] if the username is taken
    async fn insert_account(&self, account: Account) -> StoreResult<Account>;

    async fn health_check(&self) -> StoreResult<()>;
}

/// Expand each post's owner reference to `{id, username, name}`.
///
/// References to unknown accounts are dropped.
pub fn populate_owners(posts: Vec<Post>, accounts: &[Account]) -> Vec<PostListing> {
    let by_id: HashMap<&str, &Account> = accounts.iter().map(|a| (a.id.as_str(), a)).collect();
    posts
        .into_iter()
        .map(|p| {
            let user = p
                .user
                .as_deref()
                .and_then(|id| by_id.get(id))
                .map(|a| OwnerSummary {
                    id: a.id.clone(),
                    username: a.username.clone(),
                    name: a.name.clone(),
                });
            PostListing {
                id: p.id,
                title: p.title,
                author: p.author,
                url: p.url,
                likes: p.likes,
                user,
            }
        })
        .collect()
}

/// Expand each account's `blogs` list to `{id, url, title, author}`.
///
/// Dangling references (deleted posts) are skipped.
pub fn populate_blogs(accounts: Vec<Account>, posts: &[Post]) -> Vec<AccountListing> {
    let by_id: HashMap<&str, &Post> = posts.iter().map(|p| (p.id.as_str(), p)).collect();
    accounts
        .into_iter()
        .map(|a| {
            let blogs = a
                .blogs
                .iter()
                .filter_map(|id| by_id.get(id.as_str()))
                .map(|p| OwnedPostSummary {
                    id: p.id.clone(),
                    url: p.url.clone(),
                    title: p.title.clone(),
                    author: p.author.clone(),
                })
                .collect();
            AccountListing {
                id: a.id,
                username: a.username,
                name: a.name,
                blogs,
            }
        })
        .collect()
}
