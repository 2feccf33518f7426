//! Post operations and the owner check gating delete

use std::sync::Arc;
use validator::Validate;

use super::models::{CreatePostRequest, Post, PostListing, PostPatch, UpdatePostRequest};
use crate::account::Account;
use crate::error::{ApiError, ApiResult};
use crate::store::{self, Repository};
use crate::user_auth::AuthContext;

/// Fails unless `account` owns `post`.
pub fn ensure_owner(account: &Account, post: &Post) -> ApiResult<()> {
    if post.is_owned_by(&account.id) {
        Ok(())
    } else {
        Err(ApiError::authorization(
            "only the creator of a blog can delete it",
        ))
    }
}

pub struct BlogService {
    repo: Arc<dyn Repository>,
}

impl BlogService {
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        Self { repo }
    }

    /// All posts with owners expanded
    pub async fn list(&self) -> ApiResult<Vec<PostListing>> {
        let posts = self.repo.list_posts().await?;
        let accounts = self.repo.list_accounts().await?;
        Ok(store::populate_owners(posts, &accounts))
    }

    /// Create a post owned by the caller
    pub async fn create(&self, ctx: &AuthContext, req: CreatePostRequest) -> ApiResult<Post> {
        let account = ctx.require_account()?;
        req.validate()?;

        let post = Post {
            id: store::new_id(),
            title: req.title.unwrap_or_default(),
            author: req.author.unwrap_or_default(),
            url: req.url.unwrap_or_default(),
            likes: req.likes.unwrap_or(0),
            user: Some(account.id.clone()),
        };
        let post = self.repo.insert_owned_post(post).await?;

        tracing::info!(post_id = %post.id, account_id = %account.id, "Blog created");
        Ok(post)
    }

    /// Replace the given fields. Any caller may update any post.
    pub async fn update(&self, id: &str, req: UpdatePostRequest) -> ApiResult<Post> {
        let patch = PostPatch::from(req);
        self.repo
            .update_post(id, &patch)
            .await?
            .ok_or_else(|| ApiError::not_found("blog not found"))
    }

    /// Delete a post; only its owner may.
    pub async fn delete(&self, ctx: &AuthContext, id: &str) -> ApiResult<()> {
        let account = ctx.require_account()?;
        let post = self
            .repo
            .find_post(id)
            .await?
            .ok_or_else(|| ApiError::not_found("blog not found"))?;

        if let Err(e) = ensure_owner(account, &post) {
            tracing::warn!(post_id = %post.id, account_id = %account.id, "Delete refused: not the owner");
            return Err(e);
        }

        if !self.repo.delete_post(id).await? {
            // Removed by someone else between lookup and delete
            return Err(ApiError::not_found("blog not found"));
        }
        tracing::info!(post_id = %id, account_id = %account.id, "Blog deleted");
        Ok(())
    }
}
