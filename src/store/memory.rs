//! In-memory repository

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{Repository, StoreError, StoreResult};
use crate::account::Account;
use crate::blog::{Post, PostPatch};

#[derive(Default)]
struct Tables {
    posts: Vec<Post>,
    accounts: Vec<Account>,
}

/// Process-local store. Both tables sit behind one lock, so multi-record
/// writes are atomic.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository for MemoryStore {
    async fn list_posts(&self) -> StoreResult<Vec<Post>> {
        Ok(self.tables.read().posts.clone())
    }

    async fn find_post(&self, id: &str) -> StoreResult<Option<Post>> {
        Ok(self.tables.read().posts.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_owned_post(&self, post: Post) -> StoreResult<Post> {
        let mut tables = self.tables.write();
        if let Some(owner) = post.user.as_deref() {
            if let Some(account) = tables.accounts.iter_mut().find(|a| a.id == owner) {
                account.blogs.push(post.id.clone());
            }
        }
        tables.posts.push(post.clone());
        Ok(post)
    }

    async fn update_post(&self, id: &str, patch: &PostPatch) -> StoreResult<Option<Post>> {
        let mut tables = self.tables.write();
        Ok(tables.posts.iter_mut().find(|p| p.id == id).map(|p| {
            p.apply(patch);
            p.clone()
        }))
    }

    async fn delete_post(&self, id: &str) -> StoreResult<bool> {
        let mut tables = self.tables.write();
        let before = tables.posts.len();
        tables.posts.retain(|p| p.id != id);
        Ok(tables.posts.len() != before)
    }

    async fn list_accounts(&self) -> StoreResult<Vec<Account>> {
        Ok(self.tables.read().accounts.clone())
    }

    async fn find_account(&self, id: &str) -> StoreResult<Option<Account>> {
        Ok(self.tables.read().accounts.iter().find(|a| a.id == id).cloned())
    }

    async fn find_account_by_username(&self, username: &str) -> StoreResult<Option<Account>> {
        Ok(self
            .tables
            .read()
            .accounts
            .iter()
            .find(|a| a.username == username)
            .cloned())
    }

    async fn insert_account(&self, account: Account) -> StoreResult<Account> {
        let mut tables = self.tables.write();
        if tables.accounts.iter().any(|a| a.username == account.username) {
            return Err(StoreError::Duplicate("username"));
        }
        tables.accounts.push(account.clone());
        Ok(account)
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}
