use anyhow::Context;
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use std::sync::Arc;
use validator::Validate;

use crate::account::{Account, AccountListing, MIN_PASSWORD_LEN, RegisterRequest};
use crate::error::{ApiError, ApiResult};
use crate::store::{self, Repository};

/// Uniform failure message for unknown users and wrong passwords
pub const INVALID_CREDENTIALS: &str = "invalid username or password";

fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Hashing failed: {}", e))?
        .to_string();
    Ok(hash)
}

fn password_matches(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::error!("Stored password hash is malformed: {}", e);
            false
        }
    }
}

/// Account records and password checks
pub struct CredentialStore {
    repo: Arc<dyn Repository>,
}

impl CredentialStore {
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        Self { repo }
    }

    /// Register a new account
    pub async fn register(&self, req: RegisterRequest) -> ApiResult<Account> {
        // 1. Password length, before any hashing work
        let password = req.password.clone().unwrap_or_default();
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ApiError::validation(format!(
                "password must be at least {} characters long",
                MIN_PASSWORD_LEN
            )));
        }

        // 2. Username rules
        req.validate()?;
        let username = req.username.unwrap_or_default();

        if self.repo.find_account_by_username(&username).await?.is_some() {
            return Err(store::StoreError::Duplicate("username").into());
        }

        // 3. Hash off the async workers
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .context("Password hashing task failed")??;

        // 4. Persist. A concurrent registration can still lose the race here.
        let account = Account {
            id: store::new_id(),
            username,
            name: req.name.unwrap_or_default(),
            password_hash,
            blogs: Vec::new(),
        };
        let account = self.repo.insert_account(account).await?;

        tracing::info!(account_id = %account.id, username = %account.username, "Account registered");
        Ok(account)
    }

    /// Check a username/password pair
    pub async fn verify(&self, username: &str, password: &str) -> ApiResult<Account> {
        let account = self
            .repo
            .find_account_by_username(username)
            .await?
            .ok_or_else(|| ApiError::authentication(INVALID_CREDENTIALS))?;

        let hash = account.password_hash.clone();
        let password = password.to_owned();
        let ok = tokio::task::spawn_blocking(move || password_matches(&password, &hash))
            .await
            .context("Password verification task failed")?;

        if !ok {
            return Err(ApiError::authentication(INVALID_CREDENTIALS));
        }
        Ok(account)
    }

    /// All accounts with their posts expanded
    pub async fn list(&self) -> ApiResult<Vec<AccountListing>> {
        let accounts = self.repo.list_accounts().await?;
        let posts = self.repo.list_posts().await?;
        Ok(store::populate_blogs(accounts, &posts))
    }
}
