//! Data models for accounts

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use validator::Validate;

/// Minimum accepted password length, in characters
pub const MIN_PASSWORD_LEN: usize = 3;

/// Stored account record.
///
/// Holds the password hash, so it has no `Serialize` impl. Outward
/// representations go through [`AccountResponse`] or [`AccountListing`].
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    pub id: String,
    pub username: String,
    /// Display name
    pub name: String,
    pub password_hash: String,
    /// Back-references to posts created by this account, in creation order
    pub blogs: Vec<String>,
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("name", &self.name)
            .field("password_hash", &"<redacted>")
            .field("blogs", &self.blogs)
            .finish()
    }
}

/// Account as returned by registration
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccountResponse {
    #[schema(example = "0b7f3c1e-6a7d-4c65-9a43-4cb1d0d4e1f2")]
    pub id: String,
    #[schema(example = "alice123")]
    pub username: String,
    #[schema(example = "Alice Johnson")]
    pub name: String,
    pub blogs: Vec<String>,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.clone(),
            username: account.username.clone(),
            name: account.name.clone(),
            blogs: account.blogs.clone(),
        }
    }
}

/// Post summary embedded in an account listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OwnedPostSummary {
    pub id: String,
    pub url: String,
    pub title: String,
    pub author: String,
}

/// Account with its owned posts expanded
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccountListing {
    pub id: String,
    pub username: String,
    pub name: String,
    pub blogs: Vec<OwnedPostSummary>,
}

/// Account Registration Request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(
        required(message = "username is required"),
        length(min = 3, message = "username must be at least 3 characters long")
    )]
    #[schema(example = "alice123")]
    pub username: Option<String>,
    #[schema(example = "Alice Johnson")]
    pub name: Option<String>,
    #[schema(example = "alicePassword")]
    pub password: Option<String>,
}

/// Login Request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "alice123")]
    pub username: String,
    #[schema(example = "alicePassword")]
    pub password: String,
}

/// Login Response (bearer token)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub name: String,
}
