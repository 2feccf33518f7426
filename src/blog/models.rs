//! Post types
//!
//! - `Post`: stored record, also the body returned by create and update
//! - `PostListing`: post with its owner expanded, returned by list
//! - `CreatePostRequest` / `UpdatePostRequest`: HTTP input

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Stored post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Post {
    #[schema(example = "5d2c7a8e-0f1b-4c1e-8a55-02b2f1e0d9aa")]
    pub id: String,
    #[schema(example = "Favourite food")]
    pub title: String,
    #[schema(example = "John Smith")]
    pub author: String,
    #[schema(example = "http://something.com")]
    pub url: String,
    #[schema(example = 10)]
    pub likes: i64,
    /// Owning account id. Absent on legacy records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl Post {
    /// Apply the fields present in `patch`, leaving the others untouched.
    pub fn apply(&mut self, patch: &PostPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(author) = &patch.author {
            self.author = author.clone();
        }
        if let Some(url) = &patch.url {
            self.url = url.clone();
        }
        if let Some(likes) = patch.likes {
            self.likes = likes;
        }
    }

    /// Whether `account_id` owns this post.
    pub fn is_owned_by(&self, account_id: &str) -> bool {
        self.user.as_deref().map(str::trim) == Some(account_id.trim())
    }
}

/// Field replacement for an existing post
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<i64>,
}

/// Owner projection embedded in a post listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OwnerSummary {
    pub id: String,
    #[schema(example = "alice123")]
    pub username: String,
    #[schema(example = "Alice Johnson")]
    pub name: String,
}

/// Post with its owner expanded
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostListing {
    pub id: String,
    pub title: String,
    pub author: String,
    pub url: String,
    pub likes: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<OwnerSummary>,
}

/// Create Post Request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreatePostRequest {
    #[validate(
        required(message = "title is required"),
        length(min = 1, message = "title must not be empty")
    )]
    #[schema(example = "Travel")]
    pub title: Option<String>,
    #[validate(
        required(message = "author is required"),
        length(min = 1, message = "author must not be empty")
    )]
    #[schema(example = "Liza Simpson")]
    pub author: Option<String>,
    #[validate(
        required(message = "url is required"),
        length(min = 1, message = "url must not be empty")
    )]
    #[schema(example = "http://somethingelse.com")]
    pub url: Option<String>,
    /// Defaults to 0
    #[schema(example = 30)]
    pub likes: Option<i64>,
}

/// Update Post Request. Omitted fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<i64>,
}

impl From<UpdatePostRequest> for PostPatch {
    fn from(req: UpdatePostRequest) -> Self {
        Self {
            title: req.title,
            author: req.author,
            url: req.url,
            likes: req.likes,
        }
    }
}
