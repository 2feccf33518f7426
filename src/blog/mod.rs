//! Blog posts: models, owner-gated operations, HTTP handlers

pub mod handlers;
pub mod models;
pub mod service;

pub use models::{
    CreatePostRequest, OwnerSummary, Post, PostListing, PostPatch, UpdatePostRequest,
};
pub use service::{BlogService, ensure_owner};
