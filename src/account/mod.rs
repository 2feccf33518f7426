//! Account management module

pub mod models;

// Re-export commonly used types
pub use models::{
    Account, AccountListing, AccountResponse, LoginRequest, LoginResponse, MIN_PASSWORD_LEN,
    OwnedPostSummary, RegisterRequest,
};
