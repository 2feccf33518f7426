//! Bearer token issue and verification (HS256 JWT)

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::account::Account;
use crate::error::{ApiError, ApiResult};

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub sub: String, // Subject (account id)
    pub username: String,
    pub iat: usize, // Issued at
    /// Only set when a token lifetime is configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<usize>,
}

pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Option<Duration>,
}

impl TokenService {
    /// `ttl` of `None` issues tokens that never expire.
    pub fn new(secret: &str, ttl: Option<Duration>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = ttl.is_some();
        if ttl.is_some() {
            validation.required_spec_claims.insert("exp".to_string());
        }

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// Issue a token bound to `account`.
    pub fn issue(&self, account: &Account) -> ApiResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: account.id.clone(),
            username: account.username.clone(),
            iat: now.timestamp() as usize,
            exp: self
                .ttl
                .and_then(|ttl| now.checked_add_signed(ttl))
                .map(|t| t.timestamp() as usize),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ApiError::Infrastructure(anyhow::anyhow!("Failed to sign token: {}", e)))
    }

    /// Verify signature (and expiry, when configured). Does not check that
    /// the account still exists.
    pub fn verify(&self, token: &str) -> ApiResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => ApiError::authentication("token expired"),
                _ => ApiError::authentication("token invalid"),
            })
    }
}
