//! JWT Token Handler
//! Mission: Issue and verify signed, time-limited identity assertions

use crate::auth::models::{Claims, User};
use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use thiserror::Error;
use tracing::debug;

/// Why a token was refused. Callers outside this module must treat both the same.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("token invalid")]
    Invalid,
}

/// A freshly minted token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64, // seconds until expiration
}

/// JWT Handler for token operations
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    validity: Duration,
}

impl JwtHandler {
    /// Create a new JWT handler with secret key
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::default();
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            validity: Duration::hours(24), // 24-hour tokens by default
        }
    }

    pub fn with_validity(mut self, validity: Duration) -> Self {
        self.validity = validity;
        self
    }

    /// Issue a token for a user, valid from now for the configured window
    pub fn issue(&self, user: &User) -> Result<IssuedToken> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(self.validity)
            .context("Invalid timestamp")?;

        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        debug!(
            "Issuing JWT for user {} ({}), expires in {}s",
            user.username,
            user.id,
            self.validity.num_seconds()
        );

        Ok(IssuedToken {
            token: self.sign(&claims)?,
            expires_in: self.validity.num_seconds(),
        })
    }

    /// Sign pre-built claims as-is
    pub fn sign(&self, claims: &Claims) -> Result<String> {
        encode(&Header::default(), claims, &self.encoding_key).context("Failed to generate JWT")
    }

    /// Verify signature and expiry, then extract claims
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(decoded) => {
                debug!("Verified JWT for user {}", decoded.claims.username);
                Ok(decoded.claims)
            }
            Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => {
                debug!("Rejected expired JWT");
                Err(TokenError::Expired)
            }
            Err(e) => {
                debug!("Rejected invalid JWT: {}", e);
                Err(TokenError::Invalid)
            }
        }
    }
}
