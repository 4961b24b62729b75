//! Password Verifier
//! Mission: Compare submitted secrets against salted bcrypt hashes off the async runtime

use anyhow::{Context, Result};

/// Work factor used when none is configured
pub const DEFAULT_COST: u32 = 10;
/// Lowest work factor bcrypt accepts
pub const MIN_COST: u32 = 4;
/// Highest work factor bcrypt accepts
pub const MAX_COST: u32 = 31;

/// bcrypt-backed credential verifier
#[derive(Debug, Clone, Copy)]
pub struct PasswordVerifier {
    cost: u32,
}

impl Default for PasswordVerifier {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl PasswordVerifier {
    pub fn new(cost: u32) -> Result<Self> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            anyhow::bail!("bcrypt cost {} outside {}..={}", cost, MIN_COST, MAX_COST);
        }
        Ok(Self { cost })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a plaintext secret with a fresh salt
    pub async fn hash(&self, plaintext: &str) -> Result<String> {
        let plaintext = plaintext.to_owned();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, cost))
            .await
            .context("Password hashing task failed")?
            .context("Failed to hash password")
    }

    /// Returns `Ok(false)` on mismatch; a malformed stored hash is an error.
    pub async fn verify(&self, plaintext: &str, stored_hash: &str) -> Result<bool> {
        let plaintext = plaintext.to_owned();
        let stored_hash = stored_hash.to_owned();
        tokio::task::spawn_blocking(move || bcrypt::verify(plaintext, &stored_hash))
            .await
            .context("Password verification task failed")?
            .context("Failed to verify password")
    }
}
