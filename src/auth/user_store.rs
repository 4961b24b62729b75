//! User Storage
//! Mission: Answer user lookups against a fixed, in-memory seed set

use crate::auth::models::{User, UserResponse, UserRole};
use crate::auth::password::PasswordVerifier;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::time::Duration;
use tracing::{info, warn};

/// Read side of a user repository.
///
/// "Not found" is `Ok(None)`; the caller decides whether that is an error.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Case-sensitive, exact match
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;

    /// All users, password hashes stripped
    async fn list_all(&self) -> Result<Vec<UserResponse>>;
}

/// A seed account before its password is hashed
pub struct SeedUser {
    pub id: i64,
    pub username: &'static str,
    pub password: &'static str,
    pub role: UserRole,
    pub email: &'static str,
    pub created: (i32, u32, u32),
}

/// Demo accounts available on every start
pub const SEED_USERS: &[SeedUser] = &[
    SeedUser {
        id: 1,
        username: "admin",
        password: "admin",
        role: UserRole::Administrator,
        email: "admin@example.com",
        created: (2024, 1, 1),
    },
    SeedUser {
        id: 2,
        username: "demo",
        password: "demo1234",
        role: UserRole::User,
        email: "demo@example.com",
        created: (2024, 6, 1),
    },
];

/// Static user list with simulated lookup latency
pub struct UserStore {
    users: Vec<User>,
    latency: Duration,
}

impl UserStore {
    /// Build a store from already-hashed records
    pub fn from_users(users: Vec<User>) -> Self {
        Self {
            users,
            latency: Duration::ZERO,
        }
    }

    /// Build the store from [`SEED_USERS`], hashing each password with `verifier`
    pub async fn seeded(verifier: &PasswordVerifier) -> Result<Self> {
        let mut users = Vec::with_capacity(SEED_USERS.len());

        for seed in SEED_USERS {
            let (year, month, day) = seed.created;
            let created_at = Utc
                .with_ymd_and_hms(year, month, day, 0, 0, 0)
                .single()
                .ok_or_else(|| anyhow::anyhow!("Invalid seed date for {}", seed.username))?;

            users.push(User {
                id: seed.id,
                username: seed.username.to_string(),
                password_hash: verifier.hash(seed.password).await?,
                role: seed.role,
                email: seed.email.to_string(),
                created_at,
            });
        }

        info!(
            "🔐 Seeded {} demo users (bcrypt cost {})",
            users.len(),
            verifier.cost()
        );
        warn!("⚠️  Demo credentials are public - never deploy this store");

        Ok(Self::from_users(users))
    }

    /// Delay applied to every lookup, standing in for database I/O
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    async fn simulate_io(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl CredentialStore for UserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        self.simulate_io().await;
        Ok(self.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        self.simulate_io().await;
        Ok(self.users.iter().find(|u| u.id == id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<UserResponse>> {
        self.simulate_io().await;
        Ok(self.users.iter().map(UserResponse::from_user).collect())
    }
}
