//! Authentication Models
//! Mission: Define user, credential and token data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// User account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // bcrypt hash - never serialize
    pub role: UserRole,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// User roles
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum UserRole {
    #[serde(rename = "administrator")]
    Administrator,
    #[serde(rename = "user")]
    User,
}

impl UserRole {
    pub fn as_str(&self) -> &str {
        match self {
            UserRole::Administrator => "administrator",
            UserRole::User => "user",
        }
    }
}

/// JWT Claims payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String, // subject (user id, decimal)
    pub username: String,
    pub role: UserRole,
    pub iat: i64,
    pub exp: i64,
}

/// The verified caller of a protected request, projected from its token claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: i64,
    pub username: String,
    pub role: UserRole,
}

impl Identity {
    /// Returns `None` when the subject is not a user id.
    pub fn from_claims(claims: &Claims) -> Option<Self> {
        let id = claims.sub.parse::<i64>().ok()?;
        Some(Self {
            id,
            username: claims.username.clone(),
            role: claims.role,
        })
    }
}

/// Login request body
///
/// Both fields default to empty so that a missing field is reported as a
/// validation failure instead of a body rejection.
#[derive(Deserialize, Default)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful login payload
#[derive(Debug, Serialize)]
pub struct LoginData {
    pub user: UserResponse,
    pub token: String,
}

/// User response (sanitized)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub role: UserRole,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl UserResponse {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
            email: user.email.clone(),
            created_at: user.created_at,
        }
    }
}

/// Dashboard payload for the signed-in user
#[derive(Debug, Serialize)]
pub struct DashboardData {
    pub welcome: String,
    pub role: UserRole,
    pub stats: DashboardStats,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub login_count: u64,
    pub last_login: DateTime<Utc>,
    pub account_age: String,
}
