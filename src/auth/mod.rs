//! Authentication Module
//! Mission: Login with username/password, JWT-gated profile and dashboard access

pub mod api;
pub mod errors;
pub mod gate;
pub mod jwt;
pub mod models;
pub mod password;
pub mod user_store;

pub use errors::{AuthError, AuthResult};
pub use gate::AuthGate;
pub use jwt::JwtHandler;
pub use password::PasswordVerifier;
pub use user_store::{CredentialStore, UserStore};
