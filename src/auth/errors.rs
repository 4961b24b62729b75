//! Authentication Errors
//! Mission: One closed set of failure kinds, translated to HTTP at a single boundary

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

pub const MISSING_CREDENTIALS: &str = "Username and password are required";
pub const NO_TOKEN: &str = "No token provided";
pub const BAD_TOKEN_FORMAT: &str = "Invalid token format. Use: Bearer <token>";
pub const BAD_TOKEN: &str = "Invalid or expired token";
pub const USER_NOT_FOUND: &str = "User not found";

pub type AuthResult<T> = Result<T, AuthError>;

/// Every failure a request can end in.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Caller input is malformed (400).
    #[error("{0}")]
    Validation(String),
    /// Unknown username or wrong password (401). Both cases are deliberately identical.
    #[error("Invalid credentials")]
    InvalidCredentials,
    /// Missing, malformed, invalid or expired bearer token (401).
    #[error("{0}")]
    Unauthenticated(&'static str),
    /// The resolved identity has no backing record (404).
    #[error("{0}")]
    NotFound(String),
    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials | AuthError::Unauthenticated(_) => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::NotFound(_) => StatusCode::NOT_FOUND,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Attached to every error response so [`error_envelope`] can add diagnostics.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub message: String,
    pub detail: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            error!("❌ Error [{}]: {:#}", status.as_u16(), self);
            if let AuthError::Internal(cause) = &self {
                error!("{:?}", cause);
            }
        } else {
            warn!("❌ Error [{}]: {}", status.as_u16(), message);
        }

        let report = ErrorReport {
            message: message.clone(),
            detail: format!("{:?}", self),
        };

        let mut response = (
            status,
            Json(json!({
                "success": false,
                "error": { "message": message },
            })),
        )
            .into_response();
        response.extensions_mut().insert(report);
        response
    }
}

/// Rewrites error bodies to include `error.detail` when diagnostics are on.
pub async fn error_envelope(State(diagnostics): State<bool>, req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    if !diagnostics {
        return response;
    }

    let Some(report) = response.extensions_mut().remove::<ErrorReport>() else {
        return response;
    };

    let status = response.status();
    (
        status,
        Json(json!({
            "success": false,
            "error": {
                "message": report.message,
                "detail": report.detail,
            },
        })),
    )
        .into_response()
}
