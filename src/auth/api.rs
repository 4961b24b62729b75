//! Authentication API Endpoints
//! Mission: Expose login, profile and dashboard over HTTP

use crate::auth::{
    errors::{AuthError, AuthResult, MISSING_CREDENTIALS},
    gate::AuthGate,
    models::{DashboardData, LoginData, LoginRequest, UserResponse},
};
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request, State},
    http::{header::CONTENT_TYPE, HeaderMap},
    Form, Json,
};
use serde::Serialize;

/// Success envelope: `{success: true, [message], data}`
#[derive(Debug, Serialize)]
pub struct ApiSuccess<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub data: T,
}

impl<T> ApiSuccess<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }

    pub fn with_message(message: &'static str, data: T) -> Self {
        Self {
            success: true,
            message: Some(message),
            data,
        }
    }
}

/// Login endpoint - POST /api/auth/login
///
/// Accepts a JSON body or an `application/x-www-form-urlencoded` form.
pub async fn login(
    State(gate): State<AuthGate>,
    request: Request,
) -> AuthResult<Json<ApiSuccess<LoginData>>> {
    let request = login_payload(request).await?;
    let data = gate.login(&request).await?;
    Ok(Json(ApiSuccess::with_message("Login successful", data)))
}

async fn login_payload(request: Request) -> AuthResult<LoginRequest> {
    let is_form = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/x-www-form-urlencoded"));

    if is_form {
        return match Form::<LoginRequest>::from_request(request, &()).await {
            Ok(Form(login)) => Ok(login),
            Err(rejection) => Err(unreadable_body(rejection.body_text())),
        };
    }

    match Json::<LoginRequest>::from_request(request, &()).await {
        Ok(Json(login)) => Ok(login),
        // No body or an unknown content type reads as an empty form
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(LoginRequest::default()),
        Err(rejection) => Err(unreadable_body(rejection.body_text())),
    }
}

fn unreadable_body(detail: String) -> AuthError {
    AuthError::Validation(format!("{}: {}", MISSING_CREDENTIALS, detail))
}

/// Profile endpoint - GET /api/auth/profile (protected)
pub async fn profile(
    State(gate): State<AuthGate>,
    headers: HeaderMap,
) -> AuthResult<Json<ApiSuccess<UserResponse>>> {
    let identity = gate.authorize(&headers)?;
    let profile = gate.profile(&identity).await?;
    Ok(Json(ApiSuccess::new(profile)))
}

/// Dashboard endpoint - GET /api/auth/dashboard (protected)
pub async fn dashboard(
    State(gate): State<AuthGate>,
    headers: HeaderMap,
) -> AuthResult<Json<ApiSuccess<DashboardData>>> {
    let identity = gate.authorize(&headers)?;
    let dashboard = gate.dashboard(&identity).await?;
    Ok(Json(ApiSuccess::new(dashboard)))
}
