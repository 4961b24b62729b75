//! Router assembly and the small public endpoints.

use crate::api::{upload, AppState};
use crate::auth::{api as auth_api, errors::error_envelope, AuthError};
use crate::middleware::request_logging;
use axum::{
    extract::DefaultBodyLimit,
    http::{Method, Uri},
    middleware,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

/// Headroom for multipart boundaries and part headers on top of the file cap
const MULTIPART_OVERHEAD: usize = 16 * 1024;

pub fn build_router(state: AppState) -> Router {
    let diagnostics = state.diagnostics;
    let upload_limit = state.upload.max_bytes + MULTIPART_OVERHEAD;

    let public_routes = Router::new()
        .route("/", get(welcome))
        .route("/health", get(health_check));

    let auth_routes = Router::new()
        .route("/api/auth/login", post(auth_api::login))
        .route("/api/auth/profile", get(auth_api::profile))
        .route("/api/auth/dashboard", get(auth_api::dashboard));

    let upload_routes = Router::new()
        .route("/upload", post(upload::upload_avatar))
        .layer(DefaultBodyLimit::max(upload_limit));

    Router::new()
        .merge(public_routes)
        .merge(auth_routes)
        .merge(upload_routes)
        .fallback(route_not_found)
        .layer(middleware::from_fn_with_state(diagnostics, error_envelope))
        .layer(middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn welcome() -> Json<Value> {
    Json(json!({
        "message": "Welcome to Auth API Demo",
        "endpoints": {
            "login": "POST /api/auth/login",
            "profile": "GET /api/auth/profile (protected)",
            "dashboard": "GET /api/auth/dashboard (protected)",
            "upload": "POST /upload (multipart, field: avatar)",
        },
        "credentials": {
            "username": "admin",
            "password": "admin",
        },
        "example": {
            "login": {
                "method": "POST",
                "url": "/api/auth/login",
                "body": { "username": "admin", "password": "admin" },
            },
        },
    }))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

async fn route_not_found(method: Method, uri: Uri) -> AuthError {
    AuthError::NotFound(format!("Route {} {} not found", method, uri))
}
