pub mod routes;
pub mod upload;

use crate::auth::{AuthGate, JwtHandler, PasswordVerifier, UserStore};
use crate::config::Config;
use anyhow::{Context, Result};
use axum::extract::FromRef;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub use routes::build_router;
pub use upload::UploadSettings;

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub gate: AuthGate,
    pub upload: UploadSettings,
    pub diagnostics: bool,
}

impl AppState {
    /// Seed the store, build the token handler and prepare the upload directory
    pub async fn from_config(config: &Config) -> Result<Self> {
        let verifier = PasswordVerifier::new(config.bcrypt_cost)?;
        let store = UserStore::seeded(&verifier)
            .await?
            .with_latency(Duration::from_millis(config.store_latency_ms));
        let jwt = JwtHandler::new(&config.jwt_secret).with_validity(config.jwt_validity);

        tokio::fs::create_dir_all(&config.upload_dir)
            .await
            .with_context(|| {
                format!(
                    "Failed to create upload directory {}",
                    config.upload_dir.display()
                )
            })?;

        info!(
            "🔐 Authentication initialized (token validity {}s, diagnostics {})",
            config.jwt_validity.num_seconds(),
            config.diagnostics()
        );

        Ok(Self {
            gate: AuthGate::new(Arc::new(store), verifier, Arc::new(jwt)),
            upload: UploadSettings {
                dir: config.upload_dir.clone(),
                max_bytes: config.upload_max_bytes,
            },
            diagnostics: config.diagnostics(),
        })
    }
}

impl FromRef<AppState> for AuthGate {
    fn from_ref(state: &AppState) -> Self {
        state.gate.clone()
    }
}

impl FromRef<AppState> for UploadSettings {
    fn from_ref(state: &AppState) -> Self {
        state.upload.clone()
    }
}
