//! Runtime configuration loaded from the environment (and `.env`).

use anyhow::{bail, Context, Result};
use chrono::Duration;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const FALLBACK_JWT_SECRET: &str = "fallback-secret-key-CHANGE-IN-PRODUCTION";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_validity: Duration,
    pub bcrypt_cost: u32,
    pub store_latency_ms: u64,
    pub app_env: String,
    pub upload_dir: PathBuf,
    pub upload_max_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = match get("PORT") {
            Some(v) => v.trim().parse().context("Invalid PORT")?,
            None => 3000,
        };

        let jwt_secret = get("JWT_SECRET").unwrap_or_else(|| {
            warn!("⚠️  JWT_SECRET not set - using the fallback demo key");
            FALLBACK_JWT_SECRET.to_string()
        });

        let jwt_validity = match get("JWT_EXPIRES_IN") {
            Some(v) => parse_validity(&v).context("Invalid JWT_EXPIRES_IN")?,
            None => Duration::hours(24),
        };

        let bcrypt_cost = match get("BCRYPT_COST") {
            Some(v) => v.trim().parse().context("Invalid BCRYPT_COST")?,
            None => 10,
        };

        let store_latency_ms = match get("STORE_LATENCY_MS") {
            Some(v) => v.trim().parse().context("Invalid STORE_LATENCY_MS")?,
            None => 50,
        };

        let app_env = get("APP_ENV")
            .map(|v| v.trim().to_ascii_lowercase())
            .unwrap_or_else(|| "development".to_string());

        let upload_dir = get("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("uploads"));

        let upload_max_bytes = match get("UPLOAD_MAX_BYTES") {
            Some(v) => v.trim().parse().context("Invalid UPLOAD_MAX_BYTES")?,
            None => 1024 * 1024,
        };

        Ok(Self {
            host,
            port,
            jwt_secret,
            jwt_validity,
            bcrypt_cost,
            store_latency_ms,
            app_env,
            upload_dir,
            upload_max_bytes,
        })
    }

    /// Error responses carry diagnostic details only in development.
    pub fn diagnostics(&self) -> bool {
        self.app_env == "development"
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// `"3600"` (seconds) or a number with an `s`/`m`/`h`/`d` suffix, e.g. `"24h"`.
pub fn parse_validity(raw: &str) -> Result<Duration> {
    let raw = raw.trim();
    let (digits, unit) = match raw.char_indices().last() {
        Some((i, c)) if c.is_ascii_alphabetic() => (&raw[..i], c.to_ascii_lowercase()),
        Some(_) => (raw, 's'),
        None => bail!("empty duration"),
    };

    let amount: i64 = digits
        .trim()
        .parse()
        .with_context(|| format!("'{}' is not a number", digits))?;
    if amount <= 0 {
        bail!("duration must be positive");
    }

    let validity = match unit {
        's' => Duration::try_seconds(amount),
        'm' => Duration::try_minutes(amount),
        'h' => Duration::try_hours(amount),
        'd' => Duration::try_days(amount),
        other => bail!("unknown duration unit '{}'", other),
    };
    validity.context("duration out of range")
}

/// Load `.env` from the working directory, then from the crate root.
pub fn load_env() {
    let _ = dotenv::dotenv();

    let manifest_env = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    if manifest_env.exists() {
        let _ = dotenv::from_path(&manifest_env);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
        assert_eq!(config.jwt_secret, FALLBACK_JWT_SECRET);
        assert_eq!(config.jwt_validity, Duration::hours(24));
        assert_eq!(config.bcrypt_cost, 10);
        assert_eq!(config.store_latency_ms, 50);
        assert!(config.diagnostics());
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
        assert_eq!(config.upload_max_bytes, 1024 * 1024);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("JWT_SECRET", "s3cret"),
            ("JWT_EXPIRES_IN", "30m"),
            ("APP_ENV", "Production"),
            ("UPLOAD_DIR", "/tmp/avatars"),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.jwt_validity, Duration::minutes(30));
        assert!(!config.diagnostics());
        assert_eq!(config.upload_dir, PathBuf::from("/tmp/avatars"));
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = config_from(&[("JWT_SECRET", "  "), ("PORT", "")]).unwrap();
        assert_eq!(config.jwt_secret, FALLBACK_JWT_SECRET);
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_invalid_numbers_are_errors() {
        assert!(config_from(&[("PORT", "eighty")]).is_err());
        assert!(config_from(&[("BCRYPT_COST", "-1")]).is_err());
        assert!(config_from(&[("JWT_EXPIRES_IN", "soon")]).is_err());
    }

    #[test]
    fn test_parse_validity() {
        assert_eq!(parse_validity("24h").unwrap(), Duration::hours(24));
        assert_eq!(parse_validity("3600").unwrap(), Duration::seconds(3600));
        assert_eq!(parse_validity("90s").unwrap(), Duration::seconds(90));
        assert_eq!(parse_validity("7d").unwrap(), Duration::days(7));
        assert_eq!(parse_validity("15M").unwrap(), Duration::minutes(15));

        assert!(parse_validity("").is_err());
        assert!(parse_validity("0h").is_err());
        assert!(parse_validity("h").is_err());
        assert!(parse_validity("5w").is_err());
    }
}
