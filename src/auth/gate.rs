//! Authentication Gate
//! Mission: Decide who is calling - login mints tokens, authorize checks them
//!
//! Both flows are stateless per request. Handlers call into the gate and
//! branch on the returned `Result`.

use crate::auth::errors::{
    AuthError, AuthResult, BAD_TOKEN, BAD_TOKEN_FORMAT, MISSING_CREDENTIALS, NO_TOKEN,
    USER_NOT_FOUND,
};
use crate::auth::jwt::{JwtHandler, TokenError};
use crate::auth::models::{
    DashboardData, DashboardStats, Identity, LoginData, LoginRequest, User, UserResponse,
};
use crate::auth::password::PasswordVerifier;
use crate::auth::user_store::CredentialStore;
use axum::http::{header::AUTHORIZATION, HeaderMap};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Placeholder until logins are actually counted
const DEMO_LOGIN_COUNT: u64 = 42;

#[derive(Clone)]
pub struct AuthGate {
    store: Arc<dyn CredentialStore>,
    verifier: PasswordVerifier,
    jwt: Arc<JwtHandler>,
}

impl AuthGate {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        verifier: PasswordVerifier,
        jwt: Arc<JwtHandler>,
    ) -> Self {
        Self {
            store,
            verifier,
            jwt,
        }
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// Login flow: validate, look up, compare, mint
    pub async fn login(&self, request: &LoginRequest) -> AuthResult<LoginData> {
        if request.username.is_empty() || request.password.is_empty() {
            return Err(AuthError::Validation(MISSING_CREDENTIALS.to_string()));
        }

        info!("🔐 Login attempt: {}", request.username);

        let Some(user) = self.store.find_by_username(&request.username).await? else {
            // Same bcrypt work as a real comparison so timing does not reveal the miss
            self.verifier.hash(&request.password).await?;
            warn!("❌ Failed login attempt: {}", request.username);
            return Err(AuthError::InvalidCredentials);
        };

        if !self
            .verifier
            .verify(&request.password, &user.password_hash)
            .await?
        {
            warn!("❌ Failed login attempt: {}", request.username);
            return Err(AuthError::InvalidCredentials);
        }

        let issued = self.jwt.issue(&user)?;

        info!(
            "✅ Login successful: {} ({}), token valid for {}s",
            user.username,
            user.role.as_str(),
            issued.expires_in
        );

        Ok(LoginData {
            user: UserResponse::from_user(&user),
            token: issued.token,
        })
    }

    /// Authorization flow: header → bearer token → verified identity
    pub fn authorize(&self, headers: &HeaderMap) -> AuthResult<Identity> {
        let header = headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::Unauthenticated(NO_TOKEN))?;

        let token = header
            .to_str()
            .ok()
            .and_then(bearer_token)
            .ok_or(AuthError::Unauthenticated(BAD_TOKEN_FORMAT))?;

        let claims = self.jwt.verify(token).map_err(|e| {
            match e {
                TokenError::Expired => debug!("Bearer token expired"),
                TokenError::Invalid => debug!("Bearer token failed verification"),
            }
            AuthError::Unauthenticated(BAD_TOKEN)
        })?;

        Identity::from_claims(&claims).ok_or(AuthError::Unauthenticated(BAD_TOKEN))
    }

    /// Current record for an authenticated caller
    pub async fn current_user(&self, identity: &Identity) -> AuthResult<User> {
        self.store
            .find_by_id(identity.id)
            .await?
            .ok_or_else(|| AuthError::NotFound(USER_NOT_FOUND.to_string()))
    }

    pub async fn profile(&self, identity: &Identity) -> AuthResult<UserResponse> {
        let user = self.current_user(identity).await?;
        Ok(UserResponse::from_user(&user))
    }

    pub async fn dashboard(&self, identity: &Identity) -> AuthResult<DashboardData> {
        let user = self.current_user(identity).await?;
        let now = Utc::now();
        let account_age_days = whole_days_between(user.created_at, now);

        Ok(DashboardData {
            welcome: format!("Welcome back, {}!", user.username),
            role: user.role,
            stats: DashboardStats {
                login_count: DEMO_LOGIN_COUNT,
                last_login: now,
                account_age: format!("{} days", account_age_days),
            },
        })
    }
}

/// Floored day count, negative when `from` is in the future
fn whole_days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_seconds().div_euclid(86_400)
}

/// Second space-separated word of `Bearer <token>`
fn bearer_token(value: &str) -> Option<&str> {
    let mut parts = value.split(' ');
    let scheme = parts.next()?;
    let token = parts.next()?;
    (scheme == "Bearer" && !token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::{Claims, UserRole};
    use crate::auth::password::MIN_COST;
    use crate::auth::user_store::{UserStore, SEED_USERS};
    use axum::http::HeaderValue;
    use chrono::Duration;
    use std::time::Instant;

    const SECRET: &str = "gate-test-secret";

    async fn create_test_gate() -> AuthGate {
        let verifier = PasswordVerifier::new(MIN_COST).unwrap();
        let store = UserStore::seeded(&verifier).await.unwrap();
        AuthGate::new(
            Arc::new(store),
            verifier,
            Arc::new(JwtHandler::new(SECRET)),
        )
    }

    fn login_request(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        headers
    }

    fn raw_authorization(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[tokio::test]
    async fn test_every_seed_user_can_login_and_authorize() {
        let gate = create_test_gate().await;

        for seed in SEED_USERS {
            let data = gate
                .login(&login_request(seed.username, seed.password))
                .await
                .unwrap();
            assert_eq!(data.user.username, seed.username);

            let identity = gate.authorize(&bearer(&data.token)).unwrap();
            assert_eq!(identity.id, seed.id);
            assert_eq!(identity.role, seed.role);
        }
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_are_indistinguishable() {
        let gate = create_test_gate().await;

        let wrong_password = gate
            .login(&login_request("admin", "not-admin"))
            .await
            .unwrap_err();
        let unknown_user = gate
            .login(&login_request("nobody", "admin"))
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_user, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.status(), unknown_user.status());
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[tokio::test]
    async fn test_empty_fields_fail_validation() {
        let gate = create_test_gate().await;

        for (username, password) in [("", "admin"), ("admin", ""), ("", "")] {
            let err = gate
                .login(&login_request(username, password))
                .await
                .unwrap_err();
            assert!(matches!(err, AuthError::Validation(ref m) if m == MISSING_CREDENTIALS));
        }
    }

    #[tokio::test]
    async fn test_missing_header() {
        let gate = create_test_gate().await;

        let err = gate.authorize(&HeaderMap::new()).unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated(NO_TOKEN)));
    }

    #[tokio::test]
    async fn test_malformed_header() {
        let gate = create_test_gate().await;

        for value in ["Bearer", "Bearer ", "Basic abc", "bearer abc", "Token"] {
            let err = gate.authorize(&raw_authorization(value)).unwrap_err();
            assert!(
                matches!(err, AuthError::Unauthenticated(BAD_TOKEN_FORMAT)),
                "header {:?}",
                value
            );
        }
    }

    #[tokio::test]
    async fn test_expired_and_forged_tokens_fail_identically() {
        let gate = create_test_gate().await;
        let admin = gate.store().find_by_id(1).await.unwrap().unwrap();

        let expired = JwtHandler::new(SECRET)
            .with_validity(Duration::minutes(-10))
            .issue(&admin)
            .unwrap();
        let forged = JwtHandler::new("some-other-key").issue(&admin).unwrap();

        let expired_err = gate.authorize(&bearer(&expired.token)).unwrap_err();
        let forged_err = gate.authorize(&bearer(&forged.token)).unwrap_err();

        assert!(matches!(expired_err, AuthError::Unauthenticated(BAD_TOKEN)));
        assert!(matches!(forged_err, AuthError::Unauthenticated(BAD_TOKEN)));
    }

    #[tokio::test]
    async fn test_non_numeric_subject_rejected() {
        let gate = create_test_gate().await;
        let now = Utc::now().timestamp();
        let token = JwtHandler::new(SECRET)
            .sign(&Claims {
                sub: "admin".to_string(),
                username: "admin".to_string(),
                role: UserRole::Administrator,
                iat: now,
                exp: now + 60,
            })
            .unwrap();

        let err = gate.authorize(&bearer(&token)).unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated(BAD_TOKEN)));
    }

    #[tokio::test]
    async fn test_profile_and_dashboard() {
        let gate = create_test_gate().await;
        let identity = Identity {
            id: 1,
            username: "admin".to_string(),
            role: UserRole::Administrator,
        };

        let profile = gate.profile(&identity).await.unwrap();
        assert_eq!(profile.email, "admin@example.com");

        let dashboard = gate.dashboard(&identity).await.unwrap();
        assert_eq!(dashboard.welcome, "Welcome back, admin!");
        assert_eq!(dashboard.role, UserRole::Administrator);
        assert_eq!(dashboard.stats.login_count, 42);
        assert!(dashboard.stats.account_age.ends_with(" days"));
    }

    #[tokio::test]
    async fn test_deleted_subject_is_not_found() {
        let gate = create_test_gate().await;
        let ghost = Identity {
            id: 404,
            username: "ghost".to_string(),
            role: UserRole::User,
        };

        let err = gate.profile(&ghost).await.unwrap_err();
        assert!(matches!(err, AuthError::NotFound(ref m) if m == USER_NOT_FOUND));
        assert!(gate.dashboard(&ghost).await.is_err());
    }

    #[tokio::test]
    async fn test_unknown_user_pays_the_hashing_cost() {
        let verifier = PasswordVerifier::new(10).unwrap();
        let store = UserStore::seeded(&verifier).await.unwrap();
        let gate = AuthGate::new(
            Arc::new(store),
            verifier,
            Arc::new(JwtHandler::new(SECRET)),
        );

        let started = Instant::now();
        let _ = gate.login(&login_request("admin", "not-admin")).await;
        let wrong_password = started.elapsed();

        let started = Instant::now();
        let _ = gate.login(&login_request("nobody", "not-admin")).await;
        let unknown_user = started.elapsed();

        assert!(
            unknown_user * 4 >= wrong_password,
            "unknown user {:?} vs wrong password {:?}",
            unknown_user,
            wrong_password
        );
    }

    #[test]
    fn test_account_age_is_floored() {
        let now = Utc::now();

        assert_eq!(whole_days_between(now - Duration::hours(49), now), 2);
        assert_eq!(whole_days_between(now, now), 0);
        assert_eq!(whole_days_between(now + Duration::hours(1), now), -1);
        assert_eq!(whole_days_between(now + Duration::hours(25), now), -2);
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("Bearer  abc"), None);
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token("Basic abc"), None);
    }
}
