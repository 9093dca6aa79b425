use std::time::Duration;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, warn};

use crate::{
    config::{SessionConfig, MAX_SESSION_TTL_MINUTES},
    error::AppError,
    state::AppState,
};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Worker,
}

/// Session token payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,   // user id
    pub role: Role, // login path used
    pub exp: usize,
    pub iat: usize,
    pub iss: String,
    pub aud: String,
}

#[derive(Clone)]
pub struct SessionKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub ttl: Duration,
}

impl FromRef<AppState> for SessionKeys {
    fn from_ref(state: &AppState) -> Self {
        let SessionConfig {
            secret,
            issuer,
            audience,
            ttl_minutes,
        } = state.config.session.clone();
        let ttl_minutes = ttl_minutes.clamp(1, MAX_SESSION_TTL_MINUTES).unsigned_abs();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            audience,
            ttl: Duration::from_secs(ttl_minutes * 60),
        }
    }
}

impl SessionKeys {
    pub fn ttl_seconds(&self) -> u64 {
        self.ttl.as_secs()
    }

    pub fn sign(&self, user_id: i32, role: Role) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            sub: user_id,
            role,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id, role = ?role, "session signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = data.claims.sub, role = ?data.claims.role, "session verified");
        Ok(data.claims)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminSession {
    pub user_id: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSession {
    pub user_id: i32,
}

/// The logged-in identity for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Session {
    Admin(AdminSession),
    Worker(WorkerSession),
}

impl AdminSession {
    /// Admins may read any user, or everyone when nothing is requested.
    pub fn readable_user(&self, requested: Option<i32>) -> Option<i32> {
        requested
    }

    /// Admins record on behalf of a user, so the owner must be named.
    pub fn record_owner(&self, requested: Option<i32>) -> Result<i32, AppError> {
        requested.ok_or_else(|| AppError::validation("user_id is required"))
    }
}

impl WorkerSession {
    /// Workers only ever see their own data.
    pub fn readable_user(&self, requested: Option<i32>) -> Result<i32, AppError> {
        match requested {
            Some(id) if id != self.user_id => Err(AppError::Forbidden),
            _ => Ok(self.user_id),
        }
    }

    pub fn record_owner(&self, requested: Option<i32>) -> Result<i32, AppError> {
        self.readable_user(requested)
    }
}

impl Session {
    pub fn from_claims(claims: &Claims) -> Self {
        match claims.role {
            Role::Admin => Session::Admin(AdminSession {
                user_id: claims.sub,
            }),
            Role::Worker => Session::Worker(WorkerSession {
                user_id: claims.sub,
            }),
        }
    }

    pub fn user_id(&self) -> i32 {
        match self {
            Session::Admin(a) => a.user_id,
            Session::Worker(w) => w.user_id,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Session::Admin(_) => Role::Admin,
            Session::Worker(_) => Role::Worker,
        }
    }

    /// User filter this session may query with; `None` means all users.
    pub fn readable_user(&self, requested: Option<i32>) -> Result<Option<i32>, AppError> {
        match self {
            Session::Admin(a) => Ok(a.readable_user(requested)),
            Session::Worker(w) => w.readable_user(requested).map(Some),
        }
    }

    /// Single user this session may inspect (stats, earnings).
    pub fn inspect_user(&self, requested: i32) -> Result<i32, AppError> {
        match self {
            Session::Admin(_) => Ok(requested),
            Session::Worker(w) => w.readable_user(Some(requested)),
        }
    }

    pub fn record_owner(&self, requested: Option<i32>) -> Result<i32, AppError> {
        match self {
            Session::Admin(a) => a.record_owner(requested),
            Session::Worker(w) => w.record_owner(requested),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    SessionKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = SessionKeys::from_ref(state);
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthenticated("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .ok_or(AppError::Unauthenticated("Invalid Authorization header"))?;

        let claims = match keys.verify(token) {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "invalid or expired session");
                return Err(AppError::Unauthenticated("Invalid or expired session"));
            }
        };

        Ok(Session::from_claims(&claims))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
    SessionKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Session::from_request_parts(parts, state).await? {
            Session::Admin(admin) => Ok(admin),
            Session::Worker(worker) => {
                warn!(user_id = worker.user_id, "worker session on admin route");
                Err(AppError::Forbidden)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> SessionKeys {
        SessionKeys::from_ref(&AppState::fake())
    }

    #[tokio::test]
    async fn sign_and_verify_roundtrip() {
        let keys = keys();
        let token = keys.sign(42, Role::Worker).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, Role::Worker);
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-aud");
        assert!(claims.exp > claims.iat);
    }

    #[tokio::test]
    async fn verify_rejects_other_audience_and_garbage() {
        let good = keys();
        let mut other = keys();
        other.audience = "someone-else".into();
        let token = good.sign(1, Role::Admin).unwrap();
        assert!(other.verify(&token).is_err());
        assert!(good.verify("not.a.token").is_err());
    }

    #[tokio::test]
    async fn oversized_ttl_is_clamped_before_signing() {
        let mut state = AppState::fake();
        let mut config = (*state.config).clone();
        config.session.ttl_minutes = i64::MAX;
        state.config = std::sync::Arc::new(config);

        let keys = SessionKeys::from_ref(&state);
        assert_eq!(keys.ttl_seconds(), MAX_SESSION_TTL_MINUTES as u64 * 60);
        let token = keys.sign(3, Role::Worker).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, 3);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn claims_map_to_tagged_session() {
        let admin = Claims {
            sub: 7,
            role: Role::Admin,
            exp: 0,
            iat: 0,
            iss: String::new(),
            aud: String::new(),
        };
        assert_eq!(
            Session::from_claims(&admin),
            Session::Admin(AdminSession { user_id: 7 })
        );
        assert_eq!(Session::from_claims(&admin).role(), Role::Admin);
    }

    #[test]
    fn worker_scope_is_pinned_to_self() {
        let s = Session::Worker(WorkerSession { user_id: 5 });
        assert_eq!(s.readable_user(None).unwrap(), Some(5));
        assert_eq!(s.readable_user(Some(5)).unwrap(), Some(5));
        assert!(matches!(s.readable_user(Some(6)), Err(AppError::Forbidden)));
        assert_eq!(s.record_owner(None).unwrap(), 5);
        assert!(matches!(s.record_owner(Some(9)), Err(AppError::Forbidden)));
        assert!(matches!(s.inspect_user(9), Err(AppError::Forbidden)));
        assert_eq!(s.inspect_user(5).unwrap(), 5);
    }

    #[test]
    fn admin_scope_is_open_but_owner_is_explicit() {
        let s = Session::Admin(AdminSession { user_id: 1 });
        assert_eq!(s.readable_user(None).unwrap(), None);
        assert_eq!(s.readable_user(Some(9)).unwrap(), Some(9));
        assert_eq!(s.inspect_user(9).unwrap(), 9);
        assert_eq!(s.record_owner(Some(9)).unwrap(), 9);
        assert!(matches!(s.record_owner(None), Err(AppError::Validation(_))));
    }
}
