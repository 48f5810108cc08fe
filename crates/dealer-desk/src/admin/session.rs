use std::sync::{Arc, RwLock};

use chrono::{DateTime, Duration, Utc};

use crate::config::{AdminConfig, MAX_SESSION_TTL_MINUTES};

/// An operator session established by the external identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession {
    pub subject: String,
    pub expires_at: DateTime<Utc>,
}

impl AdminSession {
    pub fn new(subject: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            subject: subject.into(),
            expires_at,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Unauthorized {
    #[error("no admin session")]
    Missing,
    #[error("admin session expired")]
    Expired,
}

/// Shared holder of the current admin session.
///
/// The identity layer pushes changes through [`SessionContext::subscriber`]; the console
/// reads it through [`SessionContext::require`] before every operation.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    current: Arc<RwLock<Option<AdminSession>>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: AdminSession) -> Self {
        let context = Self::new();
        context.update(Some(session));
        context
    }

    /// Replace the current session; `None` signs the operator out.
    pub fn update(&self, session: Option<AdminSession>) {
        *self.current.write().expect("session lock poisoned") = session;
    }

    /// Session-change callback to hand to the identity provider.
    pub fn subscriber(&self) -> impl Fn(Option<AdminSession>) + Send + Sync + 'static {
        let context = self.clone();
        move |session| context.update(session)
    }

    pub fn current(&self) -> Option<AdminSession> {
        self.current.read().expect("session lock poisoned").clone()
    }

    pub fn require(&self) -> Result<AdminSession, Unauthorized> {
        self.require_at(Utc::now())
    }

    pub fn require_at(&self, now: DateTime<Utc>) -> Result<AdminSession, Unauthorized> {
        match self.current() {
            None => Err(Unauthorized::Missing),
            Some(session) if session.is_expired_at(now) => Err(Unauthorized::Expired),
            Some(session) => Ok(session),
        }
    }
}

/// Checks a bearer credential presented on an admin request.
pub trait SessionVerifier: Send + Sync {
    fn verify(&self, bearer: &str) -> Result<AdminSession, Unauthorized>;
}

/// Accepts a single configured API token and issues sessions valid for a fixed TTL.
/// Without a configured token every credential is refused.
#[derive(Clone)]
pub struct StaticTokenVerifier {
    token: Option<String>,
    ttl: Duration,
}

impl StaticTokenVerifier {
    pub fn new(token: Option<String>, ttl: Duration) -> Self {
        Self { token, ttl }
    }

    /// TTLs above [`MAX_SESSION_TTL_MINUTES`] are clamped.
    pub fn from_config(config: &AdminConfig) -> Self {
        let minutes = config.session_ttl_minutes.min(MAX_SESSION_TTL_MINUTES);
        let ttl = i64::try_from(minutes)
            .ok()
            .and_then(Duration::try_minutes)
            .unwrap_or_else(|| Duration::minutes(60));
        Self::new(config.api_token.clone(), ttl)
    }
}

impl std::fmt::Debug for StaticTokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenVerifier")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl SessionVerifier for StaticTokenVerifier {
    fn verify(&self, bearer: &str) -> Result<AdminSession, Unauthorized> {
        match &self.token {
            Some(expected) if constant_time_eq(expected.as_bytes(), bearer.trim().as_bytes()) => {
                let expires_at = Utc::now()
                    .checked_add_signed(self.ttl)
                    .ok_or(Unauthorized::Expired)?;
                Ok(AdminSession::new("admin", expires_at))
            }
            _ => Err(Unauthorized::Missing),
        }
    }
}

fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    left.iter()
        .zip(right)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
