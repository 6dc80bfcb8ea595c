//! Session state shared across concurrent calls.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::RwLock;

use crate::rest::endpoints::{DEMO_BASE_URL, LIVE_BASE_URL};

/// The trading environment a call is routed to.
///
/// Swyftx runs two distinct deployments: the live trading venue and a
/// non-financial demo sandbox. Selection is per session or per call,
/// never a process-wide variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Production trading venue.
    Live,
    /// Demo/sandbox trading venue.
    Demo,
}

impl Environment {
    /// The fixed base domain for this environment.
    pub fn base_url(self) -> &'static str {
        match self {
            Environment::Live => LIVE_BASE_URL,
            Environment::Demo => DEMO_BASE_URL,
        }
    }
}

/// Mutable session state: the current access token and selected environment.
///
/// `Session` is designed to be shared across concurrent tasks; all access
/// goes through an internal `RwLock`. The token is replaced wholesale on
/// refresh and carries no client-side expiry tracking - staleness is only
/// discovered when the server rejects it.
#[derive(Clone)]
pub struct Session {
    inner: Arc<RwLock<SessionInner>>,
}

struct SessionInner {
    environment: Environment,
    access_token: Option<SecretString>,
    // Bumped on every token store; lets coalesced refreshers detect that
    // another caller already completed the exchange.
    generation: u64,
}

impl Session {
    /// Create a new session with no access token.
    pub fn new(environment: Environment) -> Self {
        Self {
            inner: Arc::new(RwLock::new(SessionInner {
                environment,
                access_token: None,
                generation: 0,
            })),
        }
    }

    /// Get the currently selected environment.
    pub async fn environment(&self) -> Environment {
        self.inner.read().await.environment
    }

    /// Switch the session to a different environment.
    ///
    /// In-flight calls keep the environment they resolved at dispatch time.
    pub async fn set_environment(&self, environment: Environment) {
        self.inner.write().await.environment = environment;
    }

    /// Whether an access token is currently cached.
    pub async fn has_token(&self) -> bool {
        self.inner.read().await.access_token.is_some()
    }

    /// Get the cached access token, if any.
    pub(crate) async fn access_token(&self) -> Option<SecretString> {
        self.inner.read().await.access_token.clone()
    }

    /// Expose the cached access token as a string, if any.
    pub async fn access_token_string(&self) -> Option<String> {
        self.inner
            .read()
            .await
            .access_token
            .as_ref()
            .map(|t| t.expose_secret().to_string())
    }

    /// Store a freshly exchanged access token, replacing any previous one.
    pub(crate) async fn store_token(&self, token: SecretString) {
        let mut inner = self.inner.write().await;
        inner.access_token = Some(token);
        inner.generation += 1;
    }

    /// Drop the cached access token (used on logout).
    pub(crate) async fn clear_token(&self) {
        let mut inner = self.inner.write().await;
        inner.access_token = None;
        inner.generation += 1;
    }

    /// Current token generation, for single-flight refresh coordination.
    pub(crate) async fn generation(&self) -> u64 {
        self.inner.read().await.generation
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_token_replaced_wholesale() {
        let session = Session::new(Environment::Live);
        assert!(!session.has_token().await);
        assert_eq!(session.generation().await, 0);

        session.store_token(SecretString::from("first")).await;
        assert_eq!(session.access_token_string().await.as_deref(), Some("first"));
        assert_eq!(session.generation().await, 1);

        session.store_token(SecretString::from("second")).await;
        assert_eq!(session.access_token_string().await.as_deref(), Some("second"));
        assert_eq!(session.generation().await, 2);
    }

    #[tokio::test]
    async fn test_environment_switch() {
        let session = Session::new(Environment::Live);
        assert_eq!(session.environment().await, Environment::Live);
        session.set_environment(Environment::Demo).await;
        assert_eq!(session.environment().await, Environment::Demo);
    }

    #[tokio::test]
    async fn test_debug_redacts_token() {
        let session = Session::new(Environment::Demo);
        session.store_token(SecretString::from("super-secret-token")).await;
        let debug_str = format!("{:?}", session);
        assert!(!debug_str.contains("super-secret-token"));
        assert!(debug_str.contains("REDACTED"));
    }
}
