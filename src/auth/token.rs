//! Access-token exchange with single-flight refresh coalescing.
//!
//! Swyftx issues short-lived bearer tokens in exchange for the long-lived
//! API key via `POST /auth/refresh/`. Concurrent callers that need a token
//! at the same time must share one exchange rather than issuing duplicates:
//! the refresh path serializes on an async mutex, and a session generation
//! counter lets latecomers detect that the token was already replaced while
//! they waited for the lock.

use std::time::Duration;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tokio::sync::Mutex;
use tracing::debug;

use crate::auth::{Credentials, Session};
use crate::client::executor::classify;
use crate::client::transport::{Transport, WireRequest};
use crate::error::SwyftxError;
use crate::rest::endpoints;

/// Owns token exchange and header construction for authenticated calls.
pub struct TokenManager {
    session: Session,
    credentials: Option<Credentials>,
    refresh_lock: Mutex<()>,
}

impl TokenManager {
    /// Create a token manager bound to a session.
    ///
    /// Without credentials, only unauthenticated endpoints are usable and
    /// any refresh attempt fails with [`SwyftxError::MissingCredentials`].
    pub fn new(session: Session, credentials: Option<Credentials>) -> Self {
        Self {
            session,
            credentials,
            refresh_lock: Mutex::new(()),
        }
    }

    /// Whether credentials were configured.
    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// Exchange the API key for a fresh access token.
    ///
    /// Exactly one exchange request is in flight per session at a time;
    /// concurrent callers attach to the same outcome. A failed exchange
    /// leaves any previously working token untouched.
    pub(crate) async fn refresh_with<T: Transport>(
        &self,
        transport: &T,
        base_url: &str,
        timeout: Option<Duration>,
    ) -> Result<SecretString, SwyftxError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(SwyftxError::MissingCredentials)?;

        let generation_seen = self.session.generation().await;
        let _guard = self.refresh_lock.lock().await;

        // Another caller may have completed the exchange while we waited.
        if self.session.generation().await != generation_seen {
            if let Some(token) = self.session.access_token().await {
                debug!("token refresh coalesced with a concurrent exchange");
                return Ok(token);
            }
        }

        debug!("exchanging API key for access token");
        let request = WireRequest {
            method: Method::POST,
            url: format!("{}{}", base_url, endpoints::auth::REFRESH),
            headers: json_headers(),
            body: Some(json!({ "apiKey": credentials.expose_key() })),
            timeout,
        };

        let response = transport
            .send(&request)
            .await
            .map_err(|e| SwyftxError::Auth(format!("token exchange failed: {e}")))?;

        let body = classify(response)
            .map_err(|e| SwyftxError::Auth(format!("token exchange rejected: {e}")))?;

        let token = body
            .get("accessToken")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| {
                SwyftxError::Auth("malformed token response: missing accessToken".to_string())
            })?;

        let token = SecretString::from(token.to_string());
        self.session.store_token(token.clone()).await;
        Ok(token)
    }

    /// Build request headers for a call.
    ///
    /// Always sets `Content-Type: application/json`; adds the bearer token
    /// when `needs_auth` is true. A missing token on an authenticated call
    /// is a contract violation - the executor refreshes before asking for
    /// headers, so this never silently sends a null token.
    pub(crate) async fn headers(&self, needs_auth: bool) -> Result<HeaderMap, SwyftxError> {
        let mut headers = json_headers();
        if needs_auth {
            let token = self.session.access_token().await.ok_or_else(|| {
                SwyftxError::Auth("no access token cached for authenticated call".to_string())
            })?;
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|_| SwyftxError::Auth("access token is not header-safe".to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }
}

fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("has_credentials", &self.credentials.is_some())
            .finish()
    }
}
