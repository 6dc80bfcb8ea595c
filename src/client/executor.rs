//! Request execution: environment routing, header resolution, dispatch,
//! outcome classification, and retry composition.
//!
//! Every endpoint call funnels through [`RequestExecutor::execute`]. The
//! executor resolves the base domain once per call, obtains a token when
//! needed, dispatches through the [`Transport`] seam, classifies the raw
//! outcome exactly once, and applies two independent retry policies on
//! top. Callers always get a tagged result; nothing panics or escapes
//! unclassified past this boundary.

use std::time::Duration;

use reqwest::Method;
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::{Environment, Session, TokenManager};
use crate::client::retry::{RateLimitPolicy, TransientRetryPolicy, idempotent};
use crate::client::transport::{Transport, WireRequest, WireResponse};
use crate::error::{ApiError, SwyftxError};
use crate::rest::endpoints::{DEMO_BASE_URL, LIVE_BASE_URL};

/// A logical API call, immutable once built.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) needs_auth: bool,
    pub(crate) body: Option<Value>,
    pub(crate) environment: Option<Environment>,
    pub(crate) retry_non_idempotent: bool,
}

impl RequestSpec {
    /// Create a spec with an explicit verb.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            needs_auth: false,
            body: None,
            environment: None,
            retry_non_idempotent: false,
        }
    }

    /// A GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// A POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// A PUT request.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// A DELETE request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Require a bearer token on this call.
    pub fn authed(mut self) -> Self {
        self.needs_auth = true;
        self
    }

    /// Attach a JSON body.
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Route this call to a specific environment instead of the session's.
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Opt in to transient-failure retries for a non-idempotent verb.
    ///
    /// Off by default: a POST that fails at the transport level may still
    /// have taken effect server-side, so re-issuing it must be a deliberate
    /// caller decision.
    pub fn retry_non_idempotent(mut self) -> Self {
        self.retry_non_idempotent = true;
        self
    }

    /// The verb this spec dispatches with.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The resolved path, relative to the base domain.
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Maps an [`Environment`] to its base domain.
///
/// The two domains are fixed in production; overriding them exists for
/// tests against a mock server. Resolution happens per call, so concurrent
/// calls against different environments never race on shared state.
#[derive(Debug, Clone)]
pub struct EnvironmentRouter {
    live: String,
    demo: String,
}

impl Default for EnvironmentRouter {
    fn default() -> Self {
        Self {
            live: LIVE_BASE_URL.to_string(),
            demo: DEMO_BASE_URL.to_string(),
        }
    }
}

impl EnvironmentRouter {
    /// Create a router with custom base domains.
    pub fn new(live: impl Into<String>, demo: impl Into<String>) -> Self {
        Self {
            live: live.into(),
            demo: demo.into(),
        }
    }

    /// Resolve the base domain for an environment.
    pub fn resolve(&self, environment: Environment) -> &str {
        match environment {
            Environment::Live => &self.live,
            Environment::Demo => &self.demo,
        }
    }
}

/// Executes [`RequestSpec`]s against the Swyftx API.
pub struct RequestExecutor<T: Transport> {
    transport: T,
    session: Session,
    tokens: TokenManager,
    router: EnvironmentRouter,
    transient: TransientRetryPolicy,
    rate_limit: RateLimitPolicy,
    timeout: Option<Duration>,
}

impl<T: Transport> RequestExecutor<T> {
    /// Assemble an executor from its collaborators.
    pub fn new(
        transport: T,
        session: Session,
        tokens: TokenManager,
        router: EnvironmentRouter,
        transient: TransientRetryPolicy,
        rate_limit: RateLimitPolicy,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            transport,
            session,
            tokens,
            router,
            transient,
            rate_limit,
            timeout,
        }
    }

    /// The session this executor reads tokens and environment from.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Execute one logical call and return its classified outcome.
    ///
    /// Auth errors propagate immediately. Transient transport failures are
    /// retried within a bounded attempt budget shared across the whole
    /// call, and only for idempotent verbs unless the spec opted in.
    /// Rate-limit errors are absorbed by fixed-interval backoff when
    /// auto-wait is enabled, without an attempt bound but cancellable via
    /// the policy's token. All other API errors return verbatim.
    pub async fn execute(&self, spec: &RequestSpec) -> Result<Value, SwyftxError> {
        let environment = match spec.environment {
            Some(environment) => environment,
            None => self.session.environment().await,
        };
        let base_url = self.router.resolve(environment);

        let retry_transient = idempotent(&spec.method) || spec.retry_non_idempotent;
        let mut attempts_remaining = self.transient.max_attempts.max(1);

        loop {
            match self.dispatch_once(spec, base_url).await {
                Ok(body) => return Ok(body),
                Err(SwyftxError::RateLimited) if self.rate_limit.auto_wait => {
                    warn!(
                        path = %spec.path,
                        wait_ms = self.rate_limit.wait.as_millis() as u64,
                        "rate limited, waiting before re-issuing"
                    );
                    tokio::select! {
                        _ = self.rate_limit.cancel.cancelled() => {
                            return Err(SwyftxError::Cancelled);
                        }
                        _ = tokio::time::sleep(self.rate_limit.wait) => {}
                    }
                }
                Err(err) if err.is_transient() && retry_transient => {
                    attempts_remaining -= 1;
                    if attempts_remaining == 0 {
                        return Err(SwyftxError::RetriesExhausted {
                            attempts: self.transient.max_attempts,
                            last: err.to_string(),
                        });
                    }
                    warn!(
                        path = %spec.path,
                        attempts_remaining,
                        error = %err,
                        "transient failure, retrying"
                    );
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// One dispatch attempt: token, headers, transport, classification.
    async fn dispatch_once(
        &self,
        spec: &RequestSpec,
        base_url: &str,
    ) -> Result<Value, SwyftxError> {
        if spec.needs_auth && !self.session.has_token().await {
            self.tokens
                .refresh_with(&self.transport, base_url, self.timeout)
                .await?;
        }

        let headers = self.tokens.headers(spec.needs_auth).await?;
        let request = WireRequest {
            method: spec.method.clone(),
            url: format!("{}{}", base_url, spec.path),
            headers,
            body: spec.body.clone(),
            timeout: self.timeout,
        };

        debug!(method = %request.method, url = %request.url, "dispatching request");
        let response = self.transport.send(&request).await?;
        classify(response)
    }

    /// Force a token exchange against the session's current environment.
    pub async fn refresh_token(&self) -> Result<(), SwyftxError> {
        let environment = self.session.environment().await;
        let base_url = self.router.resolve(environment);
        self.tokens
            .refresh_with(&self.transport, base_url, self.timeout)
            .await?;
        Ok(())
    }

    /// Whether credentials were configured on this executor.
    pub fn has_credentials(&self) -> bool {
        self.tokens.has_credentials()
    }
}

impl<T: Transport> std::fmt::Debug for RequestExecutor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("router", &self.router)
            .field("max_attempts", &self.transient.max_attempts)
            .field("auto_wait", &self.rate_limit.auto_wait)
            .finish()
    }
}

/// Classify a raw response exactly once at the transport boundary.
///
/// An error envelope (`{"error": code, "message": ...}`) takes precedence
/// over the status line, matching the API's habit of signaling logical
/// failures inside 200 responses. The rate-limit code becomes its own
/// variant so the executor can apply backoff without string matching at
/// call sites.
pub(crate) fn classify(response: WireResponse) -> Result<Value, SwyftxError> {
    if let Some(code) = response.body.get("error").and_then(Value::as_str) {
        let message = response
            .body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let api_error = ApiError::new(code, message);
        if api_error.is_rate_limit() {
            return Err(SwyftxError::RateLimited);
        }
        return Err(SwyftxError::Api(api_error));
    }

    if !(200..300).contains(&response.status) {
        return Err(SwyftxError::InvalidResponse(format!(
            "HTTP {}: {}",
            response.status, response.body
        )));
    }

    Ok(response.body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(status: u16, body: Value) -> WireResponse {
        WireResponse { status, body }
    }

    #[test]
    fn test_classify_success_body() {
        let body = json!({"balance": [{"assetId": 1}]});
        let result = classify(response(200, body.clone())).unwrap();
        assert_eq!(result, body);
    }

    #[test]
    fn test_classify_error_envelope() {
        let body = json!({"error": "InvalidOrder", "message": "bad trigger"});
        let err = classify(response(200, body)).unwrap_err();
        match err {
            SwyftxError::Api(api) => {
                assert_eq!(api.code, "InvalidOrder");
                assert_eq!(api.message, "bad trigger");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_rate_limit_code() {
        let body = json!({"error": "RateLimit", "message": "slow down"});
        let err = classify(response(429, body)).unwrap_err();
        assert!(matches!(err, SwyftxError::RateLimited));
    }

    #[test]
    fn test_classify_envelope_without_message() {
        let body = json!({"error": "Unauthorized"});
        let err = classify(response(401, body)).unwrap_err();
        match err {
            SwyftxError::Api(api) => {
                assert_eq!(api.code, "Unauthorized");
                assert!(api.message.is_empty());
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_non_success_without_envelope() {
        let err = classify(response(502, Value::Null)).unwrap_err();
        assert!(matches!(err, SwyftxError::InvalidResponse(_)));
    }

    #[test]
    fn test_spec_builders() {
        let spec = RequestSpec::get("/orders/").authed().environment(Environment::Demo);
        assert_eq!(spec.method(), &Method::GET);
        assert_eq!(spec.path(), "/orders/");
        assert!(spec.needs_auth);
        assert_eq!(spec.environment, Some(Environment::Demo));
        assert!(!spec.retry_non_idempotent);

        let spec = RequestSpec::post("/orders/").retry_non_idempotent();
        assert!(spec.retry_non_idempotent);
    }

    #[test]
    fn test_router_resolves_per_environment() {
        let router = EnvironmentRouter::default();
        assert_eq!(router.resolve(Environment::Live), LIVE_BASE_URL);
        assert_eq!(router.resolve(Environment::Demo), DEMO_BASE_URL);

        let custom = EnvironmentRouter::new("http://live.test", "http://demo.test");
        assert_eq!(custom.resolve(Environment::Demo), "http://demo.test");
    }
}
