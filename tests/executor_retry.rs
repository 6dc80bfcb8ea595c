//! Executor behavior under injected transport failures.
//!
//! These tests script the transport seam directly so connection failures,
//! rate-limit responses, and token exchanges can be injected without a
//! real server. Time is paused, so the fixed backoff interval elapses
//! instantly while remaining observable.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use swyftx_api_client::client::{Transport, TransportFailure, WireRequest, WireResponse};
use swyftx_api_client::{Credentials, Environment, RequestSpec, SwyftxClient, SwyftxError};

/// Plays back a fixed sequence of transport outcomes, one per dispatch.
#[derive(Clone)]
struct ScriptedTransport {
    script: Arc<Mutex<VecDeque<Result<WireResponse, TransportFailure>>>>,
    hits: Arc<AtomicU32>,
}

impl ScriptedTransport {
    fn new(script: Vec<Result<WireResponse, TransportFailure>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into_iter().collect())),
            hits: Arc::new(AtomicU32::new(0)),
        }
    }

    fn hits(&self) -> u32 {
        self.hits.load(Ordering::SeqCst)
    }
}

impl Transport for ScriptedTransport {
    fn send(
        &self,
        _request: &WireRequest,
    ) -> impl Future<Output = Result<WireResponse, TransportFailure>> + Send {
        async move {
            self.hits.fetch_add(1, Ordering::SeqCst);
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .expect("transport script exhausted")
        }
    }
}

fn ok(body: serde_json::Value) -> Result<WireResponse, TransportFailure> {
    Ok(WireResponse { status: 200, body })
}

fn rate_limited() -> Result<WireResponse, TransportFailure> {
    Ok(WireResponse {
        status: 429,
        body: json!({"error": "RateLimit", "message": "slow down"}),
    })
}

fn connect_error() -> Result<WireResponse, TransportFailure> {
    Err(TransportFailure::Connect("connection refused".to_string()))
}

fn client_with(
    transport: ScriptedTransport,
    max_attempts: u32,
    auto_wait: bool,
) -> SwyftxClient<ScriptedTransport> {
    SwyftxClient::builder()
        .max_attempts(max_attempts)
        .auto_wait(auto_wait)
        .build_with_transport(transport)
}

#[tokio::test(start_paused = true)]
async fn transient_failures_retried_within_bound_for_get() {
    // Two connection failures then success, bound 3: the call succeeds.
    let transport = ScriptedTransport::new(vec![
        connect_error(),
        connect_error(),
        ok(json!({"status": "ok"})),
    ]);
    let client = client_with(transport.clone(), 3, false);

    let body = client
        .execute_raw(&RequestSpec::get("/markets/assets/"))
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(transport.hits(), 3);
}

#[tokio::test(start_paused = true)]
async fn transient_bound_of_one_surfaces_exhaustion() {
    let transport = ScriptedTransport::new(vec![connect_error()]);
    let client = client_with(transport.clone(), 1, false);

    let err = client
        .execute_raw(&RequestSpec::get("/markets/assets/"))
        .await
        .unwrap_err();
    match err {
        SwyftxError::RetriesExhausted { attempts, .. } => assert_eq!(attempts, 1),
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
    assert_eq!(transport.hits(), 1);
}

#[tokio::test(start_paused = true)]
async fn post_is_not_retried_by_default() {
    // A timed-out order placement may still have executed server-side, so
    // the first transport failure surfaces as-is.
    let transport = ScriptedTransport::new(vec![connect_error()]);
    let client = client_with(transport.clone(), 3, false);

    let err = client
        .execute_raw(&RequestSpec::post("/orders/"))
        .await
        .unwrap_err();
    assert!(matches!(err, SwyftxError::Transport(_)));
    assert_eq!(transport.hits(), 1);
}

#[tokio::test(start_paused = true)]
async fn post_retry_requires_explicit_opt_in() {
    let transport = ScriptedTransport::new(vec![connect_error(), ok(json!({"orderUuid": "o-1"}))]);
    let client = client_with(transport.clone(), 3, false);

    let spec = RequestSpec::post("/orders/").retry_non_idempotent();
    let body = client.execute_raw(&spec).await.unwrap();
    assert_eq!(body["orderUuid"], "o-1");
    assert_eq!(transport.hits(), 2);
}

#[tokio::test(start_paused = true)]
async fn rate_limit_absorbed_after_one_backoff_when_auto_wait_enabled() {
    let transport = ScriptedTransport::new(vec![rate_limited(), ok(json!({"status": "ok"}))]);
    let client = client_with(transport.clone(), 3, true);

    let started = tokio::time::Instant::now();
    let body = client
        .execute_raw(&RequestSpec::get("/markets/assets/"))
        .await
        .unwrap();

    assert_eq!(body["status"], "ok");
    assert_eq!(transport.hits(), 2);
    // Exactly one fixed 5000ms wait elapsed (virtual time).
    assert_eq!(started.elapsed(), Duration::from_millis(5000));
}

#[tokio::test(start_paused = true)]
async fn rate_limit_surfaces_immediately_when_auto_wait_disabled() {
    let transport = ScriptedTransport::new(vec![rate_limited()]);
    let client = client_with(transport.clone(), 3, false);

    let started = tokio::time::Instant::now();
    let err = client
        .execute_raw(&RequestSpec::get("/markets/assets/"))
        .await
        .unwrap_err();

    assert!(matches!(err, SwyftxError::RateLimited));
    assert_eq!(transport.hits(), 1);
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn rate_limit_backoff_is_cancellable() {
    let transport = ScriptedTransport::new(vec![rate_limited()]);
    let cancel = CancellationToken::new();
    cancel.cancel();
    let client = SwyftxClient::builder()
        .auto_wait(true)
        .cancellation_token(cancel)
        .build_with_transport(transport.clone());

    let err = client
        .execute_raw(&RequestSpec::get("/markets/assets/"))
        .await
        .unwrap_err();
    assert!(matches!(err, SwyftxError::Cancelled));
    assert_eq!(transport.hits(), 1);
}

#[tokio::test(start_paused = true)]
async fn business_errors_are_never_retried() {
    let transport = ScriptedTransport::new(vec![ok(json!({
        "error": "InsufficientBalance",
        "message": "not enough AUD"
    }))]);
    let client = client_with(transport.clone(), 3, true);

    let err = client
        .execute_raw(&RequestSpec::get("/orders/"))
        .await
        .unwrap_err();
    match err {
        SwyftxError::Api(api) => assert_eq!(api.code, "InsufficientBalance"),
        other => panic!("expected Api error, got {other:?}"),
    }
    assert_eq!(transport.hits(), 1);
}

#[tokio::test(start_paused = true)]
async fn auth_failures_propagate_without_retry() {
    // Refresh is the first wire call for an authenticated request; a
    // rejected key surfaces as an auth error and consumes no retries.
    let transport = ScriptedTransport::new(vec![ok(json!({
        "error": "InvalidApiKey",
        "message": "key revoked"
    }))]);
    let client = SwyftxClient::builder()
        .credentials(Credentials::new("revoked-key"))
        .max_attempts(3)
        .build_with_transport(transport.clone());

    let err = client
        .execute_raw(&RequestSpec::get("/user/balance/").authed())
        .await
        .unwrap_err();
    assert!(matches!(err, SwyftxError::Auth(_)));
    assert_eq!(transport.hits(), 1);
}

/// Serves the token-exchange endpoint with a delay and echoes the bearer
/// header back on every other path.
#[derive(Clone)]
struct AuthEchoTransport {
    refresh_hits: Arc<AtomicU32>,
}

impl AuthEchoTransport {
    fn new() -> Self {
        Self {
            refresh_hits: Arc::new(AtomicU32::new(0)),
        }
    }
}

impl Transport for AuthEchoTransport {
    fn send(
        &self,
        request: &WireRequest,
    ) -> impl Future<Output = Result<WireResponse, TransportFailure>> + Send {
        async move {
            if request.url.ends_with("/auth/refresh/") {
                self.refresh_hits.fetch_add(1, Ordering::SeqCst);
                // Hold the exchange open long enough for callers to pile up.
                tokio::time::sleep(Duration::from_millis(50)).await;
                return Ok(WireResponse {
                    status: 200,
                    body: json!({"accessToken": "tok-shared", "scope": "read"}),
                });
            }
            let bearer = request
                .headers
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            Ok(WireResponse {
                status: 200,
                body: json!({"bearer": bearer}),
            })
        }
    }
}

#[tokio::test(start_paused = true)]
async fn concurrent_authed_calls_share_one_token_exchange() {
    let transport = AuthEchoTransport::new();
    let refresh_hits = transport.refresh_hits.clone();
    let client = SwyftxClient::builder()
        .credentials(Credentials::new("api-key"))
        .build_with_transport(transport);

    let spec = RequestSpec::get("/user/balance/").authed();
    let (first, second) = tokio::join!(client.execute_raw(&spec), client.execute_raw(&spec));

    let first = first.unwrap();
    let second = second.unwrap();
    assert_eq!(first["bearer"], "Bearer tok-shared");
    assert_eq!(second["bearer"], "Bearer tok-shared");
    // Single-flight: both callers attached to the same exchange.
    assert_eq!(refresh_hits.load(Ordering::SeqCst), 1);
    assert_eq!(client.access_token().await.as_deref(), Some("tok-shared"));
}

/// Records every dispatched URL.
#[derive(Clone)]
struct RecordingTransport {
    urls: Arc<Mutex<Vec<String>>>,
}

impl RecordingTransport {
    fn new() -> Self {
        Self {
            urls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl Transport for RecordingTransport {
    fn send(
        &self,
        request: &WireRequest,
    ) -> impl Future<Output = Result<WireResponse, TransportFailure>> + Send {
        async move {
            self.urls.lock().unwrap().push(request.url.clone());
            Ok(WireResponse {
                status: 200,
                body: json!({}),
            })
        }
    }
}

#[tokio::test(start_paused = true)]
async fn environment_resolved_per_call_not_globally() {
    let transport = RecordingTransport::new();
    let urls = transport.urls.clone();
    let client = SwyftxClient::builder()
        .live_url("http://live.test")
        .demo_url("http://demo.test")
        .build_with_transport(transport);

    // Session default (live), per-call override, then a session switch.
    let spec = RequestSpec::get("/markets/assets/");
    client.execute_raw(&spec).await.unwrap();
    client
        .execute_raw(&spec.clone().environment(Environment::Demo))
        .await
        .unwrap();
    client.set_environment(Environment::Demo).await;
    client.execute_raw(&spec).await.unwrap();

    let urls = urls.lock().unwrap();
    assert_eq!(urls[0], "http://live.test/markets/assets/");
    assert_eq!(urls[1], "http://demo.test/markets/assets/");
    assert_eq!(urls[2], "http://demo.test/markets/assets/");
}
