//! The transport seam between the request executor and the HTTP stack.
//!
//! The executor never talks to `reqwest` directly; it hands a fully
//! resolved [`WireRequest`] to a [`Transport`] and gets back either a
//! [`WireResponse`] or a [`TransportFailure`]. Tests substitute scripted
//! transports to inject connection failures and rate-limit responses.

use std::future::Future;
use std::time::Duration;

use reqwest::Method;
use reqwest::header::HeaderMap;
use serde_json::Value;
use thiserror::Error;

use crate::error::SwyftxError;

/// A fully resolved HTTP request ready for dispatch.
#[derive(Debug, Clone)]
pub struct WireRequest {
    /// HTTP verb.
    pub method: Method,
    /// Absolute URL including the resolved base domain.
    pub url: String,
    /// Headers, already including content type and any bearer token.
    pub headers: HeaderMap,
    /// JSON body, if any.
    pub body: Option<Value>,
    /// Per-request timeout. `None` uses the transport default.
    pub timeout: Option<Duration>,
}

/// A raw response as seen at the transport boundary.
///
/// Carries the status and decoded JSON body; outcome classification
/// happens once, in the executor, never at call sites.
#[derive(Debug, Clone)]
pub struct WireResponse {
    /// HTTP status code.
    pub status: u16,
    /// Decoded body. `Value::Null` for an empty body; a `Value::String`
    /// if the body was not valid JSON.
    pub body: Value,
}

/// Connection-level failure: no response object was reachable.
#[derive(Debug, Clone, Error)]
pub enum TransportFailure {
    /// DNS, TCP, or TLS level failure.
    #[error("contact error: {0}")]
    Connect(String),
    /// The configured timeout elapsed before a response arrived.
    #[error("request timed out")]
    Timeout,
}

impl From<TransportFailure> for SwyftxError {
    fn from(failure: TransportFailure) -> Self {
        match failure {
            TransportFailure::Connect(message) => SwyftxError::Transport(message),
            TransportFailure::Timeout => SwyftxError::Timeout,
        }
    }
}

/// Dispatches a single wire request and returns the raw outcome.
///
/// Implementations must not retry internally; retry policy belongs to the
/// executor so the attempt budget stays in one place.
pub trait Transport: Send + Sync {
    /// Send one request and await its raw response.
    fn send(
        &self,
        request: &WireRequest,
    ) -> impl Future<Output = Result<WireResponse, TransportFailure>> + Send;
}

/// Production [`Transport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport around an existing `reqwest` client.
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

impl Transport for HttpTransport {
    fn send(
        &self,
        request: &WireRequest,
    ) -> impl Future<Output = Result<WireResponse, TransportFailure>> + Send {
        async move {
            let mut builder = self
                .client
                .request(request.method.clone(), &request.url)
                .headers(request.headers.clone());
            if let Some(body) = &request.body {
                builder = builder.json(body);
            }
            if let Some(timeout) = request.timeout {
                builder = builder.timeout(timeout);
            }

            let response = builder.send().await.map_err(|e| {
                if e.is_timeout() {
                    TransportFailure::Timeout
                } else {
                    TransportFailure::Connect(e.to_string())
                }
            })?;

            let status = response.status().as_u16();
            let text = response
                .text()
                .await
                .map_err(|e| TransportFailure::Connect(e.to_string()))?;

            let body = if text.is_empty() {
                Value::Null
            } else {
                serde_json::from_str(&text).unwrap_or(Value::String(text))
            };

            Ok(WireResponse { status, body })
        }
    }
}
