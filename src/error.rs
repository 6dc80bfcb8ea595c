//! Error types for the Swyftx client library.

use thiserror::Error;

/// The main error type for all Swyftx client operations.
#[derive(Error, Debug)]
pub enum SwyftxError {
    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Swyftx API returned an error
    #[error("Swyftx API error: {0}")]
    Api(ApiError),

    /// The API signaled the rate limit was exceeded
    #[error("rate limit exceeded")]
    RateLimited,

    /// Token exchange failed or returned malformed data
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Connection-level failure, no response was reachable
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request timeout
    #[error("Request timed out")]
    Timeout,

    /// Invalid response from the API
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The bounded retry policy ran out of attempts
    #[error("retries exhausted after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Total attempts made before giving up
        attempts: u32,
        /// Description of the last failure observed
        last: String,
    },

    /// The caller's cancellation token fired during backoff
    #[error("request cancelled")]
    Cancelled,

    /// Missing required credentials
    #[error("Missing credentials: API key required for authenticated endpoints")]
    MissingCredentials,
}

impl SwyftxError {
    /// Check whether this failure is transient and eligible for bounded retry.
    ///
    /// Only connection-level failures and timeouts qualify. Business errors
    /// from the API are never transient.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout)
    }
}

/// Swyftx API error codes and messages.
///
/// These are errors returned by the Swyftx API itself in the response body,
/// shaped as `{"error": "<code>", "message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// The error code from Swyftx (e.g., "RateLimit", "InvalidOrder")
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.code)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl ApiError {
    /// Create a new API error from code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Check if this is a rate limit error.
    pub fn is_rate_limit(&self) -> bool {
        self.code == error_codes::RATE_LIMIT
    }

    /// Check if this is an expired or invalid access token error.
    pub fn is_token_rejected(&self) -> bool {
        self.code == error_codes::TOKEN_EXPIRED || self.code == error_codes::UNAUTHORIZED
    }

    /// Check if this is an invalid API key error.
    pub fn is_invalid_api_key(&self) -> bool {
        self.code == error_codes::INVALID_API_KEY
    }
}

/// Known Swyftx error codes for pattern matching.
pub mod error_codes {
    /// Rate limit exceeded; the caller must slow down.
    pub const RATE_LIMIT: &str = "RateLimit";
    /// The access token has expired.
    pub const TOKEN_EXPIRED: &str = "TokenExpired";
    /// The request lacked a valid access token.
    pub const UNAUTHORIZED: &str = "Unauthorized";
    /// The API key was rejected during token exchange.
    pub const INVALID_API_KEY: &str = "InvalidApiKey";
    /// Order parameters were rejected.
    pub const INVALID_ORDER: &str = "InvalidOrder";
    /// Account balance is insufficient for the requested order.
    pub const INSUFFICIENT_BALANCE: &str = "InsufficientBalance";
    /// Withdrawal would exceed the account limit.
    pub const WITHDRAWAL_LIMIT: &str = "WithdrawalLimit";
}
