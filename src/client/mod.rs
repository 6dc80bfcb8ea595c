//! The request execution engine.
//!
//! Everything an endpoint call needs between "logical request" and
//! "classified outcome" lives here: the transport seam, the query
//! builder, the retry policies, and the executor that composes them.

pub mod executor;
pub mod query;
pub mod retry;
pub mod transport;

pub use executor::{EnvironmentRouter, RequestExecutor, RequestSpec};
pub use query::QueryParams;
pub use retry::{DEFAULT_MAX_ATTEMPTS, RATE_LIMIT_WAIT, RateLimitPolicy, TransientRetryPolicy};
pub use transport::{HttpTransport, Transport, TransportFailure, WireRequest, WireResponse};
