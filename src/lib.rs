//! # Swyftx Client
//!
//! An async Rust client library for the Swyftx exchange REST API.
//!
//! ## Features
//!
//! - Bearer-token authentication with single-flight token refresh
//! - Live and demo trading environments, routed per session or per call
//! - Verb-aware bounded retries for transient transport failures
//! - Optional fixed-interval backoff when the API rate limit is hit
//! - Strong typing for request/response models with `rust_decimal`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use swyftx_api_client::SwyftxClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SwyftxClient::new();
//!     let assets = client.assets().await?;
//!     println!("{} tradable assets", assets.len());
//!     Ok(())
//! }
//! ```
//!
//! For authenticated endpoints, provide an API key:
//!
//! ```rust,no_run
//! use swyftx_api_client::{Credentials, Environment, SwyftxClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SwyftxClient::builder()
//!         .credentials(Credentials::new("api_key"))
//!         .environment(Environment::Demo)
//!         .build();
//!
//!     let balances = client.balances().await?;
//!     println!("Balances: {:?}", balances);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod rest;

// Re-export commonly used types at crate root
pub use auth::{Credentials, Environment, Session};
pub use client::{QueryParams, RateLimitPolicy, RequestSpec, TransientRetryPolicy};
pub use error::SwyftxError;
pub use rest::SwyftxClient;

/// Result type alias using SwyftxError
pub type Result<T> = std::result::Result<T, SwyftxError>;
