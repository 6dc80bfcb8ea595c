//! Swyftx REST API surface: endpoint catalog, models, and the client.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::{SwyftxClient, SwyftxClientBuilder};
