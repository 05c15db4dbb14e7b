//! HTTP client module
//!
//! Provides the HTTP client used for both the liveness probe and data calls.
//!
//! # Features
//!
//! - **Base URL resolution**: request paths are joined onto the server root
//! - **Bearer authentication**: the API token is attached to every request
//! - **Ordered query parameters**: repeated bracketed keys survive intact

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
