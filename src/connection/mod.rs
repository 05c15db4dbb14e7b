//! Connection management module
//!
//! Tracks whether the Strapi server is reachable with the configured
//! credential.
//!
//! # Overview
//!
//! - `ConnectionManager` - owns the HTTP client and the connection state
//! - `CheckResult` - outcome of a liveness probe
//!
//! Probe failures are reported as `CheckResult`s, never as errors.

mod manager;
mod types;

pub use manager::ConnectionManager;
pub use types::{CheckResult, ConnectionState};
