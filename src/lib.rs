// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Strapi Connector
//!
//! Exposes the collections of a Strapi server as SQL tables. Statements are
//! translated into REST calls and the JSON envelopes Strapi answers with are
//! flattened into rows.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use strapi_connector::{Handler, StrapiHandler, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let handler = StrapiHandler::from_value(&serde_json::json!({
//!         "api_token": "<token>",
//!         "host": "localhost",
//!         "port": 1337,
//!         "pluralApiIds": ["posts"]
//!     }))?;
//!
//!     let status = handler.check_connection().await;
//!     let response = handler
//!         .native_query("SELECT id, title FROM posts WHERE views > 10 LIMIT 5")
//!         .await?;
//!     for row in &response.rows {
//!         println!("{}", serde_json::Value::Object(row.clone()));
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       StrapiHandler                          │
//! │  spec()  tables()  connect()  check_connection()  query()    │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//! ┌────────────┬────────────────┴──┬──────────────┬──────────────┐
//! │   Query    │      API          │  Connection  │   Output     │
//! ├────────────┼───────────────────┼──────────────┼──────────────┤
//! │ sqlparser  │ execute()         │ connect()    │ RowSet       │
//! │ translate  │ envelope decode   │ probe        │ Arrow        │
//! │ tables     │ bearer + JSON     │ cached state │              │
//! └────────────┴───────────────────┴──────────────┴──────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the connector
pub mod error;

/// Common types and type aliases
pub mod types;

/// Connection configuration
pub mod config;

/// HTTP client
pub mod http;

/// Response envelope decoding
pub mod decode;

/// Row sets and Arrow output
pub mod output;

/// Connection state and liveness probes
pub mod connection;

/// REST API calls
pub mod api;

/// SQL parsing and translation
pub mod query;

/// Handler trait and Strapi implementation
pub mod handler;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::StrapiConfig;
pub use connection::CheckResult;
pub use handler::{Handler, StrapiHandler};
pub use output::{Row, RowSet};
pub use query::QueryResponse;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
