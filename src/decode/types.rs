//! Decoder traits
//!
//! Defines the core decoder abstraction.

use crate::error::Result;
use crate::output::RowSet;
use serde_json::Value;

/// Trait for decoding response bodies into rows
pub trait RecordDecoder: Send + Sync {
    /// Decode the response body into a row set
    fn decode(&self, body: &str) -> Result<RowSet>;

    /// Decode the response body into a single JSON value (full response)
    fn decode_raw(&self, body: &str) -> Result<Value>;
}
