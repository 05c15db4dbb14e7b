//! Strapi envelope decoder
//!
//! Strapi wraps every record as `{"id": .., "attributes": {..}}` and puts the
//! record (or a list of records) under a top-level `data` key:
//!
//! ```json
//! {"data": [{"id": 1, "attributes": {"title": "A"}}], "meta": {..}}
//! ```
//!
//! Each record is flattened to one row: `id` first, then the attributes.

use super::types::RecordDecoder;
use crate::error::{Error, Result};
use crate::output::{Row, RowSet};
use serde_json::Value;

/// Decoder for `{data: ...}` envelopes
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvelopeDecoder;

impl EnvelopeDecoder {
    /// Create a new envelope decoder
    pub fn new() -> Self {
        Self
    }

    /// Flatten an already-parsed response
    ///
    /// - `data` is a list: one row per element, in order
    /// - `data` is an object: exactly one row
    /// - `data` is missing, null, or any other shape: no rows
    pub fn decode_value(&self, payload: &Value) -> Result<RowSet> {
        match payload.get("data") {
            Some(Value::Array(items)) => items.iter().map(flatten_record).collect(),
            Some(record @ Value::Object(_)) => Ok(RowSet::from_rows(vec![flatten_record(record)?])),
            _ => Ok(RowSet::new()),
        }
    }
}

impl RecordDecoder for EnvelopeDecoder {
    fn decode(&self, body: &str) -> Result<RowSet> {
        let payload = self.decode_raw(body)?;
        self.decode_value(&payload)
    }

    fn decode_raw(&self, body: &str) -> Result<Value> {
        serde_json::from_str(body).map_err(|e| Error::Decode {
            message: format!("Failed to parse JSON: {e}"),
        })
    }
}

/// Merge a record's `id` into its `attributes`
///
/// Attribute keys are inserted after `id`, so an attribute literally named
/// `id` replaces the envelope id.
pub fn flatten_record(record: &Value) -> Result<Row> {
    let id = record
        .get("id")
        .ok_or_else(|| Error::decode(format!("record without 'id': {record}")))?;

    let attributes = match record.get("attributes") {
        Some(Value::Object(attributes)) => attributes,
        Some(other) => {
            return Err(Error::decode(format!(
                "'attributes' of record {id} is not an object: {other}"
            )))
        }
        None => return Err(Error::decode(format!("record {id} has no 'attributes'"))),
    };

    let mut row = Row::with_capacity(attributes.len() + 1);
    row.insert("id".to_string(), id.clone());
    for (key, value) in attributes {
        row.insert(key.clone(), value.clone());
    }
    Ok(row)
}
