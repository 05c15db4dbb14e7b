//! Output module
//!
//! Tabular results of connector calls.
//!
//! # Overview
//!
//! This module provides:
//! - [`RowSet`], the ordered, dynamically-typed rows every query returns
//! - Arrow schema inference over row sets
//! - Conversion of row sets to Arrow RecordBatches

mod rowset;
mod schema;

pub use rowset::{Row, RowSet};
pub use schema::{infer_schema, json_to_arrow};

#[cfg(test)]
mod tests;
