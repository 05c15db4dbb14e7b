//! Response decoder module
//!
//! # Overview
//!
//! Turns Strapi response bodies into row sets. The only wire format is the
//! JSON envelope described in [`envelope`].

pub mod envelope;
mod types;

pub use envelope::{flatten_record, EnvelopeDecoder};
pub use types::RecordDecoder;

#[cfg(test)]
mod tests;
