//! REST API module
//!
//! [`ApiCaller::execute`] is the single place the connector talks to Strapi
//! data endpoints.

mod caller;

pub use caller::ApiCaller;

#[cfg(test)]
mod tests;
