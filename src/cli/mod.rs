//! CLI module
//!
//! Command-line interface for a Strapi server.
//!
//! # Commands
//!
//! - `spec` - Show the connection arguments
//! - `check` - Test the connection
//! - `tables` - List registered tables
//! - `query` - Run a SQL statement
//! - `call` - Call a REST endpoint directly

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
