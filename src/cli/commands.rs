//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Query a Strapi server with SQL
#[derive(Parser, Debug)]
#[command(name = "strapi-connector")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Connection file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Inline connection JSON (takes precedence over --config)
    #[arg(long, global = true)]
    pub config_json: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the connection arguments
    Spec,

    /// Test the connection to the server
    Check,

    /// List the registered tables
    Tables,

    /// Run one SQL statement
    Query {
        /// SQL text, e.g. "SELECT * FROM posts LIMIT 5"
        sql: String,
    },

    /// Call a REST endpoint directly
    Call {
        /// HTTP method (GET, POST, PUT, DELETE)
        method: String,

        /// Request path, e.g. /api/posts
        path: String,

        /// Query parameter as key=value (repeatable)
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,

        /// JSON request body
        #[arg(short, long)]
        body: Option<String>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable JSON
    Pretty,
    /// Rows as a text table
    Table,
}

/// Parse a `key=value` pair
fn parse_param(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{s}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_command() {
        let cli = Cli::parse_from([
            "strapi-connector",
            "--config-json",
            "{}",
            "-f",
            "table",
            "query",
            "SELECT * FROM posts",
        ]);

        assert_eq!(cli.format, OutputFormat::Table);
        assert_eq!(cli.config_json.as_deref(), Some("{}"));
        assert!(matches!(cli.command, Commands::Query { ref sql } if sql == "SELECT * FROM posts"));
    }

    #[test]
    fn test_parse_call_params() {
        let cli = Cli::parse_from([
            "strapi-connector",
            "call",
            "GET",
            "/api/posts",
            "-p",
            "filters[title][$eq]=a=b",
            "--param",
            "pagination[limit]=2",
        ]);

        match cli.command {
            Commands::Call { method, params, .. } => {
                assert_eq!(method, "GET");
                assert_eq!(
                    params,
                    vec![
                        ("filters[title][$eq]".to_string(), "a=b".to_string()),
                        ("pagination[limit]".to_string(), "2".to_string()),
                    ]
                );
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_param_without_equals_is_rejected() {
        assert!(parse_param("limit").is_err());
    }
}
