//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{connection_spec, StrapiConfig};
use crate::connection::CheckResult;
use crate::error::{Error, Result, ResultExt};
use crate::handler::{Handler, StrapiHandler};
use crate::output::RowSet;
use crate::query::QueryResponse;
use arrow::util::pretty::pretty_format_batches;
use serde_json::{json, Value};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Spec => self.spec(),
            Commands::Check => self.check().await,
            Commands::Tables => self.tables(),
            Commands::Query { sql } => self.query(sql).await,
            Commands::Call {
                method,
                path,
                params,
                body,
            } => self.call(method, path, params, body.as_deref()).await,
        }
    }

    /// Load connection configuration
    fn load_config(&self) -> Result<StrapiConfig> {
        // Inline config takes precedence
        if let Some(json_str) = &self.cli.config_json {
            return StrapiConfig::from_json_str(json_str).context("Invalid config JSON");
        }

        if let Some(path) = &self.cli.config {
            return StrapiConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()));
        }

        Err(Error::config(
            "No connection configured (use --config or --config-json)",
        ))
    }

    fn handler(&self) -> Result<StrapiHandler> {
        StrapiHandler::new(self.load_config()?)
    }

    /// Show spec
    fn spec(&self) -> Result<()> {
        self.output_message(&json!({
            "type": "SPEC",
            "spec": connection_spec()
        }));
        Ok(())
    }

    /// Check connection
    async fn check(&self) -> Result<()> {
        let handler = self.handler()?;
        let result = handler.check_connection().await;
        self.output_message(&connection_status(&result));
        Ok(())
    }

    /// List registered tables
    fn tables(&self) -> Result<()> {
        let handler = self.handler()?;
        self.output_message(&json!({
            "type": "TABLES",
            "tables": handler.tables()
        }));
        Ok(())
    }

    /// Run a SQL statement
    async fn query(&self, sql: &str) -> Result<()> {
        let handler = self.handler()?;
        let response = handler.native_query(sql).await?;
        self.output_response(&response)
    }

    /// Call an endpoint directly
    async fn call(
        &self,
        method: &str,
        path: &str,
        params: &[(String, String)],
        body: Option<&str>,
    ) -> Result<()> {
        let body: Option<Value> = body
            .map(serde_json::from_str)
            .transpose()
            .context("Invalid request body")?;

        let handler = self.handler()?;
        let rows = handler.call_api(method, path, params, body.as_ref()).await?;
        self.output_response(&QueryResponse::rows(rows))
    }

    /// Output query results
    fn output_response(&self, response: &QueryResponse) -> Result<()> {
        match self.cli.format {
            OutputFormat::Table => {
                println!("{}", render_table(&response.rows)?);
                if let Some(affected) = response.affected_rows {
                    println!("{affected} row(s) affected");
                }
            }
            OutputFormat::Json | OutputFormat::Pretty => {
                for row in &response.rows {
                    self.output_message(&json!({
                        "type": "RECORD",
                        "record": row
                    }));
                }
                self.output_message(&json!({
                    "type": "RESULT",
                    "rowCount": response.rows.len(),
                    "affectedRows": response.affected_rows
                }));
            }
        }
        Ok(())
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty | OutputFormat::Table => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

fn connection_status(result: &CheckResult) -> Value {
    let (status, message) = if result.success {
        ("SUCCEEDED", "Connection successful".to_string())
    } else {
        (
            "FAILED",
            result.message.clone().unwrap_or_else(|| "Connection failed".to_string()),
        )
    };

    json!({
        "type": "CONNECTION_STATUS",
        "connectionStatus": {
            "status": status,
            "message": message
        }
    })
}

/// Render rows as a text table
fn render_table(rows: &RowSet) -> Result<String> {
    if rows.is_empty() {
        return Ok("(no rows)".to_string());
    }
    let batch = rows.to_record_batch()?;
    Ok(pretty_format_batches(&[batch])?.to_string())
}
