//! Strapi handler
//!
//! Ties configuration, connection, API calls and SQL together. This is the
//! entry point callers (and the CLI) use.

use crate::api::ApiCaller;
use crate::config::{connection_spec, ConnectionSpec, StrapiConfig};
use crate::connection::{CheckResult, ConnectionManager};
use crate::error::{Error, Result};
use crate::output::RowSet;
use crate::query::{parse_statement, translate, CollectionTable, QueryResponse};
use crate::types::JsonValue;
use async_trait::async_trait;
use sqlparser::ast::Statement;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

// ============================================================================
// Handler Trait
// ============================================================================

/// Operations a data handler exposes
#[async_trait]
pub trait Handler: Send + Sync {
    /// Connection arguments this handler accepts
    fn spec(&self) -> ConnectionSpec;

    /// Names of the tables this handler serves, in configured order
    fn tables(&self) -> Vec<String>;

    /// Establish the connection (idempotent once successful)
    async fn connect(&self) -> CheckResult;

    /// Probe the server now
    async fn check_connection(&self) -> CheckResult;

    /// Parse and run one SQL statement
    async fn native_query(&self, sql: &str) -> Result<QueryResponse>;

    /// Run a parsed statement
    async fn query(&self, statement: &Statement) -> Result<QueryResponse>;

    /// Call a REST endpoint directly
    async fn call_api(
        &self,
        method: &str,
        path: &str,
        params: &[(String, String)],
        body: Option<&JsonValue>,
    ) -> Result<RowSet>;
}

// ============================================================================
// Strapi Handler
// ============================================================================

/// Handler for one Strapi server
#[derive(Debug)]
pub struct StrapiHandler {
    config: StrapiConfig,
    connection: Arc<ConnectionManager>,
    caller: Arc<ApiCaller>,
    tables: HashMap<String, CollectionTable>,
    table_order: Vec<String>,
}

impl StrapiHandler {
    /// Validate the configuration and register one table per collection
    pub fn new(config: StrapiConfig) -> Result<Self> {
        config.validate()?;

        let connection = Arc::new(ConnectionManager::new(&config)?);
        let caller = Arc::new(ApiCaller::new(Arc::clone(&connection)));

        let mut tables = HashMap::new();
        let mut table_order = Vec::new();
        for collection in config.collections() {
            debug!("Registering table {} at {}", collection.name, collection.path);
            table_order.push(collection.name.clone());
            tables.insert(
                collection.name.clone(),
                CollectionTable::new(collection, Arc::clone(&caller)),
            );
        }

        Ok(Self {
            config,
            connection,
            caller,
            tables,
            table_order,
        })
    }

    /// Build from JSON connection data
    pub fn from_value(value: &JsonValue) -> Result<Self> {
        Self::new(StrapiConfig::from_value(value)?)
    }

    pub fn config(&self) -> &StrapiConfig {
        &self.config
    }

    pub fn connection(&self) -> &Arc<ConnectionManager> {
        &self.connection
    }

    pub fn caller(&self) -> &Arc<ApiCaller> {
        &self.caller
    }

    /// Look up a registered table
    pub fn table(&self, name: &str) -> Result<&CollectionTable> {
        self.tables
            .get(name)
            .ok_or_else(|| Error::table_not_found(name))
    }
}

#[async_trait]
impl Handler for StrapiHandler {
    fn spec(&self) -> ConnectionSpec {
        connection_spec()
    }

    fn tables(&self) -> Vec<String> {
        self.table_order.clone()
    }

    async fn connect(&self) -> CheckResult {
        self.connection.connect().await
    }

    async fn check_connection(&self) -> CheckResult {
        self.connection.check_connection().await
    }

    async fn native_query(&self, sql: &str) -> Result<QueryResponse> {
        let statement = parse_statement(sql)?;
        self.query(&statement).await
    }

    async fn query(&self, statement: &Statement) -> Result<QueryResponse> {
        let query = translate(statement)?;
        let table = self.table(query.table())?;
        table.execute(&query).await
    }

    async fn call_api(
        &self,
        method: &str,
        path: &str,
        params: &[(String, String)],
        body: Option<&JsonValue>,
    ) -> Result<RowSet> {
        self.caller.execute_raw(method, path, params, body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn handler() -> StrapiHandler {
        StrapiHandler::from_value(&json!({
            "api_token": "tok",
            "host": "localhost",
            "port": 1337,
            "pluralApiIds": ["posts", "authors", "tags"]
        }))
        .unwrap()
    }

    #[test]
    fn test_tables_keep_configured_order() {
        assert_eq!(handler().tables(), vec!["posts", "authors", "tags"]);
    }

    #[test]
    fn test_table_lookup() {
        let handler = handler();
        assert_eq!(handler.table("authors").unwrap().collection().path, "/api/authors");
        assert!(matches!(
            handler.table("comments"),
            Err(Error::TableNotFound { .. })
        ));
    }

    #[test]
    fn test_spec_marks_token_secret() {
        let spec = handler().spec();
        assert!(spec.property("api_token").unwrap().secret);
        assert!(!spec.property("host").unwrap().secret);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let err = StrapiHandler::from_value(&json!({
            "api_token": "tok",
            "host": "localhost",
            "port": 1337
        }))
        .unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { .. }));
    }

    #[tokio::test]
    async fn test_unknown_table_makes_no_request() {
        let err = handler()
            .native_query("SELECT * FROM comments")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::TableNotFound { ref table } if table == "comments"));
    }

    #[tokio::test]
    async fn test_call_api_rejects_unknown_verb() {
        let err = handler()
            .call_api("PATCH", "/api/posts", &[], None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedMethod { .. }));
    }
}
