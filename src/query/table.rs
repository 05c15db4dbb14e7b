//! Collection table adapter
//!
//! Each registered collection is exposed as a table. Statements against it
//! turn into one or more REST calls on `/api/{name}`.

use super::types::{
    Condition, DeleteQuery, InsertQuery, Operator, SelectColumn, SelectQuery, TableQuery,
    UpdateQuery,
};
use crate::api::ApiCaller;
use crate::config::CollectionConfig;
use crate::error::{Error, Result};
use crate::output::{Row, RowSet};
use crate::types::{param_value, JsonValue, Method};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

/// Result of running a statement against a collection
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryResponse {
    /// Rows returned by the server
    pub rows: RowSet,
    /// Records written, for INSERT / UPDATE / DELETE
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affected_rows: Option<usize>,
}

impl QueryResponse {
    /// Response of a read
    pub fn rows(rows: RowSet) -> Self {
        Self {
            rows,
            affected_rows: None,
        }
    }

    /// Response of a write touching `affected` records
    pub fn written(rows: RowSet, affected: usize) -> Self {
        Self {
            rows,
            affected_rows: Some(affected),
        }
    }
}

/// A Strapi collection seen as a table
#[derive(Debug, Clone)]
pub struct CollectionTable {
    collection: CollectionConfig,
    caller: Arc<ApiCaller>,
}

impl CollectionTable {
    pub fn new(collection: CollectionConfig, caller: Arc<ApiCaller>) -> Self {
        Self { collection, caller }
    }

    /// Table name (the plural API id)
    pub fn name(&self) -> &str {
        &self.collection.name
    }

    pub fn collection(&self) -> &CollectionConfig {
        &self.collection
    }

    /// Run a translated statement
    pub async fn execute(&self, query: &TableQuery) -> Result<QueryResponse> {
        match query {
            TableQuery::Select(select) => self.select(select).await.map(QueryResponse::rows),
            TableQuery::Insert(insert) => self.insert(insert).await,
            TableQuery::Update(update) => self.update(update).await,
            TableQuery::Delete(delete) => self.delete(delete).await,
        }
    }

    /// `SELECT`: a single-record GET for a bare `WHERE id = N`, a filtered
    /// collection GET otherwise. LIMIT / OFFSET always go through the
    /// collection endpoint. Projection happens client-side.
    pub async fn select(&self, query: &SelectQuery) -> Result<RowSet> {
        let by_id = if query.limit.is_none() && query.offset.is_none() {
            single_id(&query.conditions)
        } else {
            None
        };

        let rows = match by_id {
            Some(id) => {
                let path = self.collection.record_path(&id)?;
                self.caller.execute(Method::GET, &path, &[], None).await?
            }
            None => {
                let params = query.to_params();
                self.caller
                    .execute(Method::GET, &self.collection.path, &params, None)
                    .await?
            }
        };

        debug!("{}: fetched {} rows", self.name(), rows.len());
        Ok(project(rows, &query.columns))
    }

    /// `INSERT`: one POST per VALUES row
    pub async fn insert(&self, query: &InsertQuery) -> Result<QueryResponse> {
        let records = query.records();
        let mut rows = RowSet::new();

        for record in &records {
            let body = json!({ "data": record });
            let created = self
                .caller
                .execute(Method::POST, &self.collection.path, &[], Some(&body))
                .await?;
            rows.append(created);
        }

        info!("{}: inserted {} records", self.name(), records.len());
        Ok(QueryResponse::written(rows, records.len()))
    }

    /// `UPDATE`: one PUT per matching record
    pub async fn update(&self, query: &UpdateQuery) -> Result<QueryResponse> {
        if query.conditions.is_empty() {
            return Err(Error::query("UPDATE without WHERE is not supported"));
        }
        if query.assignments.is_empty() {
            return Err(Error::query("UPDATE needs at least one assignment"));
        }

        let ids = self.resolve_ids(&query.conditions).await?;
        let body = json!({ "data": query.assignments });
        let mut rows = RowSet::new();

        for id in &ids {
            let path = self.collection.record_path(id)?;
            let updated = self
                .caller
                .execute(Method::PUT, &path, &[], Some(&body))
                .await?;
            rows.append(updated);
        }

        info!("{}: updated {} records", self.name(), ids.len());
        Ok(QueryResponse::written(rows, ids.len()))
    }

    /// `DELETE`: one DELETE per matching record
    pub async fn delete(&self, query: &DeleteQuery) -> Result<QueryResponse> {
        if query.conditions.is_empty() {
            return Err(Error::query("DELETE without WHERE is not supported"));
        }

        let ids = self.resolve_ids(&query.conditions).await?;
        let mut rows = RowSet::new();

        for id in &ids {
            let path = self.collection.record_path(id)?;
            let deleted = self.caller.execute(Method::DELETE, &path, &[], None).await?;
            rows.append(deleted);
        }

        info!("{}: deleted {} records", self.name(), ids.len());
        Ok(QueryResponse::written(rows, ids.len()))
    }

    /// Ids of the records a WHERE clause selects
    ///
    /// `id = N` and `id IN (...)` are taken as-is; anything else is looked up
    /// with a filtered GET.
    async fn resolve_ids(&self, conditions: &[Condition]) -> Result<Vec<String>> {
        if let [Condition {
            column,
            op: Operator::In,
            value: JsonValue::Array(ids),
        }] = conditions
        {
            if column == "id" {
                return Ok(ids.iter().map(param_value).collect());
            }
        }

        if let Some(id) = single_id(conditions) {
            return Ok(vec![id]);
        }

        let params: Vec<(String, String)> =
            conditions.iter().flat_map(Condition::to_params).collect();
        let matches = self
            .caller
            .execute(Method::GET, &self.collection.path, &params, None)
            .await?;

        matches
            .iter()
            .map(|row| {
                row.get("id")
                    .map(param_value)
                    .ok_or_else(|| Error::decode(format!("{}: record without id", self.name())))
            })
            .collect()
    }
}

/// The id of a lone `id = N` condition
fn single_id(conditions: &[Condition]) -> Option<String> {
    match conditions {
        [Condition {
            column,
            op: Operator::Eq,
            value,
        }] if column == "id" && !value.is_null() => Some(param_value(value)),
        _ => None,
    }
}

/// Keep the selected columns, renamed by alias
///
/// A column a row lacks comes out as null.
fn project(rows: RowSet, columns: &[SelectColumn]) -> RowSet {
    if columns.iter().all(|c| matches!(c, SelectColumn::Wildcard)) {
        return rows;
    }

    rows.into_iter()
        .map(|row| {
            let mut projected = Row::new();
            for column in columns {
                match column {
                    SelectColumn::Wildcard => {
                        for (key, value) in &row {
                            if !projected.contains_key(key) {
                                projected.insert(key.clone(), value.clone());
                            }
                        }
                    }
                    SelectColumn::Column { name, alias } => {
                        let value = row.get(name).cloned().unwrap_or(JsonValue::Null);
                        projected.insert(alias.clone().unwrap_or_else(|| name.clone()), value);
                    }
                }
            }
            projected
        })
        .collect()
}
