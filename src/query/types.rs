//! Translated query types
//!
//! The parts of a SQL statement a Strapi collection can act on, with the
//! SQL syntax stripped away.

use crate::types::{param_value, JsonObject, JsonValue, QueryParams};

/// Comparison operators Strapi filters understand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
    NotIn,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    Null,
    NotNull,
}

impl Operator {
    /// Strapi filter operator, e.g. `$eq`
    pub fn as_filter(self) -> &'static str {
        match self {
            Operator::Eq => "$eq",
            Operator::Ne => "$ne",
            Operator::Lt => "$lt",
            Operator::Lte => "$lte",
            Operator::Gt => "$gt",
            Operator::Gte => "$gte",
            Operator::In => "$in",
            Operator::NotIn => "$notIn",
            Operator::Contains => "$contains",
            Operator::NotContains => "$notContains",
            Operator::StartsWith => "$startsWith",
            Operator::EndsWith => "$endsWith",
            Operator::Null => "$null",
            Operator::NotNull => "$notNull",
        }
    }

    /// Operator with its operands swapped (`5 < x` is `x > 5`)
    pub fn flipped(self) -> Self {
        match self {
            Operator::Lt => Operator::Gt,
            Operator::Lte => Operator::Gte,
            Operator::Gt => Operator::Lt,
            Operator::Gte => Operator::Lte,
            other => other,
        }
    }
}

/// One `column <op> value` term of a WHERE clause
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: String,
    pub op: Operator,
    /// A scalar, or an array for `IN` / `NOT IN`
    pub value: JsonValue,
}

impl Condition {
    pub fn new(column: impl Into<String>, op: Operator, value: JsonValue) -> Self {
        Self {
            column: column.into(),
            op,
            value,
        }
    }

    /// Query parameters for this condition
    ///
    /// `filters[title][$eq]=A`, `filters[id][$in][0]=1`, ...
    pub fn to_params(&self) -> QueryParams {
        let key = format!("filters[{}][{}]", self.column, self.op.as_filter());
        match (&self.op, &self.value) {
            (Operator::In | Operator::NotIn, JsonValue::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| (format!("{key}[{i}]"), param_value(item)))
                .collect(),
            (Operator::Null | Operator::NotNull, _) => vec![(key, "true".to_string())],
            (_, value) => vec![(key, param_value(value))],
        }
    }
}

/// A column of the SELECT list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectColumn {
    /// `*`
    Wildcard,
    /// A named column, optionally renamed
    Column { name: String, alias: Option<String> },
}

/// One ORDER BY key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub column: String,
    pub ascending: bool,
}

/// `SELECT ... FROM collection`
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    pub table: String,
    pub columns: Vec<SelectColumn>,
    pub conditions: Vec<Condition>,
    pub order_by: Vec<SortKey>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl SelectQuery {
    /// Query parameters for a collection GET
    pub fn to_params(&self) -> QueryParams {
        let mut params: QueryParams = self
            .conditions
            .iter()
            .flat_map(Condition::to_params)
            .collect();

        for (i, key) in self.order_by.iter().enumerate() {
            let direction = if key.ascending { "asc" } else { "desc" };
            params.push((format!("sort[{i}]"), format!("{}:{direction}", key.column)));
        }

        if let Some(limit) = self.limit {
            params.push(("pagination[limit]".to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            params.push(("pagination[start]".to_string(), offset.to_string()));
        }

        params
    }
}

/// `INSERT INTO collection (columns) VALUES ...`
#[derive(Debug, Clone, PartialEq)]
pub struct InsertQuery {
    pub table: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<JsonValue>>,
}

impl InsertQuery {
    /// One `{column: value}` object per VALUES row
    pub fn records(&self) -> Vec<JsonObject> {
        self.rows
            .iter()
            .map(|values| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(values.iter().cloned())
                    .collect()
            })
            .collect()
    }
}

/// `UPDATE collection SET ... WHERE ...`
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateQuery {
    pub table: String,
    pub assignments: JsonObject,
    pub conditions: Vec<Condition>,
}

/// `DELETE FROM collection WHERE ...`
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteQuery {
    pub table: String,
    pub conditions: Vec<Condition>,
}

/// A statement translated for one collection
#[derive(Debug, Clone, PartialEq)]
pub enum TableQuery {
    Select(SelectQuery),
    Insert(InsertQuery),
    Update(UpdateQuery),
    Delete(DeleteQuery),
}

impl TableQuery {
    /// Name of the collection the statement targets
    pub fn table(&self) -> &str {
        match self {
            TableQuery::Select(q) => &q.table,
            TableQuery::Insert(q) => &q.table,
            TableQuery::Update(q) => &q.table,
            TableQuery::Delete(q) => &q.table,
        }
    }
}
