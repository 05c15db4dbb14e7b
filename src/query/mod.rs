//! SQL query module
//!
//! Parses SQL, translates statements into collection operations and runs
//! them as Strapi REST calls.
//!
//! # Overview
//!
//! - [`parse_statement`] - SQL text to a `sqlparser` statement
//! - [`translate`] - statement to [`TableQuery`]
//! - [`CollectionTable`] - runs a [`TableQuery`] against one collection
//!
//! Supported shapes:
//!
//! ```text
//! SELECT cols FROM t [WHERE ...] [ORDER BY ...] [LIMIT n [OFFSET m]]
//! INSERT INTO t (cols) VALUES (...), ...
//! UPDATE t SET c = v, ... WHERE ...
//! DELETE FROM t WHERE ...
//! ```

mod parser;
mod table;
mod translator;
mod types;

pub use parser::{parse_sql, parse_statement};
pub use table::{CollectionTable, QueryResponse};
pub use translator::{translate, where_conditions};
pub use types::{
    Condition, DeleteQuery, InsertQuery, Operator, SelectColumn, SelectQuery, SortKey,
    TableQuery, UpdateQuery,
};
