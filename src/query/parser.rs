//! SQL parsing

use crate::error::{Error, Result};
use sqlparser::ast::Statement;
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;

/// Parse SQL text into statements
pub fn parse_sql(sql: &str) -> Result<Vec<Statement>> {
    Ok(Parser::parse_sql(&GenericDialect {}, sql)?)
}

/// Parse SQL text that must hold exactly one statement
pub fn parse_statement(sql: &str) -> Result<Statement> {
    let mut statements = parse_sql(sql)?;
    match statements.len() {
        1 => Ok(statements.remove(0)),
        0 => Err(Error::query("no SQL statement given")),
        n => Err(Error::query(format!(
            "expected one SQL statement, got {n}"
        ))),
    }
}
