//! Statement translation
//!
//! Maps `sqlparser` statements onto [`TableQuery`] values. Only what a single
//! Strapi collection endpoint can answer is accepted: one table, no joins,
//! WHERE clauses made of AND-ed comparisons.

use super::types::{
    Condition, DeleteQuery, InsertQuery, Operator, SelectColumn, SelectQuery, SortKey,
    TableQuery, UpdateQuery,
};
use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use sqlparser::ast::{
    AssignmentTarget, BinaryOperator, Delete, Expr, FromTable, GroupByExpr, Insert, ObjectName,
    Query, SelectItem, SetExpr, Statement, TableFactor, TableWithJoins, UnaryOperator,
    Value as SqlValue,
};

/// Translate a parsed statement
pub fn translate(statement: &Statement) -> Result<TableQuery> {
    match statement {
        Statement::Query(query) => translate_select(query).map(TableQuery::Select),
        Statement::Insert(insert) => translate_insert(insert).map(TableQuery::Insert),
        Statement::Update {
            table,
            assignments,
            from,
            selection,
            ..
        } => {
            if from.is_some() {
                return Err(Error::query("UPDATE ... FROM is not supported"));
            }

            let mut values = JsonObject::new();
            for assignment in assignments {
                let column = match &assignment.target {
                    AssignmentTarget::ColumnName(name) => object_name(name)?,
                    AssignmentTarget::Tuple(_) => {
                        return Err(Error::query("tuple assignments are not supported"))
                    }
                };
                values.insert(column, literal(&assignment.value)?);
            }

            Ok(TableQuery::Update(UpdateQuery {
                table: single_table(std::slice::from_ref(table))?,
                assignments: values,
                conditions: where_conditions(selection.as_ref())?,
            }))
        }
        Statement::Delete(delete) => translate_delete(delete).map(TableQuery::Delete),
        other => Err(Error::query(format!(
            "only SELECT, INSERT, UPDATE and DELETE are supported, got: {other}"
        ))),
    }
}

fn translate_select(query: &Query) -> Result<SelectQuery> {
    if query.with.is_some() {
        return Err(Error::query("WITH clauses are not supported"));
    }

    let SetExpr::Select(select) = query.body.as_ref() else {
        return Err(Error::query(format!(
            "only plain SELECT queries are supported, got: {}",
            query.body
        )));
    };

    if select.distinct.is_some() {
        return Err(Error::query("SELECT DISTINCT is not supported"));
    }
    match &select.group_by {
        GroupByExpr::Expressions(exprs, ..) if exprs.is_empty() => {}
        _ => return Err(Error::query("GROUP BY is not supported")),
    }
    if select.having.is_some() {
        return Err(Error::query("HAVING is not supported"));
    }

    let columns = select
        .projection
        .iter()
        .map(select_column)
        .collect::<Result<Vec<_>>>()?;

    let order_by = match &query.order_by {
        Some(order_by) => order_by
            .exprs
            .iter()
            .map(|e| {
                Ok(SortKey {
                    column: column_name(&e.expr)?,
                    ascending: e.asc.unwrap_or(true),
                })
            })
            .collect::<Result<Vec<_>>>()?,
        None => Vec::new(),
    };

    Ok(SelectQuery {
        table: single_table(&select.from)?,
        columns,
        conditions: where_conditions(select.selection.as_ref())?,
        order_by,
        limit: query.limit.as_ref().map(count).transpose()?,
        offset: query.offset.as_ref().map(|o| count(&o.value)).transpose()?,
    })
}

fn translate_insert(insert: &Insert) -> Result<InsertQuery> {
    if insert.columns.is_empty() {
        return Err(Error::query("INSERT needs an explicit column list"));
    }

    let source = insert
        .source
        .as_ref()
        .ok_or_else(|| Error::query("INSERT without VALUES is not supported"))?;

    let SetExpr::Values(values) = source.body.as_ref() else {
        return Err(Error::query("only INSERT ... VALUES is supported"));
    };

    let columns: Vec<String> = insert.columns.iter().map(|c| c.value.clone()).collect();
    let mut rows = Vec::with_capacity(values.rows.len());
    for row in &values.rows {
        if row.len() != columns.len() {
            return Err(Error::query(format!(
                "INSERT has {} columns but a row has {} values",
                columns.len(),
                row.len()
            )));
        }
        rows.push(row.iter().map(literal).collect::<Result<Vec<_>>>()?);
    }

    Ok(InsertQuery {
        table: object_name(&insert.table_name)?,
        columns,
        rows,
    })
}

fn translate_delete(delete: &Delete) -> Result<DeleteQuery> {
    let tables = match &delete.from {
        FromTable::WithFromKeyword(tables) | FromTable::WithoutKeyword(tables) => tables,
    };

    Ok(DeleteQuery {
        table: single_table(tables)?,
        conditions: where_conditions(delete.selection.as_ref())?,
    })
}

/// The one table a statement reads from
fn single_table(from: &[TableWithJoins]) -> Result<String> {
    match from {
        [] => Err(Error::query("a FROM table is required")),
        [table] => {
            if !table.joins.is_empty() {
                return Err(Error::query("joins are not supported"));
            }
            match &table.relation {
                TableFactor::Table { name, .. } => object_name(name),
                other => Err(Error::query(format!("unsupported table expression: {other}"))),
            }
        }
        _ => Err(Error::query("only one table per query is supported")),
    }
}

/// Last part of a possibly qualified name (`strapi.posts` -> `posts`)
fn object_name(name: &ObjectName) -> Result<String> {
    name.0
        .last()
        .map(|ident| ident.value.clone())
        .ok_or_else(|| Error::query("empty table name"))
}

fn select_column(item: &SelectItem) -> Result<SelectColumn> {
    match item {
        SelectItem::Wildcard(_) | SelectItem::QualifiedWildcard(..) => Ok(SelectColumn::Wildcard),
        SelectItem::UnnamedExpr(expr) => Ok(SelectColumn::Column {
            name: column_name(expr)?,
            alias: None,
        }),
        SelectItem::ExprWithAlias { expr, alias } => Ok(SelectColumn::Column {
            name: column_name(expr)?,
            alias: Some(alias.value.clone()),
        }),
    }
}

fn column_name(expr: &Expr) -> Result<String> {
    match expr {
        Expr::Identifier(ident) => Ok(ident.value.clone()),
        Expr::CompoundIdentifier(parts) => parts
            .last()
            .map(|ident| ident.value.clone())
            .ok_or_else(|| Error::query("empty column name")),
        Expr::Nested(inner) => column_name(inner),
        other => Err(Error::query(format!("expected a column, got: {other}"))),
    }
}

/// A non-negative integer literal (LIMIT / OFFSET)
fn count(expr: &Expr) -> Result<u64> {
    literal(expr)?
        .as_u64()
        .ok_or_else(|| Error::query(format!("expected a non-negative integer, got: {expr}")))
}

/// Constant expression to JSON
fn literal(expr: &Expr) -> Result<JsonValue> {
    match expr {
        Expr::Value(value) => sql_value(value),
        Expr::Nested(inner) => literal(inner),
        Expr::UnaryOp {
            op: UnaryOperator::Minus,
            expr,
        } => match literal(expr)? {
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(JsonValue::from(-i))
                } else {
                    Ok(n.as_f64().map(|f| JsonValue::from(-f)).unwrap_or_default())
                }
            }
            other => Err(Error::query(format!("cannot negate {other}"))),
        },
        Expr::UnaryOp {
            op: UnaryOperator::Plus,
            expr,
        } => literal(expr),
        other => Err(Error::query(format!("expected a literal value, got: {other}"))),
    }
}

fn sql_value(value: &SqlValue) -> Result<JsonValue> {
    match value {
        SqlValue::Number(text, _) => {
            if let Ok(i) = text.parse::<i64>() {
                return Ok(JsonValue::from(i));
            }
            text.parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(JsonValue::Number)
                .ok_or_else(|| Error::query(format!("invalid number: {text}")))
        }
        SqlValue::SingleQuotedString(s) | SqlValue::DoubleQuotedString(s) => {
            Ok(JsonValue::String(s.clone()))
        }
        SqlValue::Boolean(b) => Ok(JsonValue::Bool(*b)),
        SqlValue::Null => Ok(JsonValue::Null),
        other => Err(Error::query(format!("unsupported literal: {other}"))),
    }
}

/// Flatten a WHERE clause into AND-ed conditions
pub fn where_conditions(selection: Option<&Expr>) -> Result<Vec<Condition>> {
    let mut conditions = Vec::new();
    if let Some(expr) = selection {
        collect_conditions(expr, &mut conditions)?;
    }
    Ok(conditions)
}

fn collect_conditions(expr: &Expr, out: &mut Vec<Condition>) -> Result<()> {
    match expr {
        Expr::Nested(inner) => collect_conditions(inner, out),

        Expr::BinaryOp {
            left,
            op: BinaryOperator::And,
            right,
        } => {
            collect_conditions(left, out)?;
            collect_conditions(right, out)
        }

        Expr::BinaryOp {
            op: BinaryOperator::Or,
            ..
        } => Err(Error::query("OR conditions are not supported")),

        Expr::BinaryOp { left, op, right } => {
            let op = comparison(op)?;
            let condition = if let Ok(column) = column_name(left) {
                Condition::new(column, op, literal(right)?)
            } else if let Ok(column) = column_name(right) {
                Condition::new(column, op.flipped(), literal(left)?)
            } else {
                return Err(Error::query(format!(
                    "a comparison needs a column on one side: {expr}"
                )));
            };

            if condition.value.is_null() {
                return Err(Error::query(format!(
                    "comparison with NULL is never true, use IS [NOT] NULL: {expr}"
                )));
            }
            out.push(condition);
            Ok(())
        }

        Expr::InList {
            expr,
            list,
            negated,
        } => {
            let values = list.iter().map(literal).collect::<Result<Vec<_>>>()?;
            let op = if *negated {
                Operator::NotIn
            } else {
                Operator::In
            };
            out.push(Condition::new(
                column_name(expr)?,
                op,
                JsonValue::Array(values),
            ));
            Ok(())
        }

        Expr::Like {
            negated,
            expr,
            pattern,
            ..
        } => {
            let JsonValue::String(pattern) = literal(pattern)? else {
                return Err(Error::query("LIKE needs a string pattern"));
            };
            let (op, value) = like_operator(&pattern, *negated)?;
            out.push(Condition::new(
                column_name(expr)?,
                op,
                JsonValue::String(value),
            ));
            Ok(())
        }

        Expr::IsNull(inner) => {
            out.push(Condition::new(
                column_name(inner)?,
                Operator::Null,
                JsonValue::Bool(true),
            ));
            Ok(())
        }

        Expr::IsNotNull(inner) => {
            out.push(Condition::new(
                column_name(inner)?,
                Operator::NotNull,
                JsonValue::Bool(true),
            ));
            Ok(())
        }

        other => Err(Error::query(format!("unsupported condition: {other}"))),
    }
}

fn comparison(op: &BinaryOperator) -> Result<Operator> {
    match op {
        BinaryOperator::Eq => Ok(Operator::Eq),
        BinaryOperator::NotEq => Ok(Operator::Ne),
        BinaryOperator::Lt => Ok(Operator::Lt),
        BinaryOperator::LtEq => Ok(Operator::Lte),
        BinaryOperator::Gt => Ok(Operator::Gt),
        BinaryOperator::GtEq => Ok(Operator::Gte),
        other => Err(Error::query(format!("unsupported operator: {other}"))),
    }
}

/// Map a LIKE pattern to a Strapi string operator
///
/// Only leading and trailing `%` are understood; `_` and inner `%` are not.
fn like_operator(pattern: &str, negated: bool) -> Result<(Operator, String)> {
    let (leading, rest) = match pattern.strip_prefix('%') {
        Some(rest) => (true, rest),
        None => (false, pattern),
    };
    let (trailing, inner) = match rest.strip_suffix('%') {
        Some(inner) => (true, inner),
        None => (false, rest),
    };

    if inner.contains('%') || inner.contains('_') {
        return Err(Error::query(format!("unsupported LIKE pattern: '{pattern}'")));
    }

    let op = match (leading, trailing, negated) {
        (true, true, false) => Operator::Contains,
        (true, true, true) => Operator::NotContains,
        (false, true, false) => Operator::StartsWith,
        (true, false, false) => Operator::EndsWith,
        (false, false, false) => Operator::Eq,
        (false, false, true) => Operator::Ne,
        _ => {
            return Err(Error::query(format!(
                "NOT LIKE '{pattern}' is not supported"
            )))
        }
    };

    Ok((op, inner.to_string()))
}
