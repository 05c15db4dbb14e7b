//! Arrow schema inference and row to Arrow conversion
//!
//! Strapi responses carry no schema, so column types are inferred from the
//! values of each response. Columns keep the order they were first seen in.

use super::rowset::Row;
use crate::error::{Error, Result};
use arrow::array::{
    ArrayRef, BooleanArray, Float64Array, Int64Array, ListArray, NullArray, StringArray,
    StructArray,
};
use arrow::buffer::OffsetBuffer;
use arrow::datatypes::{DataType, Field, Fields, Schema};
use arrow::record_batch::RecordBatch;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Infer an Arrow schema from a set of rows
///
/// Every field is nullable: a column missing from a row is a null there.
pub fn infer_schema(rows: &[Row]) -> Result<Schema> {
    let mut order: Vec<String> = Vec::new();
    let mut field_types: HashMap<String, DataType> = HashMap::new();

    for row in rows {
        for (key, value) in row {
            let inferred_type = infer_type(value);
            match field_types.get_mut(key) {
                Some(existing) => *existing = merge_types(existing, &inferred_type),
                None => {
                    order.push(key.clone());
                    field_types.insert(key.clone(), inferred_type);
                }
            }
        }
    }

    let fields: Vec<Field> = order
        .into_iter()
        .map(|name| {
            let dtype = field_types.remove(&name).unwrap_or(DataType::Null);
            Field::new(name, dtype, true)
        })
        .collect();

    Ok(Schema::new(fields))
}

/// Convert rows to an Arrow RecordBatch
///
/// Uses the provided schema or infers one from the data.
pub fn json_to_arrow(rows: &[Row], schema: Option<&Schema>) -> Result<RecordBatch> {
    let schema = match schema {
        Some(schema) => schema.clone(),
        None => infer_schema(rows)?,
    };

    if rows.is_empty() {
        return Ok(RecordBatch::new_empty(Arc::new(schema)));
    }

    let mut columns: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());

    for field in schema.fields() {
        let values: Vec<Option<&Value>> = rows.iter().map(|row| row.get(field.name())).collect();
        columns.push(build_array(&values, field.data_type())?);
    }

    RecordBatch::try_new(Arc::new(schema), columns)
        .map_err(|e| Error::output(format!("Failed to create RecordBatch: {e}")))
}

/// Infer Arrow DataType from a JSON value
fn infer_type(value: &Value) -> DataType {
    match value {
        Value::Null => DataType::Null,
        Value::Bool(_) => DataType::Boolean,
        Value::Number(n) => {
            if n.is_i64() {
                DataType::Int64
            } else {
                DataType::Float64
            }
        }
        Value::String(_) => DataType::Utf8,
        Value::Array(arr) => {
            let element_type = arr
                .iter()
                .filter(|v| !v.is_null())
                .map(infer_type)
                .reduce(|a, b| merge_types(&a, &b))
                .unwrap_or(DataType::Null);
            DataType::List(Arc::new(Field::new("item", element_type, true)))
        }
        // Arrow structs need at least one child to carry a length
        Value::Object(obj) if obj.is_empty() => DataType::Utf8,
        Value::Object(obj) => {
            let fields: Vec<Field> = obj
                .iter()
                .map(|(k, v)| Field::new(k, infer_type(v), true))
                .collect();
            DataType::Struct(Fields::from(fields))
        }
    }
}

/// Merge two data types into a compatible type
fn merge_types(type1: &DataType, type2: &DataType) -> DataType {
    match (type1, type2) {
        (a, b) if a == b => a.clone(),

        // Null can merge with anything
        (DataType::Null, other) | (other, DataType::Null) => other.clone(),

        // Mixed numbers widen to Float64
        (DataType::Int64, DataType::Float64) | (DataType::Float64, DataType::Int64) => {
            DataType::Float64
        }

        (DataType::List(a), DataType::List(b)) => DataType::List(Arc::new(Field::new(
            "item",
            merge_types(a.data_type(), b.data_type()),
            true,
        ))),

        // Relations and components: union of fields
        (DataType::Struct(a), DataType::Struct(b)) => {
            let mut merged: Vec<Field> = a.iter().map(|f| f.as_ref().clone()).collect();
            for field in b {
                match merged.iter_mut().find(|f| f.name() == field.name()) {
                    Some(existing) => {
                        let dtype = merge_types(existing.data_type(), field.data_type());
                        *existing = Field::new(field.name(), dtype, true);
                    }
                    None => merged.push(field.as_ref().clone()),
                }
            }
            DataType::Struct(Fields::from(merged))
        }

        // Different types -> fall back to String (most flexible)
        _ => DataType::Utf8,
    }
}

/// Build an Arrow array from JSON values
fn build_array(values: &[Option<&Value>], data_type: &DataType) -> Result<ArrayRef> {
    match data_type {
        DataType::Null => Ok(Arc::new(NullArray::new(values.len()))),

        DataType::Boolean => {
            let arr: BooleanArray = values.iter().map(|v| v.and_then(Value::as_bool)).collect();
            Ok(Arc::new(arr))
        }

        DataType::Int64 => {
            let arr: Int64Array = values.iter().map(|v| v.and_then(Value::as_i64)).collect();
            Ok(Arc::new(arr))
        }

        DataType::Float64 => {
            let arr: Float64Array = values.iter().map(|v| v.and_then(Value::as_f64)).collect();
            Ok(Arc::new(arr))
        }

        DataType::Utf8 => {
            let arr: StringArray = values
                .iter()
                .map(|v| {
                    v.and_then(|v| match v {
                        Value::Null => None,
                        Value::String(s) => Some(s.clone()),
                        _ => Some(v.to_string()),
                    })
                })
                .collect();
            Ok(Arc::new(arr))
        }

        DataType::List(field) => build_list_array(values, field),

        DataType::Struct(fields) => build_struct_array(values, fields),

        _ => {
            let arr: StringArray = values.iter().map(|v| v.map(ToString::to_string)).collect();
            Ok(Arc::new(arr))
        }
    }
}

/// Build a list array from JSON arrays
fn build_list_array(values: &[Option<&Value>], field: &Arc<Field>) -> Result<ArrayRef> {
    let mut all_items: Vec<Option<&Value>> = Vec::new();
    let mut offsets: Vec<i32> = vec![0];

    for value in values {
        if let Some(Value::Array(arr)) = value {
            all_items.extend(arr.iter().map(Some));
        }
        // Both array and non-array cases need an offset
        let offset = i32::try_from(all_items.len())
            .map_err(|_| Error::output("Array too large for i32 offset"))?;
        offsets.push(offset);
    }

    let items_array = build_array(&all_items, field.data_type())?;
    let offset_buffer = OffsetBuffer::new(offsets.into());

    let list_array = ListArray::new(Arc::clone(field), offset_buffer, items_array, None);
    Ok(Arc::new(list_array))
}

/// Build a struct array from JSON objects
fn build_struct_array(values: &[Option<&Value>], fields: &Fields) -> Result<ArrayRef> {
    let mut child_arrays: Vec<ArrayRef> = Vec::with_capacity(fields.len());

    for field in fields {
        let child_values: Vec<Option<&Value>> = values
            .iter()
            .map(|v| match v {
                Some(Value::Object(obj)) => obj.get(field.name()),
                _ => None,
            })
            .collect();

        child_arrays.push(build_array(&child_values, field.data_type())?);
    }

    let struct_array = StructArray::new(fields.clone(), child_arrays, None);
    Ok(Arc::new(struct_array))
}
