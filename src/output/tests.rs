//! Tests for output module

use super::*;
use arrow::array::{Array, Int64Array, StringArray};
use arrow::datatypes::DataType;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn row(value: Value) -> Row {
    match value {
        Value::Object(obj) => obj,
        other => panic!("expected object, got {other}"),
    }
}

// ============================================================================
// RowSet Tests
// ============================================================================

#[test]
fn test_rowset_columns_first_seen_order() {
    let rows = RowSet::from_rows(vec![
        row(json!({"id": 1, "title": "A"})),
        row(json!({"id": 2, "body": "text", "title": "B"})),
    ]);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows.columns(), vec!["id", "title", "body"]);
}

#[test]
fn test_rowset_column_values() {
    let rows = RowSet::from_rows(vec![
        row(json!({"id": 1, "title": "A"})),
        row(json!({"id": 2})),
    ]);

    let titles = rows.column("title");
    assert_eq!(titles, vec![Some(&json!("A")), None]);
}

#[test]
fn test_rowset_append_and_collect() {
    let mut rows = RowSet::new();
    assert!(rows.is_empty());

    rows.push(row(json!({"id": 1})));
    rows.append(RowSet::from_rows(vec![row(json!({"id": 2}))]));
    assert_eq!(rows.len(), 2);

    let ids: RowSet = rows
        .into_iter()
        .filter(|r| r["id"] == json!(2))
        .collect();
    assert_eq!(ids.to_records(), vec![json!({"id": 2})]);
}

#[test]
fn test_rowset_serializes_as_array() {
    let rows = RowSet::from_rows(vec![row(json!({"id": 1, "title": "A"}))]);
    let text = serde_json::to_string(&rows).unwrap();
    assert_eq!(text, r#"[{"id":1,"title":"A"}]"#);
}

// ============================================================================
// Schema Inference Tests
// ============================================================================

#[test]
fn test_infer_schema_empty() {
    let schema = infer_schema(&[]).unwrap();
    assert!(schema.fields().is_empty());
}

#[test]
fn test_infer_schema_keeps_column_order() {
    let rows = vec![
        row(json!({"id": 1, "title": "A", "views": 10})),
        row(json!({"id": 2, "title": "B", "views": 2.5, "published": true})),
    ];

    let schema = infer_schema(&rows).unwrap();
    let names: Vec<_> = schema.fields().iter().map(|f| f.name().as_str()).collect();
    assert_eq!(names, vec!["id", "title", "views", "published"]);

    assert_eq!(schema.field(0).data_type(), &DataType::Int64);
    assert_eq!(schema.field(1).data_type(), &DataType::Utf8);
    // Mixed int/float should become Float64
    assert_eq!(schema.field(2).data_type(), &DataType::Float64);
    assert_eq!(schema.field(3).data_type(), &DataType::Boolean);
}

#[test]
fn test_infer_schema_with_nulls() {
    let rows = vec![
        row(json!({"title": "A", "publishedAt": null})),
        row(json!({"title": "B", "publishedAt": "2024-01-01T00:00:00.000Z"})),
    ];

    let schema = infer_schema(&rows).unwrap();
    let field = schema.field_with_name("publishedAt").unwrap();
    assert_eq!(field.data_type(), &DataType::Utf8);
    assert!(field.is_nullable());
}

#[test]
fn test_infer_schema_conflicting_types() {
    let rows = vec![row(json!({"value": 1})), row(json!({"value": "one"}))];

    let schema = infer_schema(&rows).unwrap();
    assert_eq!(schema.field(0).data_type(), &DataType::Utf8);
}

#[test]
fn test_infer_schema_merges_struct_fields() {
    let rows = vec![
        row(json!({"author": {"data": null}})),
        row(json!({"author": {"data": {"id": 4}, "meta": {}}})),
    ];

    let schema = infer_schema(&rows).unwrap();
    match schema.field(0).data_type() {
        DataType::Struct(fields) => {
            let names: Vec<_> = fields.iter().map(|f| f.name().as_str()).collect();
            assert_eq!(names, vec!["data", "meta"]);
        }
        other => panic!("Expected Struct type, got {other:?}"),
    }
}

// ============================================================================
// Arrow Conversion Tests
// ============================================================================

#[test]
fn test_to_record_batch() {
    let rows = RowSet::from_rows(vec![
        row(json!({"id": 1, "title": "A"})),
        row(json!({"id": 2, "title": "B", "tags": ["x", "y"]})),
    ]);

    let batch = rows.to_record_batch().unwrap();
    assert_eq!(batch.num_rows(), 2);
    assert_eq!(batch.num_columns(), 3);

    let ids = batch
        .column(0)
        .as_any()
        .downcast_ref::<Int64Array>()
        .unwrap();
    assert_eq!(ids.value(0), 1);
    assert_eq!(ids.value(1), 2);

    let titles = batch
        .column(1)
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    assert_eq!(titles.value(1), "B");

    // First row has no tags
    assert_eq!(batch.column(2).len(), 2);
}

#[test]
fn test_to_record_batch_empty() {
    let batch = RowSet::new().to_record_batch().unwrap();
    assert_eq!(batch.num_rows(), 0);
    assert_eq!(batch.num_columns(), 0);
}

#[test]
fn test_json_to_arrow_with_schema() {
    let rows = vec![row(json!({"id": 1, "extra": "ignored"}))];
    let schema = infer_schema(&[row(json!({"id": 0}))]).unwrap();

    let batch = json_to_arrow(&rows, Some(&schema)).unwrap();
    assert_eq!(batch.num_columns(), 1);
    assert_eq!(batch.schema().field(0).name(), "id");
}
