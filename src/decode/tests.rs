//! Tests for decoder module

use super::*;
use crate::error::Error;
use pretty_assertions::assert_eq;
use serde_json::json;

fn decode(payload: serde_json::Value) -> crate::error::Result<crate::output::RowSet> {
    EnvelopeDecoder::new().decode_value(&payload)
}

#[test]
fn test_decode_list() {
    let rows = decode(json!({
        "data": [
            {"id": 1, "attributes": {"title": "A", "views": 3}},
            {"id": 2, "attributes": {"title": "B", "views": 5}}
        ],
        "meta": {"pagination": {"page": 1, "pageSize": 25, "total": 2}}
    }))
    .unwrap();

    assert_eq!(
        rows.to_records(),
        vec![
            json!({"id": 1, "title": "A", "views": 3}),
            json!({"id": 2, "title": "B", "views": 5}),
        ]
    );
    assert_eq!(rows.columns(), vec!["id", "title", "views"]);
}

#[test]
fn test_decode_list_preserves_order() {
    let items: Vec<_> = (0..10)
        .rev()
        .map(|i| json!({"id": i, "attributes": {"rank": i}}))
        .collect();

    let rows = decode(json!({ "data": items })).unwrap();
    let ids: Vec<_> = rows.iter().map(|r| r["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![9, 8, 7, 6, 5, 4, 3, 2, 1, 0]);
}

#[test]
fn test_decode_single_object() {
    let rows = decode(json!({
        "data": {"id": 7, "attributes": {"title": "Hello", "body": null}}
    }))
    .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows.to_records(),
        vec![json!({"id": 7, "title": "Hello", "body": null})]
    );
}

#[test]
fn test_decode_empty_shapes() {
    assert!(decode(json!({"data": []})).unwrap().is_empty());
    assert!(decode(json!({"data": null})).unwrap().is_empty());
    assert!(decode(json!({"meta": {}})).unwrap().is_empty());
    assert!(decode(json!({"data": "unexpected"})).unwrap().is_empty());
    assert!(decode(json!([1, 2, 3])).unwrap().is_empty());
}

#[test]
fn test_flatten_record_id_first() {
    let row = flatten_record(&json!({
        "id": 3,
        "attributes": {"z": 1, "a": 2}
    }))
    .unwrap();

    let keys: Vec<_> = row.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["id", "z", "a"]);
}

#[test]
fn test_flatten_record_attribute_named_id_wins() {
    let row = flatten_record(&json!({
        "id": 3,
        "attributes": {"id": "custom", "title": "T"}
    }))
    .unwrap();

    assert_eq!(row["id"], json!("custom"));
    let keys: Vec<_> = row.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["id", "title"]);
}

#[test]
fn test_flatten_record_malformed() {
    let err = flatten_record(&json!({"attributes": {}})).unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));

    let err = flatten_record(&json!({"id": 1})).unwrap_err();
    assert!(err.to_string().contains("no 'attributes'"));

    let err = flatten_record(&json!({"id": 1, "attributes": [1]})).unwrap_err();
    assert!(err.to_string().contains("not an object"));
}

#[test]
fn test_decode_body() {
    let decoder = EnvelopeDecoder::new();
    let rows = decoder
        .decode(r#"{"data":{"id":1,"attributes":{"title":"A"}}}"#)
        .unwrap();
    assert_eq!(rows.len(), 1);

    let err = decoder.decode("<html>oops</html>").unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}
