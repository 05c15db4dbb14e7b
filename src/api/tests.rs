//! Tests for the API caller

use super::*;
use crate::config::StrapiConfig;
use crate::connection::ConnectionManager;
use crate::error::Error;
use crate::types::Method;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use test_case::test_case;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn caller_for(server: &MockServer, token: &str) -> ApiCaller {
    let url = url::Url::parse(&server.uri()).unwrap();
    let config = StrapiConfig::from_value(&json!({
        "api_token": token,
        "host": url.host_str().unwrap(),
        "port": url.port().unwrap(),
        "pluralApiIds": ["posts"]
    }))
    .unwrap();
    ApiCaller::new(Arc::new(ConnectionManager::new(&config).unwrap()))
}

fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

#[tokio::test]
async fn test_get_list_example() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/posts"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"id": 1, "attributes": {"title": "A"}},
                {"id": 2, "attributes": {"title": "B"}}
            ]
        })))
        .mount(&mock_server)
        .await;

    let caller = caller_for(&mock_server, "tok");
    let rows = caller
        .execute(Method::GET, "/api/posts", &params(&[("limit", "2")]), None)
        .await
        .unwrap();

    assert_eq!(
        rows.to_records(),
        vec![json!({"id": 1, "title": "A"}), json!({"id": 2, "title": "B"})]
    );
}

#[tokio::test]
async fn test_get_single_object() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/posts/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": 5, "attributes": {"title": "Five", "views": 50}},
            "meta": {}
        })))
        .mount(&mock_server)
        .await;

    let caller = caller_for(&mock_server, "tok");
    let rows = caller
        .execute(Method::GET, "/api/posts/5", &[], None)
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows.to_records()[0],
        json!({"id": 5, "title": "Five", "views": 50})
    );
}

#[test_case(json!({"data": null}) ; "null data")]
#[test_case(json!({"meta": {"pagination": {}}}) ; "missing data")]
#[test_case(json!({"data": []}) ; "empty list")]
#[tokio::test]
async fn test_empty_results(payload: serde_json::Value) {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload))
        .mount(&mock_server)
        .await;

    let caller = caller_for(&mock_server, "tok");
    let rows = caller
        .execute(Method::GET, "/api/posts", &[], None)
        .await
        .unwrap();

    assert!(rows.is_empty());
}

#[test_case(404, "Not Found" ; "not found")]
#[test_case(500, "Internal Server Error" ; "server error")]
#[test_case(201, "{\"data\":null}" ; "created is not ok")]
#[tokio::test]
async fn test_non_200_is_api_error(status: u16, body: &str) {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/posts"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&mock_server)
        .await;

    let caller = caller_for(&mock_server, "tok");
    let err = caller
        .execute(Method::GET, "/api/posts", &[], None)
        .await
        .unwrap_err();

    match err {
        Error::Api {
            status: got,
            body: text,
        } => {
            assert_eq!(got, status);
            assert_eq!(text, body);
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[test_case(Method::GET ; "get")]
#[test_case(Method::POST ; "post")]
#[test_case(Method::PUT ; "put")]
#[test_case(Method::DELETE ; "delete")]
#[tokio::test]
async fn test_every_verb_sends_bearer_and_content_type(verb: Method) {
    let mock_server = MockServer::start().await;

    Mock::given(method(verb.as_str()))
        .and(path("/api/posts/1"))
        .and(header("Authorization", "Bearer right-token"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": 1, "attributes": {}}
        })))
        .mount(&mock_server)
        .await;

    let caller = caller_for(&mock_server, "right-token");
    let rows = caller
        .execute(verb, "/api/posts/1", &[], None)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);

    // A different credential is visible to the server
    let caller = caller_for(&mock_server, "wrong-token");
    let err = caller
        .execute(verb, "/api/posts/1", &[], None)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_post_sends_params_and_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/posts"))
        .and(query_param("locale", "fr"))
        .and(body_json(json!({"data": {"title": "Bonjour"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": 9, "attributes": {"title": "Bonjour"}}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let caller = caller_for(&mock_server, "tok");
    let body = json!({"data": {"title": "Bonjour"}});
    let rows = caller
        .execute(
            Method::POST,
            "/api/posts",
            &params(&[("locale", "fr")]),
            Some(&body),
        )
        .await
        .unwrap();

    assert_eq!(rows.to_records(), vec![json!({"id": 9, "title": "Bonjour"})]);
}

#[tokio::test]
async fn test_get_ignores_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/posts"))
        .respond_with(move |req: &wiremock::Request| {
            assert!(req.body.is_empty(), "GET must not carry a body");
            ResponseTemplate::new(200).set_body_json(json!({"data": []}))
        })
        .expect(1)
        .mount(&mock_server)
        .await;

    let caller = caller_for(&mock_server, "tok");
    let body = json!({"data": {"title": "ignored"}});
    caller
        .execute(Method::GET, "/api/posts", &[], Some(&body))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_execute_raw_rejects_unknown_verb() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let caller = caller_for(&mock_server, "tok");
    let err = caller
        .execute_raw("PATCH", "/api/posts/1", &[], None)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::UnsupportedMethod { .. }));
}

#[tokio::test]
async fn test_execute_raw_accepts_lowercase() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/posts/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": 3, "attributes": {"title": "gone"}}
        })))
        .mount(&mock_server)
        .await;

    let caller = caller_for(&mock_server, "tok");
    let rows = caller
        .execute_raw("delete", "/api/posts/3", &[], None)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
}
