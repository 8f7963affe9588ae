//! Handler-level tests over the assembled router, driving the same paths the
//! HTTP layer exposes in production.

mod common;

use std::sync::Arc;

use axum_test::TestServer;
use serde_json::{json, Value};

use flotilla::api::{build_router, ApiState};
use flotilla::provider::MockDriver;
use flotilla::storage::MemoryNlbStore;

fn test_server(driver: MockDriver) -> (Arc<MemoryNlbStore>, Arc<MockDriver>, TestServer) {
    let (store, driver, service) = common::harness(driver);
    let state = ApiState::new(Arc::new(service));
    let server = TestServer::new(build_router(state, false)).expect("router should build");
    (store, driver, server)
}

fn create_body(name: &str) -> Value {
    json!({
        "name": name,
        "connectionName": common::CONNECTION,
    })
}

#[tokio::test]
async fn post_creates_nlb_and_returns_record() {
    let (_store, _driver, server) = test_server(MockDriver::new("mock"));

    let response = server.post("/ns/ns01/nlb").json(&create_body("nlb-01")).await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let record: Value = response.json();
    assert_eq!(record["id"], "nlb-01");
    assert_eq!(record["namespace"], "ns01");
    assert_eq!(record["status"], "Active");
    assert!(record["cspNLBId"].is_string());

    let response = server.get("/ns/ns01/nlb/nlb-01").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn get_absent_returns_404_with_error_kind() {
    let (_store, _driver, server) = test_server(MockDriver::new("mock"));

    let response = server.get("/ns/ns01/nlb/missing").await;
    response.assert_status_not_found();

    let body: Value = response.json();
    assert_eq!(body["error"], "not_found");
    assert!(body["message"].as_str().unwrap().contains("missing"));
}

#[tokio::test]
async fn duplicate_post_returns_409() {
    let (_store, _driver, server) = test_server(MockDriver::new("mock"));

    server.post("/ns/ns01/nlb").json(&create_body("nlb-01")).await.assert_status(
        axum::http::StatusCode::CREATED,
    );

    let response = server.post("/ns/ns01/nlb").json(&create_body("nlb-01")).await;
    response.assert_status(axum::http::StatusCode::CONFLICT);
}

#[tokio::test]
async fn register_option_adopts_without_provisioning() {
    let (_store, driver, server) =
        test_server(MockDriver::new("mock").with_resource("csp-ext-1", "external-lb"));

    let body = json!({
        "name": "nlb-adopted",
        "connectionName": common::CONNECTION,
        "cspNLBId": "csp-ext-1",
    });

    let response = server.post("/ns/ns01/nlb?option=register").json(&body).await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let record: Value = response.json();
    assert_eq!(record["cspNLBId"], "csp-ext-1");
    assert_eq!(driver.create_calls(), 0);
}

#[tokio::test]
async fn register_unknown_resource_returns_404() {
    let (_store, _driver, server) = test_server(MockDriver::new("mock"));

    let body = json!({
        "name": "nlb-adopted",
        "connectionName": common::CONNECTION,
        "cspNLBId": "csp-missing",
    });

    let response = server.post("/ns/ns01/nlb?option=register").json(&body).await;
    response.assert_status_not_found();

    let error: Value = response.json();
    assert_eq!(error["error"], "registration_not_found");
}

#[tokio::test]
async fn invalid_option_returns_400() {
    let (_store, _driver, server) = test_server(MockDriver::new("mock"));

    let response = server.post("/ns/ns01/nlb?option=adopt").json(&create_body("nlb-01")).await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn list_supports_filters_and_id_mode() {
    let (_store, _driver, server) = test_server(MockDriver::new("mock"));

    for name in ["nlb-a", "nlb-b"] {
        server.post("/ns/ns01/nlb").json(&create_body(name)).await.assert_status(
            axum::http::StatusCode::CREATED,
        );
    }

    let response = server.get("/ns/ns01/nlb").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["nlb"].as_array().unwrap().len(), 2);

    let response = server.get("/ns/ns01/nlb?filterKey=name&filterVal=nlb-a").await;
    let body: Value = response.json();
    let nlb = body["nlb"].as_array().unwrap();
    assert_eq!(nlb.len(), 1);
    assert_eq!(nlb[0]["id"], "nlb-a");

    // id mode lists identifiers unconditionally, ignoring filters
    let response = server.get("/ns/ns01/nlb?option=id&filterKey=name&filterVal=nlb-a").await;
    let body: Value = response.json();
    assert_eq!(body["idList"], json!(["nlb-a", "nlb-b"]));
}

#[tokio::test]
async fn delete_returns_message_then_404() {
    let (_store, _driver, server) = test_server(MockDriver::new("mock"));
    server.post("/ns/ns01/nlb").json(&create_body("nlb-01")).await.assert_status(
        axum::http::StatusCode::CREATED,
    );

    let response = server.delete("/ns/ns01/nlb/nlb-01").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["message"].as_str().unwrap().contains("nlb-01"));

    server.get("/ns/ns01/nlb/nlb-01").await.assert_status_not_found();
    server.delete("/ns/ns01/nlb/nlb-01").await.assert_status_not_found();
}

#[tokio::test]
async fn unforced_delete_surfaces_teardown_conflict() {
    let (_store, _driver, server) = test_server(
        MockDriver::new("mock").with_resource("csp-1", "nlb-01").fail_delete_on("csp-1"),
    );

    let body = json!({
        "name": "nlb-01",
        "connectionName": common::CONNECTION,
        "cspNLBId": "csp-1",
    });
    server.post("/ns/ns01/nlb?option=register").json(&body).await.assert_status(
        axum::http::StatusCode::CREATED,
    );

    let response = server.delete("/ns/ns01/nlb/nlb-01").await;
    response.assert_status(axum::http::StatusCode::CONFLICT);
    let error: Value = response.json();
    assert_eq!(error["error"], "provider_teardown_failed");

    // force overrides and removes the record
    server.delete("/ns/ns01/nlb/nlb-01?force=true").await.assert_status_ok();
    server.get("/ns/ns01/nlb/nlb-01").await.assert_status_not_found();
}

#[tokio::test]
async fn delete_all_reports_typed_outcome() {
    let (store, _driver, server) = test_server(
        MockDriver::new("mock").with_resource("csp-b", "edge-b").fail_delete_on("csp-b"),
    );

    for name in ["edge-a", "core-a"] {
        server.post("/ns/ns01/nlb").json(&create_body(name)).await.assert_status(
            axum::http::StatusCode::CREATED,
        );
    }
    let body = json!({
        "name": "edge-b",
        "connectionName": common::CONNECTION,
        "cspNLBId": "csp-b",
    });
    server.post("/ns/ns01/nlb?option=register").json(&body).await.assert_status(
        axum::http::StatusCode::CREATED,
    );

    // Unforced: the failing resource stays behind and is reported
    let response = server.delete("/ns/ns01/nlb?match=edge").await;
    response.assert_status_ok();
    let outcome: Value = response.json();
    assert_eq!(outcome["deleted"], json!(["edge-a"]));
    assert_eq!(outcome["failed"][0]["id"], "edge-b");
    assert_eq!(outcome["failed"][0]["kind"], "provider_teardown_failed");

    // Forced: the namespace subset drains fully
    let response = server.delete("/ns/ns01/nlb?match=edge&force=true").await;
    let outcome: Value = response.json();
    assert_eq!(outcome["orphaned"], json!(["edge-b"]));
    assert_eq!(outcome["failed"], json!([]));
    assert_eq!(store.len(), 1); // core-a survives
}

#[tokio::test]
async fn healthz_reports_ok() {
    let (_store, _driver, server) = test_server(MockDriver::new("mock"));

    let response = server.get("/healthz").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["providers"], json!(["mock"]));
}
