//! HTTP surface: status codes and JSON shapes the dashboard depends on.

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use common::{host, state, FakeSource};
use sysdash_agent::http::router;
use sysdash_agent::platform::Category;
use sysdash_agent::{AppState, Platform};

const GIB: u64 = 1024 * 1024 * 1024;

async fn call(st: &AppState, req: Request<Body>) -> (StatusCode, Value) {
    let resp = router(st.clone()).oneshot(req).await.expect("infallible");
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.expect("body");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn linux_state() -> AppState {
    let source = FakeSource::new(host(8 * GIB, 4 * GIB))
        .with_outputs(Category::Cpu, &[common::PROC_STAT_A, common::PROC_STAT_B])
        .with_output(Category::Memory, common::MEMINFO)
        .with_output(Category::Processes, &common::ps_output(30))
        .with_output(Category::Disks, common::DF_LINUX);
    state(Platform::Linux, source)
}

#[tokio::test]
async fn metrics_shape() {
    let st = linux_state();
    let (status, body) = call(&st, get("/metrics")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["cpu"]["usage"].is_u64(), "usage is an integer");
    assert_eq!(body["cpu"]["usage"], 50);
    assert_eq!(body["cpu"]["cores"], 8);
    assert_eq!(body["cpu"]["clockSpeed"], 3.2);
    assert_eq!(body["cpu"]["loadAverage"]["1min"], 1.5);
    assert_eq!(body["cpu"]["loadAverage"]["15min"], 0.5);
    assert_eq!(body["memory"]["total"], 15_625);
    assert_eq!(body["memory"]["usagePercentage"], 50);
    assert_eq!(body["uptime"], "3d 04:05:06");
}

#[tokio::test]
async fn metrics_are_recorded_in_history() {
    let st = linux_state();
    let (_, before) = call(&st, get("/metrics/history")).await;
    assert_eq!(before["samples"].as_array().map(Vec::len), Some(0));

    call(&st, get("/metrics")).await;
    call(&st, get("/metrics")).await;

    let (status, after) = call(&st, get("/metrics/history")).await;
    assert_eq!(status, StatusCode::OK);
    let samples = after["samples"].as_array().expect("samples array");
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0]["memory"], 50);
    assert_eq!(samples[0]["cpu"], 50);
    assert!(samples[0]["cpu"].is_u64());
    assert!(samples[0]["timestamp"].as_str().is_some_and(|t| t.contains('T')));
}

#[tokio::test]
async fn processes_and_storage_shapes() {
    let st = linux_state();
    let (status, body) = call(&st, get("/processes")).await;
    assert_eq!(status, StatusCode::OK);
    let procs = body["processes"].as_array().unwrap();
    assert_eq!(procs.len(), 20);
    for key in ["pid", "name", "cpu", "memory", "status"] {
        assert!(procs[0].get(key).is_some(), "missing {key}");
    }
    assert_eq!(procs[0]["status"], "sleeping");

    let (status, body) = call(&st, get("/storage")).await;
    assert_eq!(status, StatusCode::OK);
    let drives = body["drives"].as_array().unwrap();
    assert_eq!(drives.len(), 4);
    assert_eq!(drives[0]["name"], "/mnt/backup");
    assert_eq!(drives[0]["usagePercentage"], 90);
    assert_eq!(drives[0]["type"], "HDD");
    assert!(drives[0]["totalBytes"].as_u64().is_some());
}

#[tokio::test]
async fn probe_failure_is_a_500_with_error_message() {
    let source = FakeSource::new(host(GIB, GIB)).unavailable(Category::Disks);
    let st = state(Platform::Linux, source);
    let (status, body) = call(&st, get("/storage")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let msg = body["error"].as_str().unwrap();
    assert!(msg.starts_with("Failed to fetch storage information"), "{msg}");
}

#[tokio::test]
async fn failed_metrics_are_not_recorded() {
    let source = FakeSource::new(host(GIB, GIB))
        .with_native_cpu(5.0)
        .unavailable(Category::Memory);
    let st = state(Platform::Darwin, source);
    let (status, body) = call(&st, get("/metrics")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.get("cpu").is_none(), "no partial payload");
    assert!(st.history.lock().await.is_empty());
}

#[tokio::test]
async fn profile_defaults_and_updates() {
    let st = linux_state();
    let mut changes = st.settings.subscribe();

    let (status, body) = call(&st, get("/profile")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["profile"]["name"], "Admin User");
    assert_eq!(body["profile"]["email"], "admin@example.com");

    let (status, body) = call(
        &st,
        post_json("/profile", r#"{"name":"Ada","email":"ada@example.com"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["name"], "Ada");

    let change = changes.recv().await.expect("change published");
    assert_eq!(change.key, "profile");
    assert_eq!(change.value["email"], "ada@example.com");

    let (_, body) = call(&st, get("/profile")).await;
    assert_eq!(body["profile"]["name"], "Ada");
}

#[tokio::test]
async fn profile_rejects_incomplete_or_malformed_bodies() {
    let st = linux_state();
    for body in [r#"{"name":"Ada"}"#, r#"{"name":"","email":"x@y"}"#, "not json"] {
        let (status, resp) = call(&st, post_json("/profile", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body}");
        assert_eq!(resp["success"], false);
        assert_eq!(resp["error"], "Name and email are required");
    }
    let (_, body) = call(&st, get("/profile")).await;
    assert_eq!(body["profile"]["name"], "Admin User");
}
