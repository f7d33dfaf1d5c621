//! HTTP 接口测试：通过 tower::ServiceExt::oneshot 直接驱动路由

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    extract::ConnectInfo,
    http::{Request, StatusCode, header},
};
use chrono::{DateTime, Duration, Utc};
use devinfo_core::error::{CoreError, Result};
use devinfo_server::application::ports::FactCollectorPort;
use devinfo_server::application::services::StatusReporter;
use devinfo_server::domain::{ProcessClock, SystemFacts};
use devinfo_server::interface::http::{AppState, build_router};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceExt;

struct FixedCollector;

#[async_trait]
impl FactCollectorPort for FixedCollector {
    async fn collect(&self) -> Result<SystemFacts> {
        Ok(SystemFacts {
            hostname: "test-host".to_string(),
            platform: "Linux".to_string(),
            platform_version: "6.8.0-45-generic".to_string(),
            architecture: "x86_64".to_string(),
            cpu_count: 4,
            rust_version: "1.80.0".to_string(),
        })
    }
}

struct FailingCollector;

#[async_trait]
impl FactCollectorPort for FailingCollector {
    async fn collect(&self) -> Result<SystemFacts> {
        Err(CoreError::internal("secret-internal-detail"))
    }
}

struct PanickingCollector;

#[async_trait]
impl FactCollectorPort for PanickingCollector {
    async fn collect(&self) -> Result<SystemFacts> {
        panic!("secret-panic-detail")
    }
}

fn app_with(collector: Arc<dyn FactCollectorPort>, start: DateTime<Utc>) -> Router {
    let reporter = StatusReporter::new(ProcessClock::started_at(start), collector);
    build_router(AppState::new(reporter))
}

fn app() -> Router {
    app_with(Arc::new(FixedCollector), Utc::now())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Option<String>, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap();
    (status, content_type, json)
}

fn endpoint_paths(value: &Value) -> Vec<String> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["path"].as_str().unwrap().to_string())
        .collect()
}

fn assert_iso_utc(timestamp: &str) {
    let parsed = DateTime::parse_from_rfc3339(timestamp).unwrap();
    assert_eq!(parsed.offset().local_minus_utc(), 0);
    assert!(timestamp.ends_with("+00:00"), "{}", timestamp);
    assert!(timestamp.contains('.'), "missing sub-second part: {}", timestamp);
}

#[tokio::test]
async fn test_index_returns_service_document() {
    let (status, content_type, body) = send(app(), get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));

    assert_eq!(body["service"]["name"], "devops-info-service");
    assert_eq!(body["service"]["version"], "1.0.0");
    assert_eq!(body["service"]["description"], "DevOps course info service");
    assert_eq!(body["service"]["framework"], "axum");

    assert_eq!(body["system"]["hostname"], "test-host");
    assert_eq!(body["system"]["cpu_count"], 4);
    assert!(body["system"]["platform_version"].is_string());
    assert!(body["system"]["rust_version"].is_string());

    assert_eq!(body["runtime"]["timezone"], "UTC");
    assert!(body["runtime"]["uptime_seconds"].is_u64());
    assert!(body["runtime"]["uptime_human"].as_str().unwrap().contains("hour"));
    assert_iso_utc(body["runtime"]["current_time"].as_str().unwrap());

    assert_eq!(body["request"]["method"], "GET");
    assert_eq!(body["request"]["path"], "/");

    assert_eq!(endpoint_paths(&body["endpoints"]), vec!["/", "/health"]);
}

#[tokio::test]
async fn test_index_echoes_request_context() {
    let addr: SocketAddr = "10.1.2.3:54321".parse().unwrap();
    let request = Request::builder()
        .uri("/?verbose=1")
        .header(header::USER_AGENT, "curl/8.5.0")
        .extension(ConnectInfo(addr))
        .body(Body::empty())
        .unwrap();

    let (status, _, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["request"]["client_ip"], "10.1.2.3");
    assert_eq!(body["request"]["user_agent"], "curl/8.5.0");
    assert_eq!(body["request"]["path"], "/");
    assert_eq!(endpoint_paths(&body["endpoints"]), vec!["/", "/health"]);
}

#[tokio::test]
async fn test_index_defaults_unknown_user_agent_and_client() {
    let (_, _, body) = send(app(), get("/")).await;

    assert_eq!(body["request"]["user_agent"], "unknown");
    assert_eq!(body["request"]["client_ip"], "unknown");
}

#[tokio::test]
async fn test_index_reports_uptime_from_injected_clock() {
    let start = Utc::now() - Duration::seconds(7265);
    let (_, _, body) = send(app_with(Arc::new(FixedCollector), start), get("/")).await;

    let seconds = body["runtime"]["uptime_seconds"].as_u64().unwrap();
    assert!((7265..7270).contains(&seconds));
    assert_eq!(body["runtime"]["uptime_human"], "2 hours, 1 minute");
}

#[tokio::test]
async fn test_health_is_always_healthy() {
    let (status, content_type, body) = send(app(), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    assert_eq!(body["status"], "healthy");
    assert!(body["uptime_seconds"].as_u64().is_some());
    assert_iso_utc(body["timestamp"].as_str().unwrap());
}

#[tokio::test]
async fn test_health_does_not_depend_on_fact_collection() {
    let (status, _, body) = send(app_with(Arc::new(FailingCollector), Utc::now()), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_unknown_path_returns_404_envelope() {
    let (status, content_type, body) = send(app(), get("/missing-path")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    assert_eq!(body["error"], "Not Found");
    assert_eq!(
        body["message"],
        "The requested endpoint /missing-path does not exist"
    );
    assert_eq!(
        endpoint_paths(&body["available_endpoints"]),
        vec!["/", "/health"]
    );
}

#[tokio::test]
async fn test_non_get_method_returns_405_envelope() {
    let request = Request::builder()
        .method("POST")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let (status, _, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "Method Not Allowed");
    assert_eq!(body["message"], "Method POST is not allowed for /health");
    assert_eq!(body["available_endpoints"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_collector_failure_returns_generic_500() {
    let (status, _, body) = send(app_with(Arc::new(FailingCollector), Utc::now()), get("/")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal Server Error");
    assert_eq!(
        body["message"],
        "An unexpected error occurred. Please try again later."
    );
    assert!(!body.to_string().contains("secret-internal-detail"));
}

#[tokio::test]
async fn test_handler_panic_returns_generic_500() {
    let app = app_with(Arc::new(PanickingCollector), Utc::now());

    let (status, _, body) = send(app.clone(), get("/")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal Server Error");
    assert!(!body.to_string().contains("secret-panic-detail"));

    // 同一个路由实例仍可继续服务
    let (status, _, body) = send(app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}
