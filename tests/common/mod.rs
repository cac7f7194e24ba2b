//! Shared helpers: a scripted stand-in for the Odoo GraphQL endpoint and
//! builders for the application router.

#![allow(dead_code)]

use std::{
    path::Path,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, StatusCode},
    response::Response,
    routing::post,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use car_dashboard_api::{
    config::{AppConfig, Environment, GatewayConfig},
    routes::build_app,
    state::AppState,
};

pub const TEST_API_KEY: &str = "test-key-0123456789abcdef";

type Responder = dyn Fn(usize, &Value) -> (StatusCode, Value) + Send + Sync;

/// One request as seen by the mock upstream.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub headers: HeaderMap,
    pub body: Value,
}

#[derive(Clone)]
struct Upstream {
    responder: Arc<Responder>,
    delay: Duration,
    calls: Arc<Mutex<Vec<Recorded>>>,
}

/// Mock GraphQL server on an ephemeral port.
pub struct MockUpstream {
    pub endpoint: String,
    calls: Arc<Mutex<Vec<Recorded>>>,
}

impl MockUpstream {
    /// `responder` gets the zero-based call index and the request body.
    pub async fn start<F>(responder: F) -> Self
    where
        F: Fn(usize, &Value) -> (StatusCode, Value) + Send + Sync + 'static,
    {
        Self::start_with_delay(Duration::ZERO, responder).await
    }

    pub async fn start_with_delay<F>(delay: Duration, responder: F) -> Self
    where
        F: Fn(usize, &Value) -> (StatusCode, Value) + Send + Sync + 'static,
    {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let upstream = Upstream {
            responder: Arc::new(responder),
            delay,
            calls: calls.clone(),
        };
        let app = Router::new()
            .route("/graphql", post(handle))
            .with_state(upstream);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            endpoint: format!("http://{addr}/graphql"),
            calls,
        }
    }

    pub fn calls(&self) -> Vec<Recorded> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

async fn handle(
    State(upstream): State<Upstream>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let index = {
        let mut calls = upstream.calls.lock().unwrap();
        calls.push(Recorded {
            headers,
            body: body.clone(),
        });
        calls.len() - 1
    };
    if !upstream.delay.is_zero() {
        tokio::time::sleep(upstream.delay).await;
    }
    let (status, reply) = (upstream.responder)(index, &body);
    (status, Json(reply))
}

/// An endpoint nothing listens on.
pub async fn closed_endpoint() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/graphql")
}

pub fn gateway_config(endpoint: &str) -> GatewayConfig {
    GatewayConfig::new(endpoint)
        .with_api_key(TEST_API_KEY)
        .with_timeout(Duration::from_secs(5))
        .with_retries(0, Duration::from_millis(10))
}

pub fn test_config(endpoint: &str, settings_dir: &Path) -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: Environment::Development,
        allowed_origins: Vec::new(),
        api_config_path: settings_dir.join("api-config.json"),
        gateway: gateway_config(endpoint),
    }
}

pub fn build_test_app(config: AppConfig) -> Router {
    build_app(AppState::new(config).unwrap())
}

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn send_json(app: Router, method: &str, uri: &str, body: &Value) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_raw(app: Router, uri: &str, body: &'static str) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
