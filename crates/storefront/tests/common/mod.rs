//! Shared helpers for router tests: a counting mock transport, a test
//! configuration, and request/response plumbing.

#![allow(dead_code, clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use icedelights_core::Catalog;
use icedelights_storefront::config::StorefrontConfig;
use icedelights_storefront::services::{DeliveryReceipt, MessageTransport, TransportError};
use icedelights_storefront::state::AppState;
use serde_json::Value;
use tokio::sync::Mutex;
use tower::ServiceExt;

/// What the mock transport does when called.
#[derive(Debug, Clone)]
pub enum Reply {
    Deliver(&'static str),
    Fail { status: u16, message: &'static str },
}

/// Records every message it is asked to send.
pub struct MockTransport {
    reply: Reply,
    calls: AtomicUsize,
    sent: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn delivering() -> Arc<Self> {
        Self::new(Reply::Deliver("wamid.TEST123"))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn last_message(&self) -> Option<String> {
        self.sent.lock().await.last().cloned()
    }
}

#[async_trait]
impl MessageTransport for MockTransport {
    async fn send_text(&self, body: &str) -> Result<DeliveryReceipt, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.sent.lock().await.push(body.to_string());
        match &self.reply {
            Reply::Deliver(id) => Ok(DeliveryReceipt {
                message_id: Some((*id).to_string()),
            }),
            Reply::Fail { status, message } => Err(TransportError::Api {
                status: *status,
                message: (*message).to_string(),
            }),
        }
    }
}

pub fn test_config() -> StorefrontConfig {
    StorefrontConfig::from_lookup(|key| {
        let value = match key {
            "WHATSAPP_ACCESS_TOKEN" => "EAAGm0PX4ZCpsBAKd93ZBqLw7r1fYt2Nk8VcUoJ5hTg6",
            "WHATSAPP_PHONE_NUMBER_ID" => "106540352242922",
            "WHATSAPP_RECIPIENT_PHONE" => "15551234567",
            "WHATSAPP_TIMEOUT_MS" => "2000",
            _ => return None,
        };
        Some(value.to_string())
    })
    .unwrap()
}

pub fn app_with(transport: Arc<MockTransport>) -> Router {
    let state = AppState::new(test_config(), Catalog::default(), transport);
    icedelights_storefront::app(state)
}

/// A parsed response.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// The `name=value` part of the session cookie, if one was set.
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::to_string)
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    TestResponse {
        status,
        headers,
        body,
    }
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: &Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// A monetary JSON number as `f64`.
pub fn money(value: &Value) -> f64 {
    value.as_f64().unwrap()
}

pub fn assert_money(value: &Value, expected: f64) {
    let actual = money(value);
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
