//! Minimal in-process chat-completions endpoint for tests

#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap, Method, StatusCode, Uri},
    response::IntoResponse,
    Router,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use worklog_core::EndpointConfig;
use worklog_synth::ReportClient;

/// A request as the server saw it
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: String,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

struct Canned {
    status: StatusCode,
    body: String,
    delay: Duration,
    requests: Mutex<Vec<CapturedRequest>>,
}

pub struct MockServer {
    pub url: String,
    state: Arc<Canned>,
}

impl MockServer {
    /// Answer every request with `status` and `body`
    pub async fn start(status: u16, body: impl Into<String>) -> Self {
        Self::start_with_delay(status, body, Duration::ZERO).await
    }

    pub async fn start_with_delay(status: u16, body: impl Into<String>, delay: Duration) -> Self {
        let state = Arc::new(Canned {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.into(),
            delay,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .fallback(chat_completions)
            .with_state(Arc::clone(&state));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            url: format!("http://{}/v1/chat/completions", addr),
            state,
        }
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn endpoint(&self) -> EndpointConfig {
        let mut endpoint = EndpointConfig::new();
        endpoint.endpoint_url = self.url.clone();
        endpoint.model = "test-model".to_string();
        endpoint.timeout_secs = 5;
        endpoint
    }

    pub fn client(&self) -> ReportClient {
        client_for(self.endpoint())
    }
}

async fn chat_completions(
    State(state): State<Arc<Canned>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    state.requests.lock().unwrap().push(CapturedRequest {
        method,
        path: uri.path().to_string(),
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }

    (
        state.status,
        [(CONTENT_TYPE, "application/json")],
        state.body.clone(),
    )
}

/// Client that never routes loopback traffic through a system proxy
pub fn client_for(endpoint: EndpointConfig) -> ReportClient {
    let http = reqwest::Client::builder()
        .no_proxy()
        .timeout(endpoint.timeout())
        .build()
        .unwrap();
    ReportClient::with_http(endpoint, http)
}

/// A chat-completion body whose first choice carries `content`
pub fn completion_body(content: &str) -> String {
    serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [
            {
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }
        ]
    })
    .to_string()
}
