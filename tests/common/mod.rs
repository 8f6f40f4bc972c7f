#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use axum::{Router, body::Body, http::Request};
use sysmon_relay::{
    routes::create_router,
    services::provider::{ChatProvider, ProviderError, ProviderTurn},
    state::AppState,
};

/// Records every call and answers with a fixed reply or error.
pub struct StubProvider {
    reply: Result<String, String>,
    pub calls: AtomicUsize,
    pub seen: Mutex<Vec<(Vec<ProviderTurn>, String)>>,
}

impl StubProvider {
    fn with_reply(reply: Result<String, String>) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn replying(text: &str) -> Arc<Self> {
        Self::with_reply(Ok(text.to_string()))
    }

    pub fn failing(err: &str) -> Arc<Self> {
        Self::with_reply(Err(err.to_string()))
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_call(&self) -> (Vec<ProviderTurn>, String) {
        self.seen.lock().unwrap().last().cloned().expect("provider was not called")
    }
}

#[async_trait]
impl ChatProvider for StubProvider {
    async fn generate(
        &self,
        history: Vec<ProviderTurn>,
        prompt: String,
    ) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push((history, prompt));
        self.reply.clone().map_err(ProviderError::Other)
    }
}

pub fn app_with(provider: Arc<StubProvider>) -> Router {
    create_router().with_state(Arc::new(AppState::new(provider)))
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
