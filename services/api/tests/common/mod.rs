//! Shared fixtures for the router tests: an in-memory store, a scripted
//! auth authority and a helper that drives one request through the router.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use neurone_profile_core::ports::{AuthVerdict, AuthorityService, PortError, PortResult};
use profile_api::{adapters::MemoryAdapter, config::Config, web, web::state::AppState};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use tower::ServiceExt;

pub const USER: &str = "5f8d0d55b54764421b7156c9";
pub const TOKEN: &str = "good-token";

#[derive(Clone, Copy)]
pub enum Script {
    Grant,
    Deny,
    Unreachable,
}

/// An authority that answers from a script and records what it was asked.
pub struct StubAuthority {
    script: Script,
    calls: AtomicUsize,
    tokens: Mutex<Vec<String>>,
}

impl StubAuthority {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
            tokens: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn tokens(&self) -> Vec<String> {
        self.tokens.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuthorityService for StubAuthority {
    async fn check_token(&self, token: &str) -> PortResult<AuthVerdict> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.tokens.lock().unwrap().push(token.to_string());
        match self.script {
            Script::Grant => Ok(AuthVerdict::Granted),
            Script::Deny => Ok(AuthVerdict::Denied("Invalid token".to_string())),
            Script::Unreachable => Err(PortError::Unexpected("connection refused".to_string())),
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryAdapter>,
    pub authority: Arc<StubAuthority>,
}

impl TestApp {
    pub fn new(script: Script) -> Self {
        Self::with_env(script, &[])
    }

    pub fn with_env(script: Script, extra: &[(&str, &str)]) -> Self {
        let mut vars: HashMap<String, String> = HashMap::new();
        vars.insert("STORAGE_BACKEND".to_string(), "memory".to_string());
        for (key, value) in extra {
            vars.insert(key.to_string(), value.to_string());
        }
        let config = Config::from_lookup(|key| vars.get(key).cloned()).unwrap();

        let store = Arc::new(MemoryAdapter::new());
        let authority = Arc::new(StubAuthority::new(script));
        let state = Arc::new(AppState {
            store: store.clone(),
            authority: authority.clone(),
            config: Arc::new(config),
        });
        Self {
            router: web::router(state),
            store,
            authority,
        }
    }

    /// Sends a request carrying the default bearer token.
    pub async fn call(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.call_with_token(method, uri, Some(TOKEN), body).await
    }

    pub async fn call_with_token(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let body = body.map(|b| b.to_string());
        let (status, bytes) = self.call_raw(method, uri, token, body).await;
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn call_raw(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<String>,
    ) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let req = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }
}
