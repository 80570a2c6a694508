#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, http::{StatusCode, Uri}, Router};
use escola_services::logic::reference::RemoteService;
use parking_lot::Mutex;
use reqwest::Client;
use serde_json::Value;
use tokio::net::TcpListener;

// Test client wrapper for making API calls
pub struct TestClient {
    client: Client,
    base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    pub async fn post(&self, path: &str, json: Value) -> reqwest::Result<reqwest::Response> {
        self.client
            .post(&format!("{}{}", self.base_url, path))
            .json(&json)
            .send()
            .await
    }

    pub async fn post_empty(&self, path: &str) -> reqwest::Result<reqwest::Response> {
        self.client
            .post(&format!("{}{}", self.base_url, path))
            .send()
            .await
    }

    pub async fn put(&self, path: &str, json: Value) -> reqwest::Result<reqwest::Response> {
        self.client
            .put(&format!("{}{}", self.base_url, path))
            .json(&json)
            .send()
            .await
    }

    pub async fn get(&self, path: &str) -> reqwest::Result<reqwest::Response> {
        self.client
            .get(&format!("{}{}", self.base_url, path))
            .send()
            .await
    }

    pub async fn delete(&self, path: &str) -> reqwest::Result<reqwest::Response> {
        self.client
            .delete(&format!("{}{}", self.base_url, path))
            .send()
            .await
    }
}

/// Status and JSON body of a response
pub async fn read(response: reqwest::Response) -> (u16, Value) {
    let status = response.status().as_u16();
    let body = response.json::<Value>().await.unwrap_or(Value::Null);
    (status, body)
}

/// Serve a router on an ephemeral port and return its base URL
pub async fn spawn(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    format!("http://{}", addr)
}

/// Base URL of a port nothing listens on
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn remote(base_url: &str) -> RemoteService {
    RemoteService::new(base_url, Duration::from_secs(5)).unwrap()
}

#[derive(Clone, Default)]
struct FakeState {
    known: Arc<HashSet<String>>,
    failing: Arc<HashSet<String>>,
    hits: Arc<Mutex<Vec<String>>>,
}

/// Stand-in for the management service.
///
/// Answers 200 for `known` paths, 500 for `failing` ones and 404 for
/// everything else, and records every path it is asked about.
pub struct FakeManagement {
    pub url: String,
    hits: Arc<Mutex<Vec<String>>>,
}

impl FakeManagement {
    pub async fn start(known: &[&str], failing: &[&str]) -> Self {
        let state = FakeState {
            known: Arc::new(known.iter().map(|p| p.to_string()).collect()),
            failing: Arc::new(failing.iter().map(|p| p.to_string()).collect()),
            hits: Arc::default(),
        };
        let hits = state.hits.clone();
        let app = Router::new().fallback(answer).with_state(state);
        Self {
            url: spawn(app).await,
            hits,
        }
    }

    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().clone()
    }
}

async fn answer(State(state): State<FakeState>, uri: Uri) -> StatusCode {
    let path = uri.path().to_string();
    state.hits.lock().push(path.clone());
    if state.known.contains(&path) {
        StatusCode::OK
    } else if state.failing.contains(&path) {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::NOT_FOUND
    }
}
