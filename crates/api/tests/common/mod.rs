#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use wynnpool_api::config::ServerConfig;
use wynnpool_api::router::build_app_router;
use wynnpool_api::state::AppState;
use wynnpool_core::error::CoreError;
use wynnpool_core::pool::{FetchedPool, MemoryPoolStore, PoolFetcher, PoolKind, PoolStore};
use wynnpool_core::window::PoolWindow;
use wynnpool_wynnventory::WynnventoryConfig;

pub const TEST_ORIGIN: &str = "http://localhost:3001";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![TEST_ORIGIN.to_string()],
        request_timeout_secs: 30,
        database_url: None,
        upstream: WynnventoryConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            api_key: Some("test-key".to_string()),
            timeout_secs: 5,
        },
    }
}

/// Build the production router over the given store and fetcher.
pub fn build_test_app(store: Arc<dyn PoolStore>, fetcher: Arc<FakeFetcher>) -> Router {
    let state = AppState::new(test_config(), store, fetcher);
    build_app_router(state)
}

/// Router over a fresh in-memory store.
pub fn build_default_app(fetcher: Arc<FakeFetcher>) -> Router {
    build_test_app(Arc::new(MemoryPoolStore::new()), fetcher)
}

// ---------------------------------------------------------------------------
// Fake upstream
// ---------------------------------------------------------------------------

enum Reply {
    Entries(usize),
    Unavailable,
}

/// Scripted upstream. Kinds without a reply answer with a complete rotation.
pub struct FakeFetcher {
    configured: bool,
    replies: Mutex<HashMap<PoolKind, Reply>>,
    calls: AtomicUsize,
    windows: Mutex<Vec<(PoolKind, PoolWindow)>>,
}

impl FakeFetcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::build(true))
    }

    pub fn unconfigured() -> Arc<Self> {
        Arc::new(Self::build(false))
    }

    fn build(configured: bool) -> Self {
        Self {
            configured,
            replies: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
            windows: Mutex::new(Vec::new()),
        }
    }

    /// Answer `kind` with `count` entries.
    pub fn with_entries(self: Arc<Self>, kind: PoolKind, count: usize) -> Arc<Self> {
        self.replies
            .lock()
            .unwrap()
            .insert(kind, Reply::Entries(count));
        self
    }

    /// Fail every request for `kind`.
    pub fn failing(self: Arc<Self>, kind: PoolKind) -> Arc<Self> {
        self.replies.lock().unwrap().insert(kind, Reply::Unavailable);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requested_windows(&self) -> Vec<(PoolKind, PoolWindow)> {
        self.windows.lock().unwrap().clone()
    }

    fn reply(&self, kind: PoolKind) -> Result<FetchedPool, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let replies = self.replies.lock().unwrap();
        let count = match replies.get(&kind) {
            Some(Reply::Entries(count)) => *count,
            Some(Reply::Unavailable) => {
                return Err(CoreError::UpstreamUnavailable(
                    "wynnventory API error (503): maintenance".into(),
                ))
            }
            None => kind.expected_entries(),
        };
        Ok(FetchedPool {
            entries: entries(kind, count),
            ..FetchedPool::default()
        })
    }
}

#[async_trait]
impl PoolFetcher for FakeFetcher {
    fn ensure_configured(&self) -> Result<(), CoreError> {
        if self.configured {
            Ok(())
        } else {
            Err(CoreError::Configuration(
                "WYNNVENTORY_API_KEY is not configured".into(),
            ))
        }
    }

    async fn fetch_current(&self, kind: PoolKind) -> Result<FetchedPool, CoreError> {
        tokio::task::yield_now().await;
        self.reply(kind)
    }

    async fn fetch_window(
        &self,
        kind: PoolKind,
        window: &PoolWindow,
    ) -> Result<FetchedPool, CoreError> {
        self.windows.lock().unwrap().push((kind, *window));
        tokio::task::yield_now().await;
        self.reply(kind)
    }
}

/// `count` distinguishable entries for `kind`.
pub fn entries(kind: PoolKind, count: usize) -> Vec<serde_json::Value> {
    (0..count)
        .map(|i| serde_json::json!({ "name": format!("{kind}-{i}") }))
        .collect()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request through the router.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
