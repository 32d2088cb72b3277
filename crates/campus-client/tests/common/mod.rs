#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;

use campus_client::{ApiClient, ApiConfig, MemoryTokenStore, ScreenHost, TokenStore};

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

pub fn client(base_url: &str, store: Arc<dyn TokenStore>) -> ApiClient {
    let config = ApiConfig::new(base_url).with_timeout(Duration::from_secs(5));
    ApiClient::new(config, store).unwrap()
}

pub fn store_with(token: &str) -> Arc<MemoryTokenStore> {
    Arc::new(MemoryTokenStore::with_token(token))
}

/// Host that records what the chat screen asked of it.
#[derive(Default)]
pub struct RecordingHost {
    alerts: Mutex<Vec<String>>,
    logouts: AtomicUsize,
}

impl RecordingHost {
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }

    pub fn logouts(&self) -> usize {
        self.logouts.load(Ordering::SeqCst)
    }
}

impl ScreenHost for RecordingHost {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }

    fn logout(&self) {
        self.logouts.fetch_add(1, Ordering::SeqCst);
    }
}

/// Counts requests that reach a handler.
#[derive(Clone, Default)]
pub struct Hits(Arc<AtomicUsize>);

impl Hits {
    pub fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}
