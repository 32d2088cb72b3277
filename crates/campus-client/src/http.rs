use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

pub use reqwest::Method;

use crate::config::ApiConfig;
use crate::error::ClientError;
use crate::storage::TokenStore;

/// Status and decoded body of a successful (2xx) call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub data: Value,
}

/// Shared client for the assistant backend.
///
/// Every request re-reads the token store and attaches the token as a bearer
/// credential. Calls are single-attempt: no caching, no retries.
#[derive(Clone)]
pub struct ApiClient {
    config: ApiConfig,
    http: reqwest::Client,
    store: Arc<dyn TokenStore>,
}

impl ApiClient {
    pub fn new(config: ApiConfig, store: Arc<dyn TokenStore>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            config,
            http,
            store,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    pub fn url(&self, path: &str) -> String {
        join_url(&self.config.base_url, path)
    }

    pub async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<ApiResponse, ClientError> {
        let body = serde_json::to_value(body)?;
        self.request(Method::POST, path, Some(&body)).await
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse, ClientError> {
        let url = self.url(path);
        let mut req = self
            .http
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(token) = self.bearer() {
            req = req.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        debug!("{} {}", method, url);
        let res = req.send().await?;
        let status = res.status();
        let text = res.text().await?;
        let data = decode_body(&text);

        if !status.is_success() {
            debug!("{} {} -> {}", method, url, status);
            return Err(ClientError::Http {
                status: status.as_u16(),
                body: data,
            });
        }

        Ok(ApiResponse {
            status: status.as_u16(),
            data,
        })
    }

    /// Store failures are treated as "not logged in".
    fn bearer(&self) -> Option<String> {
        match self.store.get() {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!("Could not read session token: {}", e);
                None
            }
        }
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
