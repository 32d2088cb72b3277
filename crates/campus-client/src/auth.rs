use serde_json::Value;
use tracing::{info, warn};

use campus_types::api::LoginRequest;

use crate::error::ClientError;
use crate::http::ApiClient;

pub const LOGIN_PATH: &str = "/auth/login";

/// Login/logout over the shared client and its token store.
#[derive(Clone)]
pub struct AuthHelper {
    client: ApiClient,
}

impl AuthHelper {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Exchange credentials for a token and persist it.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, ClientError> {
        let res = self
            .client
            .post(
                LOGIN_PATH,
                &LoginRequest {
                    username: username.to_string(),
                    password: password.to_string(),
                },
            )
            .await?;

        let token = extract_token(&res.data).ok_or_else(|| ClientError::Auth("no token".into()))?;
        self.client.store().set(&token)?;
        info!("Logged in as {}", username);
        Ok(token)
    }

    /// Forget the stored token. No network call.
    pub fn logout(&self) {
        if let Err(e) = self.client.store().clear() {
            warn!("Could not clear session token: {}", e);
        }
    }

    pub fn token(&self) -> Option<String> {
        match self.client.store().get() {
            Ok(token) => token,
            Err(e) => {
                warn!("Could not read session token: {}", e);
                None
            }
        }
    }
}

/// First non-empty of `access_token` / `token`.
fn extract_token(data: &Value) -> Option<String> {
    ["access_token", "token"]
        .iter()
        .filter_map(|key| data.get(*key).and_then(Value::as_str))
        .find(|t| !t.is_empty())
        .map(str::to_string)
}
