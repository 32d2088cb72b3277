use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

// -- JWT Claims --

/// Claims carried by the bearer token the stub backend issues on login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Session id, fresh per login.
    pub sub: Uuid,
    pub username: String,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
}

// -- Assistant --

#[derive(Debug, Serialize, Deserialize)]
pub struct PresetRequest {
    pub email: String,
    pub school: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssistantRequest {
    pub question: String,
}

/// Body of both `/assistant/preset` and `/assistant/request` replies.
#[derive(Debug, Serialize, Deserialize)]
pub struct AssistantResponse {
    pub answer: String,
}

/// Error body understood by the chat screen.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error_message: String,
}

// -- Echo chat --

/// Body of `POST /api/chat`. Both fields are taken as loose JSON so the echo
/// answers whatever shape the widget sends.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(rename = "userInfo", default)]
    pub user_info: Option<Value>,
}

impl ChatRequest {
    /// Strings verbatim, other JSON as its text, nothing as empty.
    pub fn message_text(&self) -> String {
        match &self.message {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    pub fn user_field(&self, key: &str) -> Option<&str> {
        self.user_info.as_ref()?.get(key)?.as_str()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
