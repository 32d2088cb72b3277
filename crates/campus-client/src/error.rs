use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Login response carried neither `access_token` nor `token`.
    #[error("auth error: {0}")]
    Auth(String),

    /// Server answered with a non-2xx status.
    #[error("Request failed with status code {status}")]
    Http { status: u16, body: Value },

    /// Transport failure: connect, timeout, invalid URL, unreadable body.
    #[error("{0}")]
    Network(#[from] reqwest::Error),

    #[error("token storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("token storage is corrupt: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// `error_message` supplied by the server in an error body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Http { body, .. } => body
                .get("error_message")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty()),
            _ => None,
        }
    }
}
