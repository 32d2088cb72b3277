//! Client side of the student assistant: configuration, token storage, the
//! bearer-aware HTTP client and the login/chat screen state machines that a
//! front-end drives.

pub mod auth;
pub mod chat;
pub mod config;
pub mod error;
pub mod http;
pub mod login;
pub mod storage;

pub use auth::AuthHelper;
pub use chat::{ChatScreen, ScreenHost, SendOutcome};
pub use config::ApiConfig;
pub use error::ClientError;
pub use http::{ApiClient, ApiResponse};
pub use login::{FieldErrors, LoginOutcome, LoginScreen, LoginState};
pub use storage::{FileTokenStore, MemoryTokenStore, TokenStore};
