use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use jsonwebtoken::{EncodingKey, Header, encode};
use tokio::sync::RwLock;
use tracing::{error, info};
use uuid::Uuid;

use campus_types::api::{Claims, LoginRequest, LoginResponse, PresetRequest};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub jwt_secret: String,
    /// Last `{email, school}` posted to `/assistant/preset`.
    pub preset: RwLock<Option<PresetRequest>>,
}

impl AppStateInner {
    pub fn new(jwt_secret: impl Into<String>) -> AppState {
        Arc::new(Self {
            jwt_secret: jwt_secret.into(),
            preset: RwLock::new(None),
        })
    }
}

/// POST /auth/login — the stub accepts any non-blank credentials and issues
/// a session token.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    if req.username.trim().is_empty() || req.password.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let session_id = Uuid::new_v4();
    let token = create_token(&state.jwt_secret, session_id, req.username.trim()).map_err(|e| {
        error!("Failed to sign session token: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    info!("Session {} opened for {}", session_id, req.username.trim());

    Ok(Json(LoginResponse {
        access_token: token,
        token_type: "bearer".into(),
    }))
}

pub fn create_token(secret: &str, session_id: Uuid, username: &str) -> anyhow::Result<String> {
    let claims = Claims {
        sub: session_id,
        username: username.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::days(30)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}
