pub mod assistant;
pub mod auth;
pub mod chat;
pub mod middleware;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

use crate::auth::AppState;
use crate::middleware::require_auth;

/// Build the stub backend's routes. Transport layers (CORS, tracing) are
/// added by the binary.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(chat::health))
        .route("/api/chat", post(chat::chat))
        .route("/auth/login", post(auth::login))
        .route("/assistant/preset", post(assistant::preset))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/assistant/request", post(assistant::request))
        .layer(axum_middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    Router::new().merge(public_routes).merge(protected_routes)
}
