use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::info;

use campus_types::api::{AssistantRequest, AssistantResponse, Claims, ErrorResponse, PresetRequest};

use crate::auth::AppState;
use crate::chat::echo_reply;

/// POST /assistant/preset — remember who is about to chat and from which school.
pub async fn preset(
    State(state): State<AppState>,
    Json(req): Json<PresetRequest>,
) -> impl IntoResponse {
    let answer = format!(
        "Preset query received from {} for school {}.",
        req.email, req.school
    );
    info!("Preset stored for {} ({})", req.email, req.school);

    *state.preset.write().await = Some(req);

    Json(AssistantResponse { answer })
}

/// POST /assistant/request — stub assistant; requires a bearer token.
pub async fn request(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<AssistantRequest>,
) -> Response {
    if req.question.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error_message: "Soru boş olamaz.".into(),
            }),
        )
            .into_response();
    }

    let school = state
        .preset
        .read()
        .await
        .as_ref()
        .map(|p| p.school.clone())
        .unwrap_or_else(|| "Okul bilgisi yok".into());
    info!(
        "Question from {} (session {}, school {})",
        claims.username, claims.sub, school
    );

    Json(AssistantResponse {
        answer: echo_reply(&req.question),
    })
    .into_response()
}
