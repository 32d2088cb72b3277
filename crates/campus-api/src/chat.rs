use axum::{Json, extract::rejection::JsonRejection, response::IntoResponse};
use tracing::{debug, warn};

use campus_types::api::{ChatReply, ChatRequest, HealthResponse};

/// Canned reply used by every stub endpoint that "answers" a question.
pub fn echo_reply(message: &str) -> String {
    format!(
        "\"{}\" hakkında size yardımcı olmaya çalışayım. Bu konuda daha detaylı bilgi verebilir misiniz?",
        message
    )
}

/// POST /api/chat — always 200, echoes the message verbatim. An unreadable
/// body is answered as an empty message.
pub async fn chat(body: Result<Json<ChatRequest>, JsonRejection>) -> impl IntoResponse {
    let req = match body {
        Ok(Json(req)) => req,
        Err(e) => {
            warn!("Unreadable chat body: {}", e);
            ChatRequest::default()
        }
    };

    if req.user_info.is_some() {
        debug!(
            "Chat message from {} ({})",
            req.user_field("email").unwrap_or("?"),
            req.user_field("schoolName").unwrap_or("?")
        );
    }

    Json(ChatReply {
        reply: echo_reply(&req.message_text()),
    })
}

pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok".into() })
}
