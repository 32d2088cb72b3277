mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use serde_json::{Value, json};
use tokio::sync::Notify;

use campus_client::chat::{LOGIN_REQUIRED, NO_ANSWER, SESSION_EXPIRED};
use campus_client::{ChatScreen, MemoryTokenStore, SendOutcome, TokenStore};
use campus_types::models::{Sender, UserInfo};

use common::{Hits, RecordingHost, client, spawn, store_with};

/// Assistant that always answers with `body`.
async fn assistant_replying(status: StatusCode, body: Value, hits: Hits) -> String {
    let router = Router::new()
        .route(
            "/assistant/request",
            post(move |State(hits): State<Hits>| {
                let body = body.clone();
                async move {
                    hits.bump();
                    (status, Json(body))
                }
            }),
        )
        .with_state(hits);
    spawn(router).await
}

fn screen(base: &str, store: Arc<MemoryTokenStore>, host: Arc<RecordingHost>) -> ChatScreen {
    ChatScreen::new(
        client(base, store),
        host,
        Some(UserInfo::new("a@b.co", "YTU")),
    )
}

#[tokio::test]
async fn starts_with_school_greeting() {
    let host = Arc::new(RecordingHost::default());
    let chat = screen("http://127.0.0.1:9", store_with("T"), host);

    let messages = chat.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].id, 1);
    assert_eq!(messages[0].sender, Sender::Bot);
    assert!(messages[0].text.contains("Ben YTU AI asistanıyım"));
    assert!(!chat.is_typing());
}

#[tokio::test]
async fn answer_field_becomes_bot_message() {
    let hits = Hits::default();
    let base = assistant_replying(StatusCode::OK, json!({ "answer": "X" }), hits.clone()).await;
    let host = Arc::new(RecordingHost::default());
    let chat = screen(&base, store_with("T"), host.clone());

    let outcome = chat.send_message("Merhaba").await;

    let messages = chat.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1].sender, Sender::User);
    assert_eq!(messages[1].text, "Merhaba");
    assert_eq!(messages[1].id, 2);
    assert_eq!(messages[2].sender, Sender::Bot);
    assert_eq!(messages[2].text, "X");
    assert_eq!(messages[2].id, 3);
    assert!(matches!(outcome, SendOutcome::Replied(ref m) if m.text == "X"));
    assert!(!chat.is_typing());
    assert_eq!(hits.count(), 1);
    assert!(host.alerts().is_empty());
}

#[tokio::test]
async fn message_field_is_the_fallback() {
    let base = assistant_replying(StatusCode::OK, json!({ "message": "Y" }), Hits::default()).await;
    let chat = screen(&base, store_with("T"), Arc::new(RecordingHost::default()));

    chat.send_message("soru").await;

    assert_eq!(chat.messages().last().unwrap().text, "Y");
}

#[tokio::test]
async fn missing_fields_yield_placeholder() {
    let base = assistant_replying(StatusCode::OK, json!({ "result": "?" }), Hits::default()).await;
    let chat = screen(&base, store_with("T"), Arc::new(RecordingHost::default()));

    chat.send_message("soru").await;

    assert_eq!(chat.messages().last().unwrap().text, NO_ANSWER);
    assert_eq!(NO_ANSWER, "Cevap alınamadı.");
}

#[tokio::test]
async fn blank_input_is_a_no_op() {
    let hits = Hits::default();
    let base = assistant_replying(StatusCode::OK, json!({ "answer": "X" }), hits.clone()).await;
    let chat = screen(&base, store_with("T"), Arc::new(RecordingHost::default()));

    for text in ["", "   ", "\n\t "] {
        assert_eq!(chat.send_message(text).await, SendOutcome::Ignored);
    }

    assert_eq!(chat.messages().len(), 1);
    assert!(!chat.is_typing());
    assert_eq!(hits.count(), 0);
}

#[tokio::test]
async fn unauthorized_logs_out_without_bubble() {
    let base = assistant_replying(
        StatusCode::UNAUTHORIZED,
        json!({ "detail": "expired" }),
        Hits::default(),
    )
    .await;
    let store = store_with("T");
    let host = Arc::new(RecordingHost::default());
    let chat = screen(&base, store.clone(), host.clone());

    let outcome = chat.send_message("soru").await;

    assert_eq!(outcome, SendOutcome::SessionExpired);
    assert_eq!(store.get().unwrap(), None);
    assert_eq!(host.logouts(), 1);
    assert_eq!(host.alerts(), vec![SESSION_EXPIRED.to_string()]);

    let messages = chat.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].sender, Sender::User);
    assert!(!chat.is_typing());
}

#[tokio::test]
async fn server_error_message_is_shown() {
    let base = assistant_replying(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error_message": "model meşgul" }),
        Hits::default(),
    )
    .await;
    let host = Arc::new(RecordingHost::default());
    let chat = screen(&base, store_with("T"), host.clone());

    let outcome = chat.send_message("soru").await;

    let last = chat.messages().last().unwrap().clone();
    assert_eq!(last.sender, Sender::Bot);
    assert_eq!(last.text, "Hata: model meşgul");
    assert!(matches!(outcome, SendOutcome::Failed(_)));
    assert_eq!(host.logouts(), 0);
}

#[tokio::test]
async fn http_error_without_body_uses_status_description() {
    let base = assistant_replying(StatusCode::BAD_GATEWAY, json!({}), Hits::default()).await;
    let chat = screen(&base, store_with("T"), Arc::new(RecordingHost::default()));

    chat.send_message("soru").await;

    assert_eq!(
        chat.messages().last().unwrap().text,
        "Hata: Request failed with status code 502"
    );
}

#[tokio::test]
async fn transport_failure_becomes_error_bubble() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let host = Arc::new(RecordingHost::default());
    let chat = screen(&format!("http://{}", addr), store_with("T"), host.clone());

    let outcome = chat.send_message("soru").await;

    let last = chat.messages().last().unwrap().clone();
    assert!(last.text.starts_with("Hata: "));
    assert!(last.text.len() > "Hata: ".len());
    assert!(matches!(outcome, SendOutcome::Failed(_)));
    assert_eq!(host.logouts(), 0);
    assert!(!chat.is_typing());
}

#[tokio::test]
async fn user_message_lands_before_reply() {
    let release = Arc::new(Notify::new());
    let gate = release.clone();
    let router = Router::new().route(
        "/assistant/request",
        post(move || {
            let gate = gate.clone();
            async move {
                gate.notified().await;
                Json(json!({ "answer": "geç cevap" }))
            }
        }),
    );
    let base = spawn(router).await;
    let chat = Arc::new(screen(&base, store_with("T"), Arc::new(RecordingHost::default())));

    let pending = tokio::spawn({
        let chat = chat.clone();
        async move { chat.send_message("bekle").await }
    });

    let mut waited = Duration::ZERO;
    while chat.messages().len() < 2 {
        assert!(waited < Duration::from_secs(5), "user message never appended");
        tokio::time::sleep(Duration::from_millis(10)).await;
        waited += Duration::from_millis(10);
    }

    let messages = chat.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].text, "bekle");
    assert!(chat.is_typing());

    release.notify_one();
    pending.await.unwrap();

    assert_eq!(chat.messages().len(), 3);
    assert_eq!(chat.messages()[2].text, "geç cevap");
    assert!(!chat.is_typing());
}

#[tokio::test]
async fn concurrent_sends_each_get_a_reply() {
    let router = Router::new().route(
        "/assistant/request",
        post(|Json(body): Json<Value>| async move {
            Json(json!({ "answer": format!("re: {}", body["question"].as_str().unwrap_or("")) }))
        }),
    );
    let base = spawn(router).await;
    let chat = Arc::new(screen(&base, store_with("T"), Arc::new(RecordingHost::default())));

    let (a, b) = tokio::join!(chat.send_message("bir"), chat.send_message("iki"));
    assert!(matches!(a, SendOutcome::Replied(_)));
    assert!(matches!(b, SendOutcome::Replied(_)));

    let texts: Vec<String> = chat.messages().into_iter().map(|m| m.text).collect();
    assert_eq!(texts.len(), 5);
    for expected in ["bir", "iki", "re: bir", "re: iki"] {
        assert!(texts.iter().any(|t| t == expected), "missing {}", expected);
    }
}

#[tokio::test]
async fn mount_without_token_forces_logout() {
    let host = Arc::new(RecordingHost::default());
    let chat = screen(
        "http://127.0.0.1:9",
        Arc::new(MemoryTokenStore::new()),
        host.clone(),
    );

    assert!(!chat.mount());
    assert_eq!(host.alerts(), vec![LOGIN_REQUIRED.to_string()]);
    assert_eq!(host.logouts(), 1);
}

#[tokio::test]
async fn mount_with_token_proceeds() {
    let host = Arc::new(RecordingHost::default());
    let chat = screen("http://127.0.0.1:9", store_with("T"), host.clone());

    assert!(chat.mount());
    assert!(host.alerts().is_empty());
    assert_eq!(host.logouts(), 0);
}

#[tokio::test]
async fn submit_sends_and_clears_input() {
    let base = assistant_replying(StatusCode::OK, json!({ "answer": "X" }), Hits::default()).await;
    let chat = screen(&base, store_with("T"), Arc::new(RecordingHost::default()));

    chat.set_input("   ");
    assert!(!chat.can_send());
    assert_eq!(chat.submit().await, SendOutcome::Ignored);

    chat.set_input("Kütüphane saatleri?");
    assert!(chat.can_send());
    chat.submit().await;

    assert_eq!(chat.input(), "");
    assert_eq!(chat.messages()[1].text, "Kütüphane saatleri?");
    assert_eq!(chat.messages()[2].text, "X");
}

#[tokio::test]
async fn header_logout_clears_token() {
    let store = store_with("T");
    let host = Arc::new(RecordingHost::default());
    let chat = screen("http://127.0.0.1:9", store.clone(), host.clone());

    chat.logout();

    assert_eq!(store.get().unwrap(), None);
    assert_eq!(host.logouts(), 1);
    assert!(host.alerts().is_empty());
}
