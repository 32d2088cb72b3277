use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;
use tracing::{error, warn};

use campus_types::api::AssistantRequest;
use campus_types::models::{Message, Sender, UserInfo};

use crate::error::ClientError;
use crate::http::ApiClient;

pub const ASSISTANT_PATH: &str = "/assistant/request";

pub const NO_ANSWER: &str = "Cevap alınamadı.";
pub const GENERIC_FAILURE: &str = "Bir hata oluştu.";
pub const LOGIN_REQUIRED: &str = "Oturum açmanız gerekiyor. Lütfen giriş yapın.";
pub const SESSION_EXPIRED: &str = "Oturum süresi doldu veya yetkisiz. Lütfen tekrar giriş yapın.";
const SCHOOL_PLACEHOLDER: &str = "okulunuz";

/// What the chat screen needs from whatever is hosting it.
pub trait ScreenHost: Send + Sync {
    /// Blocking notice to the user.
    fn alert(&self, message: &str);
    /// Leave the chat and go back to the login screen.
    fn logout(&self);
}

#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// Blank input, or the send control was disabled.
    Ignored,
    Replied(Message),
    /// The bot bubble describing the failure.
    Failed(Message),
    /// 401 from the assistant; the host was logged out and nothing appended.
    SessionExpired,
}

#[derive(Debug, Default)]
struct ChatState {
    messages: Vec<Message>,
    typing: bool,
    input: String,
}

impl ChatState {
    fn append(&mut self, sender: Sender, text: impl Into<String>) -> Message {
        let message = Message::new(self.messages.len() as u64 + 1, sender, text);
        self.messages.push(message.clone());
        message
    }
}

/// Conversation with the assistant for one logged-in user.
///
/// Sends are not serialized: each `send_message` runs independently and its
/// reply is appended whenever it arrives, so overlapping sends may interleave.
pub struct ChatScreen {
    client: ApiClient,
    host: Arc<dyn ScreenHost>,
    user_info: Option<UserInfo>,
    state: Mutex<ChatState>,
}

impl ChatScreen {
    pub fn new(client: ApiClient, host: Arc<dyn ScreenHost>, user_info: Option<UserInfo>) -> Self {
        let mut state = ChatState::default();
        state.append(Sender::Bot, greeting(user_info.as_ref()));

        Self {
            client,
            host,
            user_info,
            state: Mutex::new(state),
        }
    }

    /// Require a stored token before any exchange. Returns whether the
    /// session may proceed.
    pub fn mount(&self) -> bool {
        let token = match self.client.store().get() {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!("Could not read session token: {}", e);
                None
            }
        };

        if token.is_none() {
            self.host.alert(LOGIN_REQUIRED);
            self.host.logout();
            return false;
        }
        true
    }

    pub fn user_info(&self) -> Option<&UserInfo> {
        self.user_info.as_ref()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.lock().messages.clone()
    }

    pub fn is_typing(&self) -> bool {
        self.lock().typing
    }

    pub fn input(&self) -> String {
        self.lock().input.clone()
    }

    pub fn set_input(&self, text: impl Into<String>) {
        self.lock().input = text.into();
    }

    /// Mirrors the send button: disabled for blank input or while typing.
    pub fn can_send(&self) -> bool {
        let state = self.lock();
        !state.input.trim().is_empty() && !state.typing
    }

    /// Send whatever is in the input buffer.
    pub async fn submit(&self) -> SendOutcome {
        if !self.can_send() {
            return SendOutcome::Ignored;
        }
        let text = std::mem::take(&mut self.lock().input);
        self.send_message(&text).await
    }

    pub async fn send_message(&self, text: &str) -> SendOutcome {
        if text.trim().is_empty() {
            return SendOutcome::Ignored;
        }

        {
            let mut state = self.lock();
            state.append(Sender::User, text);
            state.input.clear();
            state.typing = true;
        }

        let result = self
            .client
            .post(
                ASSISTANT_PATH,
                &AssistantRequest {
                    question: text.to_string(),
                },
            )
            .await;

        let outcome = match result {
            Ok(res) => SendOutcome::Replied(self.lock().append(Sender::Bot, reply_text(&res.data))),
            Err(e) => {
                error!("API error: {}", e);
                if e.is_unauthorized() {
                    self.expire_session();
                    SendOutcome::SessionExpired
                } else {
                    let text = format!("Hata: {}", error_description(&e));
                    SendOutcome::Failed(self.lock().append(Sender::Bot, text))
                }
            }
        };

        self.lock().typing = false;
        outcome
    }

    /// Header menu action.
    pub fn logout(&self) {
        self.clear_token();
        self.host.logout();
    }

    fn expire_session(&self) {
        self.clear_token();
        self.host.alert(SESSION_EXPIRED);
        self.host.logout();
    }

    fn clear_token(&self) {
        if let Err(e) = self.client.store().clear() {
            warn!("Could not clear session token: {}", e);
        }
    }

    fn lock(&self) -> MutexGuard<'_, ChatState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

pub fn greeting(user_info: Option<&UserInfo>) -> String {
    let school = user_info
        .map(|u| u.school_name.as_str())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(SCHOOL_PLACEHOLDER);
    format!(
        "Merhaba! Ben {} AI asistanıyım. Size nasıl yardımcı olabilirim?",
        school
    )
}

/// `answer`, then `message`, then the placeholder.
fn reply_text(data: &Value) -> String {
    for key in ["answer", "message"] {
        match data.get(key) {
            None | Some(Value::Null) => continue,
            Some(Value::String(s)) => return s.clone(),
            Some(other) => return other.to_string(),
        }
    }
    NO_ANSWER.to_string()
}

fn error_description(err: &ClientError) -> String {
    if let Some(message) = err.server_message() {
        return message.to_string();
    }
    let described = err.to_string();
    if described.trim().is_empty() {
        GENERIC_FAILURE.to_string()
    } else {
        described
    }
}
