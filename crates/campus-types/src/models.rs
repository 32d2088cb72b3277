use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// A single chat bubble. Lives only as long as the chat session.
///
/// Ids are assigned as `len + 1` at append time, so they stay unique only
/// while messages are never removed from the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(id: u64, sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id,
            sender,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn is_bot(&self) -> bool {
        self.sender == Sender::Bot
    }
}

/// Identity collected by the login screen and handed to the chat screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub email: String,
    pub school_name: String,
}

impl UserInfo {
    pub fn new(email: impl Into<String>, school_name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            school_name: school_name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_info_uses_camel_case_on_the_wire() {
        let info = UserInfo::new("a@b.co", "YTU");
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["schoolName"], "YTU");
        assert_eq!(json["email"], "a@b.co");
    }

    #[test]
    fn sender_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Sender::Bot).unwrap(), "bot");
        assert_eq!(serde_json::to_value(Sender::User).unwrap(), "user");
    }
}
