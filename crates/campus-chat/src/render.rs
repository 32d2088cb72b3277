use chrono::{DateTime, Local, Utc};

use campus_client::FieldErrors;
use campus_types::models::{Message, Sender};

pub const TYPING: &str = "Asistan yazıyor...";

fn label(sender: Sender) -> &'static str {
    match sender {
        Sender::User => "Sen",
        Sender::Bot => "Asistan",
    }
}

fn clock(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M").to_string()
}

/// One chat bubble as a terminal line: `[HH:MM] Asistan: ...`.
pub fn message(message: &Message) -> String {
    format!(
        "[{}] {}: {}",
        clock(message.timestamp),
        label(message.sender),
        message.text
    )
}

/// Inline form errors, one per line, in field order.
pub fn field_errors(errors: &FieldErrors) -> Vec<String> {
    [("E-posta", &errors.email), ("Okul adı", &errors.school_name)]
        .into_iter()
        .filter_map(|(field, err)| err.as_ref().map(|e| format!("  {}: {}", field, e)))
        .collect()
}
