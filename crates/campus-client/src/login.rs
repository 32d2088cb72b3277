use std::sync::LazyLock;

use regex::Regex;
use tracing::{error, info};

use campus_types::api::PresetRequest;
use campus_types::models::UserInfo;

use crate::error::ClientError;
use crate::http::ApiClient;

pub const PRESET_PATH: &str = "/assistant/preset";

pub const EMAIL_REQUIRED: &str = "E-posta adresi gereklidir";
pub const EMAIL_INVALID: &str = "Geçerli bir e-posta adresi giriniz";
pub const SCHOOL_REQUIRED: &str = "Okul adı gereklidir";

// Deliberately loose: something, `@`, something, `.`, something. Unanchored.
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern compiles"));

/// Inline validation errors, keyed by form field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub email: Option<String>,
    pub school_name: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.school_name.is_none()
    }

    /// Look up by the form's field key (`email`, `schoolName`).
    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            "email" => self.email.as_deref(),
            "schoolName" => self.school_name.as_deref(),
            _ => None,
        }
    }
}

pub fn validate(email: &str, school_name: &str) -> FieldErrors {
    let mut errors = FieldErrors::default();

    if email.trim().is_empty() {
        errors.email = Some(EMAIL_REQUIRED.into());
    } else if !EMAIL_PATTERN.is_match(email) {
        errors.email = Some(EMAIL_INVALID.into());
    }

    if school_name.trim().is_empty() {
        errors.school_name = Some(SCHOOL_REQUIRED.into());
    }

    errors
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    Editing,
    Submitting,
    /// Control has passed to the chat screen.
    HandedOff,
}

#[derive(Debug)]
pub enum LoginOutcome {
    /// Validation failed; nothing was sent.
    Invalid(FieldErrors),
    /// A submit is already in flight.
    Busy,
    /// The preset call failed; the form is editable again.
    Failed(ClientError),
    LoggedIn(UserInfo),
}

pub struct LoginScreen {
    client: ApiClient,
    pub email: String,
    pub school_name: String,
    errors: FieldErrors,
    state: LoginState,
    submit_error: Option<String>,
}

impl LoginScreen {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            email: String::new(),
            school_name: String::new(),
            errors: FieldErrors::default(),
            state: LoginState::Editing,
            submit_error: None,
        }
    }

    pub fn state(&self) -> LoginState {
        self.state
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Last preset failure. The form itself stays usable.
    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    pub fn can_submit(&self) -> bool {
        self.state == LoginState::Editing
    }

    pub fn validate(&mut self) -> bool {
        self.errors = validate(&self.email, &self.school_name);
        self.errors.is_empty()
    }

    pub async fn submit(&mut self) -> LoginOutcome {
        if self.state == LoginState::Submitting {
            return LoginOutcome::Busy;
        }
        if !self.validate() {
            return LoginOutcome::Invalid(self.errors.clone());
        }

        self.state = LoginState::Submitting;
        self.submit_error = None;

        let req = PresetRequest {
            email: self.email.clone(),
            school: self.school_name.clone(),
        };

        match self.client.post(PRESET_PATH, &req).await {
            Ok(res) => {
                info!("API response: {}", res.data);
                self.state = LoginState::HandedOff;
                LoginOutcome::LoggedIn(UserInfo::new(self.email.clone(), self.school_name.clone()))
            }
            Err(e) => {
                error!("API error: {}", e);
                self.state = LoginState::Editing;
                self.submit_error = Some(e.to_string());
                LoginOutcome::Failed(e)
            }
        }
    }
}
