use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ClientError;

/// The single key the session token lives under.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

pub const TOKEN_PATH_VAR: &str = "CAMPUS_TOKEN_PATH";

/// Durable home of the session token. Reads are synchronous so the HTTP
/// client can consult the store right before each request.
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Result<Option<String>, ClientError>;
    fn set(&self, token: &str) -> Result<(), ClientError>;
    fn clear(&self) -> Result<(), ClientError>;
}

/// Process-local store, used by tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Result<Option<String>, ClientError> {
        Ok(self.token.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn set(&self, token: &str) -> Result<(), ClientError> {
        *self.token.lock().unwrap_or_else(|e| e.into_inner()) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        *self.token.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

/// JSON key-value file on disk: `{"access_token": "..."}`.
///
/// Other keys already present in the file are preserved on write.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `CAMPUS_TOKEN_PATH`, else the per-user config dir, else the cwd.
    pub fn from_env() -> Self {
        let path = std::env::var(TOKEN_PATH_VAR)
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_token_path);
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Map<String, Value>, ClientError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(Map::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// The file holds a bearer credential: owner read/write only on unix.
    fn save(&self, entries: &Map<String, Value>) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;

        // `mode` only applies on creation; tighten files written by older builds.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }

        file.write_all(serde_json::to_string_pretty(entries)?.as_bytes())?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Result<Option<String>, ClientError> {
        Ok(self
            .load()?
            .remove(ACCESS_TOKEN_KEY)
            .and_then(|v| v.as_str().map(str::to_string)))
    }

    fn set(&self, token: &str) -> Result<(), ClientError> {
        let mut entries = self.load()?;
        entries.insert(ACCESS_TOKEN_KEY.to_string(), Value::String(token.to_string()));
        self.save(&entries)?;
        debug!("Session token written to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        let mut entries = self.load()?;
        if entries.remove(ACCESS_TOKEN_KEY).is_some() {
            self.save(&entries)?;
            debug!("Session token removed from {}", self.path.display());
        }
        Ok(())
    }
}

pub fn default_token_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("campus-assistant").join("session.json"))
        .unwrap_or_else(|| PathBuf::from("campus-session.json"))
}
