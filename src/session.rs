//! the locally persisted gateway session.
//!
//! the store is a flat json object on disk. only two keys are written, the
//! raw session response under `session` and the time it was stored under
//! `session_created`.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde_json::{Map, Value as JsonValue};

use abha_api::session::SessionPayload;

pub const SESSION_KEY: &str = "session";
pub const SESSION_CREATED_KEY: &str = "session_created";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access session file: {0}")]
    Io(#[from] std::io::Error),

    #[error("session file is not valid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("session file does not contain a json object")]
    NotObject,
}

/// an access token along with the time it was obtained
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    payload: SessionPayload,
    created: DateTime<Utc>,
}

impl Session {
    pub fn new(payload: SessionPayload, created: DateTime<Utc>) -> Self {
        Session { payload, created }
    }

    pub fn payload(&self) -> &SessionPayload {
        &self.payload
    }

    pub fn created(&self) -> &DateTime<Utc> {
        &self.created
    }

    pub fn access_token(&self) -> Option<&str> {
        self.payload.access_token()
    }

    /// only known when the gateway sent a lifetime with the token
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let secs = self.payload.expires_in()?.clamp(0, i64::from(i32::MAX));

        self.created.checked_add_signed(Duration::seconds(secs))
    }

    pub fn is_expired(&self, now: &DateTime<Utc>) -> bool {
        match self.expires_at() {
            Some(expires) => expires <= *now,
            None => false,
        }
    }
}

#[derive(Debug)]
pub struct SessionStore {
    path: Option<Box<Path>>,
    entries: Map<String, JsonValue>,
}

impl SessionStore {
    /// a store that is never written to disk
    pub fn memory() -> Self {
        SessionStore {
            path: None,
            entries: Map::new(),
        }
    }

    /// loads the store from the given file. a missing file gives an empty
    /// store that will be created on the first save.
    pub fn load<P>(path: P) -> Result<Self, StoreError>
    where
        P: Into<PathBuf>
    {
        let path = path.into();

        let entries = match std::fs::read(&path) {
            Ok(contents) => {
                if contents.iter().all(|b| b.is_ascii_whitespace()) {
                    Map::new()
                } else {
                    match serde_json::from_slice(&contents)? {
                        JsonValue::Object(map) => map,
                        _ => return Err(StoreError::NotObject),
                    }
                }
            },
            Err(err) => match err.kind() {
                std::io::ErrorKind::NotFound => Map::new(),
                _ => return Err(StoreError::Io(err)),
            }
        };

        tracing::debug!("loaded session store \"{}\" keys: {}", path.display(), entries.len());

        Ok(SessionStore {
            path: Some(path.into_boxed_path()),
            entries,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.entries.get(key)
    }

    pub fn set<K>(&mut self, key: K, value: JsonValue)
    where
        K: Into<String>
    {
        self.entries.insert(key.into(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<JsonValue> {
        self.entries.remove(key)
    }

    /// writes the store back to its file. `false` if the store has no file
    pub fn save(&self) -> Result<bool, StoreError> {
        let Some(path) = &self.path else {
            return Ok(false);
        };

        let file = std::fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(path)?;
        let writer = std::io::BufWriter::new(file);

        serde_json::to_writer_pretty(writer, &self.entries)?;

        Ok(true)
    }

    /// the stored session. a missing or unparsable creation time is treated
    /// as the unix epoch so a token with a lifetime is considered expired.
    pub fn session(&self) -> Option<Session> {
        let payload = self.get(SESSION_KEY)?;

        if payload.is_null() {
            return None;
        }

        let created = self.get(SESSION_CREATED_KEY)
            .and_then(|v| v.as_str())
            .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
            .map(|v| v.with_timezone(&Utc))
            .unwrap_or(DateTime::<Utc>::default());

        Some(Session::new(SessionPayload::new(payload.clone()), created))
    }

    pub fn put_session(&mut self, session: &Session) {
        self.set(SESSION_KEY, session.payload().as_json().clone());
        self.set(SESSION_CREATED_KEY, JsonValue::String(session.created().to_rfc3339()));
    }

    /// stores the session and writes the file. when the write fails the
    /// previous entries are put back so memory and disk stay the same
    pub fn save_session(&mut self, session: &Session) -> Result<bool, StoreError> {
        let prev_payload = self.entries.get(SESSION_KEY).cloned();
        let prev_created = self.entries.get(SESSION_CREATED_KEY).cloned();

        self.put_session(session);

        match self.save() {
            Ok(saved) => Ok(saved),
            Err(err) => {
                self.restore(SESSION_KEY, prev_payload);
                self.restore(SESSION_CREATED_KEY, prev_created);

                Err(err)
            }
        }
    }

    fn restore(&mut self, key: &str, value: Option<JsonValue>) {
        match value {
            Some(value) => {
                self.entries.insert(key.to_owned(), value);
            },
            None => {
                self.entries.remove(key);
            }
        }
    }

    /// `true` if there was a session to remove
    pub fn clear_session(&mut self) -> bool {
        self.remove(SESSION_CREATED_KEY);
        self.remove(SESSION_KEY).is_some()
    }
}
