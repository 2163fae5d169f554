use serde::{Serialize, Deserialize};
use serde_json::Value as JsonValue;
use strum::{AsRefStr as StrumAsRefStr};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq,
    StrumAsRefStr,
    Serialize, Deserialize
)]
pub enum GatewayErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    RateLimited,
    ServerError,
    Unknown,
}

impl std::fmt::Display for GatewayErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self.as_ref(), f)
    }
}

impl From<u16> for GatewayErrorKind {
    fn from(status: u16) -> Self {
        match status {
            400 | 422 => GatewayErrorKind::BadRequest,
            401 => GatewayErrorKind::Unauthorized,
            403 => GatewayErrorKind::Forbidden,
            404 => GatewayErrorKind::NotFound,
            429 => GatewayErrorKind::RateLimited,
            500..=599 => GatewayErrorKind::ServerError,
            _ => GatewayErrorKind::Unknown,
        }
    }
}

/// a non success response from the gateway.
///
/// the body is searched for a human readable `message` (top level or nested
/// under `error`) and a `code`. neither is guaranteed to exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayError {
    status: u16,
    kind: GatewayErrorKind,
    code: Option<String>,
    msg: Option<String>,
}

fn string_field<'a>(json: &'a JsonValue, key: &str) -> Option<&'a str> {
    json.get(key)
        .and_then(|v| v.as_str())
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

impl GatewayError {
    pub fn new(status: u16) -> Self {
        GatewayError {
            status,
            kind: GatewayErrorKind::from(status),
            code: None,
            msg: None,
        }
    }

    pub fn with_code<C>(mut self, code: C) -> Self
    where
        C: Into<String>
    {
        self.code = Some(code.into());
        self
    }

    pub fn with_message<M>(mut self, msg: M) -> Self
    where
        M: Into<String>
    {
        self.msg = Some(msg.into());
        self
    }

    /// builds the error from a raw response body. bodies that are not json
    /// only keep the status.
    pub fn from_body(status: u16, body: &[u8]) -> Self {
        let mut rtn = GatewayError::new(status);

        let Ok(json) = serde_json::from_slice::<JsonValue>(body) else {
            return rtn;
        };

        let nested = json.get("error").filter(|v| v.is_object());

        rtn.msg = string_field(&json, "message")
            .or_else(|| nested.and_then(|e| string_field(e, "message")))
            .map(|v| v.to_owned());

        rtn.code = string_field(&json, "code")
            .or_else(|| nested.and_then(|e| string_field(e, "code")))
            .map(|v| v.to_owned());

        rtn
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn kind(&self) -> GatewayErrorKind {
        self.kind
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.msg.as_deref()
    }

    /// the gateway message or `"{fallback} ({status})"` when it did not send one
    pub fn message_or<F>(&self, fallback: F) -> String
    where
        F: std::fmt::Display
    {
        match &self.msg {
            Some(msg) => msg.clone(),
            None => format!("{fallback} ({})", self.status),
        }
    }
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.kind, self.status)?;

        if let Some(code) = &self.code {
            write!(f, ": {}", code)?;
        }

        if let Some(msg) = &self.msg {
            write!(f, ": {}", msg)?;
        }

        Ok(())
    }
}

impl std::error::Error for GatewayError {}
