use serde::{Serialize, Deserialize};
use serde_json::Value as JsonValue;

use abha_lib::ValidationError;
use abha_lib::validation::require_present;

pub const GRANT_CLIENT_CREDENTIALS: &str = "client_credentials";

pub const CLIENT_ID_FIELD: &str = "client ID";
pub const CLIENT_SECRET_FIELD: &str = "client secret";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    pub client_id: String,
    pub client_secret: String,
    pub grant_type: String,
}

impl SessionRequest {
    /// surrounding whitespace is removed from both values
    pub fn client_credentials<I, S>(client_id: I, client_secret: S) -> Self
    where
        I: AsRef<str>,
        S: AsRef<str>,
    {
        SessionRequest {
            client_id: client_id.as_ref().trim().to_owned(),
            client_secret: client_secret.as_ref().trim().to_owned(),
            grant_type: GRANT_CLIENT_CREDENTIALS.to_owned(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_present(CLIENT_ID_FIELD, &self.client_id)?;
        require_present(CLIENT_SECRET_FIELD, &self.client_secret)?;

        Ok(())
    }
}

/// the gateway session response, kept exactly as it was received.
///
/// only the token and its lifetime are ever looked at, everything else is
/// carried along untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionPayload(JsonValue);

fn non_empty_str<'a>(json: &'a JsonValue, key: &str) -> Option<&'a str> {
    json.get(key)
        .and_then(|v| v.as_str())
        .filter(|v| !v.trim().is_empty())
}

fn seconds(json: &JsonValue, key: &str) -> Option<i64> {
    match json.get(key)? {
        JsonValue::Number(num) => num.as_i64(),
        JsonValue::String(given) => given.trim().parse().ok(),
        _ => None,
    }
}

impl SessionPayload {
    pub fn new(json: JsonValue) -> Self {
        SessionPayload(json)
    }

    /// `accessToken` is preferred over `access_token`
    pub fn access_token(&self) -> Option<&str> {
        non_empty_str(&self.0, "accessToken")
            .or_else(|| non_empty_str(&self.0, "access_token"))
    }

    pub fn token_type(&self) -> Option<&str> {
        non_empty_str(&self.0, "tokenType")
            .or_else(|| non_empty_str(&self.0, "token_type"))
    }

    /// token lifetime in seconds if the gateway provided one
    pub fn expires_in(&self) -> Option<i64> {
        seconds(&self.0, "expiresIn")
            .or_else(|| seconds(&self.0, "expires_in"))
    }

    pub fn as_json(&self) -> &JsonValue {
        &self.0
    }
}

impl From<JsonValue> for SessionPayload {
    fn from(json: JsonValue) -> Self {
        SessionPayload(json)
    }
}
