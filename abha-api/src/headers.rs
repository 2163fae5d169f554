use chrono::{DateTime, SecondsFormat, Utc};

use abha_lib::ids::generate_request_id;

pub const REQUEST_ID: &str = "REQUEST-ID";
pub const TIMESTAMP: &str = "TIMESTAMP";
pub const X_CM_ID: &str = "X-CM-ID";

/// ISO-8601 in UTC with millisecond precision, `2024-01-31T09:15:02.123Z`
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// the correlation values every gateway request carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMeta {
    pub request_id: String,
    pub timestamp: String,
}

impl RequestMeta {
    pub fn new<I, T>(request_id: I, timestamp: T) -> Self
    where
        I: Into<String>,
        T: Into<String>,
    {
        RequestMeta {
            request_id: request_id.into(),
            timestamp: timestamp.into(),
        }
    }

    /// fresh request id stamped with the current time
    pub fn generate() -> Self {
        RequestMeta {
            request_id: generate_request_id(),
            timestamp: format_timestamp(&Utc::now()),
        }
    }
}
