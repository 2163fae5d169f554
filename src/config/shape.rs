use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Gateway {
    pub url: Option<String>,
    pub cm_id: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct Enrollment {
    pub url: Option<String>,
    pub scope: Option<String>,
    pub login_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SessionFile {
    pub file: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
pub struct Timing {
    pub verify_delay_ms: Option<u64>,
    pub create_delay_ms: Option<u64>,
    pub resend_cooldown_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct Suggestions {
    pub first: Option<String>,
    pub last: Option<String>,
    pub year: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub user_agent: Option<String>,

    pub gateway: Option<Gateway>,
    pub enrollment: Option<Enrollment>,

    pub session: Option<SessionFile>,
    pub flow: Option<Timing>,
    pub suggestions: Option<Suggestions>,
}
