use std::io::Write;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Local, SecondsFormat, Utc};

use abha_lib::account::AccountRecord;

use crate::session::Session;

/// OSC 52 sequence asking the terminal to place `text` on the clipboard
pub fn osc52_copy(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}

fn local_time(dt: &DateTime<Utc>) -> String {
    dt.with_timezone(&Local).to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn write_summary<W>(out: &mut W, record: &AccountRecord) -> std::io::Result<()>
where
    W: Write
{
    writeln!(out, "account created")?;
    writeln!(out, "  account number:  {}", record.account_number)?;
    writeln!(out, "  account address: {}", record.account_address)?;
    writeln!(out, "  aadhaar number:  {}", record.masked_document())?;
    writeln!(out, "  linked mobile:   {}", record.linked_contact_number.linked())?;

    Ok(())
}

/// the stored session without revealing the token itself
pub fn write_session_status<W>(
    out: &mut W,
    session: Option<&Session>,
    file: Option<&Path>
) -> std::io::Result<()>
where
    W: Write
{
    if let Some(path) = file {
        writeln!(out, "session file: {}", path.display())?;
    }

    let Some(session) = session else {
        writeln!(out, "no session stored")?;

        return Ok(());
    };

    writeln!(out, "session created: {}", local_time(session.created()))?;

    match session.expires_at() {
        Some(expires) => {
            let state = if session.is_expired(&Utc::now()) {
                "expired"
            } else {
                "valid"
            };

            writeln!(out, "expires: {} ({state})", local_time(&expires))?;
        },
        None => writeln!(out, "expires: unknown")?,
    }

    let token = if session.access_token().is_some() {
        "present"
    } else {
        "missing"
    };

    writeln!(out, "access token: {token}")?;

    Ok(())
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use abha_api::session::SessionPayload;

    use super::*;

    fn record() -> AccountRecord {
        AccountRecord {
            account_number: "12-3456-7890-1234".parse().unwrap(),
            account_address: "rahul.sharma@abha".parse().unwrap(),
            linked_contact_number: "9876543210".parse().unwrap(),
            linked_document_number: "123456789012".parse().unwrap(),
        }
    }

    #[test]
    fn clipboard_sequence() {
        assert_eq!(osc52_copy("12-3456-7890-1234"), "\x1b]52;c;MTItMzQ1Ni03ODkwLTEyMzQ=\x07");
    }

    #[test]
    fn summary_masks_document() {
        let mut out = Vec::new();
        write_summary(&mut out, &record()).unwrap();

        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("12-3456-7890-1234"));
        assert!(text.contains("rahul.sharma@abha"));
        assert!(text.contains("****-****-9012"));
        assert!(text.contains("+91 9876543210"));
        assert!(!text.contains("123456789012"));
    }

    #[test]
    fn status_hides_token() {
        let session = Session::new(
            SessionPayload::new(json!({"accessToken": "super-secret", "expiresIn": 60})),
            Utc::now()
        );
        let mut out = Vec::new();

        write_session_status(&mut out, Some(&session), None).unwrap();

        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("access token: present"));
        assert!(text.contains("(valid)"));
        assert!(!text.contains("super-secret"));

        let mut out = Vec::new();
        write_session_status(&mut out, None, Some(Path::new("abha_session.json"))).unwrap();

        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("session file: abha_session.json"));
        assert!(text.contains("no session stored"));
    }
}
