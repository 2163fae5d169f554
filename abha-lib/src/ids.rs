use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Serialize, Deserialize};
use uuid::Uuid;

/// used when the gateway accepts an otp request without handing back a
/// transaction id
pub const DEFAULT_TXN_ID: &str = "default-txn";

/// random version 4 uuid for the REQUEST-ID header
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}

/// correlation token issued by the verification gateway for an otp request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// empty or whitespace only values fall back to [`DEFAULT_TXN_ID`]
    pub fn new<T>(given: T) -> Self
    where
        T: Into<String>
    {
        let given = given.into();

        if given.trim().is_empty() {
            TransactionId::placeholder()
        } else {
            TransactionId(given)
        }
    }

    pub fn placeholder() -> Self {
        TransactionId(DEFAULT_TXN_ID.to_owned())
    }

    pub fn is_placeholder(&self) -> bool {
        self.0 == DEFAULT_TXN_ID
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<Option<String>> for TransactionId {
    fn from(given: Option<String>) -> Self {
        match given {
            Some(v) => TransactionId::new(v),
            None => TransactionId::placeholder(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn assert_v4_shape(id: &str) {
        assert_eq!(id.len(), 36, "{id}");

        let parts: Vec<&str> = id.split('-').collect();
        let lens: Vec<usize> = parts.iter().map(|p| p.len()).collect();

        assert_eq!(lens, vec![8, 4, 4, 4, 12], "{id}");
        assert!(parts[2].starts_with('4'), "version nibble {id}");
        assert!(
            matches!(parts[3].chars().next(), Some('8' | '9' | 'a' | 'b')),
            "variant nibble {id}"
        );
        assert!(id.chars().all(|c| c == '-' || c.is_ascii_hexdigit()), "{id}");
        assert!(!id.chars().any(|c| c.is_ascii_uppercase()), "{id}");
    }

    #[test]
    fn request_id_shape() {
        for _ in 0..64 {
            assert_v4_shape(&generate_request_id());
        }
    }

    #[test]
    fn request_ids_differ() {
        assert_ne!(generate_request_id(), generate_request_id());
    }

    #[test]
    fn transaction_id_placeholder() {
        assert!(TransactionId::new("").is_placeholder());
        assert!(TransactionId::new("   ").is_placeholder());
        assert!(TransactionId::from(None).is_placeholder());

        let txn = TransactionId::from(Some(String::from("a825f76b-0696-40f3-864c-5a3a5b389a83")));

        assert!(!txn.is_placeholder());
        assert_eq!(txn.as_str(), "a825f76b-0696-40f3-864c-5a3a5b389a83");
    }
}
