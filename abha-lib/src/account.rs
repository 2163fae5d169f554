//! health identity accounts: numbers, addresses and the finished record

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::contact::ContactNumber;
use crate::document::DocumentNumber;
use crate::error::ValidationError;
use crate::validation::{check_fixed_digits, digits_only};

pub const ACCOUNT_DIGITS: usize = 14;
pub const ACCOUNT_FIELD: &str = "account number";
pub const ADDRESS_DOMAIN: &str = "@abha";

const ACCOUNT_GROUPS: [usize; 4] = [2, 4, 4, 4];
const MAX_LOCAL_PART: usize = 32;

/// canonical 14 digit account identifier, displayed as `NN-NNNN-NNNN-NNNN`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountNumber(String);

impl AccountNumber {
    /// a synthetic account number. the leading digit is never zero.
    pub fn generate<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized
    {
        let mut rtn = String::with_capacity(ACCOUNT_DIGITS);

        rtn.push(char::from(b'0' + rng.gen_range(1..10u8)));

        for _ in 1..ACCOUNT_DIGITS {
            rtn.push(char::from(b'0' + rng.gen_range(0..10u8)));
        }

        AccountNumber(rtn)
    }

    pub fn digits(&self) -> &str {
        &self.0
    }

    pub fn grouped(&self) -> String {
        let mut rtn = String::with_capacity(ACCOUNT_DIGITS + ACCOUNT_GROUPS.len() - 1);
        let mut offset = 0;

        for size in ACCOUNT_GROUPS {
            if offset != 0 {
                rtn.push('-');
            }

            rtn.push_str(&self.0[offset..offset + size]);
            offset += size;
        }

        rtn
    }
}

impl Display for AccountNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.grouped())
    }
}

impl TryFrom<String> for AccountNumber {
    type Error = ValidationError;

    /// accepts the bare digits or the hyphen grouped form
    fn try_from(given: String) -> Result<Self, Self::Error> {
        if given.chars().any(|ch| !ch.is_ascii_digit() && ch != '-') {
            return Err(ValidationError::NotDigits { field: ACCOUNT_FIELD });
        }

        let digits = digits_only(&given);

        check_fixed_digits(ACCOUNT_FIELD, &digits, ACCOUNT_DIGITS)?;

        Ok(AccountNumber(digits))
    }
}

impl FromStr for AccountNumber {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_owned())
    }
}

impl From<AccountNumber> for String {
    fn from(number: AccountNumber) -> String {
        number.grouped()
    }
}

fn valid_local_part(local: &str) -> bool {
    if local.is_empty() || local.len() > MAX_LOCAL_PART {
        return false;
    }

    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }

    local.chars().all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '.' || ch == '_')
}

/// human chosen alias for an account, `localpart@abha`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountAddress(String);

impl AccountAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn local_part(&self) -> &str {
        &self.0[..self.0.len() - ADDRESS_DOMAIN.len()]
    }
}

impl Display for AccountAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for AccountAddress {
    type Error = ValidationError;

    fn try_from(given: String) -> Result<Self, Self::Error> {
        let valid = given.strip_suffix(ADDRESS_DOMAIN)
            .map(valid_local_part)
            .unwrap_or(false);

        if valid {
            Ok(AccountAddress(given))
        } else {
            Err(ValidationError::Address { given })
        }
    }
}

impl FromStr for AccountAddress {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_owned())
    }
}

impl From<AccountAddress> for String {
    fn from(address: AccountAddress) -> String {
        address.0
    }
}

/// name pieces the address suggestions are built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameFragments {
    pub first: String,
    pub last: String,
    pub year: String,
    pub city: String,
}

impl Default for NameFragments {
    fn default() -> Self {
        NameFragments {
            first: "rahul".into(),
            last: "sharma".into(),
            year: "1990".into(),
            city: "delhi".into(),
        }
    }
}

fn fragment(given: &str) -> String {
    given.trim()
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

/// builds the candidate addresses offered to the user.
///
/// the output only depends on the fragments. candidates that would not be
/// valid addresses (an empty fragment for instance) and duplicates are
/// skipped, order is otherwise fixed.
pub fn suggest_addresses(fragments: &NameFragments) -> Vec<AccountAddress> {
    let first = fragment(&fragments.first);
    let last = fragment(&fragments.last);
    let year = fragment(&fragments.year);
    let city = fragment(&fragments.city);

    let first_initial: String = first.chars().take(1).collect();
    let last_initial: String = last.chars().take(1).collect();

    let candidates = [
        format!("{first}.{last}"),
        format!("{first}.{last_initial}.{year}"),
        format!("{first_initial}.{last}.{city}"),
        format!("{first}{year}"),
        format!("{last}.{first}"),
    ];

    let mut rtn: Vec<AccountAddress> = Vec::with_capacity(candidates.len());

    for local in candidates {
        let Ok(address) = AccountAddress::try_from(format!("{local}{ADDRESS_DOMAIN}")) else {
            continue;
        };

        if !rtn.contains(&address) {
            rtn.push(address);
        }
    }

    rtn
}

/// the finished account as shown on the summary screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub account_number: AccountNumber,
    pub account_address: AccountAddress,
    pub linked_contact_number: ContactNumber,
    pub linked_document_number: DocumentNumber,
}

impl AccountRecord {
    pub fn masked_document(&self) -> String {
        self.linked_document_number.masked()
    }
}
