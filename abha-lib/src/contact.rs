use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Serialize, Deserialize};

use crate::error::ValidationError;
use crate::validation::{check_fixed_digits, digits_only, DigitField};

pub const PASSCODE_DIGITS: usize = 6;
pub const PASSCODE_FIELD: &str = "OTP";

pub const CONTACT_DIGITS: usize = 10;
pub const CONTACT_FIELD: &str = "mobile number";
pub const CONTACT_PREFIX: &str = "+91";

/// fewer revealed digits than this can not identify a number
pub const MIN_REVEALED_DIGITS: usize = 4;

const COUNTRY_CODE: &str = "91";

pub fn passcode_field() -> DigitField {
    DigitField::new(PASSCODE_FIELD, PASSCODE_DIGITS)
}

pub fn contact_field() -> DigitField {
    DigitField::new(CONTACT_FIELD, CONTACT_DIGITS)
}

fn is_mask(ch: char) -> bool {
    matches!(ch, '*' | 'X' | 'x')
}

/// the digits following the mask of a partially hidden number,
/// `"******1234."` gives `"1234"`.
///
/// there has to be a mask in front and at least [`MIN_REVEALED_DIGITS`]
/// digits after it, any other word is not a number.
pub fn masked_suffix<G>(given: G) -> Option<String>
where
    G: AsRef<str>
{
    let given = given.as_ref();
    let (pos, _) = given.char_indices().rev().find(|(_, ch)| is_mask(*ch))?;

    if given[..pos].chars().any(|ch| ch.is_ascii_alphabetic() && !is_mask(ch)) {
        return None;
    }

    let rest = given[pos + 1..].trim_end_matches(|ch: char| !ch.is_ascii_alphanumeric());

    if rest.len() < MIN_REVEALED_DIGITS || rest.len() > CONTACT_DIGITS {
        return None;
    }

    if !rest.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    Some(rest.to_owned())
}

/// a complete mobile number with optional `+91` / `91` country code,
/// separators are ignored
pub fn full_contact<G>(given: G) -> Option<String>
where
    G: AsRef<str>
{
    let given = given.as_ref().trim();

    if given.chars().any(|ch| !ch.is_ascii_digit() && !matches!(ch, '+' | ' ' | '-')) {
        return None;
    }

    let digits = digits_only(given);

    if digits.len() == CONTACT_DIGITS {
        Some(digits)
    } else if digits.len() == CONTACT_DIGITS + COUNTRY_CODE.len() && digits.starts_with(COUNTRY_CODE) {
        Some(digits[COUNTRY_CODE.len()..].to_owned())
    } else {
        None
    }
}

/// a 6 digit one time passcode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passcode(String);

impl Passcode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Passcode {
    type Error = ValidationError;

    fn try_from(given: String) -> Result<Self, Self::Error> {
        check_fixed_digits(PASSCODE_FIELD, &given, PASSCODE_DIGITS)?;

        Ok(Passcode(given))
    }
}

impl TryFrom<&DigitField> for Passcode {
    type Error = ValidationError;

    fn try_from(field: &DigitField) -> Result<Self, Self::Error> {
        Passcode::try_from(field.check()?.to_owned())
    }
}

/// a 10 digit mobile number, without country prefix
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContactNumber(String);

impl ContactNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `+91 XXXXXXXXXX`
    pub fn linked(&self) -> String {
        format!("{CONTACT_PREFIX} {}", self.0)
    }

    /// checks the number against what the gateway revealed of the registered
    /// number, usually only the trailing digits (`******1234`).
    ///
    /// too few revealed digits means nothing can be confirmed.
    pub fn matches_registered<H>(&self, revealed: H) -> bool
    where
        H: AsRef<str>
    {
        let visible = digits_only(revealed);

        if visible.len() < MIN_REVEALED_DIGITS || visible.len() > CONTACT_DIGITS {
            return false;
        }

        self.0.ends_with(&visible)
    }
}

impl Display for ContactNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ContactNumber {
    type Error = ValidationError;

    fn try_from(given: String) -> Result<Self, Self::Error> {
        check_fixed_digits(CONTACT_FIELD, &given, CONTACT_DIGITS)?;

        Ok(ContactNumber(given))
    }
}

impl TryFrom<&DigitField> for ContactNumber {
    type Error = ValidationError;

    fn try_from(field: &DigitField) -> Result<Self, Self::Error> {
        ContactNumber::try_from(field.check()?.to_owned())
    }
}

impl FromStr for ContactNumber {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_owned())
    }
}

impl From<ContactNumber> for String {
    fn from(contact: ContactNumber) -> String {
        contact.0
    }
}
