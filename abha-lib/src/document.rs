//! government identity document (aadhaar) numbers

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Serialize, Deserialize};

use crate::error::ValidationError;
use crate::validation::{check_fixed_digits, digits_only, DigitField};

pub const DOCUMENT_DIGITS: usize = 12;
pub const DOCUMENT_FIELD: &str = "document number";

/// the literal put in front of the revealed digits of a masked document
pub const DOCUMENT_MASK: &str = "****-****-";

const REVEALED_DIGITS: usize = 4;

/// input box for a document number as it is being typed
pub fn document_field() -> DigitField {
    DigitField::new(DOCUMENT_FIELD, DOCUMENT_DIGITS)
}

/// groups digits into blocks of four separated by spaces. partial input is
/// grouped as far as it goes, a full number renders as `XXXX XXXX XXXX`.
pub fn group_digits<G>(given: G) -> String
where
    G: AsRef<str>
{
    let digits = digits_only(given);
    let mut rtn = String::with_capacity(digits.len() + digits.len() / 4);

    for (index, ch) in digits.chars().enumerate() {
        if index != 0 && index % 4 == 0 {
            rtn.push(' ');
        }

        rtn.push(ch);
    }

    rtn
}

/// masks every digit but the last four.
///
/// only the trailing digits of the input are looked at so feeding an
/// already masked value back in produces the same output.
pub fn mask_document<G>(given: G) -> String
where
    G: AsRef<str>
{
    let digits = digits_only(given);
    let skip = digits.len().saturating_sub(REVEALED_DIGITS);

    format!("{DOCUMENT_MASK}{}", &digits[skip..])
}

/// a validated 12 digit document number.
///
/// holding one proves the format is correct. `Display` renders the masked
/// form, use [`DocumentNumber::as_str`] for the raw digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentNumber(String);

impl DocumentNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn grouped(&self) -> String {
        group_digits(&self.0)
    }

    pub fn masked(&self) -> String {
        mask_document(&self.0)
    }
}

impl Display for DocumentNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.masked())
    }
}

impl TryFrom<String> for DocumentNumber {
    type Error = ValidationError;

    fn try_from(given: String) -> Result<Self, Self::Error> {
        check_fixed_digits(DOCUMENT_FIELD, &given, DOCUMENT_DIGITS)?;

        Ok(DocumentNumber(given))
    }
}

impl TryFrom<&DigitField> for DocumentNumber {
    type Error = ValidationError;

    fn try_from(field: &DigitField) -> Result<Self, Self::Error> {
        let value = field.check()?;

        DocumentNumber::try_from(value.to_owned())
    }
}

impl FromStr for DocumentNumber {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_owned())
    }
}

impl From<DocumentNumber> for String {
    fn from(doc: DocumentNumber) -> String {
        doc.0
    }
}
