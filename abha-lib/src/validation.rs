use crate::error::ValidationError;

/// strips everything that is not an ascii digit
pub fn digits_only<G>(given: G) -> String
where
    G: AsRef<str>
{
    given.as_ref()
        .chars()
        .filter(|ch| ch.is_ascii_digit())
        .collect()
}

/// strips non digits and truncates the result to `max_digits`
pub fn clamp_digits<G>(given: G, max_digits: usize) -> String
where
    G: AsRef<str>
{
    given.as_ref()
        .chars()
        .filter(|ch| ch.is_ascii_digit())
        .take(max_digits)
        .collect()
}

/// checks that a value is exactly `expected` ascii digits
pub fn check_fixed_digits<G>(
    field: &'static str,
    given: G,
    expected: usize
) -> Result<(), ValidationError>
where
    G: AsRef<str>
{
    let given_ref = given.as_ref();

    if !given_ref.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::NotDigits { field });
    }

    let count = given_ref.len();

    if count != expected {
        return Err(ValidationError::Length {
            field,
            expected,
            given: count
        });
    }

    Ok(())
}

/// returns the trimmed value or a Required error if nothing is left
pub fn require_present<'a>(
    field: &'static str,
    given: &'a str
) -> Result<&'a str, ValidationError> {
    let trimmed = given.trim();

    if trimmed.is_empty() {
        Err(ValidationError::Required { field })
    } else {
        Ok(trimmed)
    }
}

/// a numeric input that only ever holds up to `max` digits.
///
/// mirrors what an input box does as the user types: anything that is not a
/// digit is dropped and the value is cut at the maximum length. submission is
/// gated on [`DigitField::is_complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitField {
    field: &'static str,
    value: String,
    max: usize,
}

impl DigitField {
    pub fn new(field: &'static str, max: usize) -> Self {
        DigitField {
            field,
            value: String::with_capacity(max),
            max,
        }
    }

    pub fn set<G>(&mut self, given: G)
    where
        G: AsRef<str>
    {
        self.value = clamp_digits(given, self.max);
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn is_complete(&self) -> bool {
        self.value.len() == self.max
    }

    /// the current value if it is complete, otherwise the error that would be
    /// shown to the user
    pub fn check(&self) -> Result<&str, ValidationError> {
        if self.value.is_empty() {
            return Err(ValidationError::Required { field: self.field });
        }

        check_fixed_digits(self.field, &self.value, self.max)?;

        Ok(&self.value)
    }
}
