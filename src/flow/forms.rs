use std::time::{Duration, Instant};

use abha_lib::{DigitField, ValidationError};
use abha_lib::account::AccountAddress;
use abha_lib::contact::{contact_field, passcode_field};
use abha_lib::document::{document_field, group_digits};

use super::context::VerificationContext;
use super::timer::Cooldown;

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentForm {
    context: VerificationContext,
    input: DigitField,
}

impl DocumentForm {
    pub fn new(context: VerificationContext) -> Self {
        DocumentForm {
            context,
            input: document_field(),
        }
    }

    pub fn context(&self) -> &VerificationContext {
        &self.context
    }

    pub fn input(&self) -> &DigitField {
        &self.input
    }

    pub fn set_input<G>(&mut self, given: G)
    where
        G: AsRef<str>
    {
        self.input.set(given);
    }

    /// `XXXX XXXX XXXX`, grouped as far as it has been typed
    pub fn display(&self) -> String {
        group_digits(self.input.as_str())
    }

    pub fn can_submit(&self) -> bool {
        self.input.is_complete()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PasscodeForm {
    context: VerificationContext,
    hint: Option<String>,
    passcode: DigitField,
    contact: DigitField,
    cooldown: Option<Cooldown>,
}

impl PasscodeForm {
    pub fn new(context: VerificationContext, hint: Option<String>) -> Self {
        PasscodeForm {
            context,
            hint,
            passcode: passcode_field(),
            contact: contact_field(),
            cooldown: None,
        }
    }

    pub fn context(&self) -> &VerificationContext {
        &self.context
    }

    pub(super) fn context_mut(&mut self) -> &mut VerificationContext {
        &mut self.context
    }

    /// what the gateway revealed of the registered mobile number
    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub(super) fn set_hint(&mut self, hint: Option<String>) {
        if hint.is_some() {
            self.hint = hint;
        }
    }

    pub fn passcode(&self) -> &DigitField {
        &self.passcode
    }

    pub fn contact(&self) -> &DigitField {
        &self.contact
    }

    pub fn set_passcode<G>(&mut self, given: G)
    where
        G: AsRef<str>
    {
        self.passcode.set(given);
    }

    pub(super) fn clear_passcode(&mut self) {
        self.passcode.clear();
    }

    pub fn set_contact<G>(&mut self, given: G)
    where
        G: AsRef<str>
    {
        self.contact.set(given);
    }

    pub fn can_submit(&self) -> bool {
        self.passcode.is_complete() && self.contact.is_complete()
    }

    pub(super) fn start_cooldown(&mut self, now: Instant, total: Duration) {
        self.cooldown = Some(Cooldown::start(now, total));
    }

    pub(super) fn clear_cooldown(&mut self) {
        self.cooldown = None;
    }

    /// `None` while the screen is not active
    pub fn cooldown_remaining(&self, now: Instant) -> Option<u64> {
        self.cooldown.as_ref().map(|c| c.remaining(now))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddressForm {
    context: VerificationContext,
    candidates: Vec<AccountAddress>,
    selected: Option<usize>,
}

impl AddressForm {
    pub fn new(context: VerificationContext, candidates: Vec<AccountAddress>) -> Self {
        AddressForm {
            context,
            candidates,
            selected: None,
        }
    }

    pub fn context(&self) -> &VerificationContext {
        &self.context
    }

    pub fn candidates(&self) -> &[AccountAddress] {
        &self.candidates
    }

    pub fn selected(&self) -> Option<&AccountAddress> {
        self.selected.and_then(|index| self.candidates.get(index))
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// picks by zero based position in the candidate list
    pub fn select(&mut self, index: usize) -> Result<&AccountAddress, ValidationError> {
        let Some(found) = self.candidates.get(index) else {
            return Err(ValidationError::Address {
                given: (index + 1).to_string()
            });
        };

        self.selected = Some(index);

        Ok(found)
    }

    /// picks the candidate equal to `given`. only offered addresses can be
    /// chosen
    pub fn select_value(&mut self, given: &str) -> Result<&AccountAddress, ValidationError> {
        let given = given.trim();
        let Some(index) = self.candidates.iter().position(|c| c.as_str() == given) else {
            return Err(ValidationError::Address {
                given: given.to_owned()
            });
        };

        self.select(index)
    }

    pub fn can_submit(&self) -> bool {
        self.selected().is_some()
    }
}
