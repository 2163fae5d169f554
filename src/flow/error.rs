use abha_lib::ValidationError;

use crate::session::StoreError;

/// everything that can stop a step from completing. none of these end the
/// wizard, the current screen stays put and the step can be retried.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("No session found. Please log in again.")]
    SessionMissing,

    #[error("Access token not found in session.")]
    TokenMissing,

    #[error("Session has expired. Please log in again.")]
    SessionExpired,

    #[error("{message}")]
    Gateway {
        status: u16,
        message: String,
    },

    #[error("Network error occurred: {0}")]
    Network(String),

    #[error("{0} is not available yet")]
    Unsupported(&'static str),

    #[error("cannot {action} from the {screen} screen")]
    WrongStep {
        action: &'static str,
        screen: &'static str,
    },

    #[error("the {0} from an earlier step is missing")]
    Incomplete(&'static str),

    #[error("there is no previous step to go back to")]
    NoPreviousStep,

    #[error("please wait {0}s before requesting a new OTP")]
    CooldownActive(u64),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl FlowError {
    /// the user has to log in again before this can succeed
    pub fn needs_login(&self) -> bool {
        matches!(
            self,
            FlowError::SessionMissing |
            FlowError::TokenMissing |
            FlowError::SessionExpired
        )
    }
}
