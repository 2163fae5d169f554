pub mod error;
pub mod validation;
pub mod ids;

pub mod document;
pub mod contact;
pub mod account;

pub use error::ValidationError;
pub use validation::DigitField;
