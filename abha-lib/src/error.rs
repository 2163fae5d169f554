#[macro_export]
macro_rules! context_trait {
    ($e:path) => {
        pub trait Context<T, E> {
            fn context<C>(self, cxt: C) -> std::result::Result<T, $e>
            where
                C: Into<String>;
        }
    };
}

/// reasons a form field was rejected before anything left the client
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("please enter the {field}")]
    Required {
        field: &'static str
    },

    #[error("please enter a valid {expected}-digit {field}")]
    Length {
        field: &'static str,
        expected: usize,
        given: usize,
    },

    #[error("the {field} may only contain digits")]
    NotDigits {
        field: &'static str
    },

    #[error("\"{given}\" is not a valid account address")]
    Address {
        given: String
    },

    #[error("please select an account address to continue")]
    NoSelection,
}

impl ValidationError {
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::Required { field } |
            ValidationError::Length { field, .. } |
            ValidationError::NotDigits { field } => Some(field),
            ValidationError::Address { .. } => Some("account address"),
            ValidationError::NoSelection => None,
        }
    }
}
