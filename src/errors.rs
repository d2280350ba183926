use thiserror::Error;

use crate::decimal::Money;

#[derive(Error, Debug)]
pub enum CalcError {
    #[error("invalid input: {message}")]
    Validation {
        message: String,
    },

    #[error("missing required field: {field}")]
    MissingField {
        field: &'static str,
    },

    #[error("invalid amount for {field}: {amount}")]
    InvalidAmount {
        field: &'static str,
        amount: Money,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("invalid time order: {later} is earlier than {earlier}")]
    InvalidTimeOrder {
        earlier: String,
        later: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("branch not found: {name}")]
    BranchNotFound {
        name: String,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CalcError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        CalcError::Validation {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;
