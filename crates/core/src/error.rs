use thiserror::Error;

/// AVS domain error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AvsError {
    #[error("Unknown value for {field}: '{value}'")]
    UnknownValue { field: &'static str, value: String },

    #[error("Invalid option: {0}")]
    InvalidOption(String),
}
