use thiserror::Error;

/// Errors raised while turning raw birth data into a chart.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Missing required field: {0}")]
    MissingField(String),
    #[error("Invalid field value: {field}: {message}")]
    InvalidFieldValue { field: String, message: String },
}

impl ChartError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidFieldValue {
            field: field.into(),
            message: message.into(),
        }
    }
}
