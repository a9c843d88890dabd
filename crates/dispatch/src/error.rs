use crate::actions::Category;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DispatchError {
    /// A required parameter is missing or malformed. Never reaches the executor.
    #[error("{message}")]
    Validation {
        message: String,
        example: Option<Value>,
    },

    #[error("Unsupported {category} action: {action}")]
    UnknownAction {
        category: Category,
        action: String,
        available: Vec<&'static str>,
    },

    #[error("Unknown category: {category}")]
    UnknownCategory {
        category: String,
        available: Vec<&'static str>,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DispatchError {
    pub fn validation(message: impl Into<String>) -> Self {
        DispatchError::Validation {
            message: message.into(),
            example: None,
        }
    }

    pub fn validation_with_example(message: impl Into<String>, example: Value) -> Self {
        DispatchError::Validation {
            message: message.into(),
            example: Some(example),
        }
    }
}
