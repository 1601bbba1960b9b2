//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("invalid scenario {origin}: {message}")]
    Scenario { origin: String, message: String },

    #[error("scenario file not found: {0}")]
    ScenarioNotFound(PathBuf),

    #[error("input closed before the case was concluded")]
    InputClosed,

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ApplicationError {
    pub(crate) fn scenario(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Scenario {
            origin: origin.into(),
            message: message.into(),
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
