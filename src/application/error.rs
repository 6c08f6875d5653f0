//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::{BuildError, DomainError, ReportInputError};
use crate::infrastructure::LoadError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("cannot load employees: {0}")]
    Load(#[from] LoadError),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<BuildError> for ApplicationError {
    fn from(e: BuildError) -> Self {
        Self::Domain(e.into())
    }
}

impl From<ReportInputError> for ApplicationError {
    fn from(e: ReportInputError) -> Self {
        Self::Domain(e.into())
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
