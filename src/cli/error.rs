//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::exitcode;
use crate::infrastructure::{InfraError, LoadError};

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        Self::Infra(e.into())
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) => exitcode::USAGE,
            CliError::Infra(InfraError::Io { .. }) => exitcode::IOERR,
            CliError::Infra(InfraError::Application(e)) => match e {
                ApplicationError::Load(LoadError::Io { source, .. })
                    if source.kind() == std::io::ErrorKind::NotFound =>
                {
                    exitcode::NOINPUT
                }
                ApplicationError::Load(LoadError::Io { .. }) => exitcode::IOERR,
                ApplicationError::Load(_) => exitcode::DATAERR,
                ApplicationError::Domain(DomainError::Build(_)) => exitcode::DATAERR,
                ApplicationError::Domain(DomainError::Report(_)) => exitcode::USAGE,
                ApplicationError::Config { .. } => exitcode::CONFIG,
                ApplicationError::OperationFailed { .. } => exitcode::SOFTWARE,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BuildError, ReportInputError};

    #[test]
    fn given_missing_input_file_when_mapping_then_noinput() {
        let err: CliError = ApplicationError::Load(LoadError::Io {
            path: "missing.csv".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        })
        .into();
        assert_eq!(err.exit_code(), exitcode::NOINPUT);
    }

    #[test]
    fn given_domain_errors_when_mapping_then_dataerr_or_usage() {
        let build: CliError = ApplicationError::from(BuildError::NoRootFound).into();
        let report: CliError = ApplicationError::from(ReportInputError::InvalidThreshold(-1)).into();

        assert_eq!(build.exit_code(), exitcode::DATAERR);
        assert_eq!(report.exit_code(), exitcode::USAGE);
    }

    #[test]
    fn given_config_error_when_mapping_then_config_code() {
        let err: CliError = ApplicationError::Config {
            message: "bad".into(),
        }
        .into();
        assert_eq!(err.exit_code(), exitcode::CONFIG);
    }
}
