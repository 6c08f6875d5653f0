//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::entities::EmployeeId;

/// Fatal hierarchy construction failures.
///
/// Root cardinality and repeated ids make a build fail; everything else
/// (unknown managers, cycles) is reported through `OrphanWarning`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("no root found: every employee lists a manager")]
    NoRootFound,

    #[error("multiple roots found: employees {ids:?} have no manager")]
    MultipleRootsFound { ids: Vec<EmployeeId> },

    #[error("duplicate employee id {id}")]
    DuplicateEmployee { id: EmployeeId },
}

/// Invalid input to a single report call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportInputError {
    #[error("employee hierarchy is empty")]
    NullTree,

    #[error("invalid salary bounds: min {min}% / max {max}%")]
    InvalidBounds { min: i32, max: i32 },

    #[error("invalid reporting line threshold: {0}")]
    InvalidThreshold(i32),
}

/// Domain errors represent business logic violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{0}")]
    Build(#[from] BuildError),

    #[error("{0}")]
    Report(#[from] ReportInputError),
}
