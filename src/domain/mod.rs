//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;
pub mod report;

pub use arena::{OrgTree, TreeNode};
pub use builder::{BuildResult, Hierarchy, HierarchyBuilder, OrphanReason, OrphanWarning};
pub use entities::{EmployeeId, EmployeeRecord};
pub use error::{BuildError, DomainError, ReportInputError};
pub use report::{
    excessive_reporting_lines, salary_violations, ReportEngine, ReportPolicy, ReportResult,
    ReportingLineExcess, SalaryViolations, Violation,
};
