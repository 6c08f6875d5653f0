//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (EmployeeSource, FileSystem)
//! but are themselves concrete structs, not traits.

mod analytics;

pub use analytics::{AnalyticsReport, AnalyticsService, LoadedHierarchy, ReportKind};
