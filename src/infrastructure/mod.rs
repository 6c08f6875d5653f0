//! Infrastructure layer: I/O implementations and DI container
//!
//! This layer implements I/O boundary traits and wires up services.

pub mod csv_source;
pub mod di;
pub mod error;
pub mod traits;

pub use csv_source::CsvEmployeeSource;
pub use di::ServiceContainer;
pub use error::{InfraError, LoadError};
