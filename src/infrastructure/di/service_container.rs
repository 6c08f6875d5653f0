//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::AnalyticsService;
use crate::config::Settings;
use crate::infrastructure::csv_source::CsvEmployeeSource;
use crate::infrastructure::traits::{EmployeeSource, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Employee record loader
    pub source: Arc<dyn EmployeeSource>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        let source = Arc::new(CsvEmployeeSource::new(
            Arc::new(RealFileSystem),
            settings.has_header,
        ));
        Self::with_deps(settings, source)
    }

    /// Create a service container with a custom loader (for testing).
    pub fn with_deps(settings: Settings, source: Arc<dyn EmployeeSource>) -> Self {
        Self {
            settings: Arc::new(settings),
            source,
        }
    }

    /// Analytics service using the configured loader.
    pub fn analytics(&self) -> AnalyticsService {
        AnalyticsService::new(self.source.clone())
    }
}
