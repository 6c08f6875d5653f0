//! Analytics service
//!
//! Loads employee records, builds the hierarchy and runs the reports.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::application::ApplicationResult;
use crate::domain::{
    Hierarchy, HierarchyBuilder, ReportEngine, ReportPolicy, ReportingLineExcess, SalaryViolations,
};
use crate::infrastructure::traits::EmployeeSource;

/// Which reports to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportKind {
    #[default]
    All,
    Salary,
    Depth,
}

impl ReportKind {
    fn includes_salary(self) -> bool {
        matches!(self, ReportKind::All | ReportKind::Salary)
    }

    fn includes_depth(self) -> bool {
        matches!(self, ReportKind::All | ReportKind::Depth)
    }
}

/// A hierarchy built from a loaded file.
#[derive(Debug)]
pub struct LoadedHierarchy {
    /// Number of records read from the source
    pub employees_loaded: usize,
    pub hierarchy: Hierarchy,
}

/// Output of an analytics run.
#[derive(Debug)]
pub struct AnalyticsReport {
    pub employees_loaded: usize,
    pub hierarchy: Hierarchy,
    pub policy: ReportPolicy,
    /// None when the salary report was not requested
    pub violations: Option<SalaryViolations>,
    /// None when the depth report was not requested
    pub excess: Option<ReportingLineExcess>,
}

/// Service coordinating loading, hierarchy construction and reporting.
pub struct AnalyticsService {
    source: Arc<dyn EmployeeSource>,
}

impl AnalyticsService {
    /// Create a new analytics service.
    pub fn new(source: Arc<dyn EmployeeSource>) -> Self {
        Self { source }
    }

    /// Load records from `path` and build the hierarchy.
    pub fn load_hierarchy(&self, path: &Path) -> ApplicationResult<LoadedHierarchy> {
        debug!("load_hierarchy: path={}", path.display());
        let records = self.source.load(path)?;
        let employees_loaded = records.len();
        info!("employees loaded: {}", employees_loaded);

        let hierarchy = HierarchyBuilder::new().build(records)?;
        info!(
            "hierarchy generated: {} employees, {} removed",
            hierarchy.tree.len(),
            hierarchy.orphans.len()
        );

        Ok(LoadedHierarchy {
            employees_loaded,
            hierarchy,
        })
    }

    /// Build the hierarchy from `path` and run the requested reports.
    ///
    /// The policy is validated before anything is loaded. Both reports read
    /// the finished tree and run in parallel.
    pub fn run(
        &self,
        path: &Path,
        policy: ReportPolicy,
        kind: ReportKind,
    ) -> ApplicationResult<AnalyticsReport> {
        let engine = ReportEngine::new(policy)?;
        let LoadedHierarchy {
            employees_loaded,
            hierarchy,
        } = self.load_hierarchy(path)?;

        let tree = &hierarchy.tree;
        let (violations, excess) = rayon::join(
            || kind.includes_salary().then(|| engine.violations(tree)),
            || kind.includes_depth().then(|| engine.excessive_depth(tree)),
        );
        let violations = violations.transpose()?;
        let excess = excess.transpose()?;

        Ok(AnalyticsReport {
            employees_loaded,
            hierarchy,
            policy,
            violations,
            excess,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ApplicationError;
    use crate::domain::{DomainError, EmployeeRecord, ReportInputError};
    use crate::infrastructure::LoadError;

    struct StaticSource(Vec<EmployeeRecord>);

    impl EmployeeSource for StaticSource {
        fn load(&self, _path: &Path) -> Result<Vec<EmployeeRecord>, LoadError> {
            Ok(self.0.clone())
        }
    }

    fn service(records: Vec<EmployeeRecord>) -> AnalyticsService {
        AnalyticsService::new(Arc::new(StaticSource(records)))
    }

    #[test]
    fn given_only_salary_requested_when_running_then_depth_report_absent() {
        let svc = service(vec![
            EmployeeRecord::new(1, "A", "A", 100, None),
            EmployeeRecord::new(2, "B", "B", 100, Some(1)),
        ]);

        let report = svc
            .run(Path::new("ignored"), ReportPolicy::default(), ReportKind::Salary)
            .unwrap();

        assert!(report.violations.is_some());
        assert!(report.excess.is_none());
        assert_eq!(report.employees_loaded, 2);
    }

    #[test]
    fn given_invalid_policy_when_running_then_fails_before_loading() {
        let svc = service(Vec::new());
        let policy = ReportPolicy {
            min_percent: 80,
            max_percent: 10,
            max_depth: 4,
        };

        let err = svc
            .run(Path::new("ignored"), policy, ReportKind::All)
            .unwrap_err();

        assert!(matches!(
            err,
            ApplicationError::Domain(DomainError::Report(ReportInputError::InvalidBounds { .. }))
        ));
    }
}
