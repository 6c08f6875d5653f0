//! End-to-end tests: CSV file on disk through loader, builder and reports.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use orgcheck::application::services::{AnalyticsService, ReportKind};
use orgcheck::application::ApplicationError;
use orgcheck::domain::{DomainError, OrphanReason, ReportPolicy, Violation};
use orgcheck::infrastructure::traits::RealFileSystem;
use orgcheck::infrastructure::{CsvEmployeeSource, LoadError};
use orgcheck::util::testing;

fn resource(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/resources/employees")
        .join(name)
}

fn service(has_header: bool) -> AnalyticsService {
    AnalyticsService::new(Arc::new(CsvEmployeeSource::new(
        Arc::new(RealFileSystem),
        has_header,
    )))
}

#[test]
fn given_sample_file_when_running_all_reports_then_returns_both_results() {
    testing::init_test_setup();

    let report = service(true)
        .run(&resource("sample.csv"), ReportPolicy::default(), ReportKind::All)
        .unwrap();

    assert_eq!(report.employees_loaded, 5);
    assert_eq!(report.hierarchy.tree.len(), 5);

    // Martin Chekov: 45000 against a minimum of 60000
    let violations = report.violations.unwrap();
    assert_eq!(violations.len(), 1);
    let (employee, violation) = violations.iter().next().unwrap();
    assert_eq!(employee.id, 124);
    assert_eq!(employee.full_name(), "Martin Chekov");
    assert_eq!(*violation, Violation::BelowMinimum { shortfall: 15000.0 });

    assert!(report.excess.unwrap().is_empty());
}

#[test]
fn given_sample_file_when_running_depth_only_then_salary_report_skipped() {
    let policy = ReportPolicy {
        max_depth: 2,
        ..ReportPolicy::default()
    };

    let report = service(true)
        .run(&resource("sample.csv"), policy, ReportKind::Depth)
        .unwrap();

    assert!(report.violations.is_none());
    let excess = report.excess.unwrap();
    assert_eq!(excess.keys().map(|e| e.id).collect::<Vec<_>>(), vec![305]);
}

#[test]
fn given_unordered_file_with_orphans_when_loading_then_drops_only_orphans() {
    let loaded = service(true)
        .load_hierarchy(&resource("unordered_with_orphans.csv"))
        .unwrap();

    assert_eq!(loaded.employees_loaded, 8);
    assert_eq!(loaded.hierarchy.tree.len(), 4);
    assert_eq!(loaded.hierarchy.tree.depth(), 4);

    let mut removed: Vec<_> = loaded
        .hierarchy
        .orphans
        .iter()
        .map(|o| (o.employee.id, o.reason))
        .collect();
    removed.sort_by_key(|(id, _)| *id);
    assert_eq!(
        removed,
        vec![
            (8, OrphanReason::UnknownManager),
            (9, OrphanReason::DetachedChain),
            (10, OrphanReason::ManagerCycle),
            (11, OrphanReason::ManagerCycle),
        ]
    );
}

#[test]
fn given_headerless_file_when_loading_then_reads_positional_columns() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("plain.csv");
    std::fs::write(&path, "1,Ann,Boss,90000\n2,Bo,Worker,50000,1\n\n3,Cy,Worker,52000,1\n").unwrap();

    let loaded = service(false).load_hierarchy(&path).unwrap();

    assert_eq!(loaded.employees_loaded, 3);
    assert_eq!(loaded.hierarchy.tree.subordinate_ids(1), vec![2, 3]);
}

#[test]
fn given_missing_file_when_loading_then_fails_with_io_error() {
    let temp = TempDir::new().unwrap();

    let result = service(true).load_hierarchy(&temp.path().join("absent.csv"));

    assert!(matches!(
        result,
        Err(ApplicationError::Load(LoadError::Io { .. }))
    ));
}

#[test]
fn given_two_roots_in_file_when_loading_then_fails_with_build_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("roots.csv");
    std::fs::write(
        &path,
        "id,firstName,lastName,salary,managerId\n1,A,A,100,\n2,B,B,100,\n",
    )
    .unwrap();

    let result = service(true).load_hierarchy(&path);

    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::Build(_)))
    ));
}
