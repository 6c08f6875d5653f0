//! Read-only analyses over a built organisation tree.
//!
//! Both reports are pure functions of the tree: they only accumulate into a
//! local map, so they can run concurrently on the same `OrgTree`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::arena::OrgTree;
use crate::domain::entities::EmployeeRecord;
use crate::domain::error::ReportInputError;

pub const DEFAULT_MIN_PERCENT: i32 = 20;
pub const DEFAULT_MAX_PERCENT: i32 = 50;
pub const DEFAULT_REPORTING_LINES_THRESHOLD: i32 = 4;

/// Result type for report calls.
pub type ReportResult<T> = Result<T, ReportInputError>;

/// Managers whose salary falls outside the allowed band.
pub type SalaryViolations = BTreeMap<EmployeeRecord, Violation>;

/// Employees mapped to the number of levels beyond the allowed depth.
pub type ReportingLineExcess = BTreeMap<EmployeeRecord, u32>;

/// How a manager's salary breaks the policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Violation {
    /// Salary is below the lower bound by `shortfall`
    BelowMinimum { shortfall: f64 },
    /// Salary is above the upper bound by `excess`
    AboveMaximum { excess: f64 },
}

impl Violation {
    /// Distance from the violated bound.
    pub fn amount(&self) -> f64 {
        match *self {
            Violation::BelowMinimum { shortfall } => shortfall,
            Violation::AboveMaximum { excess } => excess,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::BelowMinimum { shortfall } => write!(
                f,
                "salary is {:.2} lower than the minimum salary allowed",
                shortfall
            ),
            Violation::AboveMaximum { excess } => write!(
                f,
                "salary is {:.2} higher than the maximum salary allowed",
                excess
            ),
        }
    }
}

/// Parameters for both reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportPolicy {
    /// Minimum percentage a manager must earn above the subordinate mean
    pub min_percent: i32,
    /// Maximum percentage a manager may earn above the subordinate mean
    pub max_percent: i32,
    /// Deepest allowed reporting line (root is 0)
    pub max_depth: i32,
}

impl Default for ReportPolicy {
    fn default() -> Self {
        Self {
            min_percent: DEFAULT_MIN_PERCENT,
            max_percent: DEFAULT_MAX_PERCENT,
            max_depth: DEFAULT_REPORTING_LINES_THRESHOLD,
        }
    }
}

impl ReportPolicy {
    pub fn validate(&self) -> ReportResult<()> {
        validate_bounds(self.min_percent, self.max_percent)?;
        validate_threshold(self.max_depth)?;
        Ok(())
    }
}

/// Runs the salary and reporting-line reports with a fixed policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportEngine {
    policy: ReportPolicy,
}

impl ReportEngine {
    pub fn new(policy: ReportPolicy) -> ReportResult<Self> {
        policy.validate()?;
        Ok(Self { policy })
    }

    pub fn policy(&self) -> &ReportPolicy {
        &self.policy
    }

    pub fn violations(&self, tree: &OrgTree) -> ReportResult<SalaryViolations> {
        salary_violations(tree, self.policy.min_percent, self.policy.max_percent)
    }

    pub fn excessive_depth(&self, tree: &OrgTree) -> ReportResult<ReportingLineExcess> {
        excessive_reporting_lines(tree, self.policy.max_depth)
    }
}

fn validate_bounds(min_percent: i32, max_percent: i32) -> ReportResult<()> {
    if min_percent > max_percent || min_percent < -100 {
        return Err(ReportInputError::InvalidBounds {
            min: min_percent,
            max: max_percent,
        });
    }
    Ok(())
}

fn validate_threshold(threshold: i32) -> ReportResult<()> {
    if threshold < 0 {
        return Err(ReportInputError::InvalidThreshold(threshold));
    }
    Ok(())
}

/// Find managers paid outside `[mean * (1 + min%), mean * (1 + max%)]`,
/// where `mean` is the average salary of their direct reports.
///
/// Bounds are compared in integer arithmetic, so a salary exactly on a bound
/// is never a violation.
#[instrument(level = "debug", skip(tree))]
pub fn salary_violations(
    tree: &OrgTree,
    min_percent: i32,
    max_percent: i32,
) -> ReportResult<SalaryViolations> {
    validate_bounds(min_percent, max_percent)?;
    if tree.root().is_none() {
        return Err(ReportInputError::NullTree);
    }

    let mut violations = SalaryViolations::new();
    for (idx, node) in tree.iter() {
        if node.is_leaf() {
            continue;
        }
        let (count, total) = tree
            .children(idx)
            .fold((0i128, 0i128), |(n, sum), child| {
                (n + 1, sum + i128::from(child.employee.salary))
            });
        if let Some(violation) = check_band(node.employee.salary, count, total, min_percent, max_percent) {
            debug!("{}: {}", node.employee, violation);
            violations.insert(node.employee.clone(), violation);
        }
    }
    Ok(violations)
}

/// Compare `salary` with the band around `total / count`.
///
/// `salary < total * (100 + p) / (100 * count)` is evaluated as
/// `salary * 100 * count < total * (100 + p)`.
fn check_band(
    salary: u64,
    count: i128,
    total: i128,
    min_percent: i32,
    max_percent: i32,
) -> Option<Violation> {
    let scale = 100 * count;
    let scaled_salary = i128::from(salary) * scale;
    let lower = total * (100 + i128::from(min_percent));
    let upper = total * (100 + i128::from(max_percent));

    if scaled_salary < lower {
        Some(Violation::BelowMinimum {
            shortfall: (lower - scaled_salary) as f64 / scale as f64,
        })
    } else if scaled_salary > upper {
        Some(Violation::AboveMaximum {
            excess: (scaled_salary - upper) as f64 / scale as f64,
        })
    } else {
        None
    }
}

/// Find employees whose distance from the root exceeds `threshold`.
#[instrument(level = "debug", skip(tree))]
pub fn excessive_reporting_lines(
    tree: &OrgTree,
    threshold: i32,
) -> ReportResult<ReportingLineExcess> {
    validate_threshold(threshold)?;
    if tree.root().is_none() {
        return Err(ReportInputError::NullTree);
    }

    let limit = threshold as usize;
    let excess = tree
        .iter_with_depth()
        .filter(|(_, _, depth)| *depth > limit)
        .map(|(_, node, depth)| (node.employee.clone(), (depth - limit) as u32))
        .collect();
    Ok(excess)
}
