//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use std::fmt::Write as _;

use colored::Colorize;
use itertools::Itertools;

use crate::domain::{OrphanWarning, ReportPolicy, ReportingLineExcess, SalaryViolations};

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print plain output (no color, for data)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// Print every orphan warning to stderr.
pub fn orphans(warnings: &[OrphanWarning]) {
    eprint!("{}", orphan_report(warnings));
}

/// One `Warning:` line per removed employee.
pub fn orphan_report(warnings: &[OrphanWarning]) -> String {
    warnings
        .iter()
        .map(|w| format!("{}: {}\n", "Warning".yellow(), w))
        .collect()
}

const COLUMN: usize = 12;

/// Render the salary policy table.
pub fn salary_table(violations: &SalaryViolations, policy: &ReportPolicy) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "-> Minimum percentage allowed: {}", policy.min_percent);
    let _ = writeln!(out, "-> Maximum percentage allowed: {}", policy.max_percent);
    let _ = writeln!(
        out,
        "-> Number of employees with salary policy violation: {}",
        violations.len()
    );
    let _ = writeln!(
        out,
        "{}",
        ["ID", "FIRST NAME", "LAST NAME", "SALARY", "VIOLATION"]
            .iter()
            .map(|h| format!("{:<COLUMN$}", h))
            .join("|")
    );
    for (employee, violation) in violations {
        let _ = writeln!(
            out,
            "{:<COLUMN$}|{:<COLUMN$}|{:<COLUMN$}|{:<COLUMN$}|{}",
            employee.id, employee.first_name, employee.last_name, employee.salary, violation
        );
    }
    out
}

/// Render the excessive reporting lines table.
pub fn depth_table(excess: &ReportingLineExcess, policy: &ReportPolicy) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "-> Maximum reporting line allowed: {}", policy.max_depth);
    let _ = writeln!(
        out,
        "-> Number of employees with excessive reporting lines: {}",
        excess.len()
    );
    let _ = writeln!(
        out,
        "{}",
        ["ID", "FIRST NAME", "LAST NAME", "EXCESSIVE REPORTING LINES"]
            .iter()
            .map(|h| format!("{:<COLUMN$}", h))
            .join("|")
    );
    for (employee, levels) in excess {
        let _ = writeln!(
            out,
            "{:<COLUMN$}|{:<COLUMN$}|{:<COLUMN$}|{}",
            employee.id, employee.first_name, employee.last_name, levels
        );
    }
    out
}
