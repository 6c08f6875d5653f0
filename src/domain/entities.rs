//! Domain entities: core data structures

use std::fmt;

/// Employee identifier as it appears in the source data.
pub type EmployeeId = u64;

/// A single employee row, already validated by the loader.
///
/// Field order matters: the derived `Ord` sorts by `id` first, which keeps
/// report maps in a stable, id-ascending order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EmployeeRecord {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    /// Salary in whole currency units
    pub salary: u64,
    /// Manager id, `None` for the top of the hierarchy
    pub manager_id: Option<EmployeeId>,
}

impl EmployeeRecord {
    pub fn new(
        id: EmployeeId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        salary: u64,
        manager_id: Option<EmployeeId>,
    ) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            salary,
            manager_id,
        }
    }

    /// True for the record without a manager.
    pub fn is_root(&self) -> bool {
        self.manager_id.is_none()
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl fmt::Display for EmployeeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.first_name, self.last_name, self.id)
    }
}
