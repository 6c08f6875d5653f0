//! CSV employee loader.
//!
//! Expected columns: `id, firstName, lastName, salary, managerId`. With a
//! header line the columns may appear in any order (matched
//! case-insensitively); without one they are positional. The manager id is
//! optional.

use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::domain::{EmployeeId, EmployeeRecord};
use crate::infrastructure::error::LoadError;
use crate::infrastructure::traits::{EmployeeSource, FileSystem};

const DELIMITER: char = ',';
const REQUIRED_HEADERS: [&str; 5] = ["id", "firstname", "lastname", "salary", "managerid"];
const MIN_VALUES_PER_LINE: usize = 4;

/// Column position of each field within a data line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnMap {
    id: usize,
    first_name: usize,
    last_name: usize,
    salary: usize,
    manager_id: usize,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            id: 0,
            first_name: 1,
            last_name: 2,
            salary: 3,
            manager_id: 4,
        }
    }
}

impl ColumnMap {
    fn from_header(line: &str) -> Result<Self, LoadError> {
        let header: Vec<String> = line
            .split(DELIMITER)
            .map(|h| h.trim().to_lowercase())
            .collect();
        let position = |name: &str| {
            header
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| LoadError::MissingHeader(name.to_string()))
        };
        let [id, first_name, last_name, salary, manager_id] = REQUIRED_HEADERS;

        Ok(Self {
            id: position(id)?,
            first_name: position(first_name)?,
            last_name: position(last_name)?,
            salary: position(salary)?,
            manager_id: position(manager_id)?,
        })
    }
}

/// Loads employees from a comma-separated file.
pub struct CsvEmployeeSource {
    fs: Arc<dyn FileSystem>,
    has_header: bool,
}

impl CsvEmployeeSource {
    pub fn new(fs: Arc<dyn FileSystem>, has_header: bool) -> Self {
        Self { fs, has_header }
    }
}

impl EmployeeSource for CsvEmployeeSource {
    #[instrument(level = "debug", skip(self))]
    fn load(&self, path: &Path) -> Result<Vec<EmployeeRecord>, LoadError> {
        let content = self.fs.read_to_string(path).map_err(|e| LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let employees = parse_employees(&content, self.has_header)?;
        debug!("loaded {} employees from {}", employees.len(), path.display());
        Ok(employees)
    }
}

/// Parse CSV content into employee records.
pub fn parse_employees(content: &str, has_header: bool) -> Result<Vec<EmployeeRecord>, LoadError> {
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let columns = if has_header {
        match lines.next() {
            Some((_, header)) => ColumnMap::from_header(header)?,
            None => return Ok(Vec::new()),
        }
    } else {
        ColumnMap::default()
    };

    let mut seen = HashSet::new();
    let mut employees = Vec::new();
    for (line_no, line) in lines {
        let employee = parse_line(line, line_no, &columns)?;
        if !seen.insert(employee.id) {
            return Err(LoadError::DuplicateId {
                id: employee.id,
                line: line_no,
            });
        }
        employees.push(employee);
    }
    Ok(employees)
}

fn parse_line(line: &str, line_no: usize, columns: &ColumnMap) -> Result<EmployeeRecord, LoadError> {
    let values: Vec<&str> = line.split(DELIMITER).map(str::trim).collect();
    if values.len() < MIN_VALUES_PER_LINE {
        return Err(LoadError::Parse {
            line: line_no,
            message: format!(
                "line has fewer than the required {} values",
                MIN_VALUES_PER_LINE
            ),
        });
    }

    let field = |idx: usize, name: &str| {
        values
            .get(idx)
            .copied()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| LoadError::Parse {
                line: line_no,
                message: format!("missing value for {}", name),
            })
    };

    let id: EmployeeId = parse_number(field(columns.id, "id")?, "id", line_no)?;
    let first_name = field(columns.first_name, "firstName")?;
    let last_name = field(columns.last_name, "lastName")?;
    let salary: u64 = parse_number(field(columns.salary, "salary")?, "salary", line_no)?;
    let manager_id = match values.get(columns.manager_id).filter(|v| !v.is_empty()) {
        Some(raw) => Some(parse_number(raw, "managerId", line_no)?),
        None => None,
    };

    Ok(EmployeeRecord::new(id, first_name, last_name, salary, manager_id))
}

fn parse_number<T>(raw: &str, name: &str, line_no: usize) -> Result<T, LoadError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e| LoadError::Parse {
        line: line_no,
        message: format!("invalid {} '{}': {}", name, raw, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Id,firstName,lastName,salary,managerId
123,Joe,Doe,60000,
124,Martin,Chekov,45000,123
125,Bob,Ronstad,47000,123
300,Alice,Hasacat,50000,124
305,Brett,Hardleaf,34000,300
";

    #[test]
    fn given_sample_with_header_when_parsing_then_reads_all_rows() {
        let employees = parse_employees(SAMPLE, true).unwrap();

        assert_eq!(employees.len(), 5);
        assert_eq!(employees[0], EmployeeRecord::new(123, "Joe", "Doe", 60000, None));
        assert_eq!(employees[4].manager_id, Some(300));
    }

    #[test]
    fn given_reordered_header_when_parsing_then_maps_columns() {
        let content = "salary,managerId,lastName,ID,firstname\n45000,123,Chekov,124,Martin\n";

        let employees = parse_employees(content, true).unwrap();

        assert_eq!(
            employees,
            vec![EmployeeRecord::new(124, "Martin", "Chekov", 45000, Some(123))]
        );
    }

    #[test]
    fn given_missing_header_when_parsing_then_errors() {
        let content = "id,firstName,lastName,salary\n1,A,B,10\n";
        let err = parse_employees(content, true).unwrap_err();
        assert!(matches!(err, LoadError::MissingHeader(ref h) if h == "managerid"));
    }

    #[test]
    fn given_no_header_when_parsing_then_uses_positional_columns() {
        let content = "1,Joe,Doe,60000\n2,Ann,Lee,40000,1\n";

        let employees = parse_employees(content, false).unwrap();

        assert_eq!(employees.len(), 2);
        assert_eq!(employees[0].manager_id, None);
        assert_eq!(employees[1].manager_id, Some(1));
    }

    #[test]
    fn given_short_line_when_parsing_then_reports_line_number() {
        let content = "id,firstName,lastName,salary,managerId\n1,Joe,Doe\n";
        let err = parse_employees(content, true).unwrap_err();
        assert!(matches!(err, LoadError::Parse { line: 2, .. }), "{err:?}");
    }

    #[test]
    fn given_non_numeric_salary_when_parsing_then_errors() {
        let content = "1,Joe,Doe,lots\n";
        let err = parse_employees(content, false).unwrap_err();
        assert!(err.to_string().contains("invalid salary 'lots'"), "{err}");
    }

    #[test]
    fn given_duplicate_id_when_parsing_then_errors() {
        let content = "1,Joe,Doe,10\n1,Ann,Lee,20,1\n";
        let err = parse_employees(content, false).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateId { id: 1, line: 2 }));
    }

    #[test]
    fn given_header_only_when_parsing_then_returns_empty() {
        let content = "id,firstName,lastName,salary,managerId\n\n";
        assert!(parse_employees(content, true).unwrap().is_empty());
    }
}
