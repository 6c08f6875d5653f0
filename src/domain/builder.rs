//! Hierarchy builder: turns a flat list of employee records into an `OrgTree`.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use tracing::{debug, info, instrument};

use crate::domain::arena::OrgTree;
use crate::domain::entities::{EmployeeId, EmployeeRecord};
use crate::domain::error::BuildError;

/// Result type for hierarchy construction.
pub type BuildResult<T> = Result<T, BuildError>;

/// Why a record was left out of the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrphanReason {
    /// The manager id matches no record in the input
    UnknownManager,
    /// The manager exists but its own chain never reaches the root
    DetachedChain,
    /// Following manager ids loops back without reaching the root
    ManagerCycle,
}

/// Non-fatal notice for a record excluded from the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphanWarning {
    pub employee: EmployeeRecord,
    pub reason: OrphanReason,
}

impl fmt::Display for OrphanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let manager = self.employee.manager_id.unwrap_or_default();
        match self.reason {
            OrphanReason::UnknownManager => write!(
                f,
                "removing employee {}: manager id {} was not found",
                self.employee.id, manager
            ),
            OrphanReason::DetachedChain => write!(
                f,
                "removing employee {}: manager {} is not connected to the root",
                self.employee.id, manager
            ),
            OrphanReason::ManagerCycle => write!(
                f,
                "removing employee {}: manager chain through {} forms a cycle",
                self.employee.id, manager
            ),
        }
    }
}

/// A built tree together with the records that could not be placed in it.
#[derive(Debug)]
pub struct Hierarchy {
    pub tree: OrgTree,
    pub orphans: Vec<OrphanWarning>,
}

/// Constructs an organisation tree from unordered employee records.
#[derive(Debug, Default)]
pub struct HierarchyBuilder {
    orphans: Vec<OrphanWarning>,
}

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the hierarchy.
    ///
    /// Records may arrive in any order. Records whose manager cannot be
    /// resolved, directly or transitively, to the single root are dropped and
    /// reported in `Hierarchy::orphans`. A repeated employee id fails the build.
    #[instrument(level = "debug", skip_all, fields(records = records.len()))]
    pub fn build(mut self, records: Vec<EmployeeRecord>) -> BuildResult<Hierarchy> {
        reject_duplicate_ids(&records)?;
        let (root, candidates) = partition_root(records)?;
        debug!("root employee: {}", root);

        let mut tree = OrgTree::new();
        tree.insert_node(root, None);

        let queue = self.drop_unknown_managers(candidates, &tree);
        let leftover = attach_until_fixpoint(&mut tree, queue);
        self.classify_leftover(leftover);

        if !self.orphans.is_empty() {
            info!("{} employees removed from the hierarchy", self.orphans.len());
        }
        debug!(
            "built hierarchy: {} nodes, {} orphans",
            tree.len(),
            self.orphans.len()
        );
        Ok(Hierarchy {
            tree,
            orphans: self.orphans,
        })
    }

    /// Drop candidates whose manager id matches no record at all.
    fn drop_unknown_managers(
        &mut self,
        candidates: Vec<EmployeeRecord>,
        tree: &OrgTree,
    ) -> VecDeque<EmployeeRecord> {
        let known: HashSet<EmployeeId> = candidates
            .iter()
            .map(|e| e.id)
            .chain(tree.root_employee().map(|e| e.id))
            .collect();

        let mut queue = VecDeque::with_capacity(candidates.len());
        for employee in candidates {
            match employee.manager_id {
                Some(manager) if known.contains(&manager) => queue.push_back(employee),
                _ => self.report(employee, OrphanReason::UnknownManager),
            }
        }
        queue
    }

    /// Sort the records left after the fixpoint into detached chains and cycles.
    fn classify_leftover(&mut self, leftover: VecDeque<EmployeeRecord>) {
        let pending: HashMap<EmployeeId, Option<EmployeeId>> =
            leftover.iter().map(|e| (e.id, e.manager_id)).collect();

        for employee in leftover {
            let reason = if reaches_cycle(employee.id, &pending) {
                OrphanReason::ManagerCycle
            } else {
                OrphanReason::DetachedChain
            };
            self.report(employee, reason);
        }
    }

    fn report(&mut self, employee: EmployeeRecord, reason: OrphanReason) {
        let warning = OrphanWarning { employee, reason };
        debug!("{}", warning);
        self.orphans.push(warning);
    }
}

fn reject_duplicate_ids(records: &[EmployeeRecord]) -> BuildResult<()> {
    let mut seen = HashSet::with_capacity(records.len());
    match records.iter().find(|e| !seen.insert(e.id)) {
        Some(duplicate) => Err(BuildError::DuplicateEmployee { id: duplicate.id }),
        None => Ok(()),
    }
}

/// Split off the single manager-less record.
fn partition_root(
    records: Vec<EmployeeRecord>,
) -> BuildResult<(EmployeeRecord, Vec<EmployeeRecord>)> {
    let (mut roots, candidates): (Vec<_>, Vec<_>) =
        records.into_iter().partition(EmployeeRecord::is_root);

    match roots.len() {
        0 => Err(BuildError::NoRootFound),
        1 => Ok((roots.remove(0), candidates)),
        _ => Err(BuildError::MultipleRootsFound {
            ids: roots.iter().map(|e| e.id).collect(),
        }),
    }
}

/// Attach queued records whose manager is already placed, pass after pass,
/// until a full pass makes no progress. Returns the records never attached.
///
/// Matches the child order of a plain search-then-append insertion, but
/// finds managers through the tree's id index instead of a tree walk.
#[instrument(level = "trace", skip_all, fields(queued = queue.len()))]
fn attach_until_fixpoint(
    tree: &mut OrgTree,
    mut queue: VecDeque<EmployeeRecord>,
) -> VecDeque<EmployeeRecord> {
    let mut pass = 0;
    loop {
        pass += 1;
        let pass_len = queue.len();
        let mut attached = 0;

        for _ in 0..pass_len {
            let Some(employee) = queue.pop_front() else {
                break;
            };
            let parent = employee
                .manager_id
                .and_then(|manager| tree.find(manager));
            match parent {
                Some(parent_idx) => {
                    tree.insert_node(employee, Some(parent_idx));
                    attached += 1;
                }
                None => queue.push_back(employee),
            }
        }

        debug!("pass {}: attached {} of {}", pass, attached, pass_len);
        if attached == 0 || queue.is_empty() {
            return queue;
        }
    }
}

/// Whether following manager ids from `start` through unattached records
/// revisits an id.
fn reaches_cycle(start: EmployeeId, pending: &HashMap<EmployeeId, Option<EmployeeId>>) -> bool {
    let mut seen = HashSet::new();
    let mut current = start;
    while seen.insert(current) {
        match pending.get(&current).copied().flatten() {
            Some(manager) => current = manager,
            None => return false,
        }
    }
    true
}
