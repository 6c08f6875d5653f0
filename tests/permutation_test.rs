//! Property tests: hierarchy construction does not depend on input order.

use std::collections::BTreeSet;

use proptest::prelude::*;
use proptest::sample::Index;

use orgcheck::domain::{EmployeeId, EmployeeRecord, Hierarchy, HierarchyBuilder};

/// A valid hierarchy rooted at 1, plus orphans under unknown managers
/// (ids from 10_000) and their reports.
fn org_records() -> impl Strategy<Value = (Vec<EmployeeRecord>, usize)> {
    (
        proptest::collection::vec((any::<Index>(), 20_000u64..120_000), 0..40),
        0u64..4,
    )
        .prop_map(|(staff, orphan_count)| {
            let mut records = vec![EmployeeRecord::new(1, "Ceo", "Root", 200_000, None)];
            for (i, (manager, salary)) in staff.iter().enumerate() {
                let id = i as EmployeeId + 2;
                let manager_id = 1 + manager.index(i + 1) as EmployeeId;
                records.push(EmployeeRecord::new(id, "Staff", "Member", *salary, Some(manager_id)));
            }
            let valid = records.len();
            for k in 0..orphan_count {
                let id = 10_000 + k * 2;
                records.push(EmployeeRecord::new(id, "Lost", "Lead", 1000, Some(90_000 + k)));
                records.push(EmployeeRecord::new(id + 1, "Lost", "Report", 1000, Some(id)));
            }
            (records, valid)
        })
}

fn shuffled_org() -> impl Strategy<Value = (Vec<EmployeeRecord>, Vec<EmployeeRecord>, usize)> {
    org_records().prop_flat_map(|(records, valid)| {
        (Just(records.clone()), Just(records).prop_shuffle(), Just(valid))
    })
}

/// (employee, manager) pairs present in the tree.
fn edges(hierarchy: &Hierarchy) -> BTreeSet<(EmployeeId, EmployeeId)> {
    let tree = &hierarchy.tree;
    tree.iter()
        .filter_map(|(_, node)| {
            node.parent
                .and_then(|p| tree.get_node(p))
                .map(|parent| (node.employee.id, parent.employee.id))
        })
        .collect()
}

fn orphan_ids(hierarchy: &Hierarchy) -> BTreeSet<EmployeeId> {
    hierarchy.orphans.iter().map(|o| o.employee.id).collect()
}

proptest! {
    #[test]
    fn permuted_input_builds_identical_relationships((original, shuffled, _valid) in shuffled_org()) {
        let a = HierarchyBuilder::new().build(original).unwrap();
        let b = HierarchyBuilder::new().build(shuffled).unwrap();

        prop_assert_eq!(edges(&a), edges(&b));
        prop_assert_eq!(orphan_ids(&a), orphan_ids(&b));
        prop_assert_eq!(a.tree.root_employee(), b.tree.root_employee());
    }

    #[test]
    fn node_count_is_input_minus_orphans((_original, shuffled, valid) in shuffled_org()) {
        let total = shuffled.len();
        let hierarchy = HierarchyBuilder::new().build(shuffled).unwrap();

        prop_assert_eq!(hierarchy.tree.len(), valid);
        prop_assert_eq!(hierarchy.tree.len(), total - hierarchy.orphans.len());
    }
}
