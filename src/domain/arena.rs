//! Arena-based organisation tree.

use std::collections::HashMap;

use generational_arena::{Arena, Index};
use termtree::Tree;
use tracing::instrument;

use crate::domain::entities::{EmployeeId, EmployeeRecord};

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct TreeNode {
    /// Employee owned by this node
    pub employee: EmployeeRecord,
    /// Index of the manager's node, None for the root
    pub parent: Option<Index>,
    /// Indices of direct reports, in insertion order
    pub children: Vec<Index>,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena-backed organisation hierarchy.
///
/// Nodes are only inserted by the hierarchy builder; once handed out the
/// tree is read-only and can be shared across threads.
#[derive(Debug)]
pub struct OrgTree {
    /// Arena storage for all tree nodes
    arena: Arena<TreeNode>,
    /// Index of the root node, None for empty trees
    root: Option<Index>,
    /// Employee id to node lookup
    by_id: HashMap<EmployeeId, Index>,
}

impl Default for OrgTree {
    fn default() -> Self {
        Self::new()
    }
}

impl OrgTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
            by_id: HashMap::new(),
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub(crate) fn insert_node(&mut self, employee: EmployeeRecord, parent: Option<Index>) -> Index {
        let id = employee.id;
        let node = TreeNode {
            employee,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }
        self.by_id.insert(id, node_idx);

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    /// Employee at the top of the hierarchy.
    pub fn root_employee(&self) -> Option<&EmployeeRecord> {
        self.root
            .and_then(|idx| self.get_node(idx))
            .map(|node| &node.employee)
    }

    /// Locate the node holding employee `id`.
    pub fn find(&self, id: EmployeeId) -> Option<Index> {
        self.by_id.get(&id).copied()
    }

    pub fn contains(&self, id: EmployeeId) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Direct reports of the node at `idx`.
    pub fn children(&self, idx: Index) -> impl Iterator<Item = &TreeNode> + '_ {
        self.get_node(idx)
            .into_iter()
            .flat_map(|node| node.children.iter())
            .filter_map(move |&child| self.get_node(child))
    }

    /// Employee ids of the direct reports of `id`, in insertion order.
    pub fn subordinate_ids(&self, id: EmployeeId) -> Vec<EmployeeId> {
        self.find(id)
            .map(|idx| self.children(idx).map(|c| c.employee.id).collect())
            .unwrap_or_default()
    }

    /// Pre-order (depth-first, left-to-right) traversal.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    /// Pre-order traversal yielding each node with its distance from the root.
    pub fn iter_with_depth(&self) -> DepthIterator<'_> {
        DepthIterator::new(self)
    }

    /// Number of levels in the tree; a lone root has depth 1.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.iter_with_depth()
            .map(|(_, _, depth)| depth + 1)
            .max()
            .unwrap_or(0)
    }

    /// Render the hierarchy for terminal display.
    pub fn to_tree_string(&self) -> Tree<String> {
        fn build_tree(arena: &OrgTree, node_idx: Index, parent_tree: &mut Tree<String>) {
            for child in arena.get_node(node_idx).into_iter().flat_map(|n| &n.children) {
                if let Some(node) = arena.get_node(*child) {
                    let mut child_tree = Tree::new(node_label(&node.employee));
                    build_tree(arena, *child, &mut child_tree);
                    parent_tree.push(child_tree);
                }
            }
        }

        match self.root.and_then(|idx| self.get_node(idx).map(|n| (idx, n))) {
            Some((root_idx, root)) => {
                let mut tree = Tree::new(node_label(&root.employee));
                build_tree(self, root_idx, &mut tree);
                tree
            }
            None => Tree::new("Empty tree".to_string()),
        }
    }
}

fn node_label(employee: &EmployeeRecord) -> String {
    format!("{} [{}]", employee, employee.salary)
}

pub struct TreeIterator<'a> {
    arena: &'a OrgTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a OrgTree) -> Self {
        Self {
            arena,
            stack: arena.root().into_iter().collect(),
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children.iter().rev());
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct DepthIterator<'a> {
    arena: &'a OrgTree,
    stack: Vec<(Index, usize)>,
}

impl<'a> DepthIterator<'a> {
    fn new(arena: &'a OrgTree) -> Self {
        Self {
            arena,
            stack: arena.root().into_iter().map(|idx| (idx, 0)).collect(),
        }
    }
}

impl<'a> Iterator for DepthIterator<'a> {
    type Item = (Index, &'a TreeNode, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, depth)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                self.stack
                    .extend(node.children.iter().rev().map(|&child| (child, depth + 1)));
                return Some((current_idx, node, depth));
            }
        }
        None
    }
}
