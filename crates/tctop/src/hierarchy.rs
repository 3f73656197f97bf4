//! Class hierarchy.
//!
//! The tree is kept as a node table keyed by class id plus adjacency
//! lists, so a parent id that names no known class is just a missing key.
//! Classes hanging off such a parent are unreachable from every root and
//! are reported by [`ClassTree::orphans`] instead of breaking traversal.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use crate::handle::ClassId;
use crate::record::ClassRecord;

/// Parent/child structure of one snapshot.
#[derive(Debug, Clone, Default)]
pub struct ClassTree {
    /// Every class and its declared parent.
    parents: HashMap<ClassId, Option<ClassId>>,
    /// Children of each class in snapshot order.
    children: HashMap<ClassId, Vec<ClassId>>,
    /// Classes without a parent, in snapshot order.
    roots: Vec<ClassId>,
}

/// One visited node of a depth-first walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visit {
    /// Class being visited.
    pub class_id: ClassId,
    /// Distance from the root; roots are at depth 0.
    pub depth: usize,
}

/// Nested `class id -> children` view of a tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Nested(pub BTreeMap<ClassId, Nested>);

impl Nested {
    /// A node with no children.
    pub fn leaf() -> Self {
        Self::default()
    }
}

impl ClassTree {
    /// Build the tree from class records.
    pub fn new(records: &[ClassRecord]) -> Self {
        let mut tree = Self::default();
        for record in records {
            tree.parents.insert(record.class_id, record.parent_id);
            match record.parent_id {
                None => tree.roots.push(record.class_id),
                Some(parent) => tree.children.entry(parent).or_default().push(record.class_id),
            }
        }

        let orphans = tree.orphans();
        if !orphans.is_empty() {
            tracing::debug!(?orphans, "classes with unknown parent");
        }
        tree
    }

    /// Whether `class_id` is part of the tree.
    pub fn contains(&self, class_id: &ClassId) -> bool {
        self.parents.contains_key(class_id)
    }

    /// Root classes in snapshot order.
    pub fn roots(&self) -> &[ClassId] {
        &self.roots
    }

    /// Direct children of `class_id` in snapshot order.
    pub fn children(&self, class_id: &ClassId) -> &[ClassId] {
        self.children.get(class_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Classes whose parent is not in the tree.
    pub fn orphans(&self) -> Vec<ClassId> {
        let mut orphans: Vec<ClassId> = self
            .parents
            .iter()
            .filter_map(|(id, parent)| match parent {
                Some(p) if !self.parents.contains_key(p) => Some(*id),
                _ => None,
            })
            .collect();
        orphans.sort();
        orphans
    }

    /// Depth-first walk from the roots.
    ///
    /// At every level the siblings are visited in the order given by
    /// `order`, and a node's whole subtree is visited before its next
    /// sibling. Classes not reachable from a root are not visited.
    pub fn walk<F>(&self, mut order: F) -> Vec<Visit>
    where
        F: FnMut(&ClassId, &ClassId) -> Ordering,
    {
        let mut out = Vec::with_capacity(self.parents.len());
        let mut seen = HashSet::new();

        let mut roots = self.roots.clone();
        roots.sort_by(|a, b| order(a, b));

        // Stack of pending nodes; siblings are pushed in reverse.
        let mut stack: Vec<Visit> = roots
            .into_iter()
            .rev()
            .map(|class_id| Visit { class_id, depth: 0 })
            .collect();

        while let Some(visit) = stack.pop() {
            if !seen.insert(visit.class_id) {
                continue;
            }
            out.push(visit);

            let mut kids = self.children(&visit.class_id).to_vec();
            kids.sort_by(|a, b| order(a, b));
            stack.extend(kids.into_iter().rev().map(|class_id| Visit {
                class_id,
                depth: visit.depth + 1,
            }));
        }
        out
    }

    /// Number of levels reachable from the roots (0 for an empty tree).
    pub fn depth(&self) -> usize {
        self.walk(|a, b| a.cmp(b))
            .iter()
            .map(|v| v.depth + 1)
            .max()
            .unwrap_or(0)
    }

    /// Nested mapping of every root to its descendants.
    pub fn nested(&self) -> Nested {
        let mut seen = HashSet::new();
        Nested(
            self.roots
                .iter()
                .map(|root| (*root, self.nested_from(root, &mut seen)))
                .collect(),
        )
    }

    fn nested_from(&self, class_id: &ClassId, seen: &mut HashSet<ClassId>) -> Nested {
        if !seen.insert(*class_id) {
            return Nested::leaf();
        }
        Nested(
            self.children(class_id)
                .iter()
                .map(|child| (*child, self.nested_from(child, seen)))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ClassStats;

    const A: ClassId = ClassId::new(1, 0xa);
    const B: ClassId = ClassId::new(1, 0xb);
    const C: ClassId = ClassId::new(1, 0xc);
    const D: ClassId = ClassId::new(1, 0xd);

    fn class(id: ClassId, parent: Option<ClassId>) -> ClassRecord {
        ClassRecord::new(id, parent, ClassStats::default())
    }

    fn sample_tree() -> ClassTree {
        ClassTree::new(&[
            class(A, None),
            class(B, Some(A)),
            class(C, Some(A)),
            class(D, Some(B)),
        ])
    }

    fn node(children: Vec<(ClassId, Nested)>) -> Nested {
        Nested(children.into_iter().collect())
    }

    #[test]
    fn test_nested_mapping() {
        let expected = node(vec![(
            A,
            node(vec![(B, node(vec![(D, Nested::leaf())])), (C, Nested::leaf())]),
        )]);
        assert_eq!(sample_tree().nested(), expected);
    }

    #[test]
    fn test_walk_enters_children_before_siblings() {
        // B outranks C, D is B's only child
        let score = |id: &ClassId| match *id {
            A => 0,
            B => 30,
            C => 20,
            D => 10,
            _ => -1,
        };
        let visits = sample_tree().walk(|a, b| score(b).cmp(&score(a)));
        let order: Vec<ClassId> = visits.iter().map(|v| v.class_id).collect();
        assert_eq!(order, [A, B, D, C]);

        let depths: Vec<usize> = visits.iter().map(|v| v.depth).collect();
        assert_eq!(depths, [0, 1, 2, 1]);
    }

    #[test]
    fn test_walk_ranks_siblings() {
        // C outranks B, so C's subtree comes first
        let score = |id: &ClassId| if *id == C { 2 } else { 1 };
        let visits = sample_tree().walk(|a, b| score(b).cmp(&score(a)));
        let order: Vec<ClassId> = visits.iter().map(|v| v.class_id).collect();
        assert_eq!(order, [A, C, B, D]);
    }

    #[test]
    fn test_dangling_parent() {
        let missing = ClassId::new(1, 0x50);
        let orphan = ClassId::new(1, 0x99);
        let tree = ClassTree::new(&[class(A, None), class(orphan, Some(missing))]);

        assert_eq!(tree.orphans(), [orphan]);
        assert!(tree.contains(&orphan));
        assert!(!tree.contains(&missing));

        let visited: Vec<ClassId> = tree.walk(|a, b| a.cmp(b)).iter().map(|v| v.class_id).collect();
        assert_eq!(visited, [A]);
        assert_eq!(tree.nested(), node(vec![(A, Nested::leaf())]));
    }

    #[test]
    fn test_parent_cycle_does_not_loop() {
        let tree = ClassTree::new(&[class(A, None), class(B, Some(C)), class(C, Some(B))]);
        assert_eq!(tree.walk(|a, b| a.cmp(b)).len(), 1);
        assert!(tree.orphans().is_empty());
    }

    #[test]
    fn test_depth() {
        assert_eq!(sample_tree().depth(), 3);
        assert_eq!(ClassTree::default().depth(), 0);
        assert_eq!(ClassTree::new(&[class(A, None)]).depth(), 1);
    }
}
