//! Dependency indexer
//!
//! One pass over the arena builds the code → node lookup table and the
//! per-code reference counts. Counts are kept for every referenced code,
//! resolved or not, but only codes that resolve to a node report a
//! dependent count; an unresolved code contributes nothing visible.
//!
//! Dependency references form their own directed graph over codes. It may
//! contain cycles or point at ancestors, and the indexer never follows it.

use std::collections::{HashMap, HashSet};

use super::arena::{NodeIdx, TreeArena};

/// A node with at least this many dependents is drawn as critical
pub const CRITICAL_THRESHOLD: usize = 2;

/// Derived per-node annotation, kept beside the document rather than in it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeAnnotation {
    pub dependent_count: usize,
    pub is_critical: bool,
}

#[derive(Debug, Clone, Default)]
pub struct DependencyIndex {
    by_code: HashMap<String, NodeIdx>,
    /// Referencing nodes per code, whether or not the code resolves
    reference_counts: HashMap<String, usize>,
    /// Resolved dependency targets per node, declared order, deduplicated
    targets: Vec<Vec<NodeIdx>>,
    annotations: Vec<NodeAnnotation>,
    duplicates: Vec<String>,
}

impl DependencyIndex {
    pub fn build(arena: &TreeArena) -> Self {
        let mut by_code: HashMap<String, NodeIdx> = HashMap::new();
        let mut duplicates = Vec::new();
        let mut reference_counts: HashMap<String, usize> = HashMap::new();

        for (idx, node) in arena.iter() {
            if let Some(code) = node.code() {
                if by_code.contains_key(code) {
                    duplicates.push(code.to_string());
                } else {
                    by_code.insert(code.to_string(), idx);
                }
            }

            // A node listing the same code twice still depends on it once
            let mut seen: HashSet<&str> = HashSet::new();
            for dep in &node.node.dependencies {
                let dep = dep.trim();
                if dep.is_empty() || !seen.insert(dep) {
                    continue;
                }
                *reference_counts.entry(dep.to_string()).or_insert(0) += 1;
            }
        }

        let targets: Vec<Vec<NodeIdx>> = arena
            .iter()
            .map(|(_, node)| {
                let mut resolved: Vec<NodeIdx> = Vec::new();
                for dep in &node.node.dependencies {
                    if let Some(&target) = by_code.get(dep.trim()) {
                        if !resolved.contains(&target) {
                            resolved.push(target);
                        }
                    }
                }
                resolved
            })
            .collect();

        let annotations = arena
            .iter()
            .map(|(idx, node)| {
                let dependent_count = node
                    .code()
                    .filter(|code| by_code.get(*code) == Some(&idx))
                    .and_then(|code| reference_counts.get(code).copied())
                    .unwrap_or(0);
                NodeAnnotation {
                    dependent_count,
                    is_critical: dependent_count >= CRITICAL_THRESHOLD,
                }
            })
            .collect();

        let index = Self {
            by_code,
            reference_counts,
            targets,
            annotations,
            duplicates,
        };

        let unresolved = index.unresolved_codes();
        if !unresolved.is_empty() {
            tracing::warn!(codes = ?unresolved, "Dependencies reference unknown codes");
        }
        if !index.duplicates.is_empty() {
            tracing::warn!(codes = ?index.duplicates, "Duplicate node codes, first occurrence wins");
        }
        tracing::info!(
            nodes = arena.len(),
            codes = index.by_code.len(),
            referenced = index.reference_counts.len(),
            "Built dependency index"
        );

        index
    }

    /// Node carrying `code`
    pub fn lookup(&self, code: &str) -> Option<NodeIdx> {
        self.by_code.get(code).copied()
    }

    pub fn code_count(&self) -> usize {
        self.by_code.len()
    }

    pub fn annotation(&self, idx: NodeIdx) -> NodeAnnotation {
        self.annotations.get(idx.0).copied().unwrap_or_default()
    }

    /// Number of other nodes whose dependencies name this node's code
    pub fn dependent_count(&self, idx: NodeIdx) -> usize {
        self.annotation(idx).dependent_count
    }

    pub fn is_critical(&self, idx: NodeIdx) -> bool {
        self.annotation(idx).is_critical
    }

    /// Raw number of referencing nodes, including for codes with no node
    pub fn reference_count(&self, code: &str) -> usize {
        self.reference_counts.get(code).copied().unwrap_or(0)
    }

    /// Resolved dependency targets of `idx`, in declared order
    pub fn targets(&self, idx: NodeIdx) -> &[NodeIdx] {
        self.targets.get(idx.0).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Referenced codes with no matching node, sorted
    pub fn unresolved_codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self
            .reference_counts
            .keys()
            .filter(|code| !self.by_code.contains_key(*code))
            .map(String::as_str)
            .collect();
        codes.sort_unstable();
        codes
    }

    /// Codes carried by more than one node, in document order
    pub fn duplicate_codes(&self) -> &[String] {
        &self.duplicates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ngo_plan_types::{HierarchyNode, NodeType};
    use pretty_assertions::assert_eq;

    fn module(name: &str, code: &str) -> HierarchyNode {
        HierarchyNode::new(name, NodeType::Module).with_code(code)
    }

    #[test]
    fn test_counts_and_critical_threshold() {
        let root = HierarchyNode::new("Root", NodeType::Platform)
            .with_child(module("Patients", "P"))
            .with_child(module("Encounters", "E").with_dependency("P"))
            .with_child(module("Billing", "B").with_dependency("P").with_dependency("E"));
        let arena = TreeArena::build(&root);
        let index = DependencyIndex::build(&arena);

        let p = index.lookup("P").unwrap();
        let e = index.lookup("E").unwrap();
        let b = index.lookup("B").unwrap();
        assert_eq!(index.dependent_count(p), 2);
        assert!(index.is_critical(p));
        assert_eq!(index.dependent_count(e), 1);
        assert!(!index.is_critical(e));
        assert_eq!(index.dependent_count(b), 0);
        assert_eq!(index.targets(b), &[p, e]);
    }

    #[test]
    fn test_unresolved_codes_count_internally_only() {
        let root = HierarchyNode::new("Root", NodeType::Platform)
            .with_child(module("A", "A").with_dependency("GHOST"))
            .with_child(module("B", "B").with_dependency("GHOST"));
        let arena = TreeArena::build(&root);
        let index = DependencyIndex::build(&arena);

        assert_eq!(index.reference_count("GHOST"), 2);
        assert_eq!(index.unresolved_codes(), vec!["GHOST"]);
        assert!(index.lookup("GHOST").is_none());
        assert!(arena.iter().all(|(idx, _)| index.dependent_count(idx) == 0));
        assert!(index.targets(index.lookup("A").unwrap()).is_empty());
    }

    #[test]
    fn test_self_reference_counts_like_any_edge() {
        let root = HierarchyNode::new("Root", NodeType::Platform)
            .with_child(module("Loop", "L").with_dependency("L"));
        let arena = TreeArena::build(&root);
        let index = DependencyIndex::build(&arena);
        let l = index.lookup("L").unwrap();
        assert_eq!(index.dependent_count(l), 1);
        assert_eq!(index.targets(l), &[l]);
    }

    #[test]
    fn test_uncoded_node_has_zero_count() {
        let root = HierarchyNode::new("Root", NodeType::Platform)
            .with_child(module("A", "A").with_dependency("Root"));
        let arena = TreeArena::build(&root);
        let index = DependencyIndex::build(&arena);
        assert_eq!(index.dependent_count(arena.root()), 0);
    }

    #[test]
    fn test_duplicate_codes_reported_first_wins() {
        let root = HierarchyNode::new("Root", NodeType::Platform)
            .with_child(module("First", "X"))
            .with_child(module("Second", "X"))
            .with_child(module("User", "U").with_dependency("X"));
        let arena = TreeArena::build(&root);
        let index = DependencyIndex::build(&arena);
        assert_eq!(index.duplicate_codes(), &["X".to_string()]);
        let first = index.lookup("X").unwrap();
        assert_eq!(arena.node(first).name(), "First");
        assert_eq!(index.dependent_count(first), 1);
        assert_eq!(index.code_count(), 2);
    }

    #[test]
    fn test_repeated_reference_from_one_node_counts_once() {
        let root = HierarchyNode::new("Root", NodeType::Platform)
            .with_child(module("Target", "T"))
            .with_child(module("User", "U").with_dependency("T").with_dependency("T"));
        let arena = TreeArena::build(&root);
        let index = DependencyIndex::build(&arena);
        let t = index.lookup("T").unwrap();
        assert_eq!(index.dependent_count(t), 1);
        assert_eq!(index.targets(index.lookup("U").unwrap()), &[t]);
    }
}
