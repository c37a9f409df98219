//! Enter / update / exit between two layouts
//!
//! Nodes are matched by [`NodeKey`], edges by [`EdgeKey`]. The animated
//! scene consumes the diff so that surviving nodes move from their old
//! coordinates instead of being rebuilt.

use std::collections::HashSet;

use super::arena::NodeKey;
use super::layout::{EdgeKey, LayoutFrame};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutDiff {
    /// In the new layout only, new-layout order
    pub entered: Vec<NodeKey>,
    /// In both layouts, new-layout order
    pub updated: Vec<NodeKey>,
    /// In the old layout only, old-layout order
    pub exited: Vec<NodeKey>,
    pub edges_entered: Vec<EdgeKey>,
    pub edges_updated: Vec<EdgeKey>,
    pub edges_exited: Vec<EdgeKey>,
}

impl LayoutDiff {
    /// Diff `next` against `prev`. Without a previous layout everything enters.
    pub fn between(prev: Option<&LayoutFrame>, next: &LayoutFrame) -> Self {
        let mut diff = LayoutDiff::default();

        for node in &next.nodes {
            if prev.is_some_and(|p| p.contains(&node.key)) {
                diff.updated.push(node.key.clone());
            } else {
                diff.entered.push(node.key.clone());
            }
        }
        if let Some(prev) = prev {
            diff.exited = prev
                .nodes
                .iter()
                .filter(|n| !next.contains(&n.key))
                .map(|n| n.key.clone())
                .collect();
        }

        let prev_edges: HashSet<&EdgeKey> = prev
            .map(|p| p.edges().map(|e| &e.key).collect())
            .unwrap_or_default();
        let next_edges: HashSet<&EdgeKey> = next.edges().map(|e| &e.key).collect();

        for edge in next.edges() {
            if prev_edges.contains(&edge.key) {
                diff.edges_updated.push(edge.key.clone());
            } else {
                diff.edges_entered.push(edge.key.clone());
            }
        }
        if let Some(prev) = prev {
            diff.edges_exited = prev
                .edges()
                .filter(|e| !next_edges.contains(&e.key))
                .map(|e| e.key.clone())
                .collect();
        }

        tracing::debug!(
            entered = diff.entered.len(),
            updated = diff.updated.len(),
            exited = diff.exited.len(),
            edges_entered = diff.edges_entered.len(),
            edges_exited = diff.edges_exited.len(),
            "Layout diff"
        );

        diff
    }

    pub fn is_empty(&self) -> bool {
        self.entered.is_empty()
            && self.exited.is_empty()
            && self.edges_entered.is_empty()
            && self.edges_exited.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::arena::TreeArena;
    use crate::graph::expansion::ExpansionState;
    use crate::graph::index::DependencyIndex;
    use crate::graph::layout::{EdgeKind, TreeLayoutEngine};
    use ngo_plan_types::{HierarchyNode, NodeType};
    use pretty_assertions::assert_eq;

    fn code(c: &str) -> NodeKey {
        NodeKey::Code(c.to_string())
    }

    fn fixture() -> (TreeArena, DependencyIndex) {
        let root = HierarchyNode::new("Root", NodeType::Platform).with_child(
            HierarchyNode::new("Domain", NodeType::Domain)
                .with_code("D")
                .with_child(HierarchyNode::new("M1", NodeType::Module).with_code("M1"))
                .with_child(HierarchyNode::new("M2", NodeType::Module).with_code("M2").with_dependency("M1")),
        );
        let arena = TreeArena::build(&root);
        let index = DependencyIndex::build(&arena);
        (arena, index)
    }

    #[test]
    fn test_first_layout_enters_everything() {
        let (arena, index) = fixture();
        let expansion = ExpansionState::initial(&arena, 2);
        let frame = TreeLayoutEngine::new(35.0, 250.0).compute(&arena, &index, &expansion, false);
        let diff = LayoutDiff::between(None, &frame);
        assert_eq!(diff.entered.len(), 4);
        assert!(diff.updated.is_empty());
        assert!(diff.exited.is_empty());
        assert_eq!(diff.edges_entered.len(), 3);
    }

    #[test]
    fn test_collapse_exits_children_and_their_edges() {
        let (arena, index) = fixture();
        let engine = TreeLayoutEngine::new(35.0, 250.0);
        let mut expansion = ExpansionState::initial(&arena, 2);
        let before = engine.compute(&arena, &index, &expansion, true);

        let domain = arena.find(&code("D")).unwrap();
        expansion.toggle(&arena, domain);
        let after = engine.compute(&arena, &index, &expansion, true);
        let diff = LayoutDiff::between(Some(&before), &after);

        assert_eq!(diff.exited, vec![code("M1"), code("M2")]);
        assert!(diff.entered.is_empty());
        assert_eq!(diff.updated.len(), 2);
        assert_eq!(diff.edges_exited.len(), 3);
        assert!(diff
            .edges_exited
            .iter()
            .any(|e| e.kind == EdgeKind::Dependency && e.source == code("M2")));
    }

    #[test]
    fn test_overlay_toggle_only_touches_dependency_edges() {
        let (arena, index) = fixture();
        let engine = TreeLayoutEngine::new(35.0, 250.0);
        let expansion = ExpansionState::initial(&arena, 2);
        let off = engine.compute(&arena, &index, &expansion, false);
        let on = engine.compute(&arena, &index, &expansion, true);
        let diff = LayoutDiff::between(Some(&off), &on);

        assert!(diff.entered.is_empty() && diff.exited.is_empty());
        assert_eq!(diff.edges_entered.len(), 1);
        assert_eq!(diff.edges_entered[0].kind, EdgeKind::Dependency);
        assert!(!diff.is_empty());
    }
}
