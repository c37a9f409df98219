//! Which nodes currently show their children

use std::collections::HashSet;

use super::arena::{NodeIdx, NodeKey, TreeArena};

/// Set of expanded node keys. A node is visible iff every strict ancestor is
/// expanded; the root is always visible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    expanded: HashSet<NodeKey>,
}

impl ExpansionState {
    /// Nodes with children shallower than `expanded_depth` start expanded
    pub fn initial(arena: &TreeArena, expanded_depth: usize) -> Self {
        let expanded = arena
            .iter()
            .filter(|(_, n)| n.depth < expanded_depth && n.has_children())
            .map(|(_, n)| n.key.clone())
            .collect();
        Self { expanded }
    }

    pub fn is_expanded(&self, key: &NodeKey) -> bool {
        self.expanded.contains(key)
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    pub fn expanded_keys(&self) -> impl Iterator<Item = &NodeKey> {
        self.expanded.iter()
    }

    /// Flip a node's membership. Leaves have nothing to show and are left
    /// alone. Returns whether the node is now expanded.
    pub fn toggle(&mut self, arena: &TreeArena, idx: NodeIdx) -> bool {
        let node = arena.node(idx);
        if !node.has_children() {
            return false;
        }
        if self.expanded.remove(&node.key) {
            false
        } else {
            self.expanded.insert(node.key.clone());
            true
        }
    }

    pub fn set_expanded(&mut self, arena: &TreeArena, idx: NodeIdx, expanded: bool) {
        let node = arena.node(idx);
        if expanded && node.has_children() {
            self.expanded.insert(node.key.clone());
        } else {
            self.expanded.remove(&node.key);
        }
    }

    /// Expand every strict ancestor of `idx`. Returns true if anything changed.
    pub fn expand_ancestors(&mut self, arena: &TreeArena, idx: NodeIdx) -> bool {
        let mut changed = false;
        for ancestor in arena.ancestors(idx) {
            changed |= self.expanded.insert(arena.key(ancestor).clone());
        }
        changed
    }

    pub fn is_visible(&self, arena: &TreeArena, idx: NodeIdx) -> bool {
        arena
            .ancestors(idx)
            .all(|a| self.expanded.contains(arena.key(a)))
    }

    /// True when the node has children that are currently collapsed away
    pub fn has_hidden_children(&self, arena: &TreeArena, idx: NodeIdx) -> bool {
        let node = arena.node(idx);
        node.has_children() && !self.expanded.contains(&node.key)
    }

    /// Visible nodes in pre-order
    pub fn visible_nodes(&self, arena: &TreeArena) -> Vec<NodeIdx> {
        let mut visible = Vec::new();
        let mut stack = vec![arena.root()];
        while let Some(idx) = stack.pop() {
            visible.push(idx);
            if self.expanded.contains(arena.key(idx)) {
                stack.extend(arena.children(idx).iter().rev().copied());
            }
        }
        visible
    }

    /// Drop keys that no longer name a node in `arena`
    pub fn retain_existing(&mut self, arena: &TreeArena) {
        self.expanded.retain(|key| arena.find(key).is_some());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ngo_plan_types::{HierarchyNode, NodeType};
    use pretty_assertions::assert_eq;

    fn arena() -> TreeArena {
        TreeArena::build(
            &HierarchyNode::new("Platform", NodeType::Platform).with_child(
                HierarchyNode::new("Domain", NodeType::Domain)
                    .with_code("CD")
                    .with_child(
                        HierarchyNode::new("Module", NodeType::Module)
                            .with_code("CD.1.1")
                            .with_child(
                                HierarchyNode::new("Component", NodeType::Component)
                                    .with_code("CD.1.1.1"),
                            ),
                    ),
            ),
        )
    }

    #[test]
    fn test_initial_expands_shallow_levels_only() {
        let arena = arena();
        let state = ExpansionState::initial(&arena, 2);
        let visible = state.visible_nodes(&arena);
        assert_eq!(visible, vec![NodeIdx(0), NodeIdx(1), NodeIdx(2)]);
        assert!(state.has_hidden_children(&arena, NodeIdx(2)));
        assert!(!state.is_visible(&arena, NodeIdx(3)));
    }

    #[test]
    fn test_double_toggle_restores_visible_set() {
        let arena = arena();
        let mut state = ExpansionState::initial(&arena, 2);
        let before = state.visible_nodes(&arena);
        assert!(!state.toggle(&arena, NodeIdx(1)));
        assert_eq!(state.visible_nodes(&arena), vec![NodeIdx(0), NodeIdx(1)]);
        assert!(state.toggle(&arena, NodeIdx(1)));
        assert_eq!(state.visible_nodes(&arena), before);
    }

    #[test]
    fn test_toggle_leaf_is_noop() {
        let arena = arena();
        let mut state = ExpansionState::initial(&arena, 2);
        let before = state.clone();
        assert!(!state.toggle(&arena, NodeIdx(3)));
        assert_eq!(state, before);
    }

    #[test]
    fn test_collapsed_parent_keeps_child_expansion() {
        let arena = arena();
        let mut state = ExpansionState::initial(&arena, 4);
        state.toggle(&arena, NodeIdx(1));
        assert!(state.is_expanded(arena.key(NodeIdx(2))));
        assert!(!state.is_visible(&arena, NodeIdx(3)));
        state.toggle(&arena, NodeIdx(1));
        assert!(state.is_visible(&arena, NodeIdx(3)));
    }

    #[test]
    fn test_expand_ancestors_reveals_target() {
        let arena = arena();
        let mut state = ExpansionState::initial(&arena, 0);
        assert_eq!(state.visible_nodes(&arena), vec![NodeIdx(0)]);
        assert!(state.expand_ancestors(&arena, NodeIdx(3)));
        assert!(state.is_visible(&arena, NodeIdx(3)));
        assert!(!state.expand_ancestors(&arena, NodeIdx(3)));
    }

    #[test]
    fn test_retain_existing_drops_stale_keys() {
        let arena = arena();
        let mut state = ExpansionState::initial(&arena, 4);
        let smaller = TreeArena::build(&HierarchyNode::new("Platform", NodeType::Platform));
        state.retain_existing(&smaller);
        assert_eq!(state.len(), 1);
        assert!(state.is_expanded(arena.key(NodeIdx(0))));
    }
}
