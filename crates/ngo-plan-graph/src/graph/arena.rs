//! Flat arena over the hierarchy document
//!
//! The nested document is flattened once into a pre-order `Vec`, with parent
//! and child links stored as indices. Every node gets a stable [`NodeKey`]:
//! its code when it has one, otherwise its structural path. Keys survive
//! re-layouts, so expansion state and animations are tracked by key.

use std::collections::HashMap;

use ngo_plan_types::HierarchyNode;

/// Position of a node in the arena (pre-order, root = 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIdx(pub usize);

impl NodeIdx {
    pub const ROOT: NodeIdx = NodeIdx(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// Stable identity of a node across layouts
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKey {
    /// The node's document code
    Code(String),
    /// Parent key plus `/{child index}:{name}` for nodes without a usable code
    Path(String),
}

impl NodeKey {
    pub fn as_str(&self) -> &str {
        match self {
            NodeKey::Code(s) | NodeKey::Path(s) => s,
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            NodeKey::Code(s) => Some(s),
            NodeKey::Path(_) => None,
        }
    }
}

impl std::fmt::Display for NodeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One flattened node. `node` holds the payload with its children stripped.
#[derive(Debug, Clone)]
pub struct ArenaNode {
    pub key: NodeKey,
    pub parent: Option<NodeIdx>,
    pub children: Vec<NodeIdx>,
    pub depth: usize,
    /// Position among the parent's children
    pub sibling_index: usize,
    pub node: HierarchyNode,
}

impl ArenaNode {
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn name(&self) -> &str {
        &self.node.name
    }

    pub fn code(&self) -> Option<&str> {
        self.node.code()
    }
}

#[derive(Debug, Clone)]
pub struct TreeArena {
    nodes: Vec<ArenaNode>,
    by_key: HashMap<NodeKey, NodeIdx>,
}

impl TreeArena {
    /// Flatten a document tree. A code already claimed by an earlier node is
    /// not reused as a key; the later node falls back to its path.
    pub fn build(root: &HierarchyNode) -> Self {
        let mut nodes: Vec<ArenaNode> = Vec::with_capacity(root.subtree_len());
        let mut by_key = HashMap::new();

        // (parent, sibling index, node)
        let mut stack: Vec<(Option<NodeIdx>, usize, &HierarchyNode)> = vec![(None, 0, root)];
        while let Some((parent, sibling_index, doc_node)) = stack.pop() {
            let idx = NodeIdx(nodes.len());
            let depth = parent.map(|p| nodes[p.0].depth + 1).unwrap_or(0);

            let path_key = || {
                let segment = format!("{}:{}", sibling_index, doc_node.name);
                match parent {
                    Some(p) => NodeKey::Path(format!("{}/{}", nodes[p.0].key.as_str(), segment)),
                    None => NodeKey::Path(segment),
                }
            };
            let key = match doc_node.code() {
                Some(code) if !by_key.contains_key(&NodeKey::Code(code.to_string())) => {
                    NodeKey::Code(code.to_string())
                }
                Some(code) => {
                    tracing::warn!(code, name = %doc_node.name, "Duplicate node code, keying by path");
                    path_key()
                }
                None => path_key(),
            };

            by_key.insert(key.clone(), idx);
            if let Some(p) = parent {
                nodes[p.0].children.push(idx);
            }
            nodes.push(ArenaNode {
                key,
                parent,
                children: Vec::with_capacity(doc_node.children.len()),
                depth,
                sibling_index,
                node: doc_node.detached(),
            });

            for (i, child) in doc_node.children.iter().enumerate().rev() {
                stack.push((Some(idx), i, child));
            }
        }

        Self { nodes, by_key }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> NodeIdx {
        NodeIdx::ROOT
    }

    pub fn get(&self, idx: NodeIdx) -> Option<&ArenaNode> {
        self.nodes.get(idx.0)
    }

    /// Panics on an index from another arena
    pub fn node(&self, idx: NodeIdx) -> &ArenaNode {
        &self.nodes[idx.0]
    }

    pub fn find(&self, key: &NodeKey) -> Option<NodeIdx> {
        self.by_key.get(key).copied()
    }

    pub fn key(&self, idx: NodeIdx) -> &NodeKey {
        &self.nodes[idx.0].key
    }

    pub fn parent(&self, idx: NodeIdx) -> Option<NodeIdx> {
        self.nodes[idx.0].parent
    }

    pub fn children(&self, idx: NodeIdx) -> &[NodeIdx] {
        &self.nodes[idx.0].children
    }

    pub fn depth(&self, idx: NodeIdx) -> usize {
        self.nodes[idx.0].depth
    }

    /// Pre-order iteration
    pub fn iter(&self) -> impl Iterator<Item = (NodeIdx, &ArenaNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeIdx(i), n))
    }

    /// Strict ancestors, nearest first
    pub fn ancestors(&self, idx: NodeIdx) -> Ancestors<'_> {
        Ancestors {
            arena: self,
            next: self.nodes[idx.0].parent,
        }
    }

    pub fn is_ancestor(&self, ancestor: NodeIdx, of: NodeIdx) -> bool {
        self.ancestors(of).any(|a| a == ancestor)
    }

    /// Number of nodes below `idx`
    pub fn descendant_count(&self, idx: NodeIdx) -> usize {
        let mut count = 0;
        let mut stack: Vec<NodeIdx> = self.children(idx).to_vec();
        while let Some(next) = stack.pop() {
            count += 1;
            stack.extend_from_slice(self.children(next));
        }
        count
    }
}

pub struct Ancestors<'a> {
    arena: &'a TreeArena,
    next: Option<NodeIdx>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeIdx;

    fn next(&mut self) -> Option<NodeIdx> {
        let current = self.next?;
        self.next = self.arena.parent(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ngo_plan_types::NodeType;
    use pretty_assertions::assert_eq;

    fn doc() -> HierarchyNode {
        HierarchyNode::new("Platform", NodeType::Platform)
            .with_child(
                HierarchyNode::new("Clinical", NodeType::Domain)
                    .with_code("CD")
                    .with_child(HierarchyNode::new("Patients", NodeType::Module).with_code("CD.1.1"))
                    .with_child(HierarchyNode::new("Notes", NodeType::Module)),
            )
            .with_child(HierarchyNode::new("Notes", NodeType::Domain))
    }

    #[test]
    fn test_build_is_preorder_with_links() {
        let arena = TreeArena::build(&doc());
        assert_eq!(arena.len(), 5);
        let names: Vec<&str> = arena.iter().map(|(_, n)| n.name()).collect();
        assert_eq!(names, vec!["Platform", "Clinical", "Patients", "Notes", "Notes"]);
        assert_eq!(arena.children(NodeIdx(1)), &[NodeIdx(2), NodeIdx(3)]);
        assert_eq!(arena.parent(NodeIdx(3)), Some(NodeIdx(1)));
        assert_eq!(arena.depth(NodeIdx(2)), 2);
        assert!(arena.node(NodeIdx(1)).node.children.is_empty());
    }

    #[test]
    fn test_keys_prefer_code_then_path() {
        let arena = TreeArena::build(&doc());
        assert_eq!(arena.key(NodeIdx(0)), &NodeKey::Path("0:Platform".into()));
        assert_eq!(arena.key(NodeIdx(1)), &NodeKey::Code("CD".into()));
        assert_eq!(arena.key(NodeIdx(3)), &NodeKey::Path("CD/1:Notes".into()));
        assert_eq!(arena.key(NodeIdx(4)), &NodeKey::Path("0:Platform/1:Notes".into()));
        assert_eq!(arena.find(&NodeKey::Code("CD.1.1".into())), Some(NodeIdx(2)));
    }

    #[test]
    fn test_same_name_siblings_get_distinct_keys() {
        let root = HierarchyNode::new("Root", NodeType::Platform)
            .with_child(HierarchyNode::new("Twin", NodeType::Component))
            .with_child(HierarchyNode::new("Twin", NodeType::Component));
        let arena = TreeArena::build(&root);
        assert_ne!(arena.key(NodeIdx(1)), arena.key(NodeIdx(2)));
    }

    #[test]
    fn test_duplicate_code_falls_back_to_path() {
        let root = HierarchyNode::new("Root", NodeType::Platform)
            .with_child(HierarchyNode::new("A", NodeType::Module).with_code("X"))
            .with_child(HierarchyNode::new("B", NodeType::Module).with_code("X"));
        let arena = TreeArena::build(&root);
        assert_eq!(arena.key(NodeIdx(1)), &NodeKey::Code("X".into()));
        assert_eq!(arena.key(NodeIdx(2)), &NodeKey::Path("0:Root/1:B".into()));
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let arena = TreeArena::build(&doc());
        let chain: Vec<NodeIdx> = arena.ancestors(NodeIdx(2)).collect();
        assert_eq!(chain, vec![NodeIdx(1), NodeIdx(0)]);
        assert!(arena.is_ancestor(NodeIdx(0), NodeIdx(3)));
        assert!(!arena.is_ancestor(NodeIdx(4), NodeIdx(3)));
        assert_eq!(arena.descendant_count(NodeIdx(0)), 4);
    }
}
