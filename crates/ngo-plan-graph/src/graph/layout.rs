//! Collapsible tree layout
//!
//! Turns the arena plus the expansion state into positioned geometry:
//! depth runs along x (`depth * depth_spacing`), siblings are packed along y
//! in declared order. Packing works on subtree contours: each child subtree
//! is pushed down until, at every depth they share, it clears everything
//! placed before it, and the parent is centred over its first and last child.
//! Neighbours that are not siblings are kept `cousin_separation` rows apart.

use std::collections::HashMap;

use egui::{Pos2, Rect, Vec2};

use super::arena::{NodeIdx, NodeKey, TreeArena};
use super::expansion::ExpansionState;
use super::index::{DependencyIndex, NodeAnnotation};
use crate::config::{global_config, LayoutSettings};

// =============================================================================
// LAYOUT OUTPUT
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeKind {
    /// Parent → child containment
    Tree,
    /// Dependent → dependency
    Dependency,
}

/// Identity of an edge across layouts
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    pub source: NodeKey,
    pub target: NodeKey,
    pub kind: EdgeKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub idx: NodeIdx,
    pub key: NodeKey,
    pub depth: usize,
    /// World position; x is depth, y is breadth
    pub position: Pos2,
    pub has_children: bool,
    /// Has children that the expansion state currently hides
    pub has_hidden_children: bool,
    pub annotation: NodeAnnotation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEdge {
    pub key: EdgeKey,
    pub source: NodeIdx,
    pub target: NodeIdx,
}

impl LayoutEdge {
    pub fn kind(&self) -> EdgeKind {
        self.key.kind
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// One complete layout of the visible tree
#[derive(Debug, Clone)]
pub struct LayoutFrame {
    /// Visible nodes in pre-order
    pub nodes: Vec<LayoutNode>,
    pub tree_edges: Vec<LayoutEdge>,
    /// Empty unless the dependency overlay is on
    pub dependency_edges: Vec<LayoutEdge>,
    /// World-space bounds of all node positions
    pub bounds: Rect,
    by_key: HashMap<NodeKey, usize>,
}

impl Default for LayoutFrame {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            tree_edges: Vec::new(),
            dependency_edges: Vec::new(),
            bounds: Rect::NOTHING,
            by_key: HashMap::new(),
        }
    }
}

impl LayoutFrame {
    pub fn node(&self, key: &NodeKey) -> Option<&LayoutNode> {
        self.by_key.get(key).map(|&i| &self.nodes[i])
    }

    pub fn position(&self, key: &NodeKey) -> Option<Pos2> {
        self.node(key).map(|n| n.position)
    }

    pub fn contains(&self, key: &NodeKey) -> bool {
        self.by_key.contains_key(key)
    }

    pub fn edges(&self) -> impl Iterator<Item = &LayoutEdge> {
        self.tree_edges.iter().chain(self.dependency_edges.iter())
    }
}

// =============================================================================
// ENGINE
// =============================================================================

/// Subtree placement relative to its own root
struct Placed {
    offsets: Vec<(NodeIdx, f32)>,
    /// (min, max) breadth per relative depth; level 0 is the root itself
    contour: Vec<(f32, f32)>,
}

impl Placed {
    fn shift(&mut self, by: f32) {
        for (_, y) in &mut self.offsets {
            *y += by;
        }
        for (lo, hi) in &mut self.contour {
            *lo += by;
            *hi += by;
        }
    }
}

#[derive(Debug, Clone)]
pub struct TreeLayoutEngine {
    row_spacing: f32,
    cousin_separation: f32,
    depth_spacing: f32,
}

impl Default for TreeLayoutEngine {
    fn default() -> Self {
        Self::from_settings(&global_config().layout)
    }
}

impl TreeLayoutEngine {
    pub fn new(row_spacing: f32, depth_spacing: f32) -> Self {
        Self {
            row_spacing,
            cousin_separation: 1.0,
            depth_spacing,
        }
    }

    pub fn from_settings(settings: &LayoutSettings) -> Self {
        Self {
            row_spacing: settings.row_spacing,
            cousin_separation: settings.cousin_separation.max(1.0),
            depth_spacing: settings.depth_spacing,
        }
    }

    pub fn with_cousin_separation(mut self, separation: f32) -> Self {
        self.cousin_separation = separation.max(1.0);
        self
    }

    /// Lay out the visible tree. Dependency edges are produced only when
    /// `dependency_overlay` is set, and only between visible endpoints.
    pub fn compute(
        &self,
        arena: &TreeArena,
        index: &DependencyIndex,
        expansion: &ExpansionState,
        dependency_overlay: bool,
    ) -> LayoutFrame {
        if arena.is_empty() {
            return LayoutFrame::default();
        }

        let placed = self.place(arena, expansion, arena.root());
        let breadth: HashMap<NodeIdx, f32> = placed.offsets.into_iter().collect();

        let visible = expansion.visible_nodes(arena);
        let mut nodes = Vec::with_capacity(visible.len());
        let mut by_key = HashMap::with_capacity(visible.len());
        for idx in &visible {
            let arena_node = arena.node(*idx);
            let y = breadth.get(idx).copied().unwrap_or(0.0);
            by_key.insert(arena_node.key.clone(), nodes.len());
            nodes.push(LayoutNode {
                idx: *idx,
                key: arena_node.key.clone(),
                depth: arena_node.depth,
                position: Pos2::new(arena_node.depth as f32 * self.depth_spacing, y),
                has_children: arena_node.has_children(),
                has_hidden_children: expansion.has_hidden_children(arena, *idx),
                annotation: index.annotation(*idx),
            });
        }

        let tree_edges: Vec<LayoutEdge> = visible
            .iter()
            .filter_map(|&child| {
                let parent = arena.parent(child)?;
                Some(LayoutEdge {
                    key: EdgeKey {
                        source: arena.key(parent).clone(),
                        target: arena.key(child).clone(),
                        kind: EdgeKind::Tree,
                    },
                    source: parent,
                    target: child,
                })
            })
            .collect();

        let mut dependency_edges: Vec<LayoutEdge> = Vec::new();
        if dependency_overlay {
            for &source in &visible {
                for &target in index.targets(source) {
                    if !by_key.contains_key(arena.key(target)) {
                        continue;
                    }
                    dependency_edges.push(LayoutEdge {
                        key: EdgeKey {
                            source: arena.key(source).clone(),
                            target: arena.key(target).clone(),
                            kind: EdgeKind::Dependency,
                        },
                        source,
                        target,
                    });
                }
            }
        }

        let bounds = nodes
            .iter()
            .fold(Rect::NOTHING, |acc, n| acc.union(Rect::from_center_size(n.position, Vec2::ZERO)));

        tracing::debug!(
            visible = nodes.len(),
            tree_edges = tree_edges.len(),
            dependency_edges = dependency_edges.len(),
            "Computed tree layout"
        );

        LayoutFrame {
            nodes,
            tree_edges,
            dependency_edges,
            bounds,
            by_key,
        }
    }

    fn place(&self, arena: &TreeArena, expansion: &ExpansionState, idx: NodeIdx) -> Placed {
        let children = arena.children(idx);
        if children.is_empty() || !expansion.is_expanded(arena.key(idx)) {
            return Placed {
                offsets: vec![(idx, 0.0)],
                contour: vec![(0.0, 0.0)],
            };
        }

        // First child sits at 0; `last_y` tracks where the last one landed
        let mut acc: Option<Placed> = None;
        let mut last_y = 0.0;

        for &child in children {
            let mut next = self.place(arena, expansion, child);
            match acc.as_mut() {
                None => acc = Some(next),
                Some(placed) => {
                    let shift = placed
                        .contour
                        .iter()
                        .zip(next.contour.iter())
                        .enumerate()
                        .map(|(level, (prev, new))| prev.1 - new.0 + self.gap(level))
                        .fold(f32::MIN, f32::max);
                    next.shift(shift);
                    last_y = shift;

                    for (level, (lo, hi)) in next.contour.iter().enumerate() {
                        match placed.contour.get_mut(level) {
                            Some(existing) => {
                                existing.0 = existing.0.min(*lo);
                                existing.1 = existing.1.max(*hi);
                            }
                            None => placed.contour.push((*lo, *hi)),
                        }
                    }
                    placed.offsets.extend(next.offsets);
                }
            }
        }

        let Some(mut placed) = acc else {
            return Placed {
                offsets: vec![(idx, 0.0)],
                contour: vec![(0.0, 0.0)],
            };
        };

        placed.shift(-last_y / 2.0);
        let mut offsets = Vec::with_capacity(placed.offsets.len() + 1);
        offsets.push((idx, 0.0));
        offsets.extend(placed.offsets);
        let mut contour = Vec::with_capacity(placed.contour.len() + 1);
        contour.push((0.0, 0.0));
        contour.extend(placed.contour);

        Placed { offsets, contour }
    }

    /// Minimum breadth between neighbouring subtrees at a relative level
    fn gap(&self, level: usize) -> f32 {
        if level == 0 {
            self.row_spacing
        } else {
            self.row_spacing * self.cousin_separation
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ngo_plan_types::{HierarchyNode, NodeType};
    use pretty_assertions::assert_eq;

    fn leaf(name: &str, code: &str) -> HierarchyNode {
        HierarchyNode::new(name, NodeType::Component).with_code(code)
    }

    fn engine() -> TreeLayoutEngine {
        TreeLayoutEngine::new(35.0, 250.0)
    }

    fn setup(root: &HierarchyNode, depth: usize) -> (TreeArena, DependencyIndex, ExpansionState) {
        let arena = TreeArena::build(root);
        let index = DependencyIndex::build(&arena);
        let expansion = ExpansionState::initial(&arena, depth);
        (arena, index, expansion)
    }

    #[test]
    fn test_empty_frame_has_no_bounds() {
        let frame = LayoutFrame::default();
        assert!(frame.nodes.is_empty());
        assert!(frame.edges().next().is_none());
        assert_eq!(frame.bounds, Rect::NOTHING);
        assert!(!frame.contains(&NodeKey::Code("A".into())));
    }

    #[test]
    fn test_siblings_spaced_in_declared_order() {
        let root = HierarchyNode::new("Root", NodeType::Platform)
            .with_child(leaf("A", "A"))
            .with_child(leaf("B", "B"))
            .with_child(leaf("C", "C"));
        let (arena, index, expansion) = setup(&root, 1);
        let frame = engine().compute(&arena, &index, &expansion, false);

        let ys: Vec<f32> = ["A", "B", "C"]
            .iter()
            .map(|c| frame.position(&NodeKey::Code(c.to_string())).unwrap().y)
            .collect();
        assert_eq!(ys, vec![-35.0, 0.0, 35.0]);
        assert_eq!(frame.nodes[0].position, Pos2::new(0.0, 0.0));
        assert_eq!(frame.position(&NodeKey::Code("A".into())).unwrap().x, 250.0);
        assert_eq!(frame.tree_edges.len(), 3);
    }

    #[test]
    fn test_collapsed_node_hides_descendants_but_flags_them() {
        let root = HierarchyNode::new("Root", NodeType::Platform).with_child(
            HierarchyNode::new("Domain", NodeType::Domain)
                .with_code("D")
                .with_child(HierarchyNode::new("Module", NodeType::Module).with_code("M").with_child(leaf("C", "C"))),
        );
        let (arena, index, expansion) = setup(&root, 2);
        let frame = engine().compute(&arena, &index, &expansion, false);

        assert_eq!(frame.nodes.len(), 3);
        let module = frame.node(&NodeKey::Code("M".into())).unwrap();
        assert!(module.has_hidden_children);
        assert!(!frame.contains(&NodeKey::Code("C".into())));
    }

    #[test]
    fn test_subtrees_do_not_overlap_at_any_depth() {
        let wide = |p: &str| {
            HierarchyNode::new(p, NodeType::Module)
                .with_code(p)
                .with_child(leaf("x", &format!("{p}.1")))
                .with_child(leaf("y", &format!("{p}.2")))
                .with_child(leaf("z", &format!("{p}.3")))
        };
        let root = HierarchyNode::new("Root", NodeType::Platform)
            .with_child(wide("A"))
            .with_child(wide("B"));
        let (arena, index, expansion) = setup(&root, 3);
        let frame = engine().compute(&arena, &index, &expansion, false);

        let mut depth2: Vec<f32> = frame.nodes.iter().filter(|n| n.depth == 2).map(|n| n.position.y).collect();
        depth2.sort_by(|a, b| a.partial_cmp(b).unwrap());
        for pair in depth2.windows(2) {
            assert!(pair[1] - pair[0] >= 35.0 - 1e-3);
        }
        let a = frame.position(&NodeKey::Code("A".into())).unwrap().y;
        let b = frame.position(&NodeKey::Code("B".into())).unwrap().y;
        assert!(a < b);
        // parent centred over its children
        let a1 = frame.position(&NodeKey::Code("A.1".into())).unwrap().y;
        let a3 = frame.position(&NodeKey::Code("A.3".into())).unwrap().y;
        assert!((a - (a1 + a3) / 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_cousins_get_wider_gap() {
        let pair = |p: &str| {
            HierarchyNode::new(p, NodeType::Module)
                .with_code(p)
                .with_child(leaf("x", &format!("{p}.1")))
        };
        let root = HierarchyNode::new("Root", NodeType::Platform)
            .with_child(pair("A"))
            .with_child(pair("B"));
        let (arena, index, expansion) = setup(&root, 3);
        let frame = engine()
            .with_cousin_separation(2.0)
            .compute(&arena, &index, &expansion, false);
        let a1 = frame.position(&NodeKey::Code("A.1".into())).unwrap().y;
        let b1 = frame.position(&NodeKey::Code("B.1".into())).unwrap().y;
        assert_eq!(b1 - a1, 70.0);
    }

    #[test]
    fn test_dependency_edges_only_between_visible_nodes() {
        let root = HierarchyNode::new("Root", NodeType::Platform)
            .with_child(leaf("A", "X"))
            .with_child(leaf("B", "Y").with_dependency("X"))
            .with_child(
                HierarchyNode::new("Hidden parent", NodeType::Module)
                    .with_code("H")
                    .with_child(leaf("Deep", "Z").with_dependency("X")),
            );
        let (arena, index, expansion) = setup(&root, 1);

        let off = engine().compute(&arena, &index, &expansion, false);
        assert!(off.dependency_edges.is_empty());

        let on = engine().compute(&arena, &index, &expansion, true);
        assert_eq!(on.dependency_edges.len(), 1);
        let edge = &on.dependency_edges[0];
        assert_eq!(edge.key.source, NodeKey::Code("Y".into()));
        assert_eq!(edge.key.target, NodeKey::Code("X".into()));
        assert_eq!(edge.kind(), EdgeKind::Dependency);
    }

    #[test]
    fn test_self_loop_edge_is_kept() {
        let root = HierarchyNode::new("Root", NodeType::Platform).with_child(leaf("L", "L").with_dependency("L"));
        let (arena, index, expansion) = setup(&root, 1);
        let frame = engine().compute(&arena, &index, &expansion, true);
        assert_eq!(frame.dependency_edges.len(), 1);
        assert!(frame.dependency_edges[0].is_self_loop());
    }

    #[test]
    fn test_identical_uncoded_siblings_keep_declared_order() {
        let root = HierarchyNode::new("Root", NodeType::Platform)
            .with_child(HierarchyNode::new("Twin", NodeType::Component).with_description("first"))
            .with_child(HierarchyNode::new("Twin", NodeType::Component).with_description("second"));
        let (arena, index, expansion) = setup(&root, 1);
        let frame = engine().compute(&arena, &index, &expansion, false);
        let first = &frame.nodes[1];
        let second = &frame.nodes[2];
        assert_eq!(arena.node(first.idx).node.description.as_deref(), Some("first"));
        assert!(first.position.y < second.position.y);
    }
}
