//! Property tests over randomly shaped hierarchies

use std::collections::HashSet;

use ngo_plan_graph::graph::{
    DependencyIndex, ExpansionState, NodeIdx, TreeArena, TreeLayoutEngine, CRITICAL_THRESHOLD,
};
use ngo_plan_types::{HierarchyNode, NodeType};
use proptest::prelude::*;

/// One generated node: parent pick, whether it has a code, dependency picks
type NodeSpec = (usize, bool, Vec<usize>);

fn build_tree(specs: &[NodeSpec]) -> HierarchyNode {
    let n = specs.len();
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (i, (parent, _, _)) in specs.iter().enumerate().skip(1) {
        children[parent % i].push(i);
    }

    fn build(i: usize, specs: &[NodeSpec], children: &[Vec<usize>]) -> HierarchyNode {
        let (_, has_code, deps) = &specs[i];
        let mut node = HierarchyNode::new(format!("N{}", i), NodeType::Module);
        if *has_code {
            node = node.with_code(format!("C{}", i));
        }
        for d in deps {
            // indices past the node count never resolve
            node = node.with_dependency(format!("C{}", d));
        }
        for &c in &children[i] {
            node = node.with_child(build(c, specs, children));
        }
        node
    }

    build(0, specs, &children)
}

fn tree_strategy() -> impl Strategy<Value = HierarchyNode> {
    (1usize..40).prop_flat_map(|n| {
        prop::collection::vec(
            (
                any::<usize>(),
                prop::bool::weighted(0.8),
                prop::collection::vec(0..n + 3, 0..4),
            ),
            n,
        )
        .prop_map(|specs| build_tree(&specs))
    })
}

fn engine() -> TreeLayoutEngine {
    TreeLayoutEngine::new(35.0, 250.0)
}

/// Nodes whose strict ancestors are all expanded
fn brute_visible(arena: &TreeArena, expansion: &ExpansionState) -> HashSet<NodeIdx> {
    arena
        .iter()
        .map(|(idx, _)| idx)
        .filter(|&idx| arena.ancestors(idx).all(|a| expansion.is_expanded(arena.key(a))))
        .collect()
}

fn random_expansion(arena: &TreeArena, picks: &[usize]) -> ExpansionState {
    let mut expansion = ExpansionState::default();
    for p in picks {
        let idx = NodeIdx(p % arena.len());
        expansion.toggle(arena, idx);
    }
    expansion
}

proptest! {
    #[test]
    fn dependent_count_matches_brute_force(root in tree_strategy()) {
        let arena = TreeArena::build(&root);
        let index = DependencyIndex::build(&arena);

        for (idx, node) in arena.iter() {
            let expected = match node.code() {
                Some(code) => arena
                    .iter()
                    .filter(|(_, m)| m.node.dependencies.iter().any(|d| d == code))
                    .count(),
                None => 0,
            };
            prop_assert_eq!(index.dependent_count(idx), expected);
            prop_assert_eq!(index.is_critical(idx), expected >= CRITICAL_THRESHOLD);
        }
    }

    #[test]
    fn lookup_covers_every_code(root in tree_strategy()) {
        let arena = TreeArena::build(&root);
        let index = DependencyIndex::build(&arena);
        let codes: HashSet<&str> = arena.iter().filter_map(|(_, n)| n.code()).collect();
        prop_assert_eq!(index.code_count(), codes.len());
        for code in codes {
            let idx = index.lookup(code);
            prop_assert!(idx.is_some());
            prop_assert_eq!(idx.and_then(|i| arena.node(i).code()), Some(code));
        }
    }

    #[test]
    fn double_toggle_restores_visible_set(
        root in tree_strategy(),
        picks in prop::collection::vec(any::<usize>(), 0..10),
        target in any::<usize>(),
    ) {
        let arena = TreeArena::build(&root);
        let mut expansion = random_expansion(&arena, &picks);
        let before = expansion.visible_nodes(&arena);
        let idx = NodeIdx(target % arena.len());
        expansion.toggle(&arena, idx);
        expansion.toggle(&arena, idx);
        prop_assert_eq!(expansion.visible_nodes(&arena), before);
    }

    #[test]
    fn visible_set_is_nodes_with_expanded_ancestors(
        root in tree_strategy(),
        picks in prop::collection::vec(any::<usize>(), 0..10),
    ) {
        let arena = TreeArena::build(&root);
        let index = DependencyIndex::build(&arena);
        let expansion = random_expansion(&arena, &picks);
        let expected = brute_visible(&arena, &expansion);

        let frame = engine().compute(&arena, &index, &expansion, false);
        let laid_out: HashSet<NodeIdx> = frame.nodes.iter().map(|n| n.idx).collect();
        prop_assert_eq!(laid_out.len(), frame.nodes.len());
        prop_assert!(laid_out.contains(&arena.root()));
        prop_assert_eq!(laid_out, expected);
    }

    #[test]
    fn dependency_edges_are_visible_pairs(
        root in tree_strategy(),
        picks in prop::collection::vec(any::<usize>(), 0..10),
    ) {
        let arena = TreeArena::build(&root);
        let index = DependencyIndex::build(&arena);
        let expansion = random_expansion(&arena, &picks);
        let visible = brute_visible(&arena, &expansion);

        let mut expected: HashSet<(NodeIdx, NodeIdx)> = HashSet::new();
        for &a in &visible {
            for &b in &visible {
                if let Some(code) = arena.node(b).code() {
                    if arena.node(a).node.dependencies.iter().any(|d| d == code) {
                        expected.insert((a, b));
                    }
                }
            }
        }

        let frame = engine().compute(&arena, &index, &expansion, true);
        let edges: HashSet<(NodeIdx, NodeIdx)> =
            frame.dependency_edges.iter().map(|e| (e.source, e.target)).collect();
        prop_assert_eq!(edges.len(), frame.dependency_edges.len());
        prop_assert_eq!(edges, expected);

        let off = engine().compute(&arena, &index, &expansion, false);
        prop_assert!(off.dependency_edges.is_empty());
    }

    #[test]
    fn siblings_never_overlap(root in tree_strategy()) {
        let arena = TreeArena::build(&root);
        let index = DependencyIndex::build(&arena);
        let expansion = ExpansionState::initial(&arena, usize::MAX);
        let frame = engine().compute(&arena, &index, &expansion, false);

        for (idx, _) in arena.iter() {
            let ys: Vec<f32> = arena
                .children(idx)
                .iter()
                .filter_map(|c| frame.position(arena.key(*c)).map(|p| p.y))
                .collect();
            for pair in ys.windows(2) {
                prop_assert!(pair[1] - pair[0] >= 35.0 - 1e-3);
            }
        }
    }
}
