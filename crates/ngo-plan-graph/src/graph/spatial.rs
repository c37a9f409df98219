//! Spatial index for pointer hit testing
//!
//! A parent registers two targets: its glyph (toggles expansion) and its
//! label block (selects). A leaf registers one selecting block. All targets
//! live in an R-tree (`rstar`) built in screen space every frame the scene
//! moves.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use super::arena::NodeKey;

/// Which part of a node the pointer is over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitPart {
    /// The circle glyph: toggles expansion
    Expander,
    /// The label block: selects
    Body,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum HitShape {
    Circle { center: [f32; 2], radius: f32 },
    Rect { min: [f32; 2], max: [f32; 2] },
}

#[derive(Debug, Clone)]
pub struct SpatialNode {
    pub key: NodeKey,
    pub part: HitPart,
    shape: HitShape,
    bounds: AABB<[f32; 2]>,
}

impl SpatialNode {
    pub fn circle(key: NodeKey, center: [f32; 2], radius: f32) -> Self {
        let bounds = AABB::from_corners(
            [center[0] - radius, center[1] - radius],
            [center[0] + radius, center[1] + radius],
        );
        Self {
            key,
            part: HitPart::Expander,
            shape: HitShape::Circle { center, radius },
            bounds,
        }
    }

    pub fn rect(key: NodeKey, min: [f32; 2], max: [f32; 2]) -> Self {
        Self {
            key,
            part: HitPart::Body,
            shape: HitShape::Rect { min, max },
            bounds: AABB::from_corners(min, max),
        }
    }

    /// Distance from `point` to the shape's edge, zero inside
    fn distance(&self, point: [f32; 2]) -> f32 {
        match self.shape {
            HitShape::Circle { center, radius } => {
                let dx = point[0] - center[0];
                let dy = point[1] - center[1];
                ((dx * dx + dy * dy).sqrt() - radius).max(0.0)
            }
            HitShape::Rect { min, max } => {
                let dx = (min[0] - point[0]).max(point[0] - max[0]).max(0.0);
                let dy = (min[1] - point[1]).max(point[1] - max[1]).max(0.0);
                (dx * dx + dy * dy).sqrt()
            }
        }
    }
}

impl RTreeObject for SpatialNode {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.bounds
    }
}

impl PointDistance for SpatialNode {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let d = self.distance(*point);
        d * d
    }

    fn contains_point(&self, point: &[f32; 2]) -> bool {
        self.distance(*point) <= 0.0
    }
}

#[derive(Clone, Default)]
pub struct SpatialIndex {
    tree: RTree<SpatialNode>,
    count: usize,
}

impl std::fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("count", &self.count)
            .finish_non_exhaustive()
    }
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rebuild(&mut self, nodes: impl Iterator<Item = SpatialNode>) {
        let nodes: Vec<_> = nodes.collect();
        self.count = nodes.len();
        self.tree = RTree::bulk_load(nodes);
    }

    pub fn clear(&mut self) {
        self.tree = RTree::new();
        self.count = 0;
    }

    /// Closest target within `threshold` of `point`. Expanders win ties
    /// against overlapping label blocks.
    pub fn hit_test(&self, point: [f32; 2], threshold: f32) -> Option<&SpatialNode> {
        let search = AABB::from_corners(
            [point[0] - threshold, point[1] - threshold],
            [point[0] + threshold, point[1] + threshold],
        );
        self.tree
            .locate_in_envelope_intersecting(&search)
            .map(|node| (node, node.distance(point)))
            .filter(|(_, d)| *d <= threshold)
            .min_by(|(a, da), (b, db)| {
                da.total_cmp(db)
                    .then_with(|| part_rank(a.part).cmp(&part_rank(b.part)))
            })
            .map(|(node, _)| node)
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

fn part_rank(part: HitPart) -> u8 {
    match part {
        HitPart::Expander => 0,
        HitPart::Body => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> NodeKey {
        NodeKey::Code(s.to_string())
    }

    #[test]
    fn test_empty_index_misses() {
        let index = SpatialIndex::new();
        assert!(index.is_empty());
        assert!(index.hit_test([0.0, 0.0], 10.0).is_none());
    }

    #[test]
    fn test_circle_and_label_parts() {
        let mut index = SpatialIndex::new();
        index.rebuild(
            vec![
                SpatialNode::circle(key("A"), [100.0, 100.0], 6.0),
                SpatialNode::rect(key("A"), [110.0, 92.0], [200.0, 108.0]),
            ]
            .into_iter(),
        );
        assert_eq!(index.len(), 2);

        let glyph = index.hit_test([101.0, 100.0], 4.0).unwrap();
        assert_eq!(glyph.part, HitPart::Expander);

        let label = index.hit_test([150.0, 100.0], 4.0).unwrap();
        assert_eq!(label.part, HitPart::Body);
        assert_eq!(label.key, key("A"));

        assert!(index.hit_test([300.0, 300.0], 4.0).is_none());
    }

    #[test]
    fn test_closest_node_wins() {
        let mut index = SpatialIndex::new();
        index.rebuild(
            vec![
                SpatialNode::circle(key("a"), [0.0, 0.0], 6.0),
                SpatialNode::circle(key("b"), [0.0, 35.0], 6.0),
            ]
            .into_iter(),
        );
        assert_eq!(index.hit_test([0.0, 30.0], 8.0).unwrap().key, key("b"));
        assert_eq!(index.hit_test([0.0, 4.0], 8.0).unwrap().key, key("a"));
    }

    #[test]
    fn test_padding_extends_reach() {
        let mut index = SpatialIndex::new();
        index.rebuild(std::iter::once(SpatialNode::circle(key("a"), [0.0, 0.0], 6.0)));
        assert!(index.hit_test([10.0, 0.0], 2.0).is_none());
        assert!(index.hit_test([10.0, 0.0], 6.0).is_some());
    }

    #[test]
    fn test_expander_wins_overlap() {
        let mut index = SpatialIndex::new();
        index.rebuild(
            vec![
                SpatialNode::rect(key("a"), [-20.0, -8.0], [20.0, 8.0]),
                SpatialNode::circle(key("a"), [0.0, 0.0], 6.0),
            ]
            .into_iter(),
        );
        assert_eq!(index.hit_test([0.0, 0.0], 1.0).unwrap().part, HitPart::Expander);
    }
}
