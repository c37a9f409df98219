//! Rendering - draws the animated scene with egui::Painter
//!
//! World positions are transformed by the camera; sizes scale with zoom.
//! Painting order is containment edges, dependency edges, glyphs, labels,
//! badges. The renderer returns the hit targets it drew so the spatial index
//! always matches what is on screen.

use egui::{Align, Align2, Color32, FontId, Pos2, Rect, Stroke, Vec2};

use super::animation::{AnimatedEdge, AnimatedNode, AnimatedScene};
use super::arena::{NodeKey, TreeArena};
use super::camera::Camera2D;
use super::colors;
use super::edges::{
    paint_arrow_head, paint_dashed, paint_polyline, self_loop_points, EdgeCurve, TreeDiagonal,
};
use super::layout::EdgeKind;
use super::spatial::SpatialNode;
use crate::config::{global_config, EdgeSettings, GraphSettings, LayoutSettings};

// =============================================================================
// RENDER CONSTANTS
// =============================================================================

const LABEL_OFFSET: f32 = 13.0;
const LABEL_SIZE: f32 = 12.0;
const ROOT_LABEL_SIZE: f32 = 16.0;
const CODE_SIZE: f32 = 9.0;
const BADGE_OFFSET: f32 = 12.0;
const BADGE_RADIUS: f32 = 8.0;
const BADGE_TEXT_SIZE: f32 = 9.0;
const HIGHLIGHT_RING_GAP: f32 = 6.0;
const SELECTION_RING_GAP: f32 = 3.5;

/// Below this on-screen font size labels are skipped
const MIN_LABEL_PX: f32 = 4.0;
/// Smallest on-screen extent of a label hit block
const MIN_BODY_PX: f32 = 8.0;

/// Which side of the glyph a label sits on. Nodes that have children
/// (shown or collapsed) label to the left so the subtree has room on the
/// right; leaves label to the right.
pub fn label_side(has_children: bool) -> (f32, Align2) {
    if has_children {
        (-LABEL_OFFSET, Align2::RIGHT_CENTER)
    } else {
        (LABEL_OFFSET, Align2::LEFT_CENTER)
    }
}

/// Where a label would sit when it is too small to paint. Keeps the node
/// selectable when zoomed far out.
pub fn estimated_label_rect(center: Pos2, has_children: bool, zoom: f32, name_chars: usize) -> Rect {
    let size = LABEL_SIZE * zoom;
    let extent = Vec2::new(
        (name_chars as f32 * size * 0.55).max(MIN_BODY_PX),
        (size * 1.2).max(MIN_BODY_PX),
    );
    let (offset, align) = label_side(has_children);
    align.anchor_size(center + Vec2::new(offset * zoom, 0.0), extent)
}

/// Hit targets for one node. A parent's glyph toggles and its label
/// selects; a leaf has nothing to toggle, so glyph and label both select.
pub fn node_hit_targets(
    key: &NodeKey,
    center: Pos2,
    radius: f32,
    has_children: bool,
    label: Rect,
) -> Vec<SpatialNode> {
    let body = |rect: Rect| SpatialNode::rect(key.clone(), [rect.min.x, rect.min.y], [rect.max.x, rect.max.y]);
    if has_children {
        vec![SpatialNode::circle(key.clone(), [center.x, center.y], radius), body(label)]
    } else {
        let glyph = Rect::from_center_size(center, Vec2::splat(radius * 2.0));
        vec![body(label.union(glyph))]
    }
}

/// Badge text; `None` when nothing depends on the node
pub fn badge_text(dependent_count: usize) -> Option<String> {
    (dependent_count > 0).then(|| dependent_count.to_string())
}

// =============================================================================
// LEGEND
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendSwatch {
    StandardNode,
    CriticalNode,
    DependencyLink,
}

/// Legend rows. The dependency link entry only shows with the overlay on.
pub fn legend_entries(dependency_overlay: bool) -> Vec<(&'static str, LegendSwatch)> {
    let mut entries = vec![
        ("Standard Node", LegendSwatch::StandardNode),
        ("Critical (2+ Dependents)", LegendSwatch::CriticalNode),
    ];
    if dependency_overlay {
        entries.push(("Dependency Link", LegendSwatch::DependencyLink));
    }
    entries
}

pub fn paint_legend(painter: &egui::Painter, origin: Pos2, dependency_overlay: bool) {
    let entries = legend_entries(dependency_overlay);
    let row_height = 20.0;
    let size = Vec2::new(190.0, 12.0 + row_height * entries.len() as f32);
    let frame = Rect::from_min_size(origin, size);
    painter.rect(
        frame,
        6.0,
        Color32::from_white_alpha(235),
        Stroke::new(1.0, colors::TREE_EDGE),
    );

    for (i, (label, swatch)) in entries.into_iter().enumerate() {
        let y = origin.y + 6.0 + row_height * (i as f32 + 0.5);
        let swatch_center = Pos2::new(origin.x + 18.0, y);
        match swatch {
            LegendSwatch::StandardNode => {
                painter.circle(swatch_center, 6.0, Color32::WHITE, Stroke::new(2.0, colors::STANDARD));
            }
            LegendSwatch::CriticalNode => {
                painter.circle(swatch_center, 8.0, Color32::WHITE, Stroke::new(3.0, colors::CRITICAL));
            }
            LegendSwatch::DependencyLink => {
                let from = swatch_center - Vec2::new(10.0, 0.0);
                let to = swatch_center + Vec2::new(10.0, 0.0);
                let color = colors::faded(colors::DEPENDENCY_EDGE, colors::DEPENDENCY_OPACITY);
                paint_dashed(painter, &[from, to], Stroke::new(2.0, color), 6.0, 4.0);
            }
        }
        painter.text(
            Pos2::new(origin.x + 36.0, y),
            Align2::LEFT_CENTER,
            label,
            FontId::proportional(12.0),
            colors::LABEL,
        );
    }
}

// =============================================================================
// GRAPH RENDERER
// =============================================================================

/// Per-frame view state the renderer reads
#[derive(Debug, Clone, Copy)]
pub struct SceneView<'a> {
    pub camera: &'a Camera2D,
    pub screen_rect: Rect,
    pub root: Option<&'a NodeKey>,
    pub selected: Option<&'a NodeKey>,
    pub highlighted: Option<&'a NodeKey>,
    pub hovered: Option<&'a NodeKey>,
}

impl SceneView<'_> {
    fn to_screen(&self, world: Pos2) -> Pos2 {
        self.camera.world_to_screen(world, self.screen_rect)
    }

    fn zoom(&self) -> f32 {
        self.camera.zoom()
    }
}

#[derive(Debug, Clone)]
pub struct GraphRenderer {
    layout: LayoutSettings,
    edges: EdgeSettings,
}

impl Default for GraphRenderer {
    fn default() -> Self {
        Self::from_settings(global_config())
    }
}

impl GraphRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_settings(settings: &GraphSettings) -> Self {
        Self {
            layout: settings.layout.clone(),
            edges: settings.edges.clone(),
        }
    }

    /// Glyph radius in world units
    pub fn node_radius(&self, is_critical: bool) -> f32 {
        if is_critical {
            self.layout.critical_node_radius
        } else {
            self.layout.node_radius
        }
    }

    /// Paint the whole scene. Returns the hit targets of every node that is
    /// not on its way out.
    pub fn render(
        &self,
        painter: &egui::Painter,
        view: &SceneView<'_>,
        scene: &AnimatedScene,
        arena: &TreeArena,
    ) -> Vec<SpatialNode> {
        for edge in scene.edges().filter(|e| e.edge.kind() == EdgeKind::Tree) {
            self.paint_tree_edge(painter, view, scene, edge);
        }
        for edge in scene.edges().filter(|e| e.edge.kind() == EdgeKind::Dependency) {
            self.paint_dependency_edge(painter, view, scene, edge);
        }

        let mut targets = Vec::with_capacity(scene.len() * 2);
        for node in scene.nodes() {
            self.paint_node(painter, view, node, arena, &mut targets);
        }
        targets
    }

    fn paint_tree_edge(
        &self,
        painter: &egui::Painter,
        view: &SceneView<'_>,
        scene: &AnimatedScene,
        edge: &AnimatedEdge,
    ) {
        let (Some(source), Some(target)) = (
            scene.position(&edge.edge.key.source),
            scene.position(&edge.edge.key.target),
        ) else {
            return;
        };
        let diagonal = TreeDiagonal::new(view.to_screen(source), view.to_screen(target));
        let stroke = Stroke::new(
            self.edges.tree_stroke_width * view.zoom(),
            colors::faded(colors::TREE_EDGE, edge.presence()),
        );
        paint_polyline(painter, diagonal.points(), stroke);
    }

    fn paint_dependency_edge(
        &self,
        painter: &egui::Painter,
        view: &SceneView<'_>,
        scene: &AnimatedScene,
        edge: &AnimatedEdge,
    ) {
        let (Some(source), Some(target)) = (
            scene.node(&edge.edge.key.source),
            scene.node(&edge.edge.key.target),
        ) else {
            return;
        };
        let zoom = view.zoom();
        let color = colors::faded(
            colors::DEPENDENCY_EDGE,
            colors::DEPENDENCY_OPACITY * edge.presence(),
        );
        let stroke = Stroke::new(self.edges.dependency_stroke_width * zoom, color);
        let target_radius = self.node_radius(target.layout.annotation.is_critical) * zoom;
        let from = view.to_screen(source.position());
        let to = view.to_screen(target.position());

        let (points, direction) = if edge.edge.is_self_loop() {
            self_loop_points(to, target_radius * 2.5)
        } else {
            let curve = EdgeCurve::dependency(from, to, self.edges.dependency_curve_offset * zoom);
            (curve.points(), curve.end_direction())
        };

        paint_dashed(
            painter,
            &points,
            stroke,
            self.edges.dash_length * zoom,
            self.edges.gap_length * zoom,
        );
        let tip = match points.last() {
            Some(&end) if !edge.edge.is_self_loop() => end - direction * (target_radius + stroke.width),
            Some(&end) => end,
            None => to,
        };
        paint_arrow_head(painter, tip, direction, self.edges.arrow_size * zoom, color);
    }

    fn paint_node(
        &self,
        painter: &egui::Painter,
        view: &SceneView<'_>,
        node: &AnimatedNode,
        arena: &TreeArena,
        targets: &mut Vec<SpatialNode>,
    ) {
        let layout = &node.layout;
        let key = &layout.key;
        let presence = node.presence();
        if presence <= 0.0 {
            return;
        }
        let zoom = view.zoom();
        let center = view.to_screen(node.position());
        let critical = layout.annotation.is_critical;
        let hovered = view.hovered == Some(key);
        let mut radius = self.node_radius(critical) * zoom * presence;
        if hovered {
            radius += zoom;
        }

        if view.highlighted == Some(key) {
            painter.circle(
                center,
                radius + HIGHLIGHT_RING_GAP * zoom,
                colors::faded(colors::HIGHLIGHT_RING, 0.35 * presence),
                Stroke::new(2.5 * zoom, colors::faded(colors::HIGHLIGHT_RING, presence)),
            );
        }
        if view.selected == Some(key) {
            painter.circle_stroke(
                center,
                radius + SELECTION_RING_GAP * zoom,
                Stroke::new(2.0 * zoom, colors::faded(colors::SELECTION_RING, presence)),
            );
        }

        let stroke_width = if critical { 3.0 } else { 2.0 } * zoom;
        painter.circle(
            center,
            radius,
            colors::faded(colors::node_fill(critical, layout.has_hidden_children), presence),
            Stroke::new(stroke_width, colors::faded(colors::node_stroke(critical), presence)),
        );

        let label_rect = self.paint_label(painter, view, node, arena, center, presence);

        if let Some(text) = badge_text(layout.annotation.dependent_count) {
            let badge_center = center - Vec2::new(0.0, BADGE_OFFSET * zoom);
            painter.circle_filled(
                badge_center,
                BADGE_RADIUS * zoom * presence,
                colors::faded(colors::badge_color(critical), presence),
            );
            if BADGE_TEXT_SIZE * zoom >= MIN_LABEL_PX {
                painter.text(
                    badge_center,
                    Align2::CENTER_CENTER,
                    text,
                    FontId::proportional(BADGE_TEXT_SIZE * zoom),
                    colors::faded(Color32::WHITE, presence),
                );
            }
        }

        if node.is_exiting() {
            return;
        }
        let label = label_rect.unwrap_or_else(|| {
            let chars = arena.get(layout.idx).map_or(0, |n| n.name().chars().count());
            estimated_label_rect(center, layout.has_children, zoom, chars)
        });
        targets.extend(node_hit_targets(key, center, radius, layout.has_children, label));
    }

    /// Name, and the code beneath it. Returns the block's screen rect.
    fn paint_label(
        &self,
        painter: &egui::Painter,
        view: &SceneView<'_>,
        node: &AnimatedNode,
        arena: &TreeArena,
        center: Pos2,
        presence: f32,
    ) -> Option<Rect> {
        let zoom = view.zoom();
        let layout = &node.layout;
        let is_root = view.root == Some(&layout.key);
        let size = if is_root { ROOT_LABEL_SIZE } else { LABEL_SIZE } * zoom;
        if size < MIN_LABEL_PX {
            return None;
        }

        let arena_node = arena.get(layout.idx)?;
        let color = if is_root {
            colors::faded(Color32::from_rgb(15, 23, 42), presence)
        } else {
            colors::faded(colors::label_color(layout.annotation.is_critical), presence)
        };
        let (offset, align) = label_side(layout.has_children);
        let anchor = center + Vec2::new(offset * zoom, 0.0);

        let galley = painter.layout_no_wrap(arena_node.name().to_string(), FontId::proportional(size), color);
        let name_rect = align.anchor_size(anchor, galley.size());
        painter.galley(name_rect.min, galley, color);
        if is_root {
            // faux bold
            let galley = painter.layout_no_wrap(arena_node.name().to_string(), FontId::proportional(size), color);
            painter.galley(name_rect.min + Vec2::new(0.6 * zoom, 0.0), galley, color);
        }

        let mut block = name_rect;
        if let Some(code) = arena_node.code() {
            let code_size = CODE_SIZE * zoom;
            if code_size >= MIN_LABEL_PX {
                let code_color = colors::faded(colors::CODE_TEXT, presence);
                let galley = painter.layout_no_wrap(code.to_string(), FontId::monospace(code_size), code_color);
                let code_align = Align2([align.x(), Align::TOP]);
                let code_rect = code_align.anchor_size(Pos2::new(anchor.x, name_rect.bottom()), galley.size());
                painter.galley(code_rect.min, galley, code_color);
                block = block.union(code_rect);
            }
        }
        Some(block.expand(2.0))
    }
}

/// Stats, zoom and hints drawn over the canvas
pub fn paint_chrome(
    painter: &egui::Painter,
    screen_rect: Rect,
    visible: usize,
    total: usize,
    zoom: f32,
) {
    painter.text(
        screen_rect.left_top() + Vec2::new(10.0, 10.0),
        Align2::LEFT_TOP,
        format!("{} of {} nodes visible", visible, total),
        FontId::proportional(12.0),
        colors::CODE_TEXT,
    );
    painter.text(
        screen_rect.left_bottom() + Vec2::new(10.0, -30.0),
        Align2::LEFT_BOTTOM,
        format!("Zoom: {:.0}%", zoom * 100.0),
        FontId::proportional(11.0),
        colors::CODE_TEXT,
    );
    painter.text(
        screen_rect.left_bottom() + Vec2::new(10.0, -10.0),
        Align2::LEFT_BOTTOM,
        "Circle: Expand | Label: Details | Drag: Pan | Scroll: Zoom | F: Fit | R: Reset | Esc: Close",
        FontId::proportional(10.0),
        colors::CODE_TEXT,
    );
}
