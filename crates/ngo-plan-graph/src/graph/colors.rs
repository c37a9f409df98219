//! Color palette for the hierarchy explorer
//!
//! Slate neutrals for structure, blue for standard nodes, red for critical
//! nodes, amber for dependency links and badges.

use egui::Color32;
use ngo_plan_types::{HttpMethod, NodeType};

// =============================================================================
// NODE COLORS
// =============================================================================

pub const STANDARD: Color32 = Color32::from_rgb(59, 130, 246); // #3b82f6
pub const CRITICAL: Color32 = Color32::from_rgb(239, 68, 68); // #ef4444
pub const HOLLOW_FILL: Color32 = Color32::WHITE;

pub const LABEL: Color32 = Color32::from_rgb(51, 65, 85); // #334155
pub const LABEL_CRITICAL: Color32 = Color32::from_rgb(185, 28, 28); // #b91c1c
pub const CODE_TEXT: Color32 = Color32::from_rgb(148, 163, 184); // #94a3b8

pub const HIGHLIGHT_RING: Color32 = Color32::from_rgb(250, 204, 21); // #facc15
pub const SELECTION_RING: Color32 = Color32::from_rgb(99, 102, 241); // #6366f1

/// Glyph stroke: red for critical nodes
pub fn node_stroke(is_critical: bool) -> Color32 {
    if is_critical {
        CRITICAL
    } else {
        STANDARD
    }
}

/// Glyph fill: solid when children are collapsed away, hollow otherwise
pub fn node_fill(is_critical: bool, has_hidden_children: bool) -> Color32 {
    if has_hidden_children {
        node_stroke(is_critical)
    } else {
        HOLLOW_FILL
    }
}

pub fn label_color(is_critical: bool) -> Color32 {
    if is_critical {
        LABEL_CRITICAL
    } else {
        LABEL
    }
}

// =============================================================================
// EDGE COLORS
// =============================================================================

pub const TREE_EDGE: Color32 = Color32::from_rgb(203, 213, 225); // #cbd5e1
pub const DEPENDENCY_EDGE: Color32 = Color32::from_rgb(245, 158, 11); // #f59e0b

/// Dependency links are drawn at 80% opacity
pub const DEPENDENCY_OPACITY: f32 = 0.8;

// =============================================================================
// BADGES
// =============================================================================

pub const BADGE_CRITICAL: Color32 = CRITICAL;
pub const BADGE_STANDARD: Color32 = DEPENDENCY_EDGE;

pub fn badge_color(is_critical: bool) -> Color32 {
    if is_critical {
        BADGE_CRITICAL
    } else {
        BADGE_STANDARD
    }
}

/// HTTP verb badge: GET blue, POST green, PUT orange, anything else red
pub fn method_color(method: HttpMethod) -> Color32 {
    match method {
        HttpMethod::Get => Color32::from_rgb(37, 99, 235),
        HttpMethod::Post => Color32::from_rgb(22, 163, 74),
        HttpMethod::Put => Color32::from_rgb(234, 88, 12),
        HttpMethod::Delete | HttpMethod::Patch => Color32::from_rgb(220, 38, 38),
    }
}

/// Accent per node type, used by list renderings
pub fn node_type_color(node_type: NodeType) -> Color32 {
    match node_type {
        NodeType::Platform => Color32::from_rgb(30, 41, 59),
        NodeType::Domain => Color32::from_rgb(79, 70, 229),
        NodeType::Module => STANDARD,
        NodeType::Component => Color32::from_rgb(13, 148, 136),
        NodeType::Service => Color32::from_rgb(147, 51, 234),
        NodeType::Data => Color32::from_rgb(202, 138, 4),
    }
}

/// Apply an opacity factor to a color
pub fn faded(color: Color32, factor: f32) -> Color32 {
    color.gamma_multiply(factor.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_distinguishes_hidden_children_from_leaves() {
        assert_eq!(node_fill(false, true), STANDARD);
        assert_eq!(node_fill(true, true), CRITICAL);
        assert_eq!(node_fill(true, false), HOLLOW_FILL);
    }

    #[test]
    fn test_method_colors() {
        assert_ne!(method_color(HttpMethod::Get), method_color(HttpMethod::Post));
        assert_eq!(method_color(HttpMethod::Delete), method_color(HttpMethod::Patch));
    }
}
