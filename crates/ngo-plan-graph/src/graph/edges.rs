//! Edge geometry and painting
//!
//! Containment edges are horizontal cubic "diagonals". Dependency edges are
//! quadratic curves whose control point is pulled towards the root so they
//! never sit on top of a containment edge; a node depending on itself gets a
//! small loop instead of a zero-length curve.

use egui::{Color32, Pos2, Shape, Stroke, Vec2};

/// Segments used when flattening curves
const CURVE_SEGMENTS: usize = 20;

/// Size of the loop drawn for a self-dependency, in world units
const SELF_LOOP_RADIUS: f32 = 18.0;

fn normalized_or(v: Vec2, fallback: Vec2) -> Vec2 {
    let len = v.length();
    if len > f32::EPSILON {
        v / len
    } else {
        fallback
    }
}

// =============================================================================
// QUADRATIC CURVE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeCurve {
    pub from: Pos2,
    pub to: Pos2,
    pub control: Pos2,
}

impl EdgeCurve {
    /// Curve bowed sideways by `curve_strength` times the chord length
    pub fn new(from: Pos2, to: Pos2, curve_strength: f32) -> Self {
        let delta = to - from;
        let perpendicular = normalized_or(Vec2::new(-delta.y, delta.x), Vec2::ZERO);
        let control = from.lerp(to, 0.5) + perpendicular * delta.length() * curve_strength;
        Self { from, to, control }
    }

    /// Dependency link: control point at the chord midpoint shifted
    /// `offset` towards the root along the depth axis
    pub fn dependency(from: Pos2, to: Pos2, offset: f32) -> Self {
        let control = from.lerp(to, 0.5) - Vec2::new(offset, 0.0);
        Self { from, to, control }
    }

    pub fn straight(from: Pos2, to: Pos2) -> Self {
        Self {
            from,
            to,
            control: from.lerp(to, 0.5),
        }
    }

    pub fn point_at(&self, t: f32) -> Pos2 {
        let mt = 1.0 - t;
        let a = mt * mt;
        let b = 2.0 * mt * t;
        let c = t * t;
        Pos2::new(
            self.from.x * a + self.control.x * b + self.to.x * c,
            self.from.y * a + self.control.y * b + self.to.y * c,
        )
    }

    /// Unit tangent; zero for a degenerate curve
    pub fn tangent_at(&self, t: f32) -> Vec2 {
        let mt = 1.0 - t;
        let d = (self.control - self.from) * (2.0 * mt) + (self.to - self.control) * (2.0 * t);
        normalized_or(d, Vec2::ZERO)
    }

    /// Direction of travel at the end, for the arrow head
    pub fn end_direction(&self) -> Vec2 {
        let fallback = normalized_or(self.to - self.from, Vec2::X);
        normalized_or(self.to - self.control, fallback)
    }

    pub fn midpoint(&self) -> Pos2 {
        self.point_at(0.5)
    }

    pub fn is_degenerate(&self) -> bool {
        (self.to - self.from).length() <= f32::EPSILON
            && (self.control - self.from).length() <= f32::EPSILON
    }

    pub fn points(&self) -> Vec<Pos2> {
        (0..=CURVE_SEGMENTS)
            .map(|i| self.point_at(i as f32 / CURVE_SEGMENTS as f32))
            .collect()
    }

    pub fn length(&self) -> f32 {
        self.points().windows(2).map(|w| (w[1] - w[0]).length()).sum()
    }
}

// =============================================================================
// TREE DIAGONAL
// =============================================================================

/// Cubic from parent to child with horizontal tangents at both ends
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeDiagonal {
    pub from: Pos2,
    pub to: Pos2,
}

impl TreeDiagonal {
    pub fn new(from: Pos2, to: Pos2) -> Self {
        Self { from, to }
    }

    pub fn controls(&self) -> (Pos2, Pos2) {
        let mid_x = (self.from.x + self.to.x) / 2.0;
        (Pos2::new(mid_x, self.from.y), Pos2::new(mid_x, self.to.y))
    }

    pub fn point_at(&self, t: f32) -> Pos2 {
        let (c1, c2) = self.controls();
        let mt = 1.0 - t;
        let a = mt * mt * mt;
        let b = 3.0 * mt * mt * t;
        let c = 3.0 * mt * t * t;
        let d = t * t * t;
        Pos2::new(
            self.from.x * a + c1.x * b + c2.x * c + self.to.x * d,
            self.from.y * a + c1.y * b + c2.y * c + self.to.y * d,
        )
    }

    pub fn points(&self) -> Vec<Pos2> {
        (0..=CURVE_SEGMENTS)
            .map(|i| self.point_at(i as f32 / CURVE_SEGMENTS as f32))
            .collect()
    }
}

// =============================================================================
// SELF LOOP
// =============================================================================

/// Closed loop above a node for a dependency on itself. Returns the polyline
/// and the direction of travel at its end.
pub fn self_loop_points(at: Pos2, radius: f32) -> (Vec<Pos2>, Vec2) {
    let r = if radius > 0.0 { radius } else { SELF_LOOP_RADIUS };
    let center = at + Vec2::new(-r * 0.8, -r * 0.8);
    let start_angle = std::f32::consts::FRAC_PI_4;
    let sweep = std::f32::consts::TAU * 0.8;
    let points: Vec<Pos2> = (0..=CURVE_SEGMENTS)
        .map(|i| {
            let a = start_angle - sweep * i as f32 / CURVE_SEGMENTS as f32;
            center + Vec2::new(a.cos(), a.sin()) * r
        })
        .collect();
    let direction = match points.as_slice() {
        [.., prev, last] => normalized_or(*last - *prev, Vec2::X),
        _ => Vec2::X,
    };
    (points, direction)
}

// =============================================================================
// PAINTING
// =============================================================================

pub fn paint_polyline(painter: &egui::Painter, points: Vec<Pos2>, stroke: Stroke) {
    if points.len() >= 2 {
        painter.add(Shape::line(points, stroke));
    }
}

/// Dashes laid along a polyline
pub fn paint_dashed(
    painter: &egui::Painter,
    points: &[Pos2],
    stroke: Stroke,
    dash_length: f32,
    gap_length: f32,
) {
    if points.len() < 2 || dash_length <= 0.0 {
        return;
    }
    painter.extend(Shape::dashed_line(points, stroke, dash_length, gap_length.max(0.0)));
}

/// Filled triangle with its tip at `tip`, pointing along `direction`
pub fn paint_arrow_head(
    painter: &egui::Painter,
    tip: Pos2,
    direction: Vec2,
    size: f32,
    color: Color32,
) {
    let dir = normalized_or(direction, Vec2::X);
    let perp = Vec2::new(-dir.y, dir.x);
    let back = tip - dir * size;
    painter.add(Shape::convex_polygon(
        vec![tip, back + perp * size * 0.5, back - perp * size * 0.5],
        color,
        Stroke::NONE,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_control_point_shifts_towards_root() {
        let curve = EdgeCurve::dependency(Pos2::new(500.0, 100.0), Pos2::new(250.0, -100.0), 40.0);
        assert_eq!(curve.control, Pos2::new(335.0, 0.0));
        assert_eq!(curve.point_at(0.0), curve.from);
        assert_eq!(curve.point_at(1.0), curve.to);
    }

    #[test]
    fn test_zero_length_curve_has_finite_directions() {
        let p = Pos2::new(10.0, 10.0);
        let curve = EdgeCurve::new(p, p, 0.2);
        assert!(curve.is_degenerate());
        assert_eq!(curve.tangent_at(0.5), Vec2::ZERO);
        let dir = curve.end_direction();
        assert!(dir.x.is_finite() && dir.y.is_finite());
        assert!(curve.length().is_finite());
    }

    #[test]
    fn test_self_dependency_curve_end_direction_is_finite() {
        let p = Pos2::new(250.0, 35.0);
        let curve = EdgeCurve::dependency(p, p, 40.0);
        let dir = curve.end_direction();
        assert!((dir.length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_self_loop_returns_near_node() {
        let at = Pos2::new(0.0, 0.0);
        let (points, direction) = self_loop_points(at, 12.0);
        assert_eq!(points.len(), CURVE_SEGMENTS + 1);
        assert!(points.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
        assert!((direction.length() - 1.0).abs() < 1e-4);
        let first = points[0];
        let last = points[points.len() - 1];
        assert!((first - at).length() < 12.0);
        assert!((last - at).length() < 24.0);
    }

    #[test]
    fn test_tree_diagonal_is_horizontal_at_ends() {
        let d = TreeDiagonal::new(Pos2::new(0.0, 0.0), Pos2::new(250.0, 70.0));
        let (c1, c2) = d.controls();
        assert_eq!(c1, Pos2::new(125.0, 0.0));
        assert_eq!(c2, Pos2::new(125.0, 70.0));
        assert_eq!(d.point_at(0.0), d.from);
        assert_eq!(d.point_at(1.0), d.to);
        assert_eq!(d.point_at(0.5), Pos2::new(125.0, 35.0));
    }
}
