//! Camera2D - pan/zoom view transform with spring smoothing
//!
//! # EGUI-RULES Compliance
//! - Camera state is UI-only
//! - No callbacks; state is polled each frame
//! - Call `update(dt)` at the start of the frame, then use the transforms
//!
//! The camera's `center` is the world point drawn at the middle of the
//! screen rect. Zoom is clamped to `[min_zoom, max_zoom]`.

use egui::{Pos2, Rect, Vec2};

use super::animation::{SpringConfig, SpringF32, SpringVec2};
use crate::config::InteractionSettings;

#[derive(Debug, Clone)]
pub struct Camera2D {
    position: SpringVec2,
    zoom: SpringF32,
    pub min_zoom: f32,
    pub max_zoom: f32,
}

impl Default for Camera2D {
    fn default() -> Self {
        let config = SpringConfig::from_preset("camera");
        Self {
            position: SpringVec2::with_config(0.0, 0.0, config),
            zoom: SpringF32::with_config(1.0, config),
            min_zoom: 0.1,
            max_zoom: 4.0,
        }
    }
}

impl Camera2D {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_settings(settings: &InteractionSettings) -> Self {
        let mut camera = Self {
            min_zoom: settings.min_zoom,
            max_zoom: settings.max_zoom.max(settings.min_zoom),
            ..Self::default()
        };
        camera.zoom.set_immediate(camera.clamp_zoom(settings.initial_zoom));
        camera
    }

    fn clamp_zoom(&self, zoom: f32) -> f32 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }

    // =========================================================================
    // CURRENT VALUES
    // =========================================================================

    pub fn center(&self) -> Pos2 {
        self.position.get_pos2()
    }

    pub fn zoom(&self) -> f32 {
        self.zoom.get()
    }

    pub fn target_center(&self) -> Pos2 {
        let (x, y) = self.position.target();
        Pos2::new(x, y)
    }

    pub fn target_zoom(&self) -> f32 {
        self.zoom.target()
    }

    // =========================================================================
    // ANIMATION
    // =========================================================================

    pub fn update(&mut self, dt: f32) {
        self.position.tick(dt);
        self.zoom.tick(dt);
    }

    pub fn snap_to_target(&mut self) {
        let (x, y) = self.position.target();
        self.position.set_immediate(x, y);
        self.zoom.set_immediate(self.zoom.target());
    }

    pub fn is_animating(&self) -> bool {
        self.position.is_animating() || self.zoom.is_animating()
    }

    // =========================================================================
    // CONTROLS
    // =========================================================================

    /// Drag by a screen-space delta
    pub fn pan(&mut self, screen_delta: Vec2) {
        let world_delta = screen_delta / self.zoom.target();
        let (x, y) = self.position.target();
        self.position.set_target(x - world_delta.x, y - world_delta.y);
    }

    /// Centre on a world position (animated)
    pub fn pan_to(&mut self, world_pos: Pos2) {
        self.position.set_target_pos2(world_pos);
    }

    pub fn fly_to(&mut self, world_pos: Pos2) {
        self.position.set_config(SpringConfig::from_preset("camera"));
        self.position.set_target_pos2(world_pos);
    }

    /// Target zoom and centre so that `world_pos` lands on `screen_anchor`
    pub fn anchor(&mut self, world_pos: Pos2, screen_anchor: Pos2, screen_rect: Rect, zoom: f32) {
        let zoom = self.clamp_zoom(zoom);
        let offset = (screen_rect.center() - screen_anchor) / zoom;
        self.zoom.set_target(zoom);
        self.position.set_target_pos2(world_pos + offset);
    }

    /// Pan just enough to bring `world_pos` inside the view, keeping `margin`
    /// screen pixels of clearance. Returns false if it was already in view.
    pub fn bring_into_view(&mut self, world_pos: Pos2, screen_rect: Rect, margin: f32) -> bool {
        let zoom = self.zoom.target();
        let half = (screen_rect.size() / 2.0 / zoom - Vec2::splat(margin / zoom)).max(Vec2::ZERO);
        let center = self.target_center();
        let delta = world_pos - center;

        let mut shift = Vec2::ZERO;
        if delta.x.abs() > half.x {
            shift.x = delta.x - half.x * delta.x.signum();
        }
        if delta.y.abs() > half.y {
            shift.y = delta.y - half.y * delta.y.signum();
        }
        if shift == Vec2::ZERO {
            return false;
        }
        self.fly_to(center + shift);
        true
    }

    /// Zoom by `factor` keeping the world point under `screen_pos` fixed
    pub fn zoom_at(&mut self, factor: f32, screen_pos: Pos2, screen_rect: Rect) {
        let old_zoom = self.zoom.target();
        let new_zoom = self.clamp_zoom(old_zoom * factor);
        if (new_zoom - old_zoom).abs() <= 0.001 {
            return;
        }

        let from_center = screen_pos - screen_rect.center();
        let correction = from_center / old_zoom - from_center / new_zoom;
        let (x, y) = self.position.target();
        self.position.set_target(x + correction.x, y + correction.y);
        self.zoom.set_target(new_zoom);
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom.set_target(self.clamp_zoom(zoom));
    }

    /// Centre on `bounds` and zoom so they fit inside the padded screen
    pub fn fit_to_bounds(&mut self, bounds: Rect, screen_rect: Rect, padding: f32) {
        if bounds.is_negative() {
            return;
        }
        self.position.set_target_pos2(bounds.center());

        let available = (screen_rect.size() - Vec2::splat(padding * 2.0)).max(Vec2::splat(1.0));
        let zoom_x = if bounds.width() >= 1.0 {
            available.x / bounds.width()
        } else {
            self.max_zoom
        };
        let zoom_y = if bounds.height() >= 1.0 {
            available.y / bounds.height()
        } else {
            self.max_zoom
        };
        self.zoom.set_target(self.clamp_zoom(zoom_x.min(zoom_y)));
    }

    // =========================================================================
    // COORDINATE TRANSFORMS
    // =========================================================================

    pub fn world_to_screen(&self, world_pos: Pos2, screen_rect: Rect) -> Pos2 {
        screen_rect.center() + (world_pos - self.center()) * self.zoom()
    }

    pub fn screen_to_world(&self, screen_pos: Pos2, screen_rect: Rect) -> Pos2 {
        self.center() + (screen_pos - screen_rect.center()) / self.zoom()
    }

    pub fn visible_bounds(&self, screen_rect: Rect) -> Rect {
        Rect::from_center_size(self.center(), screen_rect.size() / self.zoom())
    }

    pub fn is_visible(&self, world_rect: Rect, screen_rect: Rect) -> bool {
        self.visible_bounds(screen_rect).intersects(world_rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen() -> Rect {
        Rect::from_min_size(Pos2::ZERO, Vec2::new(1200.0, 600.0))
    }

    fn camera() -> Camera2D {
        Camera2D::from_settings(&InteractionSettings::default())
    }

    fn close(a: Pos2, b: Pos2) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn test_anchor_places_root_at_left_sixth() {
        let mut cam = camera();
        let rect = screen();
        cam.anchor(Pos2::ZERO, Pos2::new(rect.width() / 6.0, rect.height() / 2.0), rect, 0.8);
        cam.snap_to_target();
        assert!((cam.zoom() - 0.8).abs() < 1e-6);
        assert!(close(cam.world_to_screen(Pos2::ZERO, rect), Pos2::new(200.0, 300.0)));
    }

    #[test]
    fn test_round_trip_transform() {
        let mut cam = camera();
        cam.pan_to(Pos2::new(40.0, -20.0));
        cam.set_zoom(2.0);
        cam.snap_to_target();
        let world = Pos2::new(123.0, 45.0);
        let screen_pos = cam.world_to_screen(world, screen());
        assert!(close(cam.screen_to_world(screen_pos, screen()), world));
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut cam = camera();
        cam.set_zoom(100.0);
        assert_eq!(cam.target_zoom(), 4.0);
        cam.set_zoom(0.0);
        assert_eq!(cam.target_zoom(), 0.1);
    }

    #[test]
    fn test_zoom_at_keeps_cursor_point_fixed() {
        let mut cam = camera();
        cam.snap_to_target();
        let rect = screen();
        let cursor = Pos2::new(900.0, 100.0);
        let before = cam.screen_to_world(cursor, rect);
        cam.zoom_at(1.5, cursor, rect);
        cam.snap_to_target();
        let after = cam.screen_to_world(cursor, rect);
        assert!(close(before, after));
    }

    #[test]
    fn test_bring_into_view_only_moves_when_needed() {
        let mut cam = camera();
        cam.set_zoom(1.0);
        cam.snap_to_target();
        assert!(!cam.bring_into_view(Pos2::new(100.0, 50.0), screen(), 40.0));
        assert!(cam.bring_into_view(Pos2::new(2000.0, 0.0), screen(), 40.0));
        cam.snap_to_target();
        let on_screen = cam.world_to_screen(Pos2::new(2000.0, 0.0), screen());
        assert!(screen().shrink(39.0).contains(on_screen));
    }
}
