//! Input handling - pointer and keyboard interaction with the explorer
//!
//! Drag pans, scroll zooms about the cursor, clicks are hit-tested against
//! the spatial index: the glyph toggles expansion, the label selects. Node
//! interactions come back as [`GraphAction`] values for the widget to feed
//! into the controller.

use egui::{CursorIcon, Pos2, Rect, Response};

use super::arena::NodeKey;
use super::camera::Camera2D;
use super::spatial::{HitPart, SpatialIndex, SpatialNode};

// =============================================================================
// ACTIONS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphAction {
    Toggle(NodeKey),
    Select(NodeKey),
    ClearSelection,
    FitView,
    ResetView,
}

/// What a click on `hit` means. A click on empty canvas does nothing so
/// panning never drops the selection.
pub fn action_for_hit(hit: Option<&SpatialNode>) -> Option<GraphAction> {
    let hit = hit?;
    Some(match hit.part {
        HitPart::Expander => GraphAction::Toggle(hit.key.clone()),
        HitPart::Body => GraphAction::Select(hit.key.clone()),
    })
}

// =============================================================================
// INPUT STATE
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub hovered: Option<(NodeKey, HitPart)>,
    pub is_panning: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered_key(&self) -> Option<&NodeKey> {
        self.hovered.as_ref().map(|(key, _)| key)
    }
}

pub fn cursor_for_state(state: &InputState) -> CursorIcon {
    if state.is_panning {
        CursorIcon::Grabbing
    } else if state.hovered.is_some() {
        CursorIcon::PointingHand
    } else {
        CursorIcon::Default
    }
}

// =============================================================================
// INPUT HANDLER
// =============================================================================

pub struct InputHandler;

impl InputHandler {
    /// Process this frame's input. Camera moves are applied directly; node
    /// interactions are returned. The flag is true when a repaint is needed.
    pub fn handle_input(
        response: &Response,
        camera: &mut Camera2D,
        state: &mut InputState,
        spatial: &SpatialIndex,
        screen_rect: Rect,
        hit_padding: f32,
    ) -> (bool, Vec<GraphAction>) {
        let mut needs_repaint = false;
        let mut actions = Vec::new();

        let pointer_pos = response.hover_pos();
        let hit = pointer_pos.and_then(|pos| spatial.hit_test([pos.x, pos.y], hit_padding));

        let hovered = hit.map(|h| (h.key.clone(), h.part));
        if hovered != state.hovered {
            state.hovered = hovered;
            needs_repaint = true;
        }

        if response.clicked() {
            if let Some(action) = action_for_hit(hit) {
                actions.push(action);
                needs_repaint = true;
            }
        }

        if response.double_clicked() && hit.is_none() {
            actions.push(GraphAction::FitView);
        }

        if response.dragged() {
            let delta = response.drag_delta();
            if delta.length() > 0.0 {
                camera.pan(delta);
                state.is_panning = true;
                needs_repaint = true;
            }
        } else {
            state.is_panning = false;
        }

        if response.hovered() {
            let scroll_delta = response.ctx.input(|i| i.raw_scroll_delta);
            if scroll_delta.y != 0.0 {
                if let Some(pos) = pointer_pos {
                    camera.zoom_at(1.0 + scroll_delta.y * 0.001, pos, screen_rect);
                    needs_repaint = true;
                }
            }
            needs_repaint |= Self::handle_keyboard(response, camera, screen_rect, &mut actions);
        }

        (needs_repaint, actions)
    }

    fn handle_keyboard(
        response: &Response,
        camera: &mut Camera2D,
        screen_rect: Rect,
        actions: &mut Vec<GraphAction>,
    ) -> bool {
        let mut needs_repaint = false;

        response.ctx.input(|i| {
            if i.key_pressed(egui::Key::F) {
                actions.push(GraphAction::FitView);
            }
            if i.key_pressed(egui::Key::R) {
                actions.push(GraphAction::ResetView);
            }
            if i.key_pressed(egui::Key::Escape) {
                actions.push(GraphAction::ClearSelection);
            }

            let center: Pos2 = screen_rect.center();
            if i.key_pressed(egui::Key::Plus) || i.key_pressed(egui::Key::Equals) {
                camera.zoom_at(1.2, center, screen_rect);
                needs_repaint = true;
            }
            if i.key_pressed(egui::Key::Minus) {
                camera.zoom_at(1.0 / 1.2, center, screen_rect);
                needs_repaint = true;
            }
            if i.key_pressed(egui::Key::Num0) {
                camera.set_zoom(1.0);
                needs_repaint = true;
            }
        });

        needs_repaint || !actions.is_empty()
    }
}
