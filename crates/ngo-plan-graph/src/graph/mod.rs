//! Hierarchy explorer
//!
//! Collapsible tree view of the platform hierarchy with an optional
//! dependency overlay.
//!
//! # Architecture
//!
//! ```text
//! HierarchyNode (document)
//!        │
//!        ▼
//! TreeArena + DependencyIndex (built once per document)
//!        │
//!        ▼
//! InteractionController ── ExpansionState, selection, tab, overlay, highlight
//!        │
//!        ├──► TreeLayoutEngine → LayoutFrame → LayoutDiff
//!        │                                        │
//!        │                                        ▼
//!        │                               AnimatedScene (springs)
//!        │                                        │
//!        │                                        ▼
//!        │                               GraphRenderer (egui::Painter)
//!        │                                        │
//!        │                                        ▼
//!        │                               SpatialIndex (hit targets)
//!        │                                        │
//!        │                                        ▼
//!        │                               InputHandler → GraphAction
//!        │
//!        └──► detail::project → DetailPlan → detail panel window
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let mut explorer = HierarchyGraphWidget::new(&document.hierarchy);
//! explorer.ui(ui);
//! ```

pub mod animation;
pub mod arena;
pub mod camera;
pub mod colors;
pub mod controller;
pub mod detail;
pub mod detail_panel;
pub mod diff;
pub mod edges;
pub mod expansion;
pub mod index;
pub mod input;
pub mod layout;
pub mod render;
pub mod spatial;

pub use animation::{AnimatedScene, SpringConfig, SpringF32, SpringVec2};
pub use arena::{NodeIdx, NodeKey, TreeArena};
pub use camera::Camera2D;
pub use controller::{HighlightTimer, InteractionController, Relayout, Transition};
pub use detail::{DetailPlan, DetailTab};
pub use diff::LayoutDiff;
pub use expansion::ExpansionState;
pub use index::{DependencyIndex, NodeAnnotation, CRITICAL_THRESHOLD};
pub use input::{GraphAction, InputHandler, InputState};
pub use layout::{EdgeKind, LayoutFrame, LayoutNode, TreeLayoutEngine};
pub use render::GraphRenderer;
pub use spatial::SpatialIndex;

use std::time::Duration;

use egui::{Color32, Pos2, Rect, Sense, Vec2};
use ngo_plan_types::HierarchyNode;

use crate::config::{global_config, GraphSettings, InteractionSettings};
use detail_panel::DetailPanelAction;
use render::SceneView;

/// Screen margin kept around a node brought into focus
const FOCUS_MARGIN: f32 = 80.0;
const FIT_PADDING: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ToolbarAction {
    ToggleOverlay,
    Reset,
    Fit,
}

/// How the camera should be placed on the next frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ViewRequest {
    /// Root at one sixth of the width, snapped
    Initial,
    /// Root at one sixth of the width, animated
    Reset,
    Fit,
}

pub struct HierarchyGraphWidget {
    controller: InteractionController,
    scene: AnimatedScene,
    camera: Camera2D,
    input_state: InputState,
    spatial: SpatialIndex,
    renderer: GraphRenderer,
    interaction: InteractionSettings,
    view_request: Option<ViewRequest>,
    pending_focus: Option<NodeKey>,
}

impl HierarchyGraphWidget {
    pub fn new(root: &HierarchyNode) -> Self {
        Self::with_settings(root, global_config())
    }

    pub fn with_settings(root: &HierarchyNode, settings: &GraphSettings) -> Self {
        let controller = InteractionController::with_settings(root, settings);
        let mut scene = AnimatedScene::default();
        scene.snap_to(controller.frame());
        Self {
            controller,
            scene,
            camera: Camera2D::from_settings(&settings.interaction),
            input_state: InputState::new(),
            spatial: SpatialIndex::new(),
            renderer: GraphRenderer::from_settings(settings),
            interaction: settings.interaction.clone(),
            view_request: Some(ViewRequest::Initial),
            pending_focus: None,
        }
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn toggle_dependency_overlay(&mut self) {
        let transition = self.controller.toggle_dependency_overlay();
        self.apply(transition);
    }

    pub fn reset_view(&mut self) {
        let transition = self.controller.reset();
        self.apply(transition);
    }

    pub fn fit_to_content(&mut self) {
        self.view_request = Some(ViewRequest::Fit);
    }

    fn apply(&mut self, transition: Transition) {
        if let Some(relayout) = transition.relayout {
            self.scene.apply_diff(
                &relayout.diff,
                self.controller.previous_frame(),
                self.controller.frame(),
                relayout.origin.as_ref(),
            );
        }
        if transition.focus.is_some() {
            self.pending_focus = transition.focus;
        }
        if transition.reset_view {
            self.view_request = Some(ViewRequest::Reset);
        }
    }

    fn handle_action(&mut self, action: GraphAction) {
        let transition = match action {
            GraphAction::Toggle(key) => self.controller.toggle_key(&key),
            GraphAction::Select(key) => self.controller.select_key(&key),
            GraphAction::ClearSelection => {
                self.controller.clear_selection();
                Transition::default()
            }
            GraphAction::FitView => {
                self.view_request = Some(ViewRequest::Fit);
                Transition::default()
            }
            GraphAction::ResetView => self.controller.reset(),
        };
        self.apply(transition);
    }

    fn place_camera(&mut self, request: ViewRequest, screen_rect: Rect) {
        match request {
            ViewRequest::Initial | ViewRequest::Reset => {
                let root = self
                    .controller
                    .frame()
                    .nodes
                    .first()
                    .map(|n| n.position)
                    .unwrap_or(Pos2::ZERO);
                let anchor = Pos2::new(
                    screen_rect.left() + screen_rect.width() / 6.0,
                    screen_rect.center().y,
                );
                self.camera
                    .anchor(root, anchor, screen_rect, self.interaction.initial_zoom);
                if request == ViewRequest::Initial {
                    self.camera.snap_to_target();
                }
            }
            ViewRequest::Fit => {
                self.camera
                    .fit_to_bounds(self.controller.frame().bounds, screen_rect, FIT_PADDING);
            }
        }
    }

    /// Overlay toggle, reset and fit buttons
    pub fn toolbar(&mut self, ui: &mut egui::Ui) {
        let overlay = self.controller.dependency_overlay();
        let mut clicked = None;
        ui.horizontal(|ui| {
            let label = if overlay {
                "Hide Dependencies"
            } else {
                "Show Dependencies"
            };
            if ui.selectable_label(overlay, label).clicked() {
                clicked = Some(ToolbarAction::ToggleOverlay);
            }
            if ui.button("Reset View").clicked() {
                clicked = Some(ToolbarAction::Reset);
            }
            if ui.button("Fit").clicked() {
                clicked = Some(ToolbarAction::Fit);
            }
        });
        match clicked {
            Some(ToolbarAction::ToggleOverlay) => self.toggle_dependency_overlay(),
            Some(ToolbarAction::Reset) => self.reset_view(),
            Some(ToolbarAction::Fit) => self.fit_to_content(),
            None => {}
        }
    }

    /// Main UI function: toolbar, canvas and detail panel
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        self.toolbar(ui);

        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let screen_rect = response.rect;
        painter.rect_filled(screen_rect, 0.0, Color32::from_rgb(248, 250, 252));

        if let Some(request) = self.view_request.take() {
            self.place_camera(request, screen_rect);
        }

        let (dt, now) = ui.input(|i| (i.stable_dt.min(0.1), i.time));
        let highlight_cleared = self.controller.tick(now);
        self.camera.update(dt);
        let scene_animating = self.scene.tick(dt);

        if let Some(key) = self.pending_focus.take() {
            if let Some(pos) = self.controller.frame().position(&key) {
                self.camera.bring_into_view(pos, screen_rect, FOCUS_MARGIN);
            }
        }

        let (needs_repaint, actions) = InputHandler::handle_input(
            &response,
            &mut self.camera,
            &mut self.input_state,
            &self.spatial,
            screen_rect,
            self.interaction.hit_padding,
        );
        for action in actions {
            self.handle_action(action);
        }
        if response.hovered() {
            ui.ctx()
                .set_cursor_icon(input::cursor_for_state(&self.input_state));
        }

        let highlighted = self
            .controller
            .highlighted_node()
            .map(|idx| self.controller.arena().key(idx).clone());
        let root = self.controller.arena().key(self.controller.arena().root()).clone();
        let view = SceneView {
            camera: &self.camera,
            screen_rect,
            root: Some(&root),
            selected: self.controller.selected_key(),
            highlighted: highlighted.as_ref(),
            hovered: self.input_state.hovered_key(),
        };
        let painter = painter.with_clip_rect(screen_rect);
        let targets = self
            .renderer
            .render(&painter, &view, &self.scene, self.controller.arena());
        self.spatial.rebuild(targets.into_iter());

        render::paint_legend(
            &painter,
            screen_rect.left_top() + Vec2::new(10.0, 32.0),
            self.controller.dependency_overlay(),
        );
        render::paint_chrome(
            &painter,
            screen_rect,
            self.controller.frame().nodes.len(),
            self.controller.arena().len(),
            self.camera.zoom(),
        );

        if let Some(plan) = self.controller.detail_plan() {
            let action = detail_panel::render_detail_panel(
                ui.ctx(),
                &plan,
                self.controller.active_tab(),
                self.controller.highlighted(),
            );
            match action {
                Some(DetailPanelAction::SelectTab(tab)) => {
                    self.controller.select_tab(tab);
                }
                Some(DetailPanelAction::ActivateDependency(code)) => {
                    let transition = self.controller.activate_dependency(&code, now);
                    self.apply(transition);
                }
                Some(DetailPanelAction::Close) => self.controller.clear_selection(),
                None => {}
            }
        }

        if needs_repaint
            || highlight_cleared
            || scene_animating
            || self.camera.is_animating()
            || self.pending_focus.is_some()
            || self.view_request.is_some()
        {
            ui.ctx().request_repaint();
        }
        if let Some(remaining) = self.controller.highlight_remaining(now) {
            ui.ctx()
                .request_repaint_after(Duration::from_secs_f64(remaining));
        }
    }
}
