//! Main application: sidebar navigation, header and the routed page

use egui::{Color32, RichText, Rounding, Stroke};
use ngo_plan_graph::HierarchyGraphWidget;
use ngo_plan_types::PlanDocument;

use crate::pages::{self, DevOpsState, GlossaryState, StructureState};
use crate::route::Route;

const SIDEBAR_BG: Color32 = Color32::from_rgb(15, 23, 42); // #0f172a
const SIDEBAR_TEXT: Color32 = Color32::from_rgb(203, 213, 225); // #cbd5e1
const SIDEBAR_MUTED: Color32 = Color32::from_rgb(100, 116, 139); // #64748b
const NAV_ACTIVE: Color32 = Color32::from_rgb(37, 99, 235); // #2563eb

/// Everything a loaded document feeds
struct Workspace {
    document: PlanDocument,
    explorer: HierarchyGraphWidget,
    structure: StructureState,
    devops: DevOpsState,
    glossary: GlossaryState,
}

impl Workspace {
    fn new(document: PlanDocument) -> Self {
        let explorer = HierarchyGraphWidget::new(&document.hierarchy);
        let structure = StructureState::new(&document.hierarchy);
        Self {
            document,
            explorer,
            structure,
            devops: DevOpsState::default(),
            glossary: GlossaryState::default(),
        }
    }
}

enum Content {
    Ready(Box<Workspace>),
    Failed { code: &'static str, message: String },
}

pub struct NgoPlanApp {
    route: Route,
    content: Content,
    /// Last URL hash seen, so browser navigation can drive the route
    #[cfg(target_arch = "wasm32")]
    last_hash: Option<String>,
}

impl NgoPlanApp {
    pub fn new(cc: &eframe::CreationContext<'_>, route: Route) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::light());
        Self::with_document(PlanDocument::bundled(), route)
    }

    /// Build from an already loaded (or failed) document
    pub fn with_document(
        document: ngo_plan_types::DocumentResult<PlanDocument>,
        route: Route,
    ) -> Self {
        let content = match document {
            Ok(document) => Content::Ready(Box::new(Workspace::new(document))),
            Err(err) => {
                tracing::error!(code = err.code(), error = %err, "Plan document failed to load");
                Content::Failed {
                    code: err.code(),
                    message: err.to_string(),
                }
            }
        };
        tracing::info!(route = %route, "Application started");
        Self {
            route,
            content,
            #[cfg(target_arch = "wasm32")]
            last_hash: None,
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.content, Content::Ready(_))
    }

    pub fn navigate(&mut self, route: Route) {
        if route == self.route {
            return;
        }
        tracing::info!(from = %self.route, to = %route, "Route changed");
        self.route = route;
        #[cfg(target_arch = "wasm32")]
        {
            let hash = format!("#{}", route.path());
            set_location_hash(&hash);
            self.last_hash = Some(hash);
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn sync_route_from_hash(&mut self) {
        let Some(hash) = location_hash() else {
            return;
        };
        if self.last_hash.as_deref() == Some(hash.as_str()) {
            return;
        }
        let route = Route::from_path(&hash);
        self.last_hash = Some(hash);
        if route != self.route {
            tracing::info!(from = %self.route, to = %route, "Route changed from URL");
            self.route = route;
        }
    }

    fn sidebar(&mut self, ctx: &egui::Context) {
        let mut clicked = None;
        egui::SidePanel::left("sidebar")
            .exact_width(240.0)
            .resizable(false)
            .frame(
                egui::Frame::none()
                    .fill(SIDEBAR_BG)
                    .inner_margin(16.0),
            )
            .show(ctx, |ui| {
                ui.label(
                    RichText::new("NGO Ops Platform")
                        .size(18.0)
                        .strong()
                        .color(Color32::WHITE),
                );
                ui.label(
                    RichText::new("EMR / EHR / HIS System v1.0")
                        .size(11.0)
                        .color(SIDEBAR_MUTED),
                );
                ui.add_space(20.0);

                for route in Route::all() {
                    let active = *route == self.route;
                    let text = RichText::new(format!("{}  {}", route.icon(), route.label()))
                        .color(if active { Color32::WHITE } else { SIDEBAR_TEXT });
                    let button = egui::Button::new(text)
                        .fill(if active { NAV_ACTIVE } else { Color32::TRANSPARENT })
                        .stroke(Stroke::NONE)
                        .rounding(Rounding::same(6.0))
                        .min_size(egui::vec2(ui.available_width(), 32.0));
                    if ui.add(button).clicked() {
                        clicked = Some(*route);
                    }
                    ui.add_space(2.0);
                }

                ui.with_layout(egui::Layout::bottom_up(egui::Align::Min), |ui| {
                    ui.label(RichText::new("Planning Phase").size(11.0).color(SIDEBAR_MUTED));
                    ui.label(RichText::new("Version 1.0.0").size(11.0).color(SIDEBAR_TEXT));
                });
            });
        if let Some(route) = clicked {
            self.navigate(route);
        }
    }

    fn header(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header")
            .frame(
                egui::Frame::none()
                    .fill(Color32::WHITE)
                    .stroke(Stroke::new(1.0, pages::CARD_BORDER))
                    .inner_margin(egui::Margin::symmetric(24.0, 12.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(self.route.label())
                            .size(16.0)
                            .strong()
                            .color(pages::HEADING),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        pages::pill(
                            ui,
                            "Status: Planning",
                            pages::ACCENT,
                            pages::ACCENT_SOFT,
                        );
                    });
                });
            });
    }
}

fn error_page(ui: &mut egui::Ui, code: &str, message: &str) {
    ui.vertical_centered(|ui| {
        ui.add_space(80.0);
        ui.label(
            RichText::new("The plan document could not be loaded")
                .size(20.0)
                .strong()
                .color(Color32::from_rgb(185, 28, 28)),
        );
        ui.add_space(8.0);
        ui.label(RichText::new(code).monospace().color(pages::MUTED));
        ui.label(RichText::new(message).color(pages::BODY));
    });
}

impl eframe::App for NgoPlanApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        #[cfg(target_arch = "wasm32")]
        self.sync_route_from_hash();

        self.sidebar(ctx);
        self.header(ctx);

        let route = self.route;
        egui::CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(pages::PAGE_BG)
                    .inner_margin(24.0),
            )
            .show(ctx, |ui| {
                let workspace = match &mut self.content {
                    Content::Ready(workspace) => workspace,
                    Content::Failed { code, message } => {
                        error_page(ui, code, message);
                        return;
                    }
                };
                let ws = workspace.as_mut();
                match route {
                    Route::Overview => {
                        egui::ScrollArea::vertical()
                            .auto_shrink([false, false])
                            .show(ui, |ui| pages::overview_page(ui, &ws.document));
                    }
                    Route::Hierarchy => pages::hierarchy_page(ui, &mut ws.explorer),
                    Route::Structure => pages::structure_page(ui, &mut ws.structure),
                    Route::Timeline => {
                        egui::ScrollArea::vertical()
                            .auto_shrink([false, false])
                            .show(ui, |ui| pages::timeline_page(ui, &ws.document));
                    }
                    Route::Modules => {
                        egui::ScrollArea::vertical()
                            .auto_shrink([false, false])
                            .show(ui, |ui| pages::modules_page(ui, &ws.document));
                    }
                    Route::DevOps => pages::devops_page(ui, &ws.document, &mut ws.devops),
                    Route::Glossary => {
                        pages::glossary_page(ui, &ws.document, &mut ws.glossary)
                    }
                }
            });
    }
}

// =============================================================================
// URL HASH (WASM)
// =============================================================================

#[cfg(target_arch = "wasm32")]
pub(crate) fn location_hash() -> Option<String> {
    web_sys::window()?.location().hash().ok()
}

#[cfg(target_arch = "wasm32")]
fn set_location_hash(hash: &str) {
    if let Some(window) = web_sys::window() {
        if let Err(err) = window.location().set_hash(hash) {
            tracing::warn!(?err, "Failed to update URL hash");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ngo_plan_types::DocumentError;
    use pretty_assertions::assert_eq;

    #[test]
    fn navigation_switches_route() {
        let mut app = NgoPlanApp::with_document(PlanDocument::bundled(), Route::default());
        assert!(app.is_loaded());
        assert_eq!(app.route(), Route::Overview);
        app.navigate(Route::Glossary);
        assert_eq!(app.route(), Route::Glossary);
    }

    #[test]
    fn broken_document_renders_error_page_instead_of_panicking() {
        let err = DocumentError::EmptyName {
            path: "Platform / <unnamed>".into(),
        };
        let app = NgoPlanApp::with_document(Err(err), Route::Timeline);
        assert!(!app.is_loaded());
        assert_eq!(app.route(), Route::Timeline);
    }
}
