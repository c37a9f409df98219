//! Detail panel - floating window showing the selected node
//!
//! Renders a [`DetailPlan`] and reports what the user clicked. The panel
//! holds no state of its own; the active tab comes from the controller.

use egui::{Align2, Color32, RichText, Ui};

use super::colors;
use super::detail::{ApiOperation, DetailPlan, DetailTab, InfoSection, SchemaSection};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailPanelAction {
    SelectTab(DetailTab),
    ActivateDependency(String),
    Close,
}

const MUTED: Color32 = Color32::from_rgb(107, 114, 128);

/// Show the panel for `plan`. At most one action per frame.
pub fn render_detail_panel(
    ctx: &egui::Context,
    plan: &DetailPlan,
    active_tab: DetailTab,
    highlighted: Option<&str>,
) -> Option<DetailPanelAction> {
    let mut action = None;
    let mut open = true;

    egui::Window::new("Node Details")
        .id(egui::Id::new("hierarchy_detail_panel"))
        .default_size([320.0, 420.0])
        .anchor(Align2::RIGHT_TOP, [-20.0, 60.0])
        .collapsible(true)
        .resizable(true)
        .open(&mut open)
        .show(ctx, |ui| {
            render_header(ui, &plan.info);
            ui.add_space(6.0);

            ui.horizontal(|ui| {
                for tab in plan.tabs() {
                    if ui.selectable_label(tab == active_tab, tab.label()).clicked() && tab != active_tab {
                        action = Some(DetailPanelAction::SelectTab(tab));
                    }
                }
            });
            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| match active_tab {
                DetailTab::Info => {
                    if let Some(code) = render_info(ui, &plan.info, highlighted) {
                        action = Some(DetailPanelAction::ActivateDependency(code));
                    }
                }
                DetailTab::Api => match &plan.api {
                    Some(ops) => render_api(ui, ops),
                    None => render_info_fallback(ui),
                },
                DetailTab::Schema => match &plan.schema {
                    Some(schema) => render_schema(ui, schema),
                    None => render_info_fallback(ui),
                },
            });
        });

    if !open {
        action = Some(DetailPanelAction::Close);
    }
    action
}

fn render_header(ui: &mut Ui, info: &InfoSection) {
    ui.horizontal(|ui| {
        ui.heading(&info.name);
        if info.is_critical {
            ui.label(RichText::new("⚠").color(colors::CRITICAL))
                .on_hover_text("Critical: 2 or more modules depend on this");
        }
    });
    ui.horizontal(|ui| {
        ui.label(RichText::new(info.code.as_deref().unwrap_or("N/A")).monospace().color(MUTED));
        ui.label("|");
        ui.label(
            RichText::new(info.node_type.as_str().to_uppercase())
                .small()
                .color(colors::node_type_color(info.node_type)),
        );
    });
}

/// Returns the code of a clicked dependency chip
fn render_info(ui: &mut Ui, info: &InfoSection, highlighted: Option<&str>) -> Option<String> {
    let mut clicked = None;

    if let Some(description) = &info.description {
        ui.label(RichText::new("Description").strong());
        ui.label(description);
        ui.add_space(6.0);
    }

    if let Some(note) = &info.impact_note {
        egui::Frame::none()
            .fill(Color32::from_rgb(254, 242, 242))
            .rounding(4.0)
            .inner_margin(6.0)
            .show(ui, |ui| {
                ui.label(RichText::new("Impact Analysis").strong().color(colors::LABEL_CRITICAL));
                ui.label(RichText::new(note).color(colors::LABEL_CRITICAL));
            });
        ui.add_space(6.0);
    }

    if !info.dependencies.is_empty() {
        ui.label(RichText::new("Dependencies").strong());
        ui.horizontal_wrapped(|ui| {
            for chip in &info.dependencies {
                let mut text = RichText::new(&chip.code).monospace();
                if highlighted == Some(chip.code.trim()) {
                    text = text.background_color(colors::HIGHLIGHT_RING);
                }
                let response = ui.button(text);
                let response = match &chip.target_name {
                    Some(name) => response.on_hover_text(name),
                    None => response.on_hover_text("Not found in this document"),
                };
                if response.clicked() {
                    clicked = Some(chip.code.clone());
                }
            }
        });
        ui.add_space(6.0);
    }

    if !info.details.is_empty() {
        egui::Grid::new("detail_fields").num_columns(2).show(ui, |ui| {
            for (key, value) in &info.details {
                ui.label(RichText::new(key).color(MUTED));
                ui.label(value);
                ui.end_row();
            }
        });
        ui.add_space(6.0);
    }

    ui.label(RichText::new("Hierarchy Stats").strong());
    egui::Grid::new("detail_stats").num_columns(2).show(ui, |ui| {
        ui.label(RichText::new("Depth").color(MUTED));
        ui.label(info.depth.to_string());
        ui.end_row();
        ui.label(RichText::new("Children").color(MUTED));
        ui.label(format!("{} ({} visible)", info.child_count, info.visible_child_count));
        ui.end_row();
        ui.label(RichText::new("Dependents").color(MUTED));
        ui.label(info.dependent_count.to_string());
        ui.end_row();
    });

    clicked
}

fn render_info_fallback(ui: &mut Ui) {
    ui.label(RichText::new("Nothing to show for this node").color(MUTED));
}

fn render_api(ui: &mut Ui, ops: &[ApiOperation]) {
    for op in ops {
        ui.horizontal(|ui| {
            ui.label(
                RichText::new(op.method.as_str())
                    .strong()
                    .monospace()
                    .color(Color32::WHITE)
                    .background_color(colors::method_color(op.method)),
            );
            ui.label(RichText::new(&op.endpoint).monospace());
        });
        ui.label(&op.summary);
        if !op.parameters.is_empty() {
            ui.label(RichText::new(format!("Params: {}", op.parameters.join(", "))).small().color(MUTED));
        }
        if !op.response.is_empty() {
            ui.label(RichText::new(format!("Returns: {}", op.response)).small().color(MUTED));
        }
        ui.separator();
    }
}

fn render_schema(ui: &mut Ui, schema: &SchemaSection) {
    ui.label(RichText::new(&schema.table_name).monospace().strong());
    if let Some(description) = &schema.description {
        ui.label(RichText::new(description).small().color(MUTED));
    }
    ui.add_space(4.0);
    egui::Grid::new("detail_schema")
        .num_columns(3)
        .striped(true)
        .show(ui, |ui| {
            ui.label(RichText::new("Column").strong());
            ui.label(RichText::new("Type").strong());
            ui.label(RichText::new("Constraint").strong());
            ui.end_row();
            for column in &schema.columns {
                ui.label(RichText::new(&column.name).monospace());
                ui.label(RichText::new(&column.ty).color(MUTED));
                ui.label(column.constraints.join(", "));
                ui.end_row();
            }
        });
}
