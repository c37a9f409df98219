//! Hierarchy explorer page: header plus the graph widget

use egui::{RichText, Ui};
use ngo_plan_graph::HierarchyGraphWidget;

use super::{HEADING, MUTED};

pub fn hierarchy_page(ui: &mut Ui, explorer: &mut HierarchyGraphWidget) {
    ui.horizontal(|ui| {
        ui.vertical(|ui| {
            ui.label(
                RichText::new("Hierarchy Explorer")
                    .size(20.0)
                    .strong()
                    .color(HEADING),
            );
            ui.label(
                RichText::new(
                    "Visualization of Domains, Modules, Services, and Data with dependency tracking.",
                )
                .size(12.0)
                .color(MUTED),
            );
        });
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let controller = explorer.controller();
            ui.label(
                RichText::new(format!(
                    "{} nodes, {} critical",
                    controller.arena().len(),
                    controller
                        .arena()
                        .iter()
                        .filter(|(idx, _)| controller.index().is_critical(*idx))
                        .count()
                ))
                .size(11.0)
                .color(MUTED),
            );
        });
    });
    ui.add_space(6.0);
    explorer.ui(ui);
}
