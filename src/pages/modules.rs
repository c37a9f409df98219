//! Domains and their modules, read straight from the hierarchy

use egui::{Color32, RichText, Rounding, Stroke, Ui, Vec2};
use ngo_plan_types::{HierarchyNode, PlanDocument};

use super::{card_frame, page_header, pill, CARD_BORDER, HEADING, MUTED};

/// Child names listed before the "+N more" tag
const PREVIEW_LEN: usize = 3;

const BADGE_FILL: Color32 = Color32::from_rgb(239, 246, 255); // #eff6ff
const BADGE_TEXT: Color32 = Color32::from_rgb(37, 99, 235); // #2563eb
const TAG_FILL: Color32 = Color32::from_rgb(241, 245, 249); // #f1f5f9

/// What a module row shows of its children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModulePreview<'a> {
    pub names: Vec<&'a str>,
    /// Children not listed
    pub more: usize,
}

pub fn module_preview(module: &HierarchyNode) -> ModulePreview<'_> {
    ModulePreview {
        names: module
            .children
            .iter()
            .take(PREVIEW_LEN)
            .map(|c| c.name.as_str())
            .collect(),
        more: module.children.len().saturating_sub(PREVIEW_LEN),
    }
}

/// Last segment of a dotted code: `CD.1.2` gives `2`
pub fn code_badge(code: Option<&str>) -> &str {
    code.and_then(|c| c.rsplit('.').next())
        .filter(|s| !s.is_empty())
        .unwrap_or("-")
}

pub fn modules_page(ui: &mut Ui, doc: &PlanDocument) {
    let domains = &doc.hierarchy.children;
    page_header(
        ui,
        "Domains & Modules",
        &format!(
            "Detailed breakdown of the {} domains and their constituent modules.",
            domains.len()
        ),
    );

    for domain in domains {
        domain_card(ui, domain);
        ui.add_space(12.0);
    }
}

fn domain_card(ui: &mut Ui, domain: &HierarchyNode) {
    card_frame().inner_margin(0.0).show(ui, |ui| {
        ui.set_width(ui.available_width());

        egui::Frame::none()
            .fill(Color32::from_rgb(248, 250, 252))
            .inner_margin(egui::Margin::symmetric(16.0, 12.0))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.horizontal(|ui| {
                    if let Some(code) = domain.code() {
                        pill(ui, code, MUTED, Color32::from_rgb(226, 232, 240));
                    }
                    ui.label(RichText::new(&domain.name).size(16.0).strong().color(HEADING));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        pill(
                            ui,
                            format!("{} Modules", domain.children.len()),
                            MUTED,
                            Color32::WHITE,
                        );
                    });
                });
            });

        for (i, module) in domain.children.iter().enumerate() {
            if i > 0 {
                let y = ui.cursor().top();
                ui.painter()
                    .hline(ui.max_rect().x_range(), y, Stroke::new(1.0, CARD_BORDER));
            }
            module_row(ui, module);
        }
    });
}

fn module_row(ui: &mut Ui, module: &HierarchyNode) {
    egui::Frame::none()
        .inner_margin(egui::Margin::symmetric(16.0, 10.0))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                egui::Frame::none()
                    .fill(BADGE_FILL)
                    .rounding(Rounding::same(4.0))
                    .show(ui, |ui| {
                        ui.set_min_size(Vec2::splat(36.0));
                        ui.centered_and_justified(|ui| {
                            ui.label(
                                RichText::new(code_badge(module.code()))
                                    .strong()
                                    .color(BADGE_TEXT),
                            );
                        });
                    });
                ui.vertical(|ui| {
                    ui.label(RichText::new(&module.name).color(HEADING));
                    if let Some(code) = module.code() {
                        ui.label(RichText::new(code).monospace().size(11.0).color(MUTED));
                    }
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(RichText::new("›").color(MUTED));
                    let preview = module_preview(module);
                    if preview.more > 0 {
                        pill(ui, format!("+{} more", preview.more), MUTED, Color32::WHITE);
                    }
                    for name in preview.names.iter().rev() {
                        pill(ui, *name, MUTED, TAG_FILL);
                    }
                });
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use ngo_plan_types::NodeType;
    use pretty_assertions::assert_eq;

    fn module_with(children: usize) -> HierarchyNode {
        (0..children).fold(
            HierarchyNode::new("Module", NodeType::Module).with_code("CD.1.2"),
            |m, i| m.with_child(HierarchyNode::new(format!("Child {}", i), NodeType::Service)),
        )
    }

    #[test]
    fn preview_lists_first_three_children() {
        let module = module_with(5);
        let preview = module_preview(&module);
        assert_eq!(preview.names, vec!["Child 0", "Child 1", "Child 2"]);
        assert_eq!(preview.more, 2);
    }

    #[test]
    fn short_modules_have_no_more_tag() {
        assert_eq!(module_preview(&module_with(3)).more, 0);
        let empty = module_with(0);
        let preview = module_preview(&empty);
        assert!(preview.names.is_empty());
        assert_eq!(preview.more, 0);
    }

    #[test]
    fn badge_is_last_code_segment() {
        assert_eq!(code_badge(Some("CD.1.2")), "2");
        assert_eq!(code_badge(Some("AD")), "AD");
        assert_eq!(code_badge(Some("CD.")), "-");
        assert_eq!(code_badge(None), "-");
    }

    #[test]
    fn bundled_document_lists_five_domains() {
        let doc = PlanDocument::bundled().unwrap();
        assert_eq!(doc.hierarchy.children.len(), 5);
        assert!(doc.hierarchy.children.iter().all(|d| d.has_children()));
    }
}
