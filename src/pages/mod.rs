//! Pages
//!
//! Each page is a function over the plan document plus, where a page has
//! transient UI state, a state struct owned by the app. Pages never mutate
//! the document. Actions are returned as values, never via callbacks.

pub mod devops;
pub mod glossary;
pub mod hierarchy;
pub mod modules;
pub mod overview;
pub mod structure;
pub mod timeline;

pub use devops::{devops_page, CopyFeedback, DevOpsState};
pub use glossary::{glossary_page, GlossaryState};
pub use hierarchy::hierarchy_page;
pub use modules::modules_page;
pub use overview::overview_page;
pub use structure::{structure_page, StructureState};
pub use timeline::timeline_page;

use egui::{Color32, RichText, Rounding, Stroke, Ui};

// =============================================================================
// PALETTE
// =============================================================================

pub const PAGE_BG: Color32 = Color32::from_rgb(248, 250, 252); // #f8fafc
pub const CARD_BG: Color32 = Color32::WHITE;
pub const CARD_BORDER: Color32 = Color32::from_rgb(226, 232, 240); // #e2e8f0
pub const HEADING: Color32 = Color32::from_rgb(15, 23, 42); // #0f172a
pub const BODY: Color32 = Color32::from_rgb(71, 85, 105); // #475569
pub const MUTED: Color32 = Color32::from_rgb(100, 116, 139); // #64748b
pub const ACCENT: Color32 = Color32::from_rgb(37, 99, 235); // #2563eb
pub const ACCENT_SOFT: Color32 = Color32::from_rgb(239, 246, 255); // #eff6ff

/// Parse `#rrggbb`; anything else falls back to slate
pub fn hex_color(hex: &str) -> Color32 {
    Color32::from_hex(hex.trim()).unwrap_or(MUTED)
}

// =============================================================================
// BUILDING BLOCKS
// =============================================================================

pub fn page_header(ui: &mut Ui, title: &str, subtitle: &str) {
    ui.label(RichText::new(title).size(22.0).strong().color(HEADING));
    if !subtitle.is_empty() {
        ui.label(RichText::new(subtitle).color(MUTED));
    }
    ui.add_space(12.0);
}

pub fn card_frame() -> egui::Frame {
    egui::Frame::none()
        .fill(CARD_BG)
        .stroke(Stroke::new(1.0, CARD_BORDER))
        .rounding(Rounding::same(8.0))
        .inner_margin(16.0)
}

/// White rounded card filling the available width
pub fn card<R>(ui: &mut Ui, add_contents: impl FnOnce(&mut Ui) -> R) -> R {
    card_frame()
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            add_contents(ui)
        })
        .inner
}

/// Small rounded tag
pub fn pill(ui: &mut Ui, text: impl Into<String>, fg: Color32, bg: Color32) -> egui::Response {
    egui::Frame::none()
        .fill(bg)
        .rounding(Rounding::same(10.0))
        .inner_margin(egui::Margin::symmetric(8.0, 2.0))
        .show(ui, |ui| {
            ui.label(RichText::new(text.into()).size(11.0).color(fg));
        })
        .response
}
