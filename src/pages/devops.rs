//! Step-by-step DevOps guides with copyable commands

use std::time::Duration;

use egui::{Color32, RichText, Rounding, Stroke, Ui, Vec2};
use ngo_plan_graph::HighlightTimer;
use ngo_plan_types::{DevOpsGuide, DevOpsStep, PlanDocument};

use super::{card, page_header, ACCENT, BODY, CARD_BORDER, HEADING, MUTED};

const COPY_FEEDBACK_SECS: f64 = 2.0;

const TERMINAL_BG: Color32 = Color32::from_rgb(15, 23, 42); // #0f172a
const TERMINAL_TEXT: Color32 = Color32::from_rgb(74, 222, 128); // #4ade80
const TIP_BG: Color32 = Color32::from_rgb(255, 251, 235); // #fffbeb
const TIP_TEXT: Color32 = Color32::from_rgb(180, 83, 9); // #b45309
const DONE_BG: Color32 = Color32::from_rgb(236, 253, 245); // #ecfdf5
const DONE_TEXT: Color32 = Color32::from_rgb(4, 120, 87); // #047857

/// "Copied" marker for the most recently copied command. A second copy
/// replaces the first and restarts the countdown.
#[derive(Debug, Clone)]
pub struct CopyFeedback {
    timer: HighlightTimer,
}

impl Default for CopyFeedback {
    fn default() -> Self {
        Self {
            timer: HighlightTimer::new(COPY_FEEDBACK_SECS),
        }
    }
}

impl CopyFeedback {
    pub fn copied(&mut self, command: &str, now: f64) {
        self.timer.activate(command, now);
    }

    pub fn is_copied(&self, command: &str) -> bool {
        self.timer.is_highlighted(command)
    }

    /// Returns true when the marker cleared on this call
    pub fn tick(&mut self, now: f64) -> bool {
        self.timer.poll(now).is_some()
    }

    pub fn remaining(&self, now: f64) -> Option<f64> {
        self.timer.remaining(now)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DevOpsState {
    /// Selected guide id; `None` shows the first guide
    pub active_guide: Option<String>,
    pub copy: CopyFeedback,
}

impl DevOpsState {
    /// The selected guide, falling back to the first when the id is unknown
    pub fn active<'a>(&self, guides: &'a [DevOpsGuide]) -> Option<&'a DevOpsGuide> {
        self.active_guide
            .as_deref()
            .and_then(|id| guides.iter().find(|g| g.id == id))
            .or_else(|| guides.first())
    }
}

fn guide_icon(icon: &str) -> &'static str {
    match icon {
        "Monitor" => "🖥",
        "Github" => "🐙",
        "Cloud" => "☁",
        _ => "▶",
    }
}

pub fn devops_page(ui: &mut Ui, doc: &PlanDocument, state: &mut DevOpsState) {
    let now = ui.input(|i| i.time);
    if state.copy.tick(now) {
        ui.ctx().request_repaint();
    }

    page_header(
        ui,
        "DevOps Guidelines",
        "Step-by-step instructions for local development and deployment.",
    );

    let guides = &doc.devops_guides;
    let Some(active) = state.active(guides) else {
        ui.label(RichText::new("No guides available.").color(MUTED));
        return;
    };

    ui.horizontal(|ui| {
        for guide in guides {
            let selected = guide.id == active.id;
            let text = RichText::new(format!("{} {}", guide_icon(&guide.icon), guide.title));
            let button = if selected {
                egui::Button::new(text.color(Color32::WHITE)).fill(ACCENT)
            } else {
                egui::Button::new(text.color(BODY))
                    .fill(Color32::WHITE)
                    .stroke(Stroke::new(1.0, CARD_BORDER))
            };
            if ui.add(button).clicked() && !selected {
                tracing::debug!(guide = %guide.id, "DevOps guide selected");
                state.active_guide = Some(guide.id.clone());
            }
        }
    });
    ui.separator();

    let mut copy_request = None;
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            guide_header(ui, active);
            ui.add_space(12.0);
            for (number, step) in active.steps.iter().enumerate() {
                if let Some(command) = step_card(ui, number + 1, step, &state.copy) {
                    copy_request = Some(command);
                }
                ui.add_space(10.0);
            }
            completion_card(ui, active);
        });

    if let Some(command) = copy_request {
        ui.output_mut(|o| o.copied_text = command.clone());
        state.copy.copied(&command, now);
        ui.ctx().request_repaint();
    }
    if let Some(remaining) = state.copy.remaining(now) {
        ui.ctx()
            .request_repaint_after(Duration::from_secs_f64(remaining));
    }
}

fn guide_header(ui: &mut Ui, guide: &DevOpsGuide) {
    egui::Frame::none()
        .fill(Color32::from_rgb(239, 246, 255))
        .stroke(Stroke::new(1.0, Color32::from_rgb(219, 234, 254)))
        .rounding(Rounding::same(8.0))
        .inner_margin(16.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(RichText::new(guide_icon(&guide.icon)).size(24.0));
                ui.vertical(|ui| {
                    ui.label(
                        RichText::new(&guide.title)
                            .size(16.0)
                            .strong()
                            .color(Color32::from_rgb(30, 58, 138)),
                    );
                    ui.label(
                        RichText::new(&guide.description).color(Color32::from_rgb(29, 78, 216)),
                    );
                });
            });
        });
}

/// Returns the command to copy when its button was clicked
fn step_card(ui: &mut Ui, number: usize, step: &DevOpsStep, copy: &CopyFeedback) -> Option<String> {
    let mut clicked = None;
    ui.horizontal_top(|ui| {
        let (bubble, _) = ui.allocate_exact_size(Vec2::splat(32.0), egui::Sense::hover());
        ui.painter().circle_filled(bubble.center(), 16.0, HEADING);
        ui.painter().text(
            bubble.center(),
            egui::Align2::CENTER_CENTER,
            number.to_string(),
            egui::FontId::proportional(13.0),
            Color32::WHITE,
        );

        ui.vertical(|ui| {
            card(ui, |ui| {
                ui.label(RichText::new(&step.title).size(15.0).strong().color(HEADING));
                ui.label(RichText::new(&step.description).color(BODY));

                if let Some(command) = &step.command {
                    ui.add_space(8.0);
                    if command_block(ui, command, copy.is_copied(command)) {
                        clicked = Some(command.clone());
                    }
                }
                if let Some(tip) = &step.tip {
                    ui.add_space(8.0);
                    egui::Frame::none()
                        .fill(TIP_BG)
                        .rounding(Rounding::same(6.0))
                        .inner_margin(10.0)
                        .show(ui, |ui| {
                            ui.set_width(ui.available_width());
                            ui.label(RichText::new(format!("⚠ {}", tip)).color(TIP_TEXT));
                        });
                }
                if let Some(image) = &step.image {
                    ui.add_space(8.0);
                    egui::Frame::none()
                        .fill(Color32::from_rgb(241, 245, 249))
                        .stroke(Stroke::new(1.0, Color32::from_rgb(203, 213, 225)))
                        .rounding(Rounding::same(6.0))
                        .inner_margin(40.0)
                        .show(ui, |ui| {
                            ui.set_width(ui.available_width());
                            ui.vertical_centered(|ui| {
                                ui.label(
                                    RichText::new(format!("Image: {}.png", image))
                                        .monospace()
                                        .size(11.0)
                                        .color(MUTED),
                                );
                            });
                        });
                }
            });
        });
    });
    clicked
}

/// Returns true when the copy button was clicked
fn command_block(ui: &mut Ui, command: &str, copied: bool) -> bool {
    egui::Frame::none()
        .fill(TERMINAL_BG)
        .rounding(Rounding::same(6.0))
        .inner_margin(12.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            let mut clicked = false;
            ui.horizontal_top(|ui| {
                ui.vertical(|ui| {
                    for (i, line) in command.lines().enumerate() {
                        let prompt = if i == 0 { "$ " } else { "  " };
                        ui.horizontal(|ui| {
                            ui.spacing_mut().item_spacing.x = 0.0;
                            ui.label(RichText::new(prompt).monospace().color(MUTED));
                            ui.label(RichText::new(line).monospace().color(TERMINAL_TEXT));
                        });
                    }
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                    let (label, color) = if copied {
                        ("✔", TERMINAL_TEXT)
                    } else {
                        ("📋", Color32::from_rgb(203, 213, 225))
                    };
                    clicked = ui
                        .add(egui::Button::new(RichText::new(label).color(color)).small())
                        .on_hover_text("Copy command")
                        .clicked();
                });
            });
            clicked
        })
        .inner
}

fn completion_card(ui: &mut Ui, guide: &DevOpsGuide) {
    egui::Frame::none()
        .fill(DONE_BG)
        .rounding(Rounding::same(8.0))
        .inner_margin(20.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.vertical_centered(|ui| {
                ui.label(RichText::new("✔").size(22.0).color(DONE_TEXT));
                ui.label(
                    RichText::new("Ready to Go!")
                        .size(16.0)
                        .strong()
                        .color(Color32::from_rgb(6, 78, 59)),
                );
                ui.label(RichText::new(format!(
                    "You have completed the {} guide. If you encounter any issues, check the repository issues tab or consult the documentation.",
                    guide.title
                ))
                .color(DONE_TEXT));
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn copied_marker_clears_after_two_seconds() {
        let mut copy = CopyFeedback::default();
        copy.copied("npm install", 1.0);
        assert!(copy.is_copied("npm install"));
        assert!(!copy.is_copied("npm start"));
        assert!(!copy.tick(2.9));
        assert!(copy.tick(3.0));
        assert!(!copy.is_copied("npm install"));
    }

    #[test]
    fn later_copy_replaces_earlier_one() {
        let mut copy = CopyFeedback::default();
        copy.copied("npm install", 1.0);
        copy.copied("npm start", 2.5);
        assert!(!copy.is_copied("npm install"));
        assert!(!copy.tick(4.0));
        assert!(copy.is_copied("npm start"));
        assert_eq!(copy.remaining(4.0), Some(0.5));
    }

    #[test]
    fn active_guide_falls_back_to_first() {
        let doc = PlanDocument::bundled().unwrap();
        let mut state = DevOpsState::default();
        assert_eq!(state.active(&doc.devops_guides).map(|g| g.id.as_str()), Some("local"));

        state.active_guide = Some("github".into());
        assert_eq!(state.active(&doc.devops_guides).map(|g| g.id.as_str()), Some("github"));

        state.active_guide = Some("missing".into());
        assert_eq!(state.active(&doc.devops_guides).map(|g| g.id.as_str()), Some("local"));
        assert!(state.active(&[]).is_none());
    }
}
