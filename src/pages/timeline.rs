//! Project timeline: one bar per delivery phase over the full week range

use egui::{Align2, Color32, FontId, Pos2, Rect, RichText, Rounding, Sense, Stroke, Ui, Vec2};
use ngo_plan_types::{PlanDocument, ProjectPhase};

use super::{card, page_header, pill, BODY, CARD_BORDER, HEADING, MUTED};

const WEEKS_PER_HEADER: u32 = 4;
const LABEL_WIDTH: f32 = 220.0;
const BAR_HEIGHT: f32 = 28.0;

const PHASE_COLORS: [Color32; 5] = [
    Color32::from_rgb(59, 130, 246),  // blue
    Color32::from_rgb(16, 185, 129),  // emerald
    Color32::from_rgb(168, 85, 247),  // purple
    Color32::from_rgb(249, 115, 22),  // orange
    Color32::from_rgb(100, 116, 139), // slate
];

/// Horizontal placement of a phase, as fractions of the timeline width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseBar {
    pub offset: f32,
    pub width: f32,
}

impl PhaseBar {
    /// Weeks are 1-based and inclusive. Bars are clamped to the timeline.
    pub fn compute(phase: &ProjectPhase, total_weeks: u32) -> Self {
        if total_weeks == 0 {
            return Self {
                offset: 0.0,
                width: 0.0,
            };
        }
        let total = total_weeks as f32;
        let offset = (phase.start_week.saturating_sub(1) as f32 / total).clamp(0.0, 1.0);
        let width = (phase.week_span() as f32 / total).clamp(0.0, 1.0 - offset);
        Self { offset, width }
    }
}

/// `W1-4`, `W5-8`, ... covering `total_weeks`
pub fn week_headers(total_weeks: u32) -> Vec<String> {
    (0..total_weeks.div_ceil(WEEKS_PER_HEADER))
        .map(|i| {
            format!(
                "W{}-{}",
                i * WEEKS_PER_HEADER + 1,
                (i + 1) * WEEKS_PER_HEADER
            )
        })
        .collect()
}

/// Colour by phase id, cycling after five phases
pub fn phase_color(id: u32) -> Color32 {
    PHASE_COLORS[(id.saturating_sub(1) as usize) % PHASE_COLORS.len()]
}

/// `$1,250,000`
pub fn format_budget(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push('$');
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn timeline_page(ui: &mut Ui, doc: &PlanDocument) {
    let total_weeks = doc.total_weeks();
    page_header(
        ui,
        "Project Timeline",
        &format!(
            "{} phases over {} weeks, total budget {}.",
            doc.phases.len(),
            total_weeks,
            format_budget(doc.total_budget())
        ),
    );

    card(ui, |ui| {
        header_row(ui, total_weeks);
        ui.separator();
        for phase in &doc.phases {
            phase_row(ui, phase, total_weeks);
            ui.add_space(10.0);
        }
        if doc.phases.is_empty() {
            ui.label(RichText::new("No phases planned.").color(MUTED));
        }
    });
}

fn header_row(ui: &mut Ui, total_weeks: u32) {
    let headers = week_headers(total_weeks);
    let (rect, _) = ui.allocate_exact_size(Vec2::new(ui.available_width(), 20.0), Sense::hover());
    let painter = ui.painter_at(rect);
    painter.text(
        Pos2::new(rect.left(), rect.center().y),
        Align2::LEFT_CENTER,
        "Phase",
        FontId::proportional(12.0),
        MUTED,
    );
    let track = Rect::from_min_max(Pos2::new(rect.left() + LABEL_WIDTH, rect.top()), rect.max);
    if headers.is_empty() {
        return;
    }
    let slot = track.width() / headers.len() as f32;
    for (i, header) in headers.iter().enumerate() {
        painter.text(
            Pos2::new(track.left() + slot * (i as f32 + 0.5), track.center().y),
            Align2::CENTER_CENTER,
            header,
            FontId::proportional(11.0),
            MUTED,
        );
    }
}

fn phase_row(ui: &mut Ui, phase: &ProjectPhase, total_weeks: u32) {
    let color = phase_color(phase.id);
    ui.horizontal(|ui| {
        ui.allocate_ui(Vec2::new(LABEL_WIDTH, BAR_HEIGHT * 2.0), |ui| {
            ui.set_width(LABEL_WIDTH);
            ui.vertical(|ui| {
                ui.label(RichText::new(&phase.name).strong().color(HEADING));
                ui.label(
                    RichText::new(format!(
                        "Weeks {}-{} · {}",
                        phase.start_week,
                        phase.end_week,
                        format_budget(phase.budget)
                    ))
                    .size(11.0)
                    .color(MUTED),
                );
            });
        });

        let (track, response) =
            ui.allocate_exact_size(Vec2::new(ui.available_width(), BAR_HEIGHT), Sense::hover());
        let painter = ui.painter_at(track);
        painter.rect_filled(track, Rounding::same(4.0), Color32::from_rgb(241, 245, 249));
        for i in 1..total_weeks.div_ceil(WEEKS_PER_HEADER) {
            let x = track.left()
                + track.width() * (i * WEEKS_PER_HEADER) as f32 / total_weeks.max(1) as f32;
            painter.vline(x, track.y_range(), Stroke::new(1.0, CARD_BORDER));
        }

        let bar = PhaseBar::compute(phase, total_weeks);
        let bar_rect = Rect::from_min_size(
            Pos2::new(track.left() + track.width() * bar.offset, track.top()),
            Vec2::new(track.width() * bar.width, BAR_HEIGHT),
        );
        painter.rect_filled(bar_rect, Rounding::same(4.0), color);
        painter.text(
            bar_rect.left_center() + Vec2::new(8.0, 0.0),
            Align2::LEFT_CENTER,
            &phase.status,
            FontId::proportional(11.0),
            Color32::WHITE,
        );
        if !phase.description.is_empty() {
            response.on_hover_text(phase.description.as_str());
        }
    });

    if !phase.deliverables.is_empty() {
        ui.horizontal_wrapped(|ui| {
            ui.add_space(LABEL_WIDTH);
            for deliverable in &phase.deliverables {
                pill(ui, deliverable, BODY, color.gamma_multiply(0.15));
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn phase(id: u32, start_week: u32, end_week: u32) -> ProjectPhase {
        ProjectPhase {
            id,
            name: format!("Phase {}", id),
            start_week,
            end_week,
            budget: 0,
            status: "Planning".into(),
            description: String::new(),
            deliverables: vec![],
        }
    }

    #[test]
    fn bars_are_placed_by_week() {
        assert_eq!(
            PhaseBar::compute(&phase(1, 1, 4), 32),
            PhaseBar {
                offset: 0.0,
                width: 0.125
            }
        );
        assert_eq!(
            PhaseBar::compute(&phase(5, 29, 32), 32),
            PhaseBar {
                offset: 0.875,
                width: 0.125
            }
        );
    }

    #[test]
    fn bars_stay_inside_the_timeline() {
        let bar = PhaseBar::compute(&phase(1, 30, 40), 32);
        assert!(bar.offset + bar.width <= 1.0);
        let empty = PhaseBar::compute(&phase(1, 1, 4), 0);
        assert_eq!(empty.width, 0.0);
    }

    #[test]
    fn headers_cover_four_week_blocks() {
        let headers = week_headers(32);
        assert_eq!(headers.len(), 8);
        assert_eq!(headers[0], "W1-4");
        assert_eq!(headers[7], "W29-32");
        assert_eq!(week_headers(30).len(), 8);
        assert!(week_headers(0).is_empty());
    }

    #[test]
    fn colours_follow_phase_id() {
        assert_eq!(phase_color(1), PHASE_COLORS[0]);
        assert_eq!(phase_color(5), PHASE_COLORS[4]);
        assert_eq!(phase_color(6), PHASE_COLORS[0]);
        assert_eq!(phase_color(0), PHASE_COLORS[0]);
    }

    #[test]
    fn budgets_get_thousands_separators() {
        assert_eq!(format_budget(0), "$0");
        assert_eq!(format_budget(999), "$999");
        assert_eq!(format_budget(150_000), "$150,000");
        assert_eq!(format_budget(1_250_000), "$1,250,000");
    }

    #[test]
    fn bundled_timeline_spans_thirty_two_weeks() {
        let doc = PlanDocument::bundled().unwrap();
        assert_eq!(doc.total_weeks(), 32);
        assert_eq!(week_headers(doc.total_weeks()).len(), 8);
    }
}
