//! Executive summary: key metrics, module distribution chart, status and
//! domain cards

use egui::{Align2, Color32, FontId, Pos2, Rect, RichText, Rounding, Sense, Stroke, Ui, Vec2};
use ngo_plan_types::{DomainInfo, PlanDocument};

use super::{card, card_frame, hex_color, page_header, BODY, CARD_BORDER, HEADING, MUTED};

/// Bar colours, cycled by domain position
const BAR_COLORS: [Color32; 5] = [
    Color32::from_rgb(59, 130, 246),  // #3b82f6
    Color32::from_rgb(16, 185, 129),  // #10b981
    Color32::from_rgb(168, 85, 247),  // #a855f7
    Color32::from_rgb(249, 115, 22),  // #f97316
    Color32::from_rgb(100, 116, 139), // #64748b
];

const CHART_HEIGHT: f32 = 220.0;
const PROJECT_PROGRESS: f32 = 0.05;

/// One bar of the module distribution chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartBar {
    pub label: String,
    pub modules: u32,
    /// Height relative to the tallest bar, 0..=1
    pub fraction: f32,
    pub color: Color32,
}

pub fn chart_bars(domains: &[DomainInfo]) -> Vec<ChartBar> {
    let max = domains.iter().map(|d| d.modules).max().unwrap_or(0);
    domains
        .iter()
        .enumerate()
        .map(|(i, d)| ChartBar {
            label: d.name.clone(),
            modules: d.modules,
            fraction: if max == 0 {
                0.0
            } else {
                d.modules as f32 / max as f32
            },
            color: BAR_COLORS[i % BAR_COLORS.len()],
        })
        .collect()
}

pub fn overview_page(ui: &mut Ui, doc: &PlanDocument) {
    page_header(
        ui,
        "Executive Summary",
        "High-level overview of the NGO Operations Platform project plan and architecture.",
    );

    metric_cards(ui, doc);
    ui.add_space(16.0);

    ui.columns(2, |cols| {
        card(&mut cols[0], |ui| {
            ui.label(
                RichText::new("Module Distribution by Domain")
                    .size(16.0)
                    .strong()
                    .color(HEADING),
            );
            ui.add_space(8.0);
            paint_chart(ui, &chart_bars(&doc.domains));
        });
        status_card(&mut cols[1], doc);
        cols[1].add_space(12.0);
        highlights_card(&mut cols[1], doc);
    });

    ui.add_space(16.0);
    domain_cards(ui, &doc.domains);
}

fn metric_cards(ui: &mut Ui, doc: &PlanDocument) {
    if doc.metrics.is_empty() {
        return;
    }
    ui.columns(doc.metrics.len(), |cols| {
        for (col, metric) in cols.iter_mut().zip(&doc.metrics) {
            card(col, |ui| {
                ui.label(RichText::new(&metric.label).size(12.0).color(MUTED));
                ui.label(RichText::new(&metric.value).size(20.0).strong().color(HEADING));
            });
        }
    });
}

fn paint_chart(ui: &mut Ui, bars: &[ChartBar]) {
    let (rect, _) = ui.allocate_exact_size(
        Vec2::new(ui.available_width(), CHART_HEIGHT),
        Sense::hover(),
    );
    let painter = ui.painter_at(rect);
    let plot = Rect::from_min_max(
        rect.min + Vec2::new(8.0, 10.0),
        rect.max - Vec2::new(8.0, 24.0),
    );

    for step in 0..=4 {
        let y = plot.bottom() - plot.height() * step as f32 / 4.0;
        painter.hline(plot.x_range(), y, Stroke::new(1.0, CARD_BORDER));
    }
    if bars.is_empty() {
        return;
    }

    let slot = plot.width() / bars.len() as f32;
    for (i, bar) in bars.iter().enumerate() {
        let center_x = plot.left() + slot * (i as f32 + 0.5);
        let height = plot.height() * bar.fraction;
        let bar_rect = Rect::from_min_max(
            Pos2::new(center_x - slot * 0.3, plot.bottom() - height),
            Pos2::new(center_x + slot * 0.3, plot.bottom()),
        );
        painter.rect_filled(
            bar_rect,
            Rounding {
                nw: 4.0,
                ne: 4.0,
                sw: 0.0,
                se: 0.0,
            },
            bar.color,
        );
        painter.text(
            Pos2::new(center_x, plot.bottom() + 6.0),
            Align2::CENTER_TOP,
            &bar.label,
            FontId::proportional(11.0),
            MUTED,
        );
        ui.interact(bar_rect, ui.id().with(("chart_bar", i)), Sense::hover())
            .on_hover_text(format!("{}: {} modules", bar.label, bar.modules));
    }
}

fn status_card(ui: &mut Ui, doc: &PlanDocument) {
    let dark = Color32::from_rgb(15, 23, 42);
    card_frame().fill(dark).stroke(Stroke::NONE).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.label(
            RichText::new("Project Status: Planning")
                .size(18.0)
                .strong()
                .color(Color32::WHITE),
        );
        ui.label(
            RichText::new(format!(
                "The project is currently in the initial planning phase (Week 0). The roadmap spans {} weeks with {} distinct phases.",
                doc.total_weeks(),
                doc.phases.len()
            ))
            .color(Color32::from_rgb(203, 213, 225)),
        );
        ui.add_space(8.0);
        ui.add(
            egui::ProgressBar::new(PROJECT_PROGRESS)
                .fill(Color32::from_rgb(59, 130, 246))
                .desired_height(6.0),
        );
        ui.horizontal(|ui| {
            let muted = Color32::from_rgb(148, 163, 184);
            ui.label(RichText::new("Started").size(11.0).color(muted));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    RichText::new(format!("{:.0}% Complete", PROJECT_PROGRESS * 100.0))
                        .size(11.0)
                        .color(muted),
                );
            });
        });
    });
}

fn highlights_card(ui: &mut Ui, doc: &PlanDocument) {
    let modules: u32 = doc.domains.iter().map(|d| d.modules).sum();
    let highlights = [
        format!(
            "Micro-modular design with {} specialized modules ensures scalability.",
            modules
        ),
        "Canonical Indexing System (e.g., CD.1.1) provides unique identification for all components."
            .to_string(),
        "Full compliance with FHIR and HL7 standards for interoperability.".to_string(),
    ];
    card(ui, |ui| {
        ui.label(
            RichText::new("Architecture Highlights")
                .size(16.0)
                .strong()
                .color(HEADING),
        );
        ui.add_space(6.0);
        for text in &highlights {
            ui.horizontal_wrapped(|ui| {
                ui.label(RichText::new("↗").color(Color32::from_rgb(34, 197, 94)));
                ui.label(RichText::new(text).size(13.0).color(BODY));
            });
        }
    });
}

fn domain_cards(ui: &mut Ui, domains: &[DomainInfo]) {
    if domains.is_empty() {
        return;
    }
    ui.columns(domains.len(), |cols| {
        for (col, domain) in cols.iter_mut().zip(domains) {
            card(col, |ui| {
                let (dot, _) = ui.allocate_exact_size(Vec2::splat(12.0), Sense::hover());
                ui.painter()
                    .circle_filled(dot.center(), 6.0, hex_color(&domain.color));
                ui.label(RichText::new(&domain.name).strong().color(HEADING));
                ui.label(RichText::new(&domain.description).size(11.0).color(MUTED));
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    ui.label(RichText::new(&domain.id).size(11.0).color(MUTED));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            RichText::new(format!("{} Modules", domain.modules))
                                .size(11.0)
                                .color(MUTED),
                        );
                    });
                });
            });
        }
    });
}
