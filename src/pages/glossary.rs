//! Glossary with text search and a category filter

use egui::{Color32, RichText, Ui};
use ngo_plan_types::{GlossaryTerm, PlanDocument};

use super::{card, page_header, pill, BODY, HEADING, MUTED};

pub const ALL_CATEGORIES: &str = "All";
const CARDS_PER_ROW: usize = 3;
const LINK: Color32 = Color32::from_rgb(59, 130, 246);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlossaryState {
    pub query: String,
    pub category: String,
}

impl Default for GlossaryState {
    fn default() -> Self {
        Self {
            query: String::new(),
            category: ALL_CATEGORIES.to_string(),
        }
    }
}

/// "All" followed by each category in the order it first appears
pub fn categories(terms: &[GlossaryTerm]) -> Vec<&str> {
    let mut out = vec![ALL_CATEGORIES];
    for term in terms {
        if !out.contains(&term.category.as_str()) {
            out.push(term.category.as_str());
        }
    }
    out
}

/// Terms whose name or definition contains `query` (case-insensitive) and
/// whose category matches, in document order
pub fn filter_terms<'a>(terms: &'a [GlossaryTerm], query: &str, category: &str) -> Vec<&'a GlossaryTerm> {
    let needle = query.trim().to_lowercase();
    terms
        .iter()
        .filter(|t| category == ALL_CATEGORIES || t.category == category)
        .filter(|t| {
            needle.is_empty()
                || t.term.to_lowercase().contains(&needle)
                || t.definition.to_lowercase().contains(&needle)
        })
        .collect()
}

pub fn glossary_page(ui: &mut Ui, doc: &PlanDocument, state: &mut GlossaryState) {
    ui.horizontal(|ui| {
        ui.vertical(|ui| {
            page_header(
                ui,
                "Glossary of Terms",
                "Definitions for healthcare, technical, and platform-specific terminology.",
            );
        });
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            egui::ComboBox::from_id_salt("glossary_category")
                .selected_text(state.category.as_str())
                .show_ui(ui, |ui| {
                    for category in categories(&doc.glossary) {
                        ui.selectable_value(&mut state.category, category.to_string(), category);
                    }
                });
            ui.add(
                egui::TextEdit::singleline(&mut state.query)
                    .hint_text("🔍 Search terms...")
                    .desired_width(240.0),
            );
        });
    });

    let filtered = filter_terms(&doc.glossary, &state.query, &state.category);
    if filtered.is_empty() {
        ui.add_space(48.0);
        ui.vertical_centered(|ui| {
            ui.label(RichText::new("No terms found matching your criteria.").color(MUTED));
        });
        return;
    }

    let mut follow = None;
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for chunk in filtered.chunks(CARDS_PER_ROW) {
                ui.columns(CARDS_PER_ROW, |cols| {
                    for (col, term) in cols.iter_mut().zip(chunk) {
                        if let Some(related) = term_card(col, term) {
                            follow = Some(related);
                        }
                    }
                });
                ui.add_space(12.0);
            }
        });

    if let Some(related) = follow {
        tracing::debug!(term = %related, "Glossary search follows related term");
        state.query = related;
        state.category = ALL_CATEGORIES.to_string();
    }
}

/// Returns a related term the user clicked
fn term_card(ui: &mut Ui, term: &GlossaryTerm) -> Option<String> {
    card(ui, |ui| {
        ui.horizontal(|ui| {
            ui.label(RichText::new(&term.term).size(16.0).strong().color(HEADING));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                pill(
                    ui,
                    term.category.to_uppercase(),
                    MUTED,
                    Color32::from_rgb(241, 245, 249),
                );
            });
        });
        if let Some(level) = &term.hierarchy {
            ui.label(RichText::new(format!("🏷 {}", level)).size(11.0).color(LINK));
        }
        ui.label(RichText::new(&term.definition).size(13.0).color(BODY));

        let mut clicked = None;
        if !term.related.is_empty() {
            ui.separator();
            ui.horizontal_wrapped(|ui| {
                ui.label(RichText::new("Related:").size(11.0).color(MUTED));
                for related in &term.related {
                    if ui
                        .link(RichText::new(related).size(11.0).color(LINK))
                        .clicked()
                    {
                        clicked = Some(related.clone());
                    }
                }
            });
        }
        clicked
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn term(term: &str, definition: &str, category: &str) -> GlossaryTerm {
        GlossaryTerm {
            term: term.into(),
            definition: definition.into(),
            category: category.into(),
            hierarchy: None,
            related: vec![],
        }
    }

    fn sample() -> Vec<GlossaryTerm> {
        vec![
            term("FHIR", "Interoperability standard for health data", "Integration"),
            term("Patient", "An individual receiving care", "Healthcare"),
            term("HL7", "Messaging standard", "Integration"),
            term("RBAC", "Role based access control", "Security"),
        ]
    }

    fn names<'a>(terms: &[&'a GlossaryTerm]) -> Vec<&'a str> {
        terms.iter().map(|t| t.term.as_str()).collect()
    }

    #[test]
    fn categories_keep_first_seen_order() {
        assert_eq!(
            categories(&sample()),
            vec!["All", "Integration", "Healthcare", "Security"]
        );
        assert_eq!(categories(&[]), vec!["All"]);
    }

    #[test]
    fn search_matches_term_or_definition_ignoring_case() {
        let terms = sample();
        assert_eq!(names(&filter_terms(&terms, "fhir", ALL_CATEGORIES)), vec!["FHIR"]);
        assert_eq!(
            names(&filter_terms(&terms, "STANDARD", ALL_CATEGORIES)),
            vec!["FHIR", "HL7"]
        );
        assert_eq!(filter_terms(&terms, "  ", ALL_CATEGORIES).len(), 4);
    }

    #[test]
    fn category_and_query_combine() {
        let terms = sample();
        assert_eq!(names(&filter_terms(&terms, "", "Integration")), vec!["FHIR", "HL7"]);
        assert_eq!(names(&filter_terms(&terms, "messaging", "Integration")), vec!["HL7"]);
        assert!(filter_terms(&terms, "messaging", "Security").is_empty());
        assert!(filter_terms(&terms, "", "Unknown").is_empty());
    }

    #[test]
    fn bundled_categories_start_with_hierarchy() {
        let doc = PlanDocument::bundled().unwrap();
        assert_eq!(
            categories(&doc.glossary),
            vec!["All", "Hierarchy", "Healthcare", "Integration", "Technical", "Security"]
        );
    }
}
