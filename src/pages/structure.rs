//! Full stack structure tree
//!
//! Indented list rendering of the whole document, down to API operations and
//! table schemas. The page keeps its own expansion set, separate from the
//! explorer's: a row is expandable when it has children or an API / schema
//! payload, and rows above level 2 start open. Dependency chips highlight
//! their target row for two seconds, expanding its ancestors and scrolling
//! it into view.

use std::collections::HashSet;
use std::time::Duration;

use egui::{Align, Color32, Margin, RichText, Rounding, Sense, Stroke, Ui};
use egui_extras::{Column, TableBuilder};
use ngo_plan_graph::graph::colors::{method_color, node_type_color};
use ngo_plan_graph::{DependencyIndex, HighlightTimer, NodeIdx, NodeKey, TreeArena};
use ngo_plan_types::{ApiParameter, ApiSpecification, DataSchema, HierarchyNode, NodeType};

use super::{card, page_header, BODY, CARD_BORDER, HEADING, MUTED};

/// Horizontal indent per tree level
pub const INDENT_PER_LEVEL: f32 = 20.0;
/// Rows shallower than this start expanded
const DEFAULT_OPEN_LEVELS: usize = 2;
/// Descriptions are shown inline only on the top levels
const DESCRIPTION_LEVELS: usize = 3;

const HIGHLIGHT_FILL: Color32 = Color32::from_rgb(254, 252, 232); // #fefce8
const HIGHLIGHT_BORDER: Color32 = Color32::from_rgb(250, 204, 21); // #facc15
const CHIP_FILL: Color32 = Color32::from_rgb(255, 251, 235); // #fffbeb
const CHIP_TEXT: Color32 = Color32::from_rgb(180, 83, 9); // #b45309
const CODE_FILL: Color32 = Color32::from_rgb(241, 245, 249); // #f1f5f9
const TYPE_TEXT: Color32 = Color32::from_rgb(37, 99, 235);
const RESPONSE_TEXT: Color32 = Color32::from_rgb(5, 150, 105);
const REQUIRED_MARK: Color32 = Color32::from_rgb(248, 113, 113);

/// One visible line of the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructureRow {
    pub idx: NodeIdx,
    pub level: usize,
}

#[derive(Debug, Clone, PartialEq)]
enum RowAction {
    Toggle(NodeIdx),
    ActivateDependency(String),
}

pub struct StructureState {
    arena: TreeArena,
    index: DependencyIndex,
    expanded: HashSet<NodeKey>,
    highlight: HighlightTimer,
    scroll_to: Option<NodeIdx>,
}

impl StructureState {
    pub fn new(root: &HierarchyNode) -> Self {
        Self::with_highlight(root, HighlightTimer::default())
    }

    pub fn with_highlight(root: &HierarchyNode, highlight: HighlightTimer) -> Self {
        let arena = TreeArena::build(root);
        let index = DependencyIndex::build(&arena);
        let expanded = arena
            .iter()
            .filter(|(idx, n)| n.depth < DEFAULT_OPEN_LEVELS && is_expandable(&arena, *idx))
            .map(|(_, n)| n.key.clone())
            .collect();
        Self {
            arena,
            index,
            expanded,
            highlight,
            scroll_to: None,
        }
    }

    pub fn arena(&self) -> &TreeArena {
        &self.arena
    }

    pub fn is_expandable(&self, idx: NodeIdx) -> bool {
        is_expandable(&self.arena, idx)
    }

    pub fn is_expanded(&self, idx: NodeIdx) -> bool {
        self.expanded.contains(self.arena.key(idx))
    }

    /// Flip a row open or closed. Rows with nothing to show stay closed.
    /// Returns whether the row is now open.
    pub fn toggle(&mut self, idx: NodeIdx) -> bool {
        if !self.is_expandable(idx) {
            return false;
        }
        let key = self.arena.key(idx).clone();
        let open = if self.expanded.remove(&key) {
            false
        } else {
            self.expanded.insert(key);
            true
        };
        tracing::debug!(node = %self.arena.key(idx), open, "Structure row toggled");
        open
    }

    /// Rows in document order, skipping everything under a closed row
    pub fn rows(&self) -> Vec<StructureRow> {
        let mut rows = Vec::new();
        let mut stack = vec![self.arena.root()];
        while let Some(idx) = stack.pop() {
            rows.push(StructureRow {
                idx,
                level: self.arena.depth(idx),
            });
            if self.is_expanded(idx) {
                stack.extend(self.arena.children(idx).iter().rev().copied());
            }
        }
        rows
    }

    /// Highlight the row carrying `code`, open its ancestors and request a
    /// scroll to it. Returns the target row, or `None` for a code no node
    /// declares.
    pub fn activate_dependency(&mut self, code: &str, now: f64) -> Option<NodeIdx> {
        let code = code.trim();
        self.highlight.activate(code, now);
        let Some(target) = self.index.lookup(code) else {
            tracing::debug!(code, "Dependency chip points at an unknown code");
            return None;
        };
        let ancestors: Vec<NodeKey> = self
            .arena
            .ancestors(target)
            .map(|a| self.arena.key(a).clone())
            .collect();
        let revealed = ancestors
            .into_iter()
            .fold(false, |changed, key| self.expanded.insert(key) | changed);
        tracing::debug!(code, revealed, "Structure row highlighted");
        self.scroll_to = Some(target);
        Some(target)
    }

    pub fn highlighted(&self) -> Option<&str> {
        self.highlight.current()
    }

    pub fn is_highlighted(&self, idx: NodeIdx) -> bool {
        self.arena
            .node(idx)
            .code()
            .is_some_and(|code| self.highlight.is_highlighted(code))
    }

    /// Expire the highlight. Returns true when it was cleared this call.
    pub fn tick(&mut self, now: f64) -> bool {
        self.highlight.poll(now).is_some()
    }

    pub fn highlight_remaining(&self, now: f64) -> Option<f64> {
        self.highlight.remaining(now)
    }

    fn take_scroll_target(&mut self) -> Option<NodeIdx> {
        self.scroll_to.take()
    }
}

/// Child links live on the arena; the stored node payload is detached
fn is_expandable(arena: &TreeArena, idx: NodeIdx) -> bool {
    let node = arena.node(idx);
    node.has_children() || node.node.has_api_specs() || node.node.has_data_schema()
}

/// `name : type`, with a trailing `*` when required
pub fn parameter_label(parameter: &ApiParameter) -> String {
    if parameter.required {
        format!("{} : {} *", parameter.name, parameter.ty)
    } else {
        format!("{} : {}", parameter.name, parameter.ty)
    }
}

fn type_glyph(node_type: NodeType) -> &'static str {
    match node_type {
        NodeType::Platform => "◎",
        NodeType::Domain => "◆",
        NodeType::Module => "■",
        NodeType::Component => "▲",
        NodeType::Service => "⚙",
        NodeType::Data => "🗄",
    }
}

// =============================================================================
// RENDERING
// =============================================================================

pub fn structure_page(ui: &mut Ui, state: &mut StructureState) {
    let now = ui.input(|i| i.time);
    if state.tick(now) {
        ui.ctx().request_repaint();
    }

    page_header(
        ui,
        "Full Stack Structure Tree",
        "Interactive hierarchical view of the complete platform from Domains (Level 2) down to API Specifications (Level 5) and Database Schemas.",
    );
    legend(ui);
    ui.add_space(8.0);

    let scroll_target = state.take_scroll_target();
    let mut actions = Vec::new();
    card(ui, |ui| {
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for row in state.rows() {
                    render_row(ui, state, row, scroll_target == Some(row.idx), &mut actions);
                }
            });
    });

    for action in actions {
        match action {
            RowAction::Toggle(idx) => {
                state.toggle(idx);
            }
            RowAction::ActivateDependency(code) => {
                state.activate_dependency(&code, now);
                ui.ctx().request_repaint();
            }
        }
    }
    if let Some(remaining) = state.highlight_remaining(now) {
        ui.ctx()
            .request_repaint_after(Duration::from_secs_f64(remaining));
    }
}

fn legend(ui: &mut Ui) {
    egui::Frame::none()
        .fill(Color32::WHITE)
        .stroke(Stroke::new(1.0, CARD_BORDER))
        .rounding(Rounding::same(4.0))
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                for (node_type, label) in [
                    (NodeType::Domain, "Domain"),
                    (NodeType::Module, "Module"),
                    (NodeType::Service, "Service (API)"),
                    (NodeType::Data, "Data Schema"),
                ] {
                    ui.label(RichText::new(type_glyph(node_type)).color(node_type_color(node_type)));
                    ui.label(RichText::new(label).size(12.0).color(MUTED));
                    ui.add_space(12.0);
                }
            });
        });
}

fn render_row(
    ui: &mut Ui,
    state: &StructureState,
    row: StructureRow,
    scroll_here: bool,
    actions: &mut Vec<RowAction>,
) {
    let arena_node = state.arena.node(row.idx);
    let node = &arena_node.node;
    let expandable = state.is_expandable(row.idx);
    let expanded = state.is_expanded(row.idx);
    let highlighted = state.is_highlighted(row.idx);
    let indent = row.level as f32 * INDENT_PER_LEVEL;

    let (fill, stroke) = if highlighted {
        (HIGHLIGHT_FILL, Stroke::new(1.0, HIGHLIGHT_BORDER))
    } else {
        (Color32::TRANSPARENT, Stroke::NONE)
    };
    let frame = egui::Frame::none()
        .fill(fill)
        .stroke(stroke)
        .inner_margin(Margin::symmetric(4.0, 3.0))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.add_space(indent);

                let chevron = match (expandable, expanded) {
                    (false, _) => " ",
                    (true, true) => "⏷",
                    (true, false) => "⏵",
                };
                let expander = ui.add(
                    egui::Label::new(RichText::new(chevron).color(MUTED)).sense(Sense::click()),
                );
                ui.label(RichText::new(type_glyph(node.node_type)).color(node_type_color(node.node_type)));
                let name = ui.add(
                    egui::Label::new(RichText::new(&node.name).strong().color(HEADING))
                        .sense(Sense::click()),
                );
                if expandable && (expander.clicked() || name.clicked()) {
                    actions.push(RowAction::Toggle(row.idx));
                }

                if let Some(code) = node.code() {
                    super::pill(ui, code, MUTED, CODE_FILL);
                }
                if row.level < DESCRIPTION_LEVELS {
                    if let Some(description) = node.description.as_deref() {
                        ui.add(
                            egui::Label::new(
                                RichText::new(format!("- {}", description))
                                    .size(11.0)
                                    .color(MUTED),
                            )
                            .truncate(),
                        );
                    }
                }

                if !node.dependencies.is_empty() {
                    ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                        for dep in node.dependencies.iter().rev() {
                            let chip = egui::Button::new(
                                RichText::new(format!("🔗 {}", dep)).size(10.0).color(CHIP_TEXT),
                            )
                            .fill(CHIP_FILL)
                            .small();
                            if ui
                                .add(chip)
                                .on_hover_text(format!("Depends on {}", dep))
                                .clicked()
                            {
                                actions.push(RowAction::ActivateDependency(dep.clone()));
                            }
                        }
                    });
                }
            });
        });
    if scroll_here {
        frame.response.scroll_to_me(Some(Align::Center));
    }

    if !expanded {
        return;
    }
    let payload_margin = Margin {
        left: indent + 32.0,
        right: 16.0,
        top: 4.0,
        bottom: 6.0,
    };
    if node.node_type == NodeType::Service && node.has_api_specs() {
        egui::Frame::none().outer_margin(payload_margin).show(ui, |ui| {
            ui.push_id(("api", row.idx.index()), |ui| api_table(ui, &node.api_specs));
        });
    }
    if node.node_type == NodeType::Data {
        if let Some(schema) = &node.data_schema {
            egui::Frame::none().outer_margin(payload_margin).show(ui, |ui| {
                ui.push_id(("schema", row.idx.index()), |ui| schema_table(ui, schema));
            });
        }
    }
}

fn header_cell(ui: &mut Ui, title: &str) {
    ui.label(RichText::new(title).size(11.0).strong().color(MUTED));
}

fn api_table(ui: &mut Ui, specs: &[ApiSpecification]) {
    ui.label(
        RichText::new("⚙ API Specifications (Level 5 Detail)")
            .size(12.0)
            .strong()
            .color(node_type_color(NodeType::Service)),
    );
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .cell_layout(egui::Layout::left_to_right(Align::Center))
        .column(Column::exact(64.0))
        .column(Column::auto().at_least(160.0))
        .column(Column::auto().at_least(180.0))
        .column(Column::auto().at_least(160.0))
        .column(Column::remainder())
        .header(22.0, |mut header| {
            for title in ["Method", "Endpoint", "Summary", "Parameters", "Response"] {
                header.col(|ui| header_cell(ui, title));
            }
        })
        .body(|mut body| {
            for spec in specs {
                let height = 20.0 * spec.parameters.len().max(1) as f32;
                body.row(height, |mut row| {
                    row.col(|ui| {
                        egui::Frame::none()
                            .fill(method_color(spec.method))
                            .rounding(Rounding::same(3.0))
                            .inner_margin(Margin::symmetric(5.0, 1.0))
                            .show(ui, |ui| {
                                ui.label(
                                    RichText::new(spec.method.as_str())
                                        .size(10.0)
                                        .strong()
                                        .color(Color32::WHITE),
                                );
                            });
                    });
                    row.col(|ui| {
                        ui.label(RichText::new(&spec.endpoint).monospace().color(BODY));
                    });
                    row.col(|ui| {
                        ui.label(RichText::new(&spec.summary).size(12.0).color(BODY));
                    });
                    row.col(|ui| {
                        ui.vertical(|ui| {
                            for parameter in &spec.parameters {
                                let label = parameter_label(parameter);
                                let text = RichText::new(label).monospace().size(11.0);
                                let text = if parameter.required {
                                    text.color(REQUIRED_MARK)
                                } else {
                                    text.color(TYPE_TEXT)
                                };
                                let response = ui.label(text);
                                if let Some(description) = &parameter.description {
                                    response.on_hover_text(description.as_str());
                                }
                            }
                        });
                    });
                    row.col(|ui| {
                        ui.label(RichText::new(&spec.response).monospace().color(RESPONSE_TEXT));
                    });
                });
            }
        });
}

fn schema_table(ui: &mut Ui, schema: &DataSchema) {
    ui.label(
        RichText::new(format!("🗄 Database Schema: {}", schema.table_name))
            .size(12.0)
            .strong()
            .color(HEADING),
    );
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .cell_layout(egui::Layout::left_to_right(Align::Center))
        .column(Column::auto().at_least(160.0))
        .column(Column::auto().at_least(140.0))
        .column(Column::remainder())
        .header(22.0, |mut header| {
            for title in ["Column Name", "Data Type", "Constraints"] {
                header.col(|ui| header_cell(ui, title));
            }
        })
        .body(|mut body| {
            for column in &schema.columns {
                body.row(22.0, |mut row| {
                    row.col(|ui| {
                        ui.label(RichText::new(&column.name).monospace().color(BODY));
                    });
                    row.col(|ui| {
                        ui.label(RichText::new(&column.ty).monospace().color(TYPE_TEXT));
                    });
                    row.col(|ui| {
                        for constraint in &column.constraints {
                            super::pill(ui, constraint, CHIP_TEXT, CHIP_FILL);
                        }
                    });
                });
            }
        });
}
