//! Interaction controller
//!
//! Single writer of the explorer state: expansion set, selection, active
//! detail tab, dependency overlay and the transient highlight. Every
//! transition that changes visibility recomputes the layout in the same call,
//! so readers always see a state and the layout derived from it together.
//!
//! # EGUI-RULES Compliance
//! - Transitions return a [`Transition`] value; nothing is called back
//! - Time is passed in (`now`, seconds) and polled through [`InteractionController::tick`]

use ngo_plan_types::HierarchyNode;

use super::arena::{NodeIdx, NodeKey, TreeArena};
use super::detail::{self, DetailPlan, DetailTab};
use super::diff::LayoutDiff;
use super::expansion::ExpansionState;
use super::index::DependencyIndex;
use super::layout::{LayoutFrame, TreeLayoutEngine};
use crate::config::{global_config, GraphSettings};

// =============================================================================
// HIGHLIGHT TIMER
// =============================================================================

/// A highlighted code with a clear deadline. Activating again replaces both
/// the code and the deadline, so an earlier clear can never fire late.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightTimer {
    code: Option<String>,
    deadline: Option<f64>,
    duration: f64,
}

impl Default for HighlightTimer {
    fn default() -> Self {
        Self::new(global_config().interaction.highlight_clear_secs)
    }
}

impl HighlightTimer {
    pub fn new(duration_secs: f64) -> Self {
        Self {
            code: None,
            deadline: None,
            duration: duration_secs.max(0.0),
        }
    }

    pub fn activate(&mut self, code: impl Into<String>, now: f64) {
        self.code = Some(code.into());
        self.deadline = Some(now + self.duration);
    }

    pub fn current(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn is_highlighted(&self, code: &str) -> bool {
        self.code.as_deref() == Some(code)
    }

    /// Seconds until the highlight clears
    pub fn remaining(&self, now: f64) -> Option<f64> {
        self.deadline.map(|d| (d - now).max(0.0))
    }

    /// Clear the highlight if its deadline has passed. Returns the code that
    /// expired.
    pub fn poll(&mut self, now: f64) -> Option<String> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.code.take()
            }
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        self.code = None;
        self.deadline = None;
    }
}

// =============================================================================
// TRANSITIONS
// =============================================================================

/// A visibility change: the diff from the previous layout and the node whose
/// toggle caused it (entering nodes grow out of it)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Relayout {
    pub diff: LayoutDiff,
    pub origin: Option<NodeKey>,
}

/// What the view should do after a transition
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transition {
    pub relayout: Option<Relayout>,
    /// Bring this node into view
    pub focus: Option<NodeKey>,
    /// Return the camera to its initial placement
    pub reset_view: bool,
}

impl Transition {
    pub fn is_noop(&self) -> bool {
        self.relayout.is_none() && self.focus.is_none() && !self.reset_view
    }
}

// =============================================================================
// CONTROLLER
// =============================================================================

#[derive(Debug, Clone)]
pub struct InteractionController {
    arena: TreeArena,
    index: DependencyIndex,
    engine: TreeLayoutEngine,
    initial_depth: usize,
    reveal_collapsed_targets: bool,

    expansion: ExpansionState,
    selected: Option<NodeIdx>,
    active_tab: DetailTab,
    dependency_overlay: bool,
    highlight: HighlightTimer,

    frame: LayoutFrame,
    previous_frame: Option<LayoutFrame>,
}

impl InteractionController {
    pub fn new(root: &HierarchyNode) -> Self {
        Self::with_settings(root, global_config())
    }

    pub fn with_settings(root: &HierarchyNode, settings: &GraphSettings) -> Self {
        let arena = TreeArena::build(root);
        let index = DependencyIndex::build(&arena);
        let engine = TreeLayoutEngine::from_settings(&settings.layout);
        let initial_depth = settings.layout.default_expanded_depth;
        let expansion = ExpansionState::initial(&arena, initial_depth);
        let frame = engine.compute(&arena, &index, &expansion, false);

        tracing::info!(
            nodes = arena.len(),
            codes = index.code_count(),
            visible = frame.nodes.len(),
            "Hierarchy explorer ready"
        );

        Self {
            arena,
            index,
            engine,
            initial_depth,
            reveal_collapsed_targets: settings.interaction.reveal_collapsed_targets,
            expansion,
            selected: None,
            active_tab: DetailTab::Info,
            dependency_overlay: false,
            highlight: HighlightTimer::new(settings.interaction.highlight_clear_secs),
            frame,
            previous_frame: None,
        }
    }

    /// Auto-expand collapsed ancestors when a chip targets a hidden node
    pub fn with_reveal_collapsed_targets(mut self, reveal: bool) -> Self {
        self.reveal_collapsed_targets = reveal;
        self
    }

    // =========================================================================
    // READ ACCESS
    // =========================================================================

    pub fn arena(&self) -> &TreeArena {
        &self.arena
    }

    pub fn index(&self) -> &DependencyIndex {
        &self.index
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    pub fn selected(&self) -> Option<NodeIdx> {
        self.selected
    }

    pub fn selected_key(&self) -> Option<&NodeKey> {
        self.selected.map(|idx| self.arena.key(idx))
    }

    pub fn active_tab(&self) -> DetailTab {
        self.active_tab
    }

    pub fn dependency_overlay(&self) -> bool {
        self.dependency_overlay
    }

    pub fn highlighted(&self) -> Option<&str> {
        self.highlight.current()
    }

    /// Node carrying the highlighted code, if it resolves
    pub fn highlighted_node(&self) -> Option<NodeIdx> {
        self.highlight.current().and_then(|code| self.index.lookup(code))
    }

    pub fn highlight_remaining(&self, now: f64) -> Option<f64> {
        self.highlight.remaining(now)
    }

    /// Current layout
    pub fn frame(&self) -> &LayoutFrame {
        &self.frame
    }

    /// Layout before the most recent relayout
    pub fn previous_frame(&self) -> Option<&LayoutFrame> {
        self.previous_frame.as_ref()
    }

    pub fn is_visible(&self, idx: NodeIdx) -> bool {
        self.expansion.is_visible(&self.arena, idx)
    }

    pub fn available_tabs(&self) -> Vec<DetailTab> {
        match self.selected {
            Some(idx) => detail::available_tabs(&self.arena, idx),
            None => vec![DetailTab::Info],
        }
    }

    /// Detail panel contents for the selection
    pub fn detail_plan(&self) -> Option<DetailPlan> {
        self.selected
            .map(|idx| detail::project(&self.arena, &self.index, &self.expansion, idx))
    }

    // =========================================================================
    // TRANSITIONS
    // =========================================================================

    /// Flip a node's expansion. Leaves are ignored. Selection is untouched.
    pub fn toggle_node(&mut self, idx: NodeIdx) -> Transition {
        if self.arena.get(idx).map_or(true, |n| !n.has_children()) {
            return Transition::default();
        }
        let expanded = self.expansion.toggle(&self.arena, idx);
        let key = self.arena.key(idx).clone();
        tracing::debug!(node = %key, expanded, "Toggled node");
        Transition {
            relayout: Some(self.relayout(Some(key))),
            ..Transition::default()
        }
    }

    pub fn toggle_key(&mut self, key: &NodeKey) -> Transition {
        match self.arena.find(key) {
            Some(idx) => self.toggle_node(idx),
            None => Transition::default(),
        }
    }

    /// Select a node and open its most specific tab. Expansion is untouched.
    pub fn select_node(&mut self, idx: NodeIdx) -> Transition {
        if self.arena.get(idx).is_none() {
            return Transition::default();
        }
        self.selected = Some(idx);
        self.active_tab = detail::preferred_tab(&self.arena, idx);
        tracing::debug!(node = %self.arena.key(idx), tab = ?self.active_tab, "Selected node");
        Transition::default()
    }

    pub fn select_key(&mut self, key: &NodeKey) -> Transition {
        match self.arena.find(key) {
            Some(idx) => self.select_node(idx),
            None => Transition::default(),
        }
    }

    pub fn clear_selection(&mut self) {
        if self.selected.take().is_some() {
            tracing::debug!("Cleared selection");
        }
        self.active_tab = DetailTab::Info;
    }

    /// Switch detail tab. A tab the selection does not offer falls back to
    /// info. Returns the tab now active.
    pub fn select_tab(&mut self, tab: DetailTab) -> DetailTab {
        self.active_tab = if self.available_tabs().contains(&tab) {
            tab
        } else {
            DetailTab::Info
        };
        tracing::debug!(requested = ?tab, active = ?self.active_tab, "Selected detail tab");
        self.active_tab
    }

    /// Highlight the node carrying `code` for the configured duration and ask
    /// the view to bring it into focus. A hidden target is revealed only when
    /// `reveal_collapsed_targets` is set; otherwise the highlight applies
    /// whenever it becomes visible.
    pub fn activate_dependency(&mut self, code: &str, now: f64) -> Transition {
        let code = code.trim();
        if code.is_empty() {
            return Transition::default();
        }
        self.highlight.activate(code, now);

        let Some(target) = self.index.lookup(code) else {
            tracing::debug!(code, "Highlighted unresolved dependency");
            return Transition::default();
        };
        let key = self.arena.key(target).clone();

        if self.is_visible(target) {
            tracing::debug!(code, "Highlighted dependency");
            return Transition {
                focus: Some(key),
                ..Transition::default()
            };
        }

        if !self.reveal_collapsed_targets {
            tracing::debug!(code, "Highlighted hidden dependency");
            return Transition::default();
        }

        let origin = self
            .arena
            .ancestors(target)
            .find(|&a| self.expansion.is_visible(&self.arena, a))
            .map(|a| self.arena.key(a).clone());
        self.expansion.expand_ancestors(&self.arena, target);
        tracing::debug!(code, "Revealed hidden dependency");
        Transition {
            relayout: Some(self.relayout(origin)),
            focus: Some(key),
            reset_view: false,
        }
    }

    pub fn toggle_dependency_overlay(&mut self) -> Transition {
        self.dependency_overlay = !self.dependency_overlay;
        tracing::debug!(on = self.dependency_overlay, "Toggled dependency overlay");
        Transition {
            relayout: Some(self.relayout(None)),
            ..Transition::default()
        }
    }

    /// Back to the state of a fresh load
    pub fn reset(&mut self) -> Transition {
        self.expansion = ExpansionState::initial(&self.arena, self.initial_depth);
        self.selected = None;
        self.active_tab = DetailTab::Info;
        self.dependency_overlay = false;
        self.highlight.clear();
        tracing::debug!("Reset explorer");
        Transition {
            relayout: Some(self.relayout(None)),
            focus: None,
            reset_view: true,
        }
    }

    /// Expire the highlight. Returns true when it cleared this call.
    pub fn tick(&mut self, now: f64) -> bool {
        match self.highlight.poll(now) {
            Some(code) => {
                tracing::debug!(code = %code, "Highlight cleared");
                true
            }
            None => false,
        }
    }

    fn relayout(&mut self, origin: Option<NodeKey>) -> Relayout {
        let next = self.engine.compute(
            &self.arena,
            &self.index,
            &self.expansion,
            self.dependency_overlay,
        );
        let diff = LayoutDiff::between(Some(&self.frame), &next);
        tracing::debug!(
            entered = diff.entered.len(),
            exited = diff.exited.len(),
            edges_entered = diff.edges_entered.len(),
            edges_exited = diff.edges_exited.len(),
            "Relayout"
        );
        self.previous_frame = Some(std::mem::replace(&mut self.frame, next));
        Relayout { diff, origin }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ngo_plan_types::{DataSchema, NodeType};
    use pretty_assertions::assert_eq;

    fn doc() -> HierarchyNode {
        HierarchyNode::new("Platform", NodeType::Platform)
            .with_child(
                HierarchyNode::new("Core", NodeType::Domain)
                    .with_code("CD")
                    .with_child(
                        HierarchyNode::new("Registry", NodeType::Module)
                            .with_code("CD.1")
                            .with_child(
                                HierarchyNode::new("PatientTable", NodeType::Data)
                                    .with_code("CD.1.D")
                                    .with_data_schema(DataSchema {
                                        table_name: "patients".into(),
                                        description: None,
                                        columns: vec![],
                                    }),
                            ),
                    ),
            )
            .with_child(
                HierarchyNode::new("Ops", NodeType::Domain)
                    .with_code("OD")
                    .with_dependency("CD.1.D"),
            )
    }

    fn controller() -> InteractionController {
        InteractionController::with_settings(&doc(), &GraphSettings::default())
    }

    #[test]
    fn test_highlight_timer_replaces_deadline() {
        let mut timer = HighlightTimer::new(2.0);
        timer.activate("A", 0.0);
        timer.activate("B", 1.5);
        assert_eq!(timer.poll(2.0), None);
        assert_eq!(timer.current(), Some("B"));
        assert_eq!(timer.poll(3.5), Some("B".to_string()));
        assert_eq!(timer.current(), None);
        assert_eq!(timer.poll(10.0), None);
    }

    #[test]
    fn test_initial_state() {
        let c = controller();
        let names: Vec<_> = c
            .frame()
            .nodes
            .iter()
            .map(|n| c.arena().node(n.idx).name().to_string())
            .collect();
        assert_eq!(names, vec!["Platform", "Core", "Registry", "Ops"]);
        assert_eq!(c.selected(), None);
        assert!(!c.dependency_overlay());
        assert!(c.frame().dependency_edges.is_empty());
    }

    #[test]
    fn test_toggle_leaves_selection_alone() {
        let mut c = controller();
        let core = c.index().lookup("CD").unwrap();
        c.select_node(core);
        let t = c.toggle_node(core);
        let relayout = t.relayout.unwrap();
        assert_eq!(relayout.origin, Some(NodeKey::Code("CD".into())));
        assert_eq!(relayout.diff.exited, vec![NodeKey::Code("CD.1".into())]);
        assert_eq!(c.selected(), Some(core));
        assert!(c.previous_frame().is_some());
    }

    #[test]
    fn test_toggle_leaf_is_noop() {
        let mut c = controller();
        let ops = c.index().lookup("OD").unwrap();
        assert!(c.toggle_node(ops).is_noop());
    }

    #[test]
    fn test_select_picks_schema_tab_and_clamps_requests() {
        let mut c = controller();
        let table = c.index().lookup("CD.1.D").unwrap();
        c.select_node(table);
        assert_eq!(c.active_tab(), DetailTab::Schema);
        assert_eq!(c.select_tab(DetailTab::Api), DetailTab::Info);
        assert_eq!(c.select_tab(DetailTab::Schema), DetailTab::Schema);

        let ops = c.index().lookup("OD").unwrap();
        c.select_node(ops);
        assert_eq!(c.active_tab(), DetailTab::Info);
        assert_eq!(c.available_tabs(), vec![DetailTab::Info]);
    }

    #[test]
    fn test_chip_on_hidden_target_is_best_effort() {
        let mut c = controller();
        let t = c.activate_dependency("CD.1.D", 0.0);
        assert!(t.is_noop());
        assert_eq!(c.highlighted(), Some("CD.1.D"));
        assert!(!c.tick(1.9));
        assert!(c.tick(2.0));
        assert_eq!(c.highlighted(), None);
    }

    #[test]
    fn test_chip_reveals_hidden_target_when_enabled() {
        let mut c = controller().with_reveal_collapsed_targets(true);
        let t = c.activate_dependency("CD.1.D", 0.0);
        let relayout = t.relayout.unwrap();
        assert_eq!(relayout.origin, Some(NodeKey::Code("CD.1".into())));
        assert_eq!(relayout.diff.entered, vec![NodeKey::Code("CD.1.D".into())]);
        assert_eq!(t.focus, Some(NodeKey::Code("CD.1.D".into())));
    }

    #[test]
    fn test_chip_on_visible_target_requests_focus() {
        let mut c = controller();
        let t = c.activate_dependency("OD", 0.0);
        assert_eq!(t.focus, Some(NodeKey::Code("OD".into())));
        assert!(t.relayout.is_none());
    }

    #[test]
    fn test_overlay_toggle_adds_and_removes_edges() {
        let mut c = controller();
        let registry = c.index().lookup("CD.1").unwrap();
        c.toggle_node(registry);
        c.toggle_dependency_overlay();
        assert_eq!(c.frame().dependency_edges.len(), 1);
        c.toggle_dependency_overlay();
        assert!(c.frame().dependency_edges.is_empty());
    }

    #[test]
    fn test_reset_restores_fresh_state() {
        let mut c = controller();
        let initial = c.expansion().clone();
        let core = c.index().lookup("CD").unwrap();
        c.toggle_node(core);
        c.select_node(core);
        c.toggle_dependency_overlay();
        c.activate_dependency("OD", 0.0);

        let t = c.reset();
        assert!(t.reset_view);
        assert_eq!(c.expansion(), &initial);
        assert_eq!(c.selected(), None);
        assert_eq!(c.active_tab(), DetailTab::Info);
        assert!(!c.dependency_overlay());
        assert_eq!(c.highlighted(), None);
    }
}
