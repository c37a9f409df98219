//! NGO Plan Graph Widget
//!
//! This crate contains ONLY the hierarchy explorer - no pages, no app shell.
//! The widget is used by the `ngo-plan` application which owns routing and
//! the app lifecycle.

pub mod config;
pub mod graph;

pub use config::{global_config, ConfigError, GraphSettings};
pub use graph::{
    // Document indexing
    DependencyIndex,
    DetailPlan,
    DetailTab,
    ExpansionState,
    // Interaction
    HierarchyGraphWidget,
    HighlightTimer,
    InteractionController,
    LayoutDiff,
    LayoutFrame,
    NodeAnnotation,
    NodeIdx,
    NodeKey,
    // Animation
    SpringConfig,
    SpringF32,
    SpringVec2,
    Transition,
    TreeArena,
    TreeLayoutEngine,
    CRITICAL_THRESHOLD,
};
