//! Shared types for the NGO platform planning viewer
//!
//! The whole application renders one static [`PlanDocument`]: the platform
//! hierarchy plus delivery phases, headline metrics, domain summaries, the
//! glossary and the DevOps guides. The document is bundled at build time and
//! never mutated.

pub mod error;
pub mod hierarchy;
pub mod plan;

pub use error::{DocumentError, DocumentResult};
pub use hierarchy::{
    ApiParameter, ApiSpecification, DataSchema, DetailValue, HierarchyNode, HttpMethod, NodeType,
    SchemaColumn, Walk,
};
pub use plan::{
    DevOpsGuide, DevOpsStep, DomainInfo, GlossaryTerm, Metric, PlanDocument, ProjectPhase,
};
