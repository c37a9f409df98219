//! The plan document: hierarchy plus the delivery plan around it

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DocumentError, DocumentResult};
use crate::hierarchy::HierarchyNode;

const BUNDLED_DOCUMENT: &str = include_str!("../data/platform.yaml");

/// A delivery phase on the project timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectPhase {
    pub id: u32,
    pub name: String,
    /// 1-based, inclusive
    pub start_week: u32,
    /// 1-based, inclusive
    pub end_week: u32,
    pub budget: u64,
    pub status: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub deliverables: Vec<String>,
}

impl ProjectPhase {
    /// Number of weeks covered, counting both ends
    pub fn week_span(&self) -> u32 {
        (self.end_week + 1).saturating_sub(self.start_week)
    }
}

/// Headline figure shown on the overview page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub label: String,
    pub value: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Number of modules in the domain
    pub modules: u32,
    /// Hex colour, `#rrggbb`
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlossaryTerm {
    pub term: String,
    pub definition: String,
    pub category: String,
    /// Hierarchy level label, e.g. "Level 2"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hierarchy: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevOpsStep {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevOpsGuide {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub description: String,
    pub steps: Vec<DevOpsStep>,
}

/// Everything the viewer renders, loaded once at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanDocument {
    pub hierarchy: HierarchyNode,
    #[serde(default)]
    pub phases: Vec<ProjectPhase>,
    #[serde(default)]
    pub metrics: Vec<Metric>,
    #[serde(default)]
    pub domains: Vec<DomainInfo>,
    #[serde(default)]
    pub glossary: Vec<GlossaryTerm>,
    #[serde(default)]
    pub devops_guides: Vec<DevOpsGuide>,
}

impl PlanDocument {
    /// The document compiled into the binary
    pub fn bundled() -> DocumentResult<Self> {
        Self::from_yaml_str(BUNDLED_DOCUMENT)
    }

    pub fn from_yaml_str(yaml: &str) -> DocumentResult<Self> {
        let doc: PlanDocument = serde_yaml::from_str(yaml)?;
        doc.validate()?;
        tracing::info!(
            nodes = doc.hierarchy.subtree_len(),
            phases = doc.phases.len(),
            glossary = doc.glossary.len(),
            "Loaded plan document"
        );
        Ok(doc)
    }

    pub fn load(path: impl AsRef<Path>) -> DocumentResult<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "Reading plan document");
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Check structural requirements. Only names are mandatory; dangling
    /// dependency codes and missing optional fields are valid.
    pub fn validate(&self) -> DocumentResult<()> {
        let mut stack: Vec<(String, &HierarchyNode)> = vec![(String::new(), &self.hierarchy)];
        while let Some((parent_path, node)) = stack.pop() {
            let segment = if node.name.trim().is_empty() {
                "<unnamed>"
            } else {
                node.name.as_str()
            };
            let path = if parent_path.is_empty() {
                segment.to_string()
            } else {
                format!("{} / {}", parent_path, segment)
            };
            if node.name.trim().is_empty() {
                return Err(DocumentError::EmptyName { path });
            }
            for child in node.children.iter().rev() {
                stack.push((path.clone(), child));
            }
        }
        Ok(())
    }

    /// Last week of the last phase; zero without phases
    pub fn total_weeks(&self) -> u32 {
        self.phases.iter().map(|p| p.end_week).max().unwrap_or(0)
    }

    pub fn total_budget(&self) -> u64 {
        self.phases.iter().map(|p| p.budget).sum()
    }
}
