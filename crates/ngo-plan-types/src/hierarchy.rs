//! Hierarchy document types
//!
//! The platform is described as a single rooted tree:
//! platform → domain → module → component / service / data.
//!
//! Containment is the tree itself. Dependencies are a separate directed graph
//! layered on top via `code` references and may contain cycles or point at
//! ancestors, so they are never walked as if they were children.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ============================================================================
// NODE TYPE
// ============================================================================

/// Tag determining which optional payload fields of a node are meaningful
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Platform,
    Domain,
    Module,
    Component,
    Service,
    Data,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Platform => "platform",
            NodeType::Domain => "domain",
            NodeType::Module => "module",
            NodeType::Component => "component",
            NodeType::Service => "service",
            NodeType::Data => "data",
        }
    }

    /// Display name for legends and badges
    pub fn display_name(&self) -> &'static str {
        match self {
            NodeType::Platform => "Platform",
            NodeType::Domain => "Domain",
            NodeType::Module => "Module",
            NodeType::Component => "Component",
            NodeType::Service => "Service",
            NodeType::Data => "Data",
        }
    }

    pub fn all() -> &'static [NodeType] {
        &[
            NodeType::Platform,
            NodeType::Domain,
            NodeType::Module,
            NodeType::Component,
            NodeType::Service,
            NodeType::Data,
        ]
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// API SPECIFICATIONS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parameter of an API operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// API operation descriptor, meaningful on `service` nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSpecification {
    pub method: HttpMethod,
    pub endpoint: String,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ApiParameter>,
    /// Response type label (e.g. `Patient`, `List<Encounter>`)
    pub response: String,
}

// ============================================================================
// DATA SCHEMA
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaColumn {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Table schema descriptor, meaningful on `data` nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSchema {
    pub table_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub columns: Vec<SchemaColumn>,
}

// ============================================================================
// HIERARCHY NODE
// ============================================================================

/// Free-form detail value attached to a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DetailValue {
    Number(f64),
    Text(String),
}

impl std::fmt::Display for DetailValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetailValue::Number(n) => write!(f, "{}", n),
            DetailValue::Text(s) => f.write_str(s),
        }
    }
}

/// One entry in the static hierarchy document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyNode {
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Stable identifier, unique across the document when present (e.g. "CD.1.1.S1")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Insertion order is display order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<HierarchyNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, DetailValue>,
    /// Codes this node declares a hard dependency on
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub api_specs: Vec<ApiSpecification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_schema: Option<DataSchema>,
}

impl HierarchyNode {
    /// Create a bare node with no payload
    pub fn new(name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            name: name.into(),
            node_type,
            code: None,
            children: Vec::new(),
            description: None,
            details: BTreeMap::new(),
            dependencies: Vec::new(),
            api_specs: Vec::new(),
            data_schema: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_child(mut self, child: HierarchyNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_dependency(mut self, code: impl Into<String>) -> Self {
        self.dependencies.push(code.into());
        self
    }

    pub fn with_api_spec(mut self, spec: ApiSpecification) -> Self {
        self.api_specs.push(spec);
        self
    }

    pub fn with_data_schema(mut self, schema: DataSchema) -> Self {
        self.data_schema = Some(schema);
        self
    }

    /// Non-empty code, if any. Blank codes are treated as absent.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref().filter(|c| !c.trim().is_empty())
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn has_api_specs(&self) -> bool {
        !self.api_specs.is_empty()
    }

    pub fn has_data_schema(&self) -> bool {
        self.data_schema.is_some()
    }

    /// Copy of this node without its children (payload only)
    pub fn detached(&self) -> HierarchyNode {
        HierarchyNode {
            children: Vec::new(),
            ..self.clone()
        }
    }

    /// Pre-order walk yielding `(depth, node)`, children in declared order
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(0, self)],
        }
    }

    /// Total number of nodes in this subtree (including self)
    pub fn subtree_len(&self) -> usize {
        self.walk().count()
    }
}

/// Pre-order iterator over a hierarchy
pub struct Walk<'a> {
    stack: Vec<(usize, &'a HierarchyNode)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a HierarchyNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        for child in node.children.iter().rev() {
            self.stack.push((depth + 1, child));
        }
        Some((depth, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> HierarchyNode {
        HierarchyNode::new("Platform", NodeType::Platform)
            .with_child(
                HierarchyNode::new("Clinical", NodeType::Domain)
                    .with_code("CD")
                    .with_child(HierarchyNode::new("Patients", NodeType::Module).with_code("CD.1.1")),
            )
            .with_child(HierarchyNode::new("Ops", NodeType::Domain).with_code("OD"))
    }

    #[test]
    fn test_walk_is_preorder_in_declared_order() {
        let root = sample();
        let visited: Vec<(usize, &str)> = root.walk().map(|(d, n)| (d, n.name.as_str())).collect();
        assert_eq!(
            visited,
            vec![(0, "Platform"), (1, "Clinical"), (2, "Patients"), (1, "Ops")]
        );
        assert_eq!(root.subtree_len(), 4);
    }

    #[test]
    fn test_blank_code_is_absent() {
        let node = HierarchyNode::new("x", NodeType::Component).with_code("  ");
        assert_eq!(node.code(), None);
        let node = HierarchyNode::new("x", NodeType::Component).with_code("X.1");
        assert_eq!(node.code(), Some("X.1"));
    }

    #[test]
    fn test_detached_drops_children_only() {
        let root = sample();
        let domain = root.children[0].detached();
        assert!(domain.children.is_empty());
        assert_eq!(domain.code(), Some("CD"));
    }

    #[test]
    fn test_deserialize_service_node() {
        let yaml = r#"
name: PatientService
type: service
code: CD.1.1.S1
dependencies: [CD.1.1.D1]
api_specs:
  - method: POST
    endpoint: /api/v1/patients
    summary: Register a new patient
    parameters:
      - name: firstName
        type: string
        required: true
    response: Patient
"#;
        let node: HierarchyNode = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(node.node_type, NodeType::Service);
        assert_eq!(node.dependencies, vec!["CD.1.1.D1".to_string()]);
        assert_eq!(node.api_specs[0].method, HttpMethod::Post);
        assert_eq!(node.api_specs[0].parameters[0].ty, "string");
        assert!(node.api_specs[0].parameters[0].required);
        assert!(node.children.is_empty());
        assert!(!node.has_data_schema());
    }

    #[test]
    fn test_details_accept_text_and_numbers() {
        let yaml = r#"
name: Module
type: module
details:
  owner: clinical-team
  services: 3
"#;
        let node: HierarchyNode = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(node.details["owner"], DetailValue::Text("clinical-team".into()));
        assert_eq!(node.details["services"], DetailValue::Number(3.0));
        assert_eq!(node.details["services"].to_string(), "3");
    }
}
