//! Detail panel projector
//!
//! Pure mapping from the selected node to what the detail panel shows. The
//! info tab is always available; the API tab only for nodes carrying API
//! operations, the schema tab only for nodes carrying a table schema.

use ngo_plan_types::{ApiSpecification, HttpMethod, NodeType, SchemaColumn};

use super::arena::{NodeIdx, TreeArena};
use super::expansion::ExpansionState;
use super::index::DependencyIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DetailTab {
    #[default]
    Info,
    Api,
    Schema,
}

impl DetailTab {
    pub fn label(&self) -> &'static str {
        match self {
            DetailTab::Info => "Info",
            DetailTab::Api => "API",
            DetailTab::Schema => "Schema",
        }
    }
}

/// Tabs that have content for `idx`, in display order
pub fn available_tabs(arena: &TreeArena, idx: NodeIdx) -> Vec<DetailTab> {
    let node = &arena.node(idx).node;
    let mut tabs = vec![DetailTab::Info];
    if node.has_api_specs() {
        tabs.push(DetailTab::Api);
    }
    if node.has_data_schema() {
        tabs.push(DetailTab::Schema);
    }
    tabs
}

/// Tab opened on selection: schema, then API, then info
pub fn preferred_tab(arena: &TreeArena, idx: NodeIdx) -> DetailTab {
    let node = &arena.node(idx).node;
    if node.has_data_schema() {
        DetailTab::Schema
    } else if node.has_api_specs() {
        DetailTab::Api
    } else {
        DetailTab::Info
    }
}

// =============================================================================
// RENDER PLAN
// =============================================================================

/// A declared dependency, resolved against the document where possible
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyChip {
    pub code: String,
    /// Name of the node carrying the code, if any
    pub target_name: Option<String>,
}

impl DependencyChip {
    pub fn is_resolved(&self) -> bool {
        self.target_name.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InfoSection {
    pub name: String,
    pub code: Option<String>,
    pub node_type: NodeType,
    pub description: Option<String>,
    pub dependent_count: usize,
    pub is_critical: bool,
    /// Present when something depends on this node
    pub impact_note: Option<String>,
    pub dependencies: Vec<DependencyChip>,
    pub details: Vec<(String, String)>,
    pub depth: usize,
    pub child_count: usize,
    pub visible_child_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiOperation {
    pub method: HttpMethod,
    pub endpoint: String,
    pub summary: String,
    /// `name (type)` per parameter
    pub parameters: Vec<String>,
    pub response: String,
}

impl From<&ApiSpecification> for ApiOperation {
    fn from(spec: &ApiSpecification) -> Self {
        Self {
            method: spec.method,
            endpoint: spec.endpoint.clone(),
            summary: spec.summary.clone(),
            parameters: spec
                .parameters
                .iter()
                .map(|p| format!("{} ({})", p.name, p.ty))
                .collect(),
            response: spec.response.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaSection {
    pub table_name: String,
    pub description: Option<String>,
    pub columns: Vec<SchemaColumn>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailPlan {
    pub info: InfoSection,
    /// Present iff the node has API operations
    pub api: Option<Vec<ApiOperation>>,
    /// Present iff the node has a table schema
    pub schema: Option<SchemaSection>,
}

impl DetailPlan {
    pub fn tabs(&self) -> Vec<DetailTab> {
        let mut tabs = vec![DetailTab::Info];
        if self.api.is_some() {
            tabs.push(DetailTab::Api);
        }
        if self.schema.is_some() {
            tabs.push(DetailTab::Schema);
        }
        tabs
    }
}

pub fn impact_note(dependent_count: usize) -> String {
    format!(
        "Required by {} other modules. Changes here may cascade.",
        dependent_count
    )
}

/// Build the detail panel contents for `idx`
pub fn project(
    arena: &TreeArena,
    index: &DependencyIndex,
    expansion: &ExpansionState,
    idx: NodeIdx,
) -> DetailPlan {
    let arena_node = arena.node(idx);
    let node = &arena_node.node;
    let annotation = index.annotation(idx);

    let dependencies = node
        .dependencies
        .iter()
        .map(|code| DependencyChip {
            code: code.clone(),
            target_name: index
                .lookup(code.trim())
                .map(|target| arena.node(target).name().to_string()),
        })
        .collect();

    let child_count = arena_node.children.len();
    let visible_child_count = if expansion.is_expanded(&arena_node.key) {
        child_count
    } else {
        0
    };

    let info = InfoSection {
        name: node.name.clone(),
        code: node.code().map(str::to_string),
        node_type: node.node_type,
        description: node.description.clone(),
        dependent_count: annotation.dependent_count,
        is_critical: annotation.is_critical,
        impact_note: (annotation.dependent_count > 0).then(|| impact_note(annotation.dependent_count)),
        dependencies,
        details: node
            .details
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect(),
        depth: arena_node.depth,
        child_count,
        visible_child_count,
    };

    let api = node
        .has_api_specs()
        .then(|| node.api_specs.iter().map(ApiOperation::from).collect());

    let schema = node.data_schema.as_ref().map(|s| SchemaSection {
        table_name: s.table_name.clone(),
        description: s.description.clone(),
        columns: s.columns.clone(),
    });

    DetailPlan { info, api, schema }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ngo_plan_types::{ApiParameter, DataSchema, HierarchyNode};
    use pretty_assertions::assert_eq;

    fn service() -> HierarchyNode {
        HierarchyNode::new("PatientService", NodeType::Service)
            .with_code("S1")
            .with_dependency("D1")
            .with_dependency("MISSING")
            .with_api_spec(ApiSpecification {
                method: HttpMethod::Get,
                endpoint: "/api/v1/patients/{id}".into(),
                summary: "Get patient".into(),
                parameters: vec![ApiParameter {
                    name: "id".into(),
                    ty: "uuid".into(),
                    required: true,
                    description: None,
                }],
                response: "Patient".into(),
            })
    }

    fn data() -> HierarchyNode {
        HierarchyNode::new("PatientData", NodeType::Data)
            .with_code("D1")
            .with_data_schema(DataSchema {
                table_name: "patients".into(),
                description: None,
                columns: vec![SchemaColumn {
                    name: "id".into(),
                    ty: "UUID".into(),
                    constraints: vec!["PK".into()],
                    description: None,
                }],
            })
    }

    fn fixture() -> (TreeArena, DependencyIndex, ExpansionState) {
        let root = HierarchyNode::new("Root", NodeType::Platform)
            .with_child(
                HierarchyNode::new("Module", NodeType::Module)
                    .with_code("M")
                    .with_child(service())
                    .with_child(data()),
            )
            .with_child(HierarchyNode::new("Other", NodeType::Module).with_code("O").with_dependency("D1"));
        let arena = TreeArena::build(&root);
        let index = DependencyIndex::build(&arena);
        let expansion = ExpansionState::initial(&arena, 1);
        (arena, index, expansion)
    }

    #[test]
    fn test_plain_node_has_info_only() {
        let (arena, index, expansion) = fixture();
        let m = index.lookup("M").unwrap();
        assert_eq!(available_tabs(&arena, m), vec![DetailTab::Info]);
        assert_eq!(preferred_tab(&arena, m), DetailTab::Info);

        let plan = project(&arena, &index, &expansion, m);
        assert_eq!(plan.tabs(), vec![DetailTab::Info]);
        assert!(plan.api.is_none() && plan.schema.is_none());
        assert_eq!(plan.info.depth, 1);
        assert_eq!(plan.info.child_count, 2);
        assert_eq!(plan.info.visible_child_count, 0);
        assert_eq!(plan.info.impact_note, None);
    }

    #[test]
    fn test_service_projects_api_operations() {
        let (arena, index, expansion) = fixture();
        let s = index.lookup("S1").unwrap();
        assert_eq!(preferred_tab(&arena, s), DetailTab::Api);

        let plan = project(&arena, &index, &expansion, s);
        let ops = plan.api.unwrap();
        assert_eq!(ops[0].method, HttpMethod::Get);
        assert_eq!(ops[0].parameters, vec!["id (uuid)".to_string()]);
        assert_eq!(
            plan.info.dependencies,
            vec![
                DependencyChip {
                    code: "D1".into(),
                    target_name: Some("PatientData".into())
                },
                DependencyChip {
                    code: "MISSING".into(),
                    target_name: None
                },
            ]
        );
    }

    #[test]
    fn test_data_node_prefers_schema_and_reports_impact() {
        let (arena, index, expansion) = fixture();
        let d = index.lookup("D1").unwrap();
        assert_eq!(available_tabs(&arena, d), vec![DetailTab::Info, DetailTab::Schema]);
        assert_eq!(preferred_tab(&arena, d), DetailTab::Schema);

        let plan = project(&arena, &index, &expansion, d);
        assert_eq!(plan.schema.as_ref().unwrap().table_name, "patients");
        assert_eq!(plan.info.dependent_count, 2);
        assert!(plan.info.is_critical);
        assert_eq!(
            plan.info.impact_note.as_deref(),
            Some("Required by 2 other modules. Changes here may cascade.")
        );
    }
}
