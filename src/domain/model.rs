use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: &str = "2.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Directory,
    File,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
}

impl TreeNode {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::File,
            name: name.into(),
            children: None,
        }
    }

    pub fn directory(name: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self {
            kind: NodeKind::Directory,
            name: name.into(),
            children: Some(children),
        }
    }

    pub fn children(&self) -> &[TreeNode] {
        self.children.as_deref().unwrap_or(&[])
    }
}

/// 掃描階段找到的單一檔案 (路徑使用 / 分隔的相對路徑)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: String,
    pub language: String,
}

#[derive(Debug, Clone)]
pub struct ScanResult {
    pub tree: TreeNode,
    pub files: Vec<SourceFile>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metrics {
    pub loc: usize,
    pub todo_count: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub functions: Vec<String>,
    pub classes: Vec<String>,
    pub variables: Vec<String>,
    pub asm_labels: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSummary {
    pub path: String,
    pub language: String,
    pub role: String,
    pub role_justification: String,
    pub summary: String,
    pub metrics: Metrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbols: Option<SymbolInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryReport {
    pub schema_version: String,
    pub total_files: usize,
    pub files: Vec<FileSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyType {
    Stdlib,
    ThirdParty,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalDependency {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DependencyType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub language: String,
    pub imports_total: usize,
    pub external_dependencies: Vec<ExternalDependency>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DependencyBucket {
    pub count: usize,
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalSummary {
    pub stdlib: DependencyBucket,
    pub third_party: DependencyBucket,
    pub unknown: DependencyBucket,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub external_summary: ExternalSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphReport {
    pub schema_version: String,
    #[serde(flatten)]
    pub graph: DependencyGraph,
}

#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub tree: TreeNode,
    pub summaries: Vec<FileSummary>,
    pub graph: DependencyGraph,
}
