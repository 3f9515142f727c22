//! The top-level `Report` shape returned by `analyze()` (spec §6).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::clone::CloneMap;
use super::dependency::{DependencyEdge, ExportUsageMap, UnresolvedImport};
use super::fs::TreeNode;
use super::issue::Issue;
use super::metrics::MetricsMap;
use super::structure_graph::Edge;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub directories: usize,
    pub files: usize,
    pub truncated: bool,
    pub walk_duration_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageStat {
    pub language: String,
    pub files: usize,
    pub lines: usize,
    pub bytes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSizeEntry {
    pub path: String,
    pub size: u64,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileLineEntry {
    pub path: String,
    pub line_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub totals: Totals,
    pub languages: Vec<LanguageStat>,
    pub largest_files: Vec<FileSizeEntry>,
    pub longest_files: Vec<FileLineEntry>,
    pub warnings_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependenciesSection {
    pub nodes: Vec<String>,
    pub edges: Vec<DependencyEdge>,
    pub unresolved: Vec<UnresolvedImport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FanEntry {
    pub path: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalPackageEntry {
    pub specifier: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyInsights {
    pub fan_out: Vec<FanEntry>,
    pub fan_in: Vec<FanEntry>,
    pub external_packages: Vec<ExternalPackageEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureTotals {
    pub packages: usize,
    pub files: usize,
    pub symbols: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureGraphSection {
    pub nodes: Vec<super::structure_graph::StructureNode>,
    pub edges: Vec<Edge>,
    pub symbols: Vec<super::symbol::Symbol>,
    pub totals: StructureTotals,
    pub incoming_calls: HashMap<String, usize>,
    pub exports: HashMap<String, Vec<String>>,
    pub export_usage: ExportUsageMap,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSection {
    pub files: MetricsMap,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloneDetail {
    pub source_name: String,
    pub source_path: String,
    pub source_start_line: usize,
    pub source_end_line: usize,
    pub target_name: String,
    pub target_path: String,
    pub target_start_line: usize,
    pub target_end_line: usize,
    pub similarity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Narrative {
    pub overview: String,
    pub key_facts: Vec<String>,
    pub hotspots: Vec<String>,
    pub actions: Vec<String>,
    pub clones: Vec<String>,
    pub clones_details: Vec<CloneDetail>,
    pub metrics: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub root_path: String,
    pub generated_at: String,
    pub summary: Summary,
    pub file_tree: TreeNode,
    pub dependencies: DependenciesSection,
    pub dependency_insights: DependencyInsights,
    pub structure_graph: StructureGraphSection,
    pub clones: CloneMap,
    pub metrics: MetricsSection,
    pub issues: Vec<Issue>,
    pub narrative: Narrative,
}
