//! Data models for the analysis pipeline (spec §3).

pub mod clone;
pub mod config;
pub mod dependency;
pub mod fs;
pub mod issue;
pub mod metrics;
pub mod report;
pub mod snippet;
pub mod structure_graph;
pub mod symbol;

pub use clone::{CloneEntry, CloneMap};
pub use config::{OutputFormat, PartialSettings, Settings};
pub use dependency::{
    compute_export_usage, DependencyEdge, DependencyGraph, ExportSet, ExportUsageMap,
    ImportDescriptor, ResolutionKind, UnresolvedImport,
};
pub use fs::{build_tree, DirectoryEntry, FileEntry, TreeNode, WalkResult, Warning, WarningKind};
pub use issue::{Issue, IssueCategory, IssueSeverity};
pub use metrics::{complexity_score, FileMetrics, MetricsMap};
pub use report::Report;
pub use snippet::SourceSnippet;
pub use structure_graph::{Edge, EdgeKind, StructureGraph, StructureNode};
pub use symbol::{classify_function_like, CallEdge, Symbol, SymbolKind};
