//! Per-file import/export descriptors and the dependency graph built from
//! them (spec §3, §4.3a, §4.3b).

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// An import statement/expression found by the regex extractor or the AST
/// pass, before resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportDescriptor {
    pub specifier: String,
    pub names: HashSet<String>,
    pub has_namespace: bool,
}

impl ImportDescriptor {
    pub fn new(specifier: impl Into<String>) -> Self {
        Self { specifier: specifier.into(), names: HashSet::new(), has_namespace: false }
    }
}

/// The set of identifiers a file exports. `"default"` denotes a default
/// export.
pub type ExportSet = HashSet<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionKind {
    Local,
    External,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyEdge {
    pub source: String,
    pub target: Option<String>,
    pub specifier: String,
    pub kind: ResolutionKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnresolvedImport {
    pub source: String,
    pub specifier: Option<String>,
    pub reason: String,
}

/// Output of the §4.3a dependency-resolution pass: owned, returned to the
/// orchestrator (no shared mutable map).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DependencyGraph {
    pub nodes: Vec<String>,
    pub edges: Vec<DependencyEdge>,
    pub unresolved: Vec<UnresolvedImport>,
    /// Per-file import descriptors, keyed by source file path. Consumed by
    /// §4.3b export-usage computation; not part of the public report shape.
    #[serde(skip)]
    pub imports_by_file: HashMap<String, Vec<ImportDescriptor>>,
}

impl DependencyGraph {
    /// `local` edges only, as `(sourceFile, specifier) -> resolvedTargetFile`.
    pub fn local_resolution_map(&self) -> HashMap<(String, String), String> {
        self.edges
            .iter()
            .filter(|e| e.kind == ResolutionKind::Local)
            .filter_map(|e| {
                e.target
                    .clone()
                    .map(|t| ((e.source.clone(), e.specifier.clone()), t))
            })
            .collect()
    }

    pub fn fan_out(&self, file: &str) -> usize {
        self.edges
            .iter()
            .filter(|e| e.kind == ResolutionKind::Local && e.source == file)
            .count()
    }

    pub fn fan_in(&self, file: &str) -> usize {
        self.edges
            .iter()
            .filter(|e| e.kind == ResolutionKind::Local && e.target.as_deref() == Some(file))
            .count()
    }

    /// External (non-local) specifiers ranked by reference count, for
    /// `dependencyInsights.externalPackages` / narrative `keyFacts`.
    pub fn external_package_counts(&self) -> Vec<(String, usize)> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for edge in &self.edges {
            if edge.kind == ResolutionKind::External {
                *counts.entry(edge.specifier.clone()).or_insert(0) += 1;
            }
        }
        let mut out: Vec<_> = counts.into_iter().collect();
        out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        out
    }
}

/// `"{targetFile}#{exportName}" -> distinct-importer-file count` (spec §3
/// `ExportUsage`, §4.3b).
pub type ExportUsageMap = HashMap<String, usize>;

/// Computes export-usage per spec §4.3b: for every importing file's import
/// descriptors, credit the resolved target's exports, once per importer.
pub fn compute_export_usage(
    dep_graph: &DependencyGraph,
    exports_by_file: &HashMap<String, ExportSet>,
) -> ExportUsageMap {
    let resolution = dep_graph.local_resolution_map();
    // key -> set of importer files (dedup before counting)
    let mut importers: HashMap<String, HashSet<String>> = HashMap::new();

    for (importer, descriptors) in &dep_graph.imports_by_file {
        for descriptor in descriptors {
            let Some(target) = resolution.get(&(importer.clone(), descriptor.specifier.clone()))
            else {
                continue;
            };
            if target == importer {
                continue;
            }
            let Some(target_exports) = exports_by_file.get(target) else { continue };

            if descriptor.has_namespace {
                for name in target_exports {
                    importers
                        .entry(format!("{}#{}", target, name))
                        .or_default()
                        .insert(importer.clone());
                }
            } else {
                for name in &descriptor.names {
                    if target_exports.contains(name) {
                        importers
                            .entry(format!("{}#{}", target, name))
                            .or_default()
                            .insert(importer.clone());
                    }
                }
            }
        }
    }

    importers.into_iter().map(|(k, set)| (k, set.len())).collect()
}
