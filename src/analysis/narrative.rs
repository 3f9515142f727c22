//! Narrative synthesis (spec §4.6): stitches every other pipeline stage's
//! output into a human-readable summary. Grounded on
//! `examples/antstanley-walker/src/models/ast.rs`'s `ASTAnalysisResults::
//! summary()`, which builds a multi-section prose report from one large
//! `format!(r#"..."#, ...)` template; here the overview keeps that shape
//! while `key_facts`/`hotspots`/`actions`/`clones` are separate lists so
//! formatters can render them independently.

use std::collections::HashMap;

use crate::models::clone::CloneMap;
use crate::models::dependency::DependencyGraph;
use crate::models::issue::{Issue, IssueSeverity};
use crate::models::metrics::MetricsMap;
use crate::models::report::{CloneDetail, DependencyInsights, FileSizeEntry, LanguageStat, Narrative, StructureTotals, Totals};
use crate::models::structure_graph::StructureGraph;

const TOP_N: usize = 3;
const ACTION_LIMIT: usize = 5;
const CLONE_LIMIT: usize = 10;
const HIGH_COMPLEXITY_THRESHOLD: f64 = 35.0;
const LONG_FILE_THRESHOLD: usize = 400;
const HEAVY_FILE_THRESHOLD: u64 = 200 * 1024;

pub struct NarrativeSynthesizer;

impl NarrativeSynthesizer {
    pub fn new() -> Self {
        Self
    }

    #[allow(clippy::too_many_arguments)]
    pub fn synthesize(
        &self,
        root_path: &str,
        totals: &Totals,
        languages: &[LanguageStat],
        largest_files: &[FileSizeEntry],
        structure: &StructureGraph,
        dependencies: &DependencyGraph,
        dependency_insights: &DependencyInsights,
        metrics: &MetricsMap,
        issues: &[Issue],
        clones: &CloneMap,
    ) -> Narrative {
        if totals.files == 0 {
            return Narrative {
                overview: "No notable architectural facts detected.".to_string(),
                key_facts: Vec::new(),
                hotspots: Vec::new(),
                actions: Vec::new(),
                clones: Vec::new(),
                clones_details: Vec::new(),
                metrics: Vec::new(),
            };
        }

        let error_count = issues.iter().filter(|i| i.severity == IssueSeverity::Error).count();
        let warning_count = issues.iter().filter(|i| i.severity == IssueSeverity::Warning).count();
        let info_count = issues.iter().filter(|i| i.severity == IssueSeverity::Info).count();

        let dominant_language = languages.iter().max_by_key(|l| l.files).map(|l| l.language.clone());

        let overview = format!(
            r#"Structural analysis of {}
====================================
Files: {} across {} directories (truncated: {})
Dominant language: {}

Structure:
  Packages: {}
  Files in graph: {}
  Symbols: {}

Dependencies:
  Local edges: {}
  Unresolved imports: {}
  External packages referenced: {}

Clones:
  Symbols with at least one near-duplicate: {}

Issues: {} errors, {} warnings, {} info
"#,
            root_path,
            totals.files,
            totals.directories,
            totals.truncated,
            dominant_language.as_deref().unwrap_or("none"),
            structure.nodes().filter(|n| matches!(n, crate::models::structure_graph::StructureNode::Package { .. })).count(),
            structure.nodes().filter(|n| matches!(n, crate::models::structure_graph::StructureNode::File { .. })).count(),
            structure.nodes().filter(|n| matches!(n, crate::models::structure_graph::StructureNode::Symbol { .. })).count(),
            dependencies.edges.iter().filter(|e| e.kind == crate::models::dependency::ResolutionKind::Local).count(),
            dependencies.unresolved.len(),
            dependency_insights.external_packages.len(),
            clones.len(),
            error_count,
            warning_count,
            info_count,
        );

        let structure_totals = StructureTotals {
            packages: structure.nodes().filter(|n| matches!(n, crate::models::structure_graph::StructureNode::Package { .. })).count(),
            files: structure.nodes().filter(|n| matches!(n, crate::models::structure_graph::StructureNode::File { .. })).count(),
            symbols: structure.nodes().filter(|n| matches!(n, crate::models::structure_graph::StructureNode::Symbol { .. })).count(),
        };
        let key_facts = self.key_facts(totals, languages, largest_files, &structure_totals, issues, dependency_insights);
        let hotspots = self.hotspots(metrics, dependency_insights, dependencies);
        let actions = self.actions(issues);
        let (clone_lines, clone_details) = self.clone_summary(clones, structure);

        Narrative {
            overview,
            key_facts,
            hotspots,
            actions,
            clones: clone_lines,
            clones_details: clone_details,
            metrics: self.metrics_highlights(metrics),
        }
    }

    /// Spec §4.6 `keyFacts[]`: language mix (top 3 w/ percentages), structure
    /// totals, three largest files, severity mix, top 3 external packages.
    fn key_facts(
        &self,
        totals: &Totals,
        languages: &[LanguageStat],
        largest_files: &[FileSizeEntry],
        structure_totals: &StructureTotals,
        issues: &[Issue],
        dependency_insights: &DependencyInsights,
    ) -> Vec<String> {
        let mut facts = Vec::new();

        let total_files: usize = languages.iter().map(|l| l.files).sum();
        let mut by_files: Vec<&LanguageStat> = languages.iter().collect();
        by_files.sort_by(|a, b| b.files.cmp(&a.files).then_with(|| a.language.cmp(&b.language)));
        for lang in by_files.into_iter().take(TOP_N) {
            let pct = if total_files > 0 { (lang.files as f64 / total_files as f64) * 100.0 } else { 0.0 };
            facts.push(format!("{}: {} files ({:.1}%)", lang.language, lang.files, pct));
        }

        facts.push(format!(
            "Structure: {} packages, {} files, {} symbols",
            structure_totals.packages, structure_totals.files, structure_totals.symbols
        ));

        if !largest_files.is_empty() {
            let names: Vec<String> = largest_files.iter().take(TOP_N).map(|f| format!("{} ({} bytes)", f.path, f.size)).collect();
            facts.push(format!("Largest files: {}", names.join(", ")));
        }

        let error_count = issues.iter().filter(|i| i.severity == IssueSeverity::Error).count();
        let warning_count = issues.iter().filter(|i| i.severity == IssueSeverity::Warning).count();
        let info_count = issues.iter().filter(|i| i.severity == IssueSeverity::Info).count();
        facts.push(format!("Issues: {} errors, {} warnings, {} info", error_count, warning_count, info_count));

        if !dependency_insights.external_packages.is_empty() {
            let names: Vec<String> = dependency_insights
                .external_packages
                .iter()
                .take(TOP_N)
                .map(|p| format!("{} ({} refs)", p.specifier, p.count))
                .collect();
            facts.push(format!("Top external packages: {}", names.join(", ")));
        }

        facts
    }

    /// Spec §4.6 `hotspots[]`: top 3 complexity hotspots (≥35), top 3
    /// longest files (≥400 lines), top 3 heaviest files (≥200 KiB), top 3
    /// fan-out/fan-in modules, unresolved-import count, total TODO count.
    fn hotspots(&self, metrics: &MetricsMap, dependency_insights: &DependencyInsights, dependencies: &DependencyGraph) -> Vec<String> {
        let mut hotspots = Vec::new();

        let mut complex: Vec<(&String, f64)> = metrics
            .iter()
            .filter_map(|(path, m)| m.complexity_score.filter(|&c| c >= HIGH_COMPLEXITY_THRESHOLD).map(|c| (path, c)))
            .collect();
        complex.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal).then_with(|| a.0.cmp(b.0)));
        for (path, score) in complex.into_iter().take(TOP_N) {
            hotspots.push(format!("Complexity hotspot: {} ({:.2})", path, score));
        }

        let mut longest: Vec<(&String, usize)> = metrics
            .iter()
            .filter_map(|(path, m)| m.line_count.filter(|&lc| lc >= LONG_FILE_THRESHOLD).map(|lc| (path, lc)))
            .collect();
        longest.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        for (path, lines) in longest.into_iter().take(TOP_N) {
            hotspots.push(format!("Long file: {} ({} lines)", path, lines));
        }

        let mut heaviest: Vec<(&String, u64)> =
            metrics.iter().filter(|(_, m)| m.size >= HEAVY_FILE_THRESHOLD).map(|(path, m)| (path, m.size)).collect();
        heaviest.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        for (path, size) in heaviest.into_iter().take(TOP_N) {
            hotspots.push(format!("Heavy file: {} ({} bytes)", path, size));
        }

        for entry in dependency_insights.fan_out.iter().take(TOP_N) {
            hotspots.push(format!("Fan-out module: {} ({} local imports)", entry.path, entry.count));
        }
        for entry in dependency_insights.fan_in.iter().take(TOP_N) {
            hotspots.push(format!("Fan-in module: {} ({} importers)", entry.path, entry.count));
        }

        hotspots.push(format!("Unresolved imports: {}", dependencies.unresolved.len()));

        let total_todos: usize = metrics.values().map(|m| m.todo_count).sum();
        hotspots.push(format!("TODO-style comments: {}", total_todos));

        hotspots
    }

    fn actions(&self, issues: &[Issue]) -> Vec<String> {
        let mut by_type: HashMap<&str, usize> = HashMap::new();
        for issue in issues {
            if let Some(kind) = &issue.issue_type {
                *by_type.entry(kind.as_str()).or_insert(0) += 1;
            }
        }
        let mut ranked: Vec<(&str, usize)> = by_type.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        ranked
            .into_iter()
            .take(ACTION_LIMIT)
            .map(|(kind, count)| format!("Address {} occurrence(s) of '{}'", count, kind))
            .collect()
    }

    fn metrics_highlights(&self, metrics: &MetricsMap) -> Vec<String> {
        let mut entries: Vec<(&String, f64)> = metrics
            .iter()
            .filter_map(|(path, m)| m.complexity_score.map(|c| (path, c)))
            .collect();
        entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        entries
            .into_iter()
            .take(5)
            .map(|(path, score)| format!("{}: complexity {:.2}", path, score))
            .collect()
    }

    fn clone_summary(&self, clones: &CloneMap, structure: &StructureGraph) -> (Vec<String>, Vec<CloneDetail>) {
        let symbols: HashMap<String, (&str, &str, usize, usize)> = structure
            .nodes()
            .filter_map(|n| match n {
                crate::models::structure_graph::StructureNode::Symbol { id, name, path, start_line, end_line, .. } => {
                    Some((id.clone(), (name.as_str(), path.as_str(), *start_line, *end_line)))
                }
                _ => None,
            })
            .collect();

        let mut seen_pairs: std::collections::HashSet<(String, String)> = std::collections::HashSet::new();
        let mut lines = Vec::new();
        let mut details = Vec::new();

        let mut source_ids: Vec<&String> = clones.keys().collect();
        source_ids.sort();

        for source_id in source_ids {
            let Some(&(source_name, source_path, source_start, source_end)) = symbols.get(source_id) else { continue };
            for entry in &clones[source_id] {
                let key = if source_id < &entry.target_id {
                    (source_id.clone(), entry.target_id.clone())
                } else {
                    (entry.target_id.clone(), source_id.clone())
                };
                if !seen_pairs.insert(key) {
                    continue;
                }
                let target_name = symbols.get(&entry.target_id).map(|s| s.0).unwrap_or(entry.target_id.as_str());

                lines.push(format!(
                    "{} — {} → {} — {} ({:.0}% similar) [{}-{}]",
                    source_name,
                    source_path,
                    target_name,
                    entry.file_path,
                    entry.similarity * 100.0,
                    entry.start_line,
                    entry.end_line
                ));
                details.push(CloneDetail {
                    source_name: source_name.to_string(),
                    source_path: source_path.to_string(),
                    source_start_line: source_start,
                    source_end_line: source_end,
                    target_name: target_name.to_string(),
                    target_path: entry.file_path.clone(),
                    target_start_line: entry.start_line,
                    target_end_line: entry.end_line,
                    similarity: entry.similarity,
                });
                if lines.len() >= CLONE_LIMIT {
                    return (lines, details);
                }
            }
        }

        (lines, details)
    }
}

impl Default for NarrativeSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::report::FanEntry;

    #[test]
    fn test_overview_mentions_root_path() {
        let synth = NarrativeSynthesizer::new();
        let totals = Totals { directories: 2, files: 5, truncated: false, walk_duration_ms: 10 };
        let languages = vec![LanguageStat { language: "javascript".into(), files: 5, lines: 100, bytes: 500 }];
        let largest_files = vec![FileSizeEntry { path: "a.js".into(), size: 500, language: Some("javascript".into()) }];
        let structure = StructureGraph::new();
        let dependencies = DependencyGraph::default();
        let insights = DependencyInsights { fan_out: Vec::new(), fan_in: Vec::new(), external_packages: Vec::new() };
        let metrics = MetricsMap::new();
        let issues = Vec::new();
        let clones = CloneMap::new();

        let narrative = synth.synthesize(
            "/tmp/project",
            &totals,
            &languages,
            &largest_files,
            &structure,
            &dependencies,
            &insights,
            &metrics,
            &issues,
            &clones,
        );

        assert!(narrative.overview.contains("/tmp/project"));
        assert!(narrative.overview.contains("javascript") || !narrative.overview.is_empty());
        let _ = FanEntry { path: String::new(), count: 0 };
    }

    #[test]
    fn test_empty_project_overview() {
        let synth = NarrativeSynthesizer::new();
        let totals = Totals { directories: 1, files: 0, truncated: false, walk_duration_ms: 1 };
        let narrative = synth.synthesize(
            "/tmp/empty",
            &totals,
            &[],
            &[],
            &StructureGraph::new(),
            &DependencyGraph::default(),
            &DependencyInsights { fan_out: Vec::new(), fan_in: Vec::new(), external_packages: Vec::new() },
            &MetricsMap::new(),
            &[],
            &CloneMap::new(),
        );
        assert_eq!(narrative.overview, "No notable architectural facts detected.");
        assert!(narrative.key_facts.is_empty());
    }

    #[test]
    fn test_clone_line_matches_spec_format() {
        use crate::models::clone::CloneEntry;
        use crate::models::structure_graph::StructureNode;

        let mut structure = StructureGraph::new();
        structure.upsert_node(StructureNode::Symbol {
            id: "function:a.js#foo".into(),
            name: "foo".into(),
            symbol_kind: crate::models::symbol::SymbolKind::Function,
            path: "a.js".into(),
            language: Some("javascript".into()),
            start_line: 1,
            end_line: 5,
        });
        structure.upsert_node(StructureNode::Symbol {
            id: "function:b.js#bar".into(),
            name: "bar".into(),
            symbol_kind: crate::models::symbol::SymbolKind::Function,
            path: "b.js".into(),
            language: Some("javascript".into()),
            start_line: 10,
            end_line: 14,
        });

        let mut clones = CloneMap::new();
        clones.insert(
            "function:a.js#foo".into(),
            vec![CloneEntry {
                target_id: "function:b.js#bar".into(),
                file_path: "b.js".into(),
                start_line: 10,
                end_line: 14,
                similarity: 0.87,
            }],
        );

        let synth = NarrativeSynthesizer::new();
        let (lines, details) = synth.clone_summary(&clones, &structure);

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0], "foo — a.js → bar — b.js (87% similar) [10-14]");
        assert_eq!(details[0].target_start_line, 10);
        assert_eq!(details[0].target_end_line, 14);
    }
}
