//! Pipeline orchestration (spec §2, §5): Walker -> Metrics, Dependency Graph
//! -> Structure Graph -> {Clones, Smells} -> Narrative, in that order.
//! Grounded on `examples/antstanley-walker/src/core/analyzer.rs`'s role as a
//! composing orchestrator over otherwise-independent stage modules.

pub mod clones;
pub mod metrics;
pub mod narrative;
pub mod smells;

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use rayon::prelude::*;

use crate::error::Result;
use crate::language::{is_js_family_ext, language_for_ext};
use crate::models::clone::CloneMap;
use crate::models::config::Settings;
use crate::models::dependency::{compute_export_usage, DependencyGraph, ExportSet, ImportDescriptor};
use crate::models::fs::{build_tree, FileEntry, WalkResult};
use crate::models::issue::{Issue, IssueCategory, IssueSeverity};
use crate::models::metrics::MetricsMap;
use crate::models::report::{
    DependenciesSection, DependencyInsights, ExternalPackageEntry, FanEntry, FileLineEntry, FileSizeEntry,
    LanguageStat, MetricsSection, Report, StructureGraphSection, StructureTotals, Summary, Totals,
};
use crate::models::snippet::SourceSnippet;
use crate::models::structure_graph::{EdgeKind, StructureGraph, StructureNode};
use crate::models::symbol::{CallEdge, Symbol, SymbolKind};
use crate::output::ProgressReporter;
use crate::parsers::{resolve_dependencies, AstParser};

const TOP_N_FILES: usize = 10;
const TOP_N_FAN: usize = 10;
const TOP_N_EXTERNAL: usize = 15;

/// Floor/ceiling on the `maxBytes` argument to [`source_snippet`] (spec §6).
pub const SNIPPET_MIN_BYTES: usize = 1024;
pub const SNIPPET_MAX_BYTES: usize = 512 * 1024;

/// The pure `analyze(rootPath) -> Report` pipeline entry point (spec §6),
/// taking an explicit `Settings` so every configuration knob is testable
/// without global state. `settings.scan_path` is the root being analyzed.
pub fn analyze(settings: &Settings, reporter: &ProgressReporter) -> Result<Report> {
    let root = settings.scan_path.as_path();
    let phases = crate::output::PIPELINE_PHASES;

    reporter.start_phase(0, phases.len(), phases[0]);
    let mut walk = if settings.parallel {
        crate::core::ParallelWalker::new(settings).walk(root)
    } else {
        crate::core::Walker::new(settings).walk(root)
    };
    apply_exclude_patterns(&mut walk, settings);
    let file_tree = build_tree(&walk);

    reporter.start_phase(1, phases.len(), phases[1]);
    let metrics_analyzer = metrics::MetricsAnalyzer::new();
    let metrics_result = metrics_analyzer.analyze(root, &walk.files, settings);

    reporter.start_phase(2, phases.len(), phases[2]);
    let mut dependency_graph = resolve_dependencies(root, &walk.files, settings);

    reporter.start_phase(3, phases.len(), phases[3]);
    let StructurePass { graph: structure_graph, symbols, exports_by_file, imports_by_file, incoming_calls, issues: ast_issues } =
        build_structure(root, &walk.files, settings);

    dependency_graph.imports_by_file = imports_by_file;
    let export_usage = compute_export_usage(&dependency_graph, &exports_by_file);

    let mut structure_graph = structure_graph;
    add_import_edges(&mut structure_graph, &dependency_graph);

    reporter.start_phase(4, phases.len(), phases[4]);
    let clones = clones::CloneDetector::new().detect(&symbols, settings);

    reporter.start_phase(5, phases.len(), phases[5]);
    let smell_issues = smells::SmellDetector::new().detect(&symbols);

    let mut issues: Vec<Issue> = Vec::new();
    issues.extend(walk.warnings.iter().map(filesystem_issue));
    issues.extend(metrics_result.issues);
    issues.extend(dependency_graph.unresolved.iter().map(unresolved_issue));
    issues.extend(ast_issues);
    issues.extend(smell_issues);
    crate::models::issue::sort_by_severity(&mut issues);

    let summary = build_summary(&walk, &metrics_result.files);
    let dependency_insights = build_dependency_insights(&dependency_graph);
    let structure_section = build_structure_section(&structure_graph, &symbols, &exports_by_file, &export_usage, &incoming_calls);

    reporter.start_phase(6, phases.len(), phases[6]);
    let narrative = narrative::NarrativeSynthesizer::new().synthesize(
        &root.display().to_string(),
        &summary.totals,
        &summary.languages,
        &summary.largest_files,
        &structure_graph,
        &dependency_graph,
        &dependency_insights,
        &metrics_result.files,
        &issues,
        &clones,
    );

    Ok(Report {
        root_path: root.display().to_string(),
        generated_at: chrono::Utc::now().to_rfc3339(),
        summary,
        file_tree,
        dependencies: DependenciesSection {
            nodes: dependency_graph.nodes.clone(),
            edges: dependency_graph.edges.clone(),
            unresolved: dependency_graph.unresolved.clone(),
        },
        dependency_insights,
        structure_graph: structure_section,
        clones,
        metrics: MetricsSection { files: metrics_result.files },
        issues,
        narrative,
    })
}

/// The source-snippet interface consumed by the UI (spec §6): returns the
/// first `min(size, maxBytes)` bytes of `file_path`'s contents, decoded as
/// UTF-8. Rejects any `file_path` that resolves outside `root` with a
/// `PathEscapesRoot` error rather than reading it.
pub fn source_snippet(root: &Path, file_path: &str, max_bytes: usize) -> Result<SourceSnippet> {
    let max_bytes = max_bytes.clamp(SNIPPET_MIN_BYTES, SNIPPET_MAX_BYTES);

    let joined = root.join(file_path);
    let canonical_root = fs::canonicalize(root).map_err(crate::error::AnalysisError::io_error)?;
    let canonical_target = fs::canonicalize(&joined).map_err(crate::error::AnalysisError::io_error)?;
    if !canonical_target.starts_with(&canonical_root) {
        return Err(crate::error::AnalysisError::path_escapes_root(joined));
    }

    let bytes = fs::read(&canonical_target).map_err(crate::error::AnalysisError::io_error)?;
    let size = bytes.len() as u64;
    let truncated = bytes.len() > max_bytes;
    let slice = &bytes[..max_bytes.min(bytes.len())];
    let content = String::from_utf8_lossy(slice).into_owned();

    Ok(SourceSnippet {
        path: file_path.to_string(),
        size,
        content,
        truncated,
    })
}

/// Reads a capped snippet of source text for `path`, by 1-based inclusive
/// line range, used internally to build narrative clone details (not the
/// spec §6 UI-facing `source_snippet` above).
pub fn read_snippet(root: &Path, path: &str, start_line: usize, end_line: usize, cap_bytes: usize) -> Result<String> {
    let content = fs::read_to_string(root.join(path)).map_err(crate::error::AnalysisError::io_error)?;
    let start_line = start_line.max(1);
    let selected: String = content
        .lines()
        .skip(start_line - 1)
        .take(end_line.saturating_sub(start_line) + 1)
        .collect::<Vec<_>>()
        .join("\n");
    Ok(cap_text(&selected, cap_bytes))
}

fn apply_exclude_patterns(walk: &mut WalkResult, settings: &Settings) {
    if settings.exclude_patterns.is_empty() {
        return;
    }
    let patterns: Vec<glob::Pattern> =
        settings.exclude_patterns.iter().filter_map(|p| glob::Pattern::new(p).ok()).collect();
    let matches = |path: &str| patterns.iter().any(|p| p.matches(path));

    walk.files.retain(|f| !matches(&f.path));
    walk.directories.retain(|d| d.path == "." || !matches(&d.path));
}

struct StructurePass {
    graph: StructureGraph,
    symbols: Vec<Symbol>,
    exports_by_file: HashMap<String, ExportSet>,
    imports_by_file: HashMap<String, Vec<ImportDescriptor>>,
    incoming_calls: HashMap<String, usize>,
    issues: Vec<Issue>,
}

fn build_structure(root: &Path, files: &[FileEntry], settings: &Settings) -> StructurePass {
    let parser = AstParser::new();

    struct FileResult {
        path: String,
        language: Option<String>,
        symbols: Vec<Symbol>,
        exports: ExportSet,
        imports: Vec<ImportDescriptor>,
        calls: Vec<CallEdge>,
        issue: Option<Issue>,
    }

    let parse_one = |file: &FileEntry| -> FileResult {
        let language = language_for_ext(&file.ext).map(str::to_string);

        if !is_js_family_ext(&file.ext) {
            return FileResult {
                path: file.path.clone(),
                language: language.clone(),
                symbols: vec![fallback_symbol(root, &file.path, language, settings)],
                exports: ExportSet::new(),
                imports: Vec::new(),
                calls: Vec::new(),
                issue: None,
            };
        }

        if file.size > settings.ast_max_file_bytes {
            return FileResult {
                path: file.path.clone(),
                language: language.clone(),
                symbols: vec![fallback_symbol(root, &file.path, language, settings)],
                exports: ExportSet::new(),
                imports: Vec::new(),
                calls: Vec::new(),
                issue: Some(
                    Issue::new(
                        IssueCategory::Filesystem,
                        IssueSeverity::Info,
                        file.path.clone(),
                        format!("File too large for AST analysis ({} bytes)", file.size),
                    )
                    .with_type("ast-file-too-large"),
                ),
            };
        }

        match parser.parse_and_analyze(&root.join(&file.path), &file.path) {
            Ok(analysis) => {
                // Spec §4.2/§7: on AST parse failure, fall back to a single
                // file-scope symbol so downstream passes still have a unit —
                // no issue is raised for this case.
                if analysis.has_errors {
                    return FileResult {
                        path: file.path.clone(),
                        language: Some(analysis.language.clone()),
                        symbols: vec![fallback_symbol(root, &file.path, Some(analysis.language), settings)],
                        exports: ExportSet::new(),
                        imports: Vec::new(),
                        calls: Vec::new(),
                        issue: None,
                    };
                }

                let symbols = analysis
                    .symbols
                    .iter()
                    .map(|raw| to_symbol(raw, &file.path, &analysis.language, &analysis.source_text, settings))
                    .collect();

                FileResult {
                    path: file.path.clone(),
                    language: Some(analysis.language),
                    symbols,
                    exports: analysis.exports,
                    imports: analysis.imports,
                    calls: analysis.calls,
                    issue: None,
                }
            }
            Err(err) => FileResult {
                path: file.path.clone(),
                language: language.clone(),
                symbols: vec![fallback_symbol(root, &file.path, language, settings)],
                exports: ExportSet::new(),
                imports: Vec::new(),
                calls: Vec::new(),
                issue: Some(
                    Issue::new(
                        IssueCategory::Filesystem,
                        IssueSeverity::Warning,
                        file.path.clone(),
                        format!("Failed to read file for AST analysis: {}", err),
                    )
                    .with_type("file-read-error"),
                ),
            },
        }
    };

    let results: Vec<FileResult> =
        if settings.parallel { files.par_iter().map(parse_one).collect() } else { files.iter().map(parse_one).collect() };

    let mut graph = StructureGraph::new();
    let mut all_symbols: Vec<Symbol> = Vec::new();
    let mut exports_by_file: HashMap<String, ExportSet> = HashMap::new();
    let mut imports_by_file: HashMap<String, Vec<ImportDescriptor>> = HashMap::new();
    let mut issues: Vec<Issue> = Vec::new();
    let mut all_calls: Vec<CallEdge> = Vec::new();

    for result in results {
        let package_name = top_level_dir(&result.path);
        let package_node = StructureNode::package(&package_name);
        let package_id = package_node.id().to_string();
        graph.upsert_node(package_node);

        let file_node = StructureNode::file(&result.path, result.language.clone());
        let file_id = file_node.id().to_string();
        graph.upsert_node(file_node);
        graph.add_edge(&package_id, &file_id, EdgeKind::Contains);

        for symbol in &result.symbols {
            graph.upsert_node(StructureNode::from_symbol(symbol));
            graph.add_edge(&file_id, &symbol.id, EdgeKind::Defines);
        }

        exports_by_file.insert(result.path.clone(), result.exports);
        imports_by_file.insert(result.path.clone(), result.imports);
        all_calls.extend(result.calls);
        if let Some(issue) = result.issue {
            issues.push(issue);
        }
        all_symbols.extend(result.symbols);
    }

    let mut incoming_calls: HashMap<String, usize> = HashMap::new();
    for call in &all_calls {
        *incoming_calls.entry(call.callee.clone()).or_insert(0) += 1;
    }

    StructurePass { graph, symbols: all_symbols, exports_by_file, imports_by_file, incoming_calls, issues }
}

/// Builds the spec §4.2 fallback whole-file symbol: for non-JS-family
/// languages, oversize files, or AST-parse failures. Spans the whole file so
/// it still carries a real `text`/line range for the smell pass (spec §9:
/// "the fallback `kind=file` symbol participates in smell thresholds only if
/// its text meets the criteria").
fn fallback_symbol(root: &Path, path: &str, language: Option<String>, settings: &Settings) -> Symbol {
    let content = fs::read_to_string(root.join(path)).unwrap_or_default();
    let end_line = content.lines().count().max(1);
    let text = cap_text(&content, settings.clone_snippet_cap_bytes);

    Symbol {
        id: Symbol::file_fallback_id(path),
        file_id: format!("file:{}", path),
        name: path.rsplit('/').next().unwrap_or(path).to_string(),
        kind: SymbolKind::File,
        path: path.to_string(),
        language,
        start_line: 1,
        end_line,
        text,
    }
}

fn to_symbol(
    raw: &crate::parsers::symbol_visitor::RawSymbol,
    path: &str,
    language: &str,
    source_text: &str,
    settings: &Settings,
) -> Symbol {
    let end_byte = raw.end_byte.min(source_text.len());
    let start_byte = raw.start_byte.min(end_byte);
    let text = cap_text(&source_text[start_byte..end_byte], settings.clone_snippet_cap_bytes);

    Symbol {
        id: Symbol::id_for(raw.kind, path, &raw.name),
        file_id: format!("file:{}", path),
        name: raw.name.clone(),
        kind: raw.kind,
        path: path.to_string(),
        language: Some(language.to_string()),
        start_line: raw.start_line,
        end_line: raw.end_line,
        text,
    }
}

/// Emits `file -> file` `import` edges into the structure graph for every
/// locally-resolved dependency edge whose endpoints are both file nodes
/// (spec §3 Edge, §4.3 "import: ... emitted only when both endpoints are
/// file nodes and resolution kind is local").
fn add_import_edges(graph: &mut StructureGraph, dependency_graph: &DependencyGraph) {
    for edge in &dependency_graph.edges {
        if edge.kind != crate::models::dependency::ResolutionKind::Local {
            continue;
        }
        let Some(target) = &edge.target else { continue };
        let source_id = format!("file:{}", edge.source);
        let target_id = format!("file:{}", target);
        if graph.has_node(&source_id) && graph.has_node(&target_id) {
            graph.add_edge(&source_id, &target_id, EdgeKind::Import);
        }
    }
}

fn top_level_dir(path: &str) -> String {
    match path.find('/') {
        Some(idx) => path[..idx].to_string(),
        None => "root".to_string(),
    }
}

fn cap_text(text: &str, cap_bytes: usize) -> String {
    if text.len() <= cap_bytes {
        return text.to_string();
    }
    let mut end = cap_bytes;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_string()
}

fn filesystem_issue(warning: &crate::models::fs::Warning) -> Issue {
    let message = match &warning.error {
        Some(err) => format!("{:?}: {}", warning.kind, err),
        None => format!("{:?}", warning.kind),
    };
    Issue::new(IssueCategory::Filesystem, IssueSeverity::Warning, warning.path.clone(), message)
        .with_type(warning_type(warning.kind))
}

fn warning_type(kind: crate::models::fs::WarningKind) -> &'static str {
    match kind {
        crate::models::fs::WarningKind::StatError => "stat-error",
        crate::models::fs::WarningKind::ReadError => "read-error",
        crate::models::fs::WarningKind::LimitReached => "limit-reached",
    }
}

fn unresolved_issue(unresolved: &crate::models::dependency::UnresolvedImport) -> Issue {
    Issue::new(IssueCategory::Dependency, IssueSeverity::Warning, unresolved.source.clone(), unresolved.reason.clone())
        .with_type("unresolved-import")
}

fn build_summary(walk: &WalkResult, metrics: &MetricsMap) -> Summary {
    let mut by_language: HashMap<String, (usize, usize, u64)> = HashMap::new();
    for file in &walk.files {
        let Some(language) = language_for_ext(&file.ext) else { continue };
        let entry = by_language.entry(language.to_string()).or_insert((0, 0, 0));
        entry.0 += 1;
        entry.2 += file.size;
        if let Some(m) = metrics.get(&file.path) {
            entry.1 += m.line_count.unwrap_or(0);
        }
    }
    let mut languages: Vec<LanguageStat> = by_language
        .into_iter()
        .map(|(language, (files, lines, bytes))| LanguageStat { language, files, lines, bytes })
        .collect();
    languages.sort_by(|a, b| b.files.cmp(&a.files).then_with(|| a.language.cmp(&b.language)));

    let mut largest_files: Vec<FileSizeEntry> = walk
        .files
        .iter()
        .map(|f| FileSizeEntry { path: f.path.clone(), size: f.size, language: language_for_ext(&f.ext).map(str::to_string) })
        .collect();
    largest_files.sort_by(|a, b| b.size.cmp(&a.size));
    largest_files.truncate(TOP_N_FILES);

    let mut longest_files: Vec<FileLineEntry> = metrics
        .iter()
        .filter_map(|(path, m)| m.line_count.map(|lines| FileLineEntry { path: path.clone(), line_count: lines }))
        .collect();
    longest_files.sort_by(|a, b| b.line_count.cmp(&a.line_count));
    longest_files.truncate(TOP_N_FILES);

    Summary {
        totals: Totals {
            directories: walk.directories.len(),
            files: walk.files.len(),
            truncated: walk.truncated,
            walk_duration_ms: walk.walk_duration_ms,
        },
        languages,
        largest_files,
        longest_files,
        warnings_count: walk.warnings.len(),
    }
}

fn build_dependency_insights(graph: &DependencyGraph) -> DependencyInsights {
    let mut fan_out: Vec<FanEntry> =
        graph.nodes.iter().map(|path| FanEntry { path: path.clone(), count: graph.fan_out(path) }).filter(|e| e.count > 0).collect();
    fan_out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.path.cmp(&b.path)));
    fan_out.truncate(TOP_N_FAN);

    let mut fan_in: Vec<FanEntry> =
        graph.nodes.iter().map(|path| FanEntry { path: path.clone(), count: graph.fan_in(path) }).filter(|e| e.count > 0).collect();
    fan_in.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.path.cmp(&b.path)));
    fan_in.truncate(TOP_N_FAN);

    let mut external_packages: Vec<ExternalPackageEntry> = graph
        .external_package_counts()
        .into_iter()
        .map(|(specifier, count)| ExternalPackageEntry { specifier, count })
        .collect();
    external_packages.truncate(TOP_N_EXTERNAL);

    DependencyInsights { fan_out, fan_in, external_packages }
}

fn build_structure_section(
    graph: &StructureGraph,
    symbols: &[Symbol],
    exports_by_file: &HashMap<String, ExportSet>,
    export_usage: &crate::models::dependency::ExportUsageMap,
    incoming_calls: &HashMap<String, usize>,
) -> StructureGraphSection {
    let nodes: Vec<StructureNode> = graph.nodes().cloned().collect();
    let totals = StructureTotals {
        packages: nodes.iter().filter(|n| matches!(n, StructureNode::Package { .. })).count(),
        files: nodes.iter().filter(|n| matches!(n, StructureNode::File { .. })).count(),
        symbols: nodes.iter().filter(|n| matches!(n, StructureNode::Symbol { .. })).count(),
    };

    let mut exports: HashMap<String, Vec<String>> = HashMap::new();
    for (path, set) in exports_by_file {
        if set.is_empty() {
            continue;
        }
        let mut names: Vec<String> = set.iter().cloned().collect();
        names.sort();
        exports.insert(path.clone(), names);
    }

    StructureGraphSection {
        nodes,
        edges: graph.edges(),
        symbols: symbols.to_vec(),
        totals,
        incoming_calls: incoming_calls.clone(),
        exports,
        export_usage: export_usage.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::ProgressReporter;
    use tempfile::tempdir;

    #[test]
    fn test_analyze_basic_project() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.js"), "export function add(x, y) { return x + y; }\n").unwrap();
        fs::write(dir.path().join("b.js"), "import { add } from './a.js';\nexport function sum3(x, y, z) { return add(add(x, y), z); }\n").unwrap();

        let mut settings = Settings::default();
        settings.scan_path = dir.path().to_path_buf();
        settings.show_progress = false;
        settings.quiet = true;

        let reporter = ProgressReporter::new(true, false);
        let report = analyze(&settings, &reporter).unwrap();

        assert_eq!(report.summary.totals.files, 2);
        assert!(report.dependencies.edges.iter().any(|e| e.target.as_deref() == Some("a.js")));
        assert!(report.structure_graph.totals.symbols >= 2);
    }

    #[test]
    fn test_read_snippet_caps_length() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.js"), "line one\nline two\nline three\n").unwrap();
        let snippet = read_snippet(dir.path(), "a.js", 1, 2, 5).unwrap();
        assert!(snippet.len() <= 5);
    }

    #[test]
    fn test_source_snippet_truncates_and_reports_size() {
        let dir = tempdir().unwrap();
        let content = "x".repeat(4000);
        fs::write(dir.path().join("big.txt"), &content).unwrap();

        let snippet = source_snippet(dir.path(), "big.txt", SNIPPET_MIN_BYTES).unwrap();
        assert_eq!(snippet.size, 4000);
        assert!(snippet.truncated);
        assert_eq!(snippet.content.len(), SNIPPET_MIN_BYTES);
        assert_eq!(snippet.path, "big.txt");
    }

    #[test]
    fn test_source_snippet_untruncated_when_smaller_than_cap() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("small.txt"), "hello").unwrap();

        let snippet = source_snippet(dir.path(), "small.txt", SNIPPET_MIN_BYTES).unwrap();
        assert_eq!(snippet.size, 5);
        assert!(!snippet.truncated);
        assert_eq!(snippet.content, "hello");
    }

    #[test]
    fn test_source_snippet_rejects_path_escaping_root() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        fs::write(dir.path().join("secret.txt"), "top secret").unwrap();

        let err = source_snippet(&sub, "../secret.txt", SNIPPET_MIN_BYTES);
        assert!(err.is_err());
    }
}
