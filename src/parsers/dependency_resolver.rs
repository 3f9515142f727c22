//! Regex-based per-language specifier extraction and local-file resolution
//! (spec §4.3a/§4.3b). Grounded on `examples/antstanley-walker/src/utils/
//! path_resolver.rs`'s first-char-dispatch + extension-probe-list style, but
//! resolution only ever looks into the Walker's known file set — no
//! `node_modules`, no `tsconfig.json` path mapping, no `package.json`
//! `exports` field.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use regex::Regex;

use crate::models::config::Settings;
use crate::models::dependency::{DependencyEdge, DependencyGraph, ResolutionKind, UnresolvedImport};
use crate::models::fs::FileEntry;

/// Extensions probed, in order, after the exact path (spec §4.3a).
const PROBE_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "mjs", "cjs", "json"];

struct Patterns {
    js_static_import: Regex,
    js_dynamic_import: Regex,
    js_require: Regex,
    py_import: Regex,
    py_from_import: Regex,
    go_single_import: Regex,
    go_block_import: Regex,
    go_quoted_line: Regex,
}

impl Patterns {
    fn new() -> Self {
        Self {
            js_static_import: Regex::new(r#"(?m)^\s*import\s+(?:[^'"();]+?\s+from\s+)?['"]([^'"]+)['"]"#).unwrap(),
            js_dynamic_import: Regex::new(r#"import\s*\(\s*['"]([^'"]+)['"]\s*\)"#).unwrap(),
            js_require: Regex::new(r#"require\s*\(\s*['"]([^'"]+)['"]\s*\)"#).unwrap(),
            py_import: Regex::new(r"(?m)^\s*import\s+([A-Za-z_][\w.]*(?:\s*,\s*[A-Za-z_][\w.]*)*)").unwrap(),
            py_from_import: Regex::new(r"(?m)^\s*from\s+(\.*[A-Za-z_][\w.]*|\.+)\s+import\b").unwrap(),
            go_single_import: Regex::new(r#"(?m)^\s*import\s+"([^"]+)""#).unwrap(),
            go_block_import: Regex::new(r"(?s)import\s*\(([^)]*)\)").unwrap(),
            go_quoted_line: Regex::new(r#""([^"]+)""#).unwrap(),
        }
    }

    /// Extracts the raw specifier strings referenced by a file, per its
    /// language (spec §4.3a language-specific regexes).
    fn extract(&self, language: Option<&str>, content: &str) -> Vec<String> {
        match language {
            Some("javascript") | Some("typescript") => {
                let mut out = Vec::new();
                for re in [&self.js_static_import, &self.js_dynamic_import, &self.js_require] {
                    out.extend(re.captures_iter(content).map(|c| c[1].to_string()));
                }
                out
            }
            Some("python") => {
                let mut out = Vec::new();
                for caps in self.py_import.captures_iter(content) {
                    for module in caps[1].split(',') {
                        out.push(module.trim().to_string());
                    }
                }
                for caps in self.py_from_import.captures_iter(content) {
                    out.push(caps[1].to_string());
                }
                out
            }
            Some("go") => {
                let mut out = Vec::new();
                for caps in self.go_single_import.captures_iter(content) {
                    out.push(caps[1].to_string());
                }
                for block in self.go_block_import.captures_iter(content) {
                    for line in self.go_quoted_line.captures_iter(&block[1]) {
                        out.push(line[1].to_string());
                    }
                }
                out
            }
            _ => Vec::new(),
        }
    }
}

/// Extracts the raw specifier strings a file references, dispatching on
/// `language` (as returned by [`crate::language::language_for_ext`]).
pub fn extract_specifiers(language: Option<&str>, content: &str) -> Vec<String> {
    Patterns::new().extract(language, content)
}

/// True iff a specifier is relative per spec §4.3a ("starts with `.` or
/// `/`").
fn is_relative(specifier: &str) -> bool {
    specifier.starts_with('.') || specifier.starts_with('/')
}

/// Joins a specifier against the directory containing `source_path`,
/// normalizing `.`/`..` segments. Both paths use forward slashes.
fn join_relative(source_path: &str, specifier: &str) -> String {
    let mut segments: Vec<&str> = match source_path.rfind('/') {
        Some(idx) => source_path[..idx].split('/').collect(),
        None => Vec::new(),
    };
    if segments == ["."] {
        segments.clear();
    }

    for part in specifier.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        ".".to_string()
    } else {
        segments.join("/")
    }
}

/// Converts a Python relative-import specifier (one or more leading dots,
/// optionally followed by a dotted module path) into a forward-slash path
/// joined against `source_path`'s directory. Each dot beyond the first
/// steps one directory further up, matching Python's relative-import depth
/// semantics.
fn join_python_relative(source_path: &str, specifier: &str) -> String {
    let dots = specifier.chars().take_while(|&c| c == '.').count();
    let rest = &specifier[dots..];

    let mut segments: Vec<&str> = match source_path.rfind('/') {
        Some(idx) => source_path[..idx].split('/').collect(),
        None => Vec::new(),
    };
    if segments == ["."] {
        segments.clear();
    }
    for _ in 0..dots.saturating_sub(1) {
        segments.pop();
    }
    if !rest.is_empty() {
        segments.extend(rest.split('.'));
    }

    if segments.is_empty() {
        ".".to_string()
    } else {
        segments.join("/")
    }
}

/// Probes the known file set for `candidate`: exact path, then
/// `candidate.{ext}` for each probed extension, then
/// `candidate/index.{ext}` (spec §4.3a probe order).
fn probe(candidate: &str, known_files: &HashSet<String>) -> Option<String> {
    if known_files.contains(candidate) {
        return Some(candidate.to_string());
    }
    for ext in PROBE_EXTENSIONS {
        let with_ext = format!("{}.{}", candidate, ext);
        if known_files.contains(&with_ext) {
            return Some(with_ext);
        }
    }
    for ext in PROBE_EXTENSIONS {
        let index = format!("{}/index.{}", candidate, ext);
        if known_files.contains(&index) {
            return Some(index);
        }
    }
    None
}

/// Runs the full §4.3a dependency-resolution pass over every scanned file,
/// returning an owned [`DependencyGraph`] (no shared mutable map; spec §9).
pub fn resolve_dependencies(root: &Path, files: &[FileEntry], settings: &Settings) -> DependencyGraph {
    let patterns = Patterns::new();
    let known_files: HashSet<String> = files.iter().map(|f| f.path.clone()).collect();

    let mut graph = DependencyGraph { nodes: Vec::new(), edges: Vec::new(), unresolved: Vec::new(), imports_by_file: Default::default() };
    let mut touched: HashSet<String> = HashSet::new();

    for file in files {
        let language = crate::language::language_for_ext(&file.ext);
        if language.is_none() {
            continue;
        }

        if file.size > settings.dependency_max_file_size {
            graph.unresolved.push(UnresolvedImport {
                source: file.path.clone(),
                specifier: None,
                reason: format!("File too large for dependency analysis ({} bytes)", file.size),
            });
            continue;
        }

        let abs_path = root.join(&file.path);
        let content = match fs::read_to_string(&abs_path) {
            Ok(c) => c,
            Err(err) => {
                graph.unresolved.push(UnresolvedImport {
                    source: file.path.clone(),
                    specifier: None,
                    reason: format!("Failed to read file: {}", err),
                });
                continue;
            }
        };

        let specifiers = patterns.extract(language, &content);
        for specifier in specifiers {
            let is_py_relative = language == Some("python") && specifier.starts_with('.');
            let relative = is_relative(&specifier) || is_py_relative;

            if !relative {
                graph.edges.push(DependencyEdge {
                    source: file.path.clone(),
                    target: None,
                    specifier: specifier.clone(),
                    kind: ResolutionKind::External,
                });
                touched.insert(file.path.clone());
                continue;
            }

            let candidate = if is_py_relative {
                join_python_relative(&file.path, &specifier)
            } else {
                join_relative(&file.path, &specifier)
            };

            match probe(&candidate, &known_files) {
                Some(target) => {
                    graph.edges.push(DependencyEdge {
                        source: file.path.clone(),
                        target: Some(target.clone()),
                        specifier: specifier.clone(),
                        kind: ResolutionKind::Local,
                    });
                    touched.insert(file.path.clone());
                    touched.insert(target);
                }
                None => {
                    graph.unresolved.push(UnresolvedImport {
                        source: file.path.clone(),
                        specifier: Some(specifier.clone()),
                        reason: format!("Could not resolve relative specifier '{}'", specifier),
                    });
                }
            }
        }
    }

    let mut nodes: Vec<String> = touched.into_iter().collect();
    nodes.sort();
    graph.nodes = nodes;

    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_resolves_exact_relative_specifier() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.js"), "export function foo() {}").unwrap();
        std::fs::write(dir.path().join("b.js"), "import { foo } from './a.js';\nfoo();").unwrap();

        let files = vec![
            FileEntry { path: "a.js".into(), name: "a.js".into(), ext: "js".into(), size: 24, mtime: None, depth: 1, is_symbolic_link: false },
            FileEntry { path: "b.js".into(), name: "b.js".into(), ext: "js".into(), size: 40, mtime: None, depth: 1, is_symbolic_link: false },
        ];
        let settings = Settings::default();
        let graph = resolve_dependencies(dir.path(), &files, &settings);

        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].kind, ResolutionKind::Local);
        assert_eq!(graph.edges[0].target.as_deref(), Some("a.js"));
    }

    #[test]
    fn test_prefers_exact_extension_over_index() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("x")).unwrap();
        std::fs::write(dir.path().join("x.ts"), "export {}").unwrap();
        std::fs::write(dir.path().join("x/index.ts"), "export {}").unwrap();
        std::fs::write(dir.path().join("b.ts"), "import './x';").unwrap();

        let files = vec![
            FileEntry { path: "x.ts".into(), name: "x.ts".into(), ext: "ts".into(), size: 10, mtime: None, depth: 1, is_symbolic_link: false },
            FileEntry { path: "x/index.ts".into(), name: "index.ts".into(), ext: "ts".into(), size: 10, mtime: None, depth: 2, is_symbolic_link: false },
            FileEntry { path: "b.ts".into(), name: "b.ts".into(), ext: "ts".into(), size: 14, mtime: None, depth: 1, is_symbolic_link: false },
        ];
        let settings = Settings::default();
        let graph = resolve_dependencies(dir.path(), &files, &settings);

        let edge = graph.edges.iter().find(|e| e.source == "b.ts").unwrap();
        assert_eq!(edge.target.as_deref(), Some("x.ts"));
    }

    #[test]
    fn test_python_external_import_not_unresolved() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.py"), "from pkg.sub import x\n").unwrap();

        let files = vec![FileEntry { path: "a.py".into(), name: "a.py".into(), ext: "py".into(), size: 25, mtime: None, depth: 1, is_symbolic_link: false }];
        let settings = Settings::default();
        let graph = resolve_dependencies(dir.path(), &files, &settings);

        assert!(graph.unresolved.is_empty());
        assert!(graph.edges.iter().any(|e| e.kind == ResolutionKind::External && e.specifier == "pkg.sub"));
    }

    #[test]
    fn test_go_parenthesized_import_block() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("main.go"), "import (\n\t\"fmt\"\n\t\"os\"\n)\n").unwrap();

        let files = vec![FileEntry { path: "main.go".into(), name: "main.go".into(), ext: "go".into(), size: 30, mtime: None, depth: 1, is_symbolic_link: false }];
        let settings = Settings::default();
        let graph = resolve_dependencies(dir.path(), &files, &settings);

        let specifiers: Vec<&str> = graph.edges.iter().map(|e| e.specifier.as_str()).collect();
        assert!(specifiers.contains(&"fmt"));
        assert!(specifiers.contains(&"os"));
    }
}
