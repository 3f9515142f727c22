use std::fs;
use tempfile::tempdir;

use codegraph::core::Walker;
use codegraph::models::config::Settings;
use codegraph::parsers::resolve_dependencies;

#[test]
fn test_resolves_relative_import_to_exact_file() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("math.js"), "export function add(a, b) { return a + b; }\n").unwrap();
    fs::write(dir.path().join("index.js"), "import { add } from './math.js';\n").unwrap();

    let settings = Settings::default();
    let walk = Walker::new(&settings).walk(dir.path());
    let graph = resolve_dependencies(dir.path(), &walk.files, &settings);

    assert!(graph
        .edges
        .iter()
        .any(|e| e.source == "index.js" && e.target.as_deref() == Some("math.js")));
    assert!(graph.unresolved.is_empty());
}

#[test]
fn test_records_unresolved_import_for_missing_file() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("index.js"), "import { missing } from './does-not-exist.js';\n").unwrap();

    let settings = Settings::default();
    let walk = Walker::new(&settings).walk(dir.path());
    let graph = resolve_dependencies(dir.path(), &walk.files, &settings);

    assert!(graph.unresolved.iter().any(|u| u.source == "index.js"));
}

#[test]
fn test_external_package_import_is_not_unresolved() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("index.js"), "import React from 'react';\n").unwrap();

    let settings = Settings::default();
    let walk = Walker::new(&settings).walk(dir.path());
    let graph = resolve_dependencies(dir.path(), &walk.files, &settings);

    assert!(graph.unresolved.is_empty());
    assert!(graph.edges.iter().any(|e| e.specifier == "react"));
    assert_eq!(graph.external_package_counts().iter().find(|(s, _)| s == "react").map(|(_, c)| *c), Some(1));
}
