use std::fs;
use std::path::Path;
use tempfile::tempdir;

use codegraph::models::config::Settings;
use codegraph::output::ProgressReporter;
use codegraph::{analyze, Result};

fn create_two_module_project(base_dir: &Path) {
    fs::create_dir_all(base_dir.join("src")).unwrap();
    fs::write(
        base_dir.join("src/math.js"),
        "export function add(a, b) { return a + b; }\nexport function sub(a, b) { return a - b; }\n",
    )
    .unwrap();
    fs::write(
        base_dir.join("src/index.js"),
        "import { add, sub } from './math.js';\n\nexport function combine(a, b, c) {\n  return add(add(a, b), sub(c, a));\n}\n",
    )
    .unwrap();
}

#[test]
fn test_analyze_reports_files_symbols_and_dependencies() -> Result<()> {
    let temp_dir = tempdir().unwrap();
    create_two_module_project(temp_dir.path());

    let mut settings = Settings::default();
    settings.scan_path = temp_dir.path().to_path_buf();
    settings.show_progress = false;
    settings.quiet = true;

    let reporter = ProgressReporter::new(true, false);
    let report = analyze(&settings, &reporter)?;

    assert_eq!(report.summary.totals.files, 2);
    assert!(report.structure_graph.totals.symbols >= 3);
    assert!(report
        .dependencies
        .edges
        .iter()
        .any(|e| e.source == "src/index.js" && e.target.as_deref() == Some("src/math.js")));
    assert!(!report.narrative.overview.is_empty());

    Ok(())
}

#[test]
fn test_analyze_detects_near_duplicate_functions() -> Result<()> {
    let temp_dir = tempdir().unwrap();
    fs::write(
        temp_dir.path().join("one.js"),
        "export function loadUser(id) {\n  if (!id) { throw new Error('missing id'); }\n  const record = db.find(id);\n  return record;\n}\n",
    )
    .unwrap();
    fs::write(
        temp_dir.path().join("two.js"),
        "export function loadAccount(id) {\n  if (!id) { throw new Error('missing id'); }\n  const record = db.find(id);\n  return record;\n}\n",
    )
    .unwrap();

    let mut settings = Settings::default();
    settings.scan_path = temp_dir.path().to_path_buf();
    settings.show_progress = false;
    settings.quiet = true;
    settings.clone_similarity_threshold = 0.5;

    let reporter = ProgressReporter::new(true, false);
    let report = analyze(&settings, &reporter)?;

    assert!(!report.clones.is_empty(), "expected at least one clone pair to be reported");

    Ok(())
}

#[test]
fn test_analyze_flags_long_function_smell() -> Result<()> {
    let temp_dir = tempdir().unwrap();
    let mut body = String::from("export function huge() {\n");
    for i in 0..120 {
        body.push_str(&format!("  const v{} = {};\n", i, i));
    }
    body.push_str("  return 0;\n}\n");
    fs::write(temp_dir.path().join("huge.js"), body).unwrap();

    let mut settings = Settings::default();
    settings.scan_path = temp_dir.path().to_path_buf();
    settings.show_progress = false;
    settings.quiet = true;

    let reporter = ProgressReporter::new(true, false);
    let report = analyze(&settings, &reporter)?;

    assert!(report.issues.iter().any(|i| i.issue_type.as_deref() == Some("long-function")));

    Ok(())
}
