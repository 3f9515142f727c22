use std::fs;
use std::path::Path;
use tempfile::tempdir;

use codegraph::core::{ParallelWalker, Walker};
use codegraph::models::config::Settings;

fn create_test_project_structure(base_dir: &Path) {
    fs::create_dir_all(base_dir.join("src")).unwrap();
    fs::write(base_dir.join("src/a.js"), "export function a() { return 1; }\n").unwrap();
    fs::write(base_dir.join("src/b.js"), "export function b() { return 2; }\n").unwrap();

    let nested = base_dir.join("src").join("nested");
    fs::create_dir_all(&nested).unwrap();
    fs::write(nested.join("c.js"), "export function c() { return 3; }\n").unwrap();

    let node_modules = base_dir.join("node_modules").join("some-dep");
    fs::create_dir_all(&node_modules).unwrap();
    fs::write(node_modules.join("index.js"), "module.exports = {};\n").unwrap();
}

#[test]
fn test_walker_finds_files_and_skips_ignored_dirs() {
    let temp_dir = tempdir().unwrap();
    create_test_project_structure(temp_dir.path());

    let mut settings = Settings::default();
    settings.scan_path = temp_dir.path().to_path_buf();

    let walker = Walker::new(&settings);
    let result = walker.walk(temp_dir.path());

    assert_eq!(result.files.len(), 3);
    assert!(result.files.iter().any(|f| f.path == "src/a.js"));
    assert!(result.files.iter().any(|f| f.path == "src/nested/c.js"));
    assert!(!result.files.iter().any(|f| f.path.contains("node_modules")));
}

#[test]
fn test_walker_and_parallel_walker_agree() {
    let temp_dir = tempdir().unwrap();
    create_test_project_structure(temp_dir.path());

    let mut settings = Settings::default();
    settings.scan_path = temp_dir.path().to_path_buf();

    let sequential = Walker::new(&settings).walk(temp_dir.path());
    let parallel = ParallelWalker::new(&settings).walk(temp_dir.path());

    let mut sequential_paths: Vec<&str> = sequential.files.iter().map(|f| f.path.as_str()).collect();
    let mut parallel_paths: Vec<&str> = parallel.files.iter().map(|f| f.path.as_str()).collect();
    sequential_paths.sort();
    parallel_paths.sort();

    assert_eq!(sequential_paths, parallel_paths);
}

#[test]
fn test_walker_truncates_at_max_entries() {
    let temp_dir = tempdir().unwrap();
    create_test_project_structure(temp_dir.path());

    let mut settings = Settings::default();
    settings.scan_path = temp_dir.path().to_path_buf();
    settings.max_entries = 2;

    let walker = Walker::new(&settings);
    let result = walker.walk(temp_dir.path());

    assert!(result.truncated);
}
