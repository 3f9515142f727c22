//! Bounded directory traversal (spec §4.1).
//!
//! Depth-first, explicit-stack traversal from `root`. Subdirectories are
//! pushed in reverse sorted order so popping the stack yields a stable,
//! alphabetical depth-first walk order — required for the spec's
//! "files appear in walk order (stack-popped DFS)" ordering guarantee.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::models::config::Settings;
use crate::models::fs::{DirectoryEntry, FileEntry, WalkResult, Warning};

pub struct Walker<'a> {
    settings: &'a Settings,
}

struct WorkItem {
    abs_path: PathBuf,
    rel_path: String,
    name: String,
    depth: usize,
}

impl<'a> Walker<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Runs the bounded walk, returning an owned `WalkResult`.
    pub fn walk(&self, root: &Path) -> WalkResult {
        let start = Instant::now();
        let mut result = WalkResult::default();

        // Plain entries (e.g. "node_modules") match on directory name alone;
        // compound entries (e.g. "ios/Pods") additionally require the parent
        // directory's own name to match the entry's leading segment.
        let mut ignored_dirs: HashSet<&str> = HashSet::new();
        let mut ignored_compound_dirs: HashSet<(&str, &str)> = HashSet::new();
        for entry in &self.settings.ignored_dirs {
            match entry.rsplit_once('/') {
                Some((parent, name)) => {
                    ignored_compound_dirs.insert((parent, name));
                }
                None => {
                    ignored_dirs.insert(entry.as_str());
                }
            }
        }
        let ignored_files: HashSet<&str> =
            self.settings.ignored_files.iter().map(String::as_str).collect();

        result.directories.push(DirectoryEntry {
            path: ".".to_string(),
            name: ".".to_string(),
            depth: 0,
            mtime: mtime_millis(root),
        });

        if self.at_capacity(&result) {
            result.truncated = true;
            result.warnings.push(Warning::limit_reached("."));
            result.walk_duration_ms = start.elapsed().as_millis() as u64;
            return result;
        }

        let mut stack: Vec<WorkItem> =
            vec![WorkItem { abs_path: root.to_path_buf(), rel_path: ".".to_string(), name: ".".to_string(), depth: 0 }];

        'walk: while let Some(item) = stack.pop() {
            let entries = match fs::read_dir(&item.abs_path) {
                Ok(entries) => entries,
                Err(err) => {
                    result.warnings.push(Warning::read_error(item.rel_path.clone(), err));
                    continue;
                }
            };

            let mut named: Vec<(String, PathBuf)> = Vec::new();
            for entry in entries {
                match entry {
                    Ok(entry) => named.push((entry.file_name().to_string_lossy().into_owned(), entry.path())),
                    Err(err) => {
                        result.warnings.push(Warning::read_error(item.rel_path.clone(), err));
                    }
                }
            }
            named.sort_by(|a, b| a.0.cmp(&b.0));

            let mut subdirs: Vec<WorkItem> = Vec::new();

            for (name, abs_path) in named {
                let rel_path = if item.rel_path == "." { name.clone() } else { format!("{}/{}", item.rel_path, name) };

                let metadata = match fs::symlink_metadata(&abs_path) {
                    Ok(m) => m,
                    Err(err) => {
                        result.warnings.push(Warning::stat_error(rel_path, err));
                        continue;
                    }
                };

                if metadata.is_dir() {
                    if ignored_dirs.contains(name.as_str())
                        || ignored_compound_dirs.contains(&(item.name.as_str(), name.as_str()))
                    {
                        continue;
                    }
                    if self.at_capacity(&result) {
                        result.truncated = true;
                        result.warnings.push(Warning::limit_reached(rel_path));
                        break 'walk;
                    }
                    result.directories.push(DirectoryEntry {
                        path: rel_path.clone(),
                        name: name.clone(),
                        depth: item.depth + 1,
                        mtime: mtime_millis(&abs_path),
                    });
                    subdirs.push(WorkItem { abs_path, rel_path, name: name.clone(), depth: item.depth + 1 });
                } else {
                    if ignored_files.contains(name.as_str()) {
                        continue;
                    }
                    if self.at_capacity(&result) {
                        result.truncated = true;
                        result.warnings.push(Warning::limit_reached(rel_path));
                        break 'walk;
                    }
                    let is_symlink = metadata.is_symlink();
                    let resolved_meta = if is_symlink {
                        fs::metadata(&abs_path).unwrap_or(metadata)
                    } else {
                        metadata
                    };
                    let ext = Path::new(&name)
                        .extension()
                        .map(|e| e.to_string_lossy().to_lowercase())
                        .unwrap_or_default();
                    result.files.push(FileEntry {
                        path: rel_path,
                        name,
                        ext,
                        size: resolved_meta.len(),
                        mtime: mtime_millis_from(&resolved_meta),
                        depth: item.depth + 1,
                        is_symbolic_link: is_symlink,
                    });
                }
            }

            for subdir in subdirs.into_iter().rev() {
                stack.push(subdir);
            }
        }

        result.walk_duration_ms = start.elapsed().as_millis() as u64;
        result
    }

    fn at_capacity(&self, result: &WalkResult) -> bool {
        result.files.len() + result.directories.len() >= self.settings.max_entries
    }
}

fn mtime_millis(path: &Path) -> Option<i64> {
    fs::metadata(path).ok().and_then(|m| mtime_millis_from(&m))
}

fn mtime_millis_from(metadata: &fs::Metadata) -> Option<i64> {
    metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
        .map(|d| d.as_millis() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_walk_basic_tree() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("src/a.js"), "const a = 1;").unwrap();
        std::fs::write(dir.path().join("README.md"), "# hi").unwrap();

        let settings = Settings::default();
        let walker = Walker::new(&settings);
        let result = walker.walk(dir.path());

        assert!(!result.truncated);
        assert_eq!(result.files.len(), 2);
        assert_eq!(result.directories.len(), 2); // root + src
        assert!(result.files.iter().any(|f| f.path == "src/a.js"));
    }

    #[test]
    fn test_walk_skips_ignored_dirs() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("node_modules")).unwrap();
        std::fs::write(dir.path().join("node_modules/pkg.js"), "x").unwrap();
        std::fs::write(dir.path().join("index.js"), "x").unwrap();

        let settings = Settings::default();
        let walker = Walker::new(&settings);
        let result = walker.walk(dir.path());

        assert_eq!(result.files.len(), 1);
        assert_eq!(result.files[0].path, "index.js");
    }

    #[test]
    fn test_walk_truncates_at_max_entries() {
        let dir = tempdir().unwrap();
        for i in 0..10 {
            std::fs::write(dir.path().join(format!("f{}.js", i)), "x").unwrap();
        }

        let mut settings = Settings::default();
        settings.max_entries = 3;
        let walker = Walker::new(&settings);
        let result = walker.walk(dir.path());

        assert!(result.truncated);
        assert_eq!(result.files.len() + result.directories.len(), 3);
        assert!(result.warnings.iter().any(|w| w.kind == crate::models::fs::WarningKind::LimitReached));
    }

    #[test]
    fn test_walk_skips_compound_ignored_dir() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("ios/Pods")).unwrap();
        std::fs::write(dir.path().join("ios/Pods/lib.m"), "x").unwrap();
        std::fs::write(dir.path().join("ios/App.swift"), "x").unwrap();
        // A same-named "Pods" dir outside "ios/" is NOT covered by "ios/Pods".
        std::fs::create_dir_all(dir.path().join("android/Pods")).unwrap();
        std::fs::write(dir.path().join("android/Pods/keep.txt"), "x").unwrap();

        let settings = Settings::default();
        let walker = Walker::new(&settings);
        let result = walker.walk(dir.path());

        assert!(result.files.iter().any(|f| f.path == "ios/App.swift"));
        assert!(!result.files.iter().any(|f| f.path.starts_with("ios/Pods")));
        assert!(result.files.iter().any(|f| f.path == "android/Pods/keep.txt"));
    }

    #[test]
    fn test_walk_empty_directory() {
        let dir = tempdir().unwrap();
        let settings = Settings::default();
        let walker = Walker::new(&settings);
        let result = walker.walk(dir.path());

        assert_eq!(result.files.len(), 0);
        assert_eq!(result.directories.len(), 1);
        assert!(!result.truncated);
    }
}
