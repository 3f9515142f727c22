//! Parallel directory walking (spec §5).
//!
//! Traversal order and ignore-set application are identical to [`Walker`];
//! only the per-entry `stat` calls within a single directory listing are
//! parallelized with rayon, since traversal itself must stay sequential to
//! preserve the deterministic stack-popped DFS order.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;

use crate::models::config::Settings;
use crate::models::fs::{DirectoryEntry, FileEntry, WalkResult, Warning};

pub struct ParallelWalker<'a> {
    settings: &'a Settings,
}

struct WorkItem {
    abs_path: PathBuf,
    rel_path: String,
    name: String,
    depth: usize,
}

impl<'a> ParallelWalker<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    pub fn walk(&self, root: &Path) -> WalkResult {
        let start = Instant::now();
        let mut result = WalkResult::default();

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
            mtime: fs::metadata(root).ok().and_then(|m| mtime_millis(&m)),
        });

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

            let stats: Vec<std::io::Result<fs::Metadata>> =
                named.par_iter().map(|(_, path)| fs::symlink_metadata(path)).collect();

            let mut subdirs: Vec<WorkItem> = Vec::new();

            for ((name, abs_path), stat) in named.into_iter().zip(stats.into_iter()) {
                let rel_path = if item.rel_path == "." { name.clone() } else { format!("{}/{}", item.rel_path, name) };

                let metadata = match stat {
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
                        mtime: mtime_millis(&metadata),
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
                    let resolved_meta = if is_symlink { fs::metadata(&abs_path).unwrap_or(metadata) } else { metadata };
                    let ext = Path::new(&name)
                        .extension()
                        .map(|e| e.to_string_lossy().to_lowercase())
                        .unwrap_or_default();
                    result.files.push(FileEntry {
                        path: rel_path,
                        name,
                        ext,
                        size: resolved_meta.len(),
                        mtime: mtime_millis(&resolved_meta),
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

fn mtime_millis(metadata: &fs::Metadata) -> Option<i64> {
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
    fn test_parallel_walk_matches_sequential_file_count() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("a")).unwrap();
        for i in 0..5 {
            std::fs::write(dir.path().join(format!("a/f{}.ts", i)), "x").unwrap();
        }
        let settings = Settings::default();
        let walker = ParallelWalker::new(&settings);
        let result = walker.walk(dir.path());
        assert_eq!(result.files.len(), 5);
        assert!(!result.truncated);
    }
}
