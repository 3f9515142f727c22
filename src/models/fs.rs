//! Filesystem-level data produced by the Walker (spec §3, §4.1).

use serde::{Deserialize, Serialize};

/// A regular file or symlink discovered during traversal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    /// Forward-slash-normalized path relative to the analyzed root.
    pub path: String,
    pub name: String,
    /// Lowercased extension, without the leading dot (empty if none).
    pub ext: String,
    pub size: u64,
    /// Milliseconds since the Unix epoch, if the platform reported one.
    pub mtime: Option<i64>,
    pub depth: usize,
    pub is_symbolic_link: bool,
}

/// A directory discovered during traversal. The root directory has
/// `path == "."`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryEntry {
    pub path: String,
    pub name: String,
    pub depth: usize,
    pub mtime: Option<i64>,
}

/// A non-fatal problem encountered while walking or reading a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warning {
    #[serde(rename = "type")]
    pub kind: WarningKind,
    pub path: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    StatError,
    ReadError,
    LimitReached,
}

impl Warning {
    pub fn stat_error(path: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self {
            kind: WarningKind::StatError,
            path: path.into(),
            error: Some(error.to_string()),
        }
    }

    pub fn read_error(path: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self {
            kind: WarningKind::ReadError,
            path: path.into(),
            error: Some(error.to_string()),
        }
    }

    pub fn limit_reached(path: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::LimitReached,
            path: path.into(),
            error: None,
        }
    }
}

/// Output of the bounded directory walk (spec §4.1).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WalkResult {
    pub files: Vec<FileEntry>,
    pub directories: Vec<DirectoryEntry>,
    pub warnings: Vec<Warning>,
    pub truncated: bool,
    pub walk_duration_ms: u64,
}

/// A hierarchical node in the UI-facing file tree (pure fold over
/// `WalkResult`, spec §2 step 2).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum TreeNode {
    Directory {
        name: String,
        path: String,
        children: Vec<TreeNode>,
    },
    File {
        name: String,
        path: String,
        ext: String,
        size: u64,
    },
}

impl TreeNode {
    pub fn name(&self) -> &str {
        match self {
            TreeNode::Directory { name, .. } => name,
            TreeNode::File { name, .. } => name,
        }
    }

    fn is_dir(&self) -> bool {
        matches!(self, TreeNode::Directory { .. })
    }
}

/// Folds a flat walk result into a hierarchical directory tree with sorted
/// children: directories first, then files, both alphabetically by name.
pub fn build_tree(walk: &WalkResult) -> TreeNode {
    use std::collections::BTreeMap;

    #[derive(Default)]
    struct Builder {
        dirs: BTreeMap<String, Builder>,
        files: Vec<TreeNode>,
    }

    impl Builder {
        fn insert_dir(&mut self, segments: &[&str]) {
            if segments.is_empty() {
                return;
            }
            let entry = self.dirs.entry(segments[0].to_string()).or_default();
            entry.insert_dir(&segments[1..]);
        }

        fn insert_file(&mut self, segments: &[&str], file: &FileEntry) {
            if segments.len() == 1 {
                self.files.push(TreeNode::File {
                    name: file.name.clone(),
                    path: file.path.clone(),
                    ext: file.ext.clone(),
                    size: file.size,
                });
                return;
            }
            let entry = self.dirs.entry(segments[0].to_string()).or_default();
            entry.insert_file(&segments[1..], file);
        }

        fn build(self, name: &str, path: &str) -> TreeNode {
            let mut children: Vec<TreeNode> = self
                .dirs
                .into_iter()
                .map(|(seg, builder)| {
                    let child_path = if path == "." {
                        seg.clone()
                    } else {
                        format!("{}/{}", path, seg)
                    };
                    builder.build(&seg, &child_path)
                })
                .collect();
            children.extend(self.files);
            children.sort_by(|a, b| match (a.is_dir(), b.is_dir()) {
                (true, false) => std::cmp::Ordering::Less,
                (false, true) => std::cmp::Ordering::Greater,
                _ => a.name().cmp(b.name()),
            });
            TreeNode::Directory {
                name: name.to_string(),
                path: path.to_string(),
                children,
            }
        }
    }

    let mut root = Builder::default();
    for dir in &walk.directories {
        if dir.path == "." {
            continue;
        }
        let segments: Vec<&str> = dir.path.split('/').collect();
        root.insert_dir(&segments);
    }
    for file in &walk.files {
        let segments: Vec<&str> = file.path.split('/').collect();
        root.insert_file(&segments, file);
    }
    root.build(".", ".")
}
