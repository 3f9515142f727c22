//! Per-file quality metrics (spec §4.5a).

use std::fs;
use std::path::Path;

use regex::Regex;

use crate::language::language_for_ext;
use crate::models::config::Settings;
use crate::models::fs::FileEntry;
use crate::models::issue::{Issue, IssueCategory, IssueSeverity};
use crate::models::metrics::{complexity_score, FileMetrics, MetricsMap};

const LARGE_FILE_LINES: usize = 300;
const HIGH_COMPLEXITY_SCORE: f64 = 35.0;

pub struct MetricsResult {
    pub files: MetricsMap,
    pub issues: Vec<Issue>,
}

/// Computes per-file metrics over every walked file (spec §4.5a).
pub struct MetricsAnalyzer {
    line_splitter: Regex,
    decision_points: Regex,
    todo_marker: Regex,
}

impl MetricsAnalyzer {
    pub fn new() -> Self {
        Self {
            line_splitter: Regex::new(r"\r?\n").unwrap(),
            decision_points: Regex::new(r"\b(if|else if|for|while|case|catch|throw|function|class|=>|switch)\b")
                .unwrap(),
            todo_marker: Regex::new(r"\b(TODO|FIXME|HACK|XXX)\b").unwrap(),
        }
    }

    pub fn analyze(&self, root: &Path, files: &[FileEntry], settings: &Settings) -> MetricsResult {
        let mut result = MetricsResult { files: MetricsMap::new(), issues: Vec::new() };

        for file in files {
            let language = language_for_ext(&file.ext).map(str::to_string);

            if file.size > settings.metrics_max_file_size {
                result.files.insert(
                    file.path.clone(),
                    FileMetrics {
                        language,
                        size: file.size,
                        line_count: None,
                        complexity_score: None,
                        todo_count: 0,
                        skipped: true,
                    },
                );
                result.issues.push(
                    Issue::new(
                        IssueCategory::Metric,
                        IssueSeverity::Info,
                        file.path.clone(),
                        format!("File too large for metrics analysis ({} bytes)", file.size),
                    )
                    .with_type("file-too-large"),
                );
                continue;
            }

            let content = match fs::read_to_string(root.join(&file.path)) {
                Ok(c) => c,
                Err(err) => {
                    result.files.insert(
                        file.path.clone(),
                        FileMetrics {
                            language,
                            size: file.size,
                            line_count: None,
                            complexity_score: None,
                            todo_count: 0,
                            skipped: true,
                        },
                    );
                    result.issues.push(
                        Issue::new(
                            IssueCategory::Filesystem,
                            IssueSeverity::Warning,
                            file.path.clone(),
                            format!("Failed to read file: {}", err),
                        )
                        .with_type("file-read-error"),
                    );
                    continue;
                }
            };

            let line_count = self.line_splitter.split(&content).count();
            let decision_point_count = self.decision_points.find_iter(&content).count();
            let todo_count = self.todo_marker.find_iter(&content).count();
            let score = complexity_score(decision_point_count, line_count);

            if line_count > LARGE_FILE_LINES {
                result.issues.push(
                    Issue::new(
                        IssueCategory::Metric,
                        IssueSeverity::Warning,
                        file.path.clone(),
                        format!("File has {} lines (threshold {})", line_count, LARGE_FILE_LINES),
                    )
                    .with_type("large-file"),
                );
            }
            if score > HIGH_COMPLEXITY_SCORE {
                result.issues.push(
                    Issue::new(
                        IssueCategory::Metric,
                        IssueSeverity::Warning,
                        file.path.clone(),
                        format!("Complexity score {:.2} exceeds threshold {:.2}", score, HIGH_COMPLEXITY_SCORE),
                    )
                    .with_type("high-complexity"),
                );
            }
            if todo_count > 0 {
                result.issues.push(
                    Issue::new(
                        IssueCategory::Metric,
                        IssueSeverity::Info,
                        file.path.clone(),
                        format!("{} TODO-style comment(s) found", todo_count),
                    )
                    .with_type("todo-comments"),
                );
            }

            result.files.insert(
                file.path.clone(),
                FileMetrics {
                    language,
                    size: file.size,
                    line_count: Some(line_count),
                    complexity_score: Some(score),
                    todo_count,
                    skipped: false,
                },
            );
        }

        result
    }
}

impl Default for MetricsAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_flags_large_file() {
        let dir = tempdir().unwrap();
        let body = "const x = 1;\n".repeat(LARGE_FILE_LINES + 10);
        std::fs::write(dir.path().join("big.js"), &body).unwrap();

        let files = vec![FileEntry {
            path: "big.js".into(),
            name: "big.js".into(),
            ext: "js".into(),
            size: body.len() as u64,
            mtime: None,
            depth: 1,
            is_symbolic_link: false,
        }];
        let settings = Settings::default();
        let analyzer = MetricsAnalyzer::new();
        let result = analyzer.analyze(dir.path(), &files, &settings);

        assert!(result.issues.iter().any(|i| i.issue_type.as_deref() == Some("large-file")));
    }

    #[test]
    fn test_counts_todo_markers() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.js"), "// TODO: fix this\nfunction a() {}\n").unwrap();

        let files = vec![FileEntry {
            path: "a.js".into(),
            name: "a.js".into(),
            ext: "js".into(),
            size: 40,
            mtime: None,
            depth: 1,
            is_symbolic_link: false,
        }];
        let settings = Settings::default();
        let analyzer = MetricsAnalyzer::new();
        let result = analyzer.analyze(dir.path(), &files, &settings);

        let metrics = &result.files["a.js"];
        assert_eq!(metrics.todo_count, 1);
        assert!(result.issues.iter().any(|i| i.issue_type.as_deref() == Some("todo-comments")));
    }

    #[test]
    fn test_skips_oversize_file() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.js"), "x").unwrap();

        let files = vec![FileEntry {
            path: "a.js".into(),
            name: "a.js".into(),
            ext: "js".into(),
            size: 1,
            mtime: None,
            depth: 1,
            is_symbolic_link: false,
        }];
        let mut settings = Settings::default();
        settings.metrics_max_file_size = 0;
        let analyzer = MetricsAnalyzer::new();
        let result = analyzer.analyze(dir.path(), &files, &settings);

        assert!(result.files["a.js"].skipped);
        assert!(result.issues.iter().any(|i| i.issue_type.as_deref() == Some("file-too-large")));
    }
}
