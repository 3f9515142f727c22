//! Per-file quality metrics (spec §3 `FileMetrics`, §4.5a).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetrics {
    pub language: Option<String>,
    pub size: u64,
    pub line_count: Option<usize>,
    pub complexity_score: Option<f64>,
    pub todo_count: usize,
    pub skipped: bool,
}

/// `path -> FileMetrics`, as emitted in `Report.metrics.files`.
pub type MetricsMap = HashMap<String, FileMetrics>;

/// `round2((decisionPoints / lineCount) * 100)` (spec §3).
pub fn complexity_score(decision_points: usize, line_count: usize) -> f64 {
    if line_count == 0 {
        return 0.0;
    }
    round2((decision_points as f64 / line_count as f64) * 100.0)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
