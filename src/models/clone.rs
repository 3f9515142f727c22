//! Near-duplicate function "clone" entries (spec §3 `CloneEntry`, §4.4).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloneEntry {
    pub target_id: String,
    pub file_path: String,
    pub start_line: usize,
    pub end_line: usize,
    pub similarity: f64,
}

/// `sourceSymbolId -> [CloneEntry]`, in pair-encounter order (spec §4.4
/// "Ordering & determinism").
pub type CloneMap = HashMap<String, Vec<CloneEntry>>;
