//! The source-snippet interface consumed by the UI layer (spec §6), kept
//! separate from the `Report` shape since it is a per-request lookup rather
//! than part of the one-shot analysis output.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSnippet {
    pub path: String,
    pub size: u64,
    pub content: String,
    pub truncated: bool,
}
