//! Configuration-related data structures

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration settings for the analysis pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Root directory to analyze.
    pub scan_path: PathBuf,

    /// Directory/file name patterns to exclude in addition to the built-in
    /// ignore sets (glob patterns matched against full paths).
    pub exclude_patterns: Vec<String>,

    /// Traversal cap: `files.len() + directories.len()` (spec §4.1).
    pub max_entries: usize,

    /// Metrics pass file-size ceiling, bytes (spec §4.5a).
    pub metrics_max_file_size: u64,

    /// Dependency-graph pass file-size ceiling, bytes (spec §4.3a).
    pub dependency_max_file_size: u64,

    /// AST/symbol pass file-size ceiling, bytes (spec §4.2).
    pub ast_max_file_bytes: u64,

    /// Per-symbol snippet text cap, bytes (spec §4.2).
    pub clone_snippet_cap_bytes: usize,

    /// Minimum similarity for a clone pair to be reported (spec §4.4).
    pub clone_similarity_threshold: f64,

    /// k-gram shingle size (spec §4.4, `k`).
    pub clone_shingle_size: usize,

    /// Winnowing window size (spec §4.4, `w`).
    pub clone_window_size: usize,

    /// Hard cap on unordered symbol pairs considered (spec §4.4).
    pub clone_max_pairs: usize,

    /// Hard cap on index-pair extensions per symbol pair (spec §4.4).
    pub clone_max_matches_per_pair: usize,

    /// Hard cap on tokens retained per symbol (spec §4.4).
    pub clone_max_tokens: usize,

    /// Ignored directory names (spec §4.1).
    pub ignored_dirs: Vec<String>,

    /// Ignored file names (spec §4.1).
    pub ignored_files: Vec<String>,

    /// Output format (text, json, csv).
    pub output_format: OutputFormat,

    /// Output file path (stdout if not specified).
    pub output_file: Option<PathBuf>,

    /// Whether to use parallel processing where the spec permits it.
    pub parallel: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Show detailed progress and debug information.
    pub verbose: bool,

    /// Follow symbolic links during directory traversal.
    pub follow_links: bool,

    /// Use colors in text output.
    pub use_colors: bool,

    /// Show progress bars.
    pub show_progress: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scan_path: PathBuf::from("."),
            exclude_patterns: Vec::new(),
            max_entries: 2000,
            metrics_max_file_size: 512 * 1024,
            dependency_max_file_size: 256 * 1024,
            ast_max_file_bytes: 256 * 1024,
            clone_snippet_cap_bytes: 128 * 1024,
            clone_similarity_threshold: 0.55,
            clone_shingle_size: 3,
            clone_window_size: 4,
            clone_max_pairs: 250_000,
            clone_max_matches_per_pair: 200,
            clone_max_tokens: 5000,
            ignored_dirs: default_ignored_dirs(),
            ignored_files: default_ignored_files(),
            output_format: OutputFormat::Text,
            output_file: None,
            parallel: true,
            quiet: false,
            verbose: false,
            follow_links: false,
            use_colors: true,
            show_progress: true,
        }
    }
}

/// The spec §4.1 default ignored-directory set.
pub fn default_ignored_dirs() -> Vec<String> {
    [
        ".git", ".hg", ".svn", "node_modules", "vendor", "dist", "build", ".cache", ".next",
        ".nuxt", ".idea", ".vscode", "coverage", "__pycache__", "ios/Pods",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// The spec §4.1 default ignored-file set.
pub fn default_ignored_files() -> Vec<String> {
    [".DS_Store", "Thumbs.db"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Supported output formats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output for programmatic consumption.
    Json,
    /// CSV output for spreadsheet analysis.
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// All-`Option` mirror of [`Settings`] used while layering configuration
/// sources (spec §6 "Configuration").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartialSettings {
    pub scan_path: Option<PathBuf>,
    pub exclude_patterns: Option<Vec<String>>,
    pub max_entries: Option<usize>,
    pub metrics_max_file_size: Option<u64>,
    pub dependency_max_file_size: Option<u64>,
    pub ast_max_file_bytes: Option<u64>,
    pub clone_snippet_cap_bytes: Option<usize>,
    pub clone_similarity_threshold: Option<f64>,
    pub clone_shingle_size: Option<usize>,
    pub clone_window_size: Option<usize>,
    pub clone_max_pairs: Option<usize>,
    pub clone_max_matches_per_pair: Option<usize>,
    pub clone_max_tokens: Option<usize>,
    pub ignored_dirs: Option<Vec<String>>,
    pub ignored_files: Option<Vec<String>>,
    pub output_format: Option<OutputFormat>,
    pub output_file: Option<PathBuf>,
    pub parallel: Option<bool>,
    pub quiet: Option<bool>,
    pub verbose: Option<bool>,
    pub follow_links: Option<bool>,
    pub use_colors: Option<bool>,
    pub show_progress: Option<bool>,
}

macro_rules! merge_field {
    ($self:ident, $other:ident, $field:ident) => {
        if $other.$field.is_some() {
            $self.$field = $other.$field;
        }
    };
}

macro_rules! apply_field {
    ($settings:ident, $self:ident, $field:ident) => {
        if let Some(value) = $self.$field.clone() {
            $settings.$field = value;
        }
    };
}

impl PartialSettings {
    /// Merge another `PartialSettings` into this one; fields set in `other`
    /// take precedence.
    pub fn merge_from(&mut self, other: PartialSettings) {
        merge_field!(self, other, scan_path);
        merge_field!(self, other, exclude_patterns);
        merge_field!(self, other, max_entries);
        merge_field!(self, other, metrics_max_file_size);
        merge_field!(self, other, dependency_max_file_size);
        merge_field!(self, other, ast_max_file_bytes);
        merge_field!(self, other, clone_snippet_cap_bytes);
        merge_field!(self, other, clone_similarity_threshold);
        merge_field!(self, other, clone_shingle_size);
        merge_field!(self, other, clone_window_size);
        merge_field!(self, other, clone_max_pairs);
        merge_field!(self, other, clone_max_matches_per_pair);
        merge_field!(self, other, clone_max_tokens);
        merge_field!(self, other, ignored_dirs);
        merge_field!(self, other, ignored_files);
        merge_field!(self, other, output_format);
        merge_field!(self, other, output_file);
        merge_field!(self, other, parallel);
        merge_field!(self, other, quiet);
        merge_field!(self, other, verbose);
        merge_field!(self, other, follow_links);
        merge_field!(self, other, use_colors);
        merge_field!(self, other, show_progress);
    }

    /// Convert to full `Settings`, filling any unset field with its default.
    pub fn to_settings(&self) -> Settings {
        let mut settings = Settings::default();
        apply_field!(settings, self, scan_path);
        apply_field!(settings, self, exclude_patterns);
        apply_field!(settings, self, max_entries);
        apply_field!(settings, self, metrics_max_file_size);
        apply_field!(settings, self, dependency_max_file_size);
        apply_field!(settings, self, ast_max_file_bytes);
        apply_field!(settings, self, clone_snippet_cap_bytes);
        apply_field!(settings, self, clone_similarity_threshold);
        apply_field!(settings, self, clone_shingle_size);
        apply_field!(settings, self, clone_window_size);
        apply_field!(settings, self, clone_max_pairs);
        apply_field!(settings, self, clone_max_matches_per_pair);
        apply_field!(settings, self, clone_max_tokens);
        apply_field!(settings, self, ignored_dirs);
        apply_field!(settings, self, ignored_files);
        apply_field!(settings, self, output_format);
        apply_field!(settings, self, output_file);
        apply_field!(settings, self, parallel);
        apply_field!(settings, self, quiet);
        apply_field!(settings, self, verbose);
        apply_field!(settings, self, follow_links);
        apply_field!(settings, self, use_colors);
        apply_field!(settings, self, show_progress);
        settings
    }
}
