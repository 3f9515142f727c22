//! Command-line argument parsing

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// codegraph - structural analysis pipeline for software projects
#[derive(Parser, Debug, Clone)]
#[command(name = "codegraph")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Walk a project tree and produce a structural analysis report")]
#[command(long_about = "codegraph ingests a project root directory and produces a single \
structured analysis report describing the project's files, languages, architectural \
structure (packages, files, symbols, import edges), per-file quality metrics, detected \
code smells, near-duplicate function clones, and a derived narrative summary.")]
#[command(after_help = "EXAMPLES:

Basic usage:
    # Analyze the current directory
    codegraph

    # Analyze a specific directory
    codegraph --path ./my-project

    # Cap traversal at 500 entries
    codegraph --max-entries 500

Output options:
    # Output in JSON format
    codegraph --output json

    # Save results to a file
    codegraph --output-file report.json

    # Disable colored output
    codegraph --no-colors

Clone detection:
    # Loosen the clone-similarity threshold
    codegraph --clone-threshold 0.4

Configuration:
    # Use a specific configuration file
    codegraph --config ./codegraph.toml

    # Create a default configuration file
    codegraph --init

Verbosity:
    codegraph --quiet
    codegraph --verbose
")]
pub struct Args {
    /// Root directory to analyze
    #[arg(short, long, value_name = "PATH", help = "Directory to analyze (defaults to current directory)")]
    pub path: Option<PathBuf>,

    /// Additional glob patterns to exclude, beyond the built-in ignore sets
    #[arg(short, long, value_name = "PATTERN", help = "Glob patterns to exclude (can be specified multiple times)")]
    pub exclude: Vec<String>,

    /// Traversal entry cap
    #[arg(long, value_name = "N", help = "Maximum files+directories to visit before truncating (default 2000)")]
    pub max_entries: Option<usize>,

    /// Clone-detector similarity threshold
    #[arg(long, value_name = "0.0-1.0", help = "Minimum similarity for a reported clone pair (default 0.55)")]
    pub clone_threshold: Option<f64>,

    /// Output format (text, json, csv)
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text, help = "Output format for the report")]
    pub output: OutputFormat,

    /// Output file path (stdout if not specified)
    #[arg(long, value_name = "FILE", help = "File to write the report to (stdout if omitted)")]
    pub output_file: Option<PathBuf>,

    /// Suppress non-essential output
    #[arg(short, long, help = "Suppress non-essential output")]
    pub quiet: bool,

    /// Show detailed progress and debug information
    #[arg(short, long, help = "Show detailed progress and debug information")]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", help = "Path to a configuration file (defaults to .codegraph.toml)")]
    pub config: Option<PathBuf>,

    /// Disable parallelism in passes that permit it
    #[arg(long, help = "Disable parallel processing of independent passes")]
    pub no_parallel: bool,

    /// Follow symbolic links during traversal
    #[arg(long, help = "Follow symbolic links during directory traversal")]
    pub follow_links: bool,

    /// Disable colored output
    #[arg(long, help = "Disable colored output")]
    pub no_colors: bool,

    /// Disable progress bars
    #[arg(long, help = "Disable progress bars")]
    pub no_progress: bool,

    /// Initialize a default configuration file
    #[arg(long, help = "Create a default configuration file (.codegraph.toml) in the current directory")]
    pub init: bool,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for programmatic consumption
    Json,
    /// CSV output for spreadsheet analysis
    Csv,
}

impl Args {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }
}
