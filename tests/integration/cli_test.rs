use std::path::PathBuf;

use clap::Parser;
use codegraph::cli::args::{Args, OutputFormat};

#[test]
fn test_cli_args_defaults() {
    let args = Args::parse_from(["codegraph"]);
    assert_eq!(args.path, None);
    assert!(args.exclude.is_empty());
    assert_eq!(args.max_entries, None);
    assert!(matches!(args.output, OutputFormat::Text));
    assert_eq!(args.output_file, None);
    assert!(!args.quiet);
    assert!(!args.verbose);
    assert!(!args.init);
}

#[test]
fn test_cli_args_parses_flags() {
    let args = Args::parse_from([
        "codegraph",
        "--path",
        "/tmp/project",
        "--exclude",
        "**/fixtures/**",
        "--exclude",
        "**/*.snap",
        "--max-entries",
        "500",
        "--clone-threshold",
        "0.4",
        "--output",
        "json",
        "--output-file",
        "report.json",
        "--quiet",
        "--no-colors",
    ]);

    assert_eq!(args.path, Some(PathBuf::from("/tmp/project")));
    assert_eq!(args.exclude, vec!["**/fixtures/**".to_string(), "**/*.snap".to_string()]);
    assert_eq!(args.max_entries, Some(500));
    assert_eq!(args.clone_threshold, Some(0.4));
    assert!(matches!(args.output, OutputFormat::Json));
    assert_eq!(args.output_file, Some(PathBuf::from("report.json")));
    assert!(args.quiet);
    assert!(args.no_colors);
}

#[test]
fn test_cli_output_formats() {
    let args = Args::parse_from(["codegraph", "--output", "csv"]);
    assert!(matches!(args.output, OutputFormat::Csv));
}

#[test]
#[should_panic]
fn test_cli_rejects_invalid_output_format() {
    Args::parse_from(["codegraph", "--output", "yaml"]);
}

#[test]
fn test_cli_init_flag() {
    let args = Args::parse_from(["codegraph", "--init"]);
    assert!(args.init);
}
