use std::fs;
use tempfile::tempdir;

use codegraph::models::config::Settings;
use codegraph::output::{create_formatter, Formatter};
use codegraph::{analyze, Result};

fn sample_report(quiet: bool) -> Result<codegraph::Report> {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join("a.js"), "export function add(a, b) { return a + b; }\n").unwrap();
    fs::write(
        temp_dir.path().join("b.js"),
        "import { add } from './a.js';\nexport function triple(a, b, c) { return add(add(a, b), c); }\n",
    )
    .unwrap();

    let mut settings = Settings::default();
    settings.scan_path = temp_dir.path().to_path_buf();
    settings.show_progress = false;
    settings.quiet = quiet;

    let reporter = codegraph::output::ProgressReporter::new(true, false);
    analyze(&settings, &reporter)
}

#[test]
fn test_text_formatter_mentions_totals_and_overview() -> Result<()> {
    let report = sample_report(false)?;
    let formatter = create_formatter(&codegraph::models::config::OutputFormat::Text, false, false, false);
    let output = formatter.format(&report)?;

    assert!(output.contains(&report.summary.totals.files.to_string()));
    assert!(output.contains("javascript") || output.contains("js"));

    Ok(())
}

#[test]
fn test_json_formatter_round_trips_totals() -> Result<()> {
    let report = sample_report(true)?;
    let formatter = create_formatter(&codegraph::models::config::OutputFormat::Json, false, false, true);
    let output = formatter.format(&report)?;

    let parsed: serde_json::Value = serde_json::from_str(&output).expect("formatter output must be valid JSON");
    assert_eq!(parsed["summary"]["totals"]["files"].as_u64(), Some(report.summary.totals.files as u64));

    Ok(())
}

#[test]
fn test_csv_formatter_emits_a_header_row() -> Result<()> {
    let report = sample_report(true)?;
    let formatter = create_formatter(&codegraph::models::config::OutputFormat::Csv, false, false, true);
    let output = formatter.format(&report)?;

    assert!(output.lines().count() >= 1);

    Ok(())
}
