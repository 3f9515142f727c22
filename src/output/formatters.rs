//! Output formatting functionality

use ansi_term::Colour::{Blue, Cyan, Green, Red, Yellow};
use ansi_term::Style;

use crate::error::{AnalysisError, Result};
use crate::models::issue::IssueSeverity;
use crate::models::report::Report;

/// Renders the summary/issues/metrics of a `Report` as human-readable text.
pub fn format_report_text(report: &Report, use_colors: bool, verbose: bool, quiet: bool) -> String {
    let mut out = String::new();

    if quiet {
        out.push_str(&format!(
            "{} files, {} directories, {} issues\n",
            report.summary.totals.files,
            report.summary.totals.directories,
            report.issues.len()
        ));
        return out;
    }

    let title = |s: &str| if use_colors { Blue.bold().paint(s).to_string() } else { s.to_string() };
    out.push_str(&format!("{}\n", title(&format!("codegraph report — {}", report.root_path))));
    out.push_str(&format!("generated {}\n\n", report.generated_at));

    out.push_str(&format!("{}\n", title("Summary")));
    out.push_str(&format!(
        "  files: {}  directories: {}  truncated: {}  walk: {}ms\n",
        report.summary.totals.files,
        report.summary.totals.directories,
        report.summary.totals.truncated,
        report.summary.totals.walk_duration_ms
    ));
    for lang in &report.summary.languages {
        out.push_str(&format!(
            "  {:<12} {:>5} files  {:>8} lines  {:>10} bytes\n",
            lang.language, lang.files, lang.lines, lang.bytes
        ));
    }
    out.push('\n');

    out.push_str(&format!("{}\n", title("Issues")));
    if report.issues.is_empty() {
        out.push_str("  none\n");
    } else {
        for issue in &report.issues {
            let sev = match issue.severity {
                IssueSeverity::Error => {
                    if use_colors { Red.paint("error").to_string() } else { "error".to_string() }
                }
                IssueSeverity::Warning => {
                    if use_colors { Yellow.paint("warning").to_string() } else { "warning".to_string() }
                }
                IssueSeverity::Info => {
                    if use_colors { Cyan.paint("info").to_string() } else { "info".to_string() }
                }
            };
            out.push_str(&format!("  [{}] {}: {}\n", sev, issue.path, issue.message));
        }
    }
    out.push('\n');

    out.push_str(&format!("{}\n", title("Narrative")));
    out.push_str(&format!("  {}\n", report.narrative.overview));
    if verbose {
        for fact in &report.narrative.key_facts {
            out.push_str(&format!("  - {}\n", fact));
        }
        for action in &report.narrative.actions {
            out.push_str(&format!(
                "  {} {}\n",
                if use_colors { Green.paint("action:").to_string() } else { "action:".to_string() },
                action
            ));
        }
    }

    if verbose {
        out.push('\n');
        out.push_str(&format!("{}\n", title("Clones")));
        if report.narrative.clones.is_empty() {
            out.push_str("  none detected\n");
        } else {
            for line in &report.narrative.clones {
                out.push_str(&format!("  {}\n", Style::new().dimmed().paint(line)));
            }
        }
    }

    out
}

pub fn format_report_json(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(AnalysisError::from)
}

pub fn format_report_csv(report: &Report) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["path", "language", "size", "lines", "complexity", "todos", "skipped"])
        .map_err(AnalysisError::from)?;

    let mut paths: Vec<&String> = report.metrics.files.keys().collect();
    paths.sort();
    for path in paths {
        let metrics = &report.metrics.files[path];
        writer
            .write_record([
                path.as_str(),
                metrics.language.as_deref().unwrap_or(""),
                &metrics.size.to_string(),
                &metrics.line_count.map(|v| v.to_string()).unwrap_or_default(),
                &metrics.complexity_score.map(|v| v.to_string()).unwrap_or_default(),
                &metrics.todo_count.to_string(),
                &metrics.skipped.to_string(),
            ])
            .map_err(AnalysisError::from)?;
    }

    writer
        .write_record(["--- issues ---", "", "", "", "", "", ""])
        .map_err(AnalysisError::from)?;
    writer
        .write_record(["severity", "category", "path", "message", "", "", ""])
        .map_err(AnalysisError::from)?;
    for issue in &report.issues {
        writer
            .write_record([
                format!("{:?}", issue.severity).to_lowercase(),
                format!("{:?}", issue.category).to_lowercase(),
                issue.path.clone(),
                issue.message.clone(),
                String::new(),
                String::new(),
                String::new(),
            ])
            .map_err(AnalysisError::from)?;
    }

    let bytes = writer.into_inner().map_err(|e| AnalysisError::config(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| AnalysisError::config(e.to_string()))
}
