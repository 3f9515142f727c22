//! Output formatting and writing functionality

mod formatters;
mod progress;
mod writers;

pub use progress::{ProgressReporter, PIPELINE_PHASES};
pub use writers::{create_writer, FileWriter, OutputWriter, StdoutWriter};

use crate::error::Result;
use crate::models::config::OutputFormat;
use crate::models::report::Report;

/// Renders a `Report` into a format-specific string.
pub trait Formatter {
    fn format(&self, report: &Report) -> Result<String>;
}

pub struct TextFormatter {
    pub use_colors: bool,
    pub verbose: bool,
    pub quiet: bool,
}

impl TextFormatter {
    pub fn new(use_colors: bool, verbose: bool, quiet: bool) -> Self {
        Self { use_colors, verbose, quiet }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, report: &Report) -> Result<String> {
        Ok(formatters::format_report_text(report, self.use_colors, self.verbose, self.quiet))
    }
}

pub struct JsonFormatter {
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, report: &Report) -> Result<String> {
        formatters::format_report_json(report)
    }
}

pub struct CsvFormatter;

impl CsvFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for CsvFormatter {
    fn format(&self, report: &Report) -> Result<String> {
        formatters::format_report_csv(report)
    }
}

pub fn create_formatter(
    format: &OutputFormat,
    use_colors: bool,
    verbose: bool,
    quiet: bool,
) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(use_colors, verbose, quiet)),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
        OutputFormat::Csv => Box::new(CsvFormatter::new()),
    }
}
