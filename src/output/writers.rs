//! Output writing functionality

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::error::{AnalysisError, Result};

/// Destination for a formatted report.
pub trait OutputWriter {
    fn write(&self, content: &str) -> Result<()>;
}

#[derive(Debug)]
pub struct StdoutWriter;

impl OutputWriter for StdoutWriter {
    fn write(&self, content: &str) -> Result<()> {
        print!("{}", content);
        io::stdout().flush().map_err(|source| AnalysisError::StdoutWrite {
            source,
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        })
    }
}

#[derive(Debug)]
pub struct FileWriter {
    path: std::path::PathBuf,
}

impl FileWriter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
}

impl OutputWriter for FileWriter {
    fn write(&self, content: &str) -> Result<()> {
        let mut file = File::create(&self.path).map_err(|source| AnalysisError::OutputWrite {
            path: self.path.clone(),
            source,
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        })?;
        file.write_all(content.as_bytes()).map_err(|source| AnalysisError::OutputWrite {
            path: self.path.clone(),
            source,
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        })
    }
}

pub fn create_writer(output_file: Option<impl AsRef<Path>>) -> Box<dyn OutputWriter> {
    match output_file {
        Some(path) => Box::new(FileWriter::new(path)),
        None => Box::new(StdoutWriter),
    }
}
