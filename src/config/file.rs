//! Configuration file and environment-variable sources

use std::path::{Path, PathBuf};

use super::{parser, ConfigSource};
use crate::error::{AnalysisError, Result};
use crate::models::config::PartialSettings;

pub const DEFAULT_CONFIG_FILE: &str = ".codegraph.toml";

/// TOML configuration file source.
pub struct FileConfig {
    path: PathBuf,
    name: String,
    priority: u8,
}

impl FileConfig {
    pub fn new() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CONFIG_FILE),
            name: "default config file".to_string(),
            priority: 20,
        }
    }

    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            name: format!("config file ({})", path.as_ref().display()),
            priority: 20,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn create_default(&self) -> Result<()> {
        parser::create_default_config(&self.path)
    }
}

impl ConfigSource for FileConfig {
    fn load(&self) -> Result<PartialSettings> {
        if !self.is_available() {
            return Err(AnalysisError::ConfigNotFound {
                path: self.path.clone(),
                #[cfg(not(tarpaulin_include))]
                backtrace: std::backtrace::Backtrace::capture(),
            });
        }
        parser::parse_config_file(&self.path)
    }

    fn is_available(&self) -> bool {
        self.path.exists() && self.path.is_file()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// `CODEGRAPH_*` environment-variable configuration source.
pub struct EnvConfig {
    prefix: String,
    name: String,
    priority: u8,
}

impl EnvConfig {
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self { name: format!("{} environment variables", &prefix), prefix, priority: 10 }
    }
}

impl ConfigSource for EnvConfig {
    fn load(&self) -> Result<PartialSettings> {
        let mut settings = PartialSettings::default();

        if let Ok(path) = std::env::var(format!("{}_SCAN_PATH", self.prefix)) {
            settings.scan_path = Some(PathBuf::from(path));
        }
        if let Ok(exclude) = std::env::var(format!("{}_EXCLUDE", self.prefix)) {
            settings.exclude_patterns =
                Some(exclude.split(',').map(|s| s.trim().to_string()).collect());
        }
        if let Ok(max_entries) = std::env::var(format!("{}_MAX_ENTRIES", self.prefix)) {
            if let Ok(value) = max_entries.parse() {
                settings.max_entries = Some(value);
            }
        }
        if let Ok(threshold) = std::env::var(format!("{}_CLONE_THRESHOLD", self.prefix)) {
            if let Ok(value) = threshold.parse() {
                settings.clone_similarity_threshold = Some(value);
            }
        }
        if let Ok(format) = std::env::var(format!("{}_OUTPUT_FORMAT", self.prefix)) {
            if let Ok(output_format) = format.parse() {
                settings.output_format = Some(output_format);
            }
        }

        Ok(settings)
    }

    fn is_available(&self) -> bool {
        std::env::var(format!("{}_SCAN_PATH", self.prefix)).is_ok()
            || std::env::var(format!("{}_EXCLUDE", self.prefix)).is_ok()
            || std::env::var(format!("{}_MAX_ENTRIES", self.prefix)).is_ok()
            || std::env::var(format!("{}_CLONE_THRESHOLD", self.prefix)).is_ok()
            || std::env::var(format!("{}_OUTPUT_FORMAT", self.prefix)).is_ok()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}
