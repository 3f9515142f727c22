//! Settings validation

use std::path::Path;

use crate::error::{AnalysisError, Result};
use crate::models::config::Settings;

/// Validates a fully-merged `Settings` before the pipeline runs.
pub struct SettingsValidator;

impl SettingsValidator {
    pub fn validate(settings: &Settings) -> Result<()> {
        if !settings.scan_path.exists() {
            return Err(AnalysisError::invalid_path(settings.scan_path.clone()));
        }
        if !settings.scan_path.is_dir() {
            return Err(AnalysisError::invalid_path(settings.scan_path.clone()));
        }

        for pattern in &settings.exclude_patterns {
            glob::Pattern::new(pattern).map_err(|source| AnalysisError::GlobPattern {
                source,
                #[cfg(not(tarpaulin_include))]
                backtrace: std::backtrace::Backtrace::capture(),
            })?;
        }

        if settings.max_entries == 0 {
            return Err(AnalysisError::config("max_entries must be at least 1"));
        }

        if !(0.0..=1.0).contains(&settings.clone_similarity_threshold) {
            return Err(AnalysisError::config(
                "clone_similarity_threshold must be in [0, 1]",
            ));
        }

        if let Some(path) = &settings.output_file {
            Self::validate_output_path(path)?;
        }

        Ok(())
    }

    fn validate_output_path(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(AnalysisError::OutputDirectoryNotFound {
                    path: parent.to_path_buf(),
                    #[cfg(not(tarpaulin_include))]
                    backtrace: std::backtrace::Backtrace::capture(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_missing_path() {
        let mut settings = Settings::default();
        settings.scan_path = std::path::PathBuf::from("/definitely/does/not/exist/xyz");
        assert!(SettingsValidator::validate(&settings).is_err());
    }

    #[test]
    fn test_accepts_current_dir() {
        let mut settings = Settings::default();
        settings.scan_path = std::env::current_dir().unwrap();
        assert!(SettingsValidator::validate(&settings).is_ok());
    }
}
