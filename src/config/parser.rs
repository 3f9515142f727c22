//! Configuration file parsing utilities

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AnalysisError, Result};
use crate::models::config::PartialSettings;

pub fn parse_config_file<P: AsRef<Path>>(path: P) -> Result<PartialSettings> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(AnalysisError::ConfigNotFound {
            path: path.to_path_buf(),
            #[cfg(not(tarpaulin_include))]
            backtrace: std::backtrace::Backtrace::capture(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| AnalysisError::ConfigRead {
        path: path.to_path_buf(),
        source: e,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace::capture(),
    })?;

    parse_config_content(&content, path)
}

pub fn parse_config_content<P: AsRef<Path>>(content: &str, path: P) -> Result<PartialSettings> {
    let path = path.as_ref();

    let settings: PartialSettings = toml::from_str(content).map_err(|e| AnalysisError::ConfigParse {
        path: path.to_path_buf(),
        source: e,
        #[cfg(not(tarpaulin_include))]
        backtrace: std::backtrace::Backtrace::capture(),
    })?;

    validate_partial_settings(&settings, path)?;

    Ok(settings)
}

/// Validate partial settings for obvious errors before they're merged in.
pub fn validate_partial_settings<P: AsRef<Path>>(settings: &PartialSettings, path: P) -> Result<()> {
    let path = path.as_ref();

    if let Some(scan_path) = &settings.scan_path {
        if scan_path.as_os_str().is_empty() {
            return Err(AnalysisError::config(format!(
                "Invalid empty scan_path in config file: {}",
                path.display()
            )));
        }
    }

    if let Some(patterns) = &settings.exclude_patterns {
        for pattern in patterns {
            if pattern.is_empty() {
                return Err(AnalysisError::config(format!(
                    "Empty exclude pattern in config file: {}",
                    path.display()
                )));
            }
            glob::Pattern::new(pattern).map_err(|e| {
                AnalysisError::config(format!(
                    "Invalid exclude pattern '{}' in config file: {}: {}",
                    pattern,
                    path.display(),
                    e
                ))
            })?;
        }
    }

    if let Some(max_entries) = settings.max_entries {
        if max_entries == 0 {
            return Err(AnalysisError::config(format!(
                "Invalid max_entries 0 in config file: {}. Must be at least 1.",
                path.display()
            )));
        }
    }

    if let Some(threshold) = settings.clone_similarity_threshold {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(AnalysisError::config(format!(
                "Invalid clone_similarity_threshold {} in config file: {}. Must be in [0, 1].",
                threshold,
                path.display()
            )));
        }
    }

    if let Some(output_file) = &settings.output_file {
        if output_file.as_os_str().is_empty() {
            return Err(AnalysisError::config(format!(
                "Invalid empty output_file in config file: {}",
                path.display()
            )));
        }
    }

    Ok(())
}

/// Search default locations for a configuration file, in priority order:
/// current directory, user home, XDG config directory.
pub fn find_default_config() -> Result<Option<PartialSettings>> {
    let current_dir_config = PathBuf::from(".codegraph.toml");
    if current_dir_config.exists() {
        return Ok(Some(parse_config_file(current_dir_config)?));
    }

    if let Some(home_dir) = dirs::home_dir() {
        let home_config = home_dir.join(".codegraph.toml");
        if home_config.exists() {
            return Ok(Some(parse_config_file(home_config)?));
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let xdg_config = config_dir.join("codegraph").join("config.toml");
        if xdg_config.exists() {
            return Ok(Some(parse_config_file(xdg_config)?));
        }
    }

    Ok(None)
}

/// Write the embedded default configuration template to `path`.
pub fn create_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(AnalysisError::io_error)?;
        }
    }

    let default_config = include_str!("default_config.toml");
    fs::write(path, default_config).map_err(AnalysisError::io_error)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_config_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("test_config.toml");

        let config_content = r#"
            scan_path = "/test/path"
            exclude_patterns = ["extra_ignore"]
            max_entries = 500
            output_format = "json"
            parallel = false
        "#;

        fs::write(&config_path, config_content).unwrap();

        let settings = parse_config_file(&config_path).unwrap();

        assert_eq!(settings.scan_path, Some(PathBuf::from("/test/path")));
        assert_eq!(settings.exclude_patterns, Some(vec!["extra_ignore".to_string()]));
        assert_eq!(settings.max_entries, Some(500));
    }

    #[test]
    fn test_validate_partial_settings_rejects_zero_max_entries() {
        let invalid = PartialSettings { max_entries: Some(0), ..Default::default() };
        assert!(validate_partial_settings(&invalid, "test.toml").is_err());
    }

    #[test]
    fn test_validate_partial_settings_rejects_bad_threshold() {
        let invalid =
            PartialSettings { clone_similarity_threshold: Some(1.5), ..Default::default() };
        assert!(validate_partial_settings(&invalid, "test.toml").is_err());
    }

    #[test]
    fn test_create_default_config() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("default_config.toml");

        assert!(!config_path.exists());
        create_default_config(&config_path).unwrap();
        assert!(config_path.exists());
    }
}
