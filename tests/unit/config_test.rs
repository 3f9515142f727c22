use std::path::PathBuf;

use codegraph::models::config::{OutputFormat, PartialSettings};

#[test]
fn test_partial_settings_merge_prefers_later_source() {
    let mut base = PartialSettings {
        scan_path: Some(PathBuf::from("/base/path")),
        exclude_patterns: Some(vec!["node_modules".to_string()]),
        max_entries: Some(2000),
        output_format: Some(OutputFormat::Text),
        ..Default::default()
    };

    let override_settings = PartialSettings {
        scan_path: Some(PathBuf::from("/override/path")),
        exclude_patterns: Some(vec!["dist".to_string(), "build".to_string()]),
        output_format: Some(OutputFormat::Json),
        quiet: Some(true),
        ..Default::default()
    };

    base.merge_from(override_settings);

    assert_eq!(base.scan_path, Some(PathBuf::from("/override/path")));
    assert_eq!(base.exclude_patterns, Some(vec!["dist".to_string(), "build".to_string()]));
    assert_eq!(base.max_entries, Some(2000));
    assert!(matches!(base.output_format, Some(OutputFormat::Json)));
    assert_eq!(base.quiet, Some(true));
}

#[test]
fn test_partial_settings_to_settings_fills_unset_fields_with_defaults() {
    let partial = PartialSettings {
        scan_path: Some(PathBuf::from("/custom/path")),
        clone_similarity_threshold: Some(0.8),
        parallel: Some(false),
        ..Default::default()
    };

    let settings = partial.to_settings();

    assert_eq!(settings.scan_path, PathBuf::from("/custom/path"));
    assert_eq!(settings.clone_similarity_threshold, 0.8);
    assert!(!settings.parallel);
    // Unset fields keep their `Settings::default()` value.
    assert_eq!(settings.max_entries, 2000);
    assert!(settings.ignored_dirs.iter().any(|d| d == "node_modules"));
}

#[test]
fn test_output_format_from_str_rejects_unknown_values() {
    use std::str::FromStr;
    assert!(matches!(OutputFormat::from_str("json"), Ok(OutputFormat::Json)));
    assert!(OutputFormat::from_str("xml").is_err());
}
