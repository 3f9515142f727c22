use super::*;
use crate::models::config::PartialSettings;

#[test]
fn test_config_builder_merges_in_order() {
    let file_layer = PartialSettings { max_entries: Some(100), quiet: Some(false), ..Default::default() };
    let cli_layer = PartialSettings { max_entries: Some(50), ..Default::default() };

    let merged = ConfigBuilder::new().merge(file_layer).merge(cli_layer).partial;

    assert_eq!(merged.max_entries, Some(50));
    assert_eq!(merged.quiet, Some(false));
}

#[test]
fn test_load_config_uses_cli_path() {
    let dir = tempfile::tempdir().unwrap();
    let cli_args = CliArgs { path: Some(dir.path().to_path_buf()), ..Default::default() };

    let settings = load_config(cli_args).unwrap();
    assert_eq!(settings.scan_path, dir.path());
}
