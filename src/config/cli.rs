//! Command-line argument configuration source

use std::path::PathBuf;

use super::ConfigSource;
use crate::cli::args::{Args, OutputFormat as CliOutputFormat};
use crate::error::Result;
use crate::models::config::{OutputFormat, PartialSettings};

/// Plain-data mirror of [`Args`], decoupled from `clap` so it can be built
/// by hand in tests.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub path: Option<PathBuf>,
    pub exclude: Option<Vec<String>>,
    pub max_entries: Option<usize>,
    pub clone_threshold: Option<f64>,
    pub output_format: Option<OutputFormat>,
    pub output_file: Option<PathBuf>,
    pub quiet: bool,
    pub verbose: bool,
    pub no_parallel: bool,
    pub follow_links: bool,
    pub no_colors: bool,
    pub no_progress: bool,
    pub config: Option<PathBuf>,
}

#[derive(Debug)]
pub struct CliConfig {
    args: CliArgs,
    name: String,
    priority: u8,
}

impl CliConfig {
    pub fn new(args: CliArgs) -> Self {
        Self { args, name: "command-line arguments".to_string(), priority: 30 }
    }

    pub fn from_args(args: &Args) -> Self {
        let cli_args = CliArgs {
            path: args.path.clone(),
            exclude: if args.exclude.is_empty() { None } else { Some(args.exclude.clone()) },
            max_entries: args.max_entries,
            clone_threshold: args.clone_threshold,
            output_format: Some(match args.output {
                CliOutputFormat::Text => OutputFormat::Text,
                CliOutputFormat::Json => OutputFormat::Json,
                CliOutputFormat::Csv => OutputFormat::Csv,
            }),
            output_file: args.output_file.clone(),
            quiet: args.quiet,
            verbose: args.verbose,
            no_parallel: args.no_parallel,
            follow_links: args.follow_links,
            no_colors: args.no_colors,
            no_progress: args.no_progress,
            config: args.config.clone(),
        };
        Self::new(cli_args)
    }

    pub fn config_path(&self) -> Option<&PathBuf> {
        self.args.config.as_ref()
    }
}

impl ConfigSource for CliConfig {
    fn load(&self) -> Result<PartialSettings> {
        let mut settings = PartialSettings::default();

        if let Some(path) = &self.args.path {
            settings.scan_path = Some(path.clone());
        }
        if let Some(exclude) = &self.args.exclude {
            settings.exclude_patterns = Some(exclude.clone());
        }
        if let Some(max_entries) = self.args.max_entries {
            settings.max_entries = Some(max_entries);
        }
        if let Some(threshold) = self.args.clone_threshold {
            settings.clone_similarity_threshold = Some(threshold);
        }
        if let Some(format) = &self.args.output_format {
            settings.output_format = Some(format.clone());
        }
        if let Some(output_file) = &self.args.output_file {
            settings.output_file = Some(output_file.clone());
        }
        if self.args.quiet {
            settings.quiet = Some(true);
        }
        if self.args.verbose {
            settings.verbose = Some(true);
        }
        if self.args.no_parallel {
            settings.parallel = Some(false);
        }
        if self.args.follow_links {
            settings.follow_links = Some(true);
        }
        if self.args.no_colors {
            settings.use_colors = Some(false);
        }
        if self.args.no_progress {
            settings.show_progress = Some(false);
        }

        Ok(settings)
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_config_source() {
        let args = CliArgs {
            path: Some(PathBuf::from("/cli/path")),
            exclude: Some(vec!["cli_exclude".to_string()]),
            max_entries: Some(10),
            verbose: true,
            ..Default::default()
        };

        let cli_config = CliConfig::new(args);
        assert!(cli_config.is_available());
        assert_eq!(cli_config.priority(), 30);

        let settings = cli_config.load().unwrap();
        assert_eq!(settings.scan_path, Some(PathBuf::from("/cli/path")));
        assert_eq!(settings.exclude_patterns, Some(vec!["cli_exclude".to_string()]));
        assert_eq!(settings.max_entries, Some(10));
        assert_eq!(settings.verbose, Some(true));
    }
}
