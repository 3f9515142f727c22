//! Command implementations

use super::Args;
use crate::config::{cli::CliConfig, ConfigBuilder, ConfigSource};
use crate::error::{AnalysisError, Result};
use crate::output::{create_formatter, create_writer, ProgressReporter};

/// Available commands
#[derive(Debug)]
pub enum Command {
    /// Analyze the project rooted at the configured path
    Analyze(Args),
    /// Show version information
    Version,
    /// Show help information
    Help,
    /// Initialize a default configuration file
    Init,
}

impl Command {
    /// Create a command from parsed arguments
    pub fn from_args(args: Args) -> Self {
        if args.init {
            return Command::Init;
        }
        Command::Analyze(args)
    }

    /// Execute the command
    pub fn execute(&self) -> Result<()> {
        match self {
            Command::Analyze(args) => {
                self.validate()?;

                let cli_config = CliConfig::from_args(args);
                let partial_settings = cli_config.load()?;

                let config_builder = ConfigBuilder::new();
                let config_builder = if let Some(config_path) = cli_config.config_path() {
                    config_builder.add_config_file(config_path)?
                } else {
                    config_builder.try_add_default_config_file()
                };

                let settings = config_builder.merge(partial_settings).build()?;

                if !settings.quiet {
                    println!("codegraph v{}", env!("CARGO_PKG_VERSION"));
                    println!("Scanning path: {}", settings.scan_path.display());
                    println!("Output format: {}", settings.output_format);
                    if settings.verbose {
                        println!("Settings: {:#?}", settings);
                    }
                }

                let reporter = ProgressReporter::new(settings.quiet || !settings.show_progress, settings.verbose);

                let report = crate::analysis::analyze(&settings, &reporter)?;

                reporter.finish(&format!(
                    "{} files, {} issues, {} clone groups",
                    report.summary.totals.files,
                    report.issues.len(),
                    report.clones.len()
                ));

                let formatter = create_formatter(&settings.output_format, settings.use_colors, settings.verbose, settings.quiet);
                let rendered = formatter.format(&report)?;

                let writer = create_writer(settings.output_file.as_ref());
                writer.write(&rendered)?;

                if !settings.quiet && settings.output_file.is_some() {
                    println!("Report written to {}", settings.output_file.as_ref().unwrap().display());
                }

                Ok(())
            }
            Command::Version => {
                println!("codegraph v{}", env!("CARGO_PKG_VERSION"));
                println!("A structural analysis pipeline for software projects");
                println!("License: MIT");
                Ok(())
            }
            Command::Help => {
                println!("codegraph v{} - structural analysis pipeline", env!("CARGO_PKG_VERSION"));
                println!("\nUsage Examples:");
                println!("  codegraph                        # Analyze current directory");
                println!("  codegraph --path ./my-project    # Analyze a specific directory");
                println!("  codegraph --exclude '**/fixtures/**'  # Skip matching paths");
                println!("  codegraph --output json           # Output in JSON format");
                println!("  codegraph --output-file report.json  # Write results to file");
                println!("\nFor more options, use --help");
                Ok(())
            }
            Command::Init => {
                let config_path = std::path::PathBuf::from(".codegraph.toml");

                if config_path.exists() {
                    println!("Configuration file already exists at: {}", config_path.display());
                    println!("To overwrite it, delete the file first and run this command again.");
                    return Ok(());
                }

                crate::config::parser::create_default_config(&config_path)?;

                println!("Created default configuration file at: {}", config_path.display());
                println!("\nEdit this file to customize scan_path, exclude_patterns, max_entries,");
                println!("clone_similarity_threshold, output_format and related settings.");

                Ok(())
            }
        }
    }

    /// Validate the command arguments
    pub fn validate(&self) -> Result<()> {
        match self {
            Command::Analyze(args) => {
                if let Some(path) = &args.path {
                    if !path.exists() {
                        return Err(AnalysisError::invalid_path(path.clone()));
                    }
                }

                if let Some(config_path) = &args.config {
                    if !config_path.exists() {
                        return Err(AnalysisError::ConfigNotFound {
                            path: config_path.clone(),
                            #[cfg(not(tarpaulin_include))]
                            backtrace: std::backtrace::Backtrace::capture(),
                        });
                    }
                }

                Ok(())
            }
            Command::Version | Command::Help | Command::Init => Ok(()),
        }
    }

    /// Run the command and handle errors, returning a process exit code
    pub fn run(&self) -> i32 {
        match self.execute() {
            Ok(_) => 0,
            Err(err) => {
                eprintln!("{}: {}", err.severity(), err.user_message());
                match err.severity() {
                    crate::error::ErrorSeverity::Warning => 0,
                    crate::error::ErrorSeverity::Error => 1,
                    crate::error::ErrorSeverity::Critical => 2,
                }
            }
        }
    }
}
