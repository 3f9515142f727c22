//! Configuration management: layered sources with CLI > env > file > defaults
//! precedence (spec §6 "Configuration").

pub mod cli;
pub mod file;
pub mod parser;
pub mod settings;
#[cfg(test)]
mod tests;

use crate::error::Result;
use crate::models::config::{PartialSettings, Settings};

pub use cli::{CliArgs, CliConfig};
pub use file::{EnvConfig, FileConfig};
pub use settings::SettingsValidator;

/// A source of partial configuration that can be layered with others.
pub trait ConfigSource {
    fn load(&self) -> Result<PartialSettings>;
    fn is_available(&self) -> bool;
    fn name(&self) -> &str;
    fn priority(&self) -> u8 {
        10
    }
}

/// Merges partial settings from multiple sources and validates the result.
pub struct ConfigBuilder {
    partial: PartialSettings,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self { partial: PartialSettings::default() }
    }

    pub fn merge(mut self, partial: PartialSettings) -> Self {
        self.partial.merge_from(partial);
        self
    }

    pub fn load_from<S: ConfigSource>(self, source: &S) -> Result<Self> {
        if source.is_available() {
            let partial = source.load()?;
            Ok(self.merge(partial))
        } else {
            Ok(self)
        }
    }

    pub fn try_load_from<S: ConfigSource>(self, source: &S) -> Self {
        if source.is_available() {
            match source.load() {
                Ok(partial) => self.merge(partial),
                Err(_) => self,
            }
        } else {
            self
        }
    }

    pub fn add_config_file(self, path: &std::path::Path) -> Result<Self> {
        let file_config = FileConfig::with_path(path.to_path_buf());
        self.load_from(&file_config)
    }

    pub fn try_add_default_config_file(self) -> Self {
        if let Ok(Some(default_config)) = parser::find_default_config() {
            self.merge(default_config)
        } else {
            self
        }
    }

    pub fn build(self) -> Result<Settings> {
        let settings = self.partial.to_settings();
        SettingsValidator::validate(&settings)?;
        Ok(settings)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Loads configuration from CLI args, env vars (`CODEGRAPH_*`), and config
/// file, in increasing precedence.
pub fn load_config(cli_args: CliArgs) -> Result<Settings> {
    let cli_config = CliConfig::new(cli_args.clone());
    let mut builder = ConfigBuilder::new();

    if let Some(config_path) = cli_args.config.clone() {
        builder = builder.load_from(&FileConfig::with_path(config_path))?;
    } else if let Ok(Some(default_config)) = parser::find_default_config() {
        builder = builder.merge(default_config);
    }

    let env_config = EnvConfig::new("CODEGRAPH");
    builder = builder.try_load_from(&env_config);

    builder = builder.load_from(&cli_config)?;

    builder.build()
}
