// Command implementations

use std::path::PathBuf;

use idforge_entity_id::{GeneratorSettings, SettingsLoader};
use tracing::debug;

use crate::error::CliResult;

pub mod config;
pub mod generate;
pub mod templates;

pub use config::ConfigCommand;
pub use generate::GenerateCommand;
pub use templates::TemplatesCommand;

/// Trait for command handlers
pub trait Command {
    /// Execute the command
    fn execute(&self) -> CliResult<()>;
}

/// Where a command gets its settings from
#[derive(Debug, Clone, Default)]
pub struct SettingsSource {
    pub config: Option<PathBuf>,
    pub template_dir: Option<PathBuf>,
}

impl SettingsSource {
    /// Load file and environment settings, then apply command-line overrides
    pub fn load(&self) -> CliResult<GeneratorSettings> {
        let loader = match &self.config {
            Some(path) => SettingsLoader::with_path(path),
            None => SettingsLoader::with_default_path(),
        };
        debug!("Loading settings from {:?}", loader.config_path());

        let mut settings = loader.load()?;
        if let Some(dir) = &self.template_dir {
            settings.template_dir = Some(dir.clone());
            settings.validate()?;
        }
        Ok(settings)
    }
}
