// Show effective configuration

use super::{Command, SettingsSource};
use crate::error::CliResult;

/// Prints the merged settings as TOML
pub struct ConfigCommand {
    pub settings: SettingsSource,
}

impl ConfigCommand {
    pub fn new(settings: SettingsSource) -> Self {
        Self { settings }
    }

    pub fn render(&self) -> CliResult<String> {
        Ok(self.settings.load()?.to_toml()?)
    }
}

impl Command for ConfigCommand {
    fn execute(&self) -> CliResult<()> {
        print!("{}", self.render()?);
        Ok(())
    }
}
