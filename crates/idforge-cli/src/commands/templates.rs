// List available templates

use idforge_codegen::templates::placeholder_keys;

use super::{Command, SettingsSource};
use crate::error::{CliError, CliResult};
use crate::output::OutputStyle;

/// Lists template names with the placeholder keys each one uses
pub struct TemplatesCommand {
    pub settings: SettingsSource,
}

impl TemplatesCommand {
    pub fn new(settings: SettingsSource) -> Self {
        Self { settings }
    }

    /// `(name, placeholder keys)` for every template, sorted by name
    pub fn listing(&self) -> CliResult<Vec<(String, Vec<String>)>> {
        let store = self.settings.load()?.template_store();
        let names = store
            .template_names()
            .map_err(|e| CliError::Generation(e.to_string()))?;

        let mut listing = Vec::with_capacity(names.len());
        for name in names {
            let text = store
                .read_template(&name, None)
                .map_err(|e| CliError::Generation(e.to_string()))?;
            listing.push((name, placeholder_keys(&text)));
        }
        Ok(listing)
    }
}

impl Command for TemplatesCommand {
    fn execute(&self) -> CliResult<()> {
        let style = OutputStyle::default();
        let listing = self.listing()?;

        println!("{}", style.header("Templates:"));
        for (name, keys) in listing {
            if keys.is_empty() {
                println!("  {}", name);
            } else {
                println!("  {} ({})", name, keys.join(", "));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_listing_includes_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("idforge.toml");
        fs::write(&config, "").unwrap();
        let templates = dir.path().join("templates");
        fs::create_dir(&templates).unwrap();
        fs::write(
            templates.join("GuidEntityIdStruct.cstemplate"),
            "partial struct TEMPLATE_DATA_NAME__ { }",
        )
        .unwrap();

        let command = TemplatesCommand::new(SettingsSource {
            config: Some(config),
            template_dir: Some(templates),
        });
        let listing = command.listing().unwrap();

        let names: Vec<&str> = listing.iter().map(|(n, _)| n.as_str()).collect();
        assert!(names.contains(&"GuidEntityIdStruct"));
        assert!(names.contains(&"Int32EntityIdStruct"));
        assert!(listing.iter().all(|(_, keys)| keys == &vec!["NAME".to_string()]));
    }
}
