//! Generator settings
//!
//! Settings come from an optional TOML file overlaid with `IDFORGE_*`
//! environment variables. Nested keys use a double underscore, e.g.
//! `IDFORGE_DEFAULTS__EMIT_TYPE_CONVERTER=false`.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use idforge_codegen::templates::{DirectoryTemplates, LayeredTemplates, TemplateStore};
use serde::{Deserialize, Serialize};

use crate::error::{EntityIdError, Result};
use crate::marker::MarkerConfig;
use crate::templates::bundled_templates;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "IDFORGE";

/// Settings that shape generated code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Namespace of the `TypeConverter` attribute
    pub type_converter_namespace: String,
    /// Namespace of the `JsonConverter` attribute
    pub serialization_converter_namespace: String,
    /// Directory whose templates override the bundled ones
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_dir: Option<PathBuf>,
    /// Marker attribute name; the `Attribute` suffix is optional in source
    pub marker_name: String,
    /// Applied for arguments a marker leaves out
    pub defaults: MarkerConfig,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            type_converter_namespace: "System.ComponentModel".to_string(),
            serialization_converter_namespace: "Newtonsoft.Json".to_string(),
            template_dir: None,
            marker_name: "EntityId".to_string(),
            defaults: MarkerConfig::default(),
        }
    }
}

impl GeneratorSettings {
    /// Check names and paths
    pub fn validate(&self) -> Result<()> {
        validate_namespace("type_converter_namespace", &self.type_converter_namespace)?;
        validate_namespace(
            "serialization_converter_namespace",
            &self.serialization_converter_namespace,
        )?;
        if !is_identifier(&self.marker_name) {
            return Err(EntityIdError::Config(format!(
                "marker_name '{}' is not an identifier",
                self.marker_name
            )));
        }
        if let Some(dir) = &self.template_dir {
            if !dir.is_dir() {
                return Err(EntityIdError::Config(format!(
                    "template_dir '{}' is not a directory",
                    dir.display()
                )));
            }
        }
        Ok(())
    }

    /// Bundled templates, overridden by `template_dir` when set
    pub fn template_store(&self) -> TemplateStore {
        let mut layers = LayeredTemplates::new();
        if let Some(dir) = &self.template_dir {
            layers = layers.with_layer(DirectoryTemplates::new(dir));
        }
        TemplateStore::new(layers.with_layer(bundled_templates()))
    }

    /// Serialize as TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

fn validate_namespace(key: &str, namespace: &str) -> Result<()> {
    if namespace.split('.').all(is_identifier) {
        return Ok(());
    }
    Err(EntityIdError::Config(format!(
        "{} '{}' is not a dotted namespace",
        key, namespace
    )))
}

/// Loads [`GeneratorSettings`] from file and environment
pub struct SettingsLoader {
    config_path: Option<PathBuf>,
    required: bool,
    env_prefix: String,
    env_source: Option<config::Map<String, String>>,
}

impl SettingsLoader {
    /// Environment only
    pub fn new() -> Self {
        Self {
            config_path: None,
            required: false,
            env_prefix: ENV_PREFIX.to_string(),
            env_source: None,
        }
    }

    /// Read `path`, which must exist
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: Some(path.into()),
            required: true,
            ..Self::new()
        }
    }

    /// Read the per-user config file when present
    pub fn with_default_path() -> Self {
        Self {
            config_path: Some(Self::default_config_path()),
            required: false,
            ..Self::new()
        }
    }

    /// Per-user config file location
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("idforge")
            .join("config.toml")
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Use a fixed variable map instead of the process environment
    pub fn with_env_source(mut self, source: config::Map<String, String>) -> Self {
        self.env_source = Some(source);
        self
    }

    pub fn load(&self) -> Result<GeneratorSettings> {
        let mut builder = Config::builder();
        if let Some(path) = &self.config_path {
            builder = builder.add_source(File::from(path.clone()).required(self.required));
        }
        builder = builder.add_source(
            Environment::with_prefix(&self.env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(self.env_source.clone()),
        );

        let settings: GeneratorSettings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}
