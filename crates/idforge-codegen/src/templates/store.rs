//! Template sources
//!
//! A template is addressed by logical name and stored as `{name}.cstemplate`,
//! either bundled into the binary or on disk.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::merge::{merge, TemplateData};
use crate::error::{CodegenError, Result};

/// File extension that marks template resources
pub const TEMPLATE_EXTENSION: &str = "cstemplate";

/// Named-blob reader behind the template store
pub trait TemplateSource: Send + Sync {
    /// Read the raw text of `name`; `TemplateNotFound` when absent
    fn read(&self, name: &str) -> Result<String>;

    /// Human readable location, used in error messages
    fn location(&self) -> String;

    /// Logical names of every template this source can serve
    fn template_names(&self) -> Result<Vec<String>>;
}

fn file_name(name: &str) -> String {
    format!("{}.{}", name, TEMPLATE_EXTENSION)
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(CodegenError::empty_argument("name"));
    }
    if name.contains(['/', '\\']) || name.contains("..") {
        return Err(CodegenError::InvalidArgument {
            parameter: "name",
            message: format!("'{}' is not a plain template name", name),
        });
    }
    Ok(())
}

/// Templates bundled under a resource namespace
#[derive(Debug, Clone)]
pub struct EmbeddedTemplates {
    namespace: String,
    entries: Vec<(String, String)>,
}

impl EmbeddedTemplates {
    /// Empty set under `namespace`
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            entries: Vec::new(),
        }
    }

    /// Build from a static `(file name, text)` table, typically filled with `include_str!`
    pub fn from_static(namespace: impl Into<String>, entries: &[(&str, &str)]) -> Self {
        entries
            .iter()
            .fold(Self::new(namespace), |templates, (file, text)| {
                templates.with_file(*file, *text)
            })
    }

    /// Add a resource by file name (`Name.cstemplate`)
    pub fn with_file(mut self, file_name: impl Into<String>, text: impl Into<String>) -> Self {
        self.entries.push((file_name.into(), text.into()));
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn resource_name(&self, file: &str) -> String {
        format!("{}.{}", self.namespace, file)
    }
}

impl TemplateSource for EmbeddedTemplates {
    fn read(&self, name: &str) -> Result<String> {
        validate_name(name)?;
        let wanted = self.resource_name(&file_name(name));

        self.entries
            .iter()
            .find(|(file, _)| self.resource_name(file) == wanted)
            .map(|(_, text)| text.clone())
            .ok_or_else(|| CodegenError::TemplateNotFound {
                name: name.to_string(),
                searched: self.location(),
            })
    }

    fn location(&self) -> String {
        format!("embedded resources under '{}'", self.namespace)
    }

    fn template_names(&self) -> Result<Vec<String>> {
        let suffix = format!(".{}", TEMPLATE_EXTENSION);
        Ok(self
            .entries
            .iter()
            .filter_map(|(file, _)| file.strip_suffix(&suffix))
            .map(str::to_string)
            .collect())
    }
}

/// Templates read from `{root}/{name}.cstemplate`
#[derive(Debug, Clone)]
pub struct DirectoryTemplates {
    root: PathBuf,
}

impl DirectoryTemplates {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TemplateSource for DirectoryTemplates {
    fn read(&self, name: &str) -> Result<String> {
        validate_name(name)?;
        let path = self.root.join(file_name(name));

        match fs::read_to_string(&path) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(CodegenError::TemplateNotFound {
                name: name.to_string(),
                searched: self.location(),
            }),
            Err(e) => Err(CodegenError::Io {
                name: name.to_string(),
                source: e,
            }),
        }
    }

    fn location(&self) -> String {
        format!("directory '{}'", self.root.display())
    }

    fn template_names(&self) -> Result<Vec<String>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let io_error = |source| CodegenError::Io {
            name: self.root.display().to_string(),
            source,
        };

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(TEMPLATE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Ordered stack of sources; the first one holding a name serves it
#[derive(Default)]
pub struct LayeredTemplates {
    layers: Vec<Box<dyn TemplateSource>>,
}

impl LayeredTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layer below the existing ones
    pub fn with_layer(mut self, layer: impl TemplateSource + 'static) -> Self {
        self.layers.push(Box::new(layer));
        self
    }
}

impl TemplateSource for LayeredTemplates {
    fn read(&self, name: &str) -> Result<String> {
        validate_name(name)?;
        for layer in &self.layers {
            match layer.read(name) {
                Err(CodegenError::TemplateNotFound { .. }) => continue,
                other => return other,
            }
        }
        Err(CodegenError::TemplateNotFound {
            name: name.to_string(),
            searched: self.location(),
        })
    }

    fn location(&self) -> String {
        if self.layers.is_empty() {
            return "no template sources".to_string();
        }
        self.layers
            .iter()
            .map(|layer| layer.location())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn template_names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = Vec::new();
        for layer in &self.layers {
            for name in layer.template_names()? {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        Ok(names)
    }
}

/// Shared, read-only entry point for template reads
pub struct TemplateStore {
    source: Box<dyn TemplateSource>,
}

impl TemplateStore {
    pub fn new(source: impl TemplateSource + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    /// Read a template, merging `data` into it when given
    pub fn read_template(&self, name: &str, data: Option<&TemplateData>) -> Result<String> {
        let text = self.source.read(name)?;
        debug!("Read template '{}' ({} bytes)", name, text.len());

        match data {
            Some(data) => {
                let merged = merge(&text, data)?;
                debug!("Merged {} template value(s) into '{}'", data.len(), name);
                Ok(merged)
            }
            None => Ok(text),
        }
    }

    pub fn template_names(&self) -> Result<Vec<String>> {
        self.source.template_names()
    }

    pub fn location(&self) -> String {
        self.source.location()
    }
}

impl std::fmt::Debug for TemplateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateStore")
            .field("source", &self.source.location())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn embedded() -> EmbeddedTemplates {
        EmbeddedTemplates::from_static(
            "demo.templates",
            &[("Shape.cstemplate", "struct TEMPLATE_DATA_NAME__ { }")],
        )
    }

    #[test]
    fn test_embedded_read_by_exact_name() {
        let templates = embedded();
        assert!(templates.read("Shape").is_ok());
        assert!(matches!(
            templates.read("shape"),
            Err(CodegenError::TemplateNotFound { .. })
        ));
        assert_eq!(templates.template_names().unwrap(), vec!["Shape"]);
    }

    #[test]
    fn test_names_with_paths_are_rejected() {
        assert!(matches!(
            embedded().read("../Shape"),
            Err(CodegenError::InvalidArgument { parameter: "name", .. })
        ));
        assert!(matches!(
            embedded().read(""),
            Err(CodegenError::InvalidArgument { parameter: "name", .. })
        ));
    }

    #[test]
    fn test_directory_source() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Shape.cstemplate"), "class C { }").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let templates = DirectoryTemplates::new(dir.path());
        assert_eq!(templates.read("Shape").unwrap(), "class C { }");
        assert_eq!(templates.template_names().unwrap(), vec!["Shape"]);
        assert!(matches!(
            templates.read("Missing"),
            Err(CodegenError::TemplateNotFound { .. })
        ));
    }

    #[test]
    fn test_layers_override_in_order() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Shape.cstemplate"), "class Override { }").unwrap();

        let layered = LayeredTemplates::new()
            .with_layer(DirectoryTemplates::new(dir.path()))
            .with_layer(embedded());
        assert_eq!(layered.read("Shape").unwrap(), "class Override { }");

        let err = layered.read("Other").unwrap_err();
        match err {
            CodegenError::TemplateNotFound { searched, .. } => {
                assert!(searched.contains("demo.templates"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_store_merges_when_data_given() {
        let store = TemplateStore::new(embedded());
        assert_eq!(
            store.read_template("Shape", None).unwrap(),
            "struct TEMPLATE_DATA_NAME__ { }"
        );
        let data = TemplateData::new().with("name", "OrderId");
        assert_eq!(
            store.read_template("Shape", Some(&data)).unwrap(),
            "struct OrderId { }"
        );
    }
}
