//! Template storage, placeholder merging and instantiation

mod merge;
mod store;

pub use merge::{merge, placeholder_keys, TemplateData};
pub use store::{
    DirectoryTemplates, EmbeddedTemplates, LayeredTemplates, TemplateSource, TemplateStore,
    TEMPLATE_EXTENSION,
};

use tracing::debug;

use crate::error::{CodegenError, Result};
use crate::syntax::{parse_compilation_unit, TypeDecl, TypeKind};

/// Read `name`, merge `data`, parse, and return the first top-level type of `kind`
pub fn from_template(
    store: &TemplateStore,
    name: &str,
    data: &TemplateData,
    kind: TypeKind,
) -> Result<TypeDecl> {
    let shape_mismatch = || CodegenError::TemplateShapeMismatch {
        template: name.to_string(),
        kind,
    };

    let text = store.read_template(name, Some(data))?;
    if text.trim().is_empty() {
        return Err(shape_mismatch());
    }

    let unit = parse_compilation_unit(&text).map_err(|e| match e {
        CodegenError::Syntax { position, message } => CodegenError::InvalidTemplate {
            template: name.to_string(),
            position,
            message,
        },
        other => other,
    })?;

    let decl = unit.into_first_type_of_kind(kind).ok_or_else(shape_mismatch)?;
    debug!("Instantiated {} '{}' from template '{}'", kind, decl.identifier, name);
    Ok(decl)
}
