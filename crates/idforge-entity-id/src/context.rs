//! Per-subject generation context

use idforge_codegen::syntax::{TypeDecl, TypeKind};
use idforge_codegen::templates::TemplateData;

use crate::backing::BackingKind;
use crate::error::{EntityIdError, Result};
use crate::marker::MarkerConfig;

/// Everything one synthesis run needs to know about its subject. Immutable once built.
#[derive(Debug, Clone, Copy)]
pub struct GenerationContext<'a> {
    subject: &'a TypeDecl,
    marker: MarkerConfig,
}

impl<'a> GenerationContext<'a> {
    /// Fails with `InvalidArgument` unless `subject` is a named struct
    pub fn new(subject: &'a TypeDecl, marker: MarkerConfig) -> Result<Self> {
        if subject.kind != TypeKind::Struct {
            return Err(EntityIdError::InvalidArgument {
                parameter: "subject",
                message: format!("'{}' is a {}, not a struct", subject.identifier, subject.kind),
            });
        }
        if subject.identifier.trim().is_empty() {
            return Err(EntityIdError::InvalidArgument {
                parameter: "subject",
                message: "the declaration has no identifier".to_string(),
            });
        }
        Ok(Self { subject, marker })
    }

    pub fn subject(&self) -> &'a TypeDecl {
        self.subject
    }

    /// Identifier of the subject declaration
    pub fn name(&self) -> &'a str {
        &self.subject.identifier
    }

    pub fn backing_kind(&self) -> BackingKind {
        self.marker.backing_kind
    }

    pub fn emit_type_converter(&self) -> bool {
        self.marker.emit_type_converter
    }

    pub fn emit_serialization_converter(&self) -> bool {
        self.marker.emit_serialization_converter
    }

    /// Template name prefix, the CLR name of the backing kind
    pub fn template_prefix(&self) -> String {
        self.marker.backing_kind.to_string()
    }

    /// `{prefix}{suffix}`
    pub fn template_name(&self, suffix: &str) -> String {
        format!("{}{}", self.template_prefix(), suffix)
    }

    /// Values merged into every template for this subject
    pub fn template_data(&self) -> TemplateData {
        TemplateData::new().with("name", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_derives_prefix_and_name() {
        let subject = TypeDecl::new(TypeKind::Struct, "OrderId");
        let marker = MarkerConfig {
            backing_kind: BackingKind::Int64,
            ..MarkerConfig::default()
        };
        let context = GenerationContext::new(&subject, marker).unwrap();

        assert_eq!(context.name(), "OrderId");
        assert_eq!(context.template_prefix(), "Int64");
        assert_eq!(context.template_name("EntityIdStruct"), "Int64EntityIdStruct");
        assert_eq!(context.template_data().get("NAME"), Some("OrderId"));
    }

    #[test]
    fn test_context_rejects_non_structs() {
        let subject = TypeDecl::new(TypeKind::Class, "OrderId");
        assert!(matches!(
            GenerationContext::new(&subject, MarkerConfig::default()),
            Err(EntityIdError::InvalidArgument { parameter: "subject", .. })
        ));

        let unnamed = TypeDecl::new(TypeKind::Struct, "");
        assert!(GenerationContext::new(&unnamed, MarkerConfig::default()).is_err());
    }
}
