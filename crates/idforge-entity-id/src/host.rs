//! Host entry point
//!
//! `EntityIdGenerator::generate` is the call boundary a compiler plugin would
//! use. [`discover`] and [`EntityIdGenerator::generate_unit`] form a small
//! reference host that works on a parsed compilation unit.

use idforge_codegen::ancestors::{wrap_with_ancestors, Ancestor};
use idforge_codegen::syntax::{Attribute, CompilationUnit, MemberDecl, Modifier, TypeDecl, TypeKind};
use idforge_codegen::templates::TemplateStore;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::context::GenerationContext;
use crate::error::{EntityIdError, Result};
use crate::generator::EntityIdSyntaxGenerator;
use crate::marker::MarkerConfig;
use crate::settings::GeneratorSettings;

/// A struct carrying the marker, with its enclosing scopes
#[derive(Debug, Clone)]
pub struct MarkedSubject<'a> {
    pub subject: &'a TypeDecl,
    pub marker: &'a Attribute,
    /// Immediate parent first
    pub ancestors: Vec<Ancestor<'a>>,
}

/// True when `attribute` names the marker, with or without the `Attribute` suffix
pub fn is_marker(attribute: &Attribute, marker_name: &str) -> bool {
    let simple = attribute.name.simple_name();
    simple == marker_name || simple.strip_suffix("Attribute") == Some(marker_name)
}

/// Every struct in `unit` carrying the marker, in source order
pub fn discover<'a>(unit: &'a CompilationUnit, marker_name: &str) -> Vec<MarkedSubject<'a>> {
    let mut found = Vec::new();
    let mut scopes = Vec::new();
    discover_in(&unit.members, marker_name, &mut scopes, &mut found);
    found
}

fn discover_in<'a>(
    members: &'a [MemberDecl],
    marker_name: &str,
    scopes: &mut Vec<Ancestor<'a>>,
    found: &mut Vec<MarkedSubject<'a>>,
) {
    for member in members {
        match member {
            MemberDecl::Namespace(ns) => {
                scopes.push(Ancestor::Namespace(ns));
                discover_in(&ns.members, marker_name, scopes, found);
                scopes.pop();
            }
            MemberDecl::Type(ty) => {
                if let Some(marker) = ty.attributes().find(|a| is_marker(a, marker_name)) {
                    if ty.kind == TypeKind::Struct {
                        found.push(MarkedSubject {
                            subject: ty,
                            marker,
                            ancestors: scopes.iter().rev().copied().collect(),
                        });
                    } else {
                        warn!(
                            "Ignoring marker {} on {} '{}': only structs are supported",
                            marker.name, ty.kind, ty.identifier
                        );
                    }
                }

                scopes.push(Ancestor::Type(ty));
                discover_in(&ty.members, marker_name, scopes, found);
                scopes.pop();
            }
            _ => {}
        }
    }
}

/// Runs synthesis with one settings/template set; shareable across threads
#[derive(Debug)]
pub struct EntityIdGenerator {
    settings: GeneratorSettings,
    store: TemplateStore,
}

impl EntityIdGenerator {
    /// Generator using the templates `settings` points at
    pub fn new(settings: GeneratorSettings) -> Self {
        let store = settings.template_store();
        Self { settings, store }
    }

    /// Generator reading templates from `store`
    pub fn with_store(settings: GeneratorSettings, store: TemplateStore) -> Self {
        Self { settings, store }
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    /// Marker payload with the configured defaults applied
    pub fn marker_config(&self, marker: &Attribute) -> Result<MarkerConfig> {
        MarkerConfig::from_attribute_with_defaults(marker, self.settings.defaults)
    }

    /// Synthesize the declaration for `subject` and nest it inside `ancestors`
    pub fn generate(
        &self,
        subject: &TypeDecl,
        marker: &MarkerConfig,
        ancestors: &[Ancestor<'_>],
    ) -> Result<Vec<MemberDecl>> {
        let context = GenerationContext::new(subject, *marker)?;
        let generator = EntityIdSyntaxGenerator::for_backing_kind(context.backing_kind())?;

        if !subject.has_modifier(Modifier::Partial) {
            warn!(
                "'{}' is not declared partial; the generated declaration will not merge with it",
                context.name()
            );
        }

        let decl = generator.generate(&context, &self.store, &self.settings)?;
        info!(
            "Generated {} entity ID '{}'",
            context.backing_kind(),
            context.name()
        );

        Ok(wrap_with_ancestors(
            vec![decl.into()],
            ancestors.iter().copied(),
        ))
    }

    /// Generate for one discovered subject; errors carry the subject name
    pub fn generate_subject(&self, marked: &MarkedSubject<'_>) -> Result<Vec<MemberDecl>> {
        self.marker_config(marked.marker)
            .and_then(|marker| self.generate(marked.subject, &marker, &marked.ancestors))
            .map_err(|e| EntityIdError::for_subject(&marked.subject.identifier, e))
    }

    /// Generate for every marked struct in `unit`, in source order.
    ///
    /// Subjects run in parallel; the first failing subject in source order is reported.
    pub fn generate_unit(&self, unit: &CompilationUnit) -> Result<Vec<MemberDecl>> {
        let subjects = discover(unit, &self.settings.marker_name);
        debug!("Discovered {} marked struct(s)", subjects.len());

        let results: Vec<Result<Vec<MemberDecl>>> = subjects
            .par_iter()
            .map(|marked| self.generate_subject(marked))
            .collect();

        let mut generated = Vec::new();
        for result in results {
            generated.extend(result?);
        }
        Ok(generated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idforge_codegen::parse_compilation_unit;

    const SOURCE: &str = r#"
namespace Shop.Orders
{
    [EntityId]
    public partial struct OrderId { }

    public partial class Order
    {
        [EntityIdAttribute(GenerateJsonNetConverter = false)]
        public partial struct LineId { }
    }

    [EntityId]
    public class NotAStruct { }

    public partial struct Plain { }
}
"#;

    #[test]
    fn test_discover_finds_marked_structs_with_ancestors() {
        let unit = parse_compilation_unit(SOURCE).unwrap();
        let found = discover(&unit, "EntityId");

        let names: Vec<&str> = found.iter().map(|m| m.subject.identifier.as_str()).collect();
        assert_eq!(names, vec!["OrderId", "LineId"]);

        assert_eq!(found[0].ancestors.len(), 1);
        assert_eq!(found[1].ancestors.len(), 2);
        match found[1].ancestors[0] {
            Ancestor::Type(ty) => assert_eq!(ty.identifier, "Order"),
            other => panic!("expected the containing class first, got {:?}", other),
        }
    }

    #[test]
    fn test_discover_after_assembly_attributes() {
        let unit = parse_compilation_unit(
            "[assembly: InternalsVisibleTo(\"T\")]\n[EntityId] partial struct First { }\nnamespace N { [EntityId] partial struct Id { } }",
        )
        .unwrap();
        let found = discover(&unit, "EntityId");

        let names: Vec<&str> = found.iter().map(|m| m.subject.identifier.as_str()).collect();
        assert_eq!(names, vec!["First", "Id"]);
        assert_eq!(found[0].subject.attribute_lists.len(), 1);
        assert!(found[0].ancestors.is_empty());
        assert!(matches!(found[1].ancestors[0], Ancestor::Namespace(ns) if ns.name.to_string() == "N"));
    }

    #[test]
    fn test_generate_nests_in_original_scopes() {
        let unit = parse_compilation_unit(SOURCE).unwrap();
        let generator = EntityIdGenerator::new(GeneratorSettings::default());
        let output = generator.generate_unit(&unit).unwrap();

        assert_eq!(output.len(), 2);
        let nested = output[1].as_namespace().unwrap();
        assert_eq!(nested.name.to_string(), "Shop.Orders");
        let order = nested.members[0].as_type().unwrap();
        assert_eq!(order.identifier, "Order");
        assert_eq!(order.members.len(), 1);

        let line_id = order.members[0].as_type().unwrap();
        assert!(line_id.nested_type("LineIdTypeConverter").is_some());
        assert!(line_id.nested_type("LineIdJsonConverter").is_none());
    }

    #[test]
    fn test_unsupported_backing_kind_reports_subject() {
        let unit = parse_compilation_unit(
            "[EntityId(BackingType = typeof(decimal))] partial struct Price { }",
        )
        .unwrap();
        let generator = EntityIdGenerator::new(GeneratorSettings::default());
        let err = generator.generate_unit(&unit).unwrap_err();

        assert!(err.to_string().contains("Price"));
        assert!(matches!(
            err.root(),
            EntityIdError::UnsupportedBackingKind { .. }
        ));
    }

    #[test]
    fn test_unit_without_markers_generates_nothing() {
        let unit = parse_compilation_unit("struct S { }").unwrap();
        let generator = EntityIdGenerator::new(GeneratorSettings::default());
        assert!(generator.generate_unit(&unit).unwrap().is_empty());
    }
}
