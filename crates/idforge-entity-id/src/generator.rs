//! Generator strategies, one per supported backing kind

use idforge_codegen::builder::{
    attribute, attribute_lists, name, typeof_attribute_argument, unify_attribute_lists,
    unify_members,
};
use idforge_codegen::syntax::{AttributeList, MemberDecl, TypeDecl, TypeKind, TypeRef};
use idforge_codegen::templates::{from_template, TemplateData, TemplateStore};
use tracing::debug;

use crate::backing::BackingKind;
use crate::context::GenerationContext;
use crate::error::{EntityIdError, Result};
use crate::settings::GeneratorSettings;
use crate::templates::{JSON_CONVERTER_TEMPLATE, STRUCT_TEMPLATE, TYPE_CONVERTER_TEMPLATE};

/// Closed set of generator variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityIdSyntaxGenerator {
    Int32,
}

impl EntityIdSyntaxGenerator {
    /// The variant handling `kind`
    pub fn for_backing_kind(kind: BackingKind) -> Result<Self> {
        match kind {
            BackingKind::Int32 => Ok(EntityIdSyntaxGenerator::Int32),
            kind => Err(EntityIdError::UnsupportedBackingKind { kind }),
        }
    }

    /// Synthesize the entity ID struct for `context`
    pub fn generate(
        &self,
        context: &GenerationContext<'_>,
        store: &TemplateStore,
        settings: &GeneratorSettings,
    ) -> Result<TypeDecl> {
        match self {
            EntityIdSyntaxGenerator::Int32 => generate_struct(context, store, settings),
        }
    }
}

fn generate_struct(
    context: &GenerationContext<'_>,
    store: &TemplateStore,
    settings: &GeneratorSettings,
) -> Result<TypeDecl> {
    let data = context.template_data();

    let mut decl = from_template(
        store,
        &context.template_name(STRUCT_TEMPLATE),
        &data,
        TypeKind::Struct,
    )?;

    let attributes = generate_attributes(context, settings)?;
    let members = generate_members(context, store, &data)?;
    debug!(
        "Adding {} attribute list(s) and {} member(s) to '{}'",
        attributes.len(),
        members.len(),
        context.name()
    );

    decl.attribute_lists =
        unify_attribute_lists([std::mem::take(&mut decl.attribute_lists), attributes]);
    decl.members = unify_members([std::mem::take(&mut decl.members), members]);
    Ok(decl)
}

/// `[TypeConverter(typeof(XTypeConverter))]` and `[JsonConverter(typeof(XJsonConverter))]`
fn generate_attributes(
    context: &GenerationContext<'_>,
    settings: &GeneratorSettings,
) -> Result<Vec<AttributeList>> {
    let mut attributes = Vec::new();

    if context.emit_type_converter() {
        attributes.push(attribute(
            name("TypeConverter", Some(settings.type_converter_namespace.as_str()), false)?,
            [typeof_attribute_argument(
                TypeRef::new(format!("{}TypeConverter", context.name())),
                None,
            )?],
        ));
    }

    if context.emit_serialization_converter() {
        attributes.push(attribute(
            name(
                "JsonConverter",
                Some(settings.serialization_converter_namespace.as_str()),
                false,
            )?,
            [typeof_attribute_argument(
                TypeRef::new(format!("{}JsonConverter", context.name())),
                None,
            )?],
        ));
    }

    Ok(attribute_lists(attributes, false))
}

fn generate_members(
    context: &GenerationContext<'_>,
    store: &TemplateStore,
    data: &TemplateData,
) -> Result<Vec<MemberDecl>> {
    let mut members = Vec::new();

    if context.emit_type_converter() {
        let converter = from_template(
            store,
            &context.template_name(TYPE_CONVERTER_TEMPLATE),
            data,
            TypeKind::Class,
        )?;
        members.push(converter.into());
    }

    if context.emit_serialization_converter() {
        let converter = from_template(
            store,
            &context.template_name(JSON_CONVERTER_TEMPLATE),
            data,
            TypeKind::Class,
        )?;
        members.push(converter.into());
    }

    Ok(members)
}
