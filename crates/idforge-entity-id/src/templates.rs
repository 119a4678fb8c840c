//! Bundled `.cstemplate` set

use idforge_codegen::templates::EmbeddedTemplates;

/// Resource namespace of the bundled templates
pub const TEMPLATE_NAMESPACE: &str = "idforge_entity_id.templates";

const BUNDLED: &[(&str, &str)] = &[
    (
        "Int32EntityIdStruct.cstemplate",
        include_str!("../templates/Int32EntityIdStruct.cstemplate"),
    ),
    (
        "Int32EntityIdStructTypeConverter.cstemplate",
        include_str!("../templates/Int32EntityIdStructTypeConverter.cstemplate"),
    ),
    (
        "Int32EntityIdStructJsonConverter.cstemplate",
        include_str!("../templates/Int32EntityIdStructJsonConverter.cstemplate"),
    ),
];

/// Template names used by the generators, relative to a backing-kind prefix
pub const STRUCT_TEMPLATE: &str = "EntityIdStruct";
pub const TYPE_CONVERTER_TEMPLATE: &str = "EntityIdStructTypeConverter";
pub const JSON_CONVERTER_TEMPLATE: &str = "EntityIdStructJsonConverter";

pub fn bundled_templates() -> EmbeddedTemplates {
    EmbeddedTemplates::from_static(TEMPLATE_NAMESPACE, BUNDLED)
}
