//! Marker attribute payload

use idforge_codegen::syntax::{Attribute, AttributeExpr};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::backing::BackingKind;
use crate::error::{EntityIdError, Result};

const BACKING_TYPE: &str = "BackingType";
const TYPE_CONVERTER_ARGUMENTS: &[&str] = &["GenerateTypeConverter", "EmitTypeConverter"];
const SERIALIZATION_CONVERTER_ARGUMENTS: &[&str] =
    &["GenerateJsonNetConverter", "EmitSerializationConverter"];

/// What the marker on a struct asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    pub backing_kind: BackingKind,
    pub emit_type_converter: bool,
    pub emit_serialization_converter: bool,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            backing_kind: BackingKind::Int32,
            emit_type_converter: true,
            emit_serialization_converter: true,
        }
    }
}

impl MarkerConfig {
    /// Read the marker's named arguments over the built-in defaults
    pub fn from_attribute(attribute: &Attribute) -> Result<Self> {
        Self::from_attribute_with_defaults(attribute, Self::default())
    }

    /// Read the marker's named arguments; anything it omits comes from `defaults`
    pub fn from_attribute_with_defaults(attribute: &Attribute, defaults: Self) -> Result<Self> {
        let mut config = defaults;

        for argument in &attribute.arguments {
            let Some(name) = argument.name.as_deref() else {
                warn!(
                    "Ignoring positional argument {} on marker {}",
                    argument.expr, attribute.name
                );
                continue;
            };

            if name == BACKING_TYPE {
                config.backing_kind = backing_kind(name, &argument.expr)?;
            } else if TYPE_CONVERTER_ARGUMENTS.contains(&name) {
                config.emit_type_converter = flag(name, &argument.expr)?;
            } else if SERIALIZATION_CONVERTER_ARGUMENTS.contains(&name) {
                config.emit_serialization_converter = flag(name, &argument.expr)?;
            } else {
                warn!("Ignoring unknown marker argument {} on {}", name, attribute.name);
            }
        }

        Ok(config)
    }
}

fn backing_kind(argument: &str, expr: &AttributeExpr) -> Result<BackingKind> {
    match expr {
        AttributeExpr::TypeOf(ty) => {
            BackingKind::from_type_ref(ty).map_err(|e| EntityIdError::InvalidMarker {
                argument: argument.to_string(),
                value: expr.to_string(),
                message: e.to_string(),
            })
        }
        _ => Err(EntityIdError::InvalidMarker {
            argument: argument.to_string(),
            value: expr.to_string(),
            message: "expected a typeof(...) expression".to_string(),
        }),
    }
}

fn flag(argument: &str, expr: &AttributeExpr) -> Result<bool> {
    match expr {
        AttributeExpr::Raw(text) if text == "true" => Ok(true),
        AttributeExpr::Raw(text) if text == "false" => Ok(false),
        _ => Err(EntityIdError::InvalidMarker {
            argument: argument.to_string(),
            value: expr.to_string(),
            message: "expected true or false".to_string(),
        }),
    }
}
