//! Syntax builder library
//!
//! Stateless constructors for declaration fragments. Every constructor checks
//! its required inputs and fails with [`CodegenError::InvalidArgument`] naming
//! the offending parameter.

use crate::error::{CodegenError, Result};
use crate::syntax::{
    Accessor, AccessorBody, AccessorKind, Attribute, AttributeArgument, AttributeExpr,
    AttributeList, FieldDecl, MemberDecl, Modifier, Name, PropertyDecl, SourceText, TypeDecl,
    TypeKind, TypeRef,
};

/// Alias used for fully rooted names
pub const GLOBAL_ALIAS: &str = "global";

fn require(parameter: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CodegenError::empty_argument(parameter));
    }
    Ok(())
}

fn require_optional(parameter: &'static str, value: Option<&str>) -> Result<()> {
    match value {
        Some(value) => require(parameter, value),
        None => Ok(()),
    }
}

/// Build a name from a simple identifier, an optional dotted namespace and an
/// optional `global::` root.
///
/// ```
/// use idforge_codegen::builder::name;
///
/// let qualified = name("TypeConverter", Some("System.ComponentModel"), true).unwrap();
/// assert_eq!(qualified.to_string(), "global::System.ComponentModel.TypeConverter");
/// ```
pub fn name(simple: &str, namespace: Option<&str>, global: bool) -> Result<Name> {
    require("name", simple)?;
    require_optional("namespace", namespace)?;

    let mut segments: Vec<&str> = match namespace {
        Some(namespace) => namespace.split('.').map(str::trim).collect(),
        None => Vec::new(),
    };
    if segments.iter().any(|s| s.is_empty()) {
        return Err(CodegenError::InvalidArgument {
            parameter: "namespace",
            message: format!("'{}' contains an empty segment", namespace.unwrap_or_default()),
        });
    }
    segments.push(simple.trim());

    let mut rest = segments.into_iter();
    let first = rest.next().unwrap_or_default().to_string();
    let root = if global {
        Name::AliasQualified {
            alias: GLOBAL_ALIAS.to_string(),
            name: first,
        }
    } else {
        Name::Identifier(first)
    };

    Ok(rest.fold(root, |left, right| Name::Qualified {
        left: Box::new(left),
        right: right.to_string(),
    }))
}

/// Build an attribute. With no arguments the argument list is omitted.
pub fn attribute(name: Name, arguments: impl IntoIterator<Item = AttributeArgument>) -> Attribute {
    Attribute {
        name,
        arguments: arguments.into_iter().collect(),
    }
}

/// Group attributes into attribute lists: all in one list when `joined`,
/// otherwise one list per attribute.
pub fn attribute_lists(attributes: Vec<Attribute>, joined: bool) -> Vec<AttributeList> {
    if attributes.is_empty() {
        return Vec::new();
    }
    if joined {
        return vec![AttributeList {
            target: None,
            attributes,
        }];
    }
    attributes
        .into_iter()
        .map(|attribute| AttributeList {
            target: None,
            attributes: vec![attribute],
        })
        .collect()
}

/// `"value"` or `Name = "value"`
pub fn string_attribute_argument(value: &str, name: Option<&str>) -> Result<AttributeArgument> {
    require("value", value)?;
    require_optional("name", name)?;
    Ok(AttributeArgument {
        name: name.map(str::to_string),
        expr: AttributeExpr::StringLiteral(value.to_string()),
    })
}

/// `typeof(T)` or `Name = typeof(T)`
pub fn typeof_attribute_argument(ty: TypeRef, name: Option<&str>) -> Result<AttributeArgument> {
    if ty.is_empty() {
        return Err(CodegenError::empty_argument("type"));
    }
    require_optional("name", name)?;
    Ok(AttributeArgument {
        name: name.map(str::to_string),
        expr: AttributeExpr::TypeOf(ty),
    })
}

/// Field declaration, optionally initialized
pub fn field(
    name: &str,
    ty: TypeRef,
    modifiers: Vec<Modifier>,
    initializer: Option<&str>,
) -> Result<FieldDecl> {
    require("name", name)?;
    if ty.is_empty() {
        return Err(CodegenError::empty_argument("type"));
    }
    require_optional("initializer", initializer)?;

    Ok(FieldDecl {
        attribute_lists: Vec::new(),
        modifiers,
        ty,
        name: name.trim().to_string(),
        initializer: initializer.map(SourceText::new),
    })
}

/// Property declaration with the given accessors
pub fn property(
    name: &str,
    ty: TypeRef,
    modifiers: Vec<Modifier>,
    accessors: Vec<Accessor>,
) -> Result<PropertyDecl> {
    require("name", name)?;
    if ty.is_empty() {
        return Err(CodegenError::empty_argument("type"));
    }
    if accessors.is_empty() {
        return Err(CodegenError::InvalidArgument {
            parameter: "accessors",
            message: "a property needs at least one accessor".to_string(),
        });
    }

    Ok(PropertyDecl {
        attribute_lists: Vec::new(),
        modifiers,
        ty,
        name: name.trim().to_string(),
        accessors,
        initializer: None,
    })
}

/// `get;`
pub fn auto_getter(modifiers: Vec<Modifier>) -> Accessor {
    Accessor {
        kind: AccessorKind::Get,
        modifiers,
        body: AccessorBody::Auto,
    }
}

/// `set;`
pub fn auto_setter(modifiers: Vec<Modifier>) -> Accessor {
    Accessor {
        kind: AccessorKind::Set,
        modifiers,
        body: AccessorBody::Auto,
    }
}

fn type_shell(kind: TypeKind, identifier: &str, modifiers: Vec<Modifier>) -> Result<TypeDecl> {
    require("identifier", identifier)?;
    Ok(TypeDecl::new(kind, identifier.trim()).with_modifiers(modifiers))
}

/// Empty struct declaration
pub fn struct_decl(identifier: &str, modifiers: Vec<Modifier>) -> Result<TypeDecl> {
    type_shell(TypeKind::Struct, identifier, modifiers)
}

/// Empty class declaration
pub fn class_decl(identifier: &str, modifiers: Vec<Modifier>) -> Result<TypeDecl> {
    type_shell(TypeKind::Class, identifier, modifiers)
}

/// Concatenate lists in input order
pub fn unify<T>(lists: impl IntoIterator<Item = Vec<T>>) -> Vec<T> {
    let mut lists = lists.into_iter();
    let Some(mut unified) = lists.next() else {
        return Vec::new();
    };
    for list in lists {
        unified.extend(list);
    }
    unified
}

/// Merge attribute-list collections, preserving order
pub fn unify_attribute_lists(
    lists: impl IntoIterator<Item = Vec<AttributeList>>,
) -> Vec<AttributeList> {
    unify(lists)
}

/// Merge member collections, preserving order
pub fn unify_members(lists: impl IntoIterator<Item = Vec<MemberDecl>>) -> Vec<MemberDecl> {
    unify(lists)
}
