//! Re-nesting generated members inside their enclosing scopes
//!
//! Generated code has to land in the same namespace and the same containing
//! types as the declaration it was generated for. Each enclosing scope is
//! reproduced as a bare shell: name, modifiers and type parameters, with the
//! generated members as its only contents.

use crate::syntax::{MemberDecl, NamespaceDecl, TypeDecl, TypeKind};

/// One enclosing scope of a subject declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ancestor<'a> {
    Namespace(&'a NamespaceDecl),
    Type(&'a TypeDecl),
}

impl<'a> From<&'a NamespaceDecl> for Ancestor<'a> {
    fn from(ns: &'a NamespaceDecl) -> Self {
        Ancestor::Namespace(ns)
    }
}

impl<'a> From<&'a TypeDecl> for Ancestor<'a> {
    fn from(ty: &'a TypeDecl) -> Self {
        Ancestor::Type(ty)
    }
}

impl Ancestor<'_> {
    /// Namespaces, classes and structs are reproduced; other scopes are skipped
    pub fn is_wrapped(&self) -> bool {
        match self {
            Ancestor::Namespace(_) => true,
            Ancestor::Type(ty) => matches!(ty.kind, TypeKind::Class | TypeKind::Struct),
        }
    }

    /// Shell of this scope holding `members` as its only contents
    pub fn shape_copy(&self, members: Vec<MemberDecl>) -> MemberDecl {
        match self {
            Ancestor::Namespace(ns) => NamespaceDecl::new(ns.name.clone())
                .with_members(members)
                .into(),
            Ancestor::Type(ty) => TypeDecl::new(ty.kind, ty.identifier.clone())
                .with_modifiers(ty.modifiers.clone())
                .with_type_parameters(ty.type_parameters.clone())
                .with_members(members)
                .into(),
        }
    }
}

/// Fold `members` outward through `ancestors`, immediate parent first.
///
/// Skipped ancestors leave the member list as it is, so with no qualifying
/// ancestor the members come back unchanged.
pub fn wrap_with_ancestors<'a>(
    members: Vec<MemberDecl>,
    ancestors: impl IntoIterator<Item = Ancestor<'a>>,
) -> Vec<MemberDecl> {
    ancestors.into_iter().fold(members, |inner, ancestor| {
        if ancestor.is_wrapped() {
            vec![ancestor.shape_copy(inner)]
        } else {
            inner
        }
    })
}
