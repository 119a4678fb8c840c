//! Template-driven declaration synthesis for C#-family source
//!
//! Provides a declaration-level syntax model with a parser and renderer,
//! builders for declaration fragments, a template store with placeholder
//! merging, and re-nesting of generated members inside their enclosing scopes.

pub mod ancestors;
pub mod builder;
pub mod error;
pub mod syntax;
pub mod templates;

// Re-export public API
pub use ancestors::{wrap_with_ancestors, Ancestor};
pub use error::{CodegenError, Result};
pub use syntax::{
    parse_compilation_unit, parse_name, CompilationUnit, MemberDecl, NamespaceDecl, TypeDecl,
    TypeKind,
};
pub use templates::{
    from_template, merge, DirectoryTemplates, EmbeddedTemplates, LayeredTemplates,
    TemplateData, TemplateSource, TemplateStore,
};
