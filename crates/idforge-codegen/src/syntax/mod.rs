//! Declaration-level syntax model for C#-family source
//!
//! Only declaration structure is modelled: namespaces, types, fields,
//! properties and attributes. Method bodies, operators, constructors and the
//! like are carried as source text so they survive a parse/render cycle.

mod lexer;
mod parser;
mod render;
mod span;

use std::fmt;

pub use parser::{parse_compilation_unit, parse_name};
pub use render::write_separated;
pub use span::Position;

/// A simple, qualified or alias-qualified name (`String`, `System.String`, `global::System`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Name {
    /// A single identifier
    Identifier(String),
    /// `alias::name`
    AliasQualified { alias: String, name: String },
    /// `left.right`
    Qualified { left: Box<Name>, right: String },
}

impl Name {
    /// Create a simple identifier name
    pub fn identifier(name: impl Into<String>) -> Self {
        Name::Identifier(name.into())
    }

    /// The right-most identifier
    pub fn simple_name(&self) -> &str {
        match self {
            Name::Identifier(name) => name,
            Name::AliasQualified { name, .. } => name,
            Name::Qualified { right, .. } => right,
        }
    }

    /// The dotted form with any `alias::` prefix removed
    pub fn without_alias(&self) -> String {
        match self {
            Name::Identifier(name) => name.clone(),
            Name::AliasQualified { name, .. } => name.clone(),
            Name::Qualified { left, right } => format!("{}.{}", left.without_alias(), right),
        }
    }

    /// Match against a dotted attribute name, tolerating the `Attribute` suffix
    pub fn matches_attribute(&self, qualified: &str) -> bool {
        let text = self.without_alias();
        text == qualified || text.strip_suffix("Attribute") == Some(qualified)
    }
}

/// Declaration modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Public,
    Private,
    Protected,
    Internal,
    Static,
    Readonly,
    Partial,
    Sealed,
    Abstract,
    Virtual,
    Override,
    Const,
    New,
    Extern,
    Unsafe,
    Volatile,
    Async,
    Ref,
    Event,
    Required,
}

impl Modifier {
    /// Keyword text
    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Private => "private",
            Modifier::Protected => "protected",
            Modifier::Internal => "internal",
            Modifier::Static => "static",
            Modifier::Readonly => "readonly",
            Modifier::Partial => "partial",
            Modifier::Sealed => "sealed",
            Modifier::Abstract => "abstract",
            Modifier::Virtual => "virtual",
            Modifier::Override => "override",
            Modifier::Const => "const",
            Modifier::New => "new",
            Modifier::Extern => "extern",
            Modifier::Unsafe => "unsafe",
            Modifier::Volatile => "volatile",
            Modifier::Async => "async",
            Modifier::Ref => "ref",
            Modifier::Event => "event",
            Modifier::Required => "required",
        }
    }

    /// Parse a modifier keyword
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let modifier = match keyword {
            "public" => Modifier::Public,
            "private" => Modifier::Private,
            "protected" => Modifier::Protected,
            "internal" => Modifier::Internal,
            "static" => Modifier::Static,
            "readonly" => Modifier::Readonly,
            "partial" => Modifier::Partial,
            "sealed" => Modifier::Sealed,
            "abstract" => Modifier::Abstract,
            "virtual" => Modifier::Virtual,
            "override" => Modifier::Override,
            "const" => Modifier::Const,
            "new" => Modifier::New,
            "extern" => Modifier::Extern,
            "unsafe" => Modifier::Unsafe,
            "volatile" => Modifier::Volatile,
            "async" => Modifier::Async,
            "ref" => Modifier::Ref,
            "event" => Modifier::Event,
            "required" => Modifier::Required,
            _ => return None,
        };
        Some(modifier)
    }
}

/// A type reference, kept as its source text (`int`, `System.Collections.Generic.List<T>`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef(String);

impl TypeRef {
    /// Create a type reference from its text
    pub fn new(text: impl Into<String>) -> Self {
        TypeRef(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<Name> for TypeRef {
    fn from(name: Name) -> Self {
        TypeRef(name.to_string())
    }
}

impl From<&str> for TypeRef {
    fn from(text: &str) -> Self {
        TypeRef(text.to_string())
    }
}

/// Source text with its original indentation removed, re-indented on render
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceText(String);

impl SourceText {
    pub fn new(text: impl Into<String>) -> Self {
        SourceText(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Expression passed to an attribute
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeExpr {
    /// A string literal; holds the unescaped value
    StringLiteral(String),
    /// `typeof(T)`
    TypeOf(TypeRef),
    /// Any other expression, as source text
    Raw(String),
}

/// One attribute argument, optionally named (`Name = value`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeArgument {
    pub name: Option<String>,
    pub expr: AttributeExpr,
}

/// `Name(arguments)`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attribute {
    pub name: Name,
    pub arguments: Vec<AttributeArgument>,
}

impl Attribute {
    /// Look up a named argument
    pub fn named_argument(&self, name: &str) -> Option<&AttributeExpr> {
        self.arguments
            .iter()
            .find(|a| a.name.as_deref() == Some(name))
            .map(|a| &a.expr)
    }

    /// Positional (unnamed) arguments in order
    pub fn positional_arguments(&self) -> impl Iterator<Item = &AttributeExpr> {
        self.arguments
            .iter()
            .filter(|a| a.name.is_none())
            .map(|a| &a.expr)
    }
}

/// `[target: A, B(...)]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeList {
    pub target: Option<String>,
    pub attributes: Vec<Attribute>,
}

/// Accessor keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorKind {
    Get,
    Set,
    Init,
}

impl AccessorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessorKind::Get => "get",
            AccessorKind::Set => "set",
            AccessorKind::Init => "init",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AccessorBody {
    /// `get;`
    Auto,
    /// `get { ... }`
    Block(SourceText),
    /// `get => ...;`
    Expression(SourceText),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Accessor {
    pub kind: AccessorKind,
    pub modifiers: Vec<Modifier>,
    pub body: AccessorBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDecl {
    pub attribute_lists: Vec<AttributeList>,
    pub modifiers: Vec<Modifier>,
    pub ty: TypeRef,
    pub name: String,
    pub initializer: Option<SourceText>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyDecl {
    pub attribute_lists: Vec<AttributeList>,
    pub modifiers: Vec<Modifier>,
    pub ty: TypeRef,
    pub name: String,
    pub accessors: Vec<Accessor>,
    pub initializer: Option<SourceText>,
}

impl PropertyDecl {
    pub fn accessor(&self, kind: AccessorKind) -> Option<&Accessor> {
        self.accessors.iter().find(|a| a.kind == kind)
    }
}

/// Members kept as source text: methods, constructors, operators, indexers, enums, ...
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VerbatimMember {
    pub attribute_lists: Vec<AttributeList>,
    pub modifiers: Vec<Modifier>,
    pub text: SourceText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Struct => "struct",
            TypeKind::Interface => "interface",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A class, struct or interface declaration
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDecl {
    pub kind: TypeKind,
    pub attribute_lists: Vec<AttributeList>,
    pub modifiers: Vec<Modifier>,
    pub identifier: String,
    pub type_parameters: Vec<String>,
    pub base_list: Vec<TypeRef>,
    pub constraints: Vec<String>,
    pub members: Vec<MemberDecl>,
}

impl TypeDecl {
    /// An empty declaration of the given kind
    pub fn new(kind: TypeKind, identifier: impl Into<String>) -> Self {
        Self {
            kind,
            attribute_lists: Vec::new(),
            modifiers: Vec::new(),
            identifier: identifier.into(),
            type_parameters: Vec::new(),
            base_list: Vec::new(),
            constraints: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: Vec<Modifier>) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_type_parameters(mut self, type_parameters: Vec<String>) -> Self {
        self.type_parameters = type_parameters;
        self
    }

    pub fn with_attribute_lists(mut self, attribute_lists: Vec<AttributeList>) -> Self {
        self.attribute_lists = attribute_lists;
        self
    }

    pub fn with_members(mut self, members: Vec<MemberDecl>) -> Self {
        self.members = members;
        self
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    /// All attributes across every attribute list, in order
    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attribute_lists.iter().flat_map(|l| l.attributes.iter())
    }

    pub fn find_attribute(&self, qualified: &str) -> Option<&Attribute> {
        self.attributes().find(|a| a.name.matches_attribute(qualified))
    }

    pub fn field(&self, name: &str) -> Option<&FieldDecl> {
        self.members.iter().find_map(|m| match m {
            MemberDecl::Field(field) if field.name == name => Some(field),
            _ => None,
        })
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDecl> {
        self.members.iter().find_map(|m| match m {
            MemberDecl::Property(property) if property.name == name => Some(property),
            _ => None,
        })
    }

    pub fn nested_type(&self, identifier: &str) -> Option<&TypeDecl> {
        self.members.iter().find_map(|m| match m {
            MemberDecl::Type(ty) if ty.identifier == identifier => Some(ty),
            _ => None,
        })
    }
}

/// `using X;` kept as the text between `using` and `;`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UsingDirective(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespaceDecl {
    pub name: Name,
    pub usings: Vec<UsingDirective>,
    pub members: Vec<MemberDecl>,
}

impl NamespaceDecl {
    pub fn new(name: Name) -> Self {
        Self {
            name,
            usings: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn with_members(mut self, members: Vec<MemberDecl>) -> Self {
        self.members = members;
        self
    }
}

/// Any declaration that can appear in a namespace or type body
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MemberDecl {
    Namespace(NamespaceDecl),
    Type(TypeDecl),
    Field(FieldDecl),
    Property(PropertyDecl),
    Verbatim(VerbatimMember),
}

impl MemberDecl {
    /// The declared identifier, when the member has a single one
    pub fn identifier(&self) -> Option<&str> {
        match self {
            MemberDecl::Namespace(_) | MemberDecl::Verbatim(_) => None,
            MemberDecl::Type(ty) => Some(&ty.identifier),
            MemberDecl::Field(field) => Some(&field.name),
            MemberDecl::Property(property) => Some(&property.name),
        }
    }

    pub fn as_type(&self) -> Option<&TypeDecl> {
        match self {
            MemberDecl::Type(ty) => Some(ty),
            _ => None,
        }
    }

    pub fn as_namespace(&self) -> Option<&NamespaceDecl> {
        match self {
            MemberDecl::Namespace(ns) => Some(ns),
            _ => None,
        }
    }
}

impl From<TypeDecl> for MemberDecl {
    fn from(ty: TypeDecl) -> Self {
        MemberDecl::Type(ty)
    }
}

impl From<NamespaceDecl> for MemberDecl {
    fn from(ns: NamespaceDecl) -> Self {
        MemberDecl::Namespace(ns)
    }
}

impl From<FieldDecl> for MemberDecl {
    fn from(field: FieldDecl) -> Self {
        MemberDecl::Field(field)
    }
}

impl From<PropertyDecl> for MemberDecl {
    fn from(property: PropertyDecl) -> Self {
        MemberDecl::Property(property)
    }
}

/// A parsed source file
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CompilationUnit {
    pub usings: Vec<UsingDirective>,
    /// `[assembly: ...]` and `[module: ...]` lists
    pub attribute_lists: Vec<AttributeList>,
    pub members: Vec<MemberDecl>,
}

impl CompilationUnit {
    /// The first top-level type declaration of the given kind
    pub fn first_type_of_kind(&self, kind: TypeKind) -> Option<&TypeDecl> {
        self.members.iter().find_map(|m| match m {
            MemberDecl::Type(ty) if ty.kind == kind => Some(ty),
            _ => None,
        })
    }

    /// Owned variant of [`CompilationUnit::first_type_of_kind`]
    pub fn into_first_type_of_kind(self, kind: TypeKind) -> Option<TypeDecl> {
        self.members.into_iter().find_map(|m| match m {
            MemberDecl::Type(ty) if ty.kind == kind => Some(ty),
            _ => None,
        })
    }
}
