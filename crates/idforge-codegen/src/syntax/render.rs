//! Source rendering
//!
//! Inline nodes (names, attributes, accessors) render on one line. Declarations
//! render as indented blocks, four spaces per level, with one attribute list
//! per line and a blank line between members.

use std::fmt::{self, Display, Write};

use super::{
    Accessor, AccessorBody, Attribute, AttributeArgument, AttributeExpr, AttributeList,
    CompilationUnit, FieldDecl, MemberDecl, Modifier, Name, NamespaceDecl, PropertyDecl,
    SourceText, TypeDecl, TypeRef, UsingDirective, VerbatimMember,
};

const INDENT: &str = "    ";

/// Write `items` with `separator` before every item after the first
pub fn write_separated<W, T, I>(out: &mut W, items: I, separator: &str) -> fmt::Result
where
    W: Write,
    T: Display,
    I: IntoIterator<Item = T>,
{
    for (index, item) in items.into_iter().enumerate() {
        if index > 0 {
            out.write_str(separator)?;
        }
        write!(out, "{}", item)?;
    }
    Ok(())
}

fn escape_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c => out.push(c),
        }
    }
    out
}

fn modifier_prefix(modifiers: &[Modifier]) -> String {
    let mut out = String::new();
    for modifier in modifiers {
        out.push_str(modifier.as_str());
        out.push(' ');
    }
    out
}

impl Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Name::Identifier(name) => f.write_str(name),
            Name::AliasQualified { alias, name } => write!(f, "{}::{}", alias, name),
            Name::Qualified { left, right } => write!(f, "{}.{}", left, right),
        }
    }
}

impl Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for SourceText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for UsingDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "using {};", self.0)
    }
}

impl Display for AttributeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeExpr::StringLiteral(value) => write!(f, "\"{}\"", escape_string(value)),
            AttributeExpr::TypeOf(ty) => write!(f, "typeof({})", ty),
            AttributeExpr::Raw(text) => f.write_str(text),
        }
    }
}

impl Display for AttributeArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "{} = ", name)?;
        }
        write!(f, "{}", self.expr)
    }
}

impl Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.arguments.is_empty() {
            f.write_char('(')?;
            write_separated(f, &self.arguments, ", ")?;
            f.write_char(')')?;
        }
        Ok(())
    }
}

impl Display for AttributeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('[')?;
        if let Some(target) = &self.target {
            write!(f, "{}: ", target)?;
        }
        write_separated(f, &self.attributes, ", ")?;
        f.write_char(']')
    }
}

impl Display for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", modifier_prefix(&self.modifiers), self.kind.as_str())?;
        match &self.body {
            AccessorBody::Auto => f.write_char(';'),
            AccessorBody::Block(body) => write!(f, "\n{}", body),
            AccessorBody::Expression(body) => write!(f, " => {};", body),
        }
    }
}

/// Indentation-aware line writer
struct Printer {
    out: String,
    indent: usize,
}

impl Printer {
    fn new() -> Self {
        Self {
            out: String::new(),
            indent: 0,
        }
    }

    /// Write a fragment; every line of it gets the current indentation
    fn line(&mut self, text: &str) {
        for line in text.lines() {
            if !line.is_empty() {
                for _ in 0..self.indent {
                    self.out.push_str(INDENT);
                }
                self.out.push_str(line);
            }
            self.out.push('\n');
        }
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn open(&mut self) {
        self.line("{");
        self.indent += 1;
    }

    fn close(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.line("}");
    }

    fn attribute_lists(&mut self, lists: &[AttributeList]) {
        for list in lists {
            self.line(&list.to_string());
        }
    }

    fn members(&mut self, members: &[MemberDecl]) {
        for (index, member) in members.iter().enumerate() {
            if index > 0 {
                self.blank();
            }
            self.member(member);
        }
    }

    fn member(&mut self, member: &MemberDecl) {
        match member {
            MemberDecl::Namespace(ns) => self.namespace(ns),
            MemberDecl::Type(ty) => self.type_decl(ty),
            MemberDecl::Field(field) => self.field(field),
            MemberDecl::Property(property) => self.property(property),
            MemberDecl::Verbatim(verbatim) => self.verbatim(verbatim),
        }
    }

    fn namespace(&mut self, ns: &NamespaceDecl) {
        self.line(&format!("namespace {}", ns.name));
        self.open();
        for using in &ns.usings {
            self.line(&using.to_string());
        }
        if !ns.usings.is_empty() && !ns.members.is_empty() {
            self.blank();
        }
        self.members(&ns.members);
        self.close();
    }

    fn type_decl(&mut self, ty: &TypeDecl) {
        self.attribute_lists(&ty.attribute_lists);

        let mut header = format!(
            "{}{} {}",
            modifier_prefix(&ty.modifiers),
            ty.kind,
            ty.identifier
        );
        if !ty.type_parameters.is_empty() {
            header.push('<');
            let _ = write_separated(&mut header, &ty.type_parameters, ", ");
            header.push('>');
        }
        if !ty.base_list.is_empty() {
            header.push_str(" : ");
            let _ = write_separated(&mut header, &ty.base_list, ", ");
        }
        for constraint in &ty.constraints {
            header.push(' ');
            header.push_str(constraint);
        }

        self.line(&header);
        self.open();
        self.members(&ty.members);
        self.close();
    }

    fn field(&mut self, field: &FieldDecl) {
        self.attribute_lists(&field.attribute_lists);
        let initializer = field
            .initializer
            .as_ref()
            .map(|init| format!(" = {}", init))
            .unwrap_or_default();
        self.line(&format!(
            "{}{} {}{};",
            modifier_prefix(&field.modifiers),
            field.ty,
            field.name,
            initializer
        ));
    }

    fn property(&mut self, property: &PropertyDecl) {
        self.attribute_lists(&property.attribute_lists);
        let head = format!(
            "{}{} {}",
            modifier_prefix(&property.modifiers),
            property.ty,
            property.name
        );
        let initializer = property
            .initializer
            .as_ref()
            .map(|init| format!(" = {};", init))
            .unwrap_or_default();

        let inline = property
            .accessors
            .iter()
            .all(|a| matches!(a.body, AccessorBody::Auto));

        if inline {
            let mut text = format!("{} {{ ", head);
            let _ = write_separated(&mut text, &property.accessors, " ");
            if !property.accessors.is_empty() {
                text.push(' ');
            }
            text.push('}');
            text.push_str(&initializer);
            self.line(&text);
            return;
        }

        self.line(&head);
        self.open();
        for accessor in &property.accessors {
            self.line(&accessor.to_string());
        }
        self.indent = self.indent.saturating_sub(1);
        self.line(&format!("}}{}", initializer));
    }

    fn verbatim(&mut self, member: &VerbatimMember) {
        self.attribute_lists(&member.attribute_lists);
        self.line(&format!("{}{}", modifier_prefix(&member.modifiers), member.text));
    }

    fn finish(self) -> String {
        self.out.trim_end().to_string()
    }
}

macro_rules! display_via_printer {
    ($ty:ty, $method:ident) => {
        impl Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let mut printer = Printer::new();
                printer.$method(self);
                f.write_str(&printer.finish())
            }
        }
    };
}

display_via_printer!(TypeDecl, type_decl);
display_via_printer!(NamespaceDecl, namespace);
display_via_printer!(FieldDecl, field);
display_via_printer!(PropertyDecl, property);
display_via_printer!(VerbatimMember, verbatim);
display_via_printer!(MemberDecl, member);

impl Display for CompilationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut printer = Printer::new();
        let sections = [
            !self.usings.is_empty(),
            !self.attribute_lists.is_empty(),
            !self.members.is_empty(),
        ];
        for using in &self.usings {
            printer.line(&using.to_string());
        }
        if sections[0] && sections[1..].contains(&true) {
            printer.blank();
        }
        printer.attribute_lists(&self.attribute_lists);
        if sections[1] && sections[2] {
            printer.blank();
        }
        printer.members(&self.members);
        f.write_str(&printer.finish())
    }
}
