//! Recursive-descent declaration parser
//!
//! Understands namespaces, type declarations, attributes, fields and
//! auto/block properties. Everything else is captured as a [`VerbatimMember`]
//! after checking that its brackets balance.

use super::lexer::{tokenize, Token, TokenKind};
use super::{
    Accessor, AccessorBody, AccessorKind, Attribute, AttributeArgument, AttributeExpr,
    AttributeList, CompilationUnit, FieldDecl, MemberDecl, Modifier, Name, NamespaceDecl,
    Position, PropertyDecl, SourceText, TypeDecl, TypeKind, TypeRef, UsingDirective,
    VerbatimMember,
};
use crate::error::{CodegenError, Result};

/// Keywords that disqualify a member head from being a `Type name` declarator.
const NON_DECLARATOR_KEYWORDS: &[&str] = &[
    "enum", "delegate", "record", "operator", "this", "implicit", "explicit",
];

/// Parse source text into a compilation unit.
///
/// `[assembly: ...]` and `[module: ...]` lists ahead of the first namespace or
/// type are kept on the unit. Of each `#if`/`#elif`/`#else` group only the
/// first branch is read; symbols are not evaluated.
pub fn parse_compilation_unit(source: &str) -> Result<CompilationUnit> {
    let tokens = tokenize(source)?;
    Parser::new(source, tokens).compilation_unit()
}

/// Parse a (possibly qualified) name such as `global::System.IO.Path`
pub fn parse_name(text: &str) -> Result<Name> {
    let tokens = tokenize(text)?;
    let mut parser = Parser::new(text, tokens);
    let name = parser.name()?;
    if parser.peek().is_some() {
        return Err(parser.error("unexpected trailing input after name"));
    }
    Ok(name)
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token<'a>>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str, tokens: Vec<Token<'a>>) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
        }
    }

    // ---- token helpers -------------------------------------------------

    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, ahead: usize) -> Option<&Token<'a>> {
        self.tokens.get(self.pos + ahead)
    }

    fn next(&mut self) -> Option<Token<'a>> {
        let token = self.tokens.get(self.pos).copied();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn at_punct(&self, text: &str) -> bool {
        self.peek().is_some_and(|t| t.is_punct(text))
    }

    fn at_ident(&self, text: &str) -> bool {
        self.peek().is_some_and(|t| t.is_ident(text))
    }

    fn eat_punct(&mut self, text: &str) -> bool {
        if self.at_punct(text) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_punct(&mut self, text: &str) -> Result<Token<'a>> {
        if self.at_punct(text) {
            if let Some(token) = self.next() {
                return Ok(token);
            }
        }
        Err(self.error(format!("expected '{}'", text)))
    }

    fn expect_ident(&mut self) -> Result<Token<'a>> {
        match self.peek() {
            Some(token) if token.kind == TokenKind::Ident => {
                let token = *token;
                self.pos += 1;
                Ok(token)
            }
            _ => Err(self.error("expected identifier")),
        }
    }

    fn current_position(&self) -> Position {
        self.peek()
            .or_else(|| self.tokens.last())
            .map(|t| t.position)
            .unwrap_or_default()
    }

    fn error(&self, message: impl Into<String>) -> CodegenError {
        let message = message.into();
        match self.peek() {
            Some(token) => CodegenError::syntax(
                token.position,
                format!("{} (found '{}')", message, token.text),
            ),
            None => CodegenError::syntax(
                self.current_position(),
                format!("{} (found end of input)", message),
            ),
        }
    }

    /// Source text covered by tokens `from..to`
    fn span_text(&self, from: usize, to: usize) -> &'a str {
        if from >= to {
            return "";
        }
        &self.source[self.tokens[from].start..self.tokens[to - 1].end]
    }

    /// Leading whitespace width of the line containing `offset`
    fn baseline(&self, offset: usize) -> usize {
        let line_start = self.source[..offset].rfind('\n').map_or(0, |i| i + 1);
        self.source[line_start..]
            .chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .count()
    }

    fn source_text(&self, from: usize, to: usize, baseline: usize) -> SourceText {
        SourceText::new(dedent(self.span_text(from, to), baseline))
    }

    /// Skip a balanced `(...)`, `[...]` or `{...}` group starting at the current token
    fn skip_group(&mut self) -> Result<()> {
        let open = self
            .peek()
            .copied()
            .ok_or_else(|| self.error("expected a bracketed group"))?;
        let mut depth = 0usize;

        while let Some(token) = self.next() {
            if token.kind != TokenKind::Punct {
                continue;
            }
            match token.text {
                "(" | "[" | "{" => depth += 1,
                ")" | "]" | "}" => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }

        Err(CodegenError::syntax(
            open.position,
            format!("unbalanced '{}'", open.text),
        ))
    }

    /// Skip a generic argument list. Rewinds and returns false when the `<`
    /// turns out to be an operator.
    fn skip_angles(&mut self) -> Result<bool> {
        let start = self.pos;
        let mut depth = 0usize;

        while let Some(token) = self.peek().copied() {
            if token.kind == TokenKind::Punct {
                match token.text {
                    "<" => depth += 1,
                    ">" => {
                        depth = depth.saturating_sub(1);
                        if depth == 0 {
                            self.pos += 1;
                            return Ok(true);
                        }
                    }
                    "(" | "[" if depth > 0 => {
                        self.skip_group()?;
                        continue;
                    }
                    "(" | ";" | "{" | "=" | "=>" | ")" => break,
                    _ => {}
                }
            }
            self.pos += 1;
        }

        self.pos = start;
        Ok(false)
    }

    /// Consume tokens until `stop` matches at bracket depth zero. Returns the
    /// consumed token range. `angles` also treats `<`/`>` as brackets.
    fn scan_until(
        &mut self,
        angles: bool,
        what: &str,
        stop: impl Fn(&Token<'a>) -> bool,
    ) -> Result<(usize, usize)> {
        let start = self.pos;
        let mut depth = 0usize;

        loop {
            let Some(token) = self.peek().copied() else {
                return Err(self.error(format!("unexpected end of input in {}", what)));
            };
            if depth == 0 && stop(&token) {
                break;
            }
            if token.kind == TokenKind::Punct {
                match token.text {
                    "(" | "[" | "{" => depth += 1,
                    "<" if angles => depth += 1,
                    ">" if angles => depth = depth.saturating_sub(1),
                    ")" | "]" | "}" => {
                        if depth == 0 {
                            return Err(self.error(format!("unbalanced bracket in {}", what)));
                        }
                        depth -= 1;
                    }
                    _ => {}
                }
            }
            self.pos += 1;
        }

        if self.pos == start {
            return Err(self.error(format!("expected {}", what)));
        }
        Ok((start, self.pos))
    }

    // ---- declarations --------------------------------------------------

    fn compilation_unit(mut self) -> Result<CompilationUnit> {
        let mut unit = CompilationUnit::default();

        while self.peek().is_some() {
            if self.at_using_directive() {
                unit.usings.push(self.using_directive()?);
            } else if self.at_ident("extern") && self.peek_at(1).is_some_and(|t| t.is_ident("alias"))
            {
                self.scan_until(false, "extern alias", |t| t.is_punct(";"))?;
                self.expect_punct(";")?;
            } else if self.at_global_attribute_list() {
                if !unit.members.is_empty() {
                    return Err(self.error(
                        "global attributes must precede namespace and type declarations",
                    ));
                }
                unit.attribute_lists.push(self.attribute_list()?);
            } else {
                unit.members.push(self.member()?);
            }
        }

        Ok(unit)
    }

    /// `[assembly: ...]` or `[module: ...]`
    fn at_global_attribute_list(&self) -> bool {
        self.at_punct("[")
            && self
                .peek_at(1)
                .is_some_and(|t| t.is_ident("assembly") || t.is_ident("module"))
            && self.peek_at(2).is_some_and(|t| t.is_punct(":"))
    }

    fn at_using_directive(&self) -> bool {
        let offset = usize::from(self.at_ident("global"));
        self.peek_at(offset).is_some_and(|t| t.is_ident("using"))
            && !self.peek_at(offset + 1).is_some_and(|t| t.is_punct("("))
    }

    fn using_directive(&mut self) -> Result<UsingDirective> {
        if self.at_ident("global") {
            self.pos += 1;
        }
        self.next();
        let (from, to) = self.scan_until(false, "using directive", |t| t.is_punct(";"))?;
        self.expect_punct(";")?;
        Ok(UsingDirective(self.span_text(from, to).to_string()))
    }

    fn name(&mut self) -> Result<Name> {
        let first = self.expect_ident()?.text.to_string();
        let mut name = if self.eat_punct("::") {
            let second = self.expect_ident()?.text.to_string();
            Name::AliasQualified {
                alias: first,
                name: second,
            }
        } else {
            Name::Identifier(first)
        };

        while self.at_punct(".")
            && self
                .peek_at(1)
                .is_some_and(|t| t.kind == TokenKind::Ident)
        {
            self.pos += 1;
            let right = self.expect_ident()?.text.to_string();
            name = Name::Qualified {
                left: Box::new(name),
                right,
            };
        }

        Ok(name)
    }

    fn member(&mut self) -> Result<MemberDecl> {
        let first = self
            .peek()
            .copied()
            .ok_or_else(|| self.error("expected a member declaration"))?;
        let baseline = self.baseline(first.start);

        if self.at_global_attribute_list() {
            return Err(self.error("global attributes are only allowed at the top of a file"));
        }
        let attribute_lists = self.attribute_lists()?;
        let modifiers = self.modifiers();

        let token = self
            .peek()
            .copied()
            .ok_or_else(|| self.error("expected a member declaration"))?;

        if token.is_ident("namespace") {
            if !attribute_lists.is_empty() || !modifiers.is_empty() {
                return Err(self.error("namespace declarations cannot carry attributes or modifiers"));
            }
            return self.namespace_decl().map(MemberDecl::Namespace);
        }

        let kind = match token.text {
            "class" if token.kind == TokenKind::Ident => Some(TypeKind::Class),
            "struct" if token.kind == TokenKind::Ident => Some(TypeKind::Struct),
            "interface" if token.kind == TokenKind::Ident => Some(TypeKind::Interface),
            _ => None,
        };
        if let Some(kind) = kind {
            return self
                .type_decl(kind, attribute_lists, modifiers)
                .map(MemberDecl::Type);
        }

        self.plain_member(attribute_lists, modifiers, baseline)
    }

    fn namespace_decl(&mut self) -> Result<NamespaceDecl> {
        self.next();
        let name = self.name()?;
        let mut namespace = NamespaceDecl::new(name);

        let closing = if self.eat_punct(";") {
            false
        } else {
            self.expect_punct("{")?;
            true
        };

        loop {
            if closing && self.eat_punct("}") {
                break;
            }
            if self.peek().is_none() {
                if closing {
                    return Err(self.error("expected '}' to close namespace"));
                }
                break;
            }
            if self.at_using_directive() {
                namespace.usings.push(self.using_directive()?);
            } else {
                namespace.members.push(self.member()?);
            }
        }
        if closing {
            self.eat_punct(";");
        }

        Ok(namespace)
    }

    fn type_decl(
        &mut self,
        kind: TypeKind,
        attribute_lists: Vec<AttributeList>,
        modifiers: Vec<Modifier>,
    ) -> Result<TypeDecl> {
        self.next();
        let identifier = self.expect_ident()?.text.to_string();

        let mut decl = TypeDecl::new(kind, identifier)
            .with_attribute_lists(attribute_lists)
            .with_modifiers(modifiers);

        if self.eat_punct("<") {
            loop {
                let (from, to) = self.scan_until(true, "type parameter", |t| {
                    t.is_punct(",") || t.is_punct(">")
                })?;
                decl.type_parameters.push(self.span_text(from, to).to_string());
                if !self.eat_punct(",") {
                    self.expect_punct(">")?;
                    break;
                }
            }
        }

        if self.eat_punct(":") {
            loop {
                let (from, to) = self.scan_until(true, "base type", |t| {
                    t.is_punct(",") || t.is_punct("{") || t.is_ident("where")
                })?;
                decl.base_list.push(TypeRef::new(self.span_text(from, to)));
                if !self.eat_punct(",") {
                    break;
                }
            }
        }

        while self.at_ident("where") {
            let from = self.pos;
            self.pos += 1;
            let (_, to) = self.scan_until(true, "constraint clause", |t| {
                t.is_ident("where") || t.is_punct("{")
            })?;
            decl.constraints.push(self.span_text(from, to).to_string());
        }

        self.expect_punct("{")?;
        while !self.eat_punct("}") {
            if self.peek().is_none() {
                return Err(self.error(format!("expected '}}' to close {}", decl.identifier)));
            }
            decl.members.push(self.member()?);
        }
        self.eat_punct(";");

        Ok(decl)
    }

    fn attribute_lists(&mut self) -> Result<Vec<AttributeList>> {
        let mut lists = Vec::new();
        while self.at_punct("[") {
            lists.push(self.attribute_list()?);
        }
        Ok(lists)
    }

    fn attribute_list(&mut self) -> Result<AttributeList> {
        self.expect_punct("[")?;

        let target = match (self.peek(), self.peek_at(1)) {
            (Some(name), Some(colon)) if name.kind == TokenKind::Ident && colon.is_punct(":") => {
                let target = name.text.to_string();
                self.pos += 2;
                Some(target)
            }
            _ => None,
        };

        let mut attributes = Vec::new();
        loop {
            attributes.push(self.attribute()?);
            if self.eat_punct(",") {
                if self.at_punct("]") {
                    break;
                }
                continue;
            }
            break;
        }
        self.expect_punct("]")?;

        Ok(AttributeList { target, attributes })
    }

    fn attribute(&mut self) -> Result<Attribute> {
        let name = self.name()?;
        let mut arguments = Vec::new();

        if self.eat_punct("(") {
            if !self.eat_punct(")") {
                loop {
                    arguments.push(self.attribute_argument()?);
                    if !self.eat_punct(",") {
                        self.expect_punct(")")?;
                        break;
                    }
                }
            }
        }

        Ok(Attribute { name, arguments })
    }

    fn attribute_argument(&mut self) -> Result<AttributeArgument> {
        let name = match (self.peek(), self.peek_at(1)) {
            (Some(name), Some(equals)) if name.kind == TokenKind::Ident && equals.is_punct("=") => {
                let name = name.text.to_string();
                self.pos += 2;
                Some(name)
            }
            _ => None,
        };

        let (from, to) = self.scan_until(false, "attribute argument", |t| {
            t.is_punct(",") || t.is_punct(")")
        })?;

        Ok(AttributeArgument {
            name,
            expr: self.attribute_expr(from, to),
        })
    }

    fn attribute_expr(&self, from: usize, to: usize) -> AttributeExpr {
        let tokens = &self.tokens[from..to];

        if let [literal] = tokens {
            if literal.kind == TokenKind::Str && literal.text.starts_with('"') {
                if let Some(value) = unescape(&literal.text[1..literal.text.len() - 1]) {
                    return AttributeExpr::StringLiteral(value);
                }
            }
        }

        if tokens.len() >= 4
            && tokens[0].is_ident("typeof")
            && tokens[1].is_punct("(")
            && tokens[tokens.len() - 1].is_punct(")")
        {
            return AttributeExpr::TypeOf(TypeRef::new(self.span_text(from + 2, to - 1)));
        }

        AttributeExpr::Raw(self.span_text(from, to).to_string())
    }

    fn modifiers(&mut self) -> Vec<Modifier> {
        let mut modifiers = Vec::new();
        while let Some(token) = self.peek() {
            if token.kind != TokenKind::Ident {
                break;
            }
            match Modifier::from_keyword(token.text) {
                Some(modifier) => {
                    modifiers.push(modifier);
                    self.pos += 1;
                }
                None => break,
            }
        }
        modifiers
    }

    fn plain_member(
        &mut self,
        attribute_lists: Vec<AttributeList>,
        modifiers: Vec<Modifier>,
        baseline: usize,
    ) -> Result<MemberDecl> {
        let head_start = self.pos;
        let mut top_level_comma = false;

        let terminator = loop {
            let Some(token) = self.peek().copied() else {
                return Err(self.error("unexpected end of input in member declaration"));
            };
            if token.kind == TokenKind::Punct {
                match token.text {
                    "(" if self.pos == head_start => {
                        self.skip_group()?;
                        continue;
                    }
                    "(" | "{" | "=" | ";" | "=>" => break token.text,
                    "[" => {
                        self.skip_group()?;
                        continue;
                    }
                    "<" => {
                        if self.skip_angles()? {
                            continue;
                        }
                    }
                    "," => top_level_comma = true,
                    ")" | "]" | "}" => {
                        return Err(self.error("unexpected closing bracket in member declaration"))
                    }
                    _ => {}
                }
            }
            self.pos += 1;
        };

        let head_end = self.pos;
        if head_end == head_start {
            return Err(self.error("expected a member declaration"));
        }

        let head = &self.tokens[head_start..head_end];
        let declarator = head.len() >= 2
            && head[head.len() - 1].kind == TokenKind::Ident
            && !top_level_comma
            && !head
                .iter()
                .any(|t| t.kind == TokenKind::Ident && NON_DECLARATOR_KEYWORDS.contains(&t.text));

        if declarator {
            let ty = TypeRef::new(self.span_text(head_start, head_end - 1));
            let name = self.tokens[head_end - 1].text.to_string();

            match terminator {
                ";" | "=" => {
                    let initializer = if self.eat_punct("=") {
                        let (from, to) =
                            self.scan_until(false, "field initializer", |t| t.is_punct(";"))?;
                        Some(self.source_text(from, to, baseline))
                    } else {
                        None
                    };
                    self.expect_punct(";")?;
                    return Ok(MemberDecl::Field(FieldDecl {
                        attribute_lists,
                        modifiers,
                        ty,
                        name,
                        initializer,
                    }));
                }
                "{" => {
                    let checkpoint = self.pos;
                    if let Ok(accessors) = self.accessor_list() {
                        let initializer = if self.eat_punct("=") {
                            let (from, to) = self
                                .scan_until(false, "property initializer", |t| t.is_punct(";"))?;
                            self.expect_punct(";")?;
                            Some(self.source_text(from, to, baseline))
                        } else {
                            None
                        };
                        return Ok(MemberDecl::Property(PropertyDecl {
                            attribute_lists,
                            modifiers,
                            ty,
                            name,
                            accessors,
                            initializer,
                        }));
                    }
                    self.pos = checkpoint;
                }
                _ => {}
            }
        }

        self.skip_member_tail(terminator)?;

        Ok(MemberDecl::Verbatim(VerbatimMember {
            attribute_lists,
            modifiers,
            text: self.source_text(head_start, self.pos, baseline),
        }))
    }

    /// Advance past the end of a member whose head stopped at `terminator`
    fn skip_member_tail(&mut self, terminator: &str) -> Result<()> {
        if terminator == "{" {
            self.skip_group()?;
            if self.eat_punct("=") {
                self.scan_until(false, "initializer", |t| t.is_punct(";"))?;
                self.expect_punct(";")?;
            }
            return Ok(());
        }

        let block_ends_member = terminator == "(";
        loop {
            let Some(token) = self.peek().copied() else {
                return Err(self.error("unexpected end of input in member declaration"));
            };
            if token.kind == TokenKind::Punct {
                match token.text {
                    "{" if block_ends_member => {
                        self.skip_group()?;
                        return Ok(());
                    }
                    "(" | "[" | "{" => {
                        self.skip_group()?;
                        continue;
                    }
                    ";" => {
                        self.pos += 1;
                        return Ok(());
                    }
                    ")" | "]" | "}" => {
                        return Err(self.error("unexpected closing bracket in member declaration"))
                    }
                    _ => {}
                }
            }
            self.pos += 1;
        }
    }

    fn accessor_list(&mut self) -> Result<Vec<Accessor>> {
        self.expect_punct("{")?;
        let mut accessors = Vec::new();

        while !self.eat_punct("}") {
            let baseline = match self.peek() {
                Some(token) => self.baseline(token.start),
                None => return Err(self.error("expected '}' to close accessor list")),
            };
            let modifiers = self.modifiers();
            let keyword = self.expect_ident()?;
            let kind = match keyword.text {
                "get" => AccessorKind::Get,
                "set" => AccessorKind::Set,
                "init" => AccessorKind::Init,
                _ => return Err(self.error("expected accessor")),
            };

            let body = if self.eat_punct(";") {
                AccessorBody::Auto
            } else if self.at_punct("{") {
                let from = self.pos;
                self.skip_group()?;
                AccessorBody::Block(self.source_text(from, self.pos, baseline))
            } else if self.eat_punct("=>") {
                let (from, to) = self.scan_until(false, "accessor body", |t| t.is_punct(";"))?;
                self.expect_punct(";")?;
                AccessorBody::Expression(self.source_text(from, to, baseline))
            } else {
                return Err(self.error("expected accessor body"));
            };

            accessors.push(Accessor {
                kind,
                modifiers,
                body,
            });
        }

        Ok(accessors)
    }
}

/// Strip up to `baseline` leading whitespace characters from every line after the first
fn dedent(text: &str, baseline: usize) -> String {
    let mut lines = text.lines();
    let mut out = String::with_capacity(text.len());
    if let Some(first) = lines.next() {
        out.push_str(first.trim_end());
    }
    for line in lines {
        out.push('\n');
        let indent = line
            .chars()
            .take(baseline)
            .take_while(|c| *c == ' ' || *c == '\t')
            .count();
        out.push_str(line[indent..].trim_end());
    }
    out
}

/// Decode the escapes of a regular string literal body. Returns `None` for
/// escapes that would not survive re-encoding.
fn unescape(body: &str) -> Option<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            '"' => out.push('"'),
            '\'' => out.push('\''),
            '\\' => out.push('\\'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            '0' => out.push('\0'),
            _ => return None,
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_type(source: &str) -> TypeDecl {
        let unit = parse_compilation_unit(source).unwrap();
        match unit.members.into_iter().next() {
            Some(MemberDecl::Type(ty)) => ty,
            other => panic!("expected a type, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_name_forms() {
        assert_eq!(parse_name("String").unwrap(), Name::identifier("String"));
        assert_eq!(
            parse_name("global::System.IO").unwrap(),
            Name::Qualified {
                left: Box::new(Name::AliasQualified {
                    alias: "global".to_string(),
                    name: "System".to_string(),
                }),
                right: "IO".to_string(),
            }
        );
        assert!(parse_name("System.").is_err());
    }

    #[test]
    fn test_parse_namespace_and_usings() {
        let unit = parse_compilation_unit(
            "using System;\nnamespace A.B\n{\n    using System.Text;\n    class C { }\n}\n",
        )
        .unwrap();

        assert_eq!(unit.usings, vec![UsingDirective("System".to_string())]);
        let ns = unit.members[0].as_namespace().unwrap();
        assert_eq!(ns.name.without_alias(), "A.B");
        assert_eq!(ns.usings, vec![UsingDirective("System.Text".to_string())]);
        assert_eq!(ns.members[0].identifier(), Some("C"));
    }

    #[test]
    fn test_parse_file_scoped_namespace() {
        let unit = parse_compilation_unit("namespace A;\nstruct S { }\nclass C { }\n").unwrap();
        let ns = unit.members[0].as_namespace().unwrap();
        assert_eq!(ns.members.len(), 2);
    }

    #[test]
    fn test_parse_type_header() {
        let ty = single_type(
            "[Serializable, Display(\"x\")]\npublic sealed partial class Box<T, U> : Base<T>, IThing where T : class where U : new() { }",
        );

        assert_eq!(ty.kind, TypeKind::Class);
        assert_eq!(ty.identifier, "Box");
        assert_eq!(
            ty.modifiers,
            vec![Modifier::Public, Modifier::Sealed, Modifier::Partial]
        );
        assert_eq!(ty.type_parameters, vec!["T", "U"]);
        assert_eq!(
            ty.base_list,
            vec![TypeRef::new("Base<T>"), TypeRef::new("IThing")]
        );
        assert_eq!(ty.constraints, vec!["where T : class", "where U : new()"]);
        assert_eq!(ty.attribute_lists[0].attributes.len(), 2);
    }

    #[test]
    fn test_parse_attribute_arguments() {
        let ty = single_type(
            "[A(\"text\", typeof(Foo.Bar), Named = 3, Flag = true)] struct S { }",
        );
        let attribute = ty.find_attribute("A").unwrap();

        let positional: Vec<_> = attribute.positional_arguments().collect();
        assert_eq!(
            positional,
            vec![
                &AttributeExpr::StringLiteral("text".to_string()),
                &AttributeExpr::TypeOf(TypeRef::new("Foo.Bar")),
            ]
        );
        assert_eq!(
            attribute.named_argument("Named"),
            Some(&AttributeExpr::Raw("3".to_string()))
        );
        assert_eq!(
            attribute.named_argument("Flag"),
            Some(&AttributeExpr::Raw("true".to_string()))
        );
    }

    #[test]
    fn test_parse_fields() {
        let ty = single_type(
            "struct S {\n    public static readonly S Empty = new S();\n    private readonly System.Collections.Generic.List<int> _items;\n}",
        );

        let empty = ty.field("Empty").unwrap();
        assert_eq!(empty.ty.as_str(), "S");
        assert_eq!(
            empty.modifiers,
            vec![Modifier::Public, Modifier::Static, Modifier::Readonly]
        );
        assert_eq!(empty.initializer.as_ref().unwrap().as_str(), "new S()");

        let items = ty.field("_items").unwrap();
        assert_eq!(items.ty.as_str(), "System.Collections.Generic.List<int>");
        assert!(items.initializer.is_none());
    }

    #[test]
    fn test_parse_properties() {
        let ty = single_type(
            "class C {\n    public int A { get; private set; }\n    public bool B { get { return true; } }\n    public string N { get; init; } = \"x\";\n}",
        );

        let a = ty.property("A").unwrap();
        assert_eq!(a.accessors.len(), 2);
        assert_eq!(
            a.accessor(AccessorKind::Set).unwrap().modifiers,
            vec![Modifier::Private]
        );

        let b = ty.property("B").unwrap();
        assert!(b.accessor(AccessorKind::Set).is_none());
        assert!(matches!(
            b.accessor(AccessorKind::Get).unwrap().body,
            AccessorBody::Block(_)
        ));

        let n = ty.property("N").unwrap();
        assert_eq!(n.initializer.as_ref().unwrap().as_str(), "\"x\"");
    }

    #[test]
    fn test_parse_verbatim_members() {
        let ty = single_type(
            "struct S {\n    public S(int v) : this() { _v = v; }\n    public static bool operator <(S a, S b) => a._v < b._v;\n    public static implicit operator int(S s) => s._v;\n    public override string ToString() => $\"{_v}\";\n    public int this[int i] => i;\n    public enum Kind { A, B }\n    public bool Computed => true;\n    Action a = () => { };\n}",
        );

        let verbatim = ty
            .members
            .iter()
            .filter(|m| matches!(m, MemberDecl::Verbatim(_)))
            .count();
        assert_eq!(verbatim, 7);
        assert!(ty.field("a").is_some());
    }

    #[test]
    fn test_verbatim_text_is_dedented() {
        let ty = single_type(
            "struct S\n{\n        public void M()\n        {\n            Run();\n        }\n}",
        );
        match &ty.members[0] {
            MemberDecl::Verbatim(member) => {
                assert_eq!(member.text.as_str(), "void M()\n{\n    Run();\n}");
                assert_eq!(member.modifiers, vec![Modifier::Public]);
            }
            other => panic!("expected verbatim member, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_types() {
        let ty = single_type("struct Outer { public class Inner { } }");
        assert!(ty.nested_type("Inner").is_some());
    }

    #[test]
    fn test_syntax_errors_carry_position() {
        let err = parse_compilation_unit("class C {\n  void M() {\n").unwrap_err();
        assert!(matches!(err, CodegenError::Syntax { .. }));

        let err = parse_compilation_unit("namespace N {\n  class }\n").unwrap_err();
        match err {
            CodegenError::Syntax { position, .. } => assert_eq!(position.line, 1),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_global_attributes_stay_on_the_unit() {
        let unit = parse_compilation_unit(
            "using System.Runtime.CompilerServices;\n[assembly: InternalsVisibleTo(\"T\")]\n[module: Marker]\nnamespace N { [EntityId] partial struct Id { } }",
        )
        .unwrap();

        assert_eq!(unit.usings.len(), 1);
        let targets: Vec<Option<&str>> = unit
            .attribute_lists
            .iter()
            .map(|list| list.target.as_deref())
            .collect();
        assert_eq!(targets, vec![Some("assembly"), Some("module")]);

        let ns = unit.members[0].as_namespace().unwrap();
        let id = ns.members[0].as_type().unwrap();
        assert_eq!(id.attribute_lists.len(), 1);
        assert!(id.find_attribute("EntityId").is_some());
    }

    #[test]
    fn test_global_attributes_are_not_attached_to_a_type() {
        let unit = parse_compilation_unit("[assembly: Foo]\n[Bar] struct S { }").unwrap();
        assert_eq!(unit.attribute_lists.len(), 1);
        let ty = unit.members[0].as_type().unwrap();
        assert_eq!(ty.attribute_lists.len(), 1);
        assert!(ty.find_attribute("Bar").is_some());
    }

    #[test]
    fn test_misplaced_global_attributes_are_errors() {
        let after_type = parse_compilation_unit("struct S { }\n[assembly: Foo]").unwrap_err();
        assert!(matches!(after_type, CodegenError::Syntax { .. }));

        let in_namespace = parse_compilation_unit("namespace N { [assembly: Foo] struct S { } }")
            .unwrap_err();
        assert!(matches!(in_namespace, CodegenError::Syntax { .. }));
    }

    #[test]
    fn test_only_first_conditional_branch_is_read() {
        let ty = single_type(
            "#if NET\npublic partial struct S : IX {\n#else\npublic partial struct S {\n#endif\n}",
        );
        assert_eq!(ty.identifier, "S");
        assert_eq!(ty.base_list, vec![TypeRef::new("IX")]);
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r#"a\"b\\c"#).as_deref(), Some("a\"b\\c"));
        assert_eq!(unescape(r"\u0041"), None);
    }
}
