//! Tokenizer for C#-family source text
//!
//! Produces a flat token stream with byte offsets into the source so the
//! parser can slice out member bodies verbatim. Comments, whitespace and
//! preprocessor lines are dropped. For `#if` groups only the first branch is
//! tokenized; `#elif`/`#else` branches are skipped up to the matching `#endif`.

use super::span::Position;
use crate::error::{CodegenError, Result};

/// Two-character punctuators that must not be split.
const COMPOUND_PUNCTUATORS: &[&str] = &[
    "::", "=>", "==", "!=", "<=", ">=", "&&", "||", "??", "?.", "++", "--", "+=", "-=", "*=",
    "/=", "%=", "&=", "|=", "^=", "->", "<<",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Ident,
    Number,
    Str,
    Char,
    Punct,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
    pub position: Position,
}

impl<'a> Token<'a> {
    /// True for a punctuator with the given text
    pub fn is_punct(&self, text: &str) -> bool {
        self.kind == TokenKind::Punct && self.text == text
    }

    /// True for an identifier or keyword with the given text
    pub fn is_ident(&self, text: &str) -> bool {
        self.kind == TokenKind::Ident && self.text == text
    }
}

pub(crate) fn tokenize(source: &str) -> Result<Vec<Token<'_>>> {
    Lexer::new(source).run()
}

struct Lexer<'a> {
    source: &'a str,
    chars: Vec<(usize, char)>,
    index: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().collect(),
            index: 0,
            line: 0,
            column: 0,
        }
    }

    fn peek(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.index + ahead).map(|(_, c)| *c)
    }

    fn bump(&mut self) -> Option<char> {
        let (_, c) = *self.chars.get(self.index)?;
        self.index += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn offset(&self) -> usize {
        self.chars
            .get(self.index)
            .map(|(offset, _)| *offset)
            .unwrap_or(self.source.len())
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.peek(0) {
            if c == '\n' {
                break;
            }
            self.bump();
        }
    }

    /// Consume a preprocessor line and return its directive name
    fn directive(&mut self) -> String {
        self.bump();
        while self.peek(0).is_some_and(|c| c == ' ' || c == '\t') {
            self.bump();
        }
        let mut name = String::new();
        while let Some(c) = self.peek(0).filter(|c| c.is_ascii_alphabetic()) {
            name.push(c);
            self.bump();
        }
        self.skip_line();
        name
    }

    /// Skip lines through the `#endif` closing the current group
    fn skip_conditional_branch(&mut self) {
        let mut depth = 0usize;
        while let Some(c) = self.peek(0) {
            if c.is_whitespace() {
                self.bump();
                continue;
            }
            if c != '#' {
                self.skip_line();
                continue;
            }
            match self.directive().as_str() {
                "if" => depth += 1,
                "endif" if depth == 0 => return,
                "endif" => depth -= 1,
                _ => {}
            }
        }
    }

    fn run(mut self) -> Result<Vec<Token<'a>>> {
        let mut tokens = Vec::new();
        let mut at_line_start = true;

        while let Some(c) = self.peek(0) {
            if c.is_whitespace() {
                if c == '\n' {
                    at_line_start = true;
                }
                self.bump();
                continue;
            }

            let start = self.offset();
            let position = self.position();

            if c == '#' && at_line_start {
                if matches!(self.directive().as_str(), "elif" | "else") {
                    self.skip_conditional_branch();
                }
                continue;
            }
            at_line_start = false;

            if c == '/' && self.peek(1) == Some('/') {
                self.skip_line();
                continue;
            }
            if c == '/' && self.peek(1) == Some('*') {
                self.block_comment(position)?;
                continue;
            }

            let kind = self.token(c, position)?;
            let end = self.offset();
            tokens.push(Token {
                kind,
                text: &self.source[start..end],
                start,
                end,
                position,
            });
        }

        Ok(tokens)
    }

    fn token(&mut self, c: char, position: Position) -> Result<TokenKind> {
        let next = self.peek(1);
        let after = self.peek(2);

        match c {
            '"' => {
                self.string(false, false, position)?;
                Ok(TokenKind::Str)
            }
            '@' if next == Some('"') => {
                self.bump();
                self.string(true, false, position)?;
                Ok(TokenKind::Str)
            }
            '$' if next == Some('"') => {
                self.bump();
                self.string(false, true, position)?;
                Ok(TokenKind::Str)
            }
            '$' | '@' if matches!(next, Some('@') | Some('$')) && after == Some('"') => {
                self.bump();
                self.bump();
                self.string(true, true, position)?;
                Ok(TokenKind::Str)
            }
            '\'' => {
                self.char_literal(position)?;
                Ok(TokenKind::Char)
            }
            '@' if next.is_some_and(|n| n.is_alphabetic() || n == '_') => {
                self.bump();
                self.identifier();
                Ok(TokenKind::Ident)
            }
            c if c.is_alphabetic() || c == '_' => {
                self.identifier();
                Ok(TokenKind::Ident)
            }
            c if c.is_ascii_digit() => {
                self.number();
                Ok(TokenKind::Number)
            }
            _ => {
                let compound = next
                    .map(|n| format!("{c}{n}"))
                    .is_some_and(|pair| COMPOUND_PUNCTUATORS.contains(&pair.as_str()));
                self.bump();
                if compound {
                    self.bump();
                }
                Ok(TokenKind::Punct)
            }
        }
    }

    fn identifier(&mut self) {
        while self
            .peek(0)
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            self.bump();
        }
    }

    fn number(&mut self) {
        while let Some(c) = self.peek(0) {
            let fraction = c == '.' && self.peek(1).is_some_and(|n| n.is_ascii_digit());
            if c.is_alphanumeric() || c == '_' || fraction {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn block_comment(&mut self, position: Position) -> Result<()> {
        self.bump();
        self.bump();
        loop {
            match self.bump() {
                None => return Err(CodegenError::syntax(position, "unterminated block comment")),
                Some('*') if self.peek(0) == Some('/') => {
                    self.bump();
                    return Ok(());
                }
                Some(_) => {}
            }
        }
    }

    fn string(&mut self, verbatim: bool, interpolated: bool, position: Position) -> Result<()> {
        // opening quote
        self.bump();
        let mut holes = 0usize;

        loop {
            let c = self
                .bump()
                .ok_or_else(|| CodegenError::syntax(position, "unterminated string literal"))?;

            match c {
                '\\' if !verbatim => {
                    self.bump();
                }
                '\n' if !verbatim && holes == 0 => {
                    return Err(CodegenError::syntax(position, "newline in string literal"));
                }
                '{' if interpolated => {
                    if holes == 0 && self.peek(0) == Some('{') {
                        self.bump();
                    } else {
                        holes += 1;
                    }
                }
                '}' if interpolated && holes > 0 => holes -= 1,
                '"' if holes > 0 => self.nested_string(position)?,
                '"' => {
                    if verbatim && self.peek(0) == Some('"') {
                        self.bump();
                    } else {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
    }

    /// A plain string literal inside an interpolation hole; the opening quote is consumed.
    fn nested_string(&mut self, position: Position) -> Result<()> {
        loop {
            match self.bump() {
                None | Some('\n') => {
                    return Err(CodegenError::syntax(position, "unterminated string literal"))
                }
                Some('\\') => {
                    self.bump();
                }
                Some('"') => return Ok(()),
                Some(_) => {}
            }
        }
    }

    fn char_literal(&mut self, position: Position) -> Result<()> {
        self.bump();
        loop {
            match self.bump() {
                None | Some('\n') => {
                    return Err(CodegenError::syntax(position, "unterminated character literal"))
                }
                Some('\\') => {
                    self.bump();
                }
                Some('\'') => return Ok(()),
                Some(_) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(source: &str) -> Vec<&str> {
        tokenize(source).unwrap().into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_skips_comments_and_directives() {
        let source = "#nullable enable\n// line\n/* block */ struct Id {}";
        assert_eq!(texts(source), vec!["struct", "Id", "{", "}"]);
    }

    #[test]
    fn test_keeps_first_conditional_branch() {
        let source = "#if A\nx\n#if B\ny\n#endif\n#elif C\nz\n#if D\nw\n#else\nv\n#endif\n#else\nu\n#endif\nend";
        assert_eq!(texts(source), vec!["x", "y", "end"]);
    }

    #[test]
    fn test_compound_punctuators() {
        assert_eq!(
            texts("global::System a => b == c"),
            vec!["global", "::", "System", "a", "=>", "b", "==", "c"]
        );
    }

    #[test]
    fn test_closing_generics_are_not_joined() {
        assert_eq!(texts("A<B<C>>"), vec!["A", "<", "B", "<", "C", ">", ">"]);
    }

    #[test]
    fn test_string_literals() {
        let tokens = tokenize(r#"x("a \"b\"", @"c""d", $"{(y ? "e" : "f")}")"#).unwrap();
        let strings: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Str)
            .map(|t| t.text)
            .collect();
        assert_eq!(
            strings,
            vec![r#""a \"b\"""#, r#"@"c""d""#, r#"$"{(y ? "e" : "f")}""#]
        );
    }

    #[test]
    fn test_positions_are_tracked() {
        let tokens = tokenize("a\n  b").unwrap();
        assert_eq!(tokens[1].position, Position::new(1, 2));
    }

    #[test]
    fn test_unterminated_string_is_an_error() {
        let err = tokenize("\"abc").unwrap_err();
        assert!(matches!(err, CodegenError::Syntax { .. }));
    }

    #[test]
    fn test_escaped_identifier_and_char() {
        assert_eq!(texts("@class '\\''"), vec!["@class", "'\\''"]);
    }
}
