//! Backing representations for entity IDs

use std::fmt;
use std::str::FromStr;

use idforge_codegen::syntax::TypeRef;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised when text does not name a known backing type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a known backing type")]
pub struct ParseBackingKindError(pub String);

/// The value type wrapped by a generated entity ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BackingKind {
    Int16,
    #[default]
    Int32,
    Int64,
    Guid,
    String,
    Decimal,
}

impl BackingKind {
    /// Every backing kind, in declaration order
    pub const ALL: [BackingKind; 6] = [
        BackingKind::Int16,
        BackingKind::Int32,
        BackingKind::Int64,
        BackingKind::Guid,
        BackingKind::String,
        BackingKind::Decimal,
    ];

    /// CLR type name; also the template name prefix
    pub fn as_str(&self) -> &'static str {
        match self {
            BackingKind::Int16 => "Int16",
            BackingKind::Int32 => "Int32",
            BackingKind::Int64 => "Int64",
            BackingKind::Guid => "Guid",
            BackingKind::String => "String",
            BackingKind::Decimal => "Decimal",
        }
    }

    /// C# keyword alias, where the language has one
    pub fn keyword(&self) -> Option<&'static str> {
        match self {
            BackingKind::Int16 => Some("short"),
            BackingKind::Int32 => Some("int"),
            BackingKind::Int64 => Some("long"),
            BackingKind::Guid => None,
            BackingKind::String => Some("string"),
            BackingKind::Decimal => Some("decimal"),
        }
    }

    /// Resolve the type named inside `typeof(...)`
    pub fn from_type_ref(ty: &TypeRef) -> Result<Self, ParseBackingKindError> {
        ty.as_str().parse()
    }
}

impl fmt::Display for BackingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackingKind {
    type Err = ParseBackingKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let unrooted = text.strip_prefix("global::").unwrap_or(text);
        let simple = unrooted.strip_prefix("System.").unwrap_or(unrooted);

        BackingKind::ALL
            .into_iter()
            .find(|kind| {
                kind.as_str() == simple || (kind.keyword() == Some(unrooted) && simple == unrooted)
            })
            .ok_or_else(|| ParseBackingKindError(s.to_string()))
    }
}

impl TryFrom<String> for BackingKind {
    type Error = ParseBackingKindError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BackingKind> for String {
    fn from(kind: BackingKind) -> Self {
        kind.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_clr_qualified_and_keyword_names() {
        assert_eq!("Int32".parse::<BackingKind>().unwrap(), BackingKind::Int32);
        assert_eq!("System.Int64".parse::<BackingKind>().unwrap(), BackingKind::Int64);
        assert_eq!(
            "global::System.Guid".parse::<BackingKind>().unwrap(),
            BackingKind::Guid
        );
        assert_eq!("int".parse::<BackingKind>().unwrap(), BackingKind::Int32);
        assert_eq!("decimal".parse::<BackingKind>().unwrap(), BackingKind::Decimal);
    }

    #[test]
    fn test_parse_rejects_unknown_names() {
        assert!("Int128".parse::<BackingKind>().is_err());
        assert!("System.int".parse::<BackingKind>().is_err());
        assert!("".parse::<BackingKind>().is_err());
    }

    #[test]
    fn test_display_is_template_prefix() {
        assert_eq!(BackingKind::Int32.to_string(), "Int32");
        assert_eq!(BackingKind::default(), BackingKind::Int32);
    }

    #[test]
    fn test_from_type_ref() {
        assert_eq!(
            BackingKind::from_type_ref(&TypeRef::new("short")).unwrap(),
            BackingKind::Int16
        );
    }
}
