//! Placeholder merging
//!
//! Placeholders have the form `TEMPLATE_DATA_<KEY>__`. Keys match
//! case-insensitively against a [`TemplateData`] built by the caller.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{CodegenError, Result};

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)TEMPLATE_DATA_(.*?)__").expect("placeholder pattern compiles"));

/// Ordered key/value pairs substituted into templates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateData {
    entries: Vec<(String, String)>,
}

impl TemplateData {
    /// Create empty template data
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    /// Append a pair. Earlier keys shadow later ones that differ only by case.
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        self.entries.push((key.into(), value.to_string()));
    }

    /// Case-insensitive lookup; the first matching key wins
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for TemplateData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut data = TemplateData::new();
        for (key, value) in iter {
            data.insert(key, value);
        }
        data
    }
}

/// Substitute every placeholder in `text`.
///
/// Fails on the first placeholder whose key is missing from `data` or maps to
/// an empty value.
pub fn merge(text: &str, data: &TemplateData) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for captures in PLACEHOLDER.captures_iter(text) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        let key = captures.get(1).map_or("", |m| m.as_str());

        let value = data
            .get(key)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| CodegenError::UnresolvedPlaceholder {
                key: key.to_string(),
                placeholder: whole.as_str().to_string(),
            })?;

        out.push_str(&text[last..whole.start()]);
        out.push_str(value);
        last = whole.end();
    }

    out.push_str(&text[last..]);
    Ok(out)
}

/// Distinct placeholder keys in order of first appearance
pub fn placeholder_keys(text: &str) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for captures in PLACEHOLDER.captures_iter(text) {
        let key = captures.get(1).map_or("", |m| m.as_str());
        if !keys.iter().any(|k| k.eq_ignore_ascii_case(key)) {
            keys.push(key.to_string());
        }
    }
    keys
}
