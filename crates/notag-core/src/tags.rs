//! Struct tag parsing.
//!
//! A struct tag is free-form text attached to a field, conventionally a list
//! of `key:"value"` pairs separated by whitespace:
//!
//! ```text
//! `json:"name,omitempty" xml:"Name"`
//! ```
//!
//! Parsing is lenient. Garbled pairs are skipped and scanning resumes at the
//! next whitespace, so a hand-written tag with a typo never aborts the check
//! of the rest of the field.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A single tag key, e.g. `json`, `xml`, `db`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagKey(String);

impl TagKey {
    /// Creates a tag key from its textual form.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TagKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TagKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A field annotation: the raw tag text plus the distinct keys parsed from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation<'a> {
    raw: &'a str,
    keys: BTreeSet<TagKey>,
}

impl<'a> Annotation<'a> {
    /// Parses a raw tag literal, delimiters included.
    #[must_use]
    pub fn parse(raw: &'a str) -> Self {
        Self {
            raw,
            keys: extract_keys(raw),
        }
    }

    /// Raw tag text exactly as it appeared in source.
    #[must_use]
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    /// Distinct keys found in the tag.
    #[must_use]
    pub fn keys(&self) -> &BTreeSet<TagKey> {
        &self.keys
    }

    /// Returns true if `key` is one of the parsed keys.
    #[must_use]
    pub fn has_key(&self, key: &TagKey) -> bool {
        self.keys.contains(key)
    }
}

/// Extracts the distinct keys of a struct tag.
///
/// Wrapping backticks are stripped. A tag written as an interpreted string
/// literal (`"json:\"a\""`) is unquoted and unescaped first.
///
/// ```
/// use notag_core::tags::extract_keys;
///
/// let keys: Vec<String> = extract_keys(r#"`xml:"name" json:"name"`"#)
///     .into_iter()
///     .map(|k| k.to_string())
///     .collect();
/// assert_eq!(keys, ["json", "xml"]);
/// ```
#[must_use]
pub fn extract_keys(raw: &str) -> BTreeSet<TagKey> {
    let body = unwrap_literal(raw.trim());
    let mut keys = BTreeSet::new();
    let mut rest = body.as_str();

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }
        match scan_pair(rest) {
            Some((key, remaining)) => {
                keys.insert(TagKey::new(key));
                rest = remaining;
            }
            None => {
                tracing::trace!("skipping malformed tag segment in {raw:?}");
                rest = skip_segment(rest);
            }
        }
    }

    keys
}

/// Strips the delimiters of a Go string literal.
fn unwrap_literal(raw: &str) -> String {
    if let Some(inner) = raw.strip_prefix('`') {
        return inner.strip_suffix('`').unwrap_or(inner).to_owned();
    }
    if let Some(inner) = raw.strip_prefix('"') {
        let inner = inner.strip_suffix('"').unwrap_or(inner);
        return unescape(inner);
    }
    raw.to_owned()
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next @ ('"' | '\\')) => out.push(next),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Scans one `key:"value"` pair at the start of `input`.
///
/// Returns the key and the text after the closing quote, or `None` when the
/// segment is not a well-formed pair.
fn scan_pair(input: &str) -> Option<(&str, &str)> {
    let key_end = input
        .find(|c: char| c == ':' || c == '"' || c.is_whitespace() || c.is_control())
        .unwrap_or(input.len());
    let key = &input[..key_end];
    if key.is_empty() {
        return None;
    }

    let value = input[key_end..].strip_prefix(':')?.strip_prefix('"')?;
    let close = closing_quote(value)?;
    Some((key, &value[close + 1..]))
}

/// Byte index of the first unescaped `"` in `value`.
fn closing_quote(value: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in value.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return Some(i),
            _ => {}
        }
    }
    None
}

fn skip_segment(input: &str) -> &str {
    input
        .find(char::is_whitespace)
        .map_or("", |i| &input[i..])
}
