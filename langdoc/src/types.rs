//! Core, format-agnostic types for langdoc.
//! Backends parse into these and dump from these.

use std::{
    fmt::{Display, Formatter},
    ops::Range,
};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    keypath::{KeyPath, KeyStyle, Segment},
};

/// A parsed translation document: an ordered mapping from keys to values.
///
/// Keys keep the order in which the backend encountered them, so dumping a
/// freshly parsed document without sorting reproduces the source order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    entries: IndexMap<String, Value>,
}

/// A node of a [`Document`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Object(Document),
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts a member, keeping the position of an existing key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Looks up a direct member by its exact key.
    pub fn get_key(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    fn member(&self, segment: &Segment) -> Option<&Value> {
        match segment {
            Segment::Key(key) => self.entries.get(key),
            Segment::Index(index) => self.entries.get(&index.to_string()),
        }
    }

    /// Resolves `path` against this tree.
    ///
    /// With [`KeyStyle::Flat`] the joined path is looked up as a single root
    /// key; with [`KeyStyle::Nested`] every segment descends one level, where
    /// index segments address array items.
    pub fn get(&self, path: &KeyPath, style: KeyStyle) -> Option<&Value> {
        match style {
            KeyStyle::Flat => self.entries.get(&path.joined()),
            KeyStyle::Nested => {
                let (first, rest) = path.segments().split_first()?;
                let mut current = self.member(first)?;
                for segment in rest {
                    current = match current {
                        Value::Object(doc) => doc.member(segment)?,
                        Value::Array(items) => items.get(segment.as_index()?)?,
                        _ => return None,
                    };
                }
                Some(current)
            }
        }
    }

    /// All leaves with their dotted key, in document order.
    ///
    /// Empty containers are reported as leaves so that nothing is lost.
    pub fn flatten(&self) -> Vec<(String, &Value)> {
        let mut out = Vec::new();
        for (key, value) in &self.entries {
            flatten_into(key.clone(), value, &mut out);
        }
        out
    }

    /// A copy of this document with every leaf stored under its dotted key.
    pub fn to_flat(&self) -> Document {
        let mut doc = Document::new();
        for (key, value) in self.flatten() {
            doc.insert(key, value.clone());
        }
        doc
    }

    /// Expands dotted root keys into nested objects.
    ///
    /// Fails when a key is used both as a leaf and as a prefix of another key.
    pub fn to_nested(&self) -> Result<Document, Error> {
        let mut root = Document::new();
        for (key, value) in &self.entries {
            let parts = key.split('.').collect::<Vec<_>>();
            let Some((last, parents)) = parts.split_last() else {
                continue;
            };
            let mut current = &mut root;
            for part in parents {
                let slot = current
                    .entries
                    .entry(part.to_string())
                    .or_insert_with(|| Value::Object(Document::new()));
                current = match slot {
                    Value::Object(doc) => doc,
                    _ => {
                        return Err(Error::DataMismatch(format!(
                            "key `{}` conflicts with a value stored at `{}`",
                            key, part
                        )));
                    }
                };
            }
            if current.entries.contains_key(*last) {
                return Err(Error::DataMismatch(format!(
                    "key `{}` is defined more than once",
                    key
                )));
            }
            current.entries.insert(last.to_string(), value.clone());
        }
        Ok(root)
    }

    /// A copy with keys sorted lexicographically at every level.
    pub fn sorted(&self) -> Document {
        let mut entries = self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.sorted()))
            .collect::<IndexMap<_, _>>();
        entries.sort_keys();
        Document { entries }
    }
}

fn flatten_into<'a>(prefix: String, value: &'a Value, out: &mut Vec<(String, &'a Value)>) {
    match value {
        Value::Object(doc) if !doc.is_empty() => {
            for (key, child) in &doc.entries {
                flatten_into(format!("{}.{}", prefix, key), child, out);
            }
        }
        Value::Array(items) if !items.is_empty() => {
            for (index, child) in items.iter().enumerate() {
                flatten_into(format!("{}.{}", prefix, index), child, out);
            }
        }
        _ => out.push((prefix, value)),
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Document {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Document {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Value {
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Object(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Document> {
        match self {
            Value::Object(doc) => Some(doc),
            _ => None,
        }
    }

    fn sorted(&self) -> Value {
        match self {
            Value::Object(doc) => Value::Object(doc.sorted()),
            Value::Array(items) => Value::Array(items.iter().map(Value::sorted).collect()),
            other => other.clone(),
        }
    }
}

impl Display for Value {
    /// Scalars print bare (strings unquoted); containers print as compact JSON.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => write!(f, "{}", s),
            container => match serde_json::to_string(container) {
                Ok(json) => write!(f, "{}", json),
                Err(_) => Err(std::fmt::Error),
            },
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<Document> for Value {
    fn from(value: Document) -> Self {
        Value::Object(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

/// A span of characters (Unicode scalar values) in a specific text buffer.
///
/// Only meaningful for the exact text it was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PositionRange {
    pub start: usize,
    pub end: usize,
}

impl PositionRange {
    pub fn new(start: usize, end: usize) -> Self {
        PositionRange { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Converts a byte range of `text` into character offsets.
    ///
    /// Both ends must lie on char boundaries.
    pub(crate) fn from_byte_range(text: &str, range: Range<usize>) -> Self {
        let start = text[..range.start].chars().count();
        let end = start + text[range.start..range.end].chars().count();
        PositionRange { start, end }
    }

    /// The byte range of this span in `text`, or `None` if it does not fit.
    pub fn to_byte_range(&self, text: &str) -> Option<Range<usize>> {
        if self.start > self.end {
            return None;
        }
        let mut indices = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()));
        let start = indices.nth(self.start)?;
        let end = if self.end == self.start {
            start
        } else {
            indices.nth(self.end - self.start - 1)?
        };
        Some(start..end)
    }

    /// The text covered by this span.
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        self.to_byte_range(text).map(|range| &text[range])
    }

    /// 1-based line and column (in characters) of the span start.
    pub fn line_col(&self, text: &str) -> (usize, usize) {
        let mut line = 1;
        let mut column = 1;
        for c in text.chars().take(self.start) {
            if c == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        (line, column)
    }
}

impl Display for PositionRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> KeyPath {
        s.parse().unwrap()
    }

    fn sample() -> Document {
        let mut inner = Document::new();
        inner.insert("title", "Hello");
        inner.insert("items", vec![Value::from("first"), Value::from("second")]);
        let mut doc = Document::new();
        doc.insert("zeta", 1i64);
        doc.insert("home", inner);
        doc.insert("alpha", true);
        doc
    }

    #[test]
    fn test_nested_lookup() {
        let doc = sample();
        assert_eq!(
            doc.get(&path("home.title"), KeyStyle::Nested),
            Some(&Value::from("Hello"))
        );
        assert_eq!(
            doc.get(&path("home.items.1"), KeyStyle::Nested),
            Some(&Value::from("second"))
        );
        assert_eq!(doc.get(&path("home.missing"), KeyStyle::Nested), None);
        assert_eq!(doc.get(&path("zeta.deeper"), KeyStyle::Nested), None);
        assert_eq!(doc.get(&path("home.items.9"), KeyStyle::Nested), None);
    }

    #[test]
    fn test_flat_lookup() {
        let mut doc = Document::new();
        doc.insert("a.b.c", "hello");
        assert_eq!(
            doc.get(&path("a.b.c"), KeyStyle::Flat),
            Some(&Value::from("hello"))
        );
        assert_eq!(doc.get(&path("a.b.c"), KeyStyle::Nested), None);
    }

    #[test]
    fn test_flatten_and_restyle() {
        let doc = sample();
        let keys = doc
            .flatten()
            .into_iter()
            .map(|(k, _)| k)
            .collect::<Vec<_>>();
        assert_eq!(
            keys,
            vec!["zeta", "home.title", "home.items.0", "home.items.1", "alpha"]
        );

        let flat = doc.to_flat();
        assert_eq!(flat.get_key("home.title"), Some(&Value::from("Hello")));

        let nested = flat.to_nested().unwrap();
        assert_eq!(
            nested.get(&path("home.title"), KeyStyle::Nested),
            Some(&Value::from("Hello"))
        );
        // Index segments become object keys after expansion.
        assert_eq!(
            nested.get(&path("home.items.0"), KeyStyle::Nested),
            Some(&Value::from("first"))
        );
    }

    #[test]
    fn test_to_nested_conflict() {
        let mut doc = Document::new();
        doc.insert("a", "leaf");
        doc.insert("a.b", "child");
        assert!(matches!(doc.to_nested(), Err(Error::DataMismatch(_))));
    }

    #[test]
    fn test_sorted_is_recursive() {
        let sorted = sample().sorted();
        assert_eq!(
            sorted.keys().collect::<Vec<_>>(),
            vec!["alpha", "home", "zeta"]
        );
        let home = sorted.get_key("home").and_then(Value::as_object).unwrap();
        assert_eq!(home.keys().collect::<Vec<_>>(), vec!["items", "title"]);
    }

    #[test]
    fn test_position_range_conversions() {
        let text = "{\"é\": \"ünï\"}";
        let start = text.find("\"ünï\"").unwrap();
        let range = PositionRange::from_byte_range(text, start..start + "\"ünï\"".len());
        assert_eq!(range, PositionRange::new(6, 11));
        assert_eq!(range.slice(text), Some("\"ünï\""));
        assert_eq!(range.len(), 5);
        assert_eq!(PositionRange::new(0, 99).slice(text), None);
        assert_eq!(PositionRange::new(12, 12).slice(text), Some(""));
    }

    #[test]
    fn test_line_col() {
        let text = "a: 1\nb:\n  c: 2\n";
        let range = PositionRange::new(text.find("c:").unwrap(), text.len());
        assert_eq!(range.line_col(text), (3, 3));
    }
}
