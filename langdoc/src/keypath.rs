//! Canonical key-paths and key styles.
//!
//! A key-path addresses a value inside a document independently of how the
//! file spells composite keys. `a.b.c`, `a["b"].c` and `a['b'].c` all parse to
//! the same three segments; numeric segments (`a.0`, `a[0]`) become indices.

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// How a file stores composite keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyStyle {
    /// A single key string holding the whole path: `{"a.b.c": "v"}`.
    Flat,
    /// One structural container per segment: `{"a": {"b": {"c": "v"}}}`.
    #[default]
    Nested,
}

impl Display for KeyStyle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyStyle::Flat => write!(f, "flat"),
            KeyStyle::Nested => write!(f, "nested"),
        }
    }
}

impl FromStr for KeyStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flat" => Ok(KeyStyle::Flat),
            "nested" => Ok(KeyStyle::Nested),
            other => Err(Error::configuration_error(format!(
                "unknown key style `{}`, expected `flat` or `nested`",
                other
            ))),
        }
    }
}

/// One step of a [`KeyPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl Segment {
    /// Whether this segment names the object member `key`.
    ///
    /// An index segment also matches the member whose key is its decimal form,
    /// so `a.0` reaches `{"a": {"0": ...}}` as well as `{"a": [...]}`.
    pub fn matches_key(&self, key: &str) -> bool {
        match self {
            Segment::Key(k) => k == key,
            Segment::Index(i) => key == i.to_string(),
        }
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            Segment::Index(i) => Some(*i),
            Segment::Key(_) => None,
        }
    }
}

impl Display for Segment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Segment::Key(k) => write!(f, "{}", k),
            Segment::Index(i) => write!(f, "{}", i),
        }
    }
}

impl From<&str> for Segment {
    fn from(value: &str) -> Self {
        match value.parse::<usize>() {
            Ok(index) if is_plain_number(value) => Segment::Index(index),
            _ => Segment::Key(value.to_string()),
        }
    }
}

// `007` stays a key so that `joined()` reproduces it.
fn is_plain_number(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) && (s == "0" || !s.starts_with('0'))
}

/// An ordered sequence of segments addressing a value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct KeyPath {
    segments: Vec<Segment>,
}

impl KeyPath {
    pub fn new(segments: Vec<Segment>) -> Self {
        KeyPath { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The flat spelling of this path, as stored by flat-style files.
    pub fn joined(&self) -> String {
        self.segments
            .iter()
            .map(Segment::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Returns a new path with `segment` appended.
    pub fn child(&self, segment: impl Into<Segment>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        KeyPath { segments }
    }
}

impl From<usize> for Segment {
    fn from(value: usize) -> Self {
        Segment::Index(value)
    }
}

impl Display for KeyPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(k) if k.contains(['.', '[', ']']) || k.is_empty() => {
                    write!(f, "[{:?}]", k)?
                }
                _ => {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{}", segment)?
                }
            }
        }
        Ok(())
    }
}

impl FromStr for KeyPath {
    type Err = Error;

    /// Parses `a.b.c`, `a.0.b`, `a[0].b`, `a["x.y"]` and `a['x.y']`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| Error::InvalidKeyPath {
            path: s.to_string(),
            reason: reason.to_string(),
        };

        if s.is_empty() {
            return Err(invalid("key path is empty"));
        }

        let mut segments = Vec::new();
        let mut buf = String::new();
        // True right after a `]`, where only `.` or `[` may follow.
        let mut closed = false;
        let mut chars = s.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '.' => {
                    if buf.is_empty() && !closed {
                        return Err(invalid("empty segment"));
                    }
                    if !buf.is_empty() {
                        segments.push(Segment::from(buf.as_str()));
                        buf.clear();
                    }
                    closed = false;
                    if chars.peek().is_none() {
                        return Err(invalid("trailing `.`"));
                    }
                }
                '[' => {
                    if !buf.is_empty() {
                        segments.push(Segment::from(buf.as_str()));
                        buf.clear();
                    }
                    let segment = match chars.peek() {
                        Some(&quote @ ('"' | '\'')) => {
                            chars.next();
                            let mut key = String::new();
                            loop {
                                match chars.next() {
                                    Some('\\') => match chars.next() {
                                        Some(escaped) => key.push(escaped),
                                        None => return Err(invalid("unterminated quote")),
                                    },
                                    Some(ch) if ch == quote => break,
                                    Some(ch) => key.push(ch),
                                    None => return Err(invalid("unterminated quote")),
                                }
                            }
                            if chars.next() != Some(']') {
                                return Err(invalid("expected `]` after quoted key"));
                            }
                            Segment::Key(key)
                        }
                        _ => {
                            let mut inner = String::new();
                            loop {
                                match chars.next() {
                                    Some(']') => break,
                                    Some(ch) => inner.push(ch),
                                    None => return Err(invalid("unterminated `[`")),
                                }
                            }
                            let inner = inner.trim();
                            if inner.is_empty() {
                                return Err(invalid("empty brackets"));
                            }
                            Segment::from(inner)
                        }
                    };
                    segments.push(segment);
                    closed = true;
                }
                ']' => return Err(invalid("unmatched `]`")),
                _ => {
                    if closed {
                        return Err(invalid("expected `.` or `[` after `]`"));
                    }
                    buf.push(c);
                }
            }
        }

        if !buf.is_empty() {
            segments.push(Segment::from(buf.as_str()));
        }

        Ok(KeyPath { segments })
    }
}

impl TryFrom<&str> for KeyPath {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> Segment {
        Segment::Key(s.to_string())
    }

    #[test]
    fn test_parse_dotted() {
        let path: KeyPath = "a.b.c".parse().unwrap();
        assert_eq!(path.segments(), &[key("a"), key("b"), key("c")]);
        assert_eq!(path.joined(), "a.b.c");
    }

    #[test]
    fn test_parse_numeric_segments_as_indices() {
        let path: KeyPath = "items.0.name".parse().unwrap();
        assert_eq!(path.segments(), &[key("items"), Segment::Index(0), key("name")]);

        let bracketed: KeyPath = "items[0].name".parse().unwrap();
        assert_eq!(path, bracketed);
        assert_eq!(bracketed.joined(), "items.0.name");
    }

    #[test]
    fn test_parse_quoted_brackets() {
        let path: KeyPath = r#"menu["file.open"].label"#.parse().unwrap();
        assert_eq!(path.segments(), &[key("menu"), key("file.open"), key("label")]);

        let single: KeyPath = "menu['file.open']".parse().unwrap();
        assert_eq!(single.segments(), &[key("menu"), key("file.open")]);
        assert_eq!(single.to_string(), r#"menu["file.open"]"#);
    }

    #[test]
    fn test_parse_errors() {
        for bad in ["", "a..b", ".a", "a.", "a[0", "a]", "a[0]b", "a[]", "a['x"] {
            assert!(
                matches!(bad.parse::<KeyPath>(), Err(Error::InvalidKeyPath { .. })),
                "expected error for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_index_segment_matches_numeric_key() {
        assert!(Segment::Index(2).matches_key("2"));
        assert!(!Segment::Index(2).matches_key("02"));
        assert!(key("a").matches_key("a"));
        assert!(!key("a").matches_key("b"));
    }

    #[test]
    fn test_display_roundtrip() {
        for text in ["a.b.c", "a.0.b", r#"a["x.y"].z"#] {
            let path: KeyPath = text.parse().unwrap();
            assert_eq!(path.to_string(), text);
            assert_eq!(path.to_string().parse::<KeyPath>().unwrap(), path);
        }
    }

    #[test]
    fn test_key_style_from_str() {
        assert_eq!("flat".parse::<KeyStyle>().unwrap(), KeyStyle::Flat);
        assert_eq!(" NESTED ".parse::<KeyStyle>().unwrap(), KeyStyle::Nested);
        assert!("auto".parse::<KeyStyle>().is_err());
        assert_eq!(KeyStyle::default(), KeyStyle::Nested);
    }
}
