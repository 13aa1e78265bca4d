//! Support for JSON translation files.
//!
//! Parsing and dumping go through `serde_json` (with key order preserved).
//! Navigation uses a separate, tolerant scanner over the raw text that also
//! accepts `//` and `/* */` comments and trailing commas, so it keeps working
//! on files that are mid-edit.

use std::ops::Range;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, ser::PrettyFormatter};

use crate::{
    descriptor::{Descriptor, compile_pattern},
    error::{Error, Location},
    keypath::{KeyPath, KeyStyle, Segment},
    navigate::{KeyScanner, resolve},
    options::ParserConfig,
    traits::Parser,
    types::{Document, PositionRange, Value},
};

const NAME: &str = "json";
const LANGUAGE_IDS: &[&str] = &["json"];
const DEFAULT_EXTS: &str = "^json$";

lazy_static! {
    static ref JSON_EXTENSIONS: Regex = compile_pattern(DEFAULT_EXTS).unwrap();
}

/// JSON backend. Supports both nested and flat key styles.
#[derive(Debug, Clone)]
pub struct JsonParser {
    descriptor: Descriptor,
}

impl Default for JsonParser {
    fn default() -> Self {
        JsonParser {
            descriptor: Descriptor::with_pattern(LANGUAGE_IDS, &JSON_EXTENSIONS),
        }
    }
}

impl JsonParser {
    /// Builds a JSON backend from `config`. An `indent` of zero dumps compact,
    /// single-line JSON.
    pub fn with_config(config: ParserConfig) -> Result<Self, Error> {
        Ok(JsonParser {
            descriptor: Descriptor::from_config(LANGUAGE_IDS, DEFAULT_EXTS, config)?,
        })
    }
}

impl Parser for JsonParser {
    fn name(&self) -> &'static str {
        NAME
    }

    fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    fn parse(&self, text: &str) -> Result<Document, Error> {
        if text.trim().is_empty() {
            return Ok(Document::new());
        }
        let StrictValue(value) = serde_json::from_str(text).map_err(parse_error)?;
        match value {
            Value::Object(document) => Ok(document),
            other => Err(Error::parse_error(
                NAME,
                format!("root must be an object, found {}", type_name(&other)),
                None,
            )),
        }
    }

    fn serialize(&self, document: &Document) -> Result<String, Error> {
        let value = serde_json::Value::Object(document_to_object(document)?);
        let options = self.options();
        let mut out = if options.indent == 0 {
            serde_json::to_string(&value).map_err(|e| Error::DataMismatch(e.to_string()))?
        } else {
            let indent = options.indent_unit();
            let mut buf = Vec::new();
            let mut serializer = serde_json::Serializer::with_formatter(
                &mut buf,
                PrettyFormatter::with_indent(indent.as_bytes()),
            );
            value
                .serialize(&mut serializer)
                .map_err(|e| Error::DataMismatch(e.to_string()))?;
            String::from_utf8(buf).map_err(|e| Error::DataMismatch(e.to_string()))?
        };
        out.push('\n');
        Ok(out)
    }

    fn navigate_to_key(
        &self,
        text: &str,
        key_path: &KeyPath,
        key_style: KeyStyle,
    ) -> Option<PositionRange> {
        resolve(text, JsonScanner::new, key_path, key_style)
    }
}

fn parse_error(error: serde_json::Error) -> Error {
    let suffix = format!(" at line {} column {}", error.line(), error.column());
    let message = error.to_string();
    let message = message.strip_suffix(&suffix).unwrap_or(&message).to_string();
    let location = (error.line() > 0).then(|| Location::new(error.line(), error.column()));
    Error::parse_error(NAME, message, location)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Integer(_) | Value::Float(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A JSON value read straight into [`Value`]. Objects that repeat a key are
/// rejected instead of silently keeping the last entry.
struct StrictValue(Value);

impl<'de> Deserialize<'de> for StrictValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{MapAccess, SeqAccess, Visitor};
        use std::fmt;

        struct StrictVisitor;

        impl<'de> Visitor<'de> for StrictVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a JSON value")
            }

            fn visit_unit<E>(self) -> Result<Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Value::Null)
            }

            fn visit_bool<E>(self, v: bool) -> Result<Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Value::Bool(v))
            }

            fn visit_i64<E>(self, v: i64) -> Result<Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Value::Integer(v))
            }

            fn visit_u64<E>(self, v: u64) -> Result<Value, E>
            where
                E: serde::de::Error,
            {
                Ok(i64::try_from(v)
                    .map(Value::Integer)
                    .unwrap_or(Value::Float(v as f64)))
            }

            fn visit_f64<E>(self, v: f64) -> Result<Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Value::Float(v))
            }

            fn visit_str<E>(self, v: &str) -> Result<Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Value::String(v.to_string()))
            }

            fn visit_string<E>(self, v: String) -> Result<Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Value::String(v))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut items = Vec::new();
                while let Some(StrictValue(item)) = seq.next_element()? {
                    items.push(item);
                }
                Ok(Value::Array(items))
            }

            fn visit_map<M>(self, mut map: M) -> Result<Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut document = Document::new();
                while let Some(key) = map.next_key::<String>()? {
                    if document.contains_key(&key) {
                        return Err(serde::de::Error::custom(format!(
                            "duplicate key `{}`",
                            key
                        )));
                    }
                    let StrictValue(value) = map.next_value()?;
                    document.insert(key, value);
                }
                Ok(Value::Object(document))
            }
        }

        deserializer.deserialize_any(StrictVisitor).map(StrictValue)
    }
}

fn document_to_object(document: &Document) -> Result<Map<String, serde_json::Value>, Error> {
    document
        .iter()
        .map(|(key, value)| Ok::<_, Error>((key.clone(), value_to_json(key, value)?)))
        .collect()
}

fn value_to_json(key: &str, value: &Value) -> Result<serde_json::Value, Error> {
    Ok(match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Integer(i) => serde_json::Value::Number((*i).into()),
        Value::Float(x) => match Number::from_f64(*x) {
            Some(n) => serde_json::Value::Number(n),
            None => {
                return Err(Error::DataMismatch(format!(
                    "`{}` holds {} which JSON cannot represent",
                    key, x
                )));
            }
        },
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Array(items) => serde_json::Value::Array(
            items
                .iter()
                .map(|item| value_to_json(key, item))
                .collect::<Result<_, _>>()?,
        ),
        Value::Object(doc) => serde_json::Value::Object(document_to_object(doc)?),
    })
}

/// Tolerant JSON tokenizer used only for navigation.
struct JsonScanner<'a> {
    bytes: &'a [u8],
}

impl<'a> JsonScanner<'a> {
    fn new(text: &'a str) -> Self {
        JsonScanner {
            bytes: text.as_bytes(),
        }
    }

    /// Skips whitespace and comments. An unterminated block comment runs to
    /// the end of the text.
    fn skip_trivia(&self, mut pos: usize) -> usize {
        let bytes = self.bytes;
        while pos < bytes.len() {
            match bytes[pos] {
                b' ' | b'\t' | b'\n' | b'\r' => pos += 1,
                b'/' if bytes.get(pos + 1) == Some(&b'/') => {
                    while pos < bytes.len() && bytes[pos] != b'\n' {
                        pos += 1;
                    }
                }
                b'/' if bytes.get(pos + 1) == Some(&b'*') => {
                    pos += 2;
                    while pos < bytes.len() && !bytes[pos..].starts_with(b"*/") {
                        pos += 1;
                    }
                    pos = (pos + 2).min(bytes.len());
                }
                _ => break,
            }
        }
        pos
    }

    /// Scans the string starting at `pos` (which must be a `"`), returning
    /// the position after the closing quote and the decoded contents.
    fn scan_string(&self, pos: usize) -> Option<(usize, String)> {
        let bytes = self.bytes;
        if bytes.get(pos) != Some(&b'"') {
            return None;
        }
        let mut decoded = Vec::new();
        let mut i = pos + 1;
        while i < bytes.len() {
            match bytes[i] {
                b'"' => return Some((i + 1, String::from_utf8_lossy(&decoded).into_owned())),
                b'\n' => return None,
                b'\\' => {
                    let escaped = *bytes.get(i + 1)?;
                    i += 2;
                    match escaped {
                        b'n' => decoded.push(b'\n'),
                        b't' => decoded.push(b'\t'),
                        b'r' => decoded.push(b'\r'),
                        b'b' => decoded.push(0x08),
                        b'f' => decoded.push(0x0c),
                        b'u' => {
                            let (c, next) = self.scan_unicode_escape(i)?;
                            let mut buf = [0u8; 4];
                            decoded.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                            i = next;
                        }
                        other => decoded.push(other),
                    }
                }
                other => {
                    decoded.push(other);
                    i += 1;
                }
            }
        }
        None
    }

    /// Decodes the four hex digits at `pos` (after `\u`), joining a following
    /// `\uXXXX` low surrogate when present.
    fn scan_unicode_escape(&self, pos: usize) -> Option<(char, usize)> {
        let high = self.hex4(pos)?;
        if (0xD800..0xDC00).contains(&high) && self.bytes[pos + 4..].starts_with(b"\\u") {
            if let Some(low) = self.hex4(pos + 6) {
                if (0xDC00..0xE000).contains(&low) {
                    let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                    return Some((char::from_u32(code)?, pos + 10));
                }
            }
        }
        Some((char::from_u32(high).unwrap_or('\u{FFFD}'), pos + 4))
    }

    fn hex4(&self, pos: usize) -> Option<u32> {
        let digits = self.bytes.get(pos..pos + 4)?;
        let digits = std::str::from_utf8(digits).ok()?;
        u32::from_str_radix(digits, 16).ok()
    }

    /// End of the container opened at `pos`, or the end of the text if it is
    /// never closed.
    fn container_end(&self, pos: usize) -> usize {
        let bytes = self.bytes;
        let mut depth = 0usize;
        let mut i = pos;
        while i < bytes.len() {
            i = self.skip_trivia(i);
            if i >= bytes.len() {
                break;
            }
            match bytes[i] {
                b'"' => match self.scan_string(i) {
                    Some((end, _)) => i = end,
                    None => return bytes.len(),
                },
                b'{' | b'[' => {
                    depth += 1;
                    i += 1;
                }
                b'}' | b']' => {
                    depth = depth.saturating_sub(1);
                    i += 1;
                    if depth == 0 {
                        return i;
                    }
                }
                _ => i += 1,
            }
        }
        bytes.len()
    }

    /// End of the value starting at `pos`.
    fn value_end(&self, pos: usize) -> Option<usize> {
        let bytes = self.bytes;
        match *bytes.get(pos)? {
            b'"' => self.scan_string(pos).map(|(end, _)| end),
            b'{' | b'[' => Some(self.container_end(pos)),
            b',' | b'}' | b']' | b':' => None,
            _ => {
                let mut end = pos;
                while end < bytes.len()
                    && !matches!(
                        bytes[end],
                        b',' | b'}' | b']' | b' ' | b'\t' | b'\n' | b'\r' | b'/'
                    )
                {
                    end += 1;
                }
                (end > pos).then_some(end)
            }
        }
    }

    fn object_member(&self, container: Range<usize>, segment: &Segment) -> Option<Range<usize>> {
        let bytes = self.bytes;
        let mut pos = container.start + 1;
        loop {
            pos = self.skip_trivia(pos);
            if pos >= container.end {
                return None;
            }
            match bytes[pos] {
                b'}' => return None,
                b',' => {
                    pos += 1;
                    continue;
                }
                _ => {}
            }
            let (key_end, key) = self.scan_string(pos)?;
            pos = self.skip_trivia(key_end);
            if bytes.get(pos) != Some(&b':') {
                return None;
            }
            let value_start = self.skip_trivia(pos + 1);
            let value_end = self.value_end(value_start)?.min(container.end);
            if segment.matches_key(&key) {
                return Some(value_start..value_end);
            }
            pos = value_end;
        }
    }

    fn array_item(&self, container: Range<usize>, index: usize) -> Option<Range<usize>> {
        let bytes = self.bytes;
        let mut pos = container.start + 1;
        let mut current = 0;
        loop {
            pos = self.skip_trivia(pos);
            if pos >= container.end {
                return None;
            }
            match bytes[pos] {
                b']' => return None,
                b',' => {
                    pos += 1;
                    continue;
                }
                _ => {}
            }
            let end = self.value_end(pos)?.min(container.end);
            if current == index {
                return Some(pos..end);
            }
            current += 1;
            pos = end;
        }
    }
}

impl KeyScanner for JsonScanner<'_> {
    fn root(&self) -> Option<Range<usize>> {
        let start = self.skip_trivia(0);
        match self.bytes.get(start)? {
            b'{' | b'[' => Some(start..self.container_end(start)),
            _ => None,
        }
    }

    fn member(&self, container: Range<usize>, segment: &Segment) -> Option<Range<usize>> {
        match self.bytes.get(container.start)? {
            b'{' => self.object_member(container, segment),
            b'[' => self.array_item(container, segment.as_index()?),
            _ => None,
        }
    }
}
