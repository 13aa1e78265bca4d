//! Support for Java-style `.properties` files.
//!
//! Properties are flat: every key is stored verbatim (dots included) and
//! every value is a string. Nested trees are flattened to dotted keys on dump,
//! with array items addressed as `list.0`, `list.1`, ...
//!
//! Parsing and navigation share one line reader. Parsing stops at the first
//! malformed escape; navigation ignores it and keeps going.

use std::ops::Range;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    descriptor::{Descriptor, compile_pattern},
    error::{Error, Location},
    keypath::{KeyPath, KeyStyle, Segment},
    navigate::{KeyScanner, resolve},
    options::ParserConfig,
    traits::Parser,
    types::{Document, PositionRange, Value},
};

const NAME: &str = "properties";
const LANGUAGE_IDS: &[&str] = &["properties", "java-properties"];
const DEFAULT_EXTS: &str = "^properties$";

lazy_static! {
    static ref PROPERTIES_EXTENSIONS: Regex = compile_pattern(DEFAULT_EXTS).unwrap();
}

/// Properties backend. Key lookups are always flat.
#[derive(Debug, Clone)]
pub struct PropertiesParser {
    descriptor: Descriptor,
}

impl Default for PropertiesParser {
    fn default() -> Self {
        PropertiesParser {
            descriptor: Descriptor::with_pattern(LANGUAGE_IDS, &PROPERTIES_EXTENSIONS),
        }
    }
}

impl PropertiesParser {
    /// Builds a properties backend from `config`. Indentation options are
    /// accepted but have no effect on the output.
    pub fn with_config(config: ParserConfig) -> Result<Self, Error> {
        Ok(PropertiesParser {
            descriptor: Descriptor::from_config(LANGUAGE_IDS, DEFAULT_EXTS, config)?,
        })
    }
}

impl Parser for PropertiesParser {
    fn name(&self) -> &'static str {
        NAME
    }

    fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    /// A key that appears twice is a parse error at its second occurrence.
    fn parse(&self, text: &str) -> Result<Document, Error> {
        let scan = scan(text);
        if let Some(problem) = scan.problems.into_iter().next() {
            return Err(Error::parse_error(
                NAME,
                problem.message,
                Some(problem.location),
            ));
        }
        let mut document = Document::new();
        for entry in scan.entries {
            if document.contains_key(&entry.key) {
                return Err(Error::parse_error(
                    NAME,
                    format!("duplicate key `{}`", entry.key),
                    Some(entry.location),
                ));
            }
            document.insert(entry.key, Value::String(entry.value));
        }
        Ok(document)
    }

    fn serialize(&self, document: &Document) -> Result<String, Error> {
        let mut out = String::new();
        for (key, value) in document.flatten() {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                Value::Object(_) | Value::Array(_) => {
                    return Err(Error::DataMismatch(format!(
                        "empty container at `{}` has no properties representation",
                        key
                    )));
                }
                scalar => scalar.to_string(),
            };
            out.push_str(&escape(&key, true));
            out.push('=');
            out.push_str(&escape(&text, false));
            out.push('\n');
        }
        Ok(out)
    }

    fn navigate_to_key(
        &self,
        text: &str,
        key_path: &KeyPath,
        _key_style: KeyStyle,
    ) -> Option<PositionRange> {
        resolve(text, PropertiesScanner::new, key_path, KeyStyle::Flat)
    }
}

fn escape(s: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for (i, c) in s.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{c}' => out.push_str("\\f"),
            ' ' if is_key || i == 0 => out.push_str("\\ "),
            '=' | ':' | '#' | '!' if is_key => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

struct Entry {
    key: String,
    value: String,
    /// Byte span of the value as written, escapes and continuations included.
    span: Range<usize>,
    /// Where the key starts.
    location: Location,
}

struct Problem {
    message: String,
    location: Location,
}

struct Scan {
    entries: Vec<Entry>,
    problems: Vec<Problem>,
}

fn scan(text: &str) -> Scan {
    let mut reader = LineReader {
        text,
        pos: 0,
        line: 1,
        line_start: 0,
        problems: Vec::new(),
    };
    let mut entries = Vec::new();

    while !reader.is_eof() {
        reader.skip_blanks();
        match reader.peek() {
            None => break,
            Some('\n' | '\r') => {
                reader.eat_break();
                continue;
            }
            Some('#' | '!') => {
                reader.skip_line();
                if !reader.is_eof() {
                    reader.eat_break();
                }
                continue;
            }
            Some(_) => {}
        }

        let location = Location::new(reader.line, reader.column());
        let key = reader.read_key();
        reader.skip_blanks();
        if matches!(reader.peek(), Some('=' | ':')) {
            reader.bump();
            reader.skip_blanks();
        }
        let start = reader.pos;
        let (value, end) = reader.read_value();
        entries.push(Entry {
            key,
            value,
            span: start..end,
            location,
        });
        if !reader.is_eof() {
            reader.eat_break();
        }
    }

    Scan {
        entries,
        problems: reader.problems,
    }
}

struct LineReader<'a> {
    text: &'a str,
    pos: usize,
    line: usize,
    line_start: usize,
    problems: Vec<Problem>,
}

impl LineReader<'_> {
    fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consumes one `\n`, `\r\n` or `\r`.
    fn eat_break(&mut self) {
        if self.peek() == Some('\r') {
            self.pos += 1;
        }
        if self.peek() == Some('\n') {
            self.pos += 1;
        }
        self.line += 1;
        self.line_start = self.pos;
    }

    fn skip_blanks(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\u{c}')) {
            self.pos += 1;
        }
    }

    fn skip_line(&mut self) {
        while !matches!(self.peek(), None | Some('\n' | '\r')) {
            self.bump();
        }
    }

    fn column(&self) -> usize {
        self.text[self.line_start..self.pos].chars().count() + 1
    }

    fn read_key(&mut self) -> String {
        let mut key = String::new();
        loop {
            match self.peek() {
                None | Some('\n' | '\r' | '=' | ':' | ' ' | '\t' | '\u{c}') => break,
                Some('\\') => {
                    let column = self.column();
                    self.bump();
                    self.read_escape(&mut key, column);
                }
                Some(c) => {
                    self.bump();
                    key.push(c);
                }
            }
        }
        key
    }

    /// Returns the decoded value and the byte offset just past its last
    /// character. Blanks in front of a line continuation are not part of the
    /// span unless more content follows.
    fn read_value(&mut self) -> (String, usize) {
        let mut value = String::new();
        let mut end = self.pos;
        let mut content_end = self.pos;
        loop {
            match self.peek() {
                None | Some('\n' | '\r') => break,
                Some('\\') => {
                    let column = self.column();
                    self.bump();
                    if self.read_escape(&mut value, column) {
                        end = content_end;
                    } else {
                        end = self.pos;
                        content_end = self.pos;
                    }
                }
                Some(c) => {
                    self.bump();
                    value.push(c);
                    end = self.pos;
                    if !matches!(c, ' ' | '\t' | '\u{c}') {
                        content_end = self.pos;
                    }
                }
            }
        }
        (value, end)
    }

    /// Decodes the escape after a consumed backslash. Returns `true` when the
    /// backslash was a line continuation.
    fn read_escape(&mut self, out: &mut String, column: usize) -> bool {
        match self.peek() {
            None => false,
            Some('\n' | '\r') => {
                self.eat_break();
                self.skip_blanks();
                true
            }
            Some(c) => {
                self.bump();
                match c {
                    't' => out.push('\t'),
                    'n' => out.push('\n'),
                    'r' => out.push('\r'),
                    'f' => out.push('\u{c}'),
                    'u' => self.read_unicode(out, column),
                    other => out.push(other),
                }
                false
            }
        }
    }

    fn read_hex4(&mut self) -> Option<u32> {
        let hex = self.text[self.pos..]
            .chars()
            .take(4)
            .take_while(char::is_ascii_hexdigit)
            .collect::<String>();
        self.pos += hex.len();
        if hex.len() == 4 {
            u32::from_str_radix(&hex, 16).ok()
        } else {
            None
        }
    }

    fn read_unicode(&mut self, out: &mut String, column: usize) {
        let Some(code) = self.read_hex4() else {
            self.problem("malformed \\uXXXX escape", column);
            return;
        };
        let code = match code {
            0xD800..=0xDBFF => {
                let low = if self.text[self.pos..].starts_with("\\u") {
                    self.pos += 2;
                    self.read_hex4()
                } else {
                    None
                };
                match low {
                    Some(low @ 0xDC00..=0xDFFF) => {
                        0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00)
                    }
                    _ => {
                        self.problem("unpaired surrogate in \\u escape", column);
                        return;
                    }
                }
            }
            code => code,
        };
        match char::from_u32(code) {
            Some(c) => out.push(c),
            None => self.problem("invalid code point in \\u escape", column),
        }
    }

    fn problem(&mut self, message: &str, column: usize) {
        self.problems.push(Problem {
            message: message.to_string(),
            location: Location::new(self.line, column),
        });
    }
}

struct PropertiesScanner {
    len: usize,
    entries: Vec<Entry>,
}

impl PropertiesScanner {
    fn new(text: &str) -> Self {
        PropertiesScanner {
            len: text.len(),
            entries: scan(text).entries,
        }
    }
}

impl KeyScanner for PropertiesScanner {
    fn root(&self) -> Option<Range<usize>> {
        Some(0..self.len)
    }

    fn member(&self, container: Range<usize>, segment: &Segment) -> Option<Range<usize>> {
        if container != (0..self.len) {
            return None;
        }
        self.entries
            .iter()
            .find(|entry| segment.matches_key(&entry.key))
            .map(|entry| entry.span.clone())
    }
}
