//! Support for YAML translation files.
//!
//! Parsing uses the `yaml-rust2` loader (core schema scalars, key order kept).
//! Dumping is a small block-style emitter so that the configured indentation
//! is honored. Navigation replays the `yaml-rust2` marked event stream, which
//! is delivered incrementally, so everything before a syntax error can still
//! be located.
//!
//! Index segments (`items.0`) address sequence items; they also match a
//! mapping key spelled as that number.

use std::{collections::HashMap, ops::Range};

use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;
use yaml_rust2::{
    Yaml, YamlLoader,
    parser::{Event, MarkedEventReceiver, Parser as EventParser},
    scanner::{Marker, ScanError, TScalarStyle},
};

use crate::{
    descriptor::{Descriptor, compile_pattern},
    error::{Error, Location},
    keypath::{KeyPath, KeyStyle, Segment},
    navigate::{KeyScanner, resolve},
    options::ParserConfig,
    traits::Parser,
    types::{Document, PositionRange, Value},
};

const NAME: &str = "yaml";
const LANGUAGE_IDS: &[&str] = &["yaml"];
const DEFAULT_EXTS: &str = "^ya?ml$";
const FLOW_INDICATORS: &[char] = &[',', '[', ']', '{', '}'];

lazy_static! {
    static ref YAML_EXTENSIONS: Regex = compile_pattern(DEFAULT_EXTS).unwrap();
}

/// YAML backend. Supports both nested and flat key styles.
#[derive(Debug, Clone)]
pub struct YamlParser {
    descriptor: Descriptor,
}

impl Default for YamlParser {
    fn default() -> Self {
        YamlParser {
            descriptor: Descriptor::with_pattern(LANGUAGE_IDS, &YAML_EXTENSIONS),
        }
    }
}

impl YamlParser {
    /// Builds a YAML backend from `config`.
    ///
    /// YAML indentation must be made of spaces and be at least one column wide.
    pub fn with_config(config: ParserConfig) -> Result<Self, Error> {
        if config.options.tab.contains('\t') {
            return Err(Error::configuration_error(
                "YAML indentation cannot contain tab characters",
            ));
        }
        if config.options.indent == 0 {
            return Err(Error::configuration_error(
                "YAML indentation must be at least 1",
            ));
        }
        Ok(YamlParser {
            descriptor: Descriptor::from_config(LANGUAGE_IDS, DEFAULT_EXTS, config)?,
        })
    }

    fn write_mapping(&self, document: &Document, indent: &str, out: &mut String) {
        for (key, value) in document {
            out.push_str(indent);
            self.write_entry(key, value, indent, out);
        }
    }

    /// Writes `key: value`; the caller has already written the indentation.
    fn write_entry(&self, key: &str, value: &Value, indent: &str, out: &mut String) {
        out.push_str(&format_string(key));
        match value {
            Value::Object(doc) if !doc.is_empty() => {
                out.push_str(":\n");
                self.write_mapping(doc, &self.child_indent(indent), out);
            }
            Value::Array(items) if !items.is_empty() => {
                out.push_str(":\n");
                self.write_sequence(items, &self.child_indent(indent), out);
            }
            scalar => {
                out.push_str(": ");
                out.push_str(&format_scalar(scalar));
                out.push('\n');
            }
        }
    }

    fn write_sequence(&self, items: &[Value], indent: &str, out: &mut String) {
        // Content after "- " sits two columns to the right of the dash.
        let inner = format!("{}  ", indent);
        for item in items {
            out.push_str(indent);
            match item {
                Value::Object(doc) if !doc.is_empty() => {
                    out.push_str("- ");
                    for (i, (key, value)) in doc.iter().enumerate() {
                        if i > 0 {
                            out.push_str(&inner);
                        }
                        self.write_entry(key, value, &inner, out);
                    }
                }
                Value::Array(nested) if !nested.is_empty() => {
                    out.push_str("-\n");
                    self.write_sequence(nested, &inner, out);
                }
                scalar => {
                    out.push_str("- ");
                    out.push_str(&format_scalar(scalar));
                    out.push('\n');
                }
            }
        }
    }

    fn child_indent(&self, indent: &str) -> String {
        format!("{}{}", indent, self.options().indent_unit())
    }
}

impl Parser for YamlParser {
    fn name(&self) -> &'static str {
        NAME
    }

    fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    fn parse(&self, text: &str) -> Result<Document, Error> {
        let docs = YamlLoader::load_from_str(text).map_err(scan_error)?;
        match docs.into_iter().next() {
            None | Some(Yaml::Null) => Ok(Document::new()),
            Some(Yaml::Hash(hash)) => hash_to_document(hash),
            Some(_) => Err(Error::parse_error(
                NAME,
                "root must be a mapping",
                None,
            )),
        }
    }

    fn serialize(&self, document: &Document) -> Result<String, Error> {
        if document.is_empty() {
            return Ok("{}\n".to_string());
        }
        let mut out = String::new();
        self.write_mapping(document, "", &mut out);
        Ok(out)
    }

    fn navigate_to_key(
        &self,
        text: &str,
        key_path: &KeyPath,
        key_style: KeyStyle,
    ) -> Option<PositionRange> {
        resolve(text, YamlScanner::new, key_path, key_style)
    }
}

fn scan_error(error: ScanError) -> Error {
    let marker = error.marker();
    Error::parse_error(
        NAME,
        error.info(),
        Some(Location::new(marker.line(), marker.col() + 1)),
    )
}

fn hash_to_document(hash: yaml_rust2::yaml::Hash) -> Result<Document, Error> {
    let mut document = Document::new();
    for (key, value) in hash {
        document.insert(key_to_string(key)?, yaml_to_value(value)?);
    }
    Ok(document)
}

fn key_to_string(key: Yaml) -> Result<String, Error> {
    match key {
        Yaml::String(s) | Yaml::Real(s) => Ok(s),
        Yaml::Integer(i) => Ok(i.to_string()),
        Yaml::Boolean(b) => Ok(b.to_string()),
        Yaml::Null => Ok("null".to_string()),
        other => Err(Error::parse_error(
            NAME,
            format!("unsupported mapping key {:?}", other),
            None,
        )),
    }
}

fn yaml_to_value(yaml: Yaml) -> Result<Value, Error> {
    match yaml {
        Yaml::Real(ref s) => match yaml.as_f64() {
            Some(x) => Ok(Value::Float(x)),
            None => Err(Error::parse_error(
                NAME,
                format!("invalid float `{}`", s),
                None,
            )),
        },
        Yaml::Integer(i) => Ok(Value::Integer(i)),
        Yaml::String(s) => Ok(Value::String(s)),
        Yaml::Boolean(b) => Ok(Value::Bool(b)),
        Yaml::Null => Ok(Value::Null),
        Yaml::Array(items) => Ok(Value::Array(
            items
                .into_iter()
                .map(yaml_to_value)
                .collect::<Result<_, _>>()?,
        )),
        Yaml::Hash(hash) => Ok(Value::Object(hash_to_document(hash)?)),
        Yaml::Alias(_) => Err(Error::parse_error(NAME, "unresolved alias", None)),
        Yaml::BadValue => Err(Error::parse_error(NAME, "invalid value", None)),
    }
}

fn format_scalar(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Float(x) if x.is_nan() => ".nan".to_string(),
        Value::Float(x) if x.is_infinite() => {
            if *x > 0.0 { ".inf" } else { "-.inf" }.to_string()
        }
        Value::Float(x) => format!("{:?}", x),
        Value::String(s) => format_string(s),
        Value::Object(_) => "{}".to_string(),
        Value::Array(_) => "[]".to_string(),
    }
}

/// Emits `s` plain when it would read back as the same string, quoted otherwise.
fn format_string(s: &str) -> String {
    if needs_quotes(s) {
        double_quote(s)
    } else {
        s.to_string()
    }
}

fn needs_quotes(s: &str) -> bool {
    let Some(first) = s.chars().next() else {
        return true;
    };
    if !matches!(Yaml::from_str(s), Yaml::String(_)) {
        return true;
    }
    first.is_whitespace()
        || s.ends_with(char::is_whitespace)
        || "-?:,[]{}#&*!|>'\"%@`".contains(first)
        || s.contains(": ")
        || s.contains(" #")
        || s.ends_with(':')
        || s.chars().any(char::is_control)
}

fn double_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[derive(Default)]
struct EventLog {
    events: Vec<(Event, Marker)>,
}

impl MarkedEventReceiver for EventLog {
    fn on_event(&mut self, ev: Event, mark: Marker) {
        self.events.push((ev, mark));
    }
}

enum NodeKind {
    Scalar(String),
    Alias,
    Sequence(Vec<usize>),
    Mapping(Vec<(usize, usize)>),
}

struct Node {
    kind: NodeKind,
    span: Range<usize>,
}

/// Span index built from the event stream of the first document.
///
/// Spans are char offsets while building (that is what markers carry) and
/// are converted to byte offsets once at the end.
struct YamlScanner {
    nodes: Vec<Node>,
    containers: HashMap<(usize, usize), usize>,
    root: Option<usize>,
}

struct Frame {
    mapping: bool,
    flow: bool,
    start: usize,
    children: Vec<usize>,
}

struct Builder {
    chars: Vec<char>,
    nodes: Vec<Node>,
    stack: Vec<Frame>,
    root: Option<usize>,
    /// A block scalar whose end is only known once the next event arrives.
    pending_block: Option<usize>,
}

impl YamlScanner {
    fn new(text: &str) -> Self {
        let mut log = EventLog::default();
        let mut parser = EventParser::new_from_str(text);
        if let Err(error) = parser.load(&mut log, false) {
            trace!(%error, "yaml event stream ended early");
        }

        let mut builder = Builder {
            chars: text.chars().collect(),
            nodes: Vec::new(),
            stack: Vec::new(),
            root: None,
            pending_block: None,
        };
        builder.replay(log.events);

        let byte_at = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect::<Vec<_>>();
        let to_bytes = |span: &Range<usize>| {
            let last = byte_at.len() - 1;
            byte_at[span.start.min(last)]..byte_at[span.end.min(last)]
        };

        let mut nodes = builder.nodes;
        let mut containers = HashMap::new();
        for (idx, node) in nodes.iter_mut().enumerate() {
            node.span = to_bytes(&node.span);
            if matches!(node.kind, NodeKind::Mapping(_) | NodeKind::Sequence(_)) {
                containers
                    .entry((node.span.start, node.span.end))
                    .or_insert(idx);
            }
        }

        YamlScanner {
            nodes,
            containers,
            root: builder.root,
        }
    }

    fn span(&self, idx: usize) -> Range<usize> {
        self.nodes[idx].span.clone()
    }
}

impl Builder {
    fn replay(&mut self, events: Vec<(Event, Marker)>) {
        for (event, marker) in events {
            let at = marker.index().min(self.chars.len());
            if let Some(idx) = self.pending_block.take() {
                let start = self.nodes[idx].span.start;
                self.nodes[idx].span.end = self.trim_back(at, start);
            }
            match event {
                Event::Scalar(value, style, ..) => {
                    let end = match style {
                        TScalarStyle::SingleQuoted => self.quoted_end(at, '\''),
                        TScalarStyle::DoubleQuoted => self.quoted_end(at, '"'),
                        TScalarStyle::Literal | TScalarStyle::Folded => at,
                        _ if value.is_empty() => at,
                        _ => self.plain_end(at),
                    };
                    let idx = self.push_node(NodeKind::Scalar(value), at..end);
                    if matches!(style, TScalarStyle::Literal | TScalarStyle::Folded) {
                        self.pending_block = Some(idx);
                    }
                }
                Event::Alias(..) => {
                    let end = self.alias_end(at);
                    self.push_node(NodeKind::Alias, at..end);
                }
                Event::SequenceStart(..) => self.open(false, at),
                Event::MappingStart(..) => self.open(true, at),
                Event::SequenceEnd | Event::MappingEnd => self.close(Some(at)),
                Event::DocumentEnd if self.root.is_some() => break,
                Event::StreamEnd => break,
                _ => {}
            }
        }

        if let Some(idx) = self.pending_block.take() {
            let start = self.nodes[idx].span.start;
            self.nodes[idx].span.end = self.trim_back(self.chars.len(), start);
        }
        while !self.stack.is_empty() {
            self.close(None);
        }
    }

    fn open(&mut self, mapping: bool, at: usize) {
        let opener = if mapping { '{' } else { '[' };
        self.stack.push(Frame {
            mapping,
            flow: self.chars.get(at) == Some(&opener),
            start: at,
            children: Vec::new(),
        });
    }

    /// Pops the innermost container. `end_marker` is `None` when the stream
    /// stopped before the container was closed.
    fn close(&mut self, end_marker: Option<usize>) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        let last_child_end = frame
            .children
            .last()
            .map(|&idx| self.nodes[idx].span.end)
            .unwrap_or(frame.start);
        let end = if frame.flow {
            let closer = if frame.mapping { '}' } else { ']' };
            match end_marker {
                Some(at) if self.chars.get(at) == Some(&closer) => at + 1,
                Some(_) => last_child_end,
                None => self.chars.len(),
            }
        } else {
            last_child_end
        };
        let kind = if frame.mapping {
            NodeKind::Mapping(
                frame
                    .children
                    .chunks(2)
                    .filter(|pair| pair.len() == 2)
                    .map(|pair| (pair[0], pair[1]))
                    .collect(),
            )
        } else {
            NodeKind::Sequence(frame.children)
        };
        self.push_node(kind, frame.start..end);
    }

    fn push_node(&mut self, kind: NodeKind, span: Range<usize>) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(Node { kind, span });
        match self.stack.last_mut() {
            Some(frame) => frame.children.push(idx),
            None if self.root.is_none() => self.root = Some(idx),
            None => {}
        }
        idx
    }

    fn in_flow(&self) -> bool {
        self.stack.iter().any(|frame| frame.flow)
    }

    /// Plain scalars are located on their first line only.
    fn plain_end(&self, start: usize) -> usize {
        let chars = &self.chars;
        let in_flow = self.in_flow();
        let mut end = start;
        let mut i = start;
        while i < chars.len() {
            let c = chars[i];
            if c == '\n' || c == '\r' {
                break;
            }
            if c == '#' && i > start && chars[i - 1].is_whitespace() {
                break;
            }
            if c == ':' {
                let next = chars.get(i + 1);
                let ends_key = match next {
                    None => true,
                    Some(n) => n.is_whitespace() || (in_flow && FLOW_INDICATORS.contains(n)),
                };
                if ends_key {
                    break;
                }
            }
            if in_flow && FLOW_INDICATORS.contains(&c) {
                break;
            }
            i += 1;
            if !c.is_whitespace() {
                end = i;
            }
        }
        end
    }

    fn quoted_end(&self, start: usize, quote: char) -> usize {
        let chars = &self.chars;
        let mut i = start + 1;
        while i < chars.len() {
            let c = chars[i];
            if quote == '"' && c == '\\' {
                i += 2;
                continue;
            }
            if c == quote {
                if quote == '\'' && chars.get(i + 1) == Some(&'\'') {
                    i += 2;
                    continue;
                }
                return i + 1;
            }
            i += 1;
        }
        chars.len()
    }

    fn alias_end(&self, start: usize) -> usize {
        let chars = &self.chars;
        let mut i = start + 1;
        while i < chars.len() && !chars[i].is_whitespace() && !FLOW_INDICATORS.contains(&chars[i]) {
            i += 1;
        }
        i
    }

    fn trim_back(&self, mut pos: usize, floor: usize) -> usize {
        while pos > floor && self.chars[pos - 1].is_whitespace() {
            pos -= 1;
        }
        pos
    }
}

impl KeyScanner for YamlScanner {
    fn root(&self) -> Option<Range<usize>> {
        let root = self.root?;
        match self.nodes[root].kind {
            NodeKind::Mapping(_) | NodeKind::Sequence(_) => Some(self.span(root)),
            NodeKind::Scalar(_) | NodeKind::Alias => None,
        }
    }

    fn member(&self, container: Range<usize>, segment: &Segment) -> Option<Range<usize>> {
        let idx = *self.containers.get(&(container.start, container.end))?;
        match &self.nodes[idx].kind {
            NodeKind::Mapping(pairs) => pairs
                .iter()
                .find(|(key, _)| {
                    matches!(&self.nodes[*key].kind, NodeKind::Scalar(k) if segment.matches_key(k))
                })
                .map(|(_, value)| self.span(*value)),
            NodeKind::Sequence(items) => items.get(segment.as_index()?).map(|&i| self.span(i)),
            NodeKind::Scalar(_) | NodeKind::Alias => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ParserOptions;
    use indoc::indoc;

    fn locate<'a>(text: &'a str, path: &str, style: KeyStyle) -> Option<&'a str> {
        YamlParser::default()
            .navigate_to_key(text, &path.parse().unwrap(), style)
            .and_then(|range| range.slice(text))
    }

    #[test]
    fn test_parse_types_and_order() {
        let text = indoc! {"
            title: Hello
            count: 3
            ratio: 0.5
            enabled: true
            missing: ~
            quoted: '42'
            nested:
              b: x
              a: y
            list:
              - one
              - two
        "};
        let doc = YamlParser::default().parse(text).unwrap();
        assert_eq!(
            doc.keys().collect::<Vec<_>>(),
            vec!["title", "count", "ratio", "enabled", "missing", "quoted", "nested", "list"]
        );
        assert_eq!(doc.get_key("count"), Some(&Value::Integer(3)));
        assert_eq!(doc.get_key("ratio"), Some(&Value::Float(0.5)));
        assert_eq!(doc.get_key("enabled"), Some(&Value::Bool(true)));
        assert_eq!(doc.get_key("missing"), Some(&Value::Null));
        assert_eq!(doc.get_key("quoted"), Some(&Value::from("42")));
        let nested = doc.get_key("nested").and_then(Value::as_object).unwrap();
        assert_eq!(nested.keys().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn test_parse_empty_and_invalid() {
        assert!(YamlParser::default().parse("").unwrap().is_empty());
        assert!(YamlParser::default().parse("# only a comment\n").unwrap().is_empty());

        let error = YamlParser::default().parse("- a\n- b\n").unwrap_err();
        assert!(error.to_string().contains("root must be a mapping"));

        let error = YamlParser::default().parse("a: \"open\nb: c").unwrap_err();
        assert!(matches!(error, Error::Parse { ref backend, .. } if backend == "yaml"));
        assert!(error.location().is_some());
    }

    #[test]
    fn test_dump_nested_and_sequences() {
        let text = indoc! {"
            app:
              title: Hello
              items:
                - one
                - name: two
                  tags:
                    - x
            empty: {}
        "};
        let parser = YamlParser::default();
        let doc = parser.parse(text).unwrap();
        assert_eq!(parser.dump(&doc, false).unwrap(), text);
    }

    #[test]
    fn test_dump_quotes_ambiguous_strings() {
        let mut doc = Document::new();
        doc.insert("yes_string", "true");
        doc.insert("number_string", "12");
        doc.insert("colon", "a: b");
        doc.insert("multi", "line\nbreak");
        doc.insert("empty", "");
        doc.insert("true", "key needs quotes");
        let parser = YamlParser::default();
        let dumped = parser.dump(&doc, false).unwrap();
        assert!(dumped.contains("yes_string: \"true\"\n"));
        assert!(dumped.contains("number_string: \"12\"\n"));
        assert!(dumped.contains("multi: \"line\\nbreak\"\n"));
        assert!(dumped.contains("\"true\": key needs quotes\n"));
        assert_eq!(parser.parse(&dumped).unwrap(), doc);
    }

    #[test]
    fn test_dump_honors_indent() {
        let parser = YamlParser::with_config(
            ParserConfig::new().with_options(ParserOptions::new().with_indent(4)),
        )
        .unwrap();
        let doc = parser.parse("a:\n  b: c\n").unwrap();
        assert_eq!(parser.dump(&doc, false).unwrap(), "a:\n    b: c\n");
    }

    #[test]
    fn test_config_rejects_tabs_and_zero_indent() {
        let tabs = ParserConfig::new().with_options(ParserOptions::new().with_tab("\t"));
        assert!(matches!(
            YamlParser::with_config(tabs),
            Err(Error::Configuration(_))
        ));
        let zero = ParserConfig::new().with_options(ParserOptions::new().with_indent(0));
        assert!(matches!(
            YamlParser::with_config(zero),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_navigate_block_nested() {
        let text = indoc! {"
            a:
              b:
                c: hello
                d: 'it''s'
              e: \"quoted # not a comment\"
            f: plain value # trailing comment
        "};
        assert_eq!(locate(text, "a.b.c", KeyStyle::Nested), Some("hello"));
        assert_eq!(locate(text, "a.b.d", KeyStyle::Nested), Some("'it''s'"));
        assert_eq!(
            locate(text, "a.e", KeyStyle::Nested),
            Some("\"quoted # not a comment\"")
        );
        assert_eq!(locate(text, "f", KeyStyle::Nested), Some("plain value"));
        assert_eq!(
            locate(text, "a.b", KeyStyle::Nested),
            Some("c: hello\n    d: 'it''s'")
        );
        assert_eq!(locate(text, "a.b.x", KeyStyle::Nested), None);
        assert_eq!(locate(text, "c", KeyStyle::Nested), None);
    }

    #[test]
    fn test_navigate_flow_nested() {
        let text = "{a: {b: {c: hello}}, list: [x, {k: v}]}";
        assert_eq!(locate(text, "a.b.c", KeyStyle::Nested), Some("hello"));
        assert_eq!(locate(text, "a.b", KeyStyle::Nested), Some("{c: hello}"));
        assert_eq!(locate(text, "list.0", KeyStyle::Nested), Some("x"));
        assert_eq!(locate(text, "list[1].k", KeyStyle::Nested), Some("v"));
        assert_eq!(locate(text, "a.b.x", KeyStyle::Nested), None);
    }

    #[test]
    fn test_navigate_flat_and_first_match() {
        let text = indoc! {"
            \"a.b.c\": hello
            dup: first
            dup: second
        "};
        assert_eq!(locate(text, "a.b.c", KeyStyle::Flat), Some("hello"));
        assert_eq!(locate(text, "a.b.c", KeyStyle::Nested), None);
        assert_eq!(locate(text, "dup", KeyStyle::Flat), Some("first"));
    }

    #[test]
    fn test_navigate_block_sequences_and_scalars() {
        let text = indoc! {"
            steps:
              - first
              - name: second
            message: |
              line one
              line two
            after: done
        "};
        assert_eq!(locate(text, "steps.0", KeyStyle::Nested), Some("first"));
        assert_eq!(locate(text, "steps.1.name", KeyStyle::Nested), Some("second"));
        assert_eq!(locate(text, "steps.2", KeyStyle::Nested), None);
        assert_eq!(
            locate(text, "message", KeyStyle::Nested),
            Some("|\n  line one\n  line two")
        );
        assert_eq!(locate(text, "after", KeyStyle::Nested), Some("done"));
    }

    #[test]
    fn test_navigate_partial_document() {
        let text = "title: Hello\nmenu:\n  open: \"Open";
        assert_eq!(locate(text, "title", KeyStyle::Nested), Some("Hello"));
        assert_eq!(locate(text, "missing", KeyStyle::Nested), None);
        assert_eq!(locate("just a scalar", "a", KeyStyle::Nested), None);
        assert_eq!(locate("", "a", KeyStyle::Nested), None);
    }

    #[test]
    fn test_only_first_document_counts() {
        let text = indoc! {"
            ---
            title: first
            menu:
              open: Open
            ---
            title: second
            extra: only here
        "};
        assert_eq!(locate(text, "title", KeyStyle::Nested), Some("first"));
        assert_eq!(locate(text, "menu.open", KeyStyle::Nested), Some("Open"));
        assert_eq!(locate(text, "extra", KeyStyle::Nested), None);

        let doc = YamlParser::default().parse(text).unwrap();
        assert_eq!(doc.get_key("title"), Some(&Value::from("first")));
        assert!(!doc.contains_key("extra"));
    }
}
