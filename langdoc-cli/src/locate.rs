use langdoc::{KeyPath, KeyStyle, Parser, PositionRange};
use serde::Serialize;

/// Where a key's value sits in a file, as printed by `langdoc locate`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocateReport {
    pub key: String,
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
    pub text: String,
}

impl LocateReport {
    fn new(key_path: &KeyPath, range: PositionRange, text: &str) -> Self {
        let (line, column) = range.line_col(text);
        LocateReport {
            key: key_path.to_string(),
            start: range.start,
            end: range.end,
            line,
            column,
            text: range.slice(text).unwrap_or_default().to_string(),
        }
    }

    /// `start..end (line L, column C)` followed by the source slice.
    pub fn to_text(&self) -> String {
        format!(
            "{}..{} (line {}, column {})\n{}",
            self.start, self.end, self.line, self.column, self.text
        )
    }
}

/// Locates `key_path` in `text` with `parser`. `None` when the key is absent.
pub fn locate<P: Parser>(
    parser: &P,
    text: &str,
    key_path: &KeyPath,
    key_style: KeyStyle,
) -> Option<LocateReport> {
    let range = parser.navigate_to_key(text, key_path, key_style)?;
    Some(LocateReport::new(key_path, range, text))
}
