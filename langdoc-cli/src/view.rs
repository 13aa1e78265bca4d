use langdoc::{Document, KeyStyle, Value};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Values wider than this many terminal columns are truncated unless `--full`.
pub const MAX_VALUE_WIDTH: usize = 50;

/// Lists `document` as `key = value` lines.
///
/// Nested style shows one line per leaf under its dotted path; flat style
/// shows root keys verbatim with containers rendered as JSON.
pub fn render_view(document: &Document, key_style: KeyStyle, full: bool) -> Vec<String> {
    let entries: Vec<(String, &Value)> = match key_style {
        KeyStyle::Nested => document.flatten(),
        KeyStyle::Flat => document.iter().map(|(k, v)| (k.clone(), v)).collect(),
    };
    entries
        .into_iter()
        .map(|(key, value)| {
            let value = value.to_string();
            let value = if full {
                value
            } else {
                truncate(&value, MAX_VALUE_WIDTH)
            };
            format!("{} = {}", key, value)
        })
        .collect()
}

/// Cuts `value` to at most `max_width` display columns, marking the cut with `...`.
pub fn truncate(value: &str, max_width: usize) -> String {
    if value.width() <= max_width {
        return value.to_string();
    }
    let mut out = String::new();
    let mut width = 0;
    for c in value.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > max_width {
            break;
        }
        width += w;
        out.push(c);
    }
    out.push_str("...");
    out
}

pub fn print_view(document: &Document, key_style: KeyStyle, full: bool) {
    for line in render_view(document, key_style, full) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        let mut menu = Document::new();
        menu.insert("open", "Open");
        let mut doc = Document::new();
        doc.insert("menu", menu);
        doc.insert("a.b", "flat");
        doc
    }

    #[test]
    fn test_render_nested_and_flat() {
        assert_eq!(
            render_view(&sample(), KeyStyle::Nested, false),
            vec!["menu.open = Open", "a.b = flat"]
        );
        assert_eq!(
            render_view(&sample(), KeyStyle::Flat, false),
            vec![r#"menu = {"open":"Open"}"#, "a.b = flat"]
        );
    }

    #[test]
    fn test_truncate_counts_columns() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefgh", 4), "abcd...");
        // Each CJK character is two columns wide.
        assert_eq!(truncate("日本語テキスト", 5), "日本...");
    }

    #[test]
    fn test_full_disables_truncation() {
        let mut doc = Document::new();
        doc.insert("long", "x".repeat(80));
        assert_eq!(render_view(&doc, KeyStyle::Nested, true)[0].len(), 80 + "long = ".len());
        assert!(render_view(&doc, KeyStyle::Nested, false)[0].ends_with("..."));
    }
}
