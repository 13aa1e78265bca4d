//! The format-independent half of key navigation.
//!
//! Backends expose their raw-text grammar through [`KeyScanner`]; [`resolve`]
//! walks a key-path over it. In nested style each segment is looked up inside
//! the span found for the previous one, so the search window narrows at every
//! step. In flat style the joined path is looked up once among the root
//! members. Either way the first match in document order wins.
//!
//! A leading byte order mark is hidden from the scanner, but the returned
//! range still counts it, so it indexes the text exactly as supplied.

use std::ops::Range;

use tracing::trace;

use crate::{
    keypath::{KeyPath, KeyStyle, Segment},
    types::PositionRange,
};

/// A grammar-aware view over raw text. All spans are byte ranges.
pub(crate) trait KeyScanner {
    /// Span of the top-level container, if the text has one.
    fn root(&self) -> Option<Range<usize>>;

    /// Span of the value of the first direct member of `container` that
    /// matches `segment`.
    fn member(&self, container: Range<usize>, segment: &Segment) -> Option<Range<usize>>;
}

const BOM: char = '\u{feff}';

/// Builds a scanner over `text` (minus any BOM) with `scan` and walks
/// `key_path` over it.
pub(crate) fn resolve<'t, S, F>(
    text: &'t str,
    scan: F,
    key_path: &KeyPath,
    key_style: KeyStyle,
) -> Option<PositionRange>
where
    S: KeyScanner,
    F: FnOnce(&'t str) -> S,
{
    if key_path.is_empty() {
        return None;
    }
    let body = text.strip_prefix(BOM).unwrap_or(text);
    let skipped = text.len() - body.len();
    let scanner = scan(body);
    let root = scanner.root()?;
    let span = match key_style {
        KeyStyle::Flat => scanner.member(root, &Segment::Key(key_path.joined()))?,
        KeyStyle::Nested => {
            let mut window = root;
            for segment in key_path.segments() {
                window = scanner.member(window, segment)?;
                trace!(%segment, start = window.start, end = window.end, "narrowed window");
            }
            window
        }
    };
    Some(PositionRange::from_byte_range(
        text,
        span.start + skipped..span.end + skipped,
    ))
}
