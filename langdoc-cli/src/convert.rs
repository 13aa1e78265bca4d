use std::path::Path;

use langdoc::{Document, Error, KeyStyle, Parser, ParserOptions};
use tracing::info;

use crate::backends::backend_for;

/// Rewrites the key layout of `document`. `None` leaves it as parsed.
pub fn restyle(document: Document, key_style: Option<KeyStyle>) -> Result<Document, Error> {
    match key_style {
        None => Ok(document),
        Some(KeyStyle::Flat) => Ok(document.to_flat()),
        Some(KeyStyle::Nested) => document.to_nested(),
    }
}

/// Loads `input` and saves it back to `output` (or in place) with `options`.
pub fn run_format_command(
    input: &Path,
    output: Option<&Path>,
    options: Option<ParserOptions>,
    sort: bool,
) -> Result<(), Error> {
    let document = backend_for(input, None)?.load(input)?;
    let target = output.unwrap_or(input);
    backend_for(target, options)?.save(target, &document, sort)?;
    info!(input = %input.display(), output = %target.display(), sort, "formatted");
    Ok(())
}

/// Loads `input` in its format and writes it to `output` in the format
/// implied by the output extension.
pub fn run_convert_command(
    input: &Path,
    output: &Path,
    options: Option<ParserOptions>,
    sort: bool,
    key_style: Option<KeyStyle>,
) -> Result<(), Error> {
    let source = backend_for(input, None)?;
    let target = backend_for(output, options)?;
    let document = restyle(source.load(input)?, key_style)?;
    target.save(output, &document, sort)?;
    info!(
        input = %input.display(),
        output = %output.display(),
        from = source.name(),
        to = target.name(),
        "converted"
    );
    Ok(())
}
