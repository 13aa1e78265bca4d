use std::path::Path;

use langdoc::{Backend, Error, ParserConfig, ParserOptions, Registry};

/// Picks the backend for `path` by extension and applies `options` to it.
///
/// Only the selected backend is rebuilt, so options that one format rejects
/// (tabs in YAML) do not affect files of another format.
pub fn backend_for(path: &Path, options: Option<ParserOptions>) -> Result<Backend, Error> {
    let registry = Registry::default();
    let backend = registry.backend_for_path(path)?;
    match options {
        None => Ok(backend.clone()),
        Some(options) => Backend::with_config(
            backend.format_type(),
            ParserConfig::new().with_options(options),
        ),
    }
}
