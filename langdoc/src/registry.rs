//! Ordered collection of backends with first-match selection.
//!
//! The registry picks a backend for a path by its extension and fronts the
//! common load/save/navigate flow so callers never pick a backend by hand.

use std::path::Path;

use tracing::debug;

use crate::{
    error::Error,
    formats::{Backend, FormatType},
    keypath::{KeyPath, KeyStyle},
    traits::Parser,
    types::{Document, PositionRange},
};

/// Backends in registration order. The first one whose pattern accepts an
/// extension handles it.
#[derive(Debug, Clone)]
pub struct Registry {
    backends: Vec<Backend>,
}

impl Default for Registry {
    /// JSON, YAML and properties, in that order, with default configuration.
    fn default() -> Self {
        Registry {
            backends: FormatType::all().into_iter().map(Backend::new).collect(),
        }
    }
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Registry {
            backends: Vec::new(),
        }
    }

    /// Appends a backend. Earlier registrations take precedence.
    pub fn register(&mut self, backend: impl Into<Backend>) -> &mut Self {
        self.backends.push(backend.into());
        self
    }

    pub fn backends(&self) -> &[Backend] {
        &self.backends
    }

    pub fn find_by_extension(&self, ext: &str) -> Option<&Backend> {
        self.backends.iter().find(|backend| backend.supports(ext))
    }

    /// Selects a backend from the extension of `path`. Paths without an
    /// extension match nothing.
    pub fn find_by_path<P: AsRef<Path>>(&self, path: P) -> Option<&Backend> {
        let ext = path.as_ref().extension().and_then(|s| s.to_str())?;
        self.find_by_extension(ext)
    }

    /// Selects the first backend that declares `language_id` (case-insensitive).
    pub fn find_by_language_id(&self, language_id: &str) -> Option<&Backend> {
        self.backends.iter().find(|backend| {
            backend
                .language_ids()
                .iter()
                .any(|id| id.eq_ignore_ascii_case(language_id))
        })
    }

    /// Like [`Registry::find_by_path`], but a miss is an
    /// [`Error::UnsupportedFormat`].
    pub fn backend_for_path<P: AsRef<Path>>(&self, path: P) -> Result<&Backend, Error> {
        let path = path.as_ref();
        let backend = self.find_by_path(path).ok_or_else(|| {
            Error::UnsupportedFormat(format!(
                "no backend handles `{}`",
                path.display()
            ))
        })?;
        debug!(path = %path.display(), backend = backend.name(), "selected backend");
        Ok(backend)
    }

    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Document, Error> {
        let path = path.as_ref();
        self.backend_for_path(path)?.load(path)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P, document: &Document, sort: bool) -> Result<(), Error> {
        let path = path.as_ref();
        self.backend_for_path(path)?.save(path, document, sort)
    }

    /// Locates `key_path` in `text`, which holds the contents of `path`.
    ///
    /// `None` when no backend handles the path or the key is not found.
    pub fn navigate<P: AsRef<Path>>(
        &self,
        path: P,
        text: &str,
        key_path: &KeyPath,
        key_style: KeyStyle,
    ) -> Option<PositionRange> {
        self.find_by_path(path)?
            .navigate_to_key(text, key_path, key_style)
    }
}
