//! The contract every format backend implements.

use std::{
    fs,
    io::{self, Write},
    path::Path,
};

use tracing::debug;

use crate::{
    descriptor::Descriptor,
    error::Error,
    keypath::{KeyPath, KeyStyle},
    options::ParserOptions,
    types::{Document, PositionRange},
};

/// A format backend: parses text into a [`Document`], dumps it back, and
/// locates key-paths in raw text.
///
/// Implementors supply `parse`, `serialize` and `navigate_to_key`; extension
/// matching, readonly enforcement, sorting and file I/O are shared.
///
/// # Example
///
/// ```rust,no_run
/// use langdoc::{formats::JsonParser, traits::Parser};
/// let parser = JsonParser::default();
/// let document = parser.load("locales/en.json")?;
/// parser.save("locales/en.sorted.json", &document, true)?;
/// Ok::<(), langdoc::Error>(())
/// ```
pub trait Parser {
    /// Short backend identity used in errors and logs.
    fn name(&self) -> &'static str;

    fn descriptor(&self) -> &Descriptor;

    /// Converts raw text into a tree. Malformed input is a `Parse` error.
    fn parse(&self, text: &str) -> Result<Document, Error>;

    /// Renders `document` in this format, in the document's own key order.
    fn serialize(&self, document: &Document) -> Result<String, Error>;

    /// Locates the value of `key_path` in `text` by scanning the raw text.
    ///
    /// Returns `None` when the key is absent or the text is too broken to
    /// reach it. Never fails.
    fn navigate_to_key(
        &self,
        text: &str,
        key_path: &KeyPath,
        key_style: KeyStyle,
    ) -> Option<PositionRange>;

    fn supports(&self, ext: &str) -> bool {
        self.descriptor().supports(ext)
    }

    fn is_readonly(&self) -> bool {
        self.descriptor().is_readonly()
    }

    fn options(&self) -> &ParserOptions {
        self.descriptor().options()
    }

    fn language_ids(&self) -> &[String] {
        self.descriptor().language_ids()
    }

    /// Serializes `document`, sorting keys lexicographically when `sort` is set.
    ///
    /// Rejected with `UnsupportedOperation` on readonly backends.
    fn dump(&self, document: &Document, sort: bool) -> Result<String, Error> {
        if self.is_readonly() {
            return Err(Error::UnsupportedOperation(format!(
                "{} backend is readonly and cannot dump documents",
                self.name()
            )));
        }
        if sort {
            self.serialize(&document.sorted())
        } else {
            self.serialize(document)
        }
    }

    /// Reads `path` as UTF-8 (a leading BOM is dropped) and parses it.
    fn load<P: AsRef<Path>>(&self, path: P) -> Result<Document, Error>
    where
        Self: Sized,
    {
        let path = path.as_ref();
        debug!(backend = self.name(), path = %path.display(), "loading document");
        let bytes = fs::read(path)?;
        let text = decode_utf8(&bytes)?;
        self.parse(&text)
    }

    /// Dumps `document` and replaces the contents of `path` with it.
    ///
    /// The text is fully rendered before the file is touched and is written
    /// through a temporary file in the same directory, so a failure leaves the
    /// previous contents intact.
    fn save<P: AsRef<Path>>(&self, path: P, document: &Document, sort: bool) -> Result<(), Error>
    where
        Self: Sized,
    {
        let path = path.as_ref();
        if self.is_readonly() {
            return Err(Error::UnsupportedOperation(format!(
                "{} backend is readonly, refusing to write {}",
                self.name(),
                path.display()
            )));
        }
        let text = self.dump(document, sort)?;
        debug!(
            backend = self.name(),
            path = %path.display(),
            bytes = text.len(),
            sort,
            "saving document"
        );
        write_atomically(path, text.as_bytes())
    }
}

fn decode_utf8(bytes: &[u8]) -> Result<String, Error> {
    let (text, had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(bytes);
    if had_errors {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::InvalidData,
            "file is not valid UTF-8",
        )));
    }
    Ok(text.into_owned())
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), Error> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    if let Ok(metadata) = fs::metadata(path) {
        temp.as_file().set_permissions(metadata.permissions())?;
    }
    temp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
