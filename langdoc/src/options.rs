//! Formatting options applied by backends when dumping a document, and the
//! construction-time configuration of a backend.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Dump-time formatting preferences. Never consulted by `parse`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Number of `tab` units per nesting level. `0` requests compact output
    /// where the format has one.
    pub indent: usize,
    /// The indentation unit, made of spaces and/or tab characters.
    pub tab: String,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            indent: 2,
            tab: " ".to_string(),
        }
    }
}

impl ParserOptions {
    /// Creates default options (two spaces).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the indent width.
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Sets the indentation unit.
    pub fn with_tab(mut self, tab: impl Into<String>) -> Self {
        self.tab = tab.into();
        self
    }

    /// The string emitted for a single nesting level.
    pub fn indent_unit(&self) -> String {
        self.tab.repeat(self.indent)
    }

    /// Checks the options independently of any backend.
    pub fn validate(&self) -> Result<(), Error> {
        if self.tab.is_empty() {
            return Err(Error::configuration_error("tab must not be empty"));
        }
        if !self.tab.chars().all(|c| c == ' ' || c == '\t') {
            return Err(Error::configuration_error(format!(
                "tab must contain only spaces or tabs, got {:?}",
                self.tab
            )));
        }
        Ok(())
    }
}

/// Construction-time settings for a backend.
///
/// Anything left unset falls back to the backend's built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Overrides the backend's extension pattern (a regular expression).
    pub supported_exts: Option<String>,
    /// Formatting used by `dump`.
    pub options: ParserOptions,
    /// Marks the backend as read-only: `dump` and `save` are rejected.
    pub readonly: bool,
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_supported_exts(mut self, pattern: impl Into<String>) -> Self {
        self.supported_exts = Some(pattern.into());
        self
    }

    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }
}
