//! All error types for the langdoc crate.
//!
//! These are returned from every fallible operation (construction, loading,
//! parsing, dumping, saving). A key that cannot be found is never an error:
//! lookups and navigation return `Option` instead.

use std::fmt::{Display, Formatter};

use thiserror::Error;

/// A 1-based line/column pair pointing into the source text of a failed parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(line: usize, column: usize) -> Self {
        Location { line, column }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{backend} parse error{}: {message}", fmt_location(.location))]
    Parse {
        backend: String,
        message: String,
        location: Option<Location>,
    },

    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("unknown format `{0}`")]
    UnknownFormat(String),

    #[error("invalid data: {0}")]
    DataMismatch(String),

    #[error("invalid key path `{path}`: {reason}")]
    InvalidKeyPath { path: String, reason: String },
}

fn fmt_location(location: &Option<Location>) -> String {
    match location {
        Some(location) => format!(" at {}", location),
        None => String::new(),
    }
}

impl Error {
    /// Creates a parse error attributed to `backend`.
    pub fn parse_error(
        backend: impl Into<String>,
        message: impl Into<String>,
        location: Option<Location>,
    ) -> Self {
        Error::Parse {
            backend: backend.into(),
            message: message.into(),
            location,
        }
    }

    /// Creates a new configuration error
    pub fn configuration_error(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }

    /// Location of a parse error, if the backend could determine one.
    pub fn location(&self) -> Option<Location> {
        match self {
            Error::Parse { location, .. } => *location,
            _ => None,
        }
    }
}
