//! All supported localization file formats.
//!
//! Each backend lives in its own module. [`FormatType`] names them and
//! [`Backend`] wraps any of them behind one concrete type, which is what the
//! [`crate::registry::Registry`] stores.

pub mod json;
pub mod properties;
pub mod yaml;

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

pub use json::JsonParser;
pub use properties::PropertiesParser;
pub use yaml::YamlParser;

use crate::{
    descriptor::Descriptor,
    error::Error,
    keypath::{KeyPath, KeyStyle},
    options::ParserConfig,
    traits::Parser,
    types::{Document, PositionRange},
};

/// Names a supported file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatType {
    Json,
    Yaml,
    Properties,
}

/// Implements [`std::fmt::Display`] for [`FormatType`].
///
/// # Example
/// ```rust
/// use langdoc::formats::FormatType;
/// assert_eq!(FormatType::Json.to_string(), "json");
/// assert_eq!(FormatType::Properties.to_string(), "properties");
/// ```
impl Display for FormatType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatType::Json => write!(f, "json"),
            FormatType::Yaml => write!(f, "yaml"),
            FormatType::Properties => write!(f, "properties"),
        }
    }
}

/// Accepts format names and common extensions, case-insensitively.
///
/// Returns [`Error::UnknownFormat`] for anything else.
///
/// # Example
/// ```rust
/// use langdoc::formats::FormatType;
/// use std::str::FromStr;
/// assert_eq!(FormatType::from_str("YML").unwrap(), FormatType::Yaml);
/// assert!(FormatType::from_str("xliff").is_err());
/// ```
impl FromStr for FormatType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "json" => Ok(FormatType::Json),
            "yaml" | "yml" => Ok(FormatType::Yaml),
            "properties" | "java-properties" => Ok(FormatType::Properties),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}

impl FormatType {
    /// Returns the typical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            FormatType::Json => "json",
            FormatType::Yaml => "yaml",
            FormatType::Properties => "properties",
        }
    }

    /// All formats in default registration order.
    pub fn all() -> [FormatType; 3] {
        [FormatType::Json, FormatType::Yaml, FormatType::Properties]
    }
}

/// One backend of any supported format.
#[derive(Debug, Clone)]
pub enum Backend {
    Json(JsonParser),
    Yaml(YamlParser),
    Properties(PropertiesParser),
}

impl Backend {
    /// The backend for `format` with its default configuration.
    pub fn new(format: FormatType) -> Self {
        match format {
            FormatType::Json => Backend::Json(JsonParser::default()),
            FormatType::Yaml => Backend::Yaml(YamlParser::default()),
            FormatType::Properties => Backend::Properties(PropertiesParser::default()),
        }
    }

    /// The backend for `format` built from `config`.
    pub fn with_config(format: FormatType, config: ParserConfig) -> Result<Self, Error> {
        Ok(match format {
            FormatType::Json => Backend::Json(JsonParser::with_config(config)?),
            FormatType::Yaml => Backend::Yaml(YamlParser::with_config(config)?),
            FormatType::Properties => Backend::Properties(PropertiesParser::with_config(config)?),
        })
    }

    pub fn format_type(&self) -> FormatType {
        match self {
            Backend::Json(_) => FormatType::Json,
            Backend::Yaml(_) => FormatType::Yaml,
            Backend::Properties(_) => FormatType::Properties,
        }
    }
}

impl From<JsonParser> for Backend {
    fn from(parser: JsonParser) -> Self {
        Backend::Json(parser)
    }
}

impl From<YamlParser> for Backend {
    fn from(parser: YamlParser) -> Self {
        Backend::Yaml(parser)
    }
}

impl From<PropertiesParser> for Backend {
    fn from(parser: PropertiesParser) -> Self {
        Backend::Properties(parser)
    }
}

impl Parser for Backend {
    fn name(&self) -> &'static str {
        match self {
            Backend::Json(p) => p.name(),
            Backend::Yaml(p) => p.name(),
            Backend::Properties(p) => p.name(),
        }
    }

    fn descriptor(&self) -> &Descriptor {
        match self {
            Backend::Json(p) => p.descriptor(),
            Backend::Yaml(p) => p.descriptor(),
            Backend::Properties(p) => p.descriptor(),
        }
    }

    fn parse(&self, text: &str) -> Result<Document, Error> {
        match self {
            Backend::Json(p) => p.parse(text),
            Backend::Yaml(p) => p.parse(text),
            Backend::Properties(p) => p.parse(text),
        }
    }

    fn serialize(&self, document: &Document) -> Result<String, Error> {
        match self {
            Backend::Json(p) => p.serialize(document),
            Backend::Yaml(p) => p.serialize(document),
            Backend::Properties(p) => p.serialize(document),
        }
    }

    fn navigate_to_key(
        &self,
        text: &str,
        key_path: &KeyPath,
        key_style: KeyStyle,
    ) -> Option<PositionRange> {
        match self {
            Backend::Json(p) => p.navigate_to_key(text, key_path, key_style),
            Backend::Yaml(p) => p.navigate_to_key(text, key_path, key_style),
            Backend::Properties(p) => p.navigate_to_key(text, key_path, key_style),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_type_display() {
        assert_eq!(FormatType::Json.to_string(), "json");
        assert_eq!(FormatType::Yaml.to_string(), "yaml");
        assert_eq!(FormatType::Properties.to_string(), "properties");
    }

    #[test]
    fn test_format_type_from_str() {
        assert_eq!(FormatType::from_str("JSON").unwrap(), FormatType::Json);
        assert_eq!(FormatType::from_str(" yml ").unwrap(), FormatType::Yaml);
        assert_eq!(
            FormatType::from_str("java-properties").unwrap(),
            FormatType::Properties
        );
        match FormatType::from_str("xliff") {
            Err(Error::UnknownFormat(name)) => assert_eq!(name, "xliff"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_format_type_extension_is_supported_by_its_backend() {
        for format in FormatType::all() {
            let backend = Backend::new(format);
            assert!(backend.supports(format.extension()));
            assert_eq!(backend.format_type(), format);
            assert_eq!(backend.name(), format.to_string());
        }
    }

    #[test]
    fn test_backend_delegates() {
        let backend = Backend::new(FormatType::Json);
        let doc = backend.parse(r#"{"a": {"b": "c"}}"#).unwrap();
        assert_eq!(backend.dump(&doc, false).unwrap(), "{\n  \"a\": {\n    \"b\": \"c\"\n  }\n}\n");
        assert_eq!(
            backend.navigate_to_key(r#"{"a": 1}"#, &"a".parse().unwrap(), KeyStyle::Nested),
            Some(PositionRange::new(6, 7))
        );
        assert_eq!(backend.language_ids(), ["json".to_string()]);
    }

    #[test]
    fn test_backend_with_config() {
        let config = ParserConfig::new().with_readonly(true);
        let backend = Backend::with_config(FormatType::Yaml, config).unwrap();
        assert!(backend.is_readonly());
        assert!(matches!(
            backend.dump(&Document::new(), false),
            Err(Error::UnsupportedOperation(_))
        ));
    }
}
