//! Optional `langdoc.toml` project configuration.
//!
//! ```toml
//! key_style = "flat"
//!
//! [format]
//! indent = 4
//! tab = " "
//! sort_keys = true
//! ```
//!
//! Every field is optional. Command-line flags take precedence over the file.

use std::{
    fs,
    path::{Path, PathBuf},
};

use langdoc::{Error, KeyStyle, ParserOptions};
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "langdoc.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub key_style: Option<KeyStyle>,
    pub format: FormatSection,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormatSection {
    pub indent: Option<usize>,
    pub tab: Option<String>,
    pub sort_keys: Option<bool>,
}

impl CliConfig {
    /// Loads `explicit` when given, otherwise `./langdoc.toml` if it exists.
    ///
    /// An explicit path that cannot be read is an error; a missing default
    /// file is not.
    pub fn load(explicit: Option<&Path>) -> Result<Self, Error> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.is_file() {
                    return Ok(CliConfig::default());
                }
                default
            }
        };
        debug!(path = %path.display(), "reading configuration");
        let text = fs::read_to_string(&path)?;
        toml::from_str(&text).map_err(|e: toml::de::Error| {
            Error::configuration_error(format!("{}: {}", path.display(), e.message()))
        })
    }

    pub fn parse(text: &str) -> Result<Self, Error> {
        toml::from_str(text).map_err(|e| Error::configuration_error(e.message().to_string()))
    }

    /// The key style from `flag`, then the file, then the default.
    pub fn key_style(&self, flag: Option<KeyStyle>) -> KeyStyle {
        flag.or(self.key_style).unwrap_or_default()
    }

    pub fn sort_keys(&self, flag: bool) -> bool {
        flag || self.format.sort_keys.unwrap_or(false)
    }

    /// Dump options with flags layered over the file. `None` when neither
    /// sets anything, so backends keep their own defaults.
    pub fn parser_options(&self, indent: Option<usize>, tab: Option<String>) -> Option<ParserOptions> {
        let indent = indent.or(self.format.indent);
        let tab = tab.or_else(|| self.format.tab.clone());
        if indent.is_none() && tab.is_none() {
            return None;
        }
        let mut options = ParserOptions::new();
        if let Some(indent) = indent {
            options = options.with_indent(indent);
        }
        if let Some(tab) = tab {
            options = options.with_tab(tab);
        }
        Some(options)
    }
}
