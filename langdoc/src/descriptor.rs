//! Immutable per-backend configuration: language ids, extension pattern,
//! formatting options and the readonly capability flag.

use regex::{Regex, RegexBuilder};

use crate::{
    error::Error,
    options::{ParserConfig, ParserOptions},
};

/// Describes a backend instance. Built once and never mutated.
#[derive(Debug, Clone)]
pub struct Descriptor {
    language_ids: Vec<String>,
    supported_exts: String,
    pattern: Regex,
    options: ParserOptions,
    readonly: bool,
}

impl Descriptor {
    /// Compiles `supported_exts` and validates `options`.
    ///
    /// The pattern is matched case-insensitively against a bare extension
    /// (`json`, not `.json`). An invalid pattern or invalid options fail here
    /// rather than on first use.
    pub fn new(
        language_ids: &[&str],
        supported_exts: &str,
        options: ParserOptions,
        readonly: bool,
    ) -> Result<Self, Error> {
        let pattern = compile_pattern(supported_exts)?;
        options.validate()?;
        Ok(Descriptor {
            language_ids: language_ids.iter().map(|id| id.to_string()).collect(),
            supported_exts: supported_exts.to_string(),
            pattern,
            options,
            readonly,
        })
    }

    /// Builds a descriptor from `config`, falling back to `default_exts` when
    /// the config does not override the extension pattern.
    pub fn from_config(
        language_ids: &[&str],
        default_exts: &str,
        config: ParserConfig,
    ) -> Result<Self, Error> {
        let exts = config
            .supported_exts
            .unwrap_or_else(|| default_exts.to_string());
        Descriptor::new(language_ids, &exts, config.options, config.readonly)
    }

    /// Builds a descriptor around an already compiled pattern with default
    /// options. Used for the built-in backends, whose patterns are static.
    pub(crate) fn with_pattern(language_ids: &[&str], pattern: &Regex) -> Self {
        Descriptor {
            language_ids: language_ids.iter().map(|id| id.to_string()).collect(),
            supported_exts: pattern.as_str().to_string(),
            pattern: pattern.clone(),
            options: ParserOptions::default(),
            readonly: false,
        }
    }

    pub fn language_ids(&self) -> &[String] {
        &self.language_ids
    }

    /// The pattern source as given at construction.
    pub fn supported_exts(&self) -> &str {
        &self.supported_exts
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    /// Whether `ext` (with or without a leading dot, any case) is handled.
    pub fn supports(&self, ext: &str) -> bool {
        let ext = ext.strip_prefix('.').unwrap_or(ext).to_lowercase();
        self.pattern.is_match(&ext)
    }
}

pub(crate) fn compile_pattern(source: &str) -> Result<Regex, Error> {
    RegexBuilder::new(source)
        .case_insensitive(true)
        .build()
        .map_err(|e| {
            Error::configuration_error(format!("invalid extension pattern `{}`: {}", source, e))
        })
}
