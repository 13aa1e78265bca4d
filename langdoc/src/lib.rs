#![forbid(unsafe_code)]
//! Multi-format localization document toolkit.
//!
//! Loads JSON, YAML and Java `.properties` translation files into one ordered
//! tree model, writes trees back honoring indentation and key order, and maps
//! a dotted key-path to the exact character range of its value in the raw
//! source text.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use langdoc::{KeyPath, KeyStyle, Registry};
//!
//! let registry = Registry::default();
//! let document = registry.load("locales/en.json")?;
//! registry.save("locales/en.sorted.json", &document, true)?;
//!
//! let text = std::fs::read_to_string("locales/en.json")?;
//! let key: KeyPath = "menu.file.open".parse()?;
//! if let Some(range) = registry.navigate("locales/en.json", &text, &key, KeyStyle::Nested) {
//!     println!("found at {}", range);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Supported Formats
//!
//! - **JSON** (`.json`): nested objects and arrays, key order preserved
//! - **YAML** (`.yaml`, `.yml`): block and flow style, core schema scalars
//! - **Properties** (`.properties`): flat `key=value` files with Java escapes
//!
//! # Key Styles
//!
//! A key-path such as `menu.file.open` is either looked up as one literal key
//! ([`KeyStyle::Flat`]) or segment by segment through nested objects
//! ([`KeyStyle::Nested`]). The caller always chooses; properties files are
//! flat whatever the request.

pub mod descriptor;
pub mod error;
pub mod formats;
pub mod keypath;
mod navigate;
pub mod options;
pub mod registry;
pub mod traits;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    descriptor::Descriptor,
    error::{Error, Location},
    formats::{Backend, FormatType, JsonParser, PropertiesParser, YamlParser},
    keypath::{KeyPath, KeyStyle, Segment},
    options::{ParserConfig, ParserOptions},
    registry::Registry,
    traits::Parser,
    types::{Document, PositionRange, Value},
};
