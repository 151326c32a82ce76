//! File formats understood by the file-based providers
//!
//! Each format decodes text into a [`Value`]. Formats are ordered by priority:
//! when two files in one directory share a basename, the file whose format
//! sorts last wins.

use std::path::Path;

use chrono::{DateTime, FixedOffset};
use strata_core::Value;

use crate::{Error, Result, yaml};

/// A supported configuration file format, in ascending priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FileFormat {
    Json,
    Json5,
    Jsonc,
    Toml,
    Yaml,
    Yml,
    /// Executable definition; only recognized when scripts are enabled
    Script,
}

impl FileFormat {
    /// Format for a data file extension (case-insensitive).
    ///
    /// Script extensions are configured separately and never match here.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "json" => Some(FileFormat::Json),
            "json5" => Some(FileFormat::Json5),
            "jsonc" => Some(FileFormat::Jsonc),
            "toml" => Some(FileFormat::Toml),
            "yaml" => Some(FileFormat::Yaml),
            "yml" => Some(FileFormat::Yml),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FileFormat::Json => "JSON",
            FileFormat::Json5 => "JSON5",
            FileFormat::Jsonc => "JSONC",
            FileFormat::Toml => "TOML",
            FileFormat::Yaml | FileFormat::Yml => "YAML",
            FileFormat::Script => "script",
        }
    }

    /// Decode `content` read from `path`.
    ///
    /// Script files cannot be decoded from text; they go through
    /// [`ScriptOptions::evaluate`](crate::ScriptOptions::evaluate).
    pub fn decode(&self, path: &Path, content: &str) -> Result<Value> {
        let parse_error = |message: String| Error::Parse {
            path: path.to_path_buf(),
            format: self.name(),
            message,
        };

        match self {
            FileFormat::Json => serde_json::from_str::<serde_json::Value>(content)
                .map(Value::from)
                .map_err(|e| parse_error(e.to_string())),
            FileFormat::Json5 => {
                json5::from_str::<Value>(content).map_err(|e| parse_error(e.to_string()))
            }
            FileFormat::Jsonc => {
                let options = jsonc_parser::ParseOptions::default();
                jsonc_parser::parse_to_serde_value(content, &options)
                    .map(|parsed| parsed.map_or(Value::Null, Value::from))
                    .map_err(|e| parse_error(e.to_string()))
            }
            FileFormat::Toml => toml::from_str::<toml::Value>(content)
                .map(toml_to_value)
                .map_err(|e| parse_error(e.to_string())),
            FileFormat::Yaml | FileFormat::Yml => yaml::decode(content).map_err(parse_error),
            FileFormat::Script => Err(parse_error(
                "script files must be evaluated, not decoded".to_string(),
            )),
        }
    }
}

/// Parse an RFC 3339 date-time such as `2001-12-15T02:59:43.1Z`
pub fn parse_timestamp(text: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(text.trim()).ok()
}

/// Convert a TOML document into a tree.
///
/// Offset date-times become [`Value::Timestamp`]; local dates and times have
/// no offset and stay strings.
pub fn toml_to_value(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i as f64),
        toml::Value::Float(f) => Value::Number(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => {
            let text = dt.to_string();
            match parse_timestamp(&text) {
                Some(ts) => Value::Timestamp(ts),
                None => Value::String(text),
            }
        }
        toml::Value::Array(items) => Value::Sequence(items.into_iter().map(toml_to_value).collect()),
        toml::Value::Table(table) => Value::Mapping(
            table
                .into_iter()
                .map(|(key, value)| (key, toml_to_value(value)))
                .collect(),
        ),
    }
}
