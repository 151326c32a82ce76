//! YAML decoding
//!
//! The tree is built from parser events so that tags and scalar styles are
//! still visible: `!!binary` payloads become [`Value::Bytes`], and only plain
//! (unquoted) scalars resolve to nulls, booleans, numbers or timestamps.
//! Anchors, aliases and `<<` merge keys are supported.

use std::collections::{HashMap, HashSet};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use strata_core::{Mapping, Value};
use yaml_rust2::parser::{Event, EventReceiver, Parser};
use yaml_rust2::scanner::TScalarStyle;

use crate::format::parse_timestamp;

const CORE_TAG_PREFIX: &str = "tag:yaml.org,2002:";
const MERGE_KEY: &str = "<<";

/// Decode the first document in `content`; an empty stream is null.
pub(crate) fn decode(content: &str) -> Result<Value, String> {
    let mut builder = TreeBuilder::default();
    Parser::new_from_str(content)
        .load(&mut builder, false)
        .map_err(|e| e.to_string())?;
    builder.finish()
}

enum Key {
    Merge,
    Named(String),
}

enum Frame {
    Sequence {
        anchor: usize,
        items: Vec<Value>,
    },
    Mapping {
        anchor: usize,
        entries: Mapping,
        explicit: HashSet<String>,
        key: Option<Key>,
    },
}

#[derive(Default)]
struct TreeBuilder {
    stack: Vec<Frame>,
    anchors: HashMap<usize, Value>,
    root: Option<Value>,
    error: Option<String>,
}

impl EventReceiver for TreeBuilder {
    fn on_event(&mut self, event: Event) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.handle(event) {
            self.error = Some(e);
        }
    }
}

impl TreeBuilder {
    fn handle(&mut self, event: Event) -> Result<(), String> {
        match event {
            Event::Scalar(text, style, anchor, tag) => {
                let core = tag
                    .as_ref()
                    .and_then(|tag| core_tag(&tag.handle, &tag.suffix));
                if tag.is_none() && style == TScalarStyle::Plain && text == MERGE_KEY {
                    if let Some(Frame::Mapping { key, .. }) = self.stack.last_mut() {
                        if key.is_none() {
                            *key = Some(Key::Merge);
                            return Ok(());
                        }
                    }
                }
                let value = resolve_scalar(text, style, core)?;
                self.complete(anchor, value)
            }
            Event::Alias(id) => {
                let value = self
                    .anchors
                    .get(&id)
                    .cloned()
                    .ok_or_else(|| format!("unknown alias (anchor id {id})"))?;
                self.push(value)
            }
            Event::SequenceStart(anchor, _) => {
                self.stack.push(Frame::Sequence {
                    anchor,
                    items: Vec::new(),
                });
                Ok(())
            }
            Event::MappingStart(anchor, _) => {
                self.stack.push(Frame::Mapping {
                    anchor,
                    entries: Mapping::new(),
                    explicit: HashSet::new(),
                    key: None,
                });
                Ok(())
            }
            Event::SequenceEnd | Event::MappingEnd => match self.stack.pop() {
                Some(Frame::Sequence { anchor, items }) => {
                    self.complete(anchor, Value::Sequence(items))
                }
                Some(Frame::Mapping { anchor, entries, .. }) => {
                    self.complete(anchor, Value::Mapping(entries))
                }
                None => Err("unbalanced end of collection".to_string()),
            },
            _ => Ok(()),
        }
    }

    fn complete(&mut self, anchor: usize, value: Value) -> Result<(), String> {
        // Anchor id 0 means the node carries no anchor.
        if anchor > 0 {
            self.anchors.insert(anchor, value.clone());
        }
        self.push(value)
    }

    fn push(&mut self, value: Value) -> Result<(), String> {
        match self.stack.last_mut() {
            None => {
                self.root.get_or_insert(value);
                Ok(())
            }
            Some(Frame::Sequence { items, .. }) => {
                items.push(value);
                Ok(())
            }
            Some(Frame::Mapping {
                entries,
                explicit,
                key,
                ..
            }) => match key.take() {
                None => {
                    *key = Some(Key::Named(key_text(&value)?));
                    Ok(())
                }
                Some(Key::Named(name)) => {
                    if !explicit.insert(name.clone()) {
                        return Err(format!("duplicate mapping key `{name}`"));
                    }
                    entries.insert(name, value);
                    Ok(())
                }
                Some(Key::Merge) => merge_keys(entries, value),
            },
        }
    }

    fn finish(self) -> Result<Value, String> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.root.unwrap_or_default()),
        }
    }
}

/// Suffix of a `tag:yaml.org,2002:` tag, written either as `!!name` or in
/// full.
fn core_tag<'a>(handle: &str, suffix: &'a str) -> Option<&'a str> {
    if handle == "!!" || handle == CORE_TAG_PREFIX {
        Some(suffix)
    } else {
        suffix.strip_prefix(CORE_TAG_PREFIX)
    }
}

/// Keys from `<<` never replace keys the mapping already has. Explicit keys
/// that come later still replace merged ones.
fn merge_keys(entries: &mut Mapping, source: Value) -> Result<(), String> {
    let sources = match source {
        Value::Mapping(mapping) => vec![mapping],
        Value::Sequence(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Mapping(mapping) => Ok(mapping),
                other => Err(format!(
                    "merge key `<<` expects mappings, found {}",
                    other.kind()
                )),
            })
            .collect::<Result<_, _>>()?,
        other => {
            return Err(format!(
                "merge key `<<` expects a mapping, found {}",
                other.kind()
            ));
        }
    };

    for mapping in sources {
        for (key, value) in mapping {
            entries.entry(key).or_insert(value);
        }
    }
    Ok(())
}

fn key_text(key: &Value) -> Result<String, String> {
    match key {
        Value::String(s) => Ok(s.clone()),
        Value::Null => Ok("null".to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Timestamp(ts) => Ok(ts.to_rfc3339()),
        other => Err(format!("unsupported mapping key of type {}", other.kind())),
    }
}

fn resolve_scalar(text: String, style: TScalarStyle, tag: Option<&str>) -> Result<Value, String> {
    match tag {
        Some("binary") => {
            let compact: String = text.split_whitespace().collect();
            STANDARD
                .decode(compact)
                .map(Value::Bytes)
                .map_err(|e| format!("invalid !!binary value: {e}"))
        }
        Some("timestamp") => parse_timestamp(&text)
            .map(Value::Timestamp)
            .ok_or_else(|| format!("invalid !!timestamp value: {text}")),
        Some("str") => Ok(Value::String(text)),
        Some("null") => Ok(Value::Null),
        Some("bool") => parse_bool(&text)
            .map(Value::Bool)
            .ok_or_else(|| format!("invalid !!bool value: {text}")),
        Some(kind @ ("int" | "float")) => parse_number(&text)
            .map(Value::Number)
            .ok_or_else(|| format!("invalid !!{kind} value: {text}")),
        _ if style != TScalarStyle::Plain => Ok(Value::String(text)),
        _ => Ok(resolve_plain(text)),
    }
}

fn resolve_plain(text: String) -> Value {
    if matches!(text.as_str(), "" | "~" | "null" | "Null" | "NULL") {
        return Value::Null;
    }
    if let Some(b) = parse_bool(&text) {
        return Value::Bool(b);
    }
    if let Some(n) = parse_number(&text) {
        return Value::Number(n);
    }
    match parse_timestamp(&text) {
        Some(ts) => Value::Timestamp(ts),
        None => Value::String(text),
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

fn parse_number(text: &str) -> Option<f64> {
    let (sign, body) = match text.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, text.strip_prefix('+').unwrap_or(text)),
    };

    for (prefix, radix) in [("0x", 16), ("0o", 8), ("0b", 2)] {
        if let Some(digits) = body.strip_prefix(prefix) {
            return u64::from_str_radix(digits, radix)
                .ok()
                .map(|n| sign * n as f64);
        }
    }

    match body {
        ".inf" | ".Inf" | ".INF" => return Some(sign * f64::INFINITY),
        ".nan" | ".NaN" | ".NAN" => return Some(f64::NAN),
        _ => {}
    }

    // `f64::from_str` also takes `inf` and `NaN`; YAML spells those differently.
    let numeric = body.starts_with(|c: char| c.is_ascii_digit() || c == '.')
        && body.chars().any(|c| c.is_ascii_digit())
        && body
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if !numeric {
        return None;
    }
    body.parse::<f64>().ok().map(|n| sign * n)
}
