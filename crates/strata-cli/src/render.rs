//! Value rendering for terminal output

use colored::Colorize;
use strata_core::Value;

use crate::cli::OutputFormat;
use crate::error::Result;

const INDENT: usize = 2;

/// Render `value` in the requested format, without a trailing newline
pub fn render(value: &Value, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?.trim_end().to_string(),
        OutputFormat::Pretty => pretty(value),
    })
}

/// Human-oriented rendering with colored scalars
pub fn pretty(value: &Value) -> String {
    let mut out = String::new();
    write_pretty(&mut out, value, 0);
    out
}

fn write_pretty(out: &mut String, value: &Value, depth: usize) {
    let pad = " ".repeat(depth * INDENT);
    let inner = " ".repeat((depth + 1) * INDENT);
    match value {
        Value::Null => out.push_str(&"null".bold().to_string()),
        Value::Bool(b) => out.push_str(&b.to_string().yellow().to_string()),
        Value::Number(n) => out.push_str(&n.to_string().yellow().to_string()),
        Value::String(s) => out.push_str(&format!("'{s}'").green().to_string()),
        Value::Bytes(bytes) => {
            let hex: Vec<String> = bytes.iter().map(|b| format!("{b:02x}")).collect();
            out.push_str(&format!("<Bytes {}>", hex.join(" ")).cyan().to_string());
        }
        Value::Timestamp(ts) => out.push_str(&ts.to_rfc3339().magenta().to_string()),
        Value::Sequence(items) if items.is_empty() => out.push_str("[]"),
        Value::Sequence(items) => {
            out.push_str("[\n");
            for item in items {
                out.push_str(&inner);
                write_pretty(out, item, depth + 1);
                out.push_str(",\n");
            }
            out.push_str(&format!("{pad}]"));
        }
        Value::Mapping(map) if map.is_empty() => out.push_str("{}"),
        Value::Mapping(map) => {
            out.push_str("{\n");
            for (key, item) in map {
                out.push_str(&format!("{inner}{key}: "));
                write_pretty(out, item, depth + 1);
                out.push_str(",\n");
            }
            out.push_str(&format!("{pad}}}"));
        }
    }
}
