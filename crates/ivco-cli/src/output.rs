use std::io::Write;

use ivco_core::Envelope;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Rendering switches taken from the global flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub format: OutputFormat,
    pub pretty: bool,
    pub data_only: bool,
}

pub fn render(envelope: &Envelope<Value>, options: RenderOptions) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_envelope(&mut out, envelope, options)?;
    out.flush()?;
    Ok(())
}

pub fn write_envelope<W: Write>(
    out: &mut W,
    envelope: &Envelope<Value>,
    options: RenderOptions,
) -> Result<(), CliError> {
    match (options.format, options.data_only) {
        (OutputFormat::Json, true) => write_json(out, &envelope.data, options.pretty),
        (OutputFormat::Json, false) => write_json(out, envelope, options.pretty),
        (OutputFormat::Table, true) => write_value_lines(out, &envelope.data, 0),
        (OutputFormat::Table, false) => write_table(out, envelope),
    }
}

fn write_json<W: Write, T: serde::Serialize>(
    out: &mut W,
    value: &T,
    pretty: bool,
) -> Result<(), CliError> {
    let payload = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    writeln!(out, "{payload}")?;
    Ok(())
}

fn write_table<W: Write>(out: &mut W, envelope: &Envelope<Value>) -> Result<(), CliError> {
    writeln!(out, "request_id  : {}", envelope.meta.request_id)?;
    if let Some(trace_id) = &envelope.meta.trace_id {
        writeln!(out, "trace_id    : {trace_id}")?;
    }
    writeln!(out, "schema      : {}", envelope.meta.schema_version)?;
    writeln!(out, "generated_at: {}", envelope.meta.generated_at)?;
    writeln!(
        out,
        "sources     : {}",
        envelope
            .meta
            .source_chain
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(",")
    )?;
    writeln!(out, "latency_ms  : {}", envelope.meta.latency_ms)?;

    if !envelope.meta.warnings.is_empty() {
        writeln!(out, "warnings:")?;
        for warning in &envelope.meta.warnings {
            writeln!(out, "  - {warning}")?;
        }
    }

    writeln!(out, "data:")?;
    write_value_lines(out, &envelope.data, 1)?;

    if envelope.is_failure() {
        writeln!(out, "errors:")?;
        for error in &envelope.errors {
            writeln!(out, "  - {}: {}", error.code, error.message)?;
        }
    }

    Ok(())
}

/// `key: value` per scalar, nested objects indented two spaces per level.
fn write_value_lines<W: Write>(out: &mut W, value: &Value, depth: usize) -> Result<(), CliError> {
    let indent = "  ".repeat(depth);
    match value {
        Value::Object(map) => {
            for (key, value) in map {
                if is_scalar(value) {
                    writeln!(out, "{indent}{key}: {}", scalar(value))?;
                } else {
                    writeln!(out, "{indent}{key}:")?;
                    write_value_lines(out, value, depth + 1)?;
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                if is_scalar(item) {
                    writeln!(out, "{indent}- {}", scalar(item))?;
                } else {
                    writeln!(out, "{indent}-")?;
                    write_value_lines(out, item, depth + 1)?;
                }
            }
        }
        other => writeln!(out, "{indent}{}", scalar(other))?,
    }
    Ok(())
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Object(_) | Value::Array(_))
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
