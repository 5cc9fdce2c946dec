// File: docscrub-core/src/headless.rs

//! `headless.rs`
//! Convenience wrappers for one-shot sanitization without any UI.
//!
//! Both helpers take already-acquired input and return serialized output; the
//! caller owns reading and writing files.

use anyhow::{anyhow, Context, Result};

use crate::config::SanitizerDefinition;
use crate::encoder::{format_plain, format_records};
use crate::sanitizer::{Progress, RunStats};
use crate::value::Value;

/// Output flavour of a headless run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Compact plain JSON (file mode).
    Plain,
    /// Tab-indented extended JSON (collection mode).
    Extended,
}

/// Parses `input` as a JSON array of records.
///
/// Any parse failure is fatal: no record is processed.
pub fn parse_records(input: &str) -> Result<Vec<Value>> {
    let json: serde_json::Value =
        serde_json::from_str(input).context("Input is not valid JSON")?;
    match json {
        serde_json::Value::Array(items) => Ok(items.into_iter().map(Value::from).collect()),
        other => Err(anyhow!(
            "Input must be a JSON array of records, found {}",
            json_kind(&other)
        )),
    }
}

fn json_kind(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Sanitizes records and serializes the survivors.
pub fn headless_sanitize_records(
    definition: &SanitizerDefinition,
    records: Vec<Value>,
    format: OutputFormat,
    progress: &mut dyn Progress,
) -> Result<(String, RunStats)> {
    let report = definition.sanitizer().sanitize_all(records, progress);
    let output = match format {
        OutputFormat::Plain => format_plain(&report.records)?,
        OutputFormat::Extended => format_records(&report.records)?,
    };
    Ok((output, report.stats()))
}

/// Parses a JSON array, sanitizes it and returns plain JSON.
pub fn headless_sanitize_json(
    definition: &SanitizerDefinition,
    input: &str,
    progress: &mut dyn Progress,
) -> Result<(String, RunStats)> {
    let records = parse_records(input)?;
    headless_sanitize_records(definition, records, OutputFormat::Plain, progress)
}
