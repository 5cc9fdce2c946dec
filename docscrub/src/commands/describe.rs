// docscrub/src/commands/describe.rs
//! Prints the structural descriptor of a sanitizer's schema.

use anyhow::{Context, Result};
use std::io::Write;

use docscrub_core::SanitizerDefinition;

pub fn run_describe<W: Write>(definition: &SanitizerDefinition, writer: &mut W) -> Result<()> {
    let descriptor = definition.describe();
    let text = serde_json::to_string_pretty(&descriptor).context("Failed to serialize descriptor")?;
    writeln!(writer, "{}", text)?;
    Ok(())
}
