// docscrub/src/commands/sanitize_file.rs
//! File mode: sanitize a JSON array file into a sibling `<name>Sanitized<ext>`.

use anyhow::{anyhow, Context, Result};
use log::{error, info};
use std::fs;
use std::path::{Path, PathBuf};

use docscrub_core::{headless_sanitize_records, parse_records, OutputFormat, Progress, RunStats, SanitizerDefinition};

/// Result of a file-mode run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRunOutcome {
    pub output_path: PathBuf,
    pub stats: RunStats,
}

/// `<stem>Sanitized<.ext>` for `source`.
pub fn sanitized_file_name(source: &Path) -> Result<String> {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| anyhow!("Input path {} has no usable file name", source.display()))?;
    Ok(match source.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}Sanitized.{}", stem, ext),
        None => format!("{}Sanitized", stem),
    })
}

/// Where the sanitized copy of `source` is written.
pub fn sanitized_output_path(source: &Path, output_dir: Option<&Path>) -> Result<PathBuf> {
    let dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => match source.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        },
    };
    Ok(dir.join(sanitized_file_name(source)?))
}

/// Reads, sanitizes and writes one file.
///
/// Reading or parsing the input is fatal before any record is processed. A
/// write failure is logged and returned.
pub fn run_sanitize_file(
    definition: &SanitizerDefinition,
    source: &Path,
    output_dir: Option<&Path>,
    progress: &mut dyn Progress,
) -> Result<FileRunOutcome> {
    let input = fs::read_to_string(source)
        .with_context(|| format!("Failed to read input file {}", source.display()))?;
    let records = parse_records(&input)
        .with_context(|| format!("Failed to parse input file {}", source.display()))?;
    info!("Sanitizing {} {} records", records.len(), definition.collection);

    let (output, stats) = headless_sanitize_records(definition, records, OutputFormat::Plain, progress)?;

    let output_path = sanitized_output_path(source, output_dir)?;
    if let Err(e) = fs::write(&output_path, output) {
        error!("Failed to write {}: {}", output_path.display(), e);
        return Err(e).with_context(|| format!("Failed to write output file {}", output_path.display()));
    }

    info!("Wrote {} record(s) to {}.", stats.kept, output_path.display());
    Ok(FileRunOutcome { output_path, stats })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitized_file_name() {
        assert_eq!(sanitized_file_name(Path::new("/tmp/orders.json")).unwrap(), "ordersSanitized.json");
        assert_eq!(sanitized_file_name(Path::new("dump")).unwrap(), "dumpSanitized");
        assert_eq!(
            sanitized_file_name(Path::new("archive.2024.json")).unwrap(),
            "archive.2024Sanitized.json"
        );
    }

    #[test]
    fn test_output_path_defaults_to_sibling() {
        assert_eq!(
            sanitized_output_path(Path::new("exports/orders.json"), None).unwrap(),
            PathBuf::from("exports/ordersSanitized.json")
        );
        assert_eq!(
            sanitized_output_path(Path::new("orders.json"), None).unwrap(),
            PathBuf::from("./ordersSanitized.json")
        );
        assert_eq!(
            sanitized_output_path(Path::new("exports/orders.json"), Some(Path::new("out"))).unwrap(),
            PathBuf::from("out/ordersSanitized.json")
        );
    }
}
