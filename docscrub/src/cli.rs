// docscrub/src/cli.rs
//! This file defines the command-line interface (CLI) for the docscrub application.
//! License: MIT OR Apache-2.0

use clap::Parser;
use std::path::PathBuf;

/// Printed when the sanitizer or the file is missing.
pub const USAGE_WARNING: &str = "It is necessary to specify the sanitizer and the file.\n\
The sanitizer is a definition file path, or a name resolved from $DOCSCRUB_SANITIZERS_DIR, \
~/.docscrub/sanitizers, <config dir>/docscrub/sanitizers, ./sanitizers or ./models/sanitizers.\n\
Example: docscrub shopifyOrders ./exports/ordersToReProcess.json";

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "docscrub",
    author = "Obscura Team (Relay)",
    version = env!("CARGO_PKG_VERSION"),
    about = "Anonymize document-store exports with a per-collection schema",
    long_about = "docscrub rewrites sensitive fields of exported documents according to a declarative sanitization schema, keeping every document's shape intact so the result can be imported into staging or test environments."
)]
pub struct Cli {
    /// Sanitizer definition: a name or a path to a YAML/JSON definition file.
    #[arg(value_name = "SANITIZER")]
    pub sanitizer: Option<String>,

    /// JSON array file to sanitize. Output goes to `<name>Sanitized<ext>`.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Directory for the sanitized file (defaults to the input file's directory).
    #[arg(long = "output-dir", value_name = "DIR", requires = "file")]
    pub output_dir: Option<PathBuf>,

    /// Sanitize the definition's collection from a directory of extended-JSON dumps.
    #[arg(long = "from-store", value_name = "DIR", conflicts_with = "file")]
    pub from_store: Option<PathBuf>,

    /// Root directory for collection-mode output.
    #[arg(long = "import-root", value_name = "DIR", default_value = "data-import")]
    pub import_root: PathBuf,

    /// Print the structural descriptor of the sanitizer's schema and exit.
    #[arg(long)]
    pub describe: bool,

    /// Do not draw a progress bar.
    #[arg(long = "no-progress")]
    pub no_progress: bool,

    /// Suppress all informational and debug messages.
    #[arg(long, short = 'q', conflicts_with = "debug")]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long, short = 'd')]
    pub debug: bool,
}

/// What a parsed command line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Usage,
    Describe,
    File(PathBuf),
    Collection(PathBuf),
}

impl Cli {
    pub fn mode(&self) -> Mode {
        if self.sanitizer.is_none() {
            return Mode::Usage;
        }
        if self.describe {
            return Mode::Describe;
        }
        match (&self.file, &self.from_store) {
            (Some(file), _) => Mode::File(file.clone()),
            (None, Some(store)) => Mode::Collection(store.clone()),
            (None, None) => Mode::Usage,
        }
    }
}
