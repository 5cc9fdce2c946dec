// docscrub/src/commands/mod.rs
//! Command implementations and the top-level dispatcher.

pub mod describe;
pub mod sanitize_collection;
pub mod sanitize_file;

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info};
use std::io;

use docscrub_core::{load_definition_by_name, JsonDirStore, NoProgress, Progress, RunStats};

use crate::cli::{Cli, Mode, USAGE_WARNING};
use crate::ui::output_format;
use crate::ui::progress::BarProgress;

/// Helper for printing info messages to stderr.
pub fn info_msg(msg: impl AsRef<str>) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_info_message(&mut io::stderr(), msg.as_ref(), stderr_supports_color);
}

/// Helper for printing warning messages to stdout.
pub fn warn_msg(msg: impl AsRef<str>) {
    let stdout_supports_color = io::stdout().is_terminal();
    let _ = output_format::print_warn_message(&mut io::stdout(), msg.as_ref(), stdout_supports_color);
}

/// Helper for printing error messages to stderr.
pub fn error_msg(msg: impl AsRef<str>) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_error_message(&mut io::stderr(), msg.as_ref(), stderr_supports_color);
}

fn report_run(collection: &str, stats: &RunStats, quiet: bool) {
    if quiet {
        return;
    }
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_run_summary(&mut io::stderr(), collection, stats, stderr_supports_color);
}

/// Runs whatever the command line asks for.
pub async fn dispatch(args: Cli) -> Result<()> {
    let mode = args.mode();
    debug!("Resolved run mode: {:?}", mode);

    let name = match (&mode, args.sanitizer.as_deref()) {
        (Mode::Usage, _) | (_, None) => {
            warn_msg(USAGE_WARNING);
            return Ok(());
        }
        (_, Some(name)) => name,
    };

    let definition = load_definition_by_name(name)
        .with_context(|| format!("Failed to load sanitizer '{}'", name))?;

    let mut bar = BarProgress::new();
    let mut silent = NoProgress;
    let progress: &mut dyn Progress = if args.no_progress || args.quiet {
        &mut silent
    } else {
        &mut bar
    };

    match mode {
        Mode::Usage => Ok(()),
        Mode::Describe => describe::run_describe(&definition, &mut io::stdout()),
        Mode::File(source) => {
            if !args.quiet {
                info_msg(format!("Sanitizing {} with '{}'", source.display(), definition.collection));
            }
            let outcome = sanitize_file::run_sanitize_file(
                &definition,
                &source,
                args.output_dir.as_deref(),
                progress,
            )?;
            report_run(&definition.collection, &outcome.stats, args.quiet);
            info!("Output written to {}", outcome.output_path.display());
            Ok(())
        }
        Mode::Collection(store_dir) => {
            if !args.quiet {
                info_msg(format!("Sanitizing {} records", definition.collection));
            }
            let store = JsonDirStore::new(store_dir);
            let outcome = sanitize_collection::run_sanitize_collection(
                &definition,
                &store,
                &args.import_root,
                progress,
            )
            .await?;
            report_run(&definition.collection, &outcome.stats, args.quiet);
            info!("Output written to {}", outcome.output_path.display());
            Ok(())
        }
    }
}
