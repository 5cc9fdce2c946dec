// docscrub/src/ui/output_format.rs
//! Console message formatting. Colors are applied only when the target
//! stream supports them.

use std::io::{self, Write};

use docscrub_core::RunStats;
use owo_colors::OwoColorize;

pub fn print_info_message<W: Write>(writer: &mut W, msg: &str, supports_color: bool) -> io::Result<()> {
    if supports_color {
        writeln!(writer, "{}", msg.cyan())
    } else {
        writeln!(writer, "{}", msg)
    }
}

pub fn print_warn_message<W: Write>(writer: &mut W, msg: &str, supports_color: bool) -> io::Result<()> {
    if supports_color {
        writeln!(writer, "{} {}", "WARNING".yellow().bold(), msg.yellow())
    } else {
        writeln!(writer, "WARNING {}", msg)
    }
}

pub fn print_error_message<W: Write>(writer: &mut W, msg: &str, supports_color: bool) -> io::Result<()> {
    if supports_color {
        writeln!(writer, "{} {}", "ERROR".red().bold(), msg.red())
    } else {
        writeln!(writer, "ERROR {}", msg)
    }
}

/// Prints the kept/dropped counts of a run.
pub fn print_run_summary<W: Write>(
    writer: &mut W,
    collection: &str,
    stats: &RunStats,
    supports_color: bool,
) -> io::Result<()> {
    let kept = format!("{} of {}", stats.kept, stats.total);
    if supports_color {
        write!(writer, "{} '{}': kept {} record(s)", "Sanitized".green().bold(), collection, kept.green())?;
        if stats.dropped > 0 {
            write!(writer, ", {} dropped", stats.dropped.to_string().yellow())?;
        }
    } else {
        write!(writer, "Sanitized '{}': kept {} record(s)", collection, kept)?;
        if stats.dropped > 0 {
            write!(writer, ", {} dropped", stats.dropped)?;
        }
    }
    writeln!(writer, ".")
}
