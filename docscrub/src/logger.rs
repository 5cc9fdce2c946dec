// docscrub/src/logger.rs
//! Logger initialization for the CLI.

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

/// Initializes `env_logger` on stderr.
///
/// `RUST_LOG` is honoured (default `warn`) unless `level_override` is given.
/// Calling this twice is harmless.
pub fn init_logger(level_override: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(level) = level_override {
        builder.filter_level(level);
    }
    builder.format_timestamp(None).target(Target::Stderr);
    let _ = builder.try_init();
}
