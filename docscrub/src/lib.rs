// docscrub/src/lib.rs
//! # docscrub CLI Application
//!
//! Command-line front end for `docscrub-core`: resolves a sanitizer definition,
//! acquires records from a JSON file or a document store, and writes the
//! surviving, redacted records back out.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;

pub use commands::dispatch;
