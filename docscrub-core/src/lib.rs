// docscrub-core/src/lib.rs
//! # docscrub Core Library
//!
//! `docscrub-core` anonymizes records exported from a document store. A
//! per-collection sanitization schema says which fields to rewrite, how to
//! generate their replacements and how to recurse into nested arrays and
//! objects; the shape of every record is preserved.
//!
//! The core is pure: it performs no I/O while sanitizing. Stores, files and
//! progress reporting are collaborators plugged in by the caller.
//!
//! ## Modules
//!
//! * `value`: The record model (`Value`), JSON plus binary payloads and dates.
//! * `schema`: Schema keys and nodes, classified once at load time.
//!   * `schema::key_matcher`: Expands literal and `/regex/` keys against a record.
//!   * `schema::compiler`: Projects a schema onto a structural `Descriptor`.
//! * `generators`: Replacement producers, built-in and user-supplied.
//! * `sanitizer`: The recursive `RecordSanitizer` and batch reporting.
//! * `encoder`: Extended-JSON encoding and decoding.
//! * `config`: Sanitizer definitions and their lookup by name.
//! * `store`: The `DocumentStore` trait and a directory-backed store.
//! * `headless`: One-shot parse/sanitize/serialize helpers.
//! * `redaction_log`: Debug logging that masks original values.
//!
//! ## Usage Example
//!
//! ```rust
//! use docscrub_core::{Generator, NoProgress, ObjectSchema, RecordSanitizer, Value};
//! use serde_json::json;
//!
//! fn main() -> anyhow::Result<()> {
//!     let schema = ObjectSchema::new()
//!         .field("email", Generator::literal("redacted@example.com"))
//!         .pattern("^addr_", Generator::literal("REDACTED"))?;
//!     let sanitizer = RecordSanitizer::new(schema);
//!
//!     let records = vec![Value::from(json!({ "email": "a@b.com", "addr_city": "Paris", "id": 7 }))];
//!     let report = sanitizer.sanitize_all(records, &mut NoProgress);
//!
//!     assert_eq!(
//!         report.records[0],
//!         Value::from(json!({ "email": "redacted@example.com", "addr_city": "REDACTED", "id": 7 }))
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Library-level failures are `ScrubError`s. Loading paths return
//! `anyhow::Error` with context. A failure while sanitizing one record never
//! aborts a batch: the record is dropped and its index reported.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod config;
pub mod encoder;
pub mod errors;
pub mod generators;
pub mod headless;
pub mod redaction_log;
pub mod sanitizer;
pub mod schema;
pub mod store;
pub mod value;

/// Re-exports the definition types and lookup helpers.
pub use config::{
    definition_candidate_paths,
    load_definition_by_name,
    RawDefinition,
    SanitizerDefinition,
    SANITIZERS_DIR_ENV,
};

/// Re-exports the custom error type for clear error reporting.
pub use errors::ScrubError;

/// Re-exports the schema model.
pub use schema::{DefaultSpec, ObjectSchema, SchemaKey, SchemaNode, MAX_PATTERN_LENGTH};
pub use schema::compiler::{compile, Descriptor};
pub use schema::key_matcher::expand;

pub use generators::Generator;

/// Re-exports the sanitizer and its batch reporting types.
pub use sanitizer::{NoProgress, Progress, RecordSanitizer, RunStats, SanitizeReport};

pub use encoder::{decode_extended, format_plain, format_records, to_extended, BINARY_SUBTYPE};

pub use store::{DocumentStore, Filter, JsonDirStore};

pub use value::{Map, Value};

/// Re-exports types and functions for one-shot, non-interactive use.
pub use headless::{
    headless_sanitize_json,
    headless_sanitize_records,
    parse_records,
    OutputFormat,
};
