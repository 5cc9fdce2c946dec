//! Configuration management for `docscrub-core`.
//!
//! A sanitizer definition names a collection, an optional store filter and the
//! sanitization schema for that collection's documents. Definitions are written
//! in YAML (or JSON) and resolved by name from a set of well-known directories.
//!
//! ```yaml
//! collection: customers
//! filter:
//!   active: true
//! schema:
//!   email: { $redact: "redacted@example.com" }
//!   "/^addr_/": REDACTED
//!   orders:
//!     - card_number: { $type: string, $default: "0000" }
//! ```
//!
//! License: MIT OR Apache-2.0

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::ScrubError;
use crate::schema::compiler::{compile, Descriptor};
use crate::schema::ObjectSchema;
use crate::sanitizer::RecordSanitizer;

/// Environment variable naming an extra directory of sanitizer definitions.
pub const SANITIZERS_DIR_ENV: &str = "DOCSCRUB_SANITIZERS_DIR";

const DEFINITION_EXTENSIONS: [&str; 3] = ["yaml", "yml", "json"];

/// A sanitizer definition as authored.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawDefinition {
    pub collection: String,
    #[serde(default)]
    pub filter: serde_json::Map<String, serde_json::Value>,
    pub schema: serde_json::Map<String, serde_json::Value>,
}

/// A loaded sanitizer definition with its schema classified and compiled.
#[derive(Debug, Clone)]
pub struct SanitizerDefinition {
    pub collection: String,
    /// Store query criteria. Opaque to the sanitizer; only stores read it.
    pub filter: serde_json::Map<String, serde_json::Value>,
    pub schema: ObjectSchema,
}

impl SanitizerDefinition {
    pub fn new(collection: impl Into<String>, schema: ObjectSchema) -> Self {
        Self {
            collection: collection.into(),
            filter: serde_json::Map::new(),
            schema,
        }
    }

    pub fn with_filter(mut self, filter: serde_json::Map<String, serde_json::Value>) -> Self {
        self.filter = filter;
        self
    }

    pub fn from_raw(raw: RawDefinition) -> Result<Self, ScrubError> {
        let schema = ObjectSchema::from_json(&raw.schema, "")?;
        Ok(Self {
            collection: raw.collection,
            filter: raw.filter,
            schema,
        })
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let raw: RawDefinition =
            serde_yml::from_str(text).context("Failed to parse sanitizer definition")?;
        Ok(Self::from_raw(raw)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let raw: RawDefinition =
            serde_json::from_str(text).context("Failed to parse sanitizer definition")?;
        Ok(Self::from_raw(raw)?)
    }

    /// Loads a definition from a YAML or JSON file (chosen by extension).
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading sanitizer definition from: {}", path.display());
        let text = fs::read_to_string(path)
            .map_err(ScrubError::from)
            .with_context(|| format!("Failed to read sanitizer definition {}", path.display()))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let definition = if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_yaml_str(&text)
        }
        .with_context(|| format!("Invalid sanitizer definition {}", path.display()))?;

        info!(
            "Loaded sanitizer for collection '{}' with {} top-level schema key(s).",
            definition.collection,
            definition.schema.len()
        );
        Ok(definition)
    }

    pub fn sanitizer(&self) -> RecordSanitizer {
        RecordSanitizer::new(self.schema.clone())
    }

    /// The structural descriptor of this definition's schema.
    pub fn describe(&self) -> Descriptor {
        compile(&self.schema)
    }
}

/// Directories searched for a named definition, in priority order.
pub fn definition_search_dirs() -> Vec<PathBuf> {
    let base_dirs = vec![
        std::env::var_os(SANITIZERS_DIR_ENV).map(PathBuf::from),
        dirs::home_dir().map(|p| p.join(".docscrub").join("sanitizers")),
        dirs::config_dir().map(|p| p.join("docscrub").join("sanitizers")),
        Some(PathBuf::from("./sanitizers")),
        Some(PathBuf::from("./models/sanitizers")),
    ];
    base_dirs.into_iter().flatten().collect()
}

pub fn definition_candidate_paths(name: &str) -> Vec<PathBuf> {
    definition_search_dirs()
        .into_iter()
        .flat_map(|dir| {
            DEFINITION_EXTENSIONS
                .iter()
                .map(move |ext| dir.join(format!("{}.{}", name, ext)))
        })
        .collect()
}

/// Loads a definition given either a file path or a bare name.
pub fn load_definition_by_name(name_or_path: &str) -> Result<SanitizerDefinition> {
    debug!("Resolving sanitizer definition '{}'", name_or_path);

    let path_to_load = {
        let path = Path::new(name_or_path);
        if path.is_file() {
            debug!("Input is a valid file path. Loading directly from: {}", path.display());
            Some(path.to_path_buf())
        } else {
            definition_candidate_paths(name_or_path)
                .into_iter()
                .find(|p| p.is_file())
        }
    }
    .with_context(|| {
        format!(
            "Sanitizer '{}' not found. It is not a file path, and no {}.yaml/.yml/.json exists in the sanitizer directories.",
            name_or_path, name_or_path
        )
    })?;

    SanitizerDefinition::load_from_file(&path_to_load)
}
