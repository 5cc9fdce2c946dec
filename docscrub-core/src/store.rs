// docscrub-core/src/store.rs
//! Document stores that feed collection-mode runs.
//!
//! The sanitizer never talks to a store itself; a [`DocumentStore`] fetches
//! every document of a collection that matches a definition's filter, and the
//! caller hands the result to [`crate::RecordSanitizer::sanitize_all`].

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::{debug, info};
use std::path::PathBuf;

use crate::encoder::decode_extended;
use crate::errors::ScrubError;
use crate::value::{Map, Value};

/// Store query criteria: top-level field name to expected value.
pub type Filter = serde_json::Map<String, serde_json::Value>;

/// A source of documents, fetched whole.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns every document of `collection` matching `filter`.
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>>;
}

/// A store backed by a directory of extended-JSON collection dumps,
/// one `<collection>.json` array per collection.
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    root: PathBuf,
}

impl JsonDirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn collection_path(&self, collection: &str) -> PathBuf {
        self.root.join(format!("{}.json", collection))
    }
}

#[async_trait]
impl DocumentStore for JsonDirStore {
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>> {
        let path = self.collection_path(collection);
        debug!("Reading collection '{}' from {}", collection, path.display());

        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(ScrubError::from)
            .with_context(|| format!("Failed to read collection dump {}", path.display()))?;
        let json: serde_json::Value = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse collection dump {}", path.display()))?;
        let serde_json::Value::Array(documents) = json else {
            return Err(anyhow!("Collection dump {} is not a JSON array", path.display()));
        };

        let expected = decode_filter(filter)?;
        let mut matched = Vec::with_capacity(documents.len());
        for document in documents {
            let document = decode_extended(document)
                .with_context(|| format!("Invalid document in {}", path.display()))?;
            if matches_filter(&document, &expected) {
                matched.push(document);
            }
        }

        info!(
            "Fetched {} '{}' document(s) matching {} filter field(s).",
            matched.len(),
            collection,
            expected.len()
        );
        Ok(matched)
    }
}

fn decode_filter(filter: &Filter) -> Result<Map> {
    filter
        .iter()
        .map(|(k, v)| Ok((k.clone(), decode_extended(v.clone())?)))
        .collect::<Result<Map>>()
        .context("Invalid filter")
}

/// True when every filter field equals the document's top-level field.
/// Non-object documents only match an empty filter.
pub fn matches_filter(document: &Value, expected: &Map) -> bool {
    if expected.is_empty() {
        return true;
    }
    match document.as_object() {
        Some(fields) => expected.iter().all(|(k, v)| fields.get(k) == Some(v)),
        None => false,
    }
}
