// docscrub-core/src/schema/key_matcher.rs
//! Expands schema keys into the record keys they govern.

use crate::schema::SchemaKey;
use crate::value::Map;

/// Returns the record keys a schema key applies to.
///
/// A literal key always expands to itself, whether or not the record has it;
/// the caller decides what to do about absent fields. A pattern key expands
/// to every key of `record` that matches, in the record's own order, and to
/// nothing when there is no record.
pub fn expand(key: &SchemaKey, record: Option<&Map>) -> Vec<String> {
    match key {
        SchemaKey::Literal(name) => vec![name.clone()],
        SchemaKey::Pattern { regex, .. } => match record {
            Some(map) => map.keys().filter(|k| regex.is_match(k)).cloned().collect(),
            None => Vec::new(),
        },
    }
}
