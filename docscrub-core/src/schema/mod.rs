// docscrub-core/src/schema/mod.rs
//! The sanitization schema: a tree of field matchers, generators and nested
//! sub-schemas.
//!
//! Schemas are classified once, when they are loaded. Every key is either a
//! [`SchemaKey::Literal`] or a compiled [`SchemaKey::Pattern`], and every node
//! is one of the four [`SchemaNode`] kinds, so the sanitizer never has to
//! re-inspect the shape of a schema while walking records.
//!
//! ## Declarative form
//!
//! | Authored as                              | Node                    |
//! |------------------------------------------|-------------------------|
//! | scalar, `{$redact}`, `{$generate}`, `{$derive}` | `Generator`      |
//! | `{ $type: T, $default: G }`              | `Default`               |
//! | one-element sequence `[S]`               | `Array`                 |
//! | any other mapping                        | `Object`                |
//!
//! Keys written as `/regex/` are pattern keys.
//!
//! License: MIT OR APACHE 2.0

pub mod compiler;
pub mod key_matcher;

use log::debug;
use regex::{Regex, RegexBuilder};

use crate::errors::ScrubError;
use crate::generators::{self, Generator};

/// Maximum allowed length for a pattern key's regular expression.
pub const MAX_PATTERN_LENGTH: usize = 500;

pub const TYPE_KEY: &str = "$type";
pub const DEFAULT_KEY: &str = "$default";

/// A key of an object schema.
#[derive(Debug, Clone)]
pub enum SchemaKey {
    /// An exact field name.
    Literal(String),
    /// A `/regex/` key. `source` keeps the key as authored.
    Pattern { source: String, regex: Regex },
}

impl SchemaKey {
    /// Classifies an authored key. `/body/` becomes a pattern over `body`.
    pub fn parse(raw: &str) -> Result<Self, ScrubError> {
        match pattern_body(raw) {
            Some(body) => {
                if body.len() > MAX_PATTERN_LENGTH {
                    return Err(ScrubError::PatternLengthExceeded(
                        raw.to_string(),
                        body.len(),
                        MAX_PATTERN_LENGTH,
                    ));
                }
                let regex = RegexBuilder::new(body)
                    .size_limit(10 * (1 << 20))
                    .build()
                    .map_err(|e| ScrubError::PatternCompilationError(raw.to_string(), e))?;
                Ok(SchemaKey::Pattern { source: raw.to_string(), regex })
            }
            None => Ok(SchemaKey::Literal(raw.to_string())),
        }
    }

    /// The key as authored.
    pub fn as_str(&self) -> &str {
        match self {
            SchemaKey::Literal(name) => name,
            SchemaKey::Pattern { source, .. } => source,
        }
    }

    pub fn is_pattern(&self) -> bool {
        matches!(self, SchemaKey::Pattern { .. })
    }
}

fn pattern_body(raw: &str) -> Option<&str> {
    if raw.len() > 2 && raw.starts_with('/') && raw.ends_with('/') {
        Some(&raw[1..raw.len() - 1])
    } else {
        None
    }
}

/// A (declared type, generator-or-literal) pair.
#[derive(Debug, Clone)]
pub struct DefaultSpec {
    pub declared_type: String,
    pub value: Generator,
}

/// One node of a sanitization schema.
#[derive(Debug, Clone)]
pub enum SchemaNode {
    Generator(Generator),
    Default(DefaultSpec),
    /// Applied to every element of a matching array; only object elements
    /// under an object schema are rewritten.
    Array(Box<SchemaNode>),
    Object(ObjectSchema),
}

impl SchemaNode {
    pub fn array(element: impl Into<SchemaNode>) -> Self {
        SchemaNode::Array(Box::new(element.into()))
    }

    pub fn default_spec(declared_type: impl Into<String>, value: Generator) -> Self {
        SchemaNode::Default(DefaultSpec { declared_type: declared_type.into(), value })
    }

    /// The generator this node redacts with, if it is a leaf.
    pub fn generator(&self) -> Option<&Generator> {
        match self {
            SchemaNode::Generator(generator) => Some(generator),
            SchemaNode::Default(spec) => Some(&spec.value),
            SchemaNode::Array(_) | SchemaNode::Object(_) => None,
        }
    }

    /// Parses one authored node. `path` is used for error messages only.
    pub fn from_json(json: &serde_json::Value, path: &str) -> Result<Self, ScrubError> {
        match json {
            serde_json::Value::Array(items) => match items.as_slice() {
                [element] => Ok(SchemaNode::array(SchemaNode::from_json(
                    element,
                    &format!("{}[0]", path),
                )?)),
                _ => Err(ScrubError::invalid_schema(
                    path,
                    format!("array schemas wrap exactly one sub-schema, found {}", items.len()),
                )),
            },
            serde_json::Value::Object(map) => {
                if let Some(generator) = generators::parse_directive(map, path)? {
                    return Ok(SchemaNode::Generator(generator));
                }
                if map.contains_key(TYPE_KEY) || map.contains_key(DEFAULT_KEY) {
                    return parse_default_spec(map, path);
                }
                Ok(SchemaNode::Object(ObjectSchema::from_json(map, path)?))
            }
            scalar => Ok(SchemaNode::Generator(Generator::literal(scalar.clone()))),
        }
    }
}

fn parse_default_spec(
    map: &serde_json::Map<String, serde_json::Value>,
    path: &str,
) -> Result<SchemaNode, ScrubError> {
    let declared_type = map
        .get(TYPE_KEY)
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| ScrubError::invalid_schema(path, "'$type' must be a type name"))?;
    let value = map
        .get(DEFAULT_KEY)
        .ok_or_else(|| ScrubError::invalid_schema(path, "'$type' requires a '$default'"))?;
    if map.len() > 2 {
        return Err(ScrubError::invalid_schema(path, "only '$type' and '$default' are allowed here"));
    }

    Ok(SchemaNode::default_spec(
        declared_type,
        generators::parse_generator_or_literal(value, path)?,
    ))
}

impl From<Generator> for SchemaNode {
    fn from(generator: Generator) -> Self {
        SchemaNode::Generator(generator)
    }
}

impl From<ObjectSchema> for SchemaNode {
    fn from(schema: ObjectSchema) -> Self {
        SchemaNode::Object(schema)
    }
}

/// An ordered mapping from schema keys to sub-schemas.
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    entries: Vec<(SchemaKey, SchemaNode)>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, replacing an existing one with the same authored key
    /// in place.
    pub fn insert(&mut self, key: SchemaKey, node: SchemaNode) {
        match self.entries.iter_mut().find(|(k, _)| k.as_str() == key.as_str()) {
            Some(entry) => entry.1 = node,
            None => self.entries.push((key, node)),
        }
    }

    /// Builder form of [`insert`](Self::insert) for a literal field.
    pub fn field(mut self, name: impl Into<String>, node: impl Into<SchemaNode>) -> Self {
        self.insert(SchemaKey::Literal(name.into()), node.into());
        self
    }

    /// Builder form of [`insert`](Self::insert) for a pattern key; `regex` is
    /// given without the surrounding slashes.
    pub fn pattern(mut self, regex: &str, node: impl Into<SchemaNode>) -> Result<Self, ScrubError> {
        let key = SchemaKey::parse(&format!("/{}/", regex))?;
        self.insert(key, node.into());
        Ok(self)
    }

    pub fn entries(&self) -> &[(SchemaKey, SchemaNode)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn from_json(
        map: &serde_json::Map<String, serde_json::Value>,
        path: &str,
    ) -> Result<Self, ScrubError> {
        let mut schema = ObjectSchema::new();
        for (raw_key, json) in map {
            let key_path = if path.is_empty() {
                raw_key.clone()
            } else {
                format!("{}.{}", path, raw_key)
            };
            let key = SchemaKey::parse(raw_key)?;
            if key.is_pattern() {
                debug!("Schema key '{}' classified as a pattern key.", key_path);
            }
            schema.insert(key, SchemaNode::from_json(json, &key_path)?);
        }
        Ok(schema)
    }
}
