//! compiler.rs - Projects a sanitization schema onto its structural shape.
//!
//! The resulting `Descriptor` is what a storage model needs to declare the
//! collection's fields: no generators, no patterns, only types and nesting.
//!
//! License: MIT OR APACHE 2.0

use indexmap::IndexMap;
use log::debug;
use serde::Serialize;

use crate::schema::{ObjectSchema, SchemaKey, SchemaNode};

/// The type every generator-backed field is declared with.
pub const GENERATED_FIELD_TYPE: &str = "string";

/// The structural projection of a schema.
///
/// Serializes to the plain shape a model declaration expects:
/// `"string"`, `[ ... ]` or `{ ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Descriptor {
    Field(String),
    Array(Vec<Descriptor>),
    Object(IndexMap<String, Descriptor>),
}

impl Descriptor {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Descriptor::Field(ty) => serde_json::Value::String(ty.clone()),
            Descriptor::Array(items) => {
                serde_json::Value::Array(items.iter().map(Descriptor::to_json).collect())
            }
            Descriptor::Object(fields) => serde_json::Value::Object(
                fields.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

/// Compiles an object schema into its descriptor.
///
/// Pattern keys are skipped: they do not name fixed fields. Field order follows
/// the schema's declaration order, so the output is deterministic.
pub fn compile(schema: &ObjectSchema) -> Descriptor {
    let mut fields = IndexMap::with_capacity(schema.len());
    for (key, node) in schema.entries() {
        match key {
            SchemaKey::Literal(name) => {
                fields.insert(name.clone(), compile_node(node));
            }
            SchemaKey::Pattern { source, .. } => {
                debug!("Skipping pattern key '{}' while compiling descriptor.", source);
            }
        }
    }
    Descriptor::Object(fields)
}

/// Compiles a single schema node.
pub fn compile_node(node: &SchemaNode) -> Descriptor {
    match node {
        SchemaNode::Generator(_) => Descriptor::Field(GENERATED_FIELD_TYPE.to_string()),
        SchemaNode::Default(spec) => Descriptor::Field(spec.declared_type.clone()),
        SchemaNode::Array(element) => Descriptor::Array(vec![compile_node(element)]),
        SchemaNode::Object(nested) => compile(nested),
    }
}
