// docscrub-core/src/generators.rs
//! Redaction generators: the leaves of a sanitization schema.
//!
//! A generator produces the replacement for a redacted field. There are two
//! invocation modes and they are explicit variants rather than a naming
//! convention:
//!
//! * `Literal` / `Produce` take no input and yield a value.
//! * `Derive` receives the record that owns the field being rewritten, so the
//!   replacement can be computed from other fields (or from the original value).
//!
//! Declarative schemas name generators through directive objects:
//!
//! ```yaml
//! email: { $redact: "redacted@example.com" }
//! token: { $generate: uuid }
//! user_ref: { $derive: digest, field: user_id }
//! login: { $derive: template, template: "user-{id}" }
//! ```
//!
//! License: MIT OR APACHE 2.0

use std::fmt;
use std::sync::Arc;

use anyhow::anyhow;
use chrono::Utc;
use sha2::{Digest, Sha256};
use tinytemplate::TinyTemplate;
use uuid::Uuid;

use crate::errors::ScrubError;
use crate::value::{Map, Value};

pub const REDACT_KEY: &str = "$redact";
pub const GENERATE_KEY: &str = "$generate";
pub const DERIVE_KEY: &str = "$derive";

const TEMPLATE_NAME: &str = "replacement";

/// A zero-argument replacement producer.
pub type ProduceFn = dyn Fn() -> anyhow::Result<Value> + Send + Sync;

/// A replacement computed from the record that owns the field.
pub type DeriveFn = dyn Fn(&Map) -> anyhow::Result<Value> + Send + Sync;

/// Produces the replacement value for a redacted field.
#[derive(Clone)]
pub enum Generator {
    /// A constant replacement, cloned on every use.
    Literal(Value),
    /// Invoked with no arguments.
    Produce { name: String, func: Arc<ProduceFn> },
    /// Invoked with the record that owns the field being rewritten.
    Derive { name: String, func: Arc<DeriveFn> },
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Generator::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Generator::Produce { name, .. } => f.debug_struct("Produce").field("name", name).finish(),
            Generator::Derive { name, .. } => f.debug_struct("Derive").field("name", name).finish(),
        }
    }
}

impl Generator {
    pub fn literal(value: impl Into<Value>) -> Self {
        Generator::Literal(value.into())
    }

    pub fn produce<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn() -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Generator::Produce { name: name.into(), func: Arc::new(func) }
    }

    pub fn derive<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Map) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Generator::Derive { name: name.into(), func: Arc::new(func) }
    }

    pub fn name(&self) -> &str {
        match self {
            Generator::Literal(_) => "literal",
            Generator::Produce { name, .. } | Generator::Derive { name, .. } => name,
        }
    }

    /// Runs the generator. `record` is only read by `Derive` generators.
    pub fn generate(&self, record: &Map) -> Result<Value, ScrubError> {
        match self {
            Generator::Literal(value) => Ok(value.clone()),
            Generator::Produce { name, func } => func()
                .map_err(|source| ScrubError::GeneratorFailed { name: name.clone(), source }),
            Generator::Derive { name, func } => func(record)
                .map_err(|source| ScrubError::GeneratorFailed { name: name.clone(), source }),
        }
    }

    /// Resolves a `$generate` name to a built-in zero-argument generator.
    pub fn builtin(name: &str) -> Result<Self, ScrubError> {
        match name {
            "uuid" => Ok(Generator::produce("uuid", || Ok(Value::String(Uuid::new_v4().to_string())))),
            "now" => Ok(Generator::produce("now", || Ok(Value::Date(Utc::now())))),
            "null" => Ok(Generator::Literal(Value::Null)),
            other => Err(ScrubError::UnknownGenerator(other.to_string())),
        }
    }

    /// Resolves a `$derive` name plus its options to a built-in record-aware generator.
    pub fn derive_builtin(
        name: &str,
        options: &serde_json::Map<String, serde_json::Value>,
        path: &str,
    ) -> Result<Self, ScrubError> {
        match name {
            "digest" => {
                let field = required_option(options, "field", path)?;
                Ok(digest_generator(field))
            }
            "template" => {
                let text = required_option(options, "template", path)?;
                template_generator(text, path)
            }
            other => Err(ScrubError::UnknownGenerator(other.to_string())),
        }
    }
}

fn required_option(
    options: &serde_json::Map<String, serde_json::Value>,
    key: &str,
    path: &str,
) -> Result<String, ScrubError> {
    options
        .get(key)
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ScrubError::invalid_schema(path, format!("missing string option '{}'", key)))
}

/// Hex SHA-256 of a sibling field. Strings and binaries hash their raw bytes,
/// everything else hashes its JSON rendering.
fn digest_generator(field: String) -> Generator {
    Generator::derive("digest", move |record| {
        let value = record
            .get(&field)
            .filter(|v| !v.is_null())
            .ok_or_else(|| anyhow!("field '{}' is missing from the record", field))?;

        let mut hasher = Sha256::new();
        match value {
            Value::String(s) => hasher.update(s.as_bytes()),
            Value::Binary(bytes) => hasher.update(bytes),
            other => hasher.update(other.to_plain_json().to_string().as_bytes()),
        }
        Ok(Value::String(hex::encode(hasher.finalize())))
    })
}

fn template_generator(text: String, path: &str) -> Result<Generator, ScrubError> {
    {
        let mut tt = TinyTemplate::new();
        tt.add_template(TEMPLATE_NAME, &text)
            .map_err(|e| ScrubError::invalid_schema(path, format!("invalid template: {}", e)))?;
    }

    Ok(Generator::derive("template", move |record| {
        let mut tt = TinyTemplate::new();
        tt.set_default_formatter(&tinytemplate::format_unescaped);
        tt.add_template(TEMPLATE_NAME, &text)?;

        let context: serde_json::Map<String, serde_json::Value> = record
            .iter()
            .map(|(k, v)| (k.clone(), v.to_plain_json()))
            .collect();
        Ok(Value::String(tt.render(TEMPLATE_NAME, &context)?))
    }))
}

/// Parses a directive object (`$redact`, `$generate`, `$derive`).
///
/// Returns `Ok(None)` when `map` carries no directive key.
pub(crate) fn parse_directive(
    map: &serde_json::Map<String, serde_json::Value>,
    path: &str,
) -> Result<Option<Generator>, ScrubError> {
    let directives: Vec<&str> = [REDACT_KEY, GENERATE_KEY, DERIVE_KEY]
        .into_iter()
        .filter(|k| map.contains_key(*k))
        .collect();

    match directives.as_slice() {
        [] => Ok(None),
        [REDACT_KEY] => {
            if map.len() > 1 {
                return Err(ScrubError::invalid_schema(path, "'$redact' takes no options"));
            }
            Ok(map.get(REDACT_KEY).map(|v| Generator::Literal(Value::from(v.clone()))))
        }
        [GENERATE_KEY] => {
            if map.len() > 1 {
                return Err(ScrubError::invalid_schema(path, "'$generate' takes no options"));
            }
            let name = map
                .get(GENERATE_KEY)
                .and_then(serde_json::Value::as_str)
                .ok_or_else(|| ScrubError::invalid_schema(path, "'$generate' must name a generator"))?;
            Generator::builtin(name).map(Some)
        }
        [DERIVE_KEY] => {
            let name = map
                .get(DERIVE_KEY)
                .and_then(serde_json::Value::as_str)
                .ok_or_else(|| ScrubError::invalid_schema(path, "'$derive' must name a generator"))?;
            Generator::derive_builtin(name, map, path).map(Some)
        }
        _ => Err(ScrubError::invalid_schema(
            path,
            format!("conflicting generator directives: {}", directives.join(", ")),
        )),
    }
}

/// Parses the right-hand side of `$default`: a directive or any literal value.
pub(crate) fn parse_generator_or_literal(
    json: &serde_json::Value,
    path: &str,
) -> Result<Generator, ScrubError> {
    if let serde_json::Value::Object(map) = json {
        if let Some(generator) = parse_directive(map, path)? {
            return Ok(generator);
        }
    }
    Ok(Generator::Literal(Value::from(json.clone())))
}
