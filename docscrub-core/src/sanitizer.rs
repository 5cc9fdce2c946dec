// docscrub-core/src/sanitizer.rs
//! The record sanitizer: walks a record tree in lock-step with a schema and
//! rewrites the fields the schema selects.
//!
//! For each schema key, in declaration order, the key is expanded against the
//! record (see [`key_matcher::expand`]) and every target field is handled by
//! node kind:
//!
//! * `Generator` / `Default`: the field is replaced with the generated value.
//! * `Array`: every object element of an array field is sanitized with the
//!   element's object schema. Scalar and nested-array elements pass through.
//! * `Object`: an object field is sanitized recursively.
//!
//! Fields that are null or absent, and fields whose name starts with a digit,
//! are never touched. Structural mismatches (an array schema over a string,
//! say) leave the field as it is. Redaction only rewrites existing keys.
//!
//! In batch mode a record whose sanitization fails is dropped from the output;
//! its index is reported in [`SanitizeReport::dropped`].
//!
//! License: MIT OR APACHE 2.0

use log::{debug, info};

use crate::errors::ScrubError;
use crate::redaction_log::log_field_rewrite_debug;
use crate::schema::key_matcher;
use crate::schema::{DefaultSpec, ObjectSchema, SchemaNode};
use crate::value::{Map, Value};

/// Receives batch progress. Advanced once per input record, dropped or not.
pub trait Progress {
    fn start(&mut self, _total: usize) {}
    fn advance(&mut self) {}
    fn finish(&mut self) {}
}

/// A `Progress` that reports nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {}

/// Counts for a finished batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunStats {
    pub total: usize,
    pub kept: usize,
    pub dropped: usize,
}

/// Outcome of [`RecordSanitizer::sanitize_all`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SanitizeReport {
    /// Surviving records, in input order.
    pub records: Vec<Value>,
    /// Input indices of the records that failed and were dropped.
    pub dropped: Vec<usize>,
    pub total: usize,
}

impl SanitizeReport {
    pub fn stats(&self) -> RunStats {
        RunStats {
            total: self.total,
            kept: self.records.len(),
            dropped: self.dropped.len(),
        }
    }
}

/// Applies one object schema to records.
#[derive(Debug, Clone)]
pub struct RecordSanitizer {
    schema: ObjectSchema,
}

impl RecordSanitizer {
    pub fn new(schema: ObjectSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &ObjectSchema {
        &self.schema
    }

    /// Sanitizes a single record and hands it back.
    ///
    /// Non-object records have no fields to select and are returned unchanged.
    pub fn sanitize(&self, mut record: Value) -> Result<Value, ScrubError> {
        if let Value::Object(map) = &mut record {
            sanitize_object(map, &self.schema)?;
        }
        Ok(record)
    }

    /// Sanitizes every record, dropping the ones that fail.
    ///
    /// The output never grows and keeps the relative order of the survivors.
    pub fn sanitize_all(&self, records: Vec<Value>, progress: &mut dyn Progress) -> SanitizeReport {
        let total = records.len();
        progress.start(total);

        let initial = SanitizeReport {
            records: Vec::with_capacity(total),
            dropped: Vec::new(),
            total,
        };
        let report = records
            .into_iter()
            .enumerate()
            .fold(initial, |mut report, (index, record)| {
                match self.sanitize(record) {
                    Ok(clean) => report.records.push(clean),
                    Err(e) => {
                        debug!("Dropping record #{}: {}", index, e);
                        report.dropped.push(index);
                    }
                }
                progress.advance();
                report
            });

        progress.finish();
        let stats = report.stats();
        info!(
            "Sanitized {} record(s): {} kept, {} dropped.",
            stats.total, stats.kept, stats.dropped
        );
        report
    }

    /// Lazily sanitizes a stream of records, skipping the ones that fail.
    pub fn sanitize_iter<'a, I>(&'a self, records: I) -> impl Iterator<Item = Value> + 'a
    where
        I: IntoIterator<Item = Value>,
        I::IntoIter: 'a,
    {
        records
            .into_iter()
            .enumerate()
            .filter_map(move |(index, record)| match self.sanitize(record) {
                Ok(clean) => Some(clean),
                Err(e) => {
                    debug!("Dropping streamed record #{}: {}", index, e);
                    None
                }
            })
    }
}

/// Numeric-looking keys (array-index shaped) are never redacted.
fn is_numeric_key(key: &str) -> bool {
    key.as_bytes().first().is_some_and(u8::is_ascii_digit)
}

/// Sanitizes `record` in place against `schema`.
pub fn sanitize_object(record: &mut Map, schema: &ObjectSchema) -> Result<(), ScrubError> {
    for (schema_key, node) in schema.entries() {
        for key in key_matcher::expand(schema_key, Some(&*record)) {
            if is_numeric_key(&key) {
                continue;
            }
            match record.get(&key) {
                None | Some(Value::Null) => continue,
                Some(_) => {}
            }

            match node {
                SchemaNode::Generator(generator)
                | SchemaNode::Default(DefaultSpec { value: generator, .. }) => {
                    let replacement = generator.generate(record)?;
                    if let Some(original) = record.insert(key.clone(), replacement) {
                        if let Some(replacement) = record.get(&key) {
                            log_field_rewrite_debug(&key, &original, replacement, generator.name());
                        }
                    }
                }
                SchemaNode::Array(element) => {
                    if let Some(Value::Array(items)) = record.get_mut(&key) {
                        for item in items.iter_mut() {
                            sanitize_element(item, element)?;
                        }
                    }
                }
                SchemaNode::Object(nested) => {
                    if let Some(Value::Object(inner)) = record.get_mut(&key) {
                        sanitize_object(inner, nested)?;
                    }
                }
            }
        }
    }
    Ok(())
}

/// Applies an array's element schema to one element. Only object schemas
/// over object elements select fields; any other element is left as it is.
fn sanitize_element(item: &mut Value, node: &SchemaNode) -> Result<(), ScrubError> {
    match (node, item) {
        (SchemaNode::Object(nested), Value::Object(map)) => sanitize_object(map, nested),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::Generator;
    use anyhow::anyhow;
    use serde_json::json;

    fn value(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    #[derive(Default)]
    struct CountingProgress {
        started_with: Option<usize>,
        advanced: usize,
        finished: bool,
    }

    impl Progress for CountingProgress {
        fn start(&mut self, total: usize) {
            self.started_with = Some(total);
        }
        fn advance(&mut self) {
            self.advanced += 1;
        }
        fn finish(&mut self) {
            self.finished = true;
        }
    }

    #[test]
    fn test_literal_field_is_rewritten() {
        let sanitizer = RecordSanitizer::new(
            ObjectSchema::new().field("email", Generator::literal("redacted@example.com")),
        );
        let out = sanitizer.sanitize(value(json!({ "email": "a@b.com", "id": 7 }))).unwrap();
        assert_eq!(out, value(json!({ "email": "redacted@example.com", "id": 7 })));
    }

    #[test]
    fn test_absent_and_null_fields_are_not_created() {
        let sanitizer = RecordSanitizer::new(
            ObjectSchema::new()
                .field("email", Generator::literal("x"))
                .field("phone", Generator::literal("y")),
        );
        let out = sanitizer.sanitize(value(json!({ "phone": null, "id": 1 }))).unwrap();
        assert_eq!(out, value(json!({ "phone": null, "id": 1 })));
    }

    #[test]
    fn test_falsy_but_present_values_are_rewritten() {
        let sanitizer = RecordSanitizer::new(
            ObjectSchema::new()
                .field("count", Generator::literal(-1))
                .field("note", Generator::literal("n/a")),
        );
        let out = sanitizer.sanitize(value(json!({ "count": 0, "note": "" }))).unwrap();
        assert_eq!(out, value(json!({ "count": -1, "note": "n/a" })));
    }

    #[test]
    fn test_digit_leading_keys_are_never_rewritten() {
        let sanitizer = RecordSanitizer::new(
            ObjectSchema::new()
                .field("0", Generator::literal("x"))
                .pattern(".*", Generator::literal("R"))
                .unwrap(),
        );
        let out = sanitizer
            .sanitize(value(json!({ "0": "keep", "1st": "keep", "name": "drop" })))
            .unwrap();
        assert_eq!(out, value(json!({ "0": "keep", "1st": "keep", "name": "R" })));
    }

    #[test]
    fn test_pattern_keys_rewrite_every_match() {
        let sanitizer = RecordSanitizer::new(
            ObjectSchema::new().pattern("^addr_", Generator::literal("REDACTED")).unwrap(),
        );
        let out = sanitizer
            .sanitize(value(json!({ "addr_city": "Paris", "addr_zip": "75000", "name": "X" })))
            .unwrap();
        assert_eq!(
            out,
            value(json!({ "addr_city": "REDACTED", "addr_zip": "REDACTED", "name": "X" }))
        );
    }

    #[test]
    fn test_array_schema_applies_to_every_element() {
        let sanitizer = RecordSanitizer::new(ObjectSchema::new().field(
            "items",
            SchemaNode::array(ObjectSchema::new().field("secret", Generator::literal(0))),
        ));
        let out = sanitizer
            .sanitize(value(json!({ "items": [{ "secret": 42, "id": 1 }, { "secret": 7, "id": 2 }] })))
            .unwrap();
        assert_eq!(
            out,
            value(json!({ "items": [{ "secret": 0, "id": 1 }, { "secret": 0, "id": 2 }] }))
        );
    }

    #[test]
    fn test_empty_array_passes_through() {
        let sanitizer = RecordSanitizer::new(ObjectSchema::new().field(
            "items",
            SchemaNode::array(ObjectSchema::new().field("secret", Generator::literal(0))),
        ));
        let out = sanitizer.sanitize(value(json!({ "items": [] }))).unwrap();
        assert_eq!(out, value(json!({ "items": [] })));
    }

    #[test]
    fn test_array_of_scalars_is_left_untouched() {
        let sanitizer = RecordSanitizer::new(
            ObjectSchema::new()
                .field("tags", SchemaNode::array(Generator::literal("REDACTED")))
                .field("codes", SchemaNode::array(SchemaNode::default_spec("string", Generator::literal("x")))),
        );
        let input = value(json!({ "tags": ["a", "b"], "codes": ["c", null] }));
        assert_eq!(sanitizer.sanitize(input.clone()).unwrap(), input);
    }

    #[test]
    fn test_element_shape_mismatch_leaves_element_untouched() {
        let sanitizer = RecordSanitizer::new(
            ObjectSchema::new()
                .field("items", SchemaNode::array(ObjectSchema::new().field("secret", Generator::literal(0))))
                .field(
                    "matrix",
                    SchemaNode::array(SchemaNode::array(ObjectSchema::new().field("secret", Generator::literal(0)))),
                ),
        );
        let out = sanitizer
            .sanitize(value(json!({
                "items": ["plain", [{ "secret": 1 }], null, { "secret": 2 }],
                "matrix": [[{ "secret": 3 }]]
            })))
            .unwrap();
        assert_eq!(
            out,
            value(json!({
                "items": ["plain", [{ "secret": 1 }], null, { "secret": 0 }],
                "matrix": [[{ "secret": 3 }]]
            }))
        );
    }

    #[test]
    fn test_structural_mismatch_leaves_value_untouched() {
        let sanitizer = RecordSanitizer::new(
            ObjectSchema::new()
                .field("items", SchemaNode::array(ObjectSchema::new().field("a", Generator::literal(1))))
                .field("profile", ObjectSchema::new().field("b", Generator::literal(2))),
        );
        let input = value(json!({ "items": "not-an-array", "profile": [1, 2] }));
        assert_eq!(sanitizer.sanitize(input.clone()).unwrap(), input);
    }

    #[test]
    fn test_nested_objects_recurse_in_place() {
        let sanitizer = RecordSanitizer::new(ObjectSchema::new().field(
            "profile",
            ObjectSchema::new().field(
                "contact",
                ObjectSchema::new().field("phone", SchemaNode::default_spec("string", Generator::literal("000"))),
            ),
        ));
        let out = sanitizer
            .sanitize(value(json!({ "profile": { "contact": { "phone": "555-1234", "kind": "mobile" } } })))
            .unwrap();
        assert_eq!(
            out,
            value(json!({ "profile": { "contact": { "phone": "000", "kind": "mobile" } } }))
        );
    }

    #[test]
    fn test_rewrite_keeps_key_position() {
        let sanitizer = RecordSanitizer::new(ObjectSchema::new().field("b", Generator::literal("x")));
        let out = sanitizer.sanitize(value(json!({ "a": 1, "b": 2, "c": 3 }))).unwrap();
        let keys: Vec<&String> = out.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_derive_generator_sees_owning_record() {
        let sanitizer = RecordSanitizer::new(ObjectSchema::new().field(
            "login",
            Generator::derive("login-from-id", |record| {
                let id = record.get("id").map(|v| v.to_plain_json().to_string()).unwrap_or_default();
                Ok(Value::String(format!("user-{}", id)))
            }),
        ));
        let out = sanitizer.sanitize(value(json!({ "id": 9, "login": "jdoe" }))).unwrap();
        assert_eq!(out, value(json!({ "id": 9, "login": "user-9" })));
    }

    #[test]
    fn test_non_object_records_pass_through() {
        let sanitizer = RecordSanitizer::new(
            ObjectSchema::new().pattern(".*", Generator::literal("R")).unwrap(),
        );
        assert_eq!(sanitizer.sanitize(Value::Null).unwrap(), Value::Null);
        assert_eq!(sanitizer.sanitize(value(json!([1, 2]))).unwrap(), value(json!([1, 2])));
    }

    #[test]
    fn test_failing_record_is_dropped_and_others_survive() {
        let sanitizer = RecordSanitizer::new(ObjectSchema::new().field(
            "email",
            Generator::derive("strict-email", |record| match record.get("id") {
                Some(id) if *id == Value::from(2) => Err(anyhow!("cannot redact record 2")),
                _ => Ok(Value::from("redacted@example.com")),
            }),
        ));
        let records = vec![
            value(json!({ "id": 1, "email": "a@b.com" })),
            value(json!({ "id": 2, "email": "c@d.com" })),
            value(json!({ "id": 3, "email": "e@f.com" })),
        ];
        let mut progress = CountingProgress::default();
        let report = sanitizer.sanitize_all(records, &mut progress);

        assert_eq!(
            report.records,
            vec![
                value(json!({ "id": 1, "email": "redacted@example.com" })),
                value(json!({ "id": 3, "email": "redacted@example.com" })),
            ]
        );
        assert_eq!(report.dropped, vec![1]);
        assert_eq!(report.stats(), RunStats { total: 3, kept: 2, dropped: 1 });
        assert_eq!(progress.started_with, Some(3));
        assert_eq!(progress.advanced, 3);
        assert!(progress.finished);
    }

    #[test]
    fn test_failure_inside_array_element_drops_whole_record() {
        let sanitizer = RecordSanitizer::new(ObjectSchema::new().field(
            "items",
            SchemaNode::array(
                ObjectSchema::new().field("secret", Generator::produce("fails", || Err(anyhow!("boom")))),
            ),
        ));
        let records = vec![
            value(json!({ "items": [{ "secret": 1 }] })),
            value(json!({ "items": [] })),
        ];
        let report = sanitizer.sanitize_all(records, &mut NoProgress);
        assert_eq!(report.records, vec![value(json!({ "items": [] }))]);
        assert_eq!(report.dropped, vec![0]);
    }

    #[test]
    fn test_output_is_never_longer_than_input() {
        let sanitizer = RecordSanitizer::new(ObjectSchema::new().field("a", Generator::literal(1)));
        for n in 0..5 {
            let records: Vec<Value> = (0..n).map(|i| value(json!({ "a": i }))).collect();
            let report = sanitizer.sanitize_all(records, &mut NoProgress);
            assert!(report.records.len() <= n);
            assert_eq!(report.total, n);
        }
    }

    #[test]
    fn test_sanitize_iter_matches_batch_survivors() {
        let sanitizer = RecordSanitizer::new(ObjectSchema::new().field(
            "a",
            Generator::derive("odd-only", |record| match record.get("a") {
                Some(Value::Number(n)) if n.as_i64().unwrap_or(0) % 2 == 0 => Err(anyhow!("even")),
                _ => Ok(Value::from("odd")),
            }),
        ));
        let records: Vec<Value> = (1..=4).map(|i| value(json!({ "a": i }))).collect();
        let streamed: Vec<Value> = sanitizer.sanitize_iter(records.clone()).collect();
        let batch = sanitizer.sanitize_all(records, &mut NoProgress);
        assert_eq!(streamed, batch.records);
        assert_eq!(batch.dropped, vec![1, 3]);
    }
}
