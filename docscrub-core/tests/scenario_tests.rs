// docscrub-core/tests/scenario_tests.rs
//! End-to-end sanitization scenarios driven through authored (YAML) definitions.

use anyhow::{anyhow, Result};
use chrono::{TimeZone, Utc};
use serde_json::json;

use docscrub_core::{
    compile, format_records, Generator, NoProgress, ObjectSchema, SanitizerDefinition, Value,
};

fn records(json: serde_json::Value) -> Vec<Value> {
    match Value::from(json) {
        Value::Array(items) => items,
        _ => panic!("records must be an array"),
    }
}

#[test_log::test]
fn scenario_a_literal_field() -> Result<()> {
    let definition = SanitizerDefinition::from_yaml_str(
        r#"
collection: users
schema:
  email: { $redact: "redacted@example.com" }
"#,
    )?;
    let report = definition
        .sanitizer()
        .sanitize_all(records(json!([{ "email": "a@b.com", "id": 7 }])), &mut NoProgress);

    assert_eq!(
        report.records,
        records(json!([{ "email": "redacted@example.com", "id": 7 }]))
    );
    Ok(())
}

#[test]
fn scenario_b_pattern_key() -> Result<()> {
    let definition = SanitizerDefinition::from_yaml_str(
        r#"
collection: users
schema:
  "/^addr_/": REDACTED
"#,
    )?;
    let out = definition
        .sanitizer()
        .sanitize(Value::from(json!({ "addr_city": "Paris", "addr_zip": "75000", "name": "X" })))?;

    assert_eq!(
        out,
        Value::from(json!({ "addr_city": "REDACTED", "addr_zip": "REDACTED", "name": "X" }))
    );
    Ok(())
}

#[test]
fn scenario_c_array_of_objects() -> Result<()> {
    let definition = SanitizerDefinition::from_yaml_str(
        r#"
collection: orders
schema:
  items:
    - secret: 0
"#,
    )?;
    let out = definition.sanitizer().sanitize(Value::from(json!({
        "items": [{ "secret": 42, "id": 1 }, { "secret": 7, "id": 2 }]
    })))?;

    assert_eq!(
        out,
        Value::from(json!({ "items": [{ "secret": 0, "id": 1 }, { "secret": 0, "id": 2 }] }))
    );
    Ok(())
}

#[test]
fn array_of_scalars_under_a_generator_schema_is_kept() -> Result<()> {
    let definition = SanitizerDefinition::from_yaml_str(
        r#"
collection: posts
schema:
  tags: [REDACTED]
"#,
    )?;
    let report = definition
        .sanitizer()
        .sanitize_all(records(json!([{ "tags": ["a", "b"] }])), &mut NoProgress);

    assert_eq!(report.records, records(json!([{ "tags": ["a", "b"] }])));
    Ok(())
}

#[test_log::test]
fn scenario_d_failing_generator_drops_only_that_record() {
    let schema = ObjectSchema::new().field(
        "email",
        Generator::derive("refuses-vip", |record| {
            if record.get("vip") == Some(&Value::Bool(true)) {
                Err(anyhow!("vip records cannot be anonymized"))
            } else {
                Ok(Value::from("redacted@example.com"))
            }
        }),
    );
    let definition = SanitizerDefinition::new("users", schema);

    let report = definition.sanitizer().sanitize_all(
        records(json!([
            { "email": "a@b.com" },
            { "email": "boss@b.com", "vip": true },
            { "email": "c@d.com" }
        ])),
        &mut NoProgress,
    );

    assert_eq!(
        report.records,
        records(json!([
            { "email": "redacted@example.com" },
            { "email": "redacted@example.com" }
        ]))
    );
    assert_eq!(report.dropped, vec![1]);
}

#[test]
fn scenario_e_extended_json_wrappers() -> Result<()> {
    let mut record = docscrub_core::Map::new();
    record.insert("buffer".to_string(), Value::Binary(vec![0xde, 0xad, 0xbe, 0xef]));
    record.insert(
        "createdAt".to_string(),
        Value::Date(Utc.with_ymd_and_hms(2023, 5, 6, 7, 8, 9).unwrap()),
    );

    let text = format_records(&[Value::Object(record)])?;
    let parsed: serde_json::Value = serde_json::from_str(&text)?;
    assert_eq!(
        parsed,
        json!([{
            "buffer": { "$binary": { "base64": "3q2+7w==", "subType": "04" } },
            "createdAt": { "$date": "2023-05-06T07:08:09.000Z" }
        }])
    );
    Ok(())
}

#[test]
fn mixed_schema_with_defaults_digests_and_templates() -> Result<()> {
    let definition = SanitizerDefinition::from_yaml_str(
        r#"
collection: customers
schema:
  login: { $derive: template, template: "customer-{id}" }
  email_hash: { $derive: digest, field: email }
  email: { $redact: "redacted@example.com" }
  phone: { $type: string, $default: "000-0000" }
  profile:
    "/^addr_/": { $type: string, $default: { $redact: "REDACTED" } }
    "0": "never"
"#,
    )?;
    let out = definition.sanitizer().sanitize(Value::from(json!({
        "id": 12,
        "login": "jdoe",
        "email_hash": "placeholder",
        "email": "abc",
        "phone": "555",
        "profile": { "addr_street": "1 Main St", "0": "first", "nickname": "JD" }
    })))?;

    assert_eq!(
        out,
        Value::from(json!({
            "id": 12,
            "login": "customer-12",
            "email_hash": "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
            "email": "redacted@example.com",
            "phone": "000-0000",
            "profile": { "addr_street": "REDACTED", "0": "first", "nickname": "JD" }
        }))
    );

    assert_eq!(
        compile(&definition.schema).to_json(),
        json!({
            "login": "string",
            "email_hash": "string",
            "email": "string",
            "phone": "string",
            "profile": { "0": "string" }
        })
    );
    Ok(())
}
