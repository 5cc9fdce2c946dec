// docscrub-core/src/redaction_log.rs
//! Debug logging helpers that keep original field values out of logs.

use lazy_static::lazy_static;
use log::debug;

use crate::value::Value;

lazy_static! {
    /// Whether original values may appear in debug logs. Initialized once.
    static ref PII_DEBUG_ALLOWED: bool = {
        std::env::var("DOCSCRUB_ALLOW_DEBUG_PII")
            .map(|s| s.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    };
}

pub fn redact_sensitive(s: &str) -> String {
    const MAX_LEN: usize = 8;
    if s.len() <= MAX_LEN {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED: {} chars]", s.len())
    }
}

fn get_loggable_value(value: &Value) -> String {
    let rendered = value.to_plain_json().to_string();
    if *PII_DEBUG_ALLOWED {
        rendered
    } else {
        redact_sensitive(&rendered)
    }
}

pub fn log_field_rewrite_debug(key: &str, original: &Value, replacement: &Value, generator: &str) {
    if !log::log_enabled!(log::Level::Debug) {
        return;
    }
    debug!(
        "Rewrote field '{}' with generator '{}': Original={}, Redacted={}",
        key,
        generator,
        get_loggable_value(original),
        replacement.to_plain_json()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_sensitive_short_string() {
        assert_eq!(redact_sensitive("abc"), "[REDACTED]".to_string());
    }

    #[test]
    fn test_redact_sensitive_long_string() {
        assert_eq!(redact_sensitive("123456789"), "[REDACTED: 9 chars]".to_string());
    }
}
