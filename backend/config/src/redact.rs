//! Config redaction: produce safe-to-log config snapshots by masking sensitive fields.

use once_cell::sync::Lazy;
use serde_json::Value;

/// Keys whose string values are secrets.
static SENSITIVE_KEYS: Lazy<Vec<&'static str>> =
    Lazy::new(|| vec!["botToken", "bot_token", "token", "secret", "password"]);

/// Mask a secret, keeping a short prefix as a hint. For bot tokens the prefix is
/// the public bot id before the colon.
pub fn mask_secret(s: &str) -> String {
    if let Some((bot_id, _)) = s.split_once(':') {
        return format!("{bot_id}:***");
    }
    if s.chars().count() > 8 {
        format!("{}***", s.chars().take(4).collect::<String>())
    } else {
        "***".to_string()
    }
}

/// Redact a config JSON value, replacing all sensitive fields with a masked hint.
pub fn redact(value: &Value) -> Value {
    redact_recursive(value, "")
}

fn is_sensitive_key(key: &str) -> bool {
    SENSITIVE_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

fn redact_recursive(value: &Value, key: &str) -> Value {
    match value {
        Value::String(s) if is_sensitive_key(key) && !s.is_empty() => {
            Value::String(mask_secret(s))
        }
        Value::Array(arr) => {
            Value::Array(arr.iter().map(|v| redact_recursive(v, key)).collect())
        }
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                result.insert(k.clone(), redact_recursive(v, k));
            }
            Value::Object(result)
        }
        other => other.clone(),
    }
}
