//! Credential redaction for response traces

use serde_json::Value;

const REDACTED: &str = "<redacted>";
const SECRET_KEYS: [&str; 4] = ["session_token", "app_token", "password", "challenge"];

/// Render a response body for logging with every secret value masked.
///
/// Non-JSON bodies are summarized by length only since they cannot be
/// inspected for secrets.
pub fn redact_body(body: &[u8]) -> String {
    match serde_json::from_slice::<Value>(body) {
        Ok(mut value) => {
            redact_value(&mut value);
            value.to_string()
        }
        Err(_) => format!("<{} bytes of non-JSON body>", body.len()),
    }
}

fn redact_value(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, inner) in map.iter_mut() {
                if SECRET_KEYS.contains(&key.as_str()) {
                    *inner = Value::String(REDACTED.to_string());
                } else {
                    redact_value(inner);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact_value),
        _ => {}
    }
}
