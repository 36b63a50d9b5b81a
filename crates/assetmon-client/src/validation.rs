//! Validation failure normalization.
//!
//! The server reports a rejected save as `{"detail": ...}` where `detail`
//! is either a single message or a list of `{"msg": ..., "loc": [...]}`
//! entries. Both shapes flatten to a list of messages.

use serde_json::Value;

/// Shown when an error carries no usable detail.
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred.";

/// Flatten a `detail` value into operator-facing messages.
///
/// List entries without a `msg` are rendered as their JSON text.
pub fn normalize_detail(detail: &Value) -> Vec<String> {
    match detail {
        Value::String(message) => vec![message.clone()],
        Value::Array(entries) => entries.iter().map(entry_message).collect(),
        _ => vec![UNEXPECTED_ERROR.to_string()],
    }
}

fn entry_message(entry: &Value) -> String {
    match entry {
        Value::Object(fields) => fields
            .get("msg")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| entry.to_string()),
        Value::String(message) => message.clone(),
        other => other.to_string(),
    }
}

/// Extract validation messages from an error response body.
///
/// Returns `None` if the body is not JSON or has no `detail` field.
pub fn validation_messages(body: &str) -> Option<Vec<String>> {
    let parsed: Value = serde_json::from_str(body).ok()?;
    parsed.get("detail").map(normalize_detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_detail() {
        assert_eq!(
            validation_messages(r#"{"detail":"Invalid email"}"#),
            Some(vec!["Invalid email".to_string()])
        );
    }

    #[test]
    fn test_array_detail() {
        let body = r#"{"detail":[{"msg":"Field required","loc":["body","name"]},{"msg":"Invalid email","loc":["body","alert_email"]}]}"#;
        assert_eq!(
            validation_messages(body),
            Some(vec!["Field required".to_string(), "Invalid email".to_string()])
        );
    }

    #[test]
    fn test_array_entries_without_msg() {
        let detail = json!(["plain text", 42, {"loc": ["body"]}]);
        assert_eq!(
            normalize_detail(&detail),
            vec![
                "plain text".to_string(),
                "42".to_string(),
                r#"{"loc":["body"]}"#.to_string(),
            ]
        );
    }

    #[test]
    fn test_unusable_bodies() {
        assert_eq!(validation_messages("<html>502</html>"), None);
        assert_eq!(validation_messages(r#"{"error":"x"}"#), None);
        assert_eq!(
            validation_messages(r#"{"detail":null}"#),
            Some(vec![UNEXPECTED_ERROR.to_string()])
        );
    }
}
