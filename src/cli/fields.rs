//! Parsing of `KEY=VALUE` field arguments into an item's field map.

use serde_json::{Map, Value};

use crate::errors::{Result, VaultError};

/// Parse a list of `KEY=VALUE` arguments into a JSON field map.
///
/// Values that parse as JSON scalars (numbers, booleans, null) keep
/// their type; everything else is stored as a string.
pub fn parse_field_pairs(pairs: &[String]) -> Result<Map<String, Value>> {
    let mut fields = Map::new();

    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            return Err(VaultError::CommandFailed(format!(
                "invalid field '{pair}' — expected KEY=VALUE"
            )));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(VaultError::CommandFailed(format!(
                "invalid field '{pair}' — key is empty"
            )));
        }

        fields.insert(key.to_string(), parse_scalar(value));
    }

    Ok(fields)
}

/// Interpret a raw argument value as a JSON scalar where possible.
fn parse_scalar(raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw) {
        Ok(v @ (Value::Number(_) | Value::Bool(_) | Value::Null)) => v,
        _ => Value::String(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_string_and_typed_values() {
        let pairs = vec![
            "username=alice".to_string(),
            "pin=1234".to_string(),
            "active=true".to_string(),
        ];
        let fields = parse_field_pairs(&pairs).unwrap();

        assert_eq!(fields["username"], json!("alice"));
        assert_eq!(fields["pin"], json!(1234));
        assert_eq!(fields["active"], json!(true));
    }

    #[test]
    fn value_may_contain_equals_sign() {
        let pairs = vec!["url=https://example.com?a=b".to_string()];
        let fields = parse_field_pairs(&pairs).unwrap();
        assert_eq!(fields["url"], json!("https://example.com?a=b"));
    }

    #[test]
    fn rejects_missing_equals() {
        let pairs = vec!["no-separator".to_string()];
        assert!(parse_field_pairs(&pairs).is_err());
    }

    #[test]
    fn rejects_empty_key() {
        let pairs = vec!["=value".to_string()];
        assert!(parse_field_pairs(&pairs).is_err());
    }
}
