//! Building action payloads from `key=value` command-line arguments

use crate::error::ClientError;
use serde_json::Value;
use shared::ActionPayload;

/// Splits `key=value`, parsing the value as JSON when it is valid JSON
///
/// `count=3` yields a number, `ready=true` a bool, and `name=alice` stays a
/// string. Quoting forces a string: `code="42"`.
pub fn parse_field(raw: &str) -> Result<(String, Value), ClientError> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| ClientError::InvalidField(raw.to_string()))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(ClientError::InvalidField(raw.to_string()));
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Builds a payload from the well-known fields plus any extras
///
/// Extras are applied last, so an explicit `username=...` extra wins over
/// the `username` argument.
pub fn build_payload(
    action: Option<&str>,
    username: Option<&str>,
    extras: &[String],
) -> Result<ActionPayload, ClientError> {
    let mut payload = ActionPayload::new();

    if let Some(action) = action {
        payload.insert("action".to_string(), Value::String(action.to_string()));
    }
    if let Some(username) = username {
        payload.insert("username".to_string(), Value::String(username.to_string()));
    }

    for raw in extras {
        let (key, value) = parse_field(raw)?;
        payload.insert(key, value);
    }

    Ok(payload)
}
