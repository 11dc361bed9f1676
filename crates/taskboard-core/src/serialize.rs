use serde::Serialize;
use serde_json::Value;

use crate::error::CoreError;
use crate::id::TaskId;

/// `tag`, a NUL byte, then the value as compact JSON with every object's
/// keys in byte order, so field declaration order never shows up in the bytes.
pub fn canonical_serialize(tag: &str, value: &impl Serialize) -> Result<Vec<u8>, CoreError> {
    let json = serde_json::to_string(&with_sorted_keys(serde_json::to_value(value)?))?;
    Ok([tag.as_bytes(), b"\0".as_slice(), json.as_bytes()].concat())
}

/// Mint a task id from a serializable value and a salt.
///
/// The salt (creation timestamp, sequence number) keeps two otherwise
/// identical drafts from colliding.
pub fn mint_id(tag: &str, value: &impl Serialize, salt: &str) -> Result<TaskId, CoreError> {
    let mut bytes = canonical_serialize(tag, value)?;
    bytes.push(0);
    bytes.extend_from_slice(salt.as_bytes());
    Ok(TaskId::mint(&bytes))
}

fn with_sorted_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, inner)| (key, with_sorted_keys(inner)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(with_sorted_keys).collect()),
        scalar => scalar,
    }
}
