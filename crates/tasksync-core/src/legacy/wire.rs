use serde_json::{Map, Value};

use crate::models::{
    Backend, NodeId, PromptId, SyncError, SyncErrorKind, SyncResult, TaskPrompt,
};

/// Parses a prompt record as the legacy endpoints send it.
///
/// Two encodings are in circulation: the positional array
/// `[number, prompt_id, prompt, extra_data, outputs_to_execute]` and an
/// object keyed by the same names (`priority` accepted for `number`).
/// Trailing array elements beyond the fifth are ignored.
pub(crate) fn parse_prompt(value: &Value) -> SyncResult<TaskPrompt> {
    match value {
        Value::Array(fields) => prompt_from_fields(fields),
        Value::Object(fields) => prompt_from_object(fields),
        _ => Err(parse_error("prompt record must be an array or an object")),
    }
}

fn prompt_from_fields(fields: &[Value]) -> SyncResult<TaskPrompt> {
    let priority = fields
        .first()
        .and_then(as_priority)
        .ok_or_else(|| parse_error("prompt record is missing its number"))?;
    let prompt_id = fields
        .get(1)
        .and_then(Value::as_str)
        .ok_or_else(|| parse_error("prompt record is missing its prompt_id"))?;

    Ok(TaskPrompt {
        priority,
        prompt_id: PromptId::from(prompt_id),
        inputs: object_or_empty(fields.get(2)),
        extra_data: object_or_empty(fields.get(3)),
        outputs_to_execute: node_ids(fields.get(4)),
    })
}

fn prompt_from_object(fields: &Map<String, Value>) -> SyncResult<TaskPrompt> {
    let priority = fields
        .get("number")
        .or_else(|| fields.get("priority"))
        .and_then(as_priority)
        .ok_or_else(|| parse_error("prompt object is missing its number"))?;
    let prompt_id = fields
        .get("prompt_id")
        .and_then(Value::as_str)
        .ok_or_else(|| parse_error("prompt object is missing its prompt_id"))?;

    Ok(TaskPrompt {
        priority,
        prompt_id: PromptId::from(prompt_id),
        inputs: object_or_empty(fields.get("prompt")),
        extra_data: object_or_empty(fields.get("extra_data")),
        outputs_to_execute: node_ids(fields.get("outputs_to_execute")),
    })
}

fn as_priority(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|priority| priority as i64))
}

fn object_or_empty(value: Option<&Value>) -> Map<String, Value> {
    value
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}

fn node_ids(value: Option<&Value>) -> Vec<NodeId> {
    let Some(ids) = value.and_then(Value::as_array) else {
        return Vec::new();
    };

    ids.iter()
        .filter_map(|id| match id {
            Value::String(id) => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        })
        .collect()
}

fn parse_error(message: &str) -> SyncError {
    SyncError {
        backend: Some(Backend::Legacy),
        operation: None,
        kind: SyncErrorKind::ParseFailure,
        message: message.to_string(),
    }
}
