//! Wire format between the host and a render unit.
//!
//! Requests are the JSON array `[template, view, helpers]`; replies are
//! `[err, result]`. Each message is a single line of JSON. Replies come from
//! untrusted template code, so they are parsed as plain data and only ever
//! stringified.

use serde_json::Value;

use crate::application::view::RenderView;

use super::types::{RenderFailure, RenderOutcome, TemplateSpec};

pub(crate) fn encode_request(
    spec: &TemplateSpec,
    view: &RenderView,
) -> Result<String, serde_json::Error> {
    serde_json::to_string(&(&spec.value, view, &spec.helpers))
}

/// Template source, view data and helpers carried by a request.
pub(crate) fn decode_request(raw: &str) -> Result<(String, Value, String), serde_json::Error> {
    serde_json::from_str(raw.trim())
}

pub(crate) fn encode_reply(result: Result<String, String>) -> String {
    let reply = match result {
        Ok(text) => Value::Array(vec![Value::Null, Value::String(text)]),
        Err(message) => Value::Array(vec![Value::String(message), Value::Null]),
    };
    reply.to_string()
}

/// Map a raw reply onto an outcome. A truthy `err` wins over any `result`.
pub fn interpret_reply(raw: &str) -> RenderOutcome {
    let items = match serde_json::from_str::<Value>(raw.trim()) {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            return RenderOutcome::Failure(RenderFailure::worker(
                "render unit replied with a non-array message",
            ));
        }
        Err(err) => {
            return RenderOutcome::Failure(RenderFailure::worker(format!(
                "render unit replied with malformed JSON: {err}"
            )));
        }
    };

    let mut items = items.into_iter();
    let err = items.next().unwrap_or(Value::Null);
    let result = items.next().unwrap_or(Value::Null);

    if is_truthy(&err) {
        RenderOutcome::Failure(RenderFailure::template(stringify(&err)))
    } else {
        RenderOutcome::Success(stringify(&result))
    }
}

/// JavaScript truthiness over JSON values.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Strings pass through unchanged; anything else becomes compact JSON.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
