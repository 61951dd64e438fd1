//! `{"type": "<event>", "data": <payload>}` frames as plain JSON.

use serde_json::{json, Value};

/// Encode an inbound frame. `Value::Null` omits `data`.
pub fn frame(event: &str, data: Value) -> String {
    if data.is_null() {
        json!({ "type": event }).to_string()
    } else {
        json!({ "type": event, "data": data }).to_string()
    }
}

pub fn select_character(name: &str) -> String {
    frame("selectCharacter", json!(name))
}

pub fn player_ready() -> String {
    frame("playerReady", Value::Null)
}

pub fn player_action(attack: &str, block: &str) -> String {
    frame("playerAction", json!({ "attack": attack, "block": block }))
}

/// The `type` of an outbound frame, if any.
pub fn event_name(frame: &Value) -> Option<&str> {
    frame.get("type").and_then(Value::as_str)
}

/// The `data` of an outbound frame, or `Null`.
pub fn payload(frame: &Value) -> &Value {
    frame.get("data").unwrap_or(&Value::Null)
}
