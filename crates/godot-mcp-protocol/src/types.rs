//! Command and reply envelope types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single remote operation request: `{"method": ..., "params": {...}}`.
///
/// Commands are constructed fresh for every call and never reused; they have
/// no identity beyond the one request/reply exchange they travel in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// Name of the remote operation (e.g. `get_scene_tree`, `add_node`).
    pub method: String,

    /// Flat key/value parameter bag. Serialized as `{}` when empty.
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl Command {
    /// Creates a command with no parameters.
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            params: Map::new(),
        }
    }

    /// Builder: adds one parameter.
    pub fn arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// A reply object from the editor plugin.
///
/// Success carries a `result` key and failure an `error` key; exactly one of
/// the two is present (a remote guarantee, not re-validated here). The plugin
/// may add sibling context fields next to either (`path`, `tree`, `source`,
/// ...), so the whole object is kept and exposed through accessors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reply {
    fields: Map<String, Value>,
}

impl Reply {
    /// Returns the `error` message if this reply signals a remote failure.
    pub fn error(&self) -> Option<&str> {
        self.fields.get("error").and_then(Value::as_str)
    }

    /// Returns true if the reply carries an `error` key.
    pub fn is_error(&self) -> bool {
        self.fields.contains_key("error")
    }

    /// Returns the `result` value on success.
    pub fn result(&self) -> Option<&Value> {
        self.fields.get("result")
    }

    /// Returns an arbitrary reply field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Returns an arbitrary reply field as a string slice.
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Consumes the reply, returning the underlying object.
    pub fn into_inner(self) -> Map<String, Value> {
        self.fields
    }
}

impl From<Map<String, Value>> for Reply {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn command_serializes_empty_params_as_object() {
        let command = Command::new("ping");
        let json = serde_json::to_string(&command).unwrap();
        assert_eq!(json, r#"{"method":"ping","params":{}}"#);
    }

    #[test]
    fn command_arg_builder() {
        let command = Command::new("add_node")
            .arg("type", "Sprite2D")
            .arg("name", "Player")
            .arg("parent_path", ".");
        assert_eq!(command.method, "add_node");
        assert_eq!(command.params["type"], json!("Sprite2D"));
        assert_eq!(command.params["parent_path"], json!("."));
    }

    #[test]
    fn command_arg_accepts_json_values() {
        let command = Command::new("save_game_data")
            .arg("filename", "save.json")
            .arg("data", json!({"level": 5, "score": 1000}));
        assert_eq!(command.params["data"]["level"], json!(5));
    }

    #[test]
    fn reply_success_accessors() {
        let reply: Reply =
            serde_json::from_str(r#"{"result":"ok","path":"Root/Player"}"#).unwrap();
        assert!(!reply.is_error());
        assert_eq!(reply.error(), None);
        assert_eq!(reply.result(), Some(&json!("ok")));
        assert_eq!(reply.field_str("path"), Some("Root/Player"));
    }

    #[test]
    fn reply_error_accessors() {
        let reply: Reply =
            serde_json::from_str(r#"{"error":"Node not found","source":"x"}"#).unwrap();
        assert!(reply.is_error());
        assert_eq!(reply.error(), Some("Node not found"));
        assert_eq!(reply.result(), None);
        assert_eq!(reply.field_str("source"), Some("x"));
    }

    #[test]
    fn reply_reserializes_whole_object() {
        let raw = r#"{"scenes":["res://main.tscn"],"result":"ok"}"#;
        let reply: Reply = serde_json::from_str(raw).unwrap();
        let out = serde_json::to_value(&reply).unwrap();
        assert_eq!(out["scenes"][0], json!("res://main.tscn"));
        assert_eq!(out["result"], json!("ok"));
    }
}
