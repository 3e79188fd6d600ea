//! Incoming hook event model.
//!
//! The host agent sends one JSON object per invocation. Top-level keys
//! describe the session and lifecycle point; tool arguments are nested
//! under `tool_input`. Every field is optional: a key that is absent (or
//! `null` or not a string) decodes to `None`, never to an error. Only a
//! payload that is not a JSON object fails to decode.

use crate::core::error::HookError;
use serde::de::Error as _;
use serde_json::{Map, Value};

/// Tool that produced the event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolKind {
    Write,
    Edit,
    Bash,
    Read,
    Glob,
    Grep,
    Other(String),
}

impl ToolKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "Write" => ToolKind::Write,
            "Edit" => ToolKind::Edit,
            "Bash" => ToolKind::Bash,
            "Read" => ToolKind::Read,
            "Glob" => ToolKind::Glob,
            "Grep" => ToolKind::Grep,
            other => ToolKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ToolKind::Write => "Write",
            ToolKind::Edit => "Edit",
            ToolKind::Bash => "Bash",
            ToolKind::Read => "Read",
            ToolKind::Glob => "Glob",
            ToolKind::Grep => "Grep",
            ToolKind::Other(name) => name,
        }
    }

    /// `Write` or `Edit`: the tools that change a file on disk.
    pub fn is_file_mutation(&self) -> bool {
        matches!(self, ToolKind::Write | ToolKind::Edit)
    }
}

type JsonObject = Map<String, Value>;

/// String field of a JSON object. Missing, `null` and non-string values
/// all read as unset.
fn text_field(object: &JsonObject, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Read-only snapshot of one tool invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Event {
    pub tool: Option<ToolKind>,
    pub file_path: Option<String>,
    pub content: Option<String>,
    pub new_string: Option<String>,
    pub old_string: Option<String>,
    pub command: Option<String>,
    pub pattern: Option<String>,
    pub cwd: Option<String>,
    pub session_id: Option<String>,
    pub prompt: Option<String>,
    pub hook_event_name: Option<String>,
    pub stop_reason: Option<String>,
}

impl Event {
    /// Decode a raw JSON payload. Only a payload that is not a JSON object
    /// is an error; ill-typed fields are treated as absent.
    pub fn decode(raw: &str) -> Result<Self, HookError> {
        let payload: Value = serde_json::from_str(raw)?;
        let Value::Object(payload) = payload else {
            return Err(serde_json::Error::custom("event payload is not a JSON object").into());
        };
        Ok(Self::from_object(&payload))
    }

    fn from_object(payload: &JsonObject) -> Self {
        let empty = JsonObject::new();
        let input = payload
            .get("tool_input")
            .and_then(Value::as_object)
            .unwrap_or(&empty);
        Event {
            tool: payload
                .get("tool_name")
                .and_then(Value::as_str)
                .map(ToolKind::from_name),
            file_path: text_field(input, "file_path"),
            content: text_field(input, "content"),
            new_string: text_field(input, "new_string"),
            old_string: text_field(input, "old_string"),
            command: text_field(input, "command"),
            pattern: text_field(input, "pattern"),
            cwd: text_field(payload, "cwd"),
            session_id: text_field(payload, "session_id"),
            prompt: text_field(payload, "prompt").or_else(|| text_field(payload, "user_prompt")),
            hook_event_name: text_field(payload, "hook_event_name"),
            stop_reason: text_field(payload, "stop_hook_reason"),
        }
    }

    pub fn is_tool(&self, kind: &ToolKind) -> bool {
        self.tool.as_ref() == Some(kind)
    }

    pub fn is_file_mutation(&self) -> bool {
        self.tool.as_ref().is_some_and(ToolKind::is_file_mutation)
    }

    pub fn tool_name(&self) -> Option<&str> {
        self.tool.as_ref().map(ToolKind::as_str)
    }

    /// Non-empty target path.
    pub fn target_path(&self) -> Option<&str> {
        self.file_path.as_deref().filter(|p| !p.is_empty())
    }

    /// Non-empty shell command.
    pub fn shell_command(&self) -> Option<&str> {
        self.command.as_deref().filter(|c| !c.is_empty())
    }

    /// Text being introduced: full content for writes, the replacement
    /// fragment for edits.
    pub fn incoming_text(&self) -> Option<&str> {
        self.content
            .as_deref()
            .filter(|c| !c.is_empty())
            .or_else(|| self.new_string.as_deref().filter(|c| !c.is_empty()))
    }

    /// Target path ends with `.py`.
    pub fn targets_python(&self) -> bool {
        self.target_path().is_some_and(|p| p.ends_with(".py"))
    }
}
