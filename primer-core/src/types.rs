use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Width of the `=`-padded title line produced by [`Message::pretty`].
const TITLE_WIDTH: usize = 80;

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub args: Value,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, args: Value) -> Self {
        Self { id: id.into(), name: name.into(), args }
    }

    /// Returns a string argument, if present.
    pub fn arg_str(&self, key: &str) -> Option<&str> {
        self.args.get(key).and_then(|v| v.as_str())
    }
}

/// A single chat message exchanged between the user, the model and tools.
///
/// Messages are stored in graph state as JSON, tagged by `role`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Message {
    Human {
        content: String,
    },
    Ai {
        #[serde(default)]
        content: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCall>,
    },
    System {
        content: String,
    },
    Tool {
        tool_call_id: String,
        name: String,
        content: String,
    },
}

impl Message {
    pub fn human(content: impl Into<String>) -> Self {
        Message::Human { content: content.into() }
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Message::Ai { content: content.into(), tool_calls: Vec::new() }
    }

    pub fn ai_with_tool_calls(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Message::Ai { content: content.into(), tool_calls }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Message::System { content: content.into() }
    }

    pub fn tool(
        tool_call_id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Message::Tool {
            tool_call_id: tool_call_id.into(),
            name: name.into(),
            content: content.into(),
        }
    }

    /// Builds a message from a role shorthand such as `("user", "Hello")`.
    ///
    /// Accepts `user`/`human`, `assistant`/`ai` and `system`.
    pub fn from_role(role: &str, content: impl Into<String>) -> Option<Self> {
        match role.to_ascii_lowercase().as_str() {
            "user" | "human" => Some(Self::human(content)),
            "assistant" | "ai" => Some(Self::ai(content)),
            "system" => Some(Self::system(content)),
            _ => None,
        }
    }

    pub fn role(&self) -> &'static str {
        match self {
            Message::Human { .. } => "human",
            Message::Ai { .. } => "ai",
            Message::System { .. } => "system",
            Message::Tool { .. } => "tool",
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Message::Human { content }
            | Message::Ai { content, .. }
            | Message::System { content }
            | Message::Tool { content, .. } => content,
        }
    }

    pub fn tool_calls(&self) -> &[ToolCall] {
        match self {
            Message::Ai { tool_calls, .. } => tool_calls,
            _ => &[],
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls().is_empty()
    }

    pub fn is_ai(&self) -> bool {
        matches!(self, Message::Ai { .. })
    }

    /// Renders the message under a centered `=== Title ===` banner.
    pub fn pretty(&self) -> String {
        let title = match self {
            Message::Human { .. } => "Human Message",
            Message::Ai { .. } => "Ai Message",
            Message::System { .. } => "System Message",
            Message::Tool { .. } => "Tool Message",
        };
        let mut out = title_banner(title);
        if let Message::Tool { name, .. } = self {
            out.push_str(&format!("\nName: {name}"));
        }
        out.push_str("\n\n");
        out.push_str(self.content());

        let tool_calls = self.tool_calls();
        if !tool_calls.is_empty() {
            let mut out_trimmed = out.trim_end().to_string();
            out_trimmed.push_str("\nTool Calls:");
            for call in tool_calls {
                out_trimmed.push_str(&format!("\n  {} ({})", call.name, call.id));
                out_trimmed.push_str(&format!("\n Call ID: {}", call.id));
                out_trimmed.push_str("\n  Args:");
                if let Some(args) = call.args.as_object() {
                    for (key, value) in args {
                        out_trimmed.push_str(&format!("\n    {key}: {}", display_value(value)));
                    }
                }
            }
            out = out_trimmed;
        }
        out
    }
}

fn title_banner(title: &str) -> String {
    let padded = format!(" {title} ");
    let sep_len = TITLE_WIDTH.saturating_sub(padded.len()) / 2;
    let sep = "=".repeat(sep_len);
    let second = if padded.len() % 2 == 1 { format!("{sep}=") } else { sep.clone() };
    format!("{sep}{padded}{second}")
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Serializes a message list into the JSON array stored in graph state.
pub fn messages_to_value(messages: &[Message]) -> crate::Result<Value> {
    Ok(serde_json::to_value(messages)?)
}

/// Parses the JSON array stored in graph state back into messages.
///
/// `Null` is treated as an empty history.
pub fn messages_from_value(value: &Value) -> crate::Result<Vec<Message>> {
    if value.is_null() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_value(value.clone())?)
}
