use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Kind of a message shown in the progress list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Human,
    Ai,
    Error,
    /// Also used for any type the backend adds later
    #[default]
    #[serde(other)]
    System,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Human => "human",
            MessageType::Ai => "ai",
            MessageType::Error => "error",
            MessageType::System => "system",
        }
    }
}

/// One event as delivered in the `data` field of the SSE stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamEvent {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient_kind")]
    pub kind: MessageType,
    #[serde(default)]
    pub name: Option<String>,
    /// Usually a JSON document encoded as a string
    #[serde(default)]
    pub data: Option<Value>,
}

impl StreamEvent {
    /// Converts the event into a displayable message.
    ///
    /// Events without text (keep-alives, metadata frames) yield `None`.
    pub fn into_display_message(self) -> Option<DisplayMessage> {
        let text = self.text.filter(|t| !t.is_empty())?;
        let data = self.data.and_then(|d| match d {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        });
        Some(DisplayMessage::new(text, self.kind, self.name, data))
    }
}

/// Parse the raw `data` payload of one SSE event
/// `null` or non-string types count as system messages
fn lenient_kind<'de, D: Deserializer<'de>>(deserializer: D) -> Result<MessageType, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default())
}

pub fn parse_stream_event(raw: &str) -> Result<StreamEvent, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Message rendered in the progress list.
///
/// Created once per stream event and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayMessage {
    #[serde(default = "Uuid::new_v4", skip_serializing)]
    pub id: Uuid,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: MessageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default = "Utc::now", skip_serializing)]
    pub received_at: DateTime<Utc>,
}

impl DisplayMessage {
    pub fn new(
        text: String,
        kind: MessageType,
        name: Option<String>,
        data: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            kind,
            name,
            data,
            received_at: Utc::now(),
        }
    }

    pub fn has_name(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }
}

/// One agent tool invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub args: serde_json::Map<String, Value>,
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub output: Vec<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_with_text_becomes_message() {
        let event = parse_stream_event(
            r#"{"text":"🎬\n\nplanning","type":"human","name":"planner"}"#,
        )
        .unwrap();
        let msg = event.into_display_message().unwrap();
        assert_eq!(msg.text, "🎬\n\nplanning");
        assert_eq!(msg.kind, MessageType::Human);
        assert!(msg.has_name("planner"));
        assert_eq!(msg.data, None);
    }

    #[test]
    fn test_event_without_text_is_skipped() {
        let empty = parse_stream_event(r#"{"text":"","type":"system"}"#).unwrap();
        assert!(empty.into_display_message().is_none());

        let missing = parse_stream_event(r#"{"type":"ai"}"#).unwrap();
        assert!(missing.into_display_message().is_none());
    }

    #[test]
    fn test_unknown_type_falls_back_to_system() {
        let event = parse_stream_event(r#"{"text":"x","type":"tool"}"#).unwrap();
        assert_eq!(event.kind, MessageType::System);

        let untyped = parse_stream_event(r#"{"text":"x"}"#).unwrap();
        assert_eq!(untyped.kind, MessageType::System);
    }

    #[test]
    fn test_null_or_odd_type_keeps_the_text() {
        let event = parse_stream_event(r#"{"text":"hi","type":null,"name":null}"#).unwrap();
        assert_eq!(event.kind, MessageType::System);
        let msg = event.into_display_message().unwrap();
        assert_eq!(msg.text, "hi");
        assert_eq!(msg.name, None);

        let numeric = parse_stream_event(r#"{"text":"hi","type":3}"#).unwrap();
        assert_eq!(numeric.kind, MessageType::System);
    }

    #[test]
    fn test_message_type_wire_names() {
        for kind in [
            MessageType::Human,
            MessageType::Ai,
            MessageType::Error,
            MessageType::System,
        ] {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, Value::from(kind.as_str()));
            assert_eq!(serde_json::from_value::<MessageType>(json).unwrap(), kind);
        }
    }

    #[test]
    fn test_structured_data_is_kept_as_json_text() {
        let event = parse_stream_event(
            r#"{"text":"done","type":"system","name":"video-ready","data":[{"name":"combine-clips"}]}"#,
        )
        .unwrap();
        let msg = event.into_display_message().unwrap();
        assert_eq!(msg.data.as_deref(), Some(r#"[{"name":"combine-clips"}]"#));

        let as_string = parse_stream_event(
            r#"{"text":"done","name":"video-ready","data":"[{\"name\":\"combine-clips\"}]"}"#,
        )
        .unwrap();
        let msg = as_string.into_display_message().unwrap();
        assert_eq!(msg.data.as_deref(), Some(r#"[{"name":"combine-clips"}]"#));
    }

    #[test]
    fn test_malformed_payload_is_an_error() {
        assert!(parse_stream_event("not json").is_err());
        assert!(parse_stream_event("{\"text\": ").is_err());
    }

    #[test]
    fn test_each_message_gets_its_own_id() {
        let a = DisplayMessage::new("a".into(), MessageType::Ai, None, None);
        let b = DisplayMessage::new("a".into(), MessageType::Ai, None, None);
        assert_ne!(a.id, b.id);
        assert_eq!(MessageType::Ai.as_str(), "ai");
    }

    #[test]
    fn test_tool_call_defaults() {
        let call: ToolCall =
            serde_json::from_str(r#"{"name":"search","id":"c1","type":"tool_call"}"#).unwrap();
        assert!(call.args.is_empty());
        assert!(call.output.is_empty());
        assert_eq!(call.kind, "tool_call");
    }
}
