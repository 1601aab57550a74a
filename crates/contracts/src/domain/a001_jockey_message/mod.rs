pub mod aggregate;

pub use aggregate::{parse_stream_event, DisplayMessage, MessageType, StreamEvent, ToolCall};
