//! Optional realtime transport over WebSocket.

pub mod backoff;
pub mod socket;

pub use backoff::{
    CloseDecision, ConnectionState, ConnectionStatus, ReconnectPolicy, NORMAL_CLOSURE,
};
pub use socket::{decode_text, use_realtime, RealtimeConnection, RealtimeMessage};
