use super::backoff::{
    CloseDecision, ConnectionState, ConnectionStatus, ReconnectPolicy, NORMAL_CLOSURE,
};
use crate::shared::api_utils::page_websocket_url;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use serde_json::Value;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{BinaryType, CloseEvent, Event, MessageEvent, WebSocket};

/// Payload received over the socket
#[derive(Debug, Clone, PartialEq)]
pub enum RealtimeMessage {
    Json(Value),
    Binary(Vec<u8>),
}

/// Parses a text frame; malformed JSON is logged and dropped
pub fn decode_text(text: &str) -> Option<RealtimeMessage> {
    match serde_json::from_str(text) {
        Ok(value) => Some(RealtimeMessage::Json(value)),
        Err(e) => {
            log::error!("[WebSocket] Failed to parse message: {}", e);
            None
        }
    }
}

type MessageHandler = Rc<dyn Fn(RealtimeMessage)>;
type ErrorHandler = Rc<dyn Fn(String)>;

/// Keeps the JS callbacks alive for as long as the socket may call them
struct SocketHandlers {
    _on_open: Closure<dyn FnMut(Event)>,
    _on_message: Closure<dyn FnMut(MessageEvent)>,
    _on_error: Closure<dyn FnMut(Event)>,
    _on_close: Closure<dyn FnMut(CloseEvent)>,
}

struct Inner {
    url: String,
    socket: Option<WebSocket>,
    // Replaced on the next connect, never dropped from inside a callback
    handlers: Option<SocketHandlers>,
    state: ConnectionState,
    on_message: MessageHandler,
    on_error: ErrorHandler,
}

/// Auto-reconnecting WebSocket with at most one open socket.
#[derive(Clone)]
pub struct RealtimeConnection {
    inner: Rc<RefCell<Inner>>,
    status: RwSignal<ConnectionStatus>,
}

impl RealtimeConnection {
    pub fn new(
        url: String,
        policy: ReconnectPolicy,
        on_message: impl Fn(RealtimeMessage) + 'static,
        on_error: impl Fn(String) + 'static,
    ) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                url,
                socket: None,
                handlers: None,
                state: ConnectionState::new(policy),
                on_message: Rc::new(on_message),
                on_error: Rc::new(on_error),
            })),
            status: RwSignal::new(ConnectionStatus::Disconnected),
        }
    }

    pub fn status(&self) -> RwSignal<ConnectionStatus> {
        self.status
    }

    fn from_weak(
        inner: &Weak<RefCell<Inner>>,
        status: RwSignal<ConnectionStatus>,
    ) -> Option<Self> {
        inner.upgrade().map(|inner| Self { inner, status })
    }

    fn sync_status(&self) {
        let status = self.inner.borrow().state.status;
        let _ = self.status.try_set(status);
    }

    fn report_error(&self, message: &str) {
        let handler = self.inner.borrow().on_error.clone();
        handler(message.to_string());
    }

    pub fn connect(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.state.begin_connect();

        if let Some(socket) = &inner.socket {
            if socket.ready_state() == WebSocket::OPEN {
                log::debug!("[WebSocket] Already connected");
                return;
            }
        }
        // A socket still connecting or closing is replaced, not duplicated
        if let Some(stale) = inner.socket.take() {
            detach(&stale);
            let _ = stale.close();
        }

        let url = inner.url.clone();
        let socket = match WebSocket::new(&url) {
            Ok(socket) => socket,
            Err(e) => {
                drop(inner);
                log::error!("[WebSocket] Creation error: {:?}", e);
                self.report_error("Failed to create connection");
                return;
            }
        };
        socket.set_binary_type(BinaryType::Arraybuffer);

        let handlers = self.make_handlers();
        socket.set_onopen(Some(handlers._on_open.as_ref().unchecked_ref()));
        socket.set_onmessage(Some(handlers._on_message.as_ref().unchecked_ref()));
        socket.set_onerror(Some(handlers._on_error.as_ref().unchecked_ref()));
        socket.set_onclose(Some(handlers._on_close.as_ref().unchecked_ref()));

        inner.socket = Some(socket);
        inner.handlers = Some(handlers);
    }

    fn make_handlers(&self) -> SocketHandlers {
        let weak = Rc::downgrade(&self.inner);
        let status = self.status;

        let on_open = {
            let weak = weak.clone();
            Closure::wrap(Box::new(move |_: Event| {
                let Some(conn) = Self::from_weak(&weak, status) else {
                    return;
                };
                log::info!("[WebSocket] Connected to: {}", conn.inner.borrow().url);
                conn.inner.borrow_mut().state.on_open();
                conn.sync_status();
            }) as Box<dyn FnMut(Event)>)
        };

        let on_message = {
            let weak = weak.clone();
            Closure::wrap(Box::new(move |event: MessageEvent| {
                let Some(conn) = Self::from_weak(&weak, status) else {
                    return;
                };
                let data = event.data();
                let message = if let Some(text) = data.as_string() {
                    decode_text(&text)
                } else if data.is_instance_of::<js_sys::ArrayBuffer>() {
                    let bytes = js_sys::Uint8Array::new(&data).to_vec();
                    log::debug!("[WebSocket] Received binary chunk: {} bytes", bytes.len());
                    Some(RealtimeMessage::Binary(bytes))
                } else {
                    log::warn!("[WebSocket] Received unknown data type");
                    None
                };
                if let Some(message) = message {
                    let handler = conn.inner.borrow().on_message.clone();
                    handler(message);
                }
            }) as Box<dyn FnMut(MessageEvent)>)
        };

        let on_error = {
            let weak = weak.clone();
            Closure::wrap(Box::new(move |_: Event| {
                let Some(conn) = Self::from_weak(&weak, status) else {
                    return;
                };
                log::error!("[WebSocket] Connection error");
                conn.inner.borrow_mut().state.on_error();
                conn.sync_status();
                conn.report_error("WebSocket connection error");
            }) as Box<dyn FnMut(Event)>)
        };

        let on_close = Closure::wrap(Box::new(move |event: CloseEvent| {
            let Some(conn) = Self::from_weak(&weak, status) else {
                return;
            };
            let code = event.code();
            log::info!("[WebSocket] Closed with code: {}", code);

            let (decision, generation) = {
                let mut inner = conn.inner.borrow_mut();
                inner.socket = None;
                let decision = inner.state.on_close(code);
                (decision, inner.state.reconnect_generation)
            };
            conn.sync_status();

            match decision {
                CloseDecision::Stop => {}
                CloseDecision::GiveUp { attempts } => {
                    log::warn!("[WebSocket] Giving up after {} attempts", attempts);
                }
                CloseDecision::Reconnect { attempts, delay_ms } => {
                    log::info!(
                        "[WebSocket] Reconnecting in {}ms (attempt {})",
                        delay_ms,
                        attempts
                    );
                    let weak = Rc::downgrade(&conn.inner);
                    spawn_local(async move {
                        TimeoutFuture::new(delay_ms).await;
                        let Some(conn) = Self::from_weak(&weak, status) else {
                            return;
                        };
                        let due = conn.inner.borrow().state.reconnect_due(generation);
                        if due {
                            conn.connect();
                        }
                    });
                }
            }
        }) as Box<dyn FnMut(CloseEvent)>);

        SocketHandlers {
            _on_open: on_open,
            _on_message: on_message,
            _on_error: on_error,
            _on_close: on_close,
        }
    }

    /// Closes the socket on purpose; no reconnect follows
    pub fn close(&self, code: u16, reason: &str) {
        let socket = {
            let mut inner = self.inner.borrow_mut();
            inner.state.on_shutdown();
            inner.socket.take()
        };
        if let Some(socket) = socket {
            detach(&socket);
            if let Err(e) = socket.close_with_code_and_reason(code, reason) {
                log::error!("[WebSocket] Close failed: {:?}", e);
            }
        }
        self.sync_status();
    }
}

fn detach(socket: &WebSocket) {
    socket.set_onopen(None);
    socket.set_onmessage(None);
    socket.set_onerror(None);
    socket.set_onclose(None);
}

/// Opens a realtime connection to `endpoint` on the page host for the
/// lifetime of the calling component.
pub fn use_realtime(
    endpoint: &str,
    policy: ReconnectPolicy,
    on_message: impl Fn(RealtimeMessage) + 'static,
    on_error: impl Fn(String) + 'static,
) -> Option<RealtimeConnection> {
    let url = page_websocket_url(endpoint)?;
    let connection = RealtimeConnection::new(url, policy, on_message, on_error);
    connection.connect();

    let stored = StoredValue::new_local(connection.clone());
    on_cleanup(move || {
        let _ = stored.try_with_value(|c| c.close(NORMAL_CLOSURE, "Component unmounted"));
    });

    Some(connection)
}
