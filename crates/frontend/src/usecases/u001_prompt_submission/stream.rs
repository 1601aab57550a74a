//! Server-sent event stream of one Jockey thread.

use super::api::ApiError;
use crate::shared::api_utils::{api_url, stream_path};
use crate::shared::config::AppConfig;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventSource, MessageEvent};

/// What the stream delivers to the flow
#[derive(Debug, Clone, PartialEq)]
pub enum StreamSignal {
    /// Raw `data` field of one event
    Message(String),
    Error,
}

pub type SignalHandler = Rc<dyn Fn(StreamSignal)>;

/// An open stream; closing is idempotent
pub trait StreamHandle {
    fn close(&self);
}

pub trait EventStreamFactory {
    fn open(&self, thread_id: &str, on_signal: SignalHandler)
        -> Result<Box<dyn StreamHandle>, ApiError>;
}

pub struct BrowserEventStreams {
    config: AppConfig,
}

impl BrowserEventStreams {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }
}

struct BrowserEventStream {
    source: EventSource,
    _on_message: Closure<dyn FnMut(MessageEvent)>,
    _on_error: Closure<dyn FnMut(Event)>,
}

impl StreamHandle for BrowserEventStream {
    fn close(&self) {
        self.source.set_onmessage(None);
        self.source.set_onerror(None);
        self.source.close();
    }
}

impl EventStreamFactory for BrowserEventStreams {
    fn open(
        &self,
        thread_id: &str,
        on_signal: SignalHandler,
    ) -> Result<Box<dyn StreamHandle>, ApiError> {
        let url = api_url(&self.config, &stream_path(thread_id));
        let source = EventSource::new(&url).map_err(|e| ApiError::Network(format!("{e:?}")))?;

        let on_message = {
            let on_signal = on_signal.clone();
            Closure::wrap(Box::new(move |event: MessageEvent| {
                match event.data().as_string() {
                    Some(raw) => {
                        log::debug!("[SSE] Raw event data received: {}", raw);
                        on_signal(StreamSignal::Message(raw));
                    }
                    None => log::warn!("[SSE] Ignoring non-text event"),
                }
            }) as Box<dyn FnMut(MessageEvent)>)
        };
        let on_error = Closure::wrap(Box::new(move |_: Event| {
            log::error!("[SSE] EventSource error");
            on_signal(StreamSignal::Error);
        }) as Box<dyn FnMut(Event)>);

        source.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
        source.set_onerror(Some(on_error.as_ref().unchecked_ref()));

        Ok(Box::new(BrowserEventStream {
            source,
            _on_message: on_message,
            _on_error: on_error,
        }))
    }
}
