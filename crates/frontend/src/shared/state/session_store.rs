use leptos::prelude::*;
use serde_json::{Map, Value};

/// Lifecycle of the current Jockey thread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JockeyStatus {
    #[default]
    Idle,
    Processing,
    Error,
}

/// Thread metadata for the current session.
///
/// Metadata is merged key by key, newer values win.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JockeySession {
    pub thread_id: Option<String>,
    pub status: JockeyStatus,
    pub metadata: Map<String, Value>,
}

impl JockeySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// A submission started; the previous thread is forgotten
    pub fn start(&mut self) {
        self.thread_id = None;
        self.status = JockeyStatus::Processing;
    }

    pub fn set_thread(&mut self, thread_id: &str) {
        self.thread_id = Some(thread_id.to_string());
    }

    pub fn update_metadata(&mut self, patch: Map<String, Value>) {
        for (key, value) in patch {
            self.metadata.insert(key, value);
        }
    }

    pub fn get_metadata(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    pub fn fail(&mut self) {
        self.status = JockeyStatus::Error;
    }

    /// Processing ended; an error status is kept until the next start
    pub fn finish(&mut self) {
        if self.status == JockeyStatus::Processing {
            self.status = JockeyStatus::Idle;
        }
    }
}

/// Background music state mirrored for the UI
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioState {
    pub is_playing: bool,
    pub volume: f64,
}

impl Default for AudioState {
    fn default() -> Self {
        Self {
            is_playing: false,
            volume: 0.03,
        }
    }
}

/// Client state shared across the page.
///
/// Created in the app root and handed out with `provide_context`, so every
/// mounted tree (and every test) owns its own instance.
#[derive(Clone, Copy)]
pub struct SessionStore {
    pub jockey: RwSignal<JockeySession>,
    pub audio: RwSignal<AudioState>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            jockey: RwSignal::new(JockeySession::new()),
            audio: RwSignal::new(AudioState::default()),
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
