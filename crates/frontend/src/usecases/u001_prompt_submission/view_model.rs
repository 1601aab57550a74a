//! Prompt form - View Model

use super::flow::SubmissionState;
use crate::shared::realtime::ConnectionStatus;
use crate::shared::state::AudioState;
use contracts::domain::a001_jockey_message::MessageType;
use contracts::domain::a002_jockey_video::{find_video_reference, VideoDataError, VideoReference};
use leptos::prelude::*;

#[derive(Clone, Copy)]
pub struct PromptFormVm {
    pub prompt: RwSignal<String>,
    pub index_id: RwSignal<String>,
    pub submission: RwSignal<SubmissionState>,
}

impl PromptFormVm {
    pub fn new(default_index_id: Option<String>) -> Self {
        Self {
            prompt: RwSignal::new(String::new()),
            index_id: RwSignal::new(default_index_id.unwrap_or_default()),
            submission: RwSignal::new(SubmissionState::default()),
        }
    }

    pub fn is_processing(&self) -> bool {
        self.submission.with(|s| s.processing)
    }

    pub fn can_submit(&self) -> bool {
        !self.is_processing() && !self.prompt.with(|p| p.trim().is_empty())
    }

    /// Video announced by the current submission's messages
    pub fn video(&self) -> Result<Option<VideoReference>, VideoDataError> {
        self.submission
            .with(|s| find_video_reference(&s.messages, &s.index_id))
    }

    /// Submission error first, then a broken video payload
    pub fn error_text(&self) -> Option<String> {
        self.submission
            .with(|s| s.error.clone())
            .or_else(|| self.video().err().map(|e| e.to_string()))
    }

    pub fn has_output(&self) -> bool {
        self.submission
            .with(|s| !s.messages.is_empty() || !s.tool_calls.is_empty())
    }
}

/// Background of a message bubble
pub fn message_background(kind: MessageType) -> &'static str {
    match kind {
        MessageType::Human => "#eff6ff",
        MessageType::Ai => "#f0fdf4",
        MessageType::Error => "#fef2f2",
        MessageType::System => "#f9fafb",
    }
}

pub fn realtime_label(status: ConnectionStatus) -> String {
    format!("Realtime: {}", status.as_str())
}

/// Shown next to the volume slider while a wait track plays
pub fn music_indicator(audio: &AudioState) -> Option<&'static str> {
    audio.is_playing.then_some("♪ Playing")
}
