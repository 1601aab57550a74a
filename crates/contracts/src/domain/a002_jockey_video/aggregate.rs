use crate::domain::a001_jockey_message::DisplayMessage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the stream message announcing a rendered video
pub const VIDEO_READY_MESSAGE: &str = "video-ready";
/// Tool whose output is the final rendered video
pub const COMBINE_CLIPS_TOOL: &str = "combine-clips";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoClip {
    pub index_id: String,
    pub video_id: String,
    pub start: f64,
    pub end: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CombineClipsArgs {
    #[serde(default)]
    pub clips: Vec<VideoClip>,
    #[serde(default)]
    pub output_filename: Option<String>,
    #[serde(default)]
    pub index_id: Option<String>,
}

/// One entry of the `data` list carried by a `video-ready` message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoToolOutput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub args: CombineClipsArgs,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub output: serde_json::Value,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum VideoDataError {
    #[error("Invalid video data received")]
    Malformed(String),
    #[error("Invalid video data structure")]
    MissingFilename,
}

/// Location of a rendered video on the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoReference {
    pub index_id: String,
    pub output_filename: String,
}

impl VideoReference {
    /// Same-origin playback path, e.g. `/api/jockey/video/abc/foo.mp4`
    pub fn playback_path(&self) -> String {
        format!(
            "/api/jockey/video/{}/{}",
            urlencoding::encode(&self.index_id),
            urlencoding::encode(&self.output_filename)
        )
    }
}

/// Looks for the first `video-ready` message and derives the video location.
///
/// Returns `Ok(None)` while no such message has arrived, when it has no data,
/// or when its first entry was produced by a tool other than `combine-clips`.
/// The payload's own `index_id` wins over `fallback_index_id`.
pub fn find_video_reference(
    messages: &[DisplayMessage],
    fallback_index_id: &str,
) -> Result<Option<VideoReference>, VideoDataError> {
    let Some(data) = messages
        .iter()
        .find(|m| m.has_name(VIDEO_READY_MESSAGE))
        .and_then(|m| m.data.as_deref())
    else {
        return Ok(None);
    };

    let entries: Vec<VideoToolOutput> =
        serde_json::from_str(data).map_err(|e| VideoDataError::Malformed(e.to_string()))?;

    let first = entries.first().ok_or(VideoDataError::MissingFilename)?;
    let output_filename = first
        .args
        .output_filename
        .as_deref()
        .filter(|f| !f.is_empty())
        .ok_or(VideoDataError::MissingFilename)?;

    if first.name != COMBINE_CLIPS_TOOL {
        return Ok(None);
    }

    let index_id = first
        .args
        .index_id
        .as_deref()
        .filter(|i| !i.is_empty())
        .unwrap_or(fallback_index_id);

    Ok(Some(VideoReference {
        index_id: index_id.to_string(),
        output_filename: output_filename.to_string(),
    }))
}
