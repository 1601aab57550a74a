pub mod aggregate;

pub use aggregate::{
    find_video_reference, CombineClipsArgs, VideoClip, VideoDataError, VideoReference,
    VideoToolOutput, COMBINE_CLIPS_TOOL, VIDEO_READY_MESSAGE,
};
