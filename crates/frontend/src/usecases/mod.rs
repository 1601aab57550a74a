pub mod u001_prompt_submission;
pub mod u002_video_playback;
