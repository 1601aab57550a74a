//! Background music played while a video is being generated.

pub mod fade;
pub mod player;

pub use fade::{FadeControl, FadePhase, FadeRamp, FadeStep, FADE_TICK_MS};
pub use player::AudioPlayer;

use async_trait::async_trait;

/// Location of the looping wait tracks
pub const AUDIO_ASSETS_PATH: &str = "/assets/audio";

/// Wait tracks a submission picks from
pub fn background_tracks() -> [String; 3] {
    [1, 2, 3].map(|n| format!("{}/bg{}.mp3", AUDIO_ASSETS_PATH, n))
}

/// Control surface the submission flow needs from the audio helper
#[async_trait(?Send)]
pub trait BackgroundMusic {
    /// Starts `url` as a looping track. Failures are logged, never returned.
    async fn play(&self, url: &str);
    fn stop(&self);
    fn fade_out(&self, delay_seconds: f64, fade_seconds: f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_tracks() {
        assert_eq!(
            background_tracks(),
            [
                "/assets/audio/bg1.mp3".to_string(),
                "/assets/audio/bg2.mp3".to_string(),
                "/assets/audio/bg3.mp3".to_string(),
            ]
        );
    }
}
