use super::fade::{FadeControl, FadeRamp, FadeStep, FADE_TICK_MS};
use super::BackgroundMusic;
use crate::shared::state::AudioState;
use async_trait::async_trait;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AudioContext, AudioContextState, HtmlAudioElement};

struct PlayerInner {
    context: Option<AudioContext>,
    track: Option<HtmlAudioElement>,
    fade: FadeControl,
}

/// Single looping background track backed by an `<audio>` element.
///
/// Cheap to clone; clones share the same element.
#[derive(Clone)]
pub struct AudioPlayer {
    inner: Rc<RefCell<PlayerInner>>,
    state: RwSignal<AudioState>,
}

impl AudioPlayer {
    pub fn new(state: RwSignal<AudioState>) -> Self {
        let volume = state.get_untracked().volume;
        Self {
            inner: Rc::new(RefCell::new(PlayerInner {
                context: None,
                track: None,
                fade: FadeControl::new(volume),
            })),
            state,
        }
    }

    /// Creates the audio context on first use and wakes it if the browser
    /// suspended it before a user gesture.
    async fn ensure_context(&self) {
        let existing = self.inner.borrow().context.clone();
        let context = match existing {
            Some(context) => context,
            None => match AudioContext::new() {
                Ok(context) => {
                    self.inner.borrow_mut().context = Some(context.clone());
                    context
                }
                Err(e) => {
                    log::error!("[Audio] Failed to initialize AudioContext: {:?}", e);
                    return;
                }
            },
        };

        if context.state() == AudioContextState::Suspended {
            match context.resume() {
                Ok(promise) => {
                    if let Err(e) = JsFuture::from(promise).await {
                        log::error!("[Audio] Failed to resume AudioContext: {:?}", e);
                    }
                }
                Err(e) => log::error!("[Audio] Failed to resume AudioContext: {:?}", e),
            }
        }
    }

    pub fn volume(&self) -> f64 {
        self.inner.borrow().fade.volume()
    }

    /// Applies `volume` (clamped to 0..=1) to the current and future tracks
    pub fn set_volume(&self, volume: f64) {
        let mut inner = self.inner.borrow_mut();
        let volume = inner.fade.set_volume(volume);
        if let Some(track) = &inner.track {
            track.set_volume(volume);
        }
        drop(inner);
        let _ = self.state.try_update(|s| s.volume = volume);
    }

    fn cancel_fade(&self) {
        self.inner.borrow_mut().fade.cancel();
    }

    fn set_playing(&self, playing: bool) {
        let _ = self.state.try_update(|s| s.is_playing = playing);
    }

    /// Cancels timers, silences the track and releases the audio context
    pub fn teardown(&self) {
        self.cancel_fade();
        let mut inner = self.inner.borrow_mut();
        if let Some(track) = inner.track.take() {
            let _ = track.pause();
        }
        if let Some(context) = inner.context.take() {
            let _ = context.close();
        }
    }
}

fn rewind(track: &HtmlAudioElement) {
    let _ = track.pause();
    track.set_current_time(0.0);
}

#[async_trait(?Send)]
impl BackgroundMusic for AudioPlayer {
    async fn play(&self, url: &str) {
        self.ensure_context().await;
        self.cancel_fade();

        if let Some(previous) = self.inner.borrow_mut().track.take() {
            rewind(&previous);
        }

        let track = match HtmlAudioElement::new_with_src(url) {
            Ok(track) => track,
            Err(e) => {
                log::error!("[Music] Failed to load {}: {:?}", url, e);
                return;
            }
        };
        track.set_loop(true);
        track.set_volume(self.volume());
        self.inner.borrow_mut().track = Some(track.clone());

        let started = match track.play() {
            Ok(promise) => JsFuture::from(promise).await.map(|_| ()),
            Err(e) => Err(e),
        };
        match started {
            Ok(()) => {
                log::debug!("[Music] Playing {}", url);
                self.set_playing(true);
            }
            // Autoplay policy or a missing file; the flow carries on silently
            Err(e) => log::error!("[Music] Error during playback: {:?}", e),
        }
    }

    fn stop(&self) {
        self.cancel_fade();
        if let Some(track) = &self.inner.borrow().track {
            rewind(track);
        }
        self.set_playing(false);
    }

    fn fade_out(&self, delay_seconds: f64, fade_seconds: f64) {
        if self.inner.borrow().track.is_none() {
            return;
        }
        let generation = self.inner.borrow_mut().fade.start();
        let inner = Rc::downgrade(&self.inner);
        let state = self.state;

        spawn_local(async move {
            let mut ramp = FadeRamp::new(delay_seconds, fade_seconds);
            loop {
                TimeoutFuture::new(FADE_TICK_MS).await;

                let Some(inner) = inner.upgrade() else {
                    return;
                };
                let (step, track) = {
                    let inner = inner.borrow();
                    let step = inner
                        .fade
                        .step(generation, &mut ramp, f64::from(FADE_TICK_MS));
                    (step, inner.track.clone())
                };
                let (Some(step), Some(track)) = (step, track) else {
                    return;
                };

                match step {
                    FadeStep::Wait => {}
                    FadeStep::SetVolume(volume) => track.set_volume(volume),
                    FadeStep::Finish { restore_volume } => {
                        rewind(&track);
                        track.set_volume(restore_volume);
                        let _ = state.try_update(|s| s.is_playing = false);
                        return;
                    }
                    FadeStep::Idle => return,
                }
            }
        });
    }
}
