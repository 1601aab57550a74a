use super::poller::{
    wait_until_ready, HttpRangeCheck, PollGeneration, Readiness, PLAYBACK_ERROR_MESSAGE,
    TIMEOUT_MESSAGE,
};
use crate::shared::api_utils::api_url;
use crate::shared::config::AppConfig;
use contracts::domain::a002_jockey_video::VideoReference;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

/// Polls the rendered video and plays it once the backend serves it.
///
/// Renders nothing until `video` carries a reference.
#[component]
pub fn VideoPlayer(
    #[prop(into)] video: Signal<Option<VideoReference>>,
    on_loaded: Callback<()>,
) -> impl IntoView {
    let config = use_context::<AppConfig>()
        .expect("AppConfig not provided in context (provide it in app root)");

    let is_ready = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);
    let polls = StoredValue::new(PollGeneration::default());

    let src = Memo::new(move |_| video.get().map(|v| api_url(&config, &v.playback_path())));

    Effect::new(move |_| {
        let url = src.get();
        let mut generation = None;
        polls.update_value(|p| generation = p.on_url_change(url.as_deref()));
        is_ready.set(false);
        error.set(None);
        let (Some(url), Some(generation)) = (url, generation) else {
            return;
        };
        log::info!("[VideoPlayer] Setting video URL: {}", url);

        spawn_local(async move {
            let is_current =
                move || polls.try_with_value(|p| p.is_current(generation)) == Some(true);
            let outcome =
                wait_until_ready(&HttpRangeCheck, &url, TimeoutFuture::new, is_current).await;
            match outcome {
                Some(Readiness::Ready) => {
                    log::info!("[VideoPlayer] Video is ready to play");
                    let _ = is_ready.try_set(true);
                }
                Some(Readiness::TimedOut) => {
                    log::warn!("[VideoPlayer] Gave up waiting for {}", url);
                    let _ = error.try_set(Some(TIMEOUT_MESSAGE.to_string()));
                }
                _ => {}
            }
        });
    });

    on_cleanup(move || {
        let _ = polls.try_update_value(|p| p.invalidate());
    });

    move || {
        src.get().map(|url| {
            view! {
                <div class="video-panel" style="margin-top: 16px; padding: 16px; background: var(--colorNeutralBackground1); border-radius: 8px; box-shadow: var(--shadow16);">
                    <h2 style="font-size: 18px; font-weight: 600; margin-bottom: 12px;">
                        {move || if is_ready.get() { "Your Video" } else { "Your Video is Loading..." }}
                    </h2>
                    <div style="position: relative; aspect-ratio: 16 / 9; border-radius: 8px; overflow: hidden; background: var(--colorNeutralBackground3);">
                        {move || {
                            if let Some(message) = error.get() {
                                view! {
                                    <div style="position: absolute; inset: 0; display: flex; align-items: center; justify-content: center; color: var(--colorPaletteRedForeground1);">
                                        {message}
                                    </div>
                                }
                                    .into_any()
                            } else if is_ready.get() {
                                view! {
                                    <video
                                        controls=true
                                        autoplay=true
                                        style="width: 100%; height: 100%;"
                                        on:loadeddata=move |_| {
                                            log::info!("[VideoPlayer] Video loaded and ready to play");
                                            on_loaded.run(());
                                        }
                                        on:error=move |_| {
                                            log::error!("[VideoPlayer] Video playback error");
                                            error.set(Some(PLAYBACK_ERROR_MESSAGE.to_string()));
                                        }
                                    >
                                        <source src=url.clone() type="video/mp4" />
                                        "Your browser does not support the video tag."
                                    </video>
                                }
                                    .into_any()
                            } else {
                                view! {
                                    <div style="position: absolute; inset: 0; display: flex; flex-direction: column; align-items: center; justify-content: center; gap: 8px; background: rgba(0, 0, 0, 0.5); color: white;">
                                        <Spinner />
                                        <p>"Loading video..."</p>
                                    </div>
                                }
                                    .into_any()
                            }
                        }}
                    </div>
                </div>
            }
        })
    }
}
