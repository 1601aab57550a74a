//! Prompt form, progress list and video panel.

use super::api::{fetch_default_index_id, HttpJockeyApi};
use super::flow::{FlowDeps, SubmissionFlow};
use super::stream::BrowserEventStreams;
use super::view_model::{message_background, music_indicator, realtime_label, PromptFormVm};
use crate::shared::audio::{AudioPlayer, BackgroundMusic};
use crate::shared::config::AppConfig;
use crate::shared::realtime::{
    use_realtime, RealtimeConnection, RealtimeMessage, ReconnectPolicy, NORMAL_CLOSURE,
};
use crate::shared::state::SessionStore;
use crate::usecases::u002_video_playback::VideoPlayer;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::rc::Rc;
use thaw::*;
use wasm_bindgen::JsCast;

#[component]
#[allow(non_snake_case)]
pub fn TextProcessorPage() -> impl IntoView {
    let store = use_context::<SessionStore>()
        .expect("SessionStore not provided in context (provide it in app root)");
    let config = use_context::<AppConfig>()
        .expect("AppConfig not provided in context (provide it in app root)");

    let vm = PromptFormVm::new(config.default_index_id.clone());

    // Fall back to the server-side default when the bundle has none
    if config.default_index_id.is_none() {
        let config = config.clone();
        spawn_local(async move {
            match fetch_default_index_id(&config).await {
                Ok(Some(index_id)) => {
                    let _ = vm.index_id.try_update(|current| {
                        if current.trim().is_empty() {
                            *current = index_id;
                        }
                    });
                }
                Ok(None) => log::debug!("[App] Server has no default index id"),
                Err(e) => log::warn!("[App] Could not load default index id: {}", e),
            }
        });
    }

    let player = AudioPlayer::new(store.audio);
    let flow = SubmissionFlow::new(FlowDeps {
        api: Rc::new(HttpJockeyApi::new(config.clone())),
        streams: Rc::new(BrowserEventStreams::new(config.clone())),
        music: Rc::new(player.clone()),
        state: Rc::new(vm.submission),
        session: Rc::new(store.jockey),
        pick_track: Box::new(|count| (js_sys::Math::random() * count as f64) as usize),
    });

    let realtime: Option<RealtimeConnection> =
        config.realtime_endpoint.as_deref().and_then(|endpoint| {
            use_realtime(
                endpoint,
                ReconnectPolicy::default(),
                |message| match message {
                    RealtimeMessage::Json(value) => {
                        log::debug!("[WebSocket] Received message: {}", value)
                    }
                    RealtimeMessage::Binary(bytes) => {
                        log::debug!("[WebSocket] Received {} bytes", bytes.len())
                    }
                },
                |error| log::error!("[WebSocket] {}", error),
            )
        });

    let realtime_status = realtime.as_ref().map(|r| r.status());

    let player = StoredValue::new_local(player);
    let flow = StoredValue::new_local(flow);
    let realtime = StoredValue::new_local(realtime);

    on_cleanup(move || {
        let _ = flow.try_with_value(|f| f.shutdown());
        let _ = player.try_with_value(|p| p.teardown());
    });

    let handle_submit = Callback::new(move |_: ()| {
        let prompt = vm.prompt.get_untracked();
        let index_id = vm.index_id.get_untracked();
        let Some(flow) = flow.try_get_value() else {
            return;
        };
        spawn_local(async move {
            flow.submit(&prompt, &index_id).await;
        });
    });

    let handle_video_loaded = Callback::new(move |_: ()| {
        log::info!("[App] Video loaded, starting music fade out");
        let _ = player.try_with_value(|p| p.fade_out(1.0, 3.0));
        let _ = realtime.try_with_value(|r| {
            if let Some(connection) = r {
                connection.close(NORMAL_CLOSURE, "Video loaded");
            }
        });
    });

    let video = Signal::derive(move || vm.video().ok().flatten());

    view! {
        <div style="min-height: 100vh; background: #f3f4f6; padding: 48px 16px;">
            <div style="max-width: 672px; margin: 0 auto;">
                <div style="text-align: center; margin-bottom: 32px;">
                    <h1 style="font-size: 30px; font-weight: bold; color: #111827;">
                        "Lights... Camera... JOCKEY!"
                    </h1>
                    <p style="margin-top: 8px; font-size: 14px; color: #4b5563;">
                        "Enter your request below to generate a new video from your existing video library."
                    </p>
                </div>

                <div style="background: white; border-radius: 8px; box-shadow: var(--shadow16); padding: 24px;">
                    {move || {
                        vm.error_text()
                            .map(|e| {
                                view! {
                                    <div style="margin-bottom: 16px; padding: 16px; background: #fef2f2; color: #b91c1c; border-radius: 6px;">
                                        {e}
                                    </div>
                                }
                            })
                    }}

                    <Flex vertical=true style="gap: 16px;">
                        <textarea
                            rows=3
                            placeholder="e.g. 'create a video of puppies and a beach...'"
                            style="width: 100%; padding: 8px 16px; border: 1px solid #d1d5db; border-radius: 8px; resize: none;"
                            prop:value=move || vm.prompt.get()
                            disabled=move || vm.is_processing()
                            on:input=move |ev| vm.prompt.set(event_target_value(&ev))
                            on:keydown=move |ev: web_sys::KeyboardEvent| {
                                if ev.key() == "Enter" && !ev.shift_key() {
                                    ev.prevent_default();
                                    handle_submit.run(());
                                }
                            }
                        />

                        <Input value=vm.index_id placeholder="Enter Index ID" />

                        <Flex align=FlexAlign::Center style="gap: 16px;">
                            <label for="volumeSlider" style="font-size: 14px; color: #374151; white-space: nowrap;">
                                "Wait Music Volume"
                            </label>
                            <input
                                id="volumeSlider"
                                type="range"
                                min="0"
                                max="1"
                                step="0.01"
                                style="width: 100%;"
                                prop:value=move || store.audio.with(|a| a.volume).to_string()
                                on:input=move |ev| {
                                    let Some(input) = ev
                                        .target()
                                        .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
                                    else {
                                        return;
                                    };
                                    let volume = input.value_as_number();
                                    if volume.is_finite() {
                                        let _ = player.try_with_value(|p| p.set_volume(volume));
                                    }
                                }
                            />
                            <span style="font-size: 14px; color: #6b7280; white-space: nowrap;">
                                {move || store.audio.with(music_indicator)}
                            </span>
                        </Flex>

                        {realtime_status
                            .map(|status| {
                                view! {
                                    <div style="font-size: 12px; color: #6b7280;">
                                        {move || realtime_label(status.get())}
                                    </div>
                                }
                            })}

                        <Button
                            appearance=ButtonAppearance::Primary
                            disabled=Signal::derive(move || !vm.can_submit())
                            on_click=move |_| handle_submit.run(())
                            attr:style="width: 100%;"
                        >
                            {move || if vm.is_processing() { "Processing..." } else { "Create" }}
                        </Button>
                    </Flex>
                </div>

                <VideoPlayer video=video on_loaded=handle_video_loaded />

                <Show when=move || vm.has_output()>
                    <div style="margin-top: 16px; background: white; border-radius: 8px; box-shadow: var(--shadow16); padding: 24px;">
                        <div style="display: flex; flex-direction: column; gap: 16px; max-height: 384px; overflow-y: auto;">
                            <For
                                each=move || vm.submission.with(|s| s.messages.clone())
                                key=|msg| msg.id
                                let:msg
                            >
                                <div
                                    data-kind=msg.kind.as_str()
                                    style=format!(
                                        "padding: 16px; border-radius: 8px; background: {};",
                                        message_background(msg.kind),
                                    )
                                >
                                    {msg
                                        .name
                                        .clone()
                                        .map(|name| {
                                            view! {
                                                <div style="font-size: 12px; color: #6b7280; margin-bottom: 4px;">
                                                    {name}
                                                </div>
                                            }
                                        })}
                                    <div style="font-size: 14px; color: #374151; white-space: pre-wrap;">
                                        {msg.text.clone()}
                                    </div>
                                </div>
                            </For>
                            <For
                                each=move || {
                                    vm.submission
                                        .with(|s| s.tool_calls.clone().into_iter().enumerate().collect::<Vec<_>>())
                                }
                                key=|(index, tool)| format!("{}-{}", index, tool.id)
                                let:entry
                            >
                                {
                                    let (_, tool) = entry;
                                    let args = serde_json::to_string_pretty(&tool.args).unwrap_or_default();
                                    let output = (!tool.output.is_empty())
                                        .then(|| serde_json::to_string_pretty(&tool.output).unwrap_or_default());
                                    view! {
                                        <div style="padding: 16px; border-radius: 8px; background: #fefce8;">
                                            <div style="font-size: 12px; color: #6b7280; margin-bottom: 4px;">
                                                {format!("Tool Call: {}", tool.name)}
                                            </div>
                                            <pre style="font-size: 14px; color: #374151; white-space: pre-wrap;">{args}</pre>
                                            {output
                                                .map(|output| {
                                                    view! {
                                                        <div style="margin-top: 8px;">
                                                            <div style="font-size: 12px; color: #6b7280;">"Output:"</div>
                                                            <pre style="font-size: 14px; color: #374151; white-space: pre-wrap;">{output}</pre>
                                                        </div>
                                                    }
                                                })}
                                        </div>
                                    }
                                }
                            </For>
                        </div>
                    </div>
                </Show>
            </div>
        </div>
    }
}
