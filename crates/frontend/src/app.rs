use crate::shared::config::AppConfig;
use crate::shared::state::SessionStore;
use crate::usecases::u001_prompt_submission::TextProcessorPage;
use leptos::prelude::*;
use thaw::ConfigProvider;

#[component]
pub fn App() -> impl IntoView {
    // Provide the session store to the whole app via context.
    provide_context(SessionStore::new());

    let config = AppConfig::from_build_env();
    log::info!(
        "[App] Starting with api base '{}', realtime {}",
        config.api_base,
        config.realtime_endpoint.as_deref().unwrap_or("disabled")
    );
    provide_context(config);

    view! {
        <ConfigProvider>
            <TextProcessorPage />
        </ConfigProvider>
    }
}
