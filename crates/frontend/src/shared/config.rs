//! Build-time configuration.
//!
//! Values are read with `option_env!` when the WASM bundle is compiled
//! (`JOCKEY_INDEX_ID=... trunk build`). Blank values count as unset.

/// Default video index id
const INDEX_ID: Option<&str> = option_env!("JOCKEY_INDEX_ID");
/// Absolute API origin, e.g. `https://jockey.example.com`; same-origin when unset
const API_BASE: Option<&str> = option_env!("JOCKEY_API_BASE");
/// Socket path for the realtime channel, e.g. `/api/ws/jockey`
const REALTIME_ENDPOINT: Option<&str> = option_env!("JOCKEY_REALTIME_ENDPOINT");

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppConfig {
    pub default_index_id: Option<String>,
    pub api_base: String,
    pub realtime_endpoint: Option<String>,
}

impl AppConfig {
    pub fn from_build_env() -> Self {
        Self::from_values(INDEX_ID, API_BASE, REALTIME_ENDPOINT)
    }

    pub fn from_values(
        index_id: Option<&str>,
        api_base: Option<&str>,
        realtime_endpoint: Option<&str>,
    ) -> Self {
        Self {
            default_index_id: non_blank(index_id),
            api_base: non_blank(api_base)
                .map(|b| b.trim_end_matches('/').to_string())
                .unwrap_or_default(),
            realtime_endpoint: non_blank(realtime_endpoint).map(|e| {
                if e.starts_with('/') {
                    e
                } else {
                    format!("/{}", e)
                }
            }),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
