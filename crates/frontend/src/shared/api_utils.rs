//! API utilities for frontend-backend communication
//!
//! Provides helper functions for constructing API and socket URLs.

use super::config::AppConfig;
use serde::Serialize;

/// Build a full API URL from a path
///
/// # Arguments
/// * `path` - The API path (should start with "/api/")
///
/// # Example
/// ```rust,ignore
/// let url = api_url(&config, "/api/process/init");
/// ```
pub fn api_url(config: &AppConfig, path: &str) -> String {
    format!("{}{}", config.api_base, path)
}

#[derive(Serialize)]
struct StreamQuery<'a> {
    thread_id: &'a str,
}

/// Path of the SSE stream for one thread, e.g. `/api/stream?thread_id=t-1`
pub fn stream_path(thread_id: &str) -> String {
    let query = serde_qs::to_string(&StreamQuery { thread_id }).unwrap_or_default();
    format!("/api/stream?{}", query)
}

/// Socket URL for `endpoint` on the page's own host.
///
/// `https:` pages get `wss:`, everything else `ws:`.
pub fn websocket_url(page_protocol: &str, page_host: &str, endpoint: &str) -> String {
    let scheme = if page_protocol == "https:" { "wss:" } else { "ws:" };
    format!("{}//{}{}", scheme, page_host, endpoint)
}

/// [`websocket_url`] for the current window location
pub fn page_websocket_url(endpoint: &str) -> Option<String> {
    let location = web_sys::window()?.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let host = location.host().ok()?;
    Some(websocket_url(&protocol, &host, endpoint))
}
