//! Waits for a freshly rendered video to become downloadable.

use async_trait::async_trait;
use gloo_net::http::Request;
use std::future::Future;

/// Pause before every check
pub const POLL_INTERVAL_MS: u32 = 2000;
pub const MAX_RETRIES: u32 = 30;

pub const TIMEOUT_MESSAGE: &str = "Video generation timed out. Please try refreshing the page.";
pub const PLAYBACK_ERROR_MESSAGE: &str = "Error playing video. Please try refreshing the page.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Polling { retries: u32 },
    Ready,
    TimedOut,
}

/// Retry bookkeeping for one video URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadinessPoller {
    retries: u32,
    max_retries: u32,
    outcome: Readiness,
}

impl ReadinessPoller {
    pub fn new(max_retries: u32) -> Self {
        Self {
            retries: 0,
            max_retries,
            outcome: Readiness::Polling { retries: 0 },
        }
    }

    pub fn outcome(&self) -> Readiness {
        self.outcome
    }

    /// Feeds one check result. Ignored once the poller has settled.
    pub fn record(&mut self, ready: bool) -> Readiness {
        if !matches!(self.outcome, Readiness::Polling { .. }) {
            return self.outcome;
        }
        self.outcome = if ready {
            Readiness::Ready
        } else {
            self.retries += 1;
            if self.retries >= self.max_retries {
                Readiness::TimedOut
            } else {
                Readiness::Polling {
                    retries: self.retries,
                }
            }
        };
        self.outcome
    }
}

impl Default for ReadinessPoller {
    fn default() -> Self {
        Self::new(MAX_RETRIES)
    }
}

/// Identifies the poll that owns the current URL
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollGeneration(u64);

impl PollGeneration {
    /// Every change retires the previous poll, a cleared URL included.
    /// Returns the generation a new poll should run under.
    pub fn on_url_change(&mut self, url: Option<&str>) -> Option<u64> {
        self.0 += 1;
        url.map(|_| self.0)
    }

    pub fn invalidate(&mut self) {
        self.0 += 1;
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.0 == generation
    }
}

#[async_trait(?Send)]
pub trait ReadinessCheck {
    /// True once `url` serves content. Failures count as not ready.
    async fn is_ready(&self, url: &str) -> bool;
}

/// Asks for the first byte of the resource
pub struct HttpRangeCheck;

#[async_trait(?Send)]
impl ReadinessCheck for HttpRangeCheck {
    async fn is_ready(&self, url: &str) -> bool {
        match Request::get(url).header("Range", "bytes=0-0").send().await {
            Ok(resp) => matches!(resp.status(), 200 | 206),
            Err(e) => {
                log::debug!("[VideoPlayer] Video not ready yet: {}", e);
                false
            }
        }
    }
}

/// Polls `url` until it is ready or the retry budget is spent.
///
/// Returns `None` as soon as `is_current` reports the URL was superseded.
pub async fn wait_until_ready<S, F>(
    check: &dyn ReadinessCheck,
    url: &str,
    sleep: S,
    is_current: impl Fn() -> bool,
) -> Option<Readiness>
where
    S: Fn(u32) -> F,
    F: Future<Output = ()>,
{
    let mut poller = ReadinessPoller::default();
    loop {
        sleep(POLL_INTERVAL_MS).await;
        if !is_current() {
            return None;
        }
        let ready = check.is_ready(url).await;
        if !is_current() {
            return None;
        }
        match poller.record(ready) {
            Readiness::Polling { retries } => {
                log::debug!("[VideoPlayer] Poll {} of {}", retries, MAX_RETRIES);
            }
            settled => return Some(settled),
        }
    }
}
