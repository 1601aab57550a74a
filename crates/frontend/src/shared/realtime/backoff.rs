//! Connection bookkeeping for the realtime socket, independent of the browser.

/// Close code of an intentional, clean shutdown
pub const NORMAL_CLOSURE: u16 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    Connected,
    #[default]
    Disconnected,
    Error,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Disconnected => "disconnected",
            ConnectionStatus::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Upper bound for a single reconnect delay
    pub reconnect_interval_ms: u32,
    /// Total connection attempts, the first connect included
    pub max_attempts: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            reconnect_interval_ms: 3000,
            max_attempts: 5,
        }
    }
}

impl ReconnectPolicy {
    /// Delay before the reconnect that follows `failures` earlier failures:
    /// `min(1000 * 2^failures, reconnect_interval)`.
    pub fn delay_ms(&self, failures: u32) -> u32 {
        let backoff = 2u32
            .checked_pow(failures)
            .and_then(|factor| factor.checked_mul(1000))
            .unwrap_or(u32::MAX);
        backoff.min(self.reconnect_interval_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseDecision {
    /// Clean shutdown, stay disconnected
    Stop,
    /// Attempt budget exhausted
    GiveUp { attempts: u32 },
    Reconnect { attempts: u32, delay_ms: u32 },
}

/// Status and attempt counter of one realtime connection
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConnectionState {
    pub policy: ReconnectPolicy,
    pub status: ConnectionStatus,
    pub attempts: u32,
    /// Bumped whenever a pending reconnect must not fire anymore
    pub reconnect_generation: u64,
}

impl ConnectionState {
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    /// Cancels any pending reconnect; returns the generation the new
    /// connection belongs to.
    pub fn begin_connect(&mut self) -> u64 {
        self.reconnect_generation += 1;
        self.reconnect_generation
    }

    pub fn on_open(&mut self) {
        self.status = ConnectionStatus::Connected;
        self.attempts = 0;
    }

    pub fn on_error(&mut self) {
        self.status = ConnectionStatus::Error;
    }

    pub fn on_close(&mut self, code: u16) -> CloseDecision {
        self.status = ConnectionStatus::Disconnected;
        if code == NORMAL_CLOSURE {
            return CloseDecision::Stop;
        }

        let failures = self.attempts;
        self.attempts += 1;
        if self.attempts < self.policy.max_attempts {
            CloseDecision::Reconnect {
                attempts: self.attempts,
                delay_ms: self.policy.delay_ms(failures),
            }
        } else {
            CloseDecision::GiveUp {
                attempts: self.attempts,
            }
        }
    }

    /// True while the reconnect scheduled under `generation` may still fire
    pub fn reconnect_due(&self, generation: u64) -> bool {
        self.reconnect_generation == generation
    }

    /// Intentional close from our side
    pub fn on_shutdown(&mut self) {
        self.reconnect_generation += 1;
        self.status = ConnectionStatus::Disconnected;
    }
}
