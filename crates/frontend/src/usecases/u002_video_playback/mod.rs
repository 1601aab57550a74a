//! Video playback: readiness polling and the player panel.

pub mod poller;
mod view;

pub use poller::{
    wait_until_ready, HttpRangeCheck, PollGeneration, Readiness, ReadinessPoller, ReadinessCheck,
};
pub use view::VideoPlayer;
