//! Volume fade-out as a tick driven state machine.
//!
//! The player advances a [`FadeRamp`] from a fixed interval timer; the ramp
//! itself never touches the audio element, it only says what to do next.

/// Interval between fade ticks
pub const FADE_TICK_MS: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FadePhase {
    /// Waiting out the initial delay
    Waiting { remaining_ms: f64 },
    /// Ramping down from `original_volume`
    Fading { elapsed_ms: f64, original_volume: f64 },
    Done,
}

/// What the player should do after a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FadeStep {
    Wait,
    SetVolume(f64),
    /// Pause, rewind and put the volume back
    Finish { restore_volume: f64 },
    Idle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FadeRamp {
    phase: FadePhase,
    fade_ms: f64,
}

impl FadeRamp {
    pub fn new(delay_seconds: f64, fade_seconds: f64) -> Self {
        Self {
            phase: FadePhase::Waiting {
                remaining_ms: (delay_seconds * 1000.0).max(0.0),
            },
            fade_ms: (fade_seconds * 1000.0).max(0.0),
        }
    }

    pub fn phase(&self) -> FadePhase {
        self.phase
    }

    pub fn is_done(&self) -> bool {
        self.phase == FadePhase::Done
    }

    /// Advances the ramp by `dt_ms`.
    ///
    /// `current_volume` is sampled when the delay runs out and becomes the
    /// volume restored at the end.
    pub fn tick(&mut self, dt_ms: f64, current_volume: f64) -> FadeStep {
        match self.phase {
            FadePhase::Waiting { remaining_ms } => {
                let remaining = remaining_ms - dt_ms;
                if remaining > 0.0 {
                    self.phase = FadePhase::Waiting {
                        remaining_ms: remaining,
                    };
                    return FadeStep::Wait;
                }
                self.phase = FadePhase::Fading {
                    elapsed_ms: 0.0,
                    original_volume: current_volume,
                };
                // Time left over from the delay counts towards the fade
                self.advance(-remaining)
            }
            FadePhase::Fading { .. } => self.advance(dt_ms),
            FadePhase::Done => FadeStep::Idle,
        }
    }

    fn advance(&mut self, dt_ms: f64) -> FadeStep {
        let FadePhase::Fading {
            elapsed_ms,
            original_volume,
        } = self.phase
        else {
            return FadeStep::Idle;
        };

        let elapsed = elapsed_ms + dt_ms;
        if elapsed >= self.fade_ms {
            self.phase = FadePhase::Done;
            return FadeStep::Finish {
                restore_volume: original_volume,
            };
        }

        self.phase = FadePhase::Fading {
            elapsed_ms: elapsed,
            original_volume,
        };
        let volume = original_volume * (1.0 - elapsed / self.fade_ms);
        FadeStep::SetVolume(volume.max(0.0))
    }
}

/// Configured volume plus the generation that owns the running fade.
///
/// The ramp always starts from the configured volume, so a fade that
/// replaces a half-finished one restores the real level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeControl {
    volume: f64,
    generation: u64,
}

impl FadeControl {
    pub fn new(volume: f64) -> Self {
        Self {
            volume: volume.clamp(0.0, 1.0),
            generation: 0,
        }
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Clamps to 0..=1 and returns the stored value
    pub fn set_volume(&mut self, volume: f64) -> f64 {
        self.volume = volume.clamp(0.0, 1.0);
        self.volume
    }

    /// Retires any scheduled or running fade
    pub fn cancel(&mut self) {
        self.generation += 1;
    }

    /// Retires the previous fade and returns the generation of a new one
    pub fn start(&mut self) -> u64 {
        self.cancel();
        self.generation
    }

    pub fn is_active(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Next step of the fade owned by `generation`, `None` once it was retired
    pub fn step(&self, generation: u64, ramp: &mut FadeRamp, dt_ms: f64) -> Option<FadeStep> {
        self.is_active(generation).then(|| ramp.tick(dt_ms, self.volume))
    }
}
