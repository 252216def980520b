//! Fixed timestep driving
//!
//! The simulation only ever advances in whole ticks of the configured
//! duration. `FixedTimestep` turns irregular frame times into a count of
//! ticks to run, and `tick` applies one tick's input to a session.

use glam::Vec2;

use super::body::BodyEvent;
use super::haptic::Haptic;
use super::session::Session;
use crate::consts::MAX_TICKS_PER_FRAME;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Board tilt, in input units before the acceleration factor
    pub tilt: Vec2,
    /// Restart the session before integrating
    pub reset: bool,
}

/// Advance the session by one fixed timestep
pub fn tick<H: Haptic>(session: &mut Session<H>, input: &TickInput) -> Vec<BodyEvent> {
    if input.reset {
        session.reset();
    }
    session.update(input.tilt)
}

/// Accumulates elapsed wall time and hands it out in whole ticks
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    tick_ms: u32,
    max_ticks: u32,
    accumulator_ms: f64,
}

impl FixedTimestep {
    pub fn new(tick_ms: u32) -> Self {
        Self {
            tick_ms: tick_ms.max(1),
            max_ticks: MAX_TICKS_PER_FRAME,
            accumulator_ms: 0.0,
        }
    }

    /// Limit the ticks handed out per frame
    pub fn with_max_ticks(mut self, max_ticks: u32) -> Self {
        self.max_ticks = max_ticks.max(1);
        self
    }

    /// Add `elapsed_ms` of wall time and return how many ticks to run now.
    ///
    /// Time beyond the per-frame cap is dropped so a long stall does not
    /// turn into a burst of catch-up ticks.
    pub fn advance(&mut self, elapsed_ms: f64) -> u32 {
        let tick_ms = self.tick_ms as f64;
        self.accumulator_ms += elapsed_ms.max(0.0);

        let mut ticks = 0;
        while self.accumulator_ms >= tick_ms && ticks < self.max_ticks {
            self.accumulator_ms -= tick_ms;
            ticks += 1;
        }

        if ticks == self.max_ticks && self.accumulator_ms >= tick_ms {
            log::debug!(
                "Frame behind by {:.1} ms, skipping",
                self.accumulator_ms
            );
            self.accumulator_ms %= tick_ms;
        }
        ticks
    }

    /// Fraction of a tick left in the accumulator, for interpolation
    pub fn alpha(&self) -> f32 {
        (self.accumulator_ms / self.tick_ms as f64) as f32
    }
}
