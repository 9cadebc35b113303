//! Mutable state of a single run.

use crate::history::HistoryTracker;
use crate::random::RandomSource;
use std::time::{Duration, Instant};
use wallbot_proto::Phase;

/// State owned by the phase controller for the lifetime of one run.
pub struct RunState {
    /// Current search phase.
    pub phase: Phase,

    /// Ticks completed in the current phase.
    pub phase_ticks: u32,

    /// Ticks completed across the whole run.
    pub total_ticks: u64,

    /// Number of FIND_WALL → FOLLOW_WALL → WANDER cycles started.
    pub cycles: u32,

    /// Recent moves and snapshots.
    pub history: HistoryTracker,

    rng: Box<dyn RandomSource + Send>,

    started_at: Instant,
}

impl RunState {
    /// Creates the state for a fresh run in FIND_WALL.
    pub fn new(history_length: usize, rng: Box<dyn RandomSource + Send>) -> Self {
        Self {
            phase: Phase::FindWall,
            phase_ticks: 0,
            total_ticks: 0,
            cycles: 1,
            history: HistoryTracker::new(history_length),
            rng,
            started_at: Instant::now(),
        }
    }

    /// Takes the single random draw for this tick.
    pub fn draw(&mut self) -> f64 {
        self.rng.next()
    }

    /// Switches phase and resets the per-phase tick counter.
    pub fn enter(&mut self, phase: Phase) {
        if phase == Phase::FindWall && self.phase == Phase::Wander {
            self.cycles += 1;
        }
        self.phase = phase;
        self.phase_ticks = 0;
    }

    /// Wall-clock time since the run started.
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

impl std::fmt::Debug for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunState")
            .field("phase", &self.phase)
            .field("phase_ticks", &self.phase_ticks)
            .field("total_ticks", &self.total_ticks)
            .field("cycles", &self.cycles)
            .field("history", &self.history)
            .finish_non_exhaustive()
    }
}
