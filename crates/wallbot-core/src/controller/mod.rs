//! Phase controller.
//!
//! The controller sequences the search phases FIND_WALL → FOLLOW_WALL →
//! WANDER → FIND_WALL … until the goal is detected. Each tick reads one
//! snapshot, evaluates one rule set with one random draw, executes the
//! resulting primitives in order and updates history.

mod run_state;
#[cfg(test)]
mod tests;

pub use run_state::RunState;

use crate::behavior::{BehaviorEvaluator, Decision};
use crate::boundary::RobotBoundary;
use crate::config::{ConfigError, NavConfig};
use crate::random::{RandomSource, SeededRandom};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};
use wallbot_proto::{BoundaryError, MotionPrimitive, Notification, Phase, SensorSnapshot};

/// Errors that end a run early.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    /// The sensor/motion boundary failed. Never retried by the controller.
    #[error("boundary fault: {0}")]
    Boundary(#[from] BoundaryError),
}

/// Reason a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// The goal color was detected.
    GoalReached,
    /// An external stop request arrived between ticks.
    Stopped,
    /// The configured `max_ticks` safety cap was hit.
    TickLimit,
}

impl TerminationReason {
    /// Returns the process exit code for this reason.
    ///
    /// - 0: goal reached
    /// - 2: tick limit
    /// - 130: stopped by the operator (SIGINT = 128 + 2)
    pub fn exit_code(&self) -> i32 {
        match self {
            TerminationReason::GoalReached => 0,
            TerminationReason::TickLimit => 2,
            TerminationReason::Stopped => 130,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TerminationReason::GoalReached => "goal_reached",
            TerminationReason::Stopped => "stopped",
            TerminationReason::TickLimit => "tick_limit",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TerminationReason::GoalReached)
    }
}

/// Summary handed back to whoever owns the program lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunResult {
    pub goal_reached: bool,
    pub total_ticks: u64,
    pub reason: TerminationReason,
    pub final_phase: Phase,
    pub cycles: u32,
    pub elapsed_ms: u64,
}

/// Outcome of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Keep going.
    Continue,
    /// The goal is reached; no further ticks will be issued.
    GoalReached,
}

/// Drives the search state machine against a robot boundary.
pub struct PhaseController<B> {
    config: NavConfig,
    boundary: B,
    evaluator: BehaviorEvaluator,
    state: RunState,
    stop: Arc<AtomicBool>,
}

impl<B: RobotBoundary> PhaseController<B> {
    /// Creates a controller with an explicit randomization source.
    ///
    /// Configuration is validated here; an invalid config never reaches a run.
    pub fn new(
        config: NavConfig,
        boundary: B,
        rng: Box<dyn RandomSource + Send>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let evaluator = BehaviorEvaluator::new(&config.behavior);
        let state = RunState::new(config.phases.history_length, rng);

        Ok(Self {
            config,
            boundary,
            evaluator,
            state,
            stop: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Creates a controller seeded from `config.random_seed`.
    pub fn from_config(config: NavConfig, boundary: B) -> Result<Self, ConfigError> {
        let rng = SeededRandom::from_seed_option(config.random_seed);
        Self::new(config, boundary, Box::new(rng))
    }

    /// Replaces the stop flag with one shared by the caller.
    #[must_use]
    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop = flag;
        self
    }

    /// Returns a handle that stops the run between ticks when set.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    pub fn boundary(&self) -> &B {
        &self.boundary
    }

    /// Consumes the controller, returning the boundary.
    pub fn into_boundary(self) -> B {
        self.boundary
    }

    /// Runs ticks until the goal, an external stop, or the tick cap.
    pub fn run(&mut self) -> Result<RunResult, NavError> {
        if self.state.total_ticks == 0 && !self.state.phase.is_terminal() {
            info!(
                follow_steps = self.config.phases.wall_follow_steps,
                wander_steps = self.config.phases.wander_steps,
                "Starting goal search"
            );
            self.boundary.notify(Notification::RunStart);
            self.boundary.notify(Notification::for_phase(self.state.phase));
        }

        loop {
            if let Some(reason) = self.check_termination() {
                return Ok(self.finish(reason));
            }

            if self.tick()? == TickOutcome::GoalReached {
                return Ok(self.finish(TerminationReason::GoalReached));
            }
        }
    }

    /// Checks the between-tick termination conditions.
    pub fn check_termination(&self) -> Option<TerminationReason> {
        if self.state.phase.is_terminal() {
            return Some(TerminationReason::GoalReached);
        }

        if self.stop.load(Ordering::SeqCst) {
            return Some(TerminationReason::Stopped);
        }

        if let Some(max_ticks) = self.config.phases.max_ticks
            && self.state.total_ticks >= max_ticks
        {
            return Some(TerminationReason::TickLimit);
        }

        None
    }

    /// Executes one tick of the current phase.
    ///
    /// Once the goal is reached this returns [`TickOutcome::GoalReached`]
    /// without touching the boundary.
    pub fn tick(&mut self) -> Result<TickOutcome, NavError> {
        if self.state.phase.is_terminal() {
            return Ok(TickOutcome::GoalReached);
        }

        let snapshot = self.boundary.read_snapshot()?;
        self.state.history.record_snapshot(snapshot);
        self.state.total_ticks += 1;
        self.state.phase_ticks += 1;
        self.log_readings(&snapshot);

        match self.state.phase {
            Phase::FindWall => {
                if snapshot.is_goal() {
                    return Ok(self.reach_goal());
                }
                if snapshot.any_touch() {
                    self.transition(Phase::FollowWall);
                } else {
                    self.drive(&[MotionPrimitive::Forward])?;
                }
            }
            Phase::FollowWall => {
                let draw = self.state.draw();
                let decision = self.evaluator.evaluate(&snapshot, &self.state.history, draw);
                if decision.is_terminal() {
                    return Ok(self.reach_goal());
                }
                self.apply(&decision)?;

                if self.state.phase_ticks >= self.config.phases.wall_follow_steps {
                    self.transition(Phase::Wander);
                }
            }
            Phase::Wander => {
                let draw = self.state.draw();
                let decision = self.evaluator.evaluate_wander(&snapshot, draw);
                if decision.is_terminal() {
                    return Ok(self.reach_goal());
                }
                self.apply(&decision)?;

                if self.state.phase_ticks >= self.config.phases.wander_steps {
                    self.transition(Phase::FindWall);
                }
            }
            Phase::GoalReached => return Ok(TickOutcome::GoalReached),
        }

        Ok(TickOutcome::Continue)
    }

    fn apply(&mut self, decision: &Decision) -> Result<(), NavError> {
        debug!(
            rule = decision.rule.label(),
            primitives = decision.primitives().len(),
            "Rule selected"
        );
        self.drive(decision.primitives())?;
        if let Some(mv) = decision.recorded_move {
            self.state.history.record_move(mv);
        }
        Ok(())
    }

    fn drive(&mut self, primitives: &[MotionPrimitive]) -> Result<(), NavError> {
        for &primitive in primitives {
            let command = self.config.drive.resolve(primitive);
            debug!(
                primitive = primitive.as_str(),
                left = command.left_speed,
                right = command.right_speed,
                duration_ms = command.duration_ms,
                "Executing"
            );
            self.boundary.execute(&command)?;
        }
        Ok(())
    }

    fn transition(&mut self, next: Phase) {
        info!(
            "Phase {} -> {} after {} ticks",
            self.state.phase, next, self.state.phase_ticks
        );
        self.state.enter(next);
        self.boundary.notify(Notification::for_phase(next));
    }

    fn reach_goal(&mut self) -> TickOutcome {
        info!(
            phase = %self.state.phase,
            total_ticks = self.state.total_ticks,
            "Goal found"
        );
        self.state.enter(Phase::GoalReached);
        self.boundary.notify(Notification::GoalReached);
        TickOutcome::GoalReached
    }

    fn finish(&self, reason: TerminationReason) -> RunResult {
        let result = RunResult {
            goal_reached: reason.is_success(),
            total_ticks: self.state.total_ticks,
            reason,
            final_phase: self.state.phase,
            cycles: self.state.cycles,
            elapsed_ms: self.state.elapsed().as_millis() as u64,
        };
        info!(
            reason = reason.as_str(),
            total_ticks = result.total_ticks,
            cycles = result.cycles,
            "Run finished"
        );
        result
    }

    fn log_readings(&self, snapshot: &SensorSnapshot) {
        debug!(
            phase = %self.state.phase,
            tick = self.state.phase_ticks,
            distance_mm = snapshot.distance_mm,
            touch_left = snapshot.touch_left,
            touch_right = snapshot.touch_right,
            color = ?snapshot.color,
            "Sensor readings"
        );
    }
}

impl<B: std::fmt::Debug> std::fmt::Debug for PhaseController<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseController")
            .field("boundary", &self.boundary)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
