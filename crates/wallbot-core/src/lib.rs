//! # wallbot-core
//!
//! Navigation engine for a small differential-drive robot searching an
//! arena for a goal-colored floor patch.
//!
//! This crate provides:
//! - The reactive wall-following rule set and the wander step
//! - The phase controller cycling FIND_WALL → FOLLOW_WALL → WANDER
//! - Bounded move and snapshot history
//! - The sensor/motion boundary traits and a hardware composition of them
//! - Configuration loading and validation
//! - A simulated arena for desk runs and integration tests

pub mod behavior;
pub mod boundary;
mod config;
mod controller;
pub mod history;
pub mod random;
pub mod sim;
pub mod testing;

pub use behavior::{Action, BehaviorEvaluator, Decision, Rule};
pub use boundary::{Actuator, HardwareBoundary, Notifier, RobotBoundary, Sensors, SilentNotifier};
pub use config::{BehaviorConfig, ConfigError, DriveConfig, NavConfig, PhaseConfig};
pub use controller::{
    NavError, PhaseController, RunResult, RunState, TerminationReason, TickOutcome,
};
pub use history::{HistoryBuffer, HistoryTracker};
pub use random::{RandomSource, SeededRandom};
pub use sim::{
    Arena, ArenaConfig, ArenaMotors, ArenaSensors, ArenaStats, GoalZone, Pose, RecordingNotifier,
};
