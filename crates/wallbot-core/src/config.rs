//! Configuration for a navigation run.
//!
//! Every tunable of the behavior engine lives here. Configs load from YAML
//! and are validated once, when the controller is constructed; nothing is
//! re-checked at run time.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use wallbot_proto::{Color, DriveCommand, MotionPrimitive, StopBehavior};

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Complete configuration for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Wheel speeds, durations and pacing.
    pub drive: DriveConfig,

    /// Thresholds and probabilities used by the rule evaluator.
    pub behavior: BehaviorConfig,

    /// History length and per-phase step budgets.
    pub phases: PhaseConfig,

    /// Seed for reproducible runs. `None` draws from OS entropy.
    pub random_seed: Option<u64>,

    /// Raw color that marks the goal.
    pub goal_color: Color,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            drive: DriveConfig::default(),
            behavior: BehaviorConfig::default(),
            phases: PhaseConfig::default(),
            random_seed: None,
            goal_color: Color::Green,
        }
    }
}

impl NavConfig {
    /// Loads and parses a YAML config file. Does not validate.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Parses a YAML document. Missing keys take their defaults.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Checks every section, returning the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.drive.validate()?;
        self.behavior.validate()?;
        self.phases.validate()
    }
}

/// Wheel speeds, primitive durations and pacing delays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    /// Wheel speed for straight moves.
    pub movement_speed: i32,
    /// Wheel speed for turns (applied with opposite signs per wheel).
    pub turn_speed: i32,
    pub move_duration_ms: u64,
    pub turn_duration_ms: u64,
    /// Pause after each drive command so the chassis settles.
    pub settle_delay_ms: u64,
    /// Pause before each sensor snapshot.
    pub tick_delay_ms: u64,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            movement_speed: 100,
            turn_speed: 50,
            move_duration_ms: 1000,
            turn_duration_ms: 1000,
            settle_delay_ms: 500,
            tick_delay_ms: 2000,
        }
    }
}

impl DriveConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.movement_speed <= 0 {
            return Err(ConfigError::invalid("drive.movement_speed", "must be positive"));
        }
        if self.turn_speed <= 0 {
            return Err(ConfigError::invalid("drive.turn_speed", "must be positive"));
        }
        if self.move_duration_ms == 0 {
            return Err(ConfigError::invalid("drive.move_duration_ms", "must be positive"));
        }
        if self.turn_duration_ms == 0 {
            return Err(ConfigError::invalid("drive.turn_duration_ms", "must be positive"));
        }
        Ok(())
    }

    /// Zeroes the pacing delays. Used by simulated runs.
    pub fn without_delays(mut self) -> Self {
        self.settle_delay_ms = 0;
        self.tick_delay_ms = 0;
        self
    }

    /// Resolves a primitive into paired wheel speeds and a duration.
    pub fn resolve(&self, primitive: MotionPrimitive) -> DriveCommand {
        let mv = self.movement_speed;
        let turn = self.turn_speed;
        let half_turn_ms = (self.turn_duration_ms / 2).max(1);

        match primitive {
            MotionPrimitive::Forward => DriveCommand::new(
                primitive,
                mv,
                mv,
                self.move_duration_ms,
                StopBehavior::Coast,
            ),
            MotionPrimitive::Backward => DriveCommand::new(
                primitive,
                -mv,
                -mv,
                self.move_duration_ms,
                StopBehavior::Hold,
            ),
            MotionPrimitive::TurnRight => DriveCommand::new(
                primitive,
                turn,
                -turn,
                self.turn_duration_ms,
                StopBehavior::Coast,
            ),
            MotionPrimitive::TurnLeft => DriveCommand::new(
                primitive,
                -turn,
                turn,
                self.turn_duration_ms,
                StopBehavior::Coast,
            ),
            MotionPrimitive::HalfTurnRight => {
                DriveCommand::new(primitive, turn, -turn, half_turn_ms, StopBehavior::Coast)
            }
            MotionPrimitive::HalfTurnLeft => {
                DriveCommand::new(primitive, -turn, turn, half_turn_ms, StopBehavior::Coast)
            }
        }
    }
}

/// Thresholds (millimetres) and probabilities for the rule evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Below this distance the wall counts as being on the left.
    pub wall_left_threshold_mm: f64,
    /// Below this distance the robot veers away from the wall.
    pub too_close_mm: f64,
    /// Above this distance the robot steers back toward the wall.
    pub too_far_mm: f64,
    /// Distance under which a previous right turn is continued.
    pub near_goal_mm: f64,
    /// One corrective (half-left, forward) pair per this many millimetres.
    pub correction_step_mm: f64,
    /// Chance of an extra backward step while following the wall.
    pub stochastic_recovery_p: f64,
    /// Chance of turning left when no rule applies.
    pub wander_left_p: f64,
    /// Chance of picking a right turn in the wander phase.
    pub wander_turn_right_p: f64,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            wall_left_threshold_mm: 300.0,
            too_close_mm: 30.0,
            too_far_mm: 120.0,
            near_goal_mm: 150.0,
            correction_step_mm: 100.0,
            stochastic_recovery_p: 0.02,
            wander_left_p: 0.8,
            wander_turn_right_p: 0.5,
        }
    }
}

impl BehaviorConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let distances = [
            ("behavior.wall_left_threshold_mm", self.wall_left_threshold_mm),
            ("behavior.too_close_mm", self.too_close_mm),
            ("behavior.too_far_mm", self.too_far_mm),
            ("behavior.near_goal_mm", self.near_goal_mm),
        ];
        for (field, value) in distances {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(
                    field,
                    format!("must be a non-negative distance, got {}", value),
                ));
            }
        }

        if self.too_close_mm > self.too_far_mm {
            return Err(ConfigError::invalid(
                "behavior.too_close_mm",
                format!(
                    "must not exceed too_far_mm ({} > {})",
                    self.too_close_mm, self.too_far_mm
                ),
            ));
        }

        if !self.correction_step_mm.is_finite() || self.correction_step_mm <= 0.0 {
            return Err(ConfigError::invalid(
                "behavior.correction_step_mm",
                "must be positive",
            ));
        }

        let probabilities = [
            ("behavior.stochastic_recovery_p", self.stochastic_recovery_p),
            ("behavior.wander_left_p", self.wander_left_p),
            ("behavior.wander_turn_right_p", self.wander_turn_right_p),
        ];
        for (field, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::invalid(
                    field,
                    format!("probability must be within [0, 1], got {}", value),
                ));
            }
        }

        Ok(())
    }
}

/// History length and step budgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseConfig {
    /// Capacity of the move and snapshot histories.
    pub history_length: usize,
    /// Ticks spent following the wall before wandering.
    pub wall_follow_steps: u32,
    /// Ticks spent wandering before looking for a wall again.
    pub wander_steps: u32,
    /// Optional safety cap on the total number of ticks.
    pub max_ticks: Option<u64>,
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self {
            history_length: 5,
            wall_follow_steps: 80,
            wander_steps: 15,
            max_ticks: None,
        }
    }
}

impl PhaseConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.history_length == 0 {
            return Err(ConfigError::invalid("phases.history_length", "must be at least 1"));
        }
        if self.wall_follow_steps == 0 {
            return Err(ConfigError::invalid("phases.wall_follow_steps", "must be at least 1"));
        }
        if self.wander_steps == 0 {
            return Err(ConfigError::invalid("phases.wander_steps", "must be at least 1"));
        }
        if self.max_ticks == Some(0) {
            return Err(ConfigError::invalid("phases.max_ticks", "must be at least 1 when set"));
        }
        Ok(())
    }
}
