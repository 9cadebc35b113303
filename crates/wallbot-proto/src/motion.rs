//! Motion types: recorded moves, primitives and resolved drive commands.

use serde::{Deserialize, Serialize};

/// Coarse record of a directional decision, kept for short-term memory.
///
/// Left turns are executed but never recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Forward,
    Right,
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Move::Forward => write!(f, "forward"),
            Move::Right => write!(f, "right"),
        }
    }
}

/// One atomic timed differential-drive command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionPrimitive {
    Forward,
    Backward,
    TurnLeft,
    TurnRight,
    HalfTurnLeft,
    HalfTurnRight,
}

impl MotionPrimitive {
    /// Returns the primitive name for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            MotionPrimitive::Forward => "forward",
            MotionPrimitive::Backward => "backward",
            MotionPrimitive::TurnLeft => "turn_left",
            MotionPrimitive::TurnRight => "turn_right",
            MotionPrimitive::HalfTurnLeft => "half_turn_left",
            MotionPrimitive::HalfTurnRight => "half_turn_right",
        }
    }
}

/// What the motors do once a command's duration elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopBehavior {
    /// Let the wheels spin down freely.
    #[default]
    Coast,
    /// Actively hold position.
    Hold,
}

/// A motion primitive resolved to paired wheel speeds and a duration.
///
/// Both wheels are commanded together as one logical primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveCommand {
    /// The primitive this command was resolved from.
    pub primitive: MotionPrimitive,

    /// Left wheel speed (signed, degrees per second at the motor).
    pub left_speed: i32,

    /// Right wheel speed (signed, degrees per second at the motor).
    pub right_speed: i32,

    /// Nominal duration in milliseconds.
    pub duration_ms: u64,

    /// Stop behavior once the duration elapses.
    pub stop: StopBehavior,
}

impl DriveCommand {
    /// Creates a new drive command.
    pub fn new(
        primitive: MotionPrimitive,
        left_speed: i32,
        right_speed: i32,
        duration_ms: u64,
        stop: StopBehavior,
    ) -> Self {
        Self {
            primitive,
            left_speed,
            right_speed,
            duration_ms,
            stop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_names() {
        assert_eq!(MotionPrimitive::HalfTurnRight.as_str(), "half_turn_right");
        assert_eq!(MotionPrimitive::Backward.as_str(), "backward");
    }

    #[test]
    fn test_move_display() {
        assert_eq!(Move::Right.to_string(), "right");
        assert_eq!(Move::Forward.to_string(), "forward");
    }

    #[test]
    fn test_primitive_serialization() {
        let json = serde_json::to_string(&MotionPrimitive::HalfTurnLeft).unwrap();
        assert_eq!(json, "\"half_turn_left\"");
    }
}
