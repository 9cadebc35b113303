//! Sensor snapshot types.

use serde::{Deserialize, Serialize};

/// Raw color reported by a color sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// No color detected (nothing under the sensor).
    #[default]
    None,
    Black,
    Blue,
    Green,
    Yellow,
    Red,
    White,
    Brown,
}

/// Color classification consumed by the navigation core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorClass {
    /// The surface marks the goal.
    Goal,
    /// Anything else.
    #[default]
    Other,
}

impl ColorClass {
    /// Classifies a raw color against the configured goal color.
    pub fn classify(color: Color, goal: Color) -> Self {
        if color == goal {
            ColorClass::Goal
        } else {
            ColorClass::Other
        }
    }
}

/// One reading of every sensor, captured once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SensorSnapshot {
    /// Distance reported by the left-facing ultrasonic sensor, in millimetres.
    pub distance_mm: f64,

    /// Left bumper pressed.
    pub touch_left: bool,

    /// Right bumper pressed.
    pub touch_right: bool,

    /// Classified floor color.
    pub color: ColorClass,
}

impl SensorSnapshot {
    /// Creates a snapshot with no contact and a non-goal floor.
    pub fn at_distance(distance_mm: f64) -> Self {
        Self {
            distance_mm,
            ..Self::default()
        }
    }

    /// Sets the bumper states.
    #[must_use]
    pub fn with_touch(mut self, left: bool, right: bool) -> Self {
        self.touch_left = left;
        self.touch_right = right;
        self
    }

    /// Sets the color classification.
    #[must_use]
    pub fn with_color(mut self, color: ColorClass) -> Self {
        self.color = color;
        self
    }

    /// Returns true if the floor under the robot is the goal.
    pub fn is_goal(&self) -> bool {
        self.color == ColorClass::Goal
    }

    /// Returns true if either bumper is pressed.
    pub fn any_touch(&self) -> bool {
        self.touch_left || self.touch_right
    }

    /// Returns true if both bumpers are pressed (head-on wall).
    pub fn full_wall_hit(&self) -> bool {
        self.touch_left && self.touch_right
    }
}
