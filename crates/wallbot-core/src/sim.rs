//! Simulated rectangular arena.
//!
//! Stands in for the robot's drivers so the full stack can run on a desk.
//! The ultrasonic sensor faces left, the two bumpers sit at ±35° on the
//! front, and drive commands are integrated with plain differential-drive
//! kinematics. Walls stop the robot; it slides along them.

use crate::boundary::{Actuator, Notifier, Sensors};
use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::info;
use wallbot_proto::{BoundaryError, Color, StopBehavior};

/// Integration step for drive commands.
const STEP_MS: u64 = 10;

/// Bumper mount angle either side of the heading.
const BUMPER_ANGLE_DEG: f64 = 35.0;

/// Robot position and heading (degrees, counter-clockwise from +x).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub x_mm: f64,
    pub y_mm: f64,
    pub heading_deg: f64,
}

/// Circular patch of goal-colored floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalZone {
    pub x_mm: f64,
    pub y_mm: f64,
    pub radius_mm: f64,
}

/// Arena geometry and robot model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub width_mm: f64,
    pub height_mm: f64,
    pub robot_radius_mm: f64,
    /// How far ahead of the robot centre the bumpers reach.
    pub bumper_reach_mm: f64,
    pub start: Pose,
    pub goal: GoalZone,
    /// Linear wheel speed (mm/s) per unit of commanded speed.
    pub mm_per_speed_unit: f64,
    pub wheel_base_mm: f64,
    /// Reading reported when no wall is in range.
    pub sensor_range_mm: f64,
    pub floor_color: Color,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width_mm: 2000.0,
            height_mm: 1500.0,
            robot_radius_mm: 80.0,
            bumper_reach_mm: 120.0,
            start: Pose {
                x_mm: 300.0,
                y_mm: 300.0,
                heading_deg: 0.0,
            },
            goal: GoalZone {
                x_mm: 1700.0,
                y_mm: 1200.0,
                radius_mm: 150.0,
            },
            mm_per_speed_unit: 0.5,
            wheel_base_mm: 120.0,
            sensor_range_mm: 2550.0,
            floor_color: Color::White,
        }
    }
}

impl ArenaConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("arena.width_mm", self.width_mm),
            ("arena.height_mm", self.height_mm),
            ("arena.robot_radius_mm", self.robot_radius_mm),
            ("arena.bumper_reach_mm", self.bumper_reach_mm),
            ("arena.mm_per_speed_unit", self.mm_per_speed_unit),
            ("arena.wheel_base_mm", self.wheel_base_mm),
            ("arena.sensor_range_mm", self.sensor_range_mm),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be positive, got {}", value),
                });
            }
        }

        let r = self.robot_radius_mm;
        if self.width_mm <= 2.0 * r || self.height_mm <= 2.0 * r {
            return Err(ConfigError::Invalid {
                field: "arena.width_mm",
                reason: "arena is too small for the robot".to_string(),
            });
        }
        if self.bumper_reach_mm <= r {
            return Err(ConfigError::Invalid {
                field: "arena.bumper_reach_mm",
                reason: "bumpers must reach past the robot body".to_string(),
            });
        }

        let start = self.start;
        let inside = (r..=self.width_mm - r).contains(&start.x_mm)
            && (r..=self.height_mm - r).contains(&start.y_mm);
        if !inside {
            return Err(ConfigError::Invalid {
                field: "arena.start",
                reason: format!("({}, {}) is outside the arena", start.x_mm, start.y_mm),
            });
        }
        Ok(())
    }
}

/// Counters accumulated by the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArenaStats {
    pub pose: Pose,
    pub travelled_mm: f64,
    pub sim_time_ms: u64,
    /// Drive commands that ended up pushing against a wall.
    pub wall_contacts: u64,
}

#[derive(Debug)]
struct World {
    config: ArenaConfig,
    goal_color: Color,
    pose: Pose,
    travelled_mm: f64,
    sim_time_ms: u64,
    wall_contacts: u64,
}

impl World {
    fn inside(&self, x: f64, y: f64) -> bool {
        (0.0..=self.config.width_mm).contains(&x) && (0.0..=self.config.height_mm).contains(&y)
    }

    fn distance_left(&self) -> f64 {
        let theta = (self.pose.heading_deg + 90.0).to_radians();
        let (dy, dx) = theta.sin_cos();
        let Pose { x_mm: x, y_mm: y, .. } = self.pose;
        let (w, h) = (self.config.width_mm, self.config.height_mm);

        let mut t = f64::INFINITY;
        if dx > f64::EPSILON {
            t = t.min((w - x) / dx);
        } else if dx < -f64::EPSILON {
            t = t.min(-x / dx);
        }
        if dy > f64::EPSILON {
            t = t.min((h - y) / dy);
        } else if dy < -f64::EPSILON {
            t = t.min(-y / dy);
        }

        (t - self.config.robot_radius_mm).clamp(0.0, self.config.sensor_range_mm)
    }

    fn bumper(&self, offset_deg: f64) -> bool {
        let theta = (self.pose.heading_deg + offset_deg).to_radians();
        let reach = self.config.bumper_reach_mm;
        let px = self.pose.x_mm + reach * theta.cos();
        let py = self.pose.y_mm + reach * theta.sin();
        !self.inside(px, py)
    }

    fn color(&self) -> Color {
        let goal = self.config.goal;
        let dist = (self.pose.x_mm - goal.x_mm).hypot(self.pose.y_mm - goal.y_mm);
        if dist <= goal.radius_mm {
            self.goal_color
        } else {
            self.config.floor_color
        }
    }

    fn drive(&mut self, left_speed: i32, right_speed: i32, duration_ms: u64) {
        let cfg = &self.config;
        let vl = f64::from(left_speed) * cfg.mm_per_speed_unit;
        let vr = f64::from(right_speed) * cfg.mm_per_speed_unit;
        let v = (vl + vr) / 2.0;
        let omega = (vr - vl) / cfg.wheel_base_mm;

        let r = cfg.robot_radius_mm;
        let (max_x, max_y) = (cfg.width_mm - r, cfg.height_mm - r);

        let steps = (duration_ms / STEP_MS).max(1);
        let dt = duration_ms as f64 / steps as f64 / 1000.0;
        let mut contact = false;

        for _ in 0..steps {
            let heading = self.pose.heading_deg.to_radians() + omega * dt;
            let x = self.pose.x_mm + v * heading.cos() * dt;
            let y = self.pose.y_mm + v * heading.sin() * dt;

            let cx = x.clamp(r, max_x);
            let cy = y.clamp(r, max_y);
            contact |= cx != x || cy != y;

            self.travelled_mm += (cx - self.pose.x_mm).hypot(cy - self.pose.y_mm);
            self.pose = Pose {
                x_mm: cx,
                y_mm: cy,
                heading_deg: heading.to_degrees().rem_euclid(360.0),
            };
        }

        self.sim_time_ms += duration_ms;
        if contact {
            self.wall_contacts += 1;
        }
    }
}

/// A simulated arena shared by its sensor and motor handles.
#[derive(Debug, Clone)]
pub struct Arena {
    world: Arc<Mutex<World>>,
}

impl Arena {
    /// Creates an arena whose goal patch shows `goal_color`.
    pub fn new(config: ArenaConfig, goal_color: Color) -> Self {
        let pose = config.start;
        Self {
            world: Arc::new(Mutex::new(World {
                config,
                goal_color,
                pose,
                travelled_mm: 0.0,
                sim_time_ms: 0,
                wall_contacts: 0,
            })),
        }
    }

    /// Sensor handle reading from this arena.
    pub fn sensors(&self) -> ArenaSensors {
        ArenaSensors {
            world: Arc::clone(&self.world),
        }
    }

    /// Motor handle driving the robot in this arena.
    pub fn motors(&self) -> ArenaMotors {
        ArenaMotors {
            world: Arc::clone(&self.world),
        }
    }

    pub fn pose(&self) -> Pose {
        lock(&self.world).pose
    }

    /// Teleports the robot, e.g. to set up a scenario.
    pub fn place(&self, pose: Pose) {
        lock(&self.world).pose = pose;
    }

    pub fn stats(&self) -> ArenaStats {
        let world = lock(&self.world);
        ArenaStats {
            pose: world.pose,
            travelled_mm: world.travelled_mm,
            sim_time_ms: world.sim_time_ms,
            wall_contacts: world.wall_contacts,
        }
    }
}

// The world holds plain data, so a poisoned lock is still consistent.
fn lock(world: &Mutex<World>) -> MutexGuard<'_, World> {
    world.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Sensor side of an [`Arena`].
#[derive(Debug, Clone)]
pub struct ArenaSensors {
    world: Arc<Mutex<World>>,
}

impl Sensors for ArenaSensors {
    fn distance_mm(&mut self) -> Result<f64, BoundaryError> {
        Ok(lock(&self.world).distance_left())
    }

    fn touch_left(&mut self) -> Result<bool, BoundaryError> {
        Ok(lock(&self.world).bumper(BUMPER_ANGLE_DEG))
    }

    fn touch_right(&mut self) -> Result<bool, BoundaryError> {
        Ok(lock(&self.world).bumper(-BUMPER_ANGLE_DEG))
    }

    fn color(&mut self) -> Result<Color, BoundaryError> {
        Ok(lock(&self.world).color())
    }
}

/// Motor side of an [`Arena`]. Commands complete instantly in wall-clock time.
#[derive(Debug, Clone)]
pub struct ArenaMotors {
    world: Arc<Mutex<World>>,
}

impl Actuator for ArenaMotors {
    fn drive(
        &mut self,
        left_speed: i32,
        right_speed: i32,
        duration_ms: u64,
        _stop: StopBehavior,
    ) -> Result<(), BoundaryError> {
        lock(&self.world).drive(left_speed, right_speed, duration_ms);
        Ok(())
    }
}

/// Notifier that logs and records announcements instead of playing them.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    spoken: Vec<String>,
    beeps: u32,
}

impl RecordingNotifier {
    pub fn spoken(&self) -> &[String] {
        &self.spoken
    }

    pub fn beeps(&self) -> u32 {
        self.beeps
    }
}

impl Notifier for RecordingNotifier {
    fn speak(&mut self, text: &str) -> Result<(), BoundaryError> {
        info!(target: "wallbot::speech", "{}", text);
        self.spoken.push(text.to_string());
        Ok(())
    }

    fn beep(&mut self) -> Result<(), BoundaryError> {
        info!(target: "wallbot::speech", "*beep*");
        self.beeps += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_default_arena_is_valid() {
        assert!(ArenaConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_start_outside() {
        let mut config = ArenaConfig::default();
        config.start.x_mm = 10.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_left_distance_to_wall() {
        let arena = Arena::new(ArenaConfig::default(), Color::Green);
        let mut sensors = arena.sensors();
        // Facing +x at y=300: the left wall is y=1500, minus the body radius.
        assert!(approx(sensors.distance_mm().unwrap(), 1120.0));

        arena.place(Pose {
            x_mm: 300.0,
            y_mm: 300.0,
            heading_deg: 180.0,
        });
        assert!(approx(sensors.distance_mm().unwrap(), 220.0));
    }

    #[test]
    fn test_distance_capped_at_range() {
        let config = ArenaConfig {
            width_mm: 6000.0,
            height_mm: 6000.0,
            ..ArenaConfig::default()
        };
        let mut sensors = Arena::new(config, Color::Green).sensors();
        assert_eq!(sensors.distance_mm().unwrap(), 2550.0);
    }

    #[test]
    fn test_forward_until_wall_presses_both_bumpers() {
        let arena = Arena::new(ArenaConfig::default(), Color::Green);
        let mut sensors = arena.sensors();
        let mut motors = arena.motors();

        assert!(!sensors.touch_left().unwrap());
        assert!(!sensors.touch_right().unwrap());

        for _ in 0..100 {
            motors.drive(100, 100, 1000, StopBehavior::Coast).unwrap();
        }

        let stats = arena.stats();
        assert!(approx(stats.pose.x_mm, 1920.0));
        assert!(approx(stats.pose.y_mm, 300.0));
        assert!(stats.wall_contacts > 0);
        assert!(sensors.touch_left().unwrap());
        assert!(sensors.touch_right().unwrap());
    }

    #[test]
    fn test_angled_contact_presses_one_bumper() {
        let arena = Arena::new(ArenaConfig::default(), Color::Green);
        // Wall x=2000 ahead-left when heading 30 degrees below the normal.
        arena.place(Pose {
            x_mm: 1920.0,
            y_mm: 700.0,
            heading_deg: 330.0,
        });
        let mut sensors = arena.sensors();
        assert!(sensors.touch_left().unwrap());
        assert!(!sensors.touch_right().unwrap());
    }

    #[test]
    fn test_turn_right_rotates_clockwise() {
        let arena = Arena::new(ArenaConfig::default(), Color::Green);
        let mut motors = arena.motors();
        motors.drive(50, -50, 1000, StopBehavior::Coast).unwrap();

        let pose = arena.pose();
        // omega = -50 / 120 rad/s for one second.
        let expected = (-50.0_f64 / 120.0).to_degrees().rem_euclid(360.0);
        assert!(approx(pose.heading_deg, expected));
        assert!(approx(pose.x_mm, 300.0));
        assert!(approx(pose.y_mm, 300.0));
    }

    #[test]
    fn test_goal_color_inside_zone() {
        let arena = Arena::new(ArenaConfig::default(), Color::Green);
        let mut sensors = arena.sensors();
        assert_eq!(sensors.color().unwrap(), Color::White);

        arena.place(Pose {
            x_mm: 1650.0,
            y_mm: 1150.0,
            heading_deg: 0.0,
        });
        assert_eq!(sensors.color().unwrap(), Color::Green);
    }

    #[test]
    fn test_goal_patch_uses_given_color() {
        let arena = Arena::new(ArenaConfig::default(), Color::Red);
        arena.place(Pose {
            x_mm: 1700.0,
            y_mm: 1200.0,
            heading_deg: 0.0,
        });
        assert_eq!(arena.sensors().color().unwrap(), Color::Red);
    }

    #[test]
    fn test_stats_accumulate() {
        let arena = Arena::new(ArenaConfig::default(), Color::Green);
        let mut motors = arena.motors();
        motors.drive(100, 100, 1000, StopBehavior::Coast).unwrap();
        motors.drive(-100, -100, 500, StopBehavior::Hold).unwrap();

        let stats = arena.stats();
        assert_eq!(stats.sim_time_ms, 1500);
        assert!(approx(stats.travelled_mm, 75.0));
        assert!(approx(stats.pose.x_mm, 325.0));
    }

    #[test]
    fn test_recording_notifier() {
        let mut notifier = RecordingNotifier::default();
        notifier.speak("Finding wall").unwrap();
        notifier.beep().unwrap();
        assert_eq!(notifier.spoken(), ["Finding wall".to_string()]);
        assert_eq!(notifier.beeps(), 1);
    }
}
