//! Motion/sensor boundary.
//!
//! The controller only talks to [`RobotBoundary`]. Hardware drivers implement
//! the narrower [`Sensors`], [`Actuator`] and [`Notifier`] traits and are
//! composed into a boundary by [`HardwareBoundary`].

use crate::config::DriveConfig;
use std::time::Duration;
use tracing::{debug, warn};
use wallbot_proto::{
    BoundaryError, Color, ColorClass, DriveCommand, Notification, SensorSnapshot, StopBehavior,
};

/// Everything the navigation core needs from the robot.
pub trait RobotBoundary {
    /// Captures one reading of every sensor. Blocks until available.
    fn read_snapshot(&mut self) -> Result<SensorSnapshot, BoundaryError>;

    /// Executes one drive command, blocking for its nominal duration.
    fn execute(&mut self, command: &DriveCommand) -> Result<(), BoundaryError>;

    /// Announces an event. Best effort: never fails the run.
    fn notify(&mut self, notification: Notification);
}

/// Raw sensor access.
pub trait Sensors {
    fn distance_mm(&mut self) -> Result<f64, BoundaryError>;
    fn touch_left(&mut self) -> Result<bool, BoundaryError>;
    fn touch_right(&mut self) -> Result<bool, BoundaryError>;
    fn color(&mut self) -> Result<Color, BoundaryError>;
}

/// Paired wheel drive.
pub trait Actuator {
    /// Runs both wheels for `duration_ms`, blocking until done.
    fn drive(
        &mut self,
        left_speed: i32,
        right_speed: i32,
        duration_ms: u64,
        stop: StopBehavior,
    ) -> Result<(), BoundaryError>;
}

/// Speech and sound output.
pub trait Notifier {
    fn speak(&mut self, text: &str) -> Result<(), BoundaryError>;
    fn beep(&mut self) -> Result<(), BoundaryError>;
}

/// A notifier that does nothing, for robots without a speaker.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn speak(&mut self, _text: &str) -> Result<(), BoundaryError> {
        Ok(())
    }

    fn beep(&mut self) -> Result<(), BoundaryError> {
        Ok(())
    }
}

/// Composes driver-level sensors, actuator and notifier into a boundary.
///
/// Pauses `tick_delay_ms` before each snapshot and `settle_delay_ms` after
/// each drive command.
#[derive(Debug)]
pub struct HardwareBoundary<S, A, N> {
    sensors: S,
    actuator: A,
    notifier: N,
    goal_color: Color,
    tick_delay: Duration,
    settle_delay: Duration,
}

impl<S, A, N> HardwareBoundary<S, A, N>
where
    S: Sensors,
    A: Actuator,
    N: Notifier,
{
    pub fn new(
        sensors: S,
        actuator: A,
        notifier: N,
        drive: &DriveConfig,
        goal_color: Color,
    ) -> Self {
        Self {
            sensors,
            actuator,
            notifier,
            goal_color,
            tick_delay: Duration::from_millis(drive.tick_delay_ms),
            settle_delay: Duration::from_millis(drive.settle_delay_ms),
        }
    }

    pub fn sensors(&self) -> &S {
        &self.sensors
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Splits the boundary back into its drivers.
    pub fn into_parts(self) -> (S, A, N) {
        (self.sensors, self.actuator, self.notifier)
    }

    fn announce(&mut self, notification: Notification) -> Result<(), BoundaryError> {
        match notification {
            Notification::RunStart => self.notifier.beep(),
            Notification::GoalReached => {
                let spoken = notification
                    .speech()
                    .map_or(Ok(()), |text| self.notifier.speak(text));
                let beeped = self.notifier.beep();
                spoken.and(beeped)
            }
            _ => match notification.speech() {
                Some(text) => self.notifier.speak(text),
                None => Ok(()),
            },
        }
    }
}

impl<S, A, N> RobotBoundary for HardwareBoundary<S, A, N>
where
    S: Sensors,
    A: Actuator,
    N: Notifier,
{
    fn read_snapshot(&mut self) -> Result<SensorSnapshot, BoundaryError> {
        if !self.tick_delay.is_zero() {
            std::thread::sleep(self.tick_delay);
        }

        let snapshot = SensorSnapshot {
            distance_mm: self.sensors.distance_mm()?,
            touch_left: self.sensors.touch_left()?,
            touch_right: self.sensors.touch_right()?,
            color: ColorClass::classify(self.sensors.color()?, self.goal_color),
        };
        Ok(snapshot)
    }

    fn execute(&mut self, command: &DriveCommand) -> Result<(), BoundaryError> {
        self.actuator.drive(
            command.left_speed,
            command.right_speed,
            command.duration_ms,
            command.stop,
        )?;

        if !self.settle_delay.is_zero() {
            std::thread::sleep(self.settle_delay);
        }
        Ok(())
    }

    fn notify(&mut self, notification: Notification) {
        debug!(?notification, "Announcing");
        if let Err(e) = self.announce(notification) {
            warn!("Notification {:?} failed: {}", notification, e);
        }
    }
}
