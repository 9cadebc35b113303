//! Test doubles for driving the controller without hardware.
//!
//! [`ScriptedRandom`] replays a fixed draw sequence and [`ScriptedBoundary`]
//! replays a fixed snapshot sequence while recording everything the
//! controller asked of it.

use crate::boundary::RobotBoundary;
use crate::random::RandomSource;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use wallbot_proto::{BoundaryError, DriveCommand, MotionPrimitive, Notification, SensorSnapshot};

/// Cycles through a fixed list of draws. An empty list always yields 0.5.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    draws: Vec<f64>,
    index: usize,
}

impl ScriptedRandom {
    pub fn new(draws: impl Into<Vec<f64>>) -> Self {
        Self {
            draws: draws.into(),
            index: 0,
        }
    }

    /// A source that always returns `draw`.
    pub fn constant(draw: f64) -> Self {
        Self::new(vec![draw])
    }

    /// Number of draws consumed so far.
    pub fn consumed(&self) -> usize {
        self.index
    }
}

impl RandomSource for ScriptedRandom {
    fn next(&mut self) -> f64 {
        let draw = if self.draws.is_empty() {
            0.5
        } else {
            self.draws[self.index % self.draws.len()]
        };
        self.index += 1;
        draw
    }
}

/// Replays snapshots in order, repeating the last one once the script runs out.
#[derive(Debug, Default)]
pub struct ScriptedBoundary {
    script: VecDeque<SensorSnapshot>,
    last: SensorSnapshot,
    executed: Vec<DriveCommand>,
    notifications: Vec<Notification>,
    reads: u64,
    fail_read_at: Option<u64>,
    fail_execute_at: Option<usize>,
    stop_after: Option<(u64, Arc<AtomicBool>)>,
}

impl ScriptedBoundary {
    pub fn new(snapshots: impl IntoIterator<Item = SensorSnapshot>) -> Self {
        Self {
            script: snapshots.into_iter().collect(),
            ..Self::default()
        }
    }

    /// A boundary that reports the same snapshot forever.
    pub fn repeating(snapshot: SensorSnapshot) -> Self {
        Self {
            last: snapshot,
            ..Self::default()
        }
    }

    /// Appends snapshots to the script.
    pub fn push(&mut self, snapshot: SensorSnapshot) {
        self.script.push_back(snapshot);
    }

    /// Fails the `n`th snapshot read (1-based).
    #[must_use]
    pub fn fail_on_read(mut self, n: u64) -> Self {
        self.fail_read_at = Some(n);
        self
    }

    /// Fails the `n`th drive command (1-based).
    #[must_use]
    pub fn fail_on_execute(mut self, n: usize) -> Self {
        self.fail_execute_at = Some(n);
        self
    }

    /// Raises `flag` once `reads` snapshots have been served.
    #[must_use]
    pub fn stop_after_reads(mut self, reads: u64, flag: Arc<AtomicBool>) -> Self {
        self.stop_after = Some((reads, flag));
        self
    }

    pub fn reads(&self) -> u64 {
        self.reads
    }

    pub fn executed(&self) -> &[DriveCommand] {
        &self.executed
    }

    /// The primitives of every executed command, in order.
    pub fn primitives(&self) -> Vec<MotionPrimitive> {
        self.executed.iter().map(|c| c.primitive).collect()
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }
}

impl RobotBoundary for ScriptedBoundary {
    fn read_snapshot(&mut self) -> Result<SensorSnapshot, BoundaryError> {
        self.reads += 1;
        if self.fail_read_at == Some(self.reads) {
            return Err(BoundaryError::Disconnected("scripted read fault".into()));
        }

        if let Some(next) = self.script.pop_front() {
            self.last = next;
        }

        if let Some((after, flag)) = &self.stop_after
            && self.reads >= *after
        {
            flag.store(true, Ordering::SeqCst);
        }

        Ok(self.last)
    }

    fn execute(&mut self, command: &DriveCommand) -> Result<(), BoundaryError> {
        if self.fail_execute_at == Some(self.executed.len() + 1) {
            return Err(BoundaryError::actuator("scripted stall"));
        }
        self.executed.push(*command);
        Ok(())
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }
}
