//! # wallbot-proto
//!
//! Shared types and error definitions for the wallbot navigation stack.
//!
//! This crate provides the vocabulary used across all wallbot crates,
//! including:
//! - Sensor snapshots and color classification
//! - Moves, motion primitives and resolved drive commands
//! - Search phases and run notifications
//! - The boundary error raised by hardware drivers

mod error;
mod motion;
mod notification;
mod phase;
mod sensor;

pub use error::BoundaryError;
pub use motion::{DriveCommand, MotionPrimitive, Move, StopBehavior};
pub use notification::Notification;
pub use phase::Phase;
pub use sensor::{Color, ColorClass, SensorSnapshot};
