//! Boundary-level fault types.

/// A fault raised by the motion/sensor boundary.
///
/// The navigation core never retries or swallows these; they propagate to
/// whoever owns the run.
#[derive(Debug, thiserror::Error)]
pub enum BoundaryError {
    /// A sensor could not be read.
    #[error("sensor '{sensor}' read failed: {message}")]
    Sensor { sensor: String, message: String },

    /// A drive command could not be executed.
    #[error("actuator failed: {message}")]
    Actuator { message: String },

    /// The device is no longer reachable.
    #[error("device disconnected: {0}")]
    Disconnected(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BoundaryError {
    /// Creates a sensor read fault.
    pub fn sensor(sensor: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Sensor {
            sensor: sensor.into(),
            message: message.into(),
        }
    }

    /// Creates an actuator fault.
    pub fn actuator(message: impl Into<String>) -> Self {
        Self::Actuator {
            message: message.into(),
        }
    }
}
