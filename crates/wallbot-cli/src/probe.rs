//! `wallbot probe`: polls the sensors and prints each reading.

use crate::config_file::FileConfig;
use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use wallbot_core::{Actuator, Arena, DriveConfig, Sensors};
use wallbot_proto::{BoundaryError, Color, MotionPrimitive};

#[derive(Parser, Debug)]
pub struct ProbeArgs {
    /// Number of readings to take
    #[arg(long, default_value_t = 10)]
    pub count: u32,

    /// Pause between readings
    #[arg(long, default_value_t = 1000)]
    pub interval_ms: u64,

    /// Drive one forward step between readings
    #[arg(long)]
    pub step: bool,

    /// Print one JSON object per reading
    #[arg(long)]
    pub json: bool,
}

/// One raw poll of every sensor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reading {
    pub distance_mm: f64,
    pub touch_left: bool,
    pub touch_right: bool,
    pub color: Color,
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "distance={:.0}mm touch_left={} touch_right={} color={:?}",
            self.distance_mm, self.touch_left, self.touch_right, self.color
        )
    }
}

pub fn read<S: Sensors>(sensors: &mut S) -> Result<Reading, BoundaryError> {
    Ok(Reading {
        distance_mm: sensors.distance_mm()?,
        touch_left: sensors.touch_left()?,
        touch_right: sensors.touch_right()?,
        color: sensors.color()?,
    })
}

pub async fn execute(config: FileConfig, args: ProbeArgs) -> Result<i32> {
    config.arena.validate()?;
    let arena = Arena::new(config.arena, config.nav.goal_color);
    let mut sensors = arena.sensors();
    let mut motors = arena.motors();
    let drive = config.nav.drive;

    for i in 0..args.count {
        if i > 0 {
            tokio::time::sleep(Duration::from_millis(args.interval_ms)).await;
            if args.step {
                step(&mut motors, &drive)?;
            }
        }

        let reading = read(&mut sensors).context("Sensor poll failed")?;
        if args.json {
            println!("{}", serde_json::to_string(&reading)?);
        } else {
            println!("[{}] {}", i + 1, reading);
        }
    }

    Ok(0)
}

fn step<A: Actuator>(motors: &mut A, drive: &DriveConfig) -> Result<(), BoundaryError> {
    let command = drive.resolve(MotionPrimitive::Forward);
    motors.drive(
        command.left_speed,
        command.right_speed,
        command.duration_ms,
        command.stop,
    )
}
