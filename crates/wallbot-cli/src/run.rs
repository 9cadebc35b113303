//! `wallbot run`: a full search in the simulated arena.

use crate::config_file::FileConfig;
use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};
use wallbot_core::{
    Arena, ArenaStats, HardwareBoundary, PhaseController, RecordingNotifier, RunResult,
};

/// Tick cap applied to simulated runs unless the config or `--max-ticks` sets one.
const DEFAULT_SIM_MAX_TICKS: u64 = 5000;

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Random seed (overrides `random_seed` from the config)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Stop after this many ticks
    #[arg(long)]
    pub max_ticks: Option<u64>,

    /// Keep the configured tick and settle delays
    #[arg(long)]
    pub realtime: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct RunReport {
    #[serde(flatten)]
    result: RunResult,
    arena: ArenaStats,
    announcements: Vec<String>,
}

pub async fn execute(config: FileConfig, args: RunArgs) -> Result<i32> {
    let report = run(config, &args, None).await?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize result")?
        );
    } else {
        print_summary(&report);
    }

    Ok(report.result.reason.exit_code())
}

async fn run(
    config: FileConfig,
    args: &RunArgs,
    stop: Option<Arc<AtomicBool>>,
) -> Result<RunReport> {
    let FileConfig { mut nav, arena } = config;
    arena.validate()?;

    if let Some(seed) = args.seed {
        nav.random_seed = Some(seed);
    }
    nav.phases.max_ticks = args
        .max_ticks
        .or(nav.phases.max_ticks)
        .or(Some(DEFAULT_SIM_MAX_TICKS));
    if !args.realtime {
        nav.drive = nav.drive.without_delays();
    }

    info!(
        seed = ?nav.random_seed,
        max_ticks = ?nav.phases.max_ticks,
        realtime = args.realtime,
        "Starting simulated run"
    );

    let sim = Arena::new(arena, nav.goal_color);
    let boundary = HardwareBoundary::new(
        sim.sensors(),
        sim.motors(),
        RecordingNotifier::default(),
        &nav.drive,
        nav.goal_color,
    );
    let mut controller =
        PhaseController::from_config(nav, boundary).context("Invalid navigation config")?;
    if let Some(flag) = stop {
        controller = controller.with_stop_flag(flag);
    }

    let stop = controller.stop_handle();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current tick");
            stop.store(true, Ordering::SeqCst);
        }
    });

    let (result, controller) = tokio::task::spawn_blocking(move || {
        let result = controller.run();
        (result, controller)
    })
    .await
    .context("Controller task failed")?;
    watcher.abort();

    let result = result.context("Run aborted")?;
    let (_, _, notifier) = controller.into_boundary().into_parts();

    Ok(RunReport {
        result,
        arena: sim.stats(),
        announcements: notifier.spoken().to_vec(),
    })
}

fn print_summary(report: &RunReport) {
    let result = &report.result;
    let pose = report.arena.pose;

    println!("\n=== Run Result ===");
    println!("Outcome: {}", result.reason.as_str());
    println!("Goal reached: {}", result.goal_reached);
    println!("Ticks: {}", result.total_ticks);
    println!("Search cycles: {}", result.cycles);
    println!("Final phase: {}", result.final_phase);
    println!(
        "Final pose: ({:.0}, {:.0}) mm, heading {:.0}°",
        pose.x_mm, pose.y_mm, pose.heading_deg
    );
    println!("Distance travelled: {:.0} mm", report.arena.travelled_mm);
    println!("Wall contacts: {}", report.arena.wall_contacts);
    println!("Simulated time: {:.1} s", report.arena.sim_time_ms as f64 / 1000.0);
}
