use super::*;
use crate::testing::{ScriptedBoundary, ScriptedRandom};
use wallbot_proto::{ColorClass, Move};

use MotionPrimitive::{Backward, Forward, HalfTurnRight, TurnLeft, TurnRight};

/// Comfortably close to the left wall: one forward per follow tick.
fn along_wall() -> SensorSnapshot {
    SensorSnapshot::at_distance(80.0)
}

fn wall_ahead() -> SensorSnapshot {
    SensorSnapshot::at_distance(80.0).with_touch(true, true)
}

fn goal() -> SensorSnapshot {
    SensorSnapshot::at_distance(80.0).with_color(ColorClass::Goal)
}

fn controller(boundary: ScriptedBoundary) -> PhaseController<ScriptedBoundary> {
    controller_with(NavConfig::default(), boundary)
}

fn controller_with(
    config: NavConfig,
    boundary: ScriptedBoundary,
) -> PhaseController<ScriptedBoundary> {
    PhaseController::new(config, boundary, Box::new(ScriptedRandom::constant(0.5)))
        .expect("default config is valid")
}

#[test]
fn test_find_wall_drives_forward_until_contact() {
    let mut ctl = controller(ScriptedBoundary::new([
        SensorSnapshot::at_distance(900.0),
        SensorSnapshot::at_distance(700.0),
        wall_ahead(),
    ]));

    assert_eq!(ctl.tick().unwrap(), TickOutcome::Continue);
    assert_eq!(ctl.tick().unwrap(), TickOutcome::Continue);
    assert_eq!(ctl.phase(), Phase::FindWall);
    assert_eq!(ctl.boundary().primitives(), vec![Forward, Forward]);

    // Contact switches phase without moving.
    ctl.tick().unwrap();
    assert_eq!(ctl.phase(), Phase::FollowWall);
    assert_eq!(ctl.boundary().executed().len(), 2);
    assert_eq!(ctl.boundary().notifications(), &[Notification::EnterFollow]);
}

#[test]
fn test_follow_wall_runs_exactly_budget_ticks() {
    let mut boundary = ScriptedBoundary::new([wall_ahead()]);
    boundary.push(along_wall());
    let mut ctl = controller(boundary);

    ctl.tick().unwrap();
    assert_eq!(ctl.phase(), Phase::FollowWall);

    let mut follow_ticks = 0;
    while ctl.phase() == Phase::FollowWall {
        ctl.tick().unwrap();
        follow_ticks += 1;
    }

    assert_eq!(follow_ticks, 80);
    assert_eq!(ctl.phase(), Phase::Wander);
    assert_eq!(ctl.state().phase_ticks, 0);
}

#[test]
fn test_wander_runs_exactly_budget_ticks() {
    let mut boundary = ScriptedBoundary::new([wall_ahead()]);
    boundary.push(along_wall());
    let mut ctl = controller(boundary);

    while ctl.phase() != Phase::Wander {
        ctl.tick().unwrap();
    }

    let mut wander_ticks = 0;
    while ctl.phase() == Phase::Wander {
        ctl.tick().unwrap();
        wander_ticks += 1;
    }

    assert_eq!(wander_ticks, 15);
    assert_eq!(ctl.phase(), Phase::FindWall);
    assert_eq!(ctl.state().cycles, 2);
    assert_eq!(
        ctl.boundary().notifications(),
        &[
            Notification::EnterFollow,
            Notification::EnterWander,
            Notification::EnterFind
        ]
    );
}

#[test]
fn test_custom_budgets() {
    let mut config = NavConfig::default();
    config.phases.wall_follow_steps = 3;
    config.phases.wander_steps = 2;

    let mut boundary = ScriptedBoundary::new([wall_ahead()]);
    boundary.push(along_wall());
    let mut ctl = controller_with(config, boundary);

    ctl.tick().unwrap();
    for _ in 0..3 {
        assert_eq!(ctl.phase(), Phase::FollowWall);
        ctl.tick().unwrap();
    }
    assert_eq!(ctl.phase(), Phase::Wander);
    ctl.tick().unwrap();
    ctl.tick().unwrap();
    assert_eq!(ctl.phase(), Phase::FindWall);
}

#[test]
fn test_goal_in_find_wall_issues_no_motion() {
    let mut ctl = controller(ScriptedBoundary::new([goal()]));
    let result = ctl.run().unwrap();

    assert!(result.goal_reached);
    assert_eq!(result.reason, TerminationReason::GoalReached);
    assert_eq!(result.total_ticks, 1);
    assert_eq!(result.final_phase, Phase::GoalReached);
    assert!(ctl.boundary().executed().is_empty());
    assert_eq!(
        ctl.boundary().notifications(),
        &[
            Notification::RunStart,
            Notification::EnterFind,
            Notification::GoalReached
        ]
    );
}

#[test]
fn test_goal_during_follow_wall() {
    let mut ctl = controller(ScriptedBoundary::new([
        wall_ahead(),
        along_wall(),
        along_wall(),
        goal().with_touch(true, true),
    ]));
    let result = ctl.run().unwrap();

    assert!(result.goal_reached);
    assert_eq!(result.total_ticks, 4);
    // Two follow ticks of one forward each; the goal tick moves nothing.
    assert_eq!(ctl.boundary().primitives(), vec![Forward, Forward]);
    assert_eq!(
        ctl.boundary().notifications().last(),
        Some(&Notification::GoalReached)
    );
}

#[test]
fn test_goal_during_wander() {
    let mut config = NavConfig::default();
    config.phases.wall_follow_steps = 1;

    let mut ctl = controller_with(
        config,
        ScriptedBoundary::new([
            wall_ahead(),
            along_wall(),
            SensorSnapshot::at_distance(500.0),
            goal(),
        ]),
    );

    ctl.tick().unwrap();
    ctl.tick().unwrap();
    assert_eq!(ctl.phase(), Phase::Wander);
    ctl.tick().unwrap();
    let executed_before_goal = ctl.boundary().executed().len();

    assert_eq!(ctl.tick().unwrap(), TickOutcome::GoalReached);
    assert_eq!(ctl.boundary().executed().len(), executed_before_goal);
    assert_eq!(ctl.phase(), Phase::GoalReached);
}

#[test]
fn test_no_ticks_after_goal() {
    let mut ctl = controller(ScriptedBoundary::new([goal()]));
    assert_eq!(ctl.tick().unwrap(), TickOutcome::GoalReached);
    let reads = ctl.boundary().reads();

    assert_eq!(ctl.tick().unwrap(), TickOutcome::GoalReached);
    let result = ctl.run().unwrap();
    assert!(result.goal_reached);
    assert_eq!(ctl.boundary().reads(), reads);

    let goal_notices = ctl
        .boundary()
        .notifications()
        .iter()
        .filter(|n| **n == Notification::GoalReached)
        .count();
    assert_eq!(goal_notices, 1);
}

#[test]
fn test_full_wall_hit_records_right() {
    let mut ctl = controller(ScriptedBoundary::new([wall_ahead(), wall_ahead()]));
    ctl.tick().unwrap();
    ctl.tick().unwrap();

    assert_eq!(
        ctl.boundary().primitives(),
        vec![Backward, TurnRight, TurnRight, TurnRight, Forward]
    );
    assert_eq!(ctl.state().history.last_move(), Some(Move::Right));
}

#[test]
fn test_open_space_follow_records_nothing() {
    let mut ctl = controller(ScriptedBoundary::new([
        wall_ahead(),
        SensorSnapshot::at_distance(400.0),
    ]));
    ctl.tick().unwrap();
    ctl.tick().unwrap();

    assert_eq!(
        ctl.boundary().primitives(),
        vec![TurnLeft, TurnLeft, TurnLeft, Forward, Forward]
    );
    assert_eq!(ctl.state().history.last_move(), None);
}

#[test]
fn test_snapshot_history_is_bounded() {
    let mut ctl = controller(ScriptedBoundary::repeating(SensorSnapshot::at_distance(900.0)));
    for _ in 0..12 {
        ctl.tick().unwrap();
    }
    assert_eq!(ctl.state().history.snapshots().len(), 5);
    assert_eq!(ctl.state().total_ticks, 12);
}

#[test]
fn test_one_draw_per_evaluation() {
    let mut boundary = ScriptedBoundary::new([wall_ahead()]);
    boundary.push(SensorSnapshot::at_distance(20.0));
    let mut ctl = PhaseController::new(
        NavConfig::default(),
        boundary,
        Box::new(ScriptedRandom::new(vec![0.99, 0.5])),
    )
    .unwrap();

    // FIND_WALL takes no draw, so the first follow tick sees 0.99.
    for _ in 0..4 {
        ctl.tick().unwrap();
    }

    assert_eq!(
        ctl.boundary().primitives(),
        vec![
            HalfTurnRight,
            Backward,
            Forward,
            HalfTurnRight,
            Forward,
            HalfTurnRight,
            Backward,
            Forward,
        ]
    );
}

#[test]
fn test_tick_limit() {
    let mut config = NavConfig::default();
    config.phases.max_ticks = Some(10);

    let boundary = ScriptedBoundary::repeating(SensorSnapshot::at_distance(900.0));
    let mut ctl = controller_with(config, boundary);
    let result = ctl.run().unwrap();

    assert!(!result.goal_reached);
    assert_eq!(result.reason, TerminationReason::TickLimit);
    assert_eq!(result.total_ticks, 10);
    assert_eq!(result.final_phase, Phase::FindWall);
    assert_eq!(ctl.boundary().executed().len(), 10);
}

#[test]
fn test_external_stop_between_ticks() {
    let flag = Arc::new(AtomicBool::new(false));
    let boundary = ScriptedBoundary::repeating(SensorSnapshot::at_distance(900.0))
        .stop_after_reads(3, Arc::clone(&flag));
    let mut ctl = controller(boundary).with_stop_flag(flag);

    let result = ctl.run().unwrap();
    assert_eq!(result.reason, TerminationReason::Stopped);
    assert!(!result.goal_reached);
    // The third tick still completes its motion before the stop is honored.
    assert_eq!(result.total_ticks, 3);
    assert_eq!(ctl.boundary().executed().len(), 3);
}

#[test]
fn test_stop_before_start() {
    let mut ctl = controller(ScriptedBoundary::repeating(SensorSnapshot::at_distance(900.0)));
    ctl.stop_handle().store(true, Ordering::SeqCst);

    let result = ctl.run().unwrap();
    assert_eq!(result.reason, TerminationReason::Stopped);
    assert_eq!(result.total_ticks, 0);
    assert_eq!(ctl.boundary().reads(), 0);
}

#[test]
fn test_read_fault_propagates() {
    let boundary = ScriptedBoundary::repeating(SensorSnapshot::at_distance(900.0)).fail_on_read(3);
    let mut ctl = controller(boundary);

    let err = ctl.run().unwrap_err();
    assert!(matches!(
        err,
        NavError::Boundary(BoundaryError::Disconnected(_))
    ));
    assert_eq!(ctl.state().total_ticks, 2);
}

#[test]
fn test_execute_fault_propagates_without_recording_move() {
    let boundary = ScriptedBoundary::new([wall_ahead(), wall_ahead()]).fail_on_execute(2);
    let mut ctl = controller(boundary);

    ctl.tick().unwrap();
    let err = ctl.tick().unwrap_err();
    assert!(matches!(err, NavError::Boundary(BoundaryError::Actuator { .. })));
    assert_eq!(ctl.state().history.last_move(), None);
}

#[test]
fn test_invalid_config_rejected_at_construction() {
    let mut config = NavConfig::default();
    config.behavior.stochastic_recovery_p = -0.1;

    let result = PhaseController::new(
        config,
        ScriptedBoundary::default(),
        Box::new(ScriptedRandom::constant(0.5)),
    );
    assert!(matches!(result, Err(ConfigError::Invalid { .. })));
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let script = || {
        let mut boundary = ScriptedBoundary::new([wall_ahead()]);
        for distance in [20.0, 400.0, 250.0, 90.0, 500.0, 140.0] {
            boundary.push(SensorSnapshot::at_distance(distance));
        }
        boundary
    };

    let mut config = NavConfig::default();
    config.random_seed = Some(7);
    config.phases.max_ticks = Some(120);

    let mut a = PhaseController::from_config(config.clone(), script()).unwrap();
    let mut b = PhaseController::from_config(config, script()).unwrap();
    let ra = a.run().unwrap();
    let rb = b.run().unwrap();

    assert_eq!(ra.total_ticks, rb.total_ticks);
    assert_eq!(ra.final_phase, rb.final_phase);
    assert_eq!(a.boundary().executed(), b.boundary().executed());
}

#[test]
fn test_termination_reason_codes() {
    assert_eq!(TerminationReason::GoalReached.exit_code(), 0);
    assert_eq!(TerminationReason::TickLimit.exit_code(), 2);
    assert_eq!(TerminationReason::Stopped.exit_code(), 130);
    assert!(TerminationReason::GoalReached.is_success());
    assert!(!TerminationReason::Stopped.is_success());
    assert_eq!(TerminationReason::TickLimit.as_str(), "tick_limit");
}
