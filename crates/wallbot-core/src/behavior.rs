//! Priority-ordered reactive rules.
//!
//! The evaluator maps one sensor snapshot, a read-only view of history and a
//! single random draw to the motion primitives for the current tick. Rules
//! are checked in a fixed order and the first match wins. The evaluator
//! never mutates history; it reports which move (if any) should be recorded.

use crate::config::BehaviorConfig;
use crate::history::HistoryTracker;
use wallbot_proto::{MotionPrimitive, Move, SensorSnapshot};

use MotionPrimitive::{Backward, Forward, HalfTurnLeft, HalfTurnRight, TurnLeft, TurnRight};

/// The rule that produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    GoalFound,
    FullWallHit,
    RightEdgeHit,
    LeftEdgeHit,
    WallOnLeft,
    PrevMoveRight,
    ElseCondition,
    WanderBump,
    WanderTurn,
}

impl Rule {
    /// Human-readable label used in tick logs.
    pub fn label(&self) -> &'static str {
        match self {
            Rule::GoalFound => "Goal found",
            Rule::FullWallHit => "Full wall hit",
            Rule::RightEdgeHit => "Right edge hit",
            Rule::LeftEdgeHit => "Left edge hit",
            Rule::WallOnLeft => "Wall on the left",
            Rule::PrevMoveRight => "Prev move right",
            Rule::ElseCondition => "Else condition",
            Rule::WanderBump => "Wander bump",
            Rule::WanderTurn => "Wander turn",
        }
    }
}

/// What the robot should do this tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The goal is under the robot; stop issuing motion.
    Terminate,
    /// Execute these primitives in order.
    Drive(Vec<MotionPrimitive>),
}

/// Outcome of one rule evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub rule: Rule,
    pub action: Action,
    /// Move to append to history, if the rule records one.
    pub recorded_move: Option<Move>,
}

impl Decision {
    fn terminate() -> Self {
        Self {
            rule: Rule::GoalFound,
            action: Action::Terminate,
            recorded_move: None,
        }
    }

    fn drive(rule: Rule, primitives: Vec<MotionPrimitive>, recorded_move: Option<Move>) -> Self {
        Self {
            rule,
            action: Action::Drive(primitives),
            recorded_move,
        }
    }

    /// Returns true if the decision ends the run.
    pub fn is_terminal(&self) -> bool {
        matches!(self.action, Action::Terminate)
    }

    /// Returns the primitives to execute (empty for a terminal decision).
    pub fn primitives(&self) -> &[MotionPrimitive] {
        match &self.action {
            Action::Terminate => &[],
            Action::Drive(primitives) => primitives,
        }
    }
}

/// Pure rule evaluator for the wall-following and wander phases.
#[derive(Debug, Clone)]
pub struct BehaviorEvaluator {
    config: BehaviorConfig,
}

impl BehaviorEvaluator {
    pub fn new(config: &BehaviorConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Evaluates the wall-following rule set.
    ///
    /// `draw` must lie in `[0, 1)`. It gates the occasional recovery step
    /// along a wall and the left-turn bias when nothing else applies.
    pub fn evaluate(
        &self,
        snapshot: &SensorSnapshot,
        history: &HistoryTracker,
        draw: f64,
    ) -> Decision {
        let cfg = &self.config;

        if snapshot.is_goal() {
            return Decision::terminate();
        }

        if snapshot.full_wall_hit() {
            return Decision::drive(Rule::FullWallHit, bump_recovery(3), Some(Move::Right));
        }

        if snapshot.touch_right {
            return Decision::drive(Rule::RightEdgeHit, bump_recovery(3), Some(Move::Right));
        }

        if snapshot.touch_left {
            return Decision::drive(Rule::LeftEdgeHit, bump_recovery(1), Some(Move::Right));
        }

        let distance = snapshot.distance_mm;

        if distance < cfg.wall_left_threshold_mm {
            let mut primitives = Vec::new();
            if distance < cfg.too_close_mm {
                primitives.push(HalfTurnRight);
            } else if distance > cfg.too_far_mm {
                let corrections = (distance / cfg.correction_step_mm).floor() as usize;
                for _ in 0..corrections {
                    primitives.push(HalfTurnLeft);
                    primitives.push(Forward);
                }
            }
            if draw > 1.0 - cfg.stochastic_recovery_p {
                primitives.push(Backward);
            }
            primitives.push(Forward);
            return Decision::drive(Rule::WallOnLeft, primitives, Some(Move::Forward));
        }

        if distance < cfg.near_goal_mm && history.last_move() == Some(Move::Right) {
            return Decision::drive(
                Rule::PrevMoveRight,
                vec![TurnRight, Forward, Forward],
                Some(Move::Right),
            );
        }

        let primitives = if draw < cfg.wander_left_p {
            vec![TurnLeft, TurnLeft, TurnLeft, Forward, Forward]
        } else {
            vec![Forward, Forward]
        };
        Decision::drive(Rule::ElseCondition, primitives, None)
    }

    /// Evaluates the simplified wander rule set. Never records a move.
    pub fn evaluate_wander(&self, snapshot: &SensorSnapshot, draw: f64) -> Decision {
        if snapshot.is_goal() {
            return Decision::terminate();
        }

        let turn = if draw < self.config.wander_turn_right_p {
            TurnRight
        } else {
            TurnLeft
        };
        let (rule, mut primitives) = if snapshot.any_touch() {
            let mut primitives = vec![Backward, Backward];
            primitives.extend(std::iter::repeat_n(turn, 5));
            (Rule::WanderBump, primitives)
        } else {
            (Rule::WanderTurn, vec![turn; 3])
        };
        primitives.extend([Forward, Forward, Forward]);
        Decision::drive(rule, primitives, None)
    }
}

/// Back off, turn right `turns` times, then move on.
fn bump_recovery(turns: usize) -> Vec<MotionPrimitive> {
    let mut primitives = Vec::with_capacity(turns + 2);
    primitives.push(Backward);
    primitives.extend(std::iter::repeat_n(TurnRight, turns));
    primitives.push(Forward);
    primitives
}
