//! Search phases.

use serde::{Deserialize, Serialize};

/// One of the search strategies composing the run state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Drive straight until a bumper fires.
    #[default]
    FindWall,
    /// Follow the wall with the reactive rule set.
    FollowWall,
    /// Wander randomly to escape local loops.
    Wander,
    /// Terminal: the goal was detected.
    GoalReached,
}

impl Phase {
    /// Returns the phase name for logs and payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::FindWall => "find_wall",
            Phase::FollowWall => "follow_wall",
            Phase::Wander => "wander",
            Phase::GoalReached => "goal_reached",
        }
    }

    /// Returns true if no further ticks may be issued.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::GoalReached)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
