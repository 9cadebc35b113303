//! Fire-and-forget run notifications (speech, beeps).

use crate::Phase;
use serde::{Deserialize, Serialize};

/// An event announced through the notification channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notification {
    RunStart,
    EnterFind,
    EnterFollow,
    EnterWander,
    GoalReached,
}

impl Notification {
    /// Returns the notification announced when entering `phase`.
    pub fn for_phase(phase: Phase) -> Self {
        match phase {
            Phase::FindWall => Notification::EnterFind,
            Phase::FollowWall => Notification::EnterFollow,
            Phase::Wander => Notification::EnterWander,
            Phase::GoalReached => Notification::GoalReached,
        }
    }

    /// Returns the phrase spoken for this notification, if any.
    pub fn speech(&self) -> Option<&'static str> {
        match self {
            Notification::RunStart => None,
            Notification::EnterFind => Some("Finding wall"),
            Notification::EnterFollow => Some("Following wall"),
            Notification::EnterWander => Some("Wandering"),
            Notification::GoalReached => Some("Goal found"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_mapping() {
        assert_eq!(Notification::for_phase(Phase::Wander), Notification::EnterWander);
        assert_eq!(
            Notification::for_phase(Phase::GoalReached),
            Notification::GoalReached
        );
    }

    #[test]
    fn test_run_start_is_silent() {
        assert!(Notification::RunStart.speech().is_none());
        assert_eq!(Notification::EnterFollow.speech(), Some("Following wall"));
    }
}
