//! Game lifecycle states and their allowed transitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Lifecycle of a game instance.
///
/// Progression is monotonic (`Created` -> `WaitingForPlayers` -> `Active` ->
/// `Completed`) except for `Abandoned`, which is terminal from any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameLifecycle {
    Created,
    WaitingForPlayers,
    Active,
    Completed,
    Abandoned,
}

impl GameLifecycle {
    /// Whether moves may be applied in this state.
    pub fn accepts_moves(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Whether new seats may join in this state.
    pub fn accepts_joins(&self) -> bool {
        matches!(self, Self::Created | Self::WaitingForPlayers)
    }

    /// Terminal states accept no further mutation.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Abandoned)
    }
}

impl fmt::Display for GameLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Created => "created",
            Self::WaitingForPlayers => "waiting_for_players",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Abandoned => "abandoned",
        };
        write!(f, "{s}")
    }
}

impl FromStr for GameLifecycle {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(Self::Created),
            "waiting_for_players" => Ok(Self::WaitingForPlayers),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "abandoned" => Ok(Self::Abandoned),
            _ => Err(DomainError::parse(format!("Unknown lifecycle: {s}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_active_accepts_moves() {
        assert!(GameLifecycle::Active.accepts_moves());
        assert!(!GameLifecycle::Created.accepts_moves());
        assert!(!GameLifecycle::WaitingForPlayers.accepts_moves());
        assert!(!GameLifecycle::Completed.accepts_moves());
        assert!(!GameLifecycle::Abandoned.accepts_moves());
    }

    #[test]
    fn test_join_window() {
        assert!(GameLifecycle::Created.accepts_joins());
        assert!(GameLifecycle::WaitingForPlayers.accepts_joins());
        assert!(!GameLifecycle::Active.accepts_joins());
    }

    #[test]
    fn test_terminal_states() {
        assert!(GameLifecycle::Completed.is_terminal());
        assert!(GameLifecycle::Abandoned.is_terminal());
        assert!(!GameLifecycle::Active.is_terminal());
    }

    #[test]
    fn test_display_from_str_round_trip() {
        for state in [
            GameLifecycle::Created,
            GameLifecycle::WaitingForPlayers,
            GameLifecycle::Active,
            GameLifecycle::Completed,
            GameLifecycle::Abandoned,
        ] {
            let parsed: GameLifecycle = state.to_string().parse().expect("round trip");
            assert_eq!(parsed, state);
        }
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert!("paused".parse::<GameLifecycle>().is_err());
    }
}
