//! Service-level error taxonomy.
//!
//! Every variant maps to one of the error kinds a transport needs to
//! distinguish: not-found, concurrency conflict, validation/invalid-move,
//! inactive-game, and fatal. None of them are retried by the core.

use thiserror::Error;

use gamehall_domain::{DomainError, GameId, GameLifecycle};

use super::ports::outbound::{AiPlayerError, RepoError};
use crate::plugins::RegistryError;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("Game not found: {0}")]
    GameNotFound(GameId),

    #[error("Unknown game type: {0}")]
    UnknownGameType(String),

    /// The caller's expected version is stale. Recoverable: re-fetch and
    /// retry with the current version.
    #[error("Version conflict for game {game_id}: expected {expected}, current {actual}")]
    ConcurrencyConflict {
        game_id: GameId,
        expected: u64,
        actual: u64,
    },

    #[error("Game {game_id} is not active (lifecycle: {lifecycle})")]
    GameNotActive {
        game_id: GameId,
        lifecycle: GameLifecycle,
    },

    #[error("Invalid move: {reason}")]
    InvalidMove { reason: String },

    #[error("Game {game_id} is full ({capacity} seats)")]
    GameFull { game_id: GameId, capacity: usize },

    /// The AI chain exceeded the defensive ply cap. Fatal: signals a
    /// misbehaving AI service or rule engine, not a caller mistake.
    #[error("AI chain exceeded {max} consecutive plies in game {game_id}")]
    AiChainOverflow { game_id: GameId, max: usize },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Repository(#[from] RepoError),

    #[error(transparent)]
    AiPlayer(#[from] AiPlayerError),
}

impl From<RegistryError> for GameError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::UnknownGameType(game_type) => Self::UnknownGameType(game_type),
            RegistryError::DuplicateGameType(game_type) => Self::Validation(format!(
                "Game type already registered: {game_type}"
            )),
        }
    }
}

impl GameError {
    /// Whether the caller can recover by re-fetching state and retrying.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::ConcurrencyConflict { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_is_recoverable() {
        let err = GameError::ConcurrencyConflict {
            game_id: GameId::new(),
            expected: 3,
            actual: 4,
        };
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("expected 3"));
    }

    #[test]
    fn test_invalid_move_is_terminal() {
        let err = GameError::InvalidMove {
            reason: "not your turn".to_string(),
        };
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_registry_error_maps_to_unknown_type() {
        let err: GameError = RegistryError::UnknownGameType("chess".to_string()).into();
        assert!(matches!(err, GameError::UnknownGameType(t) if t == "chess"));
    }
}
