//! Outbound ports - interfaces the orchestration core requires from
//! collaborators.
//!
//! Concrete adapters live in `infrastructure/`; tests mock these traits.

use async_trait::async_trait;
use thiserror::Error;

use gamehall_domain::{GameId, GameLifecycle, GameState, Move, PlayerId};

/// Errors raised by repository adapters.
#[derive(Debug, Error, Clone)]
pub enum RepoError {
    #[error("Game not found: {0}")]
    NotFound(GameId),

    /// The stored version does not match what this write expects. With the
    /// per-game lock held this signals a programming error, not a race; it
    /// must fail loudly rather than overwrite.
    #[error("Version conflict for game {game_id}: expected {expected}, got {actual}")]
    VersionConflict {
        game_id: GameId,
        expected: u64,
        actual: u64,
    },

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Errors raised by AI player adapters.
#[derive(Debug, Error, Clone)]
pub enum AiPlayerError {
    #[error("No move available for seat {0}")]
    NoMoveAvailable(PlayerId),

    #[error("Unknown game type: {0}")]
    UnknownGameType(String),
}

/// Filter and pagination options for game listings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameFilters {
    pub game_type: Option<String>,
    pub lifecycle: Option<GameLifecycle>,
    pub player_id: Option<PlayerId>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// One page of a game listing. `total` counts all matches before
/// pagination.
#[derive(Debug, Clone, PartialEq)]
pub struct GamePage {
    pub games: Vec<GameState>,
    pub total: usize,
}

/// Durable store for game-state snapshots, keyed by game id.
///
/// `save` enforces the optimistic version check as defense in depth
/// alongside the lock manager: a new game persists as-is, an update must
/// carry exactly `stored version + 1`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameRepository: Send + Sync {
    async fn load(&self, id: GameId) -> Result<Option<GameState>, RepoError>;
    async fn save(&self, state: &GameState) -> Result<(), RepoError>;
    async fn delete(&self, id: GameId) -> Result<(), RepoError>;
    async fn list(&self, filters: GameFilters) -> Result<GamePage, RepoError>;
}

/// Decides whether a seat is AI-controlled and, if so, computes its move.
///
/// Implementations should guarantee termination of AI chains; the turn
/// service additionally caps chain length defensively.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AiPlayer: Send + Sync {
    async fn is_ai_controlled(&self, state: &GameState, seat: PlayerId) -> bool;
    async fn compute_move(&self, state: &GameState, seat: PlayerId)
        -> Result<Move, AiPlayerError>;
}
