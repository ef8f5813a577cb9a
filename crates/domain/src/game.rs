//! GameState aggregate - the root entity for one game instance.
//!
//! # Invariants
//!
//! - `version` increments by exactly 1 per accepted mutation, starting at 1.
//! - `current_player_index` always indexes a valid seat while `players` is
//!   non-empty.
//! - `move_history` is append-only; accepted moves are never reordered.
//! - Once `lifecycle` is terminal, no further moves are recorded.
//!
//! The struct is the storage and wire contract: field names (camelCase in
//! serialized form) and the version rule are relied on by external
//! collaborators such as renderers and statistics aggregators.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::DomainError;
use crate::ids::{GameId, PlayerId};
use crate::lifecycle::GameLifecycle;
use crate::moves::Move;
use crate::seat::Seat;

/// A complete game instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub game_id: GameId,
    pub game_type: String,
    pub lifecycle: GameLifecycle,
    pub players: Vec<Seat>,
    pub current_player_index: usize,
    /// Engine-defined sub-state ("setup", "playing", ...); opaque to the core.
    pub phase: String,
    pub board: Board,
    pub move_history: Vec<Move>,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
    pub winner: Option<PlayerId>,
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GameState {
    /// Create a fresh game at version 1 with an engine-initialized board.
    pub fn new(game_type: impl Into<String>, players: Vec<Seat>, board: Board, phase: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            game_id: GameId::new(),
            game_type: game_type.into(),
            lifecycle: GameLifecycle::Created,
            players,
            current_player_index: 0,
            phase: phase.into(),
            board,
            move_history: Vec::new(),
            metadata: HashMap::new(),
            winner: None,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    /// The seat whose turn it is, if any seats exist.
    pub fn current_seat(&self) -> Option<&Seat> {
        self.players.get(self.current_player_index)
    }

    /// Find a seat by player id.
    pub fn seat(&self, player_id: PlayerId) -> Option<&Seat> {
        self.players.iter().find(|s| s.player_id == player_id)
    }

    pub fn has_seat(&self, player_id: PlayerId) -> bool {
        self.seat(player_id).is_some()
    }

    /// Append a seat. Only legal while the lifecycle accepts joins.
    pub fn add_seat(&mut self, seat: Seat) -> Result<(), DomainError> {
        if !self.lifecycle.accepts_joins() {
            return Err(DomainError::invalid_state_transition(format!(
                "Game in lifecycle '{}' does not accept joins",
                self.lifecycle
            )));
        }
        if self.has_seat(seat.player_id) {
            return Err(DomainError::constraint(format!(
                "Player {} is already seated",
                seat.player_id
            )));
        }
        self.players.push(seat);
        self.touch();
        Ok(())
    }

    /// Record an accepted move: append to history and bump the version.
    ///
    /// The caller (the turn-execution service) is responsible for having
    /// validated the move and applied its board effect first.
    pub fn record_move(&mut self, mv: Move) {
        self.move_history.push(mv);
        self.bump_version();
    }

    /// Increment the optimistic-concurrency token and refresh `updated_at`.
    pub fn bump_version(&mut self) {
        self.version += 1;
        self.touch();
    }

    /// Mark the game completed with an optional winner (None = draw).
    pub fn complete(&mut self, winner: Option<PlayerId>) {
        self.lifecycle = GameLifecycle::Completed;
        self.winner = winner;
        self.touch();
    }

    /// Abandon the game; terminal from any state.
    pub fn abandon(&mut self) {
        self.lifecycle = GameLifecycle::Abandoned;
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
