//! Rule-engine plugin contract.
//!
//! One implementation per game type. Every method is synchronous and pure:
//! engines never perform I/O, never suspend, and never mutate their input
//! state. Malformed moves are reported through [`RuleEngine::validate_move`],
//! not through errors; an error from [`RuleEngine::apply_move`] is a
//! programming fault and aborts the in-flight move without persisting
//! anything.

pub mod connect_four;
pub mod registry;
pub mod tictactoe;

pub use connect_four::ConnectFourEngine;
pub use registry::{GameTypeRegistry, RegistryError};
pub use tictactoe::TicTacToeEngine;

use gamehall_domain::{DomainError, GameState, Move, PlayerId, Seat};
use serde::{Deserialize, Serialize};

/// Outcome of a move validation check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveValidation {
    Valid,
    Invalid { reason: String },
}

impl MoveValidation {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Descriptor for a registered game type, used by lifecycle listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameTypeDescriptor {
    pub game_type: String,
    pub display_name: String,
    pub min_players: usize,
    pub max_players: usize,
}

/// Pass-through render data for an external board renderer.
///
/// `cells[y][x]` holds the display token for that position, or an empty
/// string for a vacant space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardRender {
    pub width: i32,
    pub height: i32,
    pub cells: Vec<Vec<String>>,
}

/// Capability set every game-type plugin must implement.
///
/// The orchestration core treats implementations uniformly: it owns turn
/// bookkeeping (`move_history`, `version`, lifecycle), while the engine owns
/// board semantics. `apply_move` applies only the board effect of a move;
/// `advance_turn` rotates `current_player_index` (including any
/// engine-specific skip logic).
pub trait RuleEngine: Send + Sync {
    /// Unique identifier for this game type (e.g. "tictactoe").
    fn game_type(&self) -> &str;

    /// Human-readable display name (e.g. "Tic-Tac-Toe").
    fn display_name(&self) -> &str;

    /// Minimum seats required before the game can start.
    fn min_players(&self) -> usize;

    /// Maximum seats the game can hold.
    fn max_players(&self) -> usize;

    /// Build the initial state for the given seats and engine-specific
    /// configuration. Deterministic for identical inputs. The returned
    /// state has `lifecycle == Created`; the lifecycle transition to
    /// waiting/active belongs to the game manager.
    fn initialize_game(
        &self,
        players: Vec<Seat>,
        config: &serde_json::Value,
    ) -> Result<GameState, DomainError>;

    /// Pure predicate over a proposed move. Must reject moves from a player
    /// who is not at `current_player_index`, moves referencing invalid
    /// board targets, and moves submitted after game end.
    fn validate_move(&self, state: &GameState, player_id: PlayerId, mv: &Move) -> MoveValidation;

    /// Produce a new state with the move's board effect applied. Does not
    /// advance the turn, touch `version`, or append to `move_history`.
    fn apply_move(
        &self,
        state: &GameState,
        player_id: PlayerId,
        mv: &Move,
    ) -> Result<GameState, DomainError>;

    /// Rotate `current_player_index` to the next seat to move.
    fn advance_turn(&self, state: &GameState) -> GameState;

    /// Whether the game has reached a terminal position.
    fn is_game_over(&self, state: &GameState) -> bool;

    /// Winning seat for a terminal position, or `None` for a draw or an
    /// unfinished game.
    fn winner(&self, state: &GameState) -> Option<PlayerId>;

    /// Optional capability: render data for an external board renderer.
    fn render_board(&self, _state: &GameState) -> Option<BoardRender> {
        None
    }

    /// Optional capability: synthesize a legal move for the given seat.
    /// Consumed by the AI player adapter; an engine without it cannot host
    /// AI-controlled seats.
    fn suggest_move(&self, _state: &GameState, _seat: PlayerId) -> Option<Move> {
        None
    }

    /// Descriptor for registry listings.
    fn descriptor(&self) -> GameTypeDescriptor {
        GameTypeDescriptor {
            game_type: self.game_type().to_string(),
            display_name: self.display_name().to_string(),
            min_players: self.min_players(),
            max_players: self.max_players(),
        }
    }
}

impl std::fmt::Debug for dyn RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field("game_type", &self.game_type())
            .finish()
    }
}
