//! Connect-four reference engine: 7x6 grid, two seats, gravity drops, win on
//! four in a row.
//!
//! Moves carry `action = "drop"` with `parameters = { "column": .. }`.
//! Row 0 is the bottom of the board; a dropped token lands on the lowest
//! empty row of its column.

use gamehall_domain::{Board, DomainError, GameState, Move, PlayerId, Position, Seat};
use serde_json::json;

use super::{BoardRender, MoveValidation, RuleEngine};

const WIDTH: i32 = 7;
const HEIGHT: i32 = 6;
const CONNECT: i32 = 4;
const SEAT_TOKENS: [&str; 2] = ["R", "Y"];

/// Scan directions: horizontal, vertical, both diagonals.
const DIRECTIONS: [(i32, i32); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

#[derive(Debug, Default)]
pub struct ConnectFourEngine;

impl ConnectFourEngine {
    pub fn new() -> Self {
        Self
    }

    fn token_at(state: &GameState, x: i32, y: i32) -> Option<&str> {
        state
            .board
            .space_at(Position::new(x, y))
            .and_then(|s| s.top_token())
    }

    /// Lowest empty row in a column, or `None` when the column is full.
    fn landing_row(state: &GameState, column: i32) -> Option<i32> {
        (0..HEIGHT).find(|&y| {
            state
                .board
                .space_at(Position::new(column, y))
                .is_some_and(|s| s.is_empty())
        })
    }

    fn winning_token(state: &GameState) -> Option<&str> {
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                let Some(token) = Self::token_at(state, x, y) else {
                    continue;
                };
                for (dx, dy) in DIRECTIONS {
                    let connected = (1..CONNECT).all(|step| {
                        Self::token_at(state, x + dx * step, y + dy * step) == Some(token)
                    });
                    if connected {
                        return Some(token);
                    }
                }
            }
        }
        None
    }

    fn token_for_seat(state: &GameState, player_id: PlayerId) -> Option<&'static str> {
        state
            .players
            .iter()
            .position(|s| s.player_id == player_id)
            .and_then(|i| SEAT_TOKENS.get(i).copied())
    }

    fn parse_column(mv: &Move) -> Result<i32, String> {
        if mv.action != "drop" {
            return Err(format!("Unknown action '{}', expected 'drop'", mv.action));
        }
        mv.parameters
            .get("column")
            .and_then(|v| v.as_i64())
            .map(|c| c as i32)
            .ok_or_else(|| "Move parameters must include integer 'column'".to_string())
    }
}

impl RuleEngine for ConnectFourEngine {
    fn game_type(&self) -> &str {
        "connect_four"
    }

    fn display_name(&self) -> &str {
        "Connect Four"
    }

    fn min_players(&self) -> usize {
        2
    }

    fn max_players(&self) -> usize {
        2
    }

    fn initialize_game(
        &self,
        players: Vec<Seat>,
        _config: &serde_json::Value,
    ) -> Result<GameState, DomainError> {
        if players.len() > self.max_players() {
            return Err(DomainError::validation(format!(
                "Connect four holds at most {} players, got {}",
                self.max_players(),
                players.len()
            )));
        }
        Ok(GameState::new(
            self.game_type(),
            players,
            Board::grid(WIDTH, HEIGHT),
            "playing",
        ))
    }

    fn validate_move(&self, state: &GameState, player_id: PlayerId, mv: &Move) -> MoveValidation {
        if !state.lifecycle.accepts_moves() {
            return MoveValidation::invalid(format!(
                "Game is not accepting moves (lifecycle: {})",
                state.lifecycle
            ));
        }
        if self.is_game_over(state) {
            return MoveValidation::invalid("Game is already over");
        }
        let Some(current) = state.current_seat() else {
            return MoveValidation::invalid("Game has no seats");
        };
        if current.player_id != player_id {
            return MoveValidation::invalid("It is not this player's turn");
        }
        let column = match Self::parse_column(mv) {
            Ok(column) => column,
            Err(reason) => return MoveValidation::invalid(reason),
        };
        if !(0..WIDTH).contains(&column) {
            return MoveValidation::invalid(format!("Column {column} is outside the board"));
        }
        if Self::landing_row(state, column).is_none() {
            return MoveValidation::invalid(format!("Column {column} is full"));
        }
        MoveValidation::Valid
    }

    fn apply_move(
        &self,
        state: &GameState,
        player_id: PlayerId,
        mv: &Move,
    ) -> Result<GameState, DomainError> {
        let column = Self::parse_column(mv).map_err(DomainError::validation)?;
        let row = Self::landing_row(state, column)
            .ok_or_else(|| DomainError::validation(format!("Column {column} is full")))?;
        let token = Self::token_for_seat(state, player_id)
            .ok_or_else(|| DomainError::constraint(format!("Player {player_id} has no seat")))?;

        let mut next = state.clone();
        let space = next
            .board
            .space_at_mut(Position::new(column, row))
            .ok_or_else(|| DomainError::validation("Landing position is outside the board"))?;
        space.tokens.push(token.to_string());
        Ok(next)
    }

    fn advance_turn(&self, state: &GameState) -> GameState {
        let mut next = state.clone();
        if !next.players.is_empty() {
            next.current_player_index = (next.current_player_index + 1) % next.players.len();
        }
        next
    }

    fn is_game_over(&self, state: &GameState) -> bool {
        Self::winning_token(state).is_some() || state.board.is_full()
    }

    fn winner(&self, state: &GameState) -> Option<PlayerId> {
        let token = Self::winning_token(state)?;
        let seat_index = SEAT_TOKENS.iter().position(|&t| t == token)?;
        state.players.get(seat_index).map(|s| s.player_id)
    }

    fn render_board(&self, state: &GameState) -> Option<BoardRender> {
        let cells = (0..HEIGHT)
            .map(|y| {
                (0..WIDTH)
                    .map(|x| Self::token_at(state, x, y).unwrap_or("").to_string())
                    .collect()
            })
            .collect();
        Some(BoardRender {
            width: WIDTH,
            height: HEIGHT,
            cells,
        })
    }

    fn suggest_move(&self, state: &GameState, seat: PlayerId) -> Option<Move> {
        let column = (0..WIDTH).find(|&c| Self::landing_row(state, c).is_some())?;
        Some(Move::new(seat, "drop", json!({ "column": column })))
    }
}
