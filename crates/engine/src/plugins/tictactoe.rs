//! Tic-tac-toe reference engine: 3x3 grid, two seats, win on three in a row.
//!
//! Moves carry `action = "place"` with `parameters = { "x": .., "y": .. }`.

use gamehall_domain::{Board, DomainError, GameState, Move, PlayerId, Position, Seat};
use serde_json::json;

use super::{BoardRender, MoveValidation, RuleEngine};

const WIDTH: i32 = 3;
const HEIGHT: i32 = 3;
const SEAT_TOKENS: [&str; 2] = ["X", "O"];

/// The eight winning lines, as position triples.
const WIN_LINES: [[(i32, i32); 3]; 8] = [
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(2, 0), (1, 1), (0, 2)],
];

#[derive(Debug, Default)]
pub struct TicTacToeEngine;

impl TicTacToeEngine {
    pub fn new() -> Self {
        Self
    }

    fn token_at(state: &GameState, x: i32, y: i32) -> Option<&str> {
        state
            .board
            .space_at(Position::new(x, y))
            .and_then(|s| s.top_token())
    }

    /// Token of the line winner, if any line is complete.
    fn winning_token(state: &GameState) -> Option<&str> {
        for line in &WIN_LINES {
            let tokens: Vec<Option<&str>> = line
                .iter()
                .map(|&(x, y)| Self::token_at(state, x, y))
                .collect();
            if let [Some(a), Some(b), Some(c)] = tokens[..] {
                if a == b && b == c {
                    return Some(a);
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

    fn parse_target(mv: &Move) -> Result<Position, String> {
        if mv.action != "place" {
            return Err(format!("Unknown action '{}', expected 'place'", mv.action));
        }
        let x = mv.parameters.get("x").and_then(|v| v.as_i64());
        let y = mv.parameters.get("y").and_then(|v| v.as_i64());
        match (x, y) {
            (Some(x), Some(y)) => Ok(Position::new(x as i32, y as i32)),
            _ => Err("Move parameters must include integer 'x' and 'y'".to_string()),
        }
    }
}

impl RuleEngine for TicTacToeEngine {
    fn game_type(&self) -> &str {
        "tictactoe"
    }

    fn display_name(&self) -> &str {
        "Tic-Tac-Toe"
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
                "Tic-tac-toe holds at most {} players, got {}",
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
        let target = match Self::parse_target(mv) {
            Ok(target) => target,
            Err(reason) => return MoveValidation::invalid(reason),
        };
        match state.board.space_at(target) {
            None => MoveValidation::invalid(format!(
                "Position ({}, {}) is outside the board",
                target.x, target.y
            )),
            Some(space) if !space.is_empty() => MoveValidation::invalid(format!(
                "Position ({}, {}) is already occupied",
                target.x, target.y
            )),
            Some(_) => MoveValidation::Valid,
        }
    }

    fn apply_move(
        &self,
        state: &GameState,
        player_id: PlayerId,
        mv: &Move,
    ) -> Result<GameState, DomainError> {
        let target = Self::parse_target(mv).map_err(DomainError::validation)?;
        let token = Self::token_for_seat(state, player_id)
            .ok_or_else(|| DomainError::constraint(format!("Player {player_id} has no seat")))?;

        let mut next = state.clone();
        let space = next
            .board
            .space_at_mut(target)
            .ok_or_else(|| DomainError::validation("Target position is outside the board"))?;
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
        let space = state.board.spaces.iter().find(|s| s.is_empty())?;
        Some(Move::new(
            seat,
            "place",
            json!({ "x": space.position.x, "y": space.position.y }),
        ))
    }
}
