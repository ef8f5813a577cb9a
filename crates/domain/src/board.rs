//! Board value objects.
//!
//! The core stores boards opaquely: a flat list of spaces, each holding a
//! position and a stack of tokens, plus a free-form metadata bag. Rule
//! engines decide what positions and tokens mean.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A coordinate on a board. Engines choose the axes (column/row, pile
/// index, track position, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// One addressable location on a board with the tokens currently on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Space {
    pub position: Position,
    pub tokens: Vec<String>,
}

impl Space {
    pub fn empty(position: Position) -> Self {
        Self {
            position,
            tokens: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The topmost token, if any.
    pub fn top_token(&self) -> Option<&str> {
        self.tokens.last().map(String::as_str)
    }
}

/// Engine-defined board structure, stored pass-through by the core.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Board {
    pub spaces: Vec<Space>,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Board {
    /// Build a board of empty spaces over a rectangular grid.
    pub fn grid(width: i32, height: i32) -> Self {
        let mut spaces = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                spaces.push(Space::empty(Position::new(x, y)));
            }
        }
        Self {
            spaces,
            metadata: HashMap::new(),
        }
    }

    pub fn space_at(&self, position: Position) -> Option<&Space> {
        self.spaces.iter().find(|s| s.position == position)
    }

    pub fn space_at_mut(&mut self, position: Position) -> Option<&mut Space> {
        self.spaces.iter_mut().find(|s| s.position == position)
    }

    /// Count of spaces holding at least one token.
    pub fn occupied_spaces(&self) -> usize {
        self.spaces.iter().filter(|s| !s.is_empty()).count()
    }

    pub fn is_full(&self) -> bool {
        self.spaces.iter().all(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_dimensions() {
        let board = Board::grid(3, 3);
        assert_eq!(board.spaces.len(), 9);
        assert!(board.space_at(Position::new(2, 2)).is_some());
        assert!(board.space_at(Position::new(3, 0)).is_none());
    }

    #[test]
    fn test_token_placement() {
        let mut board = Board::grid(3, 3);
        let pos = Position::new(1, 1);
        board
            .space_at_mut(pos)
            .expect("space exists")
            .tokens
            .push("X".to_string());

        let space = board.space_at(pos).expect("space exists");
        assert!(!space.is_empty());
        assert_eq!(space.top_token(), Some("X"));
        assert_eq!(board.occupied_spaces(), 1);
        assert!(!board.is_full());
    }

    #[test]
    fn test_full_board() {
        let mut board = Board::grid(2, 1);
        for space in &mut board.spaces {
            space.tokens.push("O".to_string());
        }
        assert!(board.is_full());
    }
}
