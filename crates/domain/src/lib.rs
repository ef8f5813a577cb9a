//! Gamehall domain layer - core types for asynchronous turn-based games.
//!
//! This crate is pure data and invariants: no async, no I/O, no engine
//! dispatch. The orchestration core (`gamehall-engine`) layers services,
//! ports, and rule-engine plugins on top of these types.

pub mod board;
pub mod error;
pub mod game;
pub mod ids;
pub mod lifecycle;
pub mod moves;
pub mod seat;

pub use board::{Board, Position, Space};
pub use error::DomainError;
pub use game::GameState;
pub use ids::{GameId, PlayerId};
pub use lifecycle::GameLifecycle;
pub use moves::Move;
pub use seat::Seat;
