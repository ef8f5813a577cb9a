pub mod game_service;
pub mod turn_service;

pub use game_service::{CreateGameRequest, GameService, GameServiceImpl, SeatRequest};
pub use turn_service::{TurnService, TurnServiceImpl, MAX_AI_CHAIN};
