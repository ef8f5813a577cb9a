//! Gamehall engine - orchestration core for asynchronous turn-based games.
//!
//! Any number of game types share this core: a registry of pluggable rule
//! engines, a per-game lock manager serializing mutation, a turn service
//! that validates and applies moves (chaining AI turns transparently), and
//! a game service for lifecycle operations. Transports, identity, and
//! durable storage engines sit outside, behind the outbound ports.

pub mod application;
pub mod infrastructure;
pub mod plugins;

pub use application::error::GameError;
pub use application::ports::outbound::{
    AiPlayer, AiPlayerError, GameFilters, GamePage, GameRepository, RepoError,
};
pub use application::services::{
    CreateGameRequest, GameService, GameServiceImpl, SeatRequest, TurnService, TurnServiceImpl,
    MAX_AI_CHAIN,
};
pub use infrastructure::ai::MetadataAiPlayer;
pub use infrastructure::locks::GameLockManager;
pub use infrastructure::persistence::InMemoryGameRepository;
pub use plugins::{
    BoardRender, ConnectFourEngine, GameTypeDescriptor, GameTypeRegistry, MoveValidation,
    RegistryError, RuleEngine, TicTacToeEngine,
};
