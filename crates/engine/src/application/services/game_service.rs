//! Game Service - lifecycle use cases: create, join, list, fetch, delete.
//!
//! Does not mutate turn state; move application lives in the turn service.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info, instrument};

use gamehall_domain::{GameId, GameLifecycle, GameState, PlayerId, Seat};

use crate::application::error::GameError;
use crate::application::ports::outbound::{GameFilters, GamePage, GameRepository};
use crate::infrastructure::ai::AI_PLAYERS_KEY;
use crate::infrastructure::locks::GameLockManager;
use crate::plugins::{GameTypeDescriptor, GameTypeRegistry};

/// Request to create a new game instance.
#[derive(Debug, Clone)]
pub struct CreateGameRequest {
    pub game_type: String,
    /// Engine-specific configuration, passed through to `initialize_game`.
    /// An `ai_players` array of player-id strings is lifted into metadata.
    pub config: serde_json::Value,
    pub creator: Option<SeatRequest>,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// A player asking for a seat.
#[derive(Debug, Clone)]
pub struct SeatRequest {
    pub player_id: PlayerId,
    pub display_name: String,
}

/// Game lifecycle use cases.
#[async_trait]
pub trait GameService: Send + Sync {
    /// Create a game via its rule engine and persist it at version 1.
    async fn create_game(&self, request: CreateGameRequest) -> Result<GameState, GameError>;

    /// Append a seat to a joinable game.
    async fn join_game(&self, game_id: GameId, player: SeatRequest)
        -> Result<GameState, GameError>;

    /// Read-only filter/pagination over stored games.
    async fn list_games(&self, filters: GameFilters) -> Result<GamePage, GameError>;

    /// Read-only fetch.
    async fn get_game(&self, game_id: GameId) -> Result<Option<GameState>, GameError>;

    /// Remove a stored game on explicit caller request.
    async fn delete_game(&self, game_id: GameId) -> Result<(), GameError>;

    /// Descriptors for all registered game types.
    fn list_available_game_types(&self) -> Vec<GameTypeDescriptor>;
}

/// Default implementation over the registry, repository, and lock manager.
#[derive(Clone)]
pub struct GameServiceImpl {
    registry: Arc<GameTypeRegistry>,
    repository: Arc<dyn GameRepository>,
    locks: Arc<GameLockManager>,
}

impl GameServiceImpl {
    pub fn new(
        registry: Arc<GameTypeRegistry>,
        repository: Arc<dyn GameRepository>,
        locks: Arc<GameLockManager>,
    ) -> Self {
        Self {
            registry,
            repository,
            locks,
        }
    }

    fn seed_metadata(state: &mut GameState, request: &CreateGameRequest) {
        if let Some(ref name) = request.name {
            state
                .metadata
                .insert("name".to_string(), json!(name));
        }
        if let Some(ref description) = request.description {
            state
                .metadata
                .insert("description".to_string(), json!(description));
        }
        if let Some(ai_players) = request.config.get(AI_PLAYERS_KEY) {
            state
                .metadata
                .insert(AI_PLAYERS_KEY.to_string(), ai_players.clone());
        }
    }
}

#[async_trait]
impl GameService for GameServiceImpl {
    #[instrument(skip(self, request), fields(game_type = %request.game_type))]
    async fn create_game(&self, request: CreateGameRequest) -> Result<GameState, GameError> {
        let engine = self.registry.resolve(&request.game_type)?;

        let players = request
            .creator
            .iter()
            .map(|c| Seat::new(c.player_id, c.display_name.clone()))
            .collect();
        let mut state = engine.initialize_game(players, &request.config)?;
        Self::seed_metadata(&mut state, &request);

        state.lifecycle = if state.players.len() >= engine.min_players() {
            GameLifecycle::Active
        } else {
            GameLifecycle::WaitingForPlayers
        };

        self.repository.save(&state).await?;
        info!(game_id = %state.game_id, "Created new game of type {}", state.game_type);
        Ok(state)
    }

    #[instrument(skip(self, player), fields(game_id = %game_id, player_id = %player.player_id))]
    async fn join_game(
        &self,
        game_id: GameId,
        player: SeatRequest,
    ) -> Result<GameState, GameError> {
        // Same lock as move application: two simultaneous joins must not
        // over-fill a game.
        let _guard = self.locks.acquire(game_id).await;

        let mut state = self
            .repository
            .load(game_id)
            .await?
            .ok_or(GameError::GameNotFound(game_id))?;

        let engine = self.registry.resolve(&state.game_type)?;
        if state.players.len() >= engine.max_players() {
            return Err(GameError::GameFull {
                game_id,
                capacity: engine.max_players(),
            });
        }

        state.add_seat(Seat::new(player.player_id, player.display_name))?;
        if state.players.len() >= engine.min_players() {
            state.lifecycle = GameLifecycle::Active;
        }
        state.bump_version();

        self.repository.save(&state).await?;
        info!(
            game_id = %game_id,
            players = state.players.len(),
            lifecycle = %state.lifecycle,
            "Player joined game"
        );
        Ok(state)
    }

    #[instrument(skip(self, filters))]
    async fn list_games(&self, filters: GameFilters) -> Result<GamePage, GameError> {
        debug!("Listing games");
        Ok(self.repository.list(filters).await?)
    }

    #[instrument(skip(self))]
    async fn get_game(&self, game_id: GameId) -> Result<Option<GameState>, GameError> {
        debug!(game_id = %game_id, "Fetching game");
        Ok(self.repository.load(game_id).await?)
    }

    #[instrument(skip(self))]
    async fn delete_game(&self, game_id: GameId) -> Result<(), GameError> {
        let _guard = self.locks.acquire(game_id).await;
        self.repository
            .load(game_id)
            .await?
            .ok_or(GameError::GameNotFound(game_id))?;
        self.repository.delete(game_id).await?;
        info!(game_id = %game_id, "Deleted game");
        Ok(())
    }

    fn list_available_game_types(&self) -> Vec<GameTypeDescriptor> {
        self.registry.list_types()
    }
}
