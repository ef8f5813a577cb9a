//! Metadata-driven AI player adapter.
//!
//! A seat is AI-controlled when its player id appears under the
//! `ai_players` metadata key, seeded at game creation from the engine
//! config. Moves are synthesized through the rule engine's `suggest_move`
//! capability, so the strategy stays game-specific while this adapter stays
//! generic.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use gamehall_domain::{GameState, Move, PlayerId};

use crate::application::ports::outbound::{AiPlayer, AiPlayerError};
use crate::plugins::GameTypeRegistry;

/// Metadata key listing AI-controlled player ids.
pub const AI_PLAYERS_KEY: &str = "ai_players";

pub struct MetadataAiPlayer {
    registry: Arc<GameTypeRegistry>,
}

impl MetadataAiPlayer {
    pub fn new(registry: Arc<GameTypeRegistry>) -> Self {
        Self { registry }
    }

    fn declared_ai_ids(state: &GameState) -> Vec<String> {
        state
            .metadata
            .get(AI_PLAYERS_KEY)
            .and_then(|v| v.as_array())
            .map(|ids| {
                ids.iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl AiPlayer for MetadataAiPlayer {
    async fn is_ai_controlled(&self, state: &GameState, seat: PlayerId) -> bool {
        Self::declared_ai_ids(state).contains(&seat.to_string())
    }

    async fn compute_move(
        &self,
        state: &GameState,
        seat: PlayerId,
    ) -> Result<Move, AiPlayerError> {
        let engine = self
            .registry
            .resolve(&state.game_type)
            .map_err(|_| AiPlayerError::UnknownGameType(state.game_type.clone()))?;

        let mv = engine
            .suggest_move(state, seat)
            .ok_or(AiPlayerError::NoMoveAvailable(seat))?;
        debug!(game_id = %state.game_id, seat = %seat, action = %mv.action, "Synthesized AI move");
        Ok(mv)
    }
}
