//! In-memory game repository - the reference implementation of the
//! repository port.
//!
//! Enforces the optimistic version check on save as defense in depth: the
//! per-game lock already excludes concurrent writers, so a conflicting
//! write here signals a programming error and fails loudly.

use async_trait::async_trait;
use dashmap::DashMap;

use gamehall_domain::{GameId, GameState};

use crate::application::ports::outbound::{GameFilters, GamePage, GameRepository, RepoError};

#[derive(Debug, Default)]
pub struct InMemoryGameRepository {
    games: DashMap<GameId, GameState>,
}

impl InMemoryGameRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    fn matches(state: &GameState, filters: &GameFilters) -> bool {
        if let Some(ref game_type) = filters.game_type {
            if &state.game_type != game_type {
                return false;
            }
        }
        if let Some(lifecycle) = filters.lifecycle {
            if state.lifecycle != lifecycle {
                return false;
            }
        }
        if let Some(player_id) = filters.player_id {
            if !state.has_seat(player_id) {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl GameRepository for InMemoryGameRepository {
    async fn load(&self, id: GameId) -> Result<Option<GameState>, RepoError> {
        Ok(self.games.get(&id).map(|entry| entry.clone()))
    }

    async fn save(&self, state: &GameState) -> Result<(), RepoError> {
        match self.games.entry(state.game_id) {
            dashmap::mapref::entry::Entry::Occupied(mut entry) => {
                let stored = entry.get().version;
                if state.version != stored + 1 {
                    return Err(RepoError::VersionConflict {
                        game_id: state.game_id,
                        expected: stored + 1,
                        actual: state.version,
                    });
                }
                entry.insert(state.clone());
            }
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                entry.insert(state.clone());
            }
        }
        Ok(())
    }

    async fn delete(&self, id: GameId) -> Result<(), RepoError> {
        self.games
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound(id))
    }

    async fn list(&self, filters: GameFilters) -> Result<GamePage, RepoError> {
        let mut games: Vec<GameState> = self
            .games
            .iter()
            .filter(|entry| Self::matches(entry.value(), &filters))
            .map(|entry| entry.clone())
            .collect();
        // Newest first; tie-break on id for a stable order.
        games.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.game_id.to_uuid().cmp(&b.game_id.to_uuid()))
        });

        let total = games.len();
        let offset = filters.offset.unwrap_or(0).min(total);
        let end = filters
            .limit
            .map_or(total, |limit| (offset + limit).min(total));
        let games = games[offset..end].to_vec();

        Ok(GamePage { games, total })
    }
}
