//! Turn Service - move application and AI-turn chaining.
//!
//! The single external operation is `apply_move`. Under the per-game lock it
//! validates and applies one human move, then keeps advancing AI-controlled
//! turns until a human seat is to move or the game ends. Holding the lock
//! across the whole chain makes it atomic from the outside: no observer ever
//! sees a game paused on "the AI's turn", and a concurrent human move for
//! the same game cannot interleave with AI processing.
//!
//! Each ply persists individually, so the version counter stays gapless
//! even when a later ply in the chain fails.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use gamehall_domain::{GameId, GameState, Move, PlayerId};

use crate::application::error::GameError;
use crate::application::ports::outbound::{AiPlayer, GameRepository};
use crate::infrastructure::locks::GameLockManager;
use crate::plugins::{GameTypeRegistry, MoveValidation};

/// Defensive cap on consecutive AI plies within one `apply_move` call.
/// Exceeding it signals a misbehaving AI service or rule engine.
pub const MAX_AI_CHAIN: usize = 32;

/// The turn-execution state machine.
#[async_trait]
pub trait TurnService: Send + Sync {
    /// Validate and apply one move at `expected_version`, then chain any
    /// AI-controlled turns. Returns the state after the chain settles.
    async fn apply_move(
        &self,
        game_id: GameId,
        player_id: PlayerId,
        mv: Move,
        expected_version: u64,
    ) -> Result<GameState, GameError>;
}

/// Default implementation over registry, repository, lock manager, and the
/// AI player port.
#[derive(Clone)]
pub struct TurnServiceImpl {
    registry: Arc<GameTypeRegistry>,
    repository: Arc<dyn GameRepository>,
    locks: Arc<GameLockManager>,
    ai_player: Arc<dyn AiPlayer>,
}

impl TurnServiceImpl {
    pub fn new(
        registry: Arc<GameTypeRegistry>,
        repository: Arc<dyn GameRepository>,
        locks: Arc<GameLockManager>,
        ai_player: Arc<dyn AiPlayer>,
    ) -> Self {
        Self {
            registry,
            repository,
            locks,
            ai_player,
        }
    }

    /// Execute one ply: resolve the engine, validate, apply the board
    /// effect, record the move, advance the turn, detect game end, persist.
    ///
    /// Persistence happens only after every engine call for the ply has
    /// succeeded, so a failing engine never leaves partial state behind.
    async fn execute_ply(
        &self,
        state: GameState,
        player_id: PlayerId,
        mv: Move,
    ) -> Result<GameState, GameError> {
        let engine = self.registry.resolve(&state.game_type)?;

        if let MoveValidation::Invalid { reason } = engine.validate_move(&state, player_id, &mv) {
            return Err(GameError::InvalidMove { reason });
        }

        let mut next = engine.apply_move(&state, player_id, &mv)?;
        next.record_move(mv);
        next = engine.advance_turn(&next);

        if engine.is_game_over(&next) {
            let winner = engine.winner(&next);
            next.complete(winner);
            debug!(
                game_id = %next.game_id,
                winner = winner.map(|w| w.to_string()).unwrap_or_else(|| "draw".to_string()),
                "Game reached terminal state"
            );
        }

        self.repository.save(&next).await?;
        Ok(next)
    }
}

#[async_trait]
impl TurnService for TurnServiceImpl {
    #[instrument(skip(self, mv), fields(game_id = %game_id, player_id = %player_id, expected_version))]
    async fn apply_move(
        &self,
        game_id: GameId,
        player_id: PlayerId,
        mv: Move,
        expected_version: u64,
    ) -> Result<GameState, GameError> {
        let _guard = self.locks.acquire(game_id).await;

        let state = self
            .repository
            .load(game_id)
            .await?
            .ok_or(GameError::GameNotFound(game_id))?;

        // Inactive games are reported as such even when the caller's
        // version is also stale.
        if !state.lifecycle.accepts_moves() {
            return Err(GameError::GameNotActive {
                game_id,
                lifecycle: state.lifecycle,
            });
        }
        if state.version != expected_version {
            return Err(GameError::ConcurrencyConflict {
                game_id,
                expected: expected_version,
                actual: state.version,
            });
        }

        let mut state = self.execute_ply(state, player_id, mv).await?;

        // Chain AI turns as an explicit loop, still under the same lock.
        // The just-persisted version is carried implicitly: no synthetic
        // caller supplies one.
        let mut chained = 0usize;
        while state.lifecycle.accepts_moves() {
            let seat = state
                .current_seat()
                .map(|s| s.player_id)
                .ok_or_else(|| GameError::Validation("Active game has no seats".to_string()))?;
            if !self.ai_player.is_ai_controlled(&state, seat).await {
                break;
            }
            if chained >= MAX_AI_CHAIN {
                warn!(game_id = %game_id, max = MAX_AI_CHAIN, "AI chain exceeded ply cap");
                return Err(GameError::AiChainOverflow {
                    game_id,
                    max: MAX_AI_CHAIN,
                });
            }

            let ai_move = self.ai_player.compute_move(&state, seat).await?;
            debug!(game_id = %game_id, seat = %seat, ply = chained + 1, "Applying chained AI move");
            state = self.execute_ply(state, seat, ai_move).await?;
            chained += 1;
        }

        info!(
            game_id = %game_id,
            version = state.version,
            ai_plies = chained,
            lifecycle = %state.lifecycle,
            "Move applied"
        );
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::outbound::{
        AiPlayerError, MockAiPlayer, MockGameRepository, RepoError,
    };
    use crate::plugins::{RuleEngine, TicTacToeEngine};
    use gamehall_domain::{DomainError, GameLifecycle, Seat};
    use serde_json::json;

    fn registry() -> Arc<GameTypeRegistry> {
        let mut registry = GameTypeRegistry::new();
        registry
            .register(Arc::new(TicTacToeEngine::new()))
            .expect("register");
        Arc::new(registry)
    }

    fn active_game() -> GameState {
        let engine = TicTacToeEngine::new();
        let mut state = engine
            .initialize_game(
                vec![
                    Seat::new(PlayerId::new(), "Alice"),
                    Seat::new(PlayerId::new(), "Bob"),
                ],
                &serde_json::Value::Null,
            )
            .expect("init");
        state.lifecycle = GameLifecycle::Active;
        state
    }

    fn no_ai() -> MockAiPlayer {
        let mut ai = MockAiPlayer::new();
        ai.expect_is_ai_controlled().returning(|_, _| false);
        ai
    }

    fn service(repo: MockGameRepository, ai: MockAiPlayer) -> TurnServiceImpl {
        TurnServiceImpl::new(
            registry(),
            Arc::new(repo),
            Arc::new(GameLockManager::new()),
            Arc::new(ai),
        )
    }

    fn place(player: PlayerId, x: i32, y: i32) -> Move {
        Move::new(player, "place", json!({ "x": x, "y": y }))
    }

    #[tokio::test]
    async fn test_accepted_move_bumps_version_and_rotates_turn() {
        let stored = active_game();
        let game_id = stored.game_id;
        let alice = stored.players[0].player_id;

        let mut repo = MockGameRepository::new();
        let loaded = stored.clone();
        repo.expect_load().returning(move |_| Ok(Some(loaded.clone())));
        repo.expect_save()
            .withf(|state: &GameState| {
                state.version == 2
                    && state.move_history.len() == 1
                    && state.current_player_index == 1
            })
            .times(1)
            .returning(|_| Ok(()));

        let result = service(repo, no_ai())
            .apply_move(game_id, alice, place(alice, 0, 0), 1)
            .await
            .expect("apply");
        assert_eq!(result.version, 2);
        assert_eq!(result.current_player_index, 1);
    }

    #[tokio::test]
    async fn test_stale_version_conflicts_without_mutation() {
        let stored = active_game();
        let game_id = stored.game_id;
        let alice = stored.players[0].player_id;

        let mut repo = MockGameRepository::new();
        let loaded = stored.clone();
        repo.expect_load().returning(move |_| Ok(Some(loaded.clone())));
        repo.expect_save().times(0);

        let err = service(repo, no_ai())
            .apply_move(game_id, alice, place(alice, 0, 0), 0)
            .await
            .expect_err("stale");
        assert!(matches!(
            err,
            GameError::ConcurrencyConflict { expected: 0, actual: 1, .. }
        ));
    }

    #[tokio::test]
    async fn test_missing_game_fails() {
        let mut repo = MockGameRepository::new();
        repo.expect_load().returning(|_| Ok(None));
        repo.expect_save().times(0);

        let player = PlayerId::new();
        let err = service(repo, no_ai())
            .apply_move(GameId::new(), player, place(player, 0, 0), 1)
            .await
            .expect_err("missing");
        assert!(matches!(err, GameError::GameNotFound(_)));
    }

    #[tokio::test]
    async fn test_completed_game_rejects_moves() {
        let mut stored = active_game();
        stored.complete(None);
        // complete() only touches timestamps, version stays 1.
        let game_id = stored.game_id;
        let alice = stored.players[0].player_id;

        let mut repo = MockGameRepository::new();
        let loaded = stored.clone();
        repo.expect_load().returning(move |_| Ok(Some(loaded.clone())));
        repo.expect_save().times(0);

        let svc = service(repo, no_ai());
        let err = svc
            .apply_move(game_id, alice, place(alice, 0, 0), 1)
            .await
            .expect_err("inactive");
        assert!(matches!(
            err,
            GameError::GameNotActive { lifecycle: GameLifecycle::Completed, .. }
        ));

        // The inactive-game error wins even when the version is also stale.
        let err = svc
            .apply_move(game_id, alice, place(alice, 0, 0), 7)
            .await
            .expect_err("inactive");
        assert!(matches!(err, GameError::GameNotActive { .. }));
    }

    #[tokio::test]
    async fn test_invalid_move_is_a_no_op() {
        let stored = active_game();
        let game_id = stored.game_id;
        let bob = stored.players[1].player_id;

        let mut repo = MockGameRepository::new();
        let loaded = stored.clone();
        repo.expect_load().returning(move |_| Ok(Some(loaded.clone())));
        repo.expect_save().times(0);

        // Bob moves while it is Alice's turn.
        let err = service(repo, no_ai())
            .apply_move(game_id, bob, place(bob, 0, 0), 1)
            .await
            .expect_err("wrong turn");
        assert!(matches!(err, GameError::InvalidMove { .. }));
    }

    #[tokio::test]
    async fn test_ai_turn_is_chained_into_same_call() {
        let stored = active_game();
        let game_id = stored.game_id;
        let alice = stored.players[0].player_id;
        let bot = stored.players[1].player_id;

        let mut repo = MockGameRepository::new();
        let loaded = stored.clone();
        repo.expect_load().returning(move |_| Ok(Some(loaded.clone())));
        repo.expect_save().times(2).returning(|_| Ok(()));

        let mut ai = MockAiPlayer::new();
        ai.expect_is_ai_controlled()
            .returning(move |_, seat| seat == bot);
        ai.expect_compute_move()
            .times(1)
            .returning(|state, seat| {
                let engine = TicTacToeEngine::new();
                engine
                    .suggest_move(state, seat)
                    .ok_or(AiPlayerError::NoMoveAvailable(seat))
            });

        let result = service(repo, ai)
            .apply_move(game_id, alice, place(alice, 0, 0), 1)
            .await
            .expect("apply");

        // Human move plus one AI ply, turn back at the human seat.
        assert_eq!(result.version, 3);
        assert_eq!(result.move_history.len(), 2);
        assert_eq!(
            result.current_seat().map(|s| s.player_id),
            Some(alice)
        );
    }

    #[tokio::test]
    async fn test_ai_chain_overflow_is_fatal() {
        /// An engine whose games never end, to drive the chain past its cap.
        #[derive(Debug)]
        struct EndlessEngine;

        impl RuleEngine for EndlessEngine {
            fn game_type(&self) -> &str {
                "endless"
            }
            fn display_name(&self) -> &str {
                "Endless"
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
                Ok(GameState::new(
                    self.game_type(),
                    players,
                    gamehall_domain::Board::grid(1, 1),
                    "playing",
                ))
            }
            fn validate_move(
                &self,
                _state: &GameState,
                _player_id: PlayerId,
                _mv: &Move,
            ) -> MoveValidation {
                MoveValidation::Valid
            }
            fn apply_move(
                &self,
                state: &GameState,
                _player_id: PlayerId,
                _mv: &Move,
            ) -> Result<GameState, DomainError> {
                Ok(state.clone())
            }
            fn advance_turn(&self, state: &GameState) -> GameState {
                let mut next = state.clone();
                next.current_player_index =
                    (next.current_player_index + 1) % next.players.len();
                next
            }
            fn is_game_over(&self, _state: &GameState) -> bool {
                false
            }
            fn winner(&self, _state: &GameState) -> Option<PlayerId> {
                None
            }
            fn suggest_move(&self, _state: &GameState, seat: PlayerId) -> Option<Move> {
                Some(Move::new(seat, "noop", serde_json::Value::Null))
            }
        }

        let mut registry = GameTypeRegistry::new();
        let endless = Arc::new(EndlessEngine);
        registry.register(Arc::clone(&endless) as Arc<dyn RuleEngine>).expect("register");

        let human = PlayerId::new();
        let bot = PlayerId::new();
        let mut stored = endless
            .initialize_game(
                vec![Seat::new(human, "Alice"), Seat::new(bot, "Bot")],
                &serde_json::Value::Null,
            )
            .expect("init");
        stored.lifecycle = GameLifecycle::Active;
        let game_id = stored.game_id;

        let mut repo = MockGameRepository::new();
        let loaded = stored.clone();
        repo.expect_load().returning(move |_| Ok(Some(loaded.clone())));
        repo.expect_save().returning(|_| Ok(()));

        let mut ai = MockAiPlayer::new();
        // Both seats AI-controlled after the human's move: the chain never
        // returns to a human.
        ai.expect_is_ai_controlled().returning(|_, _| true);
        ai.expect_compute_move()
            .returning(|_, seat| Ok(Move::new(seat, "noop", serde_json::Value::Null)));

        let service = TurnServiceImpl::new(
            Arc::new(registry),
            Arc::new(repo),
            Arc::new(GameLockManager::new()),
            Arc::new(ai),
        );
        let err = service
            .apply_move(game_id, human, Move::new(human, "noop", serde_json::Value::Null), 1)
            .await
            .expect_err("overflow");
        assert!(matches!(
            err,
            GameError::AiChainOverflow { max: MAX_AI_CHAIN, .. }
        ));
    }

    #[tokio::test]
    async fn test_repository_conflict_on_save_propagates() {
        let stored = active_game();
        let game_id = stored.game_id;
        let alice = stored.players[0].player_id;

        let mut repo = MockGameRepository::new();
        let loaded = stored.clone();
        repo.expect_load().returning(move |_| Ok(Some(loaded.clone())));
        repo.expect_save().returning(move |state| {
            Err(RepoError::VersionConflict {
                game_id: state.game_id,
                expected: 2,
                actual: state.version,
            })
        });

        let err = service(repo, no_ai())
            .apply_move(game_id, alice, place(alice, 0, 0), 1)
            .await
            .expect_err("save conflict");
        assert!(matches!(err, GameError::Repository(RepoError::VersionConflict { .. })));
    }

    #[tokio::test]
    async fn test_winning_move_completes_game_and_stops_chain() {
        let engine = TicTacToeEngine::new();
        let mut stored = active_game();
        let alice = stored.players[0].player_id;
        let bob = stored.players[1].player_id;

        // Board one X short of a top-row win, Alice to move.
        for (player, x, y) in [(alice, 0, 0), (bob, 0, 1), (alice, 1, 0), (bob, 1, 1)] {
            let mv = place(player, x, y);
            stored = engine.apply_move(&stored, player, &mv).expect("apply");
            stored.record_move(mv);
            stored = engine.advance_turn(&stored);
        }
        assert_eq!(stored.version, 5);
        let game_id = stored.game_id;

        let mut repo = MockGameRepository::new();
        let loaded = stored.clone();
        repo.expect_load().returning(move |_| Ok(Some(loaded.clone())));
        repo.expect_save().times(1).returning(|_| Ok(()));

        // The AI mock must never be consulted once the game completes.
        let mut ai = MockAiPlayer::new();
        ai.expect_is_ai_controlled().times(0);
        ai.expect_compute_move().times(0);

        let result = service(repo, ai)
            .apply_move(game_id, alice, place(alice, 2, 0), 5)
            .await
            .expect("apply");
        assert_eq!(result.lifecycle, GameLifecycle::Completed);
        assert_eq!(result.winner, Some(alice));
        assert_eq!(result.version, 6);
    }
}
