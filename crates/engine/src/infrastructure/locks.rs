//! Per-game lock manager - the concurrency backbone of the engine.
//!
//! Guarantees at-most-one in-flight mutation per game id while unrelated
//! games proceed in parallel. Locks are created lazily on first use and
//! garbage-collected once uncontended. For a single game id, callers
//! acquire in FIFO order (tokio's mutex queues waiters fairly); across
//! different game ids there is no ordering guarantee and none is needed.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use gamehall_domain::GameId;

/// Held for the duration of one mutation (move-plus-AI-chain or join).
/// Released on drop, which covers every exit path.
#[derive(Debug)]
pub struct GameLockGuard {
    _guard: OwnedMutexGuard<()>,
}

/// Map of game id to a lightweight mutex, created on demand.
#[derive(Debug, Default)]
pub struct GameLockManager {
    locks: DashMap<GameId, Arc<Mutex<()>>>,
}

impl GameLockManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the mutual-exclusion token for `game_id`, waiting behind any
    /// current holder of the same id.
    pub async fn acquire(&self, game_id: GameId) -> GameLockGuard {
        self.sweep_idle();
        // Clone the Arc out of the shard before awaiting, so the map shard
        // lock is never held across a suspension point.
        let lock = self
            .locks
            .entry(game_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = lock.lock_owned().await;
        GameLockGuard { _guard: guard }
    }

    /// Drop lock entries nobody holds or waits on. An entry is idle when
    /// the map holds the only Arc reference.
    fn sweep_idle(&self) {
        self.locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    /// Number of live lock entries (test observability).
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_game_is_serialized() {
        let manager = Arc::new(GameLockManager::new());
        let game_id = GameId::new();
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let manager = Arc::clone(&manager);
            let in_flight = Arc::clone(&in_flight);
            let max_seen = Arc::clone(&max_seen);
            handles.push(tokio::spawn(async move {
                let _guard = manager.acquire(game_id).await;
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.expect("task");
        }
        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_different_games_run_in_parallel() {
        let manager = Arc::new(GameLockManager::new());
        let a = GameId::new();
        let b = GameId::new();

        let guard_a = manager.acquire(a).await;
        // Acquiring b must not block behind a's holder.
        let acquired_b =
            tokio::time::timeout(Duration::from_millis(100), manager.acquire(b)).await;
        assert!(acquired_b.is_ok());
        drop(guard_a);
    }

    #[tokio::test]
    async fn test_idle_locks_are_garbage_collected() {
        let manager = GameLockManager::new();
        let game_id = GameId::new();

        let guard = manager.acquire(game_id).await;
        assert_eq!(manager.len(), 1);
        drop(guard);

        // The next acquire sweeps the now-idle entry before re-creating it.
        let other = manager.acquire(GameId::new()).await;
        assert_eq!(manager.len(), 1);
        drop(other);
    }

    #[tokio::test]
    async fn test_reacquire_after_release() {
        let manager = GameLockManager::new();
        let game_id = GameId::new();

        drop(manager.acquire(game_id).await);
        let reacquired =
            tokio::time::timeout(Duration::from_millis(100), manager.acquire(game_id)).await;
        assert!(reacquired.is_ok());
    }
}
