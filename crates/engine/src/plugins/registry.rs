//! Game type registry - resolves a game-type string to its rule engine.
//!
//! Registrations happen once at startup, before the registry is shared
//! behind an `Arc`; after that it is read-only, so no locking is needed on
//! the resolve path.

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use super::{GameTypeDescriptor, RuleEngine};

/// Errors raised by registry operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Unknown game type: {0}")]
    UnknownGameType(String),

    /// Re-registering an existing key is rejected rather than replaced;
    /// a silent replace would mask startup wiring mistakes.
    #[error("Game type already registered: {0}")]
    DuplicateGameType(String),
}

/// Holds the set of registered rule engines keyed by game-type identifier.
#[derive(Default)]
pub struct GameTypeRegistry {
    // BTreeMap keeps list_types() order stable across the process lifetime.
    engines: BTreeMap<String, Arc<dyn RuleEngine>>,
}

impl GameTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an engine keyed by its declared game-type string.
    pub fn register(&mut self, engine: Arc<dyn RuleEngine>) -> Result<(), RegistryError> {
        let key = engine.game_type().to_string();
        if self.engines.contains_key(&key) {
            return Err(RegistryError::DuplicateGameType(key));
        }
        debug!(game_type = %key, "Registered rule engine");
        self.engines.insert(key, engine);
        Ok(())
    }

    /// Resolve a game-type string to its engine.
    pub fn resolve(&self, game_type: &str) -> Result<Arc<dyn RuleEngine>, RegistryError> {
        self.engines
            .get(game_type)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownGameType(game_type.to_string()))
    }

    /// Descriptors for all registered game types, in stable (sorted) order.
    pub fn list_types(&self) -> Vec<GameTypeDescriptor> {
        self.engines.values().map(|e| e.descriptor()).collect()
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}
