use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::PlayerId;

/// One accepted or proposed move.
///
/// `action` and `parameters` are opaque to the orchestration core; their
/// meaning belongs to the rule engine governing the game. A move is
/// immutable once appended to `GameState::move_history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    pub player_id: PlayerId,
    pub timestamp: DateTime<Utc>,
    pub action: String,
    pub parameters: serde_json::Value,
}

impl Move {
    pub fn new(player_id: PlayerId, action: impl Into<String>, parameters: serde_json::Value) -> Self {
        Self {
            player_id,
            timestamp: Utc::now(),
            action: action.into(),
            parameters,
        }
    }
}
