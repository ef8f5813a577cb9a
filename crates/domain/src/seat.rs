use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::PlayerId;

/// A player slot within a game.
///
/// Seat order in `GameState::players` defines turn rotation and is fixed
/// once the game starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    pub player_id: PlayerId,
    pub display_name: String,
    pub joined_at: DateTime<Utc>,
}

impl Seat {
    pub fn new(player_id: PlayerId, display_name: impl Into<String>) -> Self {
        Self {
            player_id,
            display_name: display_name.into(),
            joined_at: Utc::now(),
        }
    }
}
