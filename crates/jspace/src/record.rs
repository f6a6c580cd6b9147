//! The persisted player record.

use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};

/// Storage key the player record lives under.
pub const PLAYER_KEY: &str = "player";

/// Progress of one player, as stored locally and reported to the scoreboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    /// Display name on the scoreboard.
    name: String,
    /// Index of the task the player is on.
    task_index: usize,
    /// Number of validation attempts so far.
    completed_tries: u32,
}
