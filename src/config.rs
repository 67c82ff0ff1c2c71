//! Engine Configuration
//!
//! Tunable thresholds for the scoring rules. The defaults are the house
//! rules the engine was written for; a JSON file can override any field.

use std::path::Path;
use serde::{Serialize, Deserialize};

/// Number of seats per team. Duel rounds always have one duel per seat.
pub const SEATS: usize = 3;

/// Configuration for the scoring engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Maximum completed matches kept in history (oldest evicted first).
    pub history_capacity: usize,
    /// Score at which either side forces pica a pica.
    pub duel_entry_score: u32,
    /// Score at which pica a pica stops being played.
    pub duel_exit_score: u32,
    /// Loser "duerme afuera" when finishing strictly under this score.
    ///
    /// Fixed for both 15 and 30 point matches.
    pub loser_penalty_threshold: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_capacity: 100,
            duel_entry_score: 5,
            duel_exit_score: 25,
            loser_penalty_threshold: 15,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let body = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&body)?)
    }
}
