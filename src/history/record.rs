//! Completed Match Records
//!
//! Finished matches are frozen into [`CompletedMatch`] records. History is
//! append-only and bounded: the newest record goes to the front and the
//! oldest falls off the back once the capacity is reached.

use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};

use crate::core::ids::RecordId;
use crate::game::duel::DuelRound;
use crate::game::outcome::GameOutcome;
use crate::game::state::{MatchState, MaxPoints};

/// A finished match. Immutable once recorded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedMatch {
    /// Record ID
    pub id: RecordId,
    /// Team 1 name at the time the match was recorded
    pub team1_name: String,
    /// Team 2 name at the time the match was recorded
    pub team2_name: String,
    /// Final team 1 score
    pub score1: u32,
    /// Final team 2 score
    pub score2: u32,
    /// Name of the winning team
    pub winner_name: String,
    /// Match target
    pub max_points: MaxPoints,
    /// When the match was recorded
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    /// Free-form closing comment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Loser finished under the penalty threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loser_sleeps_outside: Option<bool>,
    /// Duel rounds played, oldest first
    #[serde(default)]
    pub duel_rounds: Vec<DuelRound>,
}

impl CompletedMatch {
    /// Freeze a finished match into a record.
    pub fn from_match(
        state: &MatchState,
        outcome: &GameOutcome,
        notes: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RecordId::generate(),
            team1_name: state.team1.name.clone(),
            team2_name: state.team2.name.clone(),
            score1: state.score1,
            score2: state.score2,
            winner_name: state.team(outcome.winner).name.clone(),
            max_points: state.max_points,
            timestamp,
            notes: notes.filter(|n| !n.trim().is_empty()),
            loser_sleeps_outside: Some(outcome.loser_sleeps_outside),
            duel_rounds: state.duel_rounds.clone(),
        }
    }
}

/// Bounded match history, newest first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchHistory {
    records: Vec<CompletedMatch>,
    capacity: usize,
}

impl MatchHistory {
    /// Create an empty history.
    pub fn new(capacity: usize) -> Self {
        Self { records: Vec::new(), capacity }
    }

    /// Build a history from stored records, newest first.
    ///
    /// Anything past the capacity is dropped.
    pub fn from_records(mut records: Vec<CompletedMatch>, capacity: usize) -> Self {
        records.truncate(capacity);
        Self { records, capacity }
    }

    /// Record a finished match. Returns the records evicted to make room.
    pub fn push(&mut self, record: CompletedMatch) -> Vec<CompletedMatch> {
        self.records.insert(0, record);
        if self.records.len() > self.capacity {
            self.records.split_off(self.capacity)
        } else {
            Vec::new()
        }
    }

    /// Remove a record by id.
    pub fn remove(&mut self, id: &RecordId) -> Option<CompletedMatch> {
        let idx = self.records.iter().position(|r| &r.id == id)?;
        Some(self.records.remove(idx))
    }

    /// Get a record by id.
    pub fn get(&self, id: &RecordId) -> Option<&CompletedMatch> {
        self.records.iter().find(|r| &r.id == id)
    }

    /// Records in storage order (insertion, newest first).
    pub fn records(&self) -> &[CompletedMatch] {
        &self.records
    }

    /// Records ordered by timestamp, newest first.
    pub fn newest_first(&self) -> Vec<&CompletedMatch> {
        let mut sorted: Vec<_> = self.records.iter().collect();
        sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        sorted
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Is the history empty?
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Maximum records kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
