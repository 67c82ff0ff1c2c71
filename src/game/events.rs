//! Score Events
//!
//! Every accepted engine operation reports what it changed. Hosts use the
//! events to drive their display and to decide which documents to persist.

use serde::{Serialize, Deserialize};

use crate::core::ids::RecordId;
use crate::game::duel::DuelRound;
use crate::game::outcome::GameOutcome;

/// Game event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScoreEventData {
    /// A match was started between two teams
    MatchStarted {
        team1: String,
        team2: String,
        max_points: u32,
    },

    /// An ordinary hand was committed
    HandConfirmed {
        delta1: u32,
        delta2: u32,
        score1: u32,
        score2: u32,
    },

    /// A duel round was resolved
    DuelRoundResolved {
        round: DuelRound,
        delta1: u32,
        delta2: u32,
        score1: u32,
        score2: u32,
    },

    /// The last action was reversed
    HandUndone {
        delta1: u32,
        delta2: u32,
        was_pica: bool,
        score1: u32,
        score2: u32,
    },

    /// A side reached the target
    MatchEnded {
        outcome: GameOutcome,
    },

    /// The finished match went to history and the session closed
    MatchFinalized {
        record_id: RecordId,
    },

    /// The finished match went to history and the same teams restarted
    RematchStarted {
        record_id: RecordId,
    },

    /// Progress was discarded without writing history
    ProgressReset,

    /// The match was dropped without writing history
    MatchDiscarded,

    /// A history record was removed
    RecordDeleted {
        record_id: RecordId,
        winner_name: String,
    },
}

/// A score event with its position in the match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEvent {
    /// Scoring actions applied to the match so far (hands and duel rounds)
    pub hand: u32,

    /// Event data
    pub data: ScoreEventData,
}

impl ScoreEvent {
    /// Create a new event.
    pub fn new(hand: u32, data: ScoreEventData) -> Self {
        Self { hand, data }
    }

    /// Create hand confirmed event.
    pub fn hand_confirmed(hand: u32, delta1: u32, delta2: u32, score1: u32, score2: u32) -> Self {
        Self::new(hand, ScoreEventData::HandConfirmed { delta1, delta2, score1, score2 })
    }

    /// Create match ended event.
    pub fn match_ended(hand: u32, outcome: GameOutcome) -> Self {
        Self::new(hand, ScoreEventData::MatchEnded { outcome })
    }

    /// Does this event close the match?
    pub fn ends_match(&self) -> bool {
        matches!(self.data, ScoreEventData::MatchEnded { .. })
    }
}
