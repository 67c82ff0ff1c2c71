//! Stored Document Schema
//!
//! Shapes of the four persisted documents exactly as they appear on the
//! wire. Older writers left behind a few variants:
//!
//! - Teams carrying `players: [name, ...]` instead of `playerIds`
//! - Duel rounds stored as a JSON-encoded string rather than an array
//! - History fields named `picaHistory` and `duermeAfuera`
//!
//! Each variant is recognised here, once, and converted to the canonical
//! game types. Nothing past this module sees a legacy shape.

use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};

use crate::core::ids::{RecordId, TeamId};
use crate::game::duel::DuelRound;
use crate::game::roster::{Player, Team};
use crate::game::state::{MatchState, MaxPoints};
use crate::history::record::CompletedMatch;

// =============================================================================
// ERRORS
// =============================================================================

/// Errors decoding stored documents.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Document body is not valid for its topic.
    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),

    /// Encoded duel-round blob could not be decoded.
    #[error("malformed duel rounds: {reason}")]
    DuelBlob {
        /// Decoder message
        reason: String,
    },

    /// Topic name not recognised.
    #[error("unknown topic: {0}")]
    UnknownTopic(String),
}

// =============================================================================
// TEAMS
// =============================================================================

/// Team as written before player ids existed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyTeam {
    /// Team ID
    pub id: TeamId,
    /// Display name
    pub name: String,
    /// Player display names, in seat order
    pub players: Vec<String>,
    /// Matches won
    #[serde(default)]
    pub wins: u32,
}

/// A stored team in either shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TeamDocument {
    /// Seats reference players by id
    Current(Team),
    /// Seats hold bare names
    Legacy(LegacyTeam),
}

impl TeamDocument {
    /// Does this team still seat players by name?
    pub fn is_legacy(&self) -> bool {
        matches!(self, TeamDocument::Legacy(_))
    }
}

impl From<Team> for TeamDocument {
    fn from(team: Team) -> Self {
        TeamDocument::Current(team)
    }
}

// =============================================================================
// DUEL ROUNDS
// =============================================================================

/// Duel rounds as stored: either a structured array or an encoded string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DuelRoundsBlob {
    /// Plain JSON array of rounds
    Structured(Vec<DuelRound>),
    /// JSON array serialized into a string
    Encoded(String),
}

impl Default for DuelRoundsBlob {
    fn default() -> Self {
        DuelRoundsBlob::Structured(Vec::new())
    }
}

impl DuelRoundsBlob {
    /// Encode rounds the way they are written back: as a string.
    pub fn encode(rounds: &[DuelRound]) -> Result<Self, StoreError> {
        Ok(DuelRoundsBlob::Encoded(serde_json::to_string(rounds)?))
    }

    /// Decode either form. An empty string decodes to no rounds.
    pub fn decode(self) -> Result<Vec<DuelRound>, StoreError> {
        match self {
            DuelRoundsBlob::Structured(rounds) => Ok(rounds),
            DuelRoundsBlob::Encoded(body) if body.trim().is_empty() => Ok(Vec::new()),
            DuelRoundsBlob::Encoded(body) => serde_json::from_str(&body)
                .map_err(|e| StoreError::DuelBlob { reason: e.to_string() }),
        }
    }
}

// =============================================================================
// HISTORY RECORDS
// =============================================================================

/// A stored completed match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDocument {
    /// Record ID
    pub id: RecordId,
    /// Team 1 name
    pub team1_name: String,
    /// Team 2 name
    pub team2_name: String,
    /// Team 1 final score
    pub score1: u32,
    /// Team 2 final score
    pub score2: u32,
    /// Winner's name
    pub winner_name: String,
    /// Match target
    pub max_points: MaxPoints,
    /// Epoch milliseconds
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    /// Closing comment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Loser penalty flag
    #[serde(default, alias = "duermeAfuera", skip_serializing_if = "Option::is_none")]
    pub loser_sleeps_outside: Option<bool>,
    /// Duel rounds, either form
    #[serde(default, alias = "picaHistory")]
    pub duel_rounds: DuelRoundsBlob,
}

impl TryFrom<RecordDocument> for CompletedMatch {
    type Error = StoreError;

    fn try_from(doc: RecordDocument) -> Result<Self, Self::Error> {
        Ok(CompletedMatch {
            id: doc.id,
            team1_name: doc.team1_name,
            team2_name: doc.team2_name,
            score1: doc.score1,
            score2: doc.score2,
            winner_name: doc.winner_name,
            max_points: doc.max_points,
            timestamp: doc.timestamp,
            notes: doc.notes,
            loser_sleeps_outside: doc.loser_sleeps_outside,
            duel_rounds: doc.duel_rounds.decode()?,
        })
    }
}

impl RecordDocument {
    /// Stored form of a record.
    pub fn from_record(record: &CompletedMatch) -> Result<Self, StoreError> {
        Ok(Self {
            id: record.id.clone(),
            team1_name: record.team1_name.clone(),
            team2_name: record.team2_name.clone(),
            score1: record.score1,
            score2: record.score2,
            winner_name: record.winner_name.clone(),
            max_points: record.max_points,
            timestamp: record.timestamp,
            notes: record.notes.clone(),
            loser_sleeps_outside: record.loser_sleeps_outside,
            duel_rounds: DuelRoundsBlob::encode(&record.duel_rounds)?,
        })
    }
}

// =============================================================================
// CURRENT GAME
// =============================================================================

/// Stored in-progress match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDocument {
    /// Team 1, either shape
    pub team1: TeamDocument,
    /// Team 2, either shape
    pub team2: TeamDocument,
    /// Team 1 score
    pub score1: u32,
    /// Team 2 score
    pub score2: u32,
    /// Match target
    pub max_points: MaxPoints,
    /// Pica gate
    #[serde(default)]
    pub next_hand_is_pica: bool,
    /// Duel rounds, either form
    #[serde(default, alias = "picaHistory")]
    pub duel_rounds: DuelRoundsBlob,
}

impl MatchDocument {
    /// Does either embedded team still seat players by name?
    pub fn has_legacy_team(&self) -> bool {
        self.team1.is_legacy() || self.team2.is_legacy()
    }

    /// Stored form of a match.
    pub fn from_state(state: &MatchState) -> Result<Self, StoreError> {
        Ok(Self {
            team1: state.team1.clone().into(),
            team2: state.team2.clone().into(),
            score1: state.score1,
            score2: state.score2,
            max_points: state.max_points,
            next_hand_is_pica: state.next_hand_is_pica,
            duel_rounds: DuelRoundsBlob::encode(&state.duel_rounds)?,
        })
    }
}

/// All four documents, as held by a store.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDocuments {
    /// Master player list
    #[serde(default)]
    pub players: Vec<Player>,
    /// Teams, either shape
    #[serde(default)]
    pub teams: Vec<TeamDocument>,
    /// Completed matches, newest first
    #[serde(default)]
    pub history: Vec<RecordDocument>,
    /// In-progress match, if any
    #[serde(default)]
    pub current_game: Option<MatchDocument>,
}
