//! Match State Definitions
//!
//! The live state of one match in progress: both teams, running score,
//! the pica gate and the append-only duel round log.

use std::fmt;
use serde::{Serialize, Deserialize};

use crate::config::EngineConfig;
use crate::game::duel::DuelRound;
use crate::game::roster::Team;

// =============================================================================
// SIDE
// =============================================================================

/// One of the two sides of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// First team ("nosotros")
    Team1,
    /// Second team ("ellos")
    Team2,
}

impl Side {
    /// The other side.
    pub fn opponent(self) -> Side {
        match self {
            Side::Team1 => Side::Team2,
            Side::Team2 => Side::Team1,
        }
    }
}

// =============================================================================
// MAX POINTS
// =============================================================================

/// Match target. Only 15 and 30 are played.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum MaxPoints {
    /// Short match
    Fifteen,
    /// Full match (malas and buenas)
    #[default]
    Thirty,
}

impl MaxPoints {
    /// Target as a number.
    #[inline]
    pub fn value(self) -> u32 {
        match self {
            MaxPoints::Fifteen => 15,
            MaxPoints::Thirty => 30,
        }
    }
}

impl TryFrom<u32> for MaxPoints {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            15 => Ok(MaxPoints::Fifteen),
            30 => Ok(MaxPoints::Thirty),
            other => Err(format!("unsupported match target: {other}")),
        }
    }
}

impl From<MaxPoints> for u32 {
    fn from(max: MaxPoints) -> u32 {
        max.value()
    }
}

impl fmt::Display for MaxPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

// =============================================================================
// MATCH PHASE
// =============================================================================

/// Current phase of the match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Hands are being played
    #[default]
    InProgress,
    /// One side reached the target
    Over,
}

// =============================================================================
// MATCH STATE
// =============================================================================

/// Complete state of a match in progress.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchState {
    /// First team, as seated at match start
    pub team1: Team,
    /// Second team, as seated at match start
    pub team2: Team,
    /// First team score, `0..=max_points`
    pub score1: u32,
    /// Second team score, `0..=max_points`
    pub score2: u32,
    /// Match target
    pub max_points: MaxPoints,
    /// Set right after a duel round, cleared by the next ordinary hand
    #[serde(default)]
    pub next_hand_is_pica: bool,
    /// Every duel round played, oldest first
    #[serde(default)]
    pub duel_rounds: Vec<DuelRound>,
}

impl MatchState {
    /// Create a new match at 0-0.
    pub fn new(team1: Team, team2: Team, max_points: MaxPoints) -> Self {
        Self {
            team1,
            team2,
            score1: 0,
            score2: 0,
            max_points,
            next_hand_is_pica: false,
            duel_rounds: Vec::new(),
        }
    }

    /// Score of one side.
    #[inline]
    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::Team1 => self.score1,
            Side::Team2 => self.score2,
        }
    }

    /// Team on one side.
    pub fn team(&self, side: Side) -> &Team {
        match side {
            Side::Team1 => &self.team1,
            Side::Team2 => &self.team2,
        }
    }

    /// Add points to both sides, capping each at the match target.
    ///
    /// Points past the target are dropped, not carried.
    pub fn add_points(&mut self, delta1: u32, delta2: u32) {
        let max = self.max_points.value();
        self.score1 = self.score1.saturating_add(delta1).min(max);
        self.score2 = self.score2.saturating_add(delta2).min(max);
    }

    /// Take points back from both sides, flooring each at zero.
    pub fn remove_points(&mut self, delta1: u32, delta2: u32) {
        self.score1 = self.score1.saturating_sub(delta1);
        self.score2 = self.score2.saturating_sub(delta2);
    }

    /// Zero the score and drop all pica state. Teams are kept.
    pub fn reset_progress(&mut self) {
        self.score1 = 0;
        self.score2 = 0;
        self.next_hand_is_pica = false;
        self.duel_rounds = Vec::new();
    }

    /// Append a duel round, producing a new log.
    pub(crate) fn append_round(&mut self, round: DuelRound) {
        let mut rounds = Vec::with_capacity(self.duel_rounds.len() + 1);
        rounds.extend(self.duel_rounds.iter().cloned());
        rounds.push(round);
        self.duel_rounds = rounds;
    }

    /// Both teams have all three seats filled.
    pub fn is_three_vs_three(&self) -> bool {
        self.team1.is_full() && self.team2.is_full()
    }

    /// Score window where pica a pica is played.
    pub fn is_pica_range(&self, config: &EngineConfig) -> bool {
        self.is_three_vs_three()
            && (self.score1 >= config.duel_entry_score || self.score2 >= config.duel_entry_score)
            && self.score1 < config.duel_exit_score
            && self.score2 < config.duel_exit_score
    }

    /// Next hand must be played as a duel round.
    ///
    /// A duel round is never followed directly by another one.
    pub fn is_duel_turn(&self, config: &EngineConfig) -> bool {
        self.is_pica_range(config) && !self.next_hand_is_pica
    }

    /// Has either side reached the target?
    pub fn is_over(&self) -> bool {
        let max = self.max_points.value();
        self.score1 >= max || self.score2 >= max
    }

    /// Current phase.
    pub fn phase(&self) -> MatchPhase {
        if self.is_over() {
            MatchPhase::Over
        } else {
            MatchPhase::InProgress
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
