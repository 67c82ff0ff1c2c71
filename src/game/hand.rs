//! Hand Resolution
//!
//! An ordinary hand ("redonda") credits each side a non-negative delta.
//! Points are accumulated in a [`PendingHand`] while the hand is played
//! and committed in one step.

use serde::{Serialize, Deserialize};

use crate::game::state::{MatchState, Side};
use crate::game::undo::{UndoEntry, UndoLedger};

/// Points for the hand being played, not yet committed. Never persisted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingHand {
    /// Points pending for team 1
    pub delta1: u32,
    /// Points pending for team 2
    pub delta2: u32,
}

impl PendingHand {
    /// Empty hand.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one point for a side.
    pub fn add(&mut self, side: Side) {
        match side {
            Side::Team1 => self.delta1 += 1,
            Side::Team2 => self.delta2 += 1,
        }
    }

    /// Remove one point from a side, stopping at zero.
    pub fn remove(&mut self, side: Side) {
        match side {
            Side::Team1 => self.delta1 = self.delta1.saturating_sub(1),
            Side::Team2 => self.delta2 = self.delta2.saturating_sub(1),
        }
    }

    /// Nothing pending on either side.
    pub fn is_empty(&self) -> bool {
        self.delta1 == 0 && self.delta2 == 0
    }

    /// Scores as they would read once committed, capped at the target.
    pub fn preview(&self, state: &MatchState) -> (u32, u32) {
        let max = state.max_points.value();
        (
            state.score1.saturating_add(self.delta1).min(max),
            state.score2.saturating_add(self.delta2).min(max),
        )
    }

    /// Drop everything pending.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Result of a confirmed hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandResolution {
    /// Requested delta for team 1
    pub delta1: u32,
    /// Requested delta for team 2
    pub delta2: u32,
    /// Scores after the hand
    pub score1: u32,
    /// Scores after the hand
    pub score2: u32,
}

/// Apply an ordinary hand.
///
/// Each score is capped at the target; the pica gate is cleared and the
/// hand replaces whatever the ledger held. Callers check that the match is
/// not over, that it is not a duel turn and that the hand is not empty.
pub fn confirm_hand(
    state: &mut MatchState,
    ledger: &mut UndoLedger,
    delta1: u32,
    delta2: u32,
) -> HandResolution {
    state.add_points(delta1, delta2);
    state.next_hand_is_pica = false;
    ledger.record(UndoEntry { delta1, delta2, was_pica: false });

    HandResolution {
        delta1,
        delta2,
        score1: state.score1,
        score2: state.score2,
    }
}
