//! Undo Ledger
//!
//! One slot, last action only. Every resolver call overwrites the slot;
//! a successful undo empties it.

use serde::{Serialize, Deserialize};

use crate::game::state::MatchState;

/// The most recent scoring action, as recorded by a resolver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UndoEntry {
    /// Points credited to team 1
    pub delta1: u32,
    /// Points credited to team 2
    pub delta2: u32,
    /// Action was a duel round
    pub was_pica: bool,
}

/// Single-slot undo ledger.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UndoLedger {
    slot: Option<UndoEntry>,
}

impl UndoLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an action, replacing whatever was there.
    pub fn record(&mut self, entry: UndoEntry) {
        self.slot = Some(entry);
    }

    /// The action an undo would reverse.
    pub fn peek(&self) -> Option<&UndoEntry> {
        self.slot.as_ref()
    }

    /// Is there anything to undo?
    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    /// Forget the recorded action.
    pub fn clear(&mut self) {
        self.slot = None;
    }

    /// Reverse the recorded action on `state` and empty the slot.
    ///
    /// Scores floor at zero. A reversed duel round reopens the duel turn but
    /// stays in the round log. Returns `None` when there is nothing to undo.
    pub fn undo(&mut self, state: &mut MatchState) -> Option<UndoEntry> {
        let entry = self.slot.take()?;
        state.remove_points(entry.delta1, entry.delta2);
        if entry.was_pica {
            state.next_hand_is_pica = false;
        }
        Some(entry)
    }
}
