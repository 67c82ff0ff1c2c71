//! Pica a Pica
//!
//! Between 5 and 25 points a 3v3 match alternates ordinary hands with duel
//! rounds: three simultaneous one-on-one duels, one per seat. Only the net
//! point difference of the round reaches the match score.
//!
//! ## Flow
//!
//! 1. A [`DuelSheet`] is opened from the match lineups
//! 2. Seat scores are entered; opponents may be re-seated by swapping
//! 3. [`resolve_sheet`] records the round and credits the net difference

use serde::{Serialize, Deserialize};

use crate::config::SEATS;
use crate::core::ids::PlayerId;
use crate::game::state::{MatchState, Side};
use crate::game::undo::{UndoEntry, UndoLedger};

/// Points of one seat's duel: `(team 1 player, team 2 player)`.
pub type SeatScore = (u32, u32);

// =============================================================================
// DUEL RECORDS
// =============================================================================

/// Outcome of one individual duel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuelResult {
    /// Team 1 player
    pub p1_id: PlayerId,
    /// Team 2 player
    pub p2_id: PlayerId,
    /// Points of `p1_id`
    pub s1: u32,
    /// Points of `p2_id`
    pub s2: u32,
}

impl DuelResult {
    /// `(points, opponent points)` for a participant, if they played this duel.
    pub fn for_player(&self, id: &PlayerId) -> Option<(u32, u32)> {
        if &self.p1_id == id {
            Some((self.s1, self.s2))
        } else if &self.p2_id == id {
            Some((self.s2, self.s1))
        } else {
            None
        }
    }
}

/// One duel round: exactly one duel per seat, in seat order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DuelRound(pub [DuelResult; SEATS]);

impl DuelRound {
    /// Duels in seat order.
    pub fn duels(&self) -> &[DuelResult] {
        &self.0
    }

    /// Sum of points per side. Seat scores are unbounded, so sums are wide.
    pub fn totals(&self) -> (u64, u64) {
        self.0
            .iter()
            .fold((0, 0), |(t1, t2), d| (t1 + u64::from(d.s1), t2 + u64::from(d.s2)))
    }
}

// =============================================================================
// DUEL SHEET
// =============================================================================

/// Seat scores being entered for the next duel round.
///
/// Holds its own copy of the opposing lineup so seats can be swapped
/// without touching the match teams.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuelSheet {
    /// Team 1 players in seat order
    pub lineup1: [PlayerId; SEATS],
    /// Team 2 players in seat order (may be re-seated)
    pub lineup2: [PlayerId; SEATS],
    /// Points entered per seat
    pub scores: [SeatScore; SEATS],
    /// Opponent seat picked as the first half of a swap
    #[serde(skip)]
    selected: Option<usize>,
}

impl DuelSheet {
    /// Open a sheet for a match. `None` unless both teams seat three.
    pub fn for_match(state: &MatchState) -> Option<Self> {
        Some(Self {
            lineup1: lineup(&state.team1.player_ids)?,
            lineup2: lineup(&state.team2.player_ids)?,
            scores: [(0, 0); SEATS],
            selected: None,
        })
    }

    /// Adjust one seat's points for a side, stopping at zero.
    pub fn adjust(&mut self, seat: usize, side: Side, delta: i32) {
        let Some(score) = self.scores.get_mut(seat) else {
            return;
        };
        let slot = match side {
            Side::Team1 => &mut score.0,
            Side::Team2 => &mut score.1,
        };
        *slot = slot.saturating_add_signed(delta);
    }

    /// Overwrite one seat's points.
    pub fn set(&mut self, seat: usize, score: SeatScore) {
        if let Some(slot) = self.scores.get_mut(seat) {
            *slot = score;
        }
    }

    /// Swap two opponents; their entered points move with them.
    pub fn swap_opponents(&mut self, a: usize, b: usize) -> bool {
        if a >= SEATS || b >= SEATS {
            return false;
        }
        self.lineup2.swap(a, b);
        self.scores.swap(a, b);
        true
    }

    /// Two-tap re-seating: the first pick selects a seat, picking it again
    /// cancels, picking another seat swaps the two.
    ///
    /// Returns the swapped pair when a swap happened.
    pub fn pick_opponent(&mut self, seat: usize) -> Option<(usize, usize)> {
        if seat >= SEATS {
            return None;
        }
        match self.selected.take() {
            None => {
                self.selected = Some(seat);
                None
            }
            Some(first) if first == seat => None,
            Some(first) => {
                self.swap_opponents(first, seat);
                Some((first, seat))
            }
        }
    }

    /// Seat currently selected for a swap.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Sum of entered points per side.
    pub fn totals(&self) -> (u64, u64) {
        self.scores
            .iter()
            .fold((0, 0), |(t1, t2), &(s1, s2)| (t1 + u64::from(s1), t2 + u64::from(s2)))
    }

    /// Team 1 total minus team 2 total.
    pub fn net_diff(&self) -> i64 {
        let (t1, t2) = self.totals();
        // Three u32 seats always fit in i64
        t1 as i64 - t2 as i64
    }

    /// Zero every seat, keeping the seating.
    pub fn clear_scores(&mut self) {
        self.scores = [(0, 0); SEATS];
        self.selected = None;
    }

    /// Build the round record from the current seating and scores.
    pub fn to_round(&self) -> DuelRound {
        DuelRound(std::array::from_fn(|i| DuelResult {
            p1_id: self.lineup1[i].clone(),
            p2_id: self.lineup2[i].clone(),
            s1: self.scores[i].0,
            s2: self.scores[i].1,
        }))
    }

    /// Does this sheet seat exactly the match's players?
    fn matches_teams(&self, state: &MatchState) -> bool {
        let same_seats = self.lineup1.iter().eq(state.team1.player_ids.iter());
        let same_players = state.team2.player_ids.len() == SEATS
            && self.lineup2.iter().all(|id| state.team2.has_player(id))
            && state.team2.player_ids.iter().all(|id| self.lineup2.contains(id));
        same_seats && same_players
    }
}

fn lineup(ids: &[PlayerId]) -> Option<[PlayerId; SEATS]> {
    ids.to_vec().try_into().ok()
}

// =============================================================================
// RESOLUTION
// =============================================================================

/// Result of a resolved duel round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DuelResolution {
    /// Round as appended to the match log
    pub round: DuelRound,
    /// Team 1 round total
    pub total1: u64,
    /// Team 2 round total
    pub total2: u64,
    /// Points credited to team 1
    pub delta1: u32,
    /// Points credited to team 2
    pub delta2: u32,
}

/// Net credit of a round: the winner gains the difference, a tie gains nothing.
///
/// Differences past `u32::MAX` saturate; the match clamp caps them anyway.
pub fn net_credit(total1: u64, total2: u64) -> (u32, u32) {
    let clamp = |diff: u64| u32::try_from(diff).unwrap_or(u32::MAX);
    if total1 > total2 {
        (clamp(total1 - total2), 0)
    } else {
        (0, clamp(total2 - total1))
    }
}

/// Resolve a duel round with the match seating.
///
/// Returns `None` unless both teams seat three players.
pub fn resolve_duel_round(
    state: &mut MatchState,
    ledger: &mut UndoLedger,
    seat_scores: [SeatScore; SEATS],
) -> Option<DuelResolution> {
    let mut sheet = DuelSheet::for_match(state)?;
    sheet.scores = seat_scores;
    resolve_sheet(state, ledger, &sheet)
}

/// Resolve a duel round from a filled sheet.
///
/// Appends the round, credits the net difference (capped at the target),
/// sets the pica gate and records the action in the ledger. Returns `None`
/// when the sheet does not seat the match's players.
pub fn resolve_sheet(
    state: &mut MatchState,
    ledger: &mut UndoLedger,
    sheet: &DuelSheet,
) -> Option<DuelResolution> {
    if !sheet.matches_teams(state) {
        return None;
    }

    let round = sheet.to_round();
    let (total1, total2) = round.totals();
    let (delta1, delta2) = net_credit(total1, total2);

    state.append_round(round.clone());
    state.add_points(delta1, delta2);
    state.next_hand_is_pica = true;
    ledger.record(UndoEntry { delta1, delta2, was_pica: true });

    Some(DuelResolution { round, total1, total2, delta1, delta2 })
}

// =============================================================================
// TESTS
// =============================================================================
