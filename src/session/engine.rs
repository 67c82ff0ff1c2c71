//! Scoring Session
//!
//! Owns the roster, the active match, the undo ledger and the history, and
//! exposes every scoring operation. Guards run before anything is touched:
//! a rejected call leaves the session exactly as it was.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::{EngineConfig, SEATS};
use crate::core::ids::{RecordId, TeamId};
use crate::game::duel::{self, DuelSheet, SeatScore};
use crate::game::events::{ScoreEvent, ScoreEventData};
use crate::game::hand::{self, PendingHand};
use crate::game::outcome::{self, GameOutcome};
use crate::game::roster::{Roster, SeedData};
use crate::game::state::{MatchState, MaxPoints};
use crate::game::undo::UndoLedger;
use crate::history::rankings::{compute_rankings, Rankings};
use crate::history::record::{CompletedMatch, MatchHistory};

/// Scoring session for one device.
#[derive(Clone, Debug)]
pub struct ScoringSession {
    /// Rule thresholds.
    pub(crate) config: EngineConfig,
    /// Players and teams.
    pub(crate) roster: Roster,
    /// Match being played, if any.
    pub(crate) current: Option<MatchState>,
    /// Last scoring action.
    pub(crate) ledger: UndoLedger,
    /// Completed matches.
    pub(crate) history: MatchHistory,
    /// Scoring actions applied to the current match.
    pub(crate) hands: u32,
}

impl ScoringSession {
    /// Create a session from caller-supplied seed data and an empty history.
    pub fn new(config: EngineConfig, seed: SeedData) -> Self {
        let history = MatchHistory::new(config.history_capacity);
        Self {
            config,
            roster: Roster::from_seed(seed),
            current: None,
            ledger: UndoLedger::new(),
            history,
            hands: 0,
        }
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Rule thresholds.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Players and teams.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Mutable roster, for player and team management.
    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    /// The match being played.
    pub fn current(&self) -> Option<&MatchState> {
        self.current.as_ref()
    }

    /// Completed matches.
    pub fn history(&self) -> &MatchHistory {
        &self.history
    }

    /// Is there an action to undo?
    pub fn can_undo(&self) -> bool {
        self.current.is_some() && !self.ledger.is_empty()
    }

    /// Must the next action be a duel round?
    pub fn is_duel_turn(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|s| !s.is_over() && s.is_duel_turn(&self.config))
    }

    /// Final result, once a side has reached the target.
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.current
            .as_ref()
            .and_then(|s| outcome::evaluate(s, &self.config))
    }

    /// Team and player leaderboards over the full history.
    pub fn compute_rankings(&self) -> Rankings {
        compute_rankings(self.history.records(), &self.roster)
    }

    // =========================================================================
    // MATCH LIFECYCLE
    // =========================================================================

    /// Start a match between two roster teams at 0-0.
    ///
    /// Team seating is copied into the match; later roster edits do not
    /// reach a match already in progress.
    pub fn start_match(
        &mut self,
        team1: &TeamId,
        team2: &TeamId,
        max_points: MaxPoints,
    ) -> Result<ScoreEvent, EngineError> {
        if self.current.is_some() {
            return Err(EngineError::MatchAlreadyActive);
        }
        if team1 == team2 {
            return Err(EngineError::SameTeam);
        }
        let t1 = self.roster.team(team1).ok_or_else(|| EngineError::TeamNotFound(team1.clone()))?;
        let t2 = self.roster.team(team2).ok_or_else(|| EngineError::TeamNotFound(team2.clone()))?;

        let state = MatchState::new(t1.clone(), t2.clone(), max_points);
        info!("Match started: {} vs {} to {}", state.team1.name, state.team2.name, max_points);

        let event = ScoreEvent::new(0, ScoreEventData::MatchStarted {
            team1: state.team1.name.clone(),
            team2: state.team2.name.clone(),
            max_points: max_points.value(),
        });
        self.current = Some(state);
        self.ledger.clear();
        self.hands = 0;
        Ok(event)
    }

    /// Commit an ordinary hand. Negative inputs count as zero.
    ///
    /// Also reports [`ScoreEventData::MatchEnded`] when the hand reaches the
    /// target.
    pub fn confirm_hand(&mut self, raw1: i32, raw2: i32) -> Result<Vec<ScoreEvent>, EngineError> {
        let (delta1, delta2) = (clamp_points(raw1), clamp_points(raw2));
        let state = playable(&mut self.current)?;
        if state.is_duel_turn(&self.config) {
            debug!("Hand rejected: duel turn pending");
            return Err(EngineError::DuelTurnPending);
        }
        if delta1 == 0 && delta2 == 0 {
            return Err(EngineError::EmptyHand);
        }

        let res = hand::confirm_hand(state, &mut self.ledger, delta1, delta2);
        self.hands += 1;
        info!("Hand {}: +{} / +{} -> {}-{}", self.hands, delta1, delta2, res.score1, res.score2);

        let mut events = vec![ScoreEvent::hand_confirmed(
            self.hands, delta1, delta2, res.score1, res.score2,
        )];
        events.extend(self.ended_event());
        Ok(events)
    }

    /// Commit the points gathered in a pending hand, clearing it on success.
    pub fn confirm_pending(&mut self, pending: &mut PendingHand) -> Result<Vec<ScoreEvent>, EngineError> {
        let raw1 = i32::try_from(pending.delta1).unwrap_or(i32::MAX);
        let raw2 = i32::try_from(pending.delta2).unwrap_or(i32::MAX);
        let events = self.confirm_hand(raw1, raw2)?;
        pending.clear();
        Ok(events)
    }

    /// Open a duel sheet for the current duel turn.
    pub fn open_duel_sheet(&self) -> Result<DuelSheet, EngineError> {
        let state = self.current.as_ref().ok_or(EngineError::NoActiveMatch)?;
        if state.is_over() {
            return Err(EngineError::MatchOver);
        }
        if !state.is_duel_turn(&self.config) {
            return Err(EngineError::NotDuelTurn);
        }
        DuelSheet::for_match(state).ok_or(EngineError::NotDuelTurn)
    }

    /// Resolve a duel round from raw per-seat points, in seat order.
    ///
    /// Exactly one pair per seat is required. Negative inputs count as zero.
    pub fn resolve_duel_round(&mut self, seat_scores: &[(i32, i32)]) -> Result<Vec<ScoreEvent>, EngineError> {
        if seat_scores.len() != SEATS {
            return Err(EngineError::SeatCount { expected: SEATS, got: seat_scores.len() });
        }
        let scores: [SeatScore; SEATS] =
            std::array::from_fn(|i| (clamp_points(seat_scores[i].0), clamp_points(seat_scores[i].1)));

        let mut sheet = self.open_duel_sheet()?;
        sheet.scores = scores;
        self.submit_duel_sheet(&sheet)
    }

    /// Resolve a duel round from a filled sheet.
    pub fn submit_duel_sheet(&mut self, sheet: &DuelSheet) -> Result<Vec<ScoreEvent>, EngineError> {
        self.open_duel_sheet()?;
        let state = self.current.as_mut().ok_or(EngineError::NoActiveMatch)?;

        let res = duel::resolve_sheet(state, &mut self.ledger, sheet).ok_or_else(|| {
            debug!("Duel sheet rejected: seating does not match the teams");
            EngineError::SheetMismatch
        })?;
        self.hands += 1;
        info!(
            "Duel round {}: {}-{} -> +{} / +{} -> {}-{}",
            state.duel_rounds.len(), res.total1, res.total2,
            res.delta1, res.delta2, state.score1, state.score2
        );

        let mut events = vec![ScoreEvent::new(self.hands, ScoreEventData::DuelRoundResolved {
            round: res.round,
            delta1: res.delta1,
            delta2: res.delta2,
            score1: state.score1,
            score2: state.score2,
        })];
        events.extend(self.ended_event());
        Ok(events)
    }

    /// Reverse the last hand or duel round.
    ///
    /// Works on a finished match too, which reopens it.
    pub fn undo(&mut self) -> Result<ScoreEvent, EngineError> {
        let state = self.current.as_mut().ok_or(EngineError::NoActiveMatch)?;
        let entry = self.ledger.undo(state).ok_or(EngineError::NothingToUndo)?;
        self.hands = self.hands.saturating_sub(1);
        info!("Undo: -{} / -{} -> {}-{}", entry.delta1, entry.delta2, state.score1, state.score2);

        Ok(ScoreEvent::new(self.hands, ScoreEventData::HandUndone {
            delta1: entry.delta1,
            delta2: entry.delta2,
            was_pica: entry.was_pica,
            score1: state.score1,
            score2: state.score2,
        }))
    }

    /// Record the finished match and close the session.
    pub fn finalize(&mut self, notes: Option<String>) -> Result<ScoreEvent, EngineError> {
        let record_id = self.record_finished(notes)?;
        self.current = None;
        self.ledger.clear();
        let event = ScoreEvent::new(self.hands, ScoreEventData::MatchFinalized { record_id });
        self.hands = 0;
        Ok(event)
    }

    /// Record the finished match and restart the same pairing at 0-0.
    pub fn rematch(&mut self, notes: Option<String>) -> Result<ScoreEvent, EngineError> {
        let record_id = self.record_finished(notes)?;
        if let Some(state) = self.current.as_mut() {
            state.reset_progress();
            // Pick up the win just credited
            for team in [&mut state.team1, &mut state.team2] {
                if let Some(stored) = self.roster.team(&team.id) {
                    team.wins = stored.wins;
                }
            }
        }
        self.ledger.clear();
        let event = ScoreEvent::new(self.hands, ScoreEventData::RematchStarted { record_id });
        self.hands = 0;
        info!("Rematch started");
        Ok(event)
    }

    /// Zero the score without writing history.
    pub fn reset_progress(&mut self) -> Result<ScoreEvent, EngineError> {
        let state = self.current.as_mut().ok_or(EngineError::NoActiveMatch)?;
        state.reset_progress();
        self.ledger.clear();
        self.hands = 0;
        info!("Progress reset");
        Ok(ScoreEvent::new(0, ScoreEventData::ProgressReset))
    }

    /// Drop the current match without writing history.
    pub fn discard_match(&mut self) -> Result<ScoreEvent, EngineError> {
        if self.current.take().is_none() {
            return Err(EngineError::NoActiveMatch);
        }
        self.ledger.clear();
        let event = ScoreEvent::new(self.hands, ScoreEventData::MatchDiscarded);
        self.hands = 0;
        info!("Match discarded");
        Ok(event)
    }

    /// Delete a completed match and take one win back from its winner.
    ///
    /// Unknown ids are skipped silently.
    pub fn delete_completed_match(&mut self, id: &RecordId) -> Option<ScoreEvent> {
        let Some(record) = self.history.remove(id) else {
            debug!("Delete skipped: no record {}", id);
            return None;
        };
        if !self.roster.revoke_win(&record.winner_name) {
            warn!("Deleted record {} names unknown winner {}", id, record.winner_name);
        }
        info!("Deleted record {} (winner {})", id, record.winner_name);

        Some(ScoreEvent::new(self.hands, ScoreEventData::RecordDeleted {
            record_id: record.id,
            winner_name: record.winner_name,
        }))
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn ended_event(&self) -> Option<ScoreEvent> {
        let outcome = self.outcome()?;
        info!(
            "Match over: {}-{}, loser sleeps outside: {}",
            outcome.winner_score, outcome.loser_score, outcome.loser_sleeps_outside
        );
        Some(ScoreEvent::match_ended(self.hands, outcome))
    }

    /// Append the finished match to history and credit the winner.
    fn record_finished(&mut self, notes: Option<String>) -> Result<RecordId, EngineError> {
        let state = self.current.as_ref().ok_or(EngineError::NoActiveMatch)?;
        let outcome = outcome::evaluate(state, &self.config).ok_or(EngineError::MatchNotOver)?;

        let record = CompletedMatch::from_match(state, &outcome, notes, Utc::now());
        let record_id = record.id.clone();
        let winner_id = state.team(outcome.winner).id.clone();

        if !self.roster.record_win(&winner_id) {
            warn!("Winner {} is no longer in the roster", record.winner_name);
        }
        info!("Recorded {} ({} won {}-{})", record_id, record.winner_name, outcome.winner_score, outcome.loser_score);

        for evicted in self.history.push(record) {
            debug!("History full, evicted {}", evicted.id);
        }
        Ok(record_id)
    }
}

/// Current match, if it still accepts points.
fn playable(current: &mut Option<MatchState>) -> Result<&mut MatchState, EngineError> {
    let state = current.as_mut().ok_or(EngineError::NoActiveMatch)?;
    if state.is_over() {
        debug!("Action rejected: match over");
        return Err(EngineError::MatchOver);
    }
    Ok(state)
}

/// Raw point input, negatives count as zero.
fn clamp_points(raw: i32) -> u32 {
    u32::try_from(raw).unwrap_or(0)
}

// =============================================================================
// ERRORS
// =============================================================================

/// Engine errors. The session is unchanged whenever one is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// No match is being played.
    #[error("No active match")]
    NoActiveMatch,

    /// A side already reached the target.
    #[error("Match is over")]
    MatchOver,

    /// Finalizing needs a finished match.
    #[error("Match is not over")]
    MatchNotOver,

    /// Next action must be a duel round.
    #[error("Duel round pending")]
    DuelTurnPending,

    /// Duel rounds are not being played right now.
    #[error("Not a duel turn")]
    NotDuelTurn,

    /// Hand gives no points to anyone.
    #[error("Empty hand")]
    EmptyHand,

    /// Wrong number of seat scores.
    #[error("Expected {expected} seat scores, got {got}")]
    SeatCount {
        /// Seats per team
        expected: usize,
        /// Pairs supplied
        got: usize,
    },

    /// Duel sheet seats players outside the match.
    #[error("Duel sheet does not match the teams")]
    SheetMismatch,

    /// Ledger is empty.
    #[error("Nothing to undo")]
    NothingToUndo,

    /// A match is already being played.
    #[error("Match already active")]
    MatchAlreadyActive,

    /// Team is not in the roster.
    #[error("Team not found: {0}")]
    TeamNotFound(TeamId),

    /// Both sides are the same team.
    #[error("A team cannot play itself")]
    SameTeam,
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use crate::game::roster::{Player, Team};
    use crate::game::state::{MatchPhase, Side};

    fn seed() -> SeedData {
        let players = ["a0", "a1", "a2", "b0", "b1", "b2"]
            .iter()
            .map(|id| Player::new(*id, id.to_uppercase()))
            .collect();
        SeedData {
            players,
            teams: vec![
                Team::new("t1", "Nosotros").with_players(["a0", "a1", "a2"]),
                Team::new("t2", "Ellos").with_players(["b0", "b1", "b2"]),
                Team::new("t3", "Pareja").with_players(["a0", "b0"]),
            ],
        }
    }

    fn session() -> ScoringSession {
        ScoringSession::new(EngineConfig::default(), seed())
    }

    fn started(team2: &str, max: MaxPoints) -> ScoringSession {
        let mut s = session();
        s.start_match(&"t1".into(), &team2.into(), max).unwrap();
        s
    }

    fn scores(s: &ScoringSession) -> (u32, u32) {
        let state = s.current().unwrap();
        (state.score1, state.score2)
    }

    fn set_scores(s: &mut ScoringSession, score1: u32, score2: u32) {
        let state = s.current.as_mut().unwrap();
        state.score1 = score1;
        state.score2 = score2;
    }

    #[test]
    fn test_start_match_guards() {
        let mut s = session();
        assert_eq!(
            s.start_match(&"t1".into(), &"t1".into(), MaxPoints::Thirty),
            Err(EngineError::SameTeam)
        );
        assert_eq!(
            s.start_match(&"t1".into(), &"zz".into(), MaxPoints::Thirty),
            Err(EngineError::TeamNotFound("zz".into()))
        );
        assert!(s.current().is_none());

        s.start_match(&"t1".into(), &"t2".into(), MaxPoints::Fifteen).unwrap();
        assert_eq!(
            s.start_match(&"t1".into(), &"t2".into(), MaxPoints::Thirty),
            Err(EngineError::MatchAlreadyActive)
        );
        assert_eq!(s.current().unwrap().max_points, MaxPoints::Fifteen);
    }

    #[test]
    fn test_operations_need_a_match() {
        let mut s = session();
        assert_eq!(s.confirm_hand(1, 0), Err(EngineError::NoActiveMatch));
        assert_eq!(s.undo(), Err(EngineError::NoActiveMatch));
        assert_eq!(s.finalize(None), Err(EngineError::NoActiveMatch));
        assert_eq!(s.reset_progress(), Err(EngineError::NoActiveMatch));
        assert_eq!(s.discard_match(), Err(EngineError::NoActiveMatch));
        assert_eq!(
            s.resolve_duel_round(&[(0, 0); 3]),
            Err(EngineError::NoActiveMatch)
        );
    }

    #[test]
    fn test_scenario_two_hands_then_undo() {
        let mut s = started("t3", MaxPoints::Thirty);
        s.confirm_hand(2, 0).unwrap();
        s.confirm_hand(0, 4).unwrap();
        assert_eq!(scores(&s), (2, 4));

        let event = s.undo().unwrap();
        assert_eq!(scores(&s), (2, 0));
        assert_eq!(event.hand, 1);
        assert_eq!(s.undo(), Err(EngineError::NothingToUndo));
    }

    #[test]
    fn test_empty_and_negative_hands() {
        let mut s = started("t3", MaxPoints::Thirty);
        assert_eq!(s.confirm_hand(0, 0), Err(EngineError::EmptyHand));
        assert_eq!(s.confirm_hand(-3, 0), Err(EngineError::EmptyHand));

        s.confirm_hand(-2, 3).unwrap();
        assert_eq!(scores(&s), (0, 3));
    }

    #[test]
    fn test_duel_turn_blocks_hands() {
        let mut s = started("t2", MaxPoints::Thirty);
        s.confirm_hand(5, 1).unwrap();
        assert!(s.is_duel_turn());

        assert_eq!(s.confirm_hand(1, 0), Err(EngineError::DuelTurnPending));
        assert_eq!(scores(&s), (5, 1));
    }

    #[test]
    fn test_scenario_duel_from_five_one() {
        let mut s = started("t2", MaxPoints::Thirty);
        s.confirm_hand(5, 1).unwrap();

        let events = s.resolve_duel_round(&[(1, 0), (0, 1), (2, 0)]).unwrap();
        assert_eq!(scores(&s), (7, 1));
        assert!(s.current().unwrap().next_hand_is_pica);
        assert!(!s.is_duel_turn());
        assert!(matches!(
            events[0].data,
            ScoreEventData::DuelRoundResolved { delta1: 2, delta2: 0, .. }
        ));

        // Gate alternates back after an ordinary hand
        assert_eq!(s.resolve_duel_round(&[(0, 0); 3]), Err(EngineError::NotDuelTurn));
        s.confirm_hand(1, 0).unwrap();
        assert!(s.is_duel_turn());
    }

    #[test]
    fn test_huge_duel_scores_end_match_at_target() {
        let mut s = started("t2", MaxPoints::Thirty);
        s.confirm_hand(5, 0).unwrap();

        let events = s.resolve_duel_round(&[(i32::MAX, 0); 3]).unwrap();
        assert_eq!(scores(&s), (30, 0));
        assert!(events.iter().any(|e| matches!(e.data, ScoreEventData::MatchEnded { .. })));
        assert!(s.outcome().is_some());
    }

    #[test]
    fn test_seat_count_checked_first() {
        let mut s = started("t2", MaxPoints::Thirty);
        s.confirm_hand(5, 0).unwrap();
        assert_eq!(
            s.resolve_duel_round(&[(1, 0), (0, 1)]),
            Err(EngineError::SeatCount { expected: 3, got: 2 })
        );
        assert!(s.current().unwrap().duel_rounds.is_empty());
    }

    #[test]
    fn test_no_duels_without_full_teams() {
        let mut s = started("t3", MaxPoints::Thirty);
        s.confirm_hand(6, 0).unwrap();
        assert!(!s.is_duel_turn());
        assert_eq!(s.open_duel_sheet(), Err(EngineError::NotDuelTurn));
        s.confirm_hand(1, 0).unwrap();
    }

    #[test]
    fn test_swapped_sheet_submission() {
        let mut s = started("t2", MaxPoints::Thirty);
        s.confirm_hand(5, 0).unwrap();

        let mut sheet = s.open_duel_sheet().unwrap();
        sheet.pick_opponent(0);
        sheet.pick_opponent(2);
        sheet.set(0, (0, 3));
        s.submit_duel_sheet(&sheet).unwrap();

        let round = &s.current().unwrap().duel_rounds[0];
        assert_eq!(round.duels()[0].p2_id.as_str(), "b2");
        assert_eq!(scores(&s), (5, 3));
    }

    #[test]
    fn test_duel_undo_reopens_turn() {
        let mut s = started("t2", MaxPoints::Thirty);
        s.confirm_hand(5, 0).unwrap();
        s.resolve_duel_round(&[(3, 0), (0, 0), (0, 0)]).unwrap();

        let event = s.undo().unwrap();
        assert!(matches!(event.data, ScoreEventData::HandUndone { was_pica: true, .. }));
        assert_eq!(scores(&s), (5, 0));
        assert!(s.is_duel_turn());
        assert_eq!(s.current().unwrap().duel_rounds.len(), 1);
    }

    #[test]
    fn test_hand_reaching_target_ends_match() {
        let mut s = started("t3", MaxPoints::Thirty);
        set_scores(&mut s, 28, 12);

        let events = s.confirm_hand(5, 0).unwrap();
        assert_eq!(events.len(), 2);
        assert!(events[1].ends_match());
        assert_eq!(scores(&s), (30, 12));
        assert_eq!(s.current().unwrap().phase(), MatchPhase::Over);

        let outcome = s.outcome().unwrap();
        assert_eq!(outcome.winner, Side::Team1);
        assert!(outcome.loser_sleeps_outside);

        assert_eq!(s.confirm_hand(1, 0), Err(EngineError::MatchOver));
    }

    #[test]
    fn test_undo_reopens_finished_match() {
        let mut s = started("t3", MaxPoints::Fifteen);
        set_scores(&mut s, 13, 0);
        s.confirm_hand(3, 0).unwrap();
        assert!(s.outcome().is_some());

        s.undo().unwrap();
        assert_eq!(scores(&s), (12, 0));
        assert!(s.outcome().is_none());
    }

    #[test]
    fn test_finalize_records_and_closes() {
        let mut s = started("t3", MaxPoints::Thirty);
        assert_eq!(s.finalize(None), Err(EngineError::MatchNotOver));

        set_scores(&mut s, 20, 30);
        let event = s.finalize(Some("buen partido".into())).unwrap();

        assert!(s.current().is_none());
        assert!(!s.can_undo());
        assert_eq!(s.history().len(), 1);
        let record = &s.history().records()[0];
        assert_eq!(record.winner_name, "Pareja");
        assert_eq!(record.loser_sleeps_outside, Some(false));
        assert_eq!(record.notes.as_deref(), Some("buen partido"));
        assert!(matches!(event.data, ScoreEventData::MatchFinalized { ref record_id } if record_id == &record.id));
        assert_eq!(s.roster().team(&"t3".into()).unwrap().wins, 1);
    }

    #[test]
    fn test_rematch_keeps_teams() {
        let mut s = started("t2", MaxPoints::Thirty);
        s.confirm_hand(5, 0).unwrap();
        s.resolve_duel_round(&[(1, 0), (0, 0), (0, 0)]).unwrap();
        set_scores(&mut s, 30, 10);

        s.rematch(None).unwrap();
        let state = s.current().unwrap();
        assert_eq!((state.score1, state.score2), (0, 0));
        assert!(!state.next_hand_is_pica);
        assert!(state.duel_rounds.is_empty());
        assert_eq!(state.team1.id, TeamId::new("t1"));
        assert_eq!(state.team1.wins, 1);
        assert_eq!(s.history().records()[0].duel_rounds.len(), 1);
        assert_eq!(s.undo(), Err(EngineError::NothingToUndo));
    }

    #[test]
    fn test_reset_and_discard_skip_history() {
        let mut s = started("t2", MaxPoints::Thirty);
        s.confirm_hand(3, 2).unwrap();
        s.reset_progress().unwrap();
        assert_eq!(scores(&s), (0, 0));
        assert!(!s.can_undo());

        s.discard_match().unwrap();
        assert!(s.current().is_none());
        assert!(s.history().is_empty());
    }

    #[test]
    fn test_delete_completed_match_revokes_win() {
        let mut s = started("t3", MaxPoints::Fifteen);
        set_scores(&mut s, 15, 2);
        s.finalize(None).unwrap();
        let id = s.history().records()[0].id.clone();

        assert!(s.delete_completed_match(&"game-missing".into()).is_none());
        assert_eq!(s.history().len(), 1);

        let event = s.delete_completed_match(&id).unwrap();
        assert!(matches!(event.data, ScoreEventData::RecordDeleted { ref winner_name, .. } if winner_name == "Nosotros"));
        assert!(s.history().is_empty());
        assert_eq!(s.roster().team(&"t1".into()).unwrap().wins, 0);

        // Floors at zero
        s.history.push(crate::history::record::tests::record("game-x", "Nosotros", "Ellos", 1));
        s.delete_completed_match(&"game-x".into()).unwrap();
        assert_eq!(s.roster().team(&"t1".into()).unwrap().wins, 0);
    }

    #[test]
    fn test_rankings_follow_history() {
        let mut s = started("t2", MaxPoints::Fifteen);
        s.confirm_hand(5, 0).unwrap();
        s.resolve_duel_round(&[(2, 0), (0, 1), (0, 0)]).unwrap();
        set_scores(&mut s, 15, 4);
        s.finalize(None).unwrap();

        let rankings = s.compute_rankings();
        assert_eq!(rankings.teams[0].name, "Nosotros");
        assert_eq!(rankings.teams[0].wins, 1);
        assert_eq!(rankings.players[0].name, "A0");
        assert_eq!(rankings.players[0].points, 2);
    }

    #[test]
    fn test_confirm_pending_clears_on_success() {
        let mut s = started("t3", MaxPoints::Thirty);
        let mut pending = PendingHand::new();
        assert_eq!(s.confirm_pending(&mut pending), Err(EngineError::EmptyHand));

        pending.add(Side::Team2);
        pending.add(Side::Team2);
        s.confirm_pending(&mut pending).unwrap();
        assert!(pending.is_empty());
        assert_eq!(scores(&s), (0, 2));
    }

    proptest! {
        #[test]
        fn prop_scores_stay_in_range(
            hands in prop::collection::vec((-3i32..8, -3i32..8), 1..40),
            fifteen in any::<bool>(),
        ) {
            let max = if fifteen { MaxPoints::Fifteen } else { MaxPoints::Thirty };
            let mut s = started("t3", max);
            for (a, b) in hands {
                let _ = s.confirm_hand(a, b);
                let (s1, s2) = scores(&s);
                prop_assert!(s1 <= max.value() && s2 <= max.value());
            }
        }

        #[test]
        fn prop_rejected_calls_change_nothing(a in -5i32..5, b in -5i32..5) {
            let mut s = started("t2", MaxPoints::Thirty);
            s.confirm_hand(5, 0).unwrap();
            let before = s.current().cloned();
            prop_assert_eq!(s.confirm_hand(a, b), Err(EngineError::DuelTurnPending));
            prop_assert_eq!(s.current().cloned(), before);
        }
    }
}
