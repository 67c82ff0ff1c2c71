//! Game Over Evaluation
//!
//! A match is over as soon as either side reaches the target. The loser
//! "duerme afuera" (sleeps outside) when they finished under the penalty
//! threshold. That threshold is the same for 15 and 30 point matches.

use serde::{Serialize, Deserialize};

use crate::config::EngineConfig;
use crate::game::state::{MatchState, Side};

/// Final result of a finished match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameOutcome {
    /// Winning side
    pub winner: Side,
    /// Winner's score
    pub winner_score: u32,
    /// Loser's score
    pub loser_score: u32,
    /// Loser finished under the penalty threshold
    pub loser_sleeps_outside: bool,
}

impl GameOutcome {
    /// Losing side.
    pub fn loser(&self) -> Side {
        self.winner.opponent()
    }
}

/// Evaluate a match. `None` while it is still in progress.
///
/// Team 1 wins whenever it reached the target, so a state where both sides
/// sit on the target is credited to team 1.
pub fn evaluate(state: &MatchState, config: &EngineConfig) -> Option<GameOutcome> {
    if !state.is_over() {
        return None;
    }

    let winner = if state.score1 >= state.max_points.value() {
        Side::Team1
    } else {
        Side::Team2
    };
    let loser_score = state.score1.min(state.score2);

    Some(GameOutcome {
        winner,
        winner_score: state.score(winner),
        loser_score: state.score(winner.opponent()),
        loser_sleeps_outside: loser_score < config.loser_penalty_threshold,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use crate::game::roster::Team;
    use crate::game::state::MaxPoints;

    fn state(max: MaxPoints, score1: u32, score2: u32) -> MatchState {
        let mut s = MatchState::new(Team::new("t1", "Uno"), Team::new("t2", "Dos"), max);
        s.score1 = score1;
        s.score2 = score2;
        s
    }

    #[test]
    fn test_in_progress_has_no_outcome() {
        let config = EngineConfig::default();
        assert!(evaluate(&state(MaxPoints::Thirty, 29, 29), &config).is_none());
    }

    #[test]
    fn test_thirty_twelve_sleeps_outside() {
        let config = EngineConfig::default();
        let outcome = evaluate(&state(MaxPoints::Thirty, 30, 12), &config).unwrap();
        assert_eq!(outcome.winner, Side::Team1);
        assert_eq!(outcome.loser(), Side::Team2);
        assert_eq!((outcome.winner_score, outcome.loser_score), (30, 12));
        assert!(outcome.loser_sleeps_outside);
    }

    #[test]
    fn test_team2_win_in_buenas() {
        let config = EngineConfig::default();
        let outcome = evaluate(&state(MaxPoints::Thirty, 17, 30), &config).unwrap();
        assert_eq!(outcome.winner, Side::Team2);
        assert!(!outcome.loser_sleeps_outside);
    }

    #[test]
    fn test_fifteen_point_match_uses_same_threshold() {
        let config = EngineConfig::default();
        // Any loser of a 15-point match is under 15
        let outcome = evaluate(&state(MaxPoints::Fifteen, 14, 15), &config).unwrap();
        assert_eq!(outcome.winner, Side::Team2);
        assert!(outcome.loser_sleeps_outside);
    }

    proptest! {
        #[test]
        fn prop_penalty_ignores_target(
            loser in 0u32..30,
            fifteen in any::<bool>(),
        ) {
            let max = if fifteen { MaxPoints::Fifteen } else { MaxPoints::Thirty };
            let loser = loser.min(max.value() - 1);
            let config = EngineConfig::default();

            let outcome = evaluate(&state(max, max.value(), loser), &config).unwrap();
            prop_assert_eq!(outcome.loser_sleeps_outside, loser < 15);
        }
    }
}
