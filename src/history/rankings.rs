//! Rankings
//!
//! Derived from the full history on every call. Nothing is cached, so a
//! deleted record simply stops contributing.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::ids::PlayerId;
use crate::game::roster::Roster;
use crate::history::record::CompletedMatch;

/// Aggregate for one team name.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRanking {
    /// Team name as recorded
    pub name: String,
    /// Matches played
    pub games: u32,
    /// Matches won
    pub wins: u32,
    /// Sum of own final scores
    pub total_points: u32,
    /// `wins / games * 100`
    pub win_rate: f64,
}

/// Duel aggregate for one player.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDuelStats {
    /// Player ID
    pub player_id: PlayerId,
    /// Current display name
    pub name: String,
    /// Points scored across all duels
    pub points: u32,
    /// Duels won outright
    pub wins: u32,
    /// Duels played
    pub duels: u32,
    /// Best single-duel score
    pub max_in_one: u32,
    /// `wins / duels * 100`, 0 without duels
    pub win_rate: f64,
}

/// Everything the leaderboard shows.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rankings {
    /// Teams by wins, then win rate
    pub teams: Vec<TeamRanking>,
    /// Players by duel points
    pub players: Vec<PlayerDuelStats>,
    /// Highest duel win rate
    pub most_effective: Option<PlayerDuelStats>,
    /// Most duels played
    pub most_combative: Option<PlayerDuelStats>,
}

#[derive(Default)]
struct DuelTally {
    points: u32,
    wins: u32,
    duels: u32,
    max_in_one: u32,
}

impl DuelTally {
    fn add(&mut self, own: u32, opponent: u32) {
        self.points = self.points.saturating_add(own);
        self.duels += 1;
        if own > opponent {
            self.wins += 1;
        }
        self.max_in_one = self.max_in_one.max(own);
    }
}

fn percent(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        f64::from(part) / f64::from(whole) * 100.0
    }
}

/// Team rankings grouped by the team name stored on each record.
pub fn team_rankings(history: &[CompletedMatch]) -> Vec<TeamRanking> {
    let mut by_name: BTreeMap<&str, (u32, u32, u32)> = BTreeMap::new();

    for record in history {
        for (name, score) in [
            (record.team1_name.as_str(), record.score1),
            (record.team2_name.as_str(), record.score2),
        ] {
            let entry = by_name.entry(name).or_default();
            entry.0 += 1;
            entry.2 += score;
            if record.winner_name == name {
                entry.1 += 1;
            }
        }
    }

    let mut teams: Vec<TeamRanking> = by_name
        .into_iter()
        .map(|(name, (games, wins, total_points))| TeamRanking {
            name: name.to_string(),
            games,
            wins,
            total_points,
            win_rate: percent(wins, games),
        })
        .collect();

    teams.sort_by(|a, b| {
        b.wins
            .cmp(&a.wins)
            .then_with(|| b.win_rate.total_cmp(&a.win_rate))
    });
    teams
}

/// Per-player duel stats, ordered by points.
pub fn player_rankings(history: &[CompletedMatch], roster: &Roster) -> Vec<PlayerDuelStats> {
    let mut by_player: BTreeMap<&PlayerId, DuelTally> = BTreeMap::new();

    for duel in history.iter().flat_map(|r| &r.duel_rounds).flat_map(|round| round.duels()) {
        by_player.entry(&duel.p1_id).or_default().add(duel.s1, duel.s2);
        by_player.entry(&duel.p2_id).or_default().add(duel.s2, duel.s1);
    }

    let mut players: Vec<PlayerDuelStats> = by_player
        .into_iter()
        .map(|(id, tally)| PlayerDuelStats {
            player_id: id.clone(),
            name: roster.player_name(id).to_string(),
            points: tally.points,
            wins: tally.wins,
            duels: tally.duels,
            max_in_one: tally.max_in_one,
            win_rate: percent(tally.wins, tally.duels),
        })
        .collect();

    players.sort_by(|a, b| b.points.cmp(&a.points));
    players
}

/// First entry holding the strict maximum of `key`, in the order given.
fn leader<F>(players: &[PlayerDuelStats], key: F) -> Option<PlayerDuelStats>
where
    F: Fn(&PlayerDuelStats, &PlayerDuelStats) -> std::cmp::Ordering,
{
    players
        .iter()
        .reduce(|best, p| if key(p, best).is_gt() { p } else { best })
        .cloned()
}

/// Compute every ranking from the history.
pub fn compute_rankings(history: &[CompletedMatch], roster: &Roster) -> Rankings {
    let teams = team_rankings(history);
    let players = player_rankings(history, roster);
    let most_effective = leader(&players, |a, b| a.win_rate.total_cmp(&b.win_rate));
    let most_combative = leader(&players, |a, b| a.duels.cmp(&b.duels));

    Rankings { teams, players, most_effective, most_combative }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::duel::{DuelResult, DuelRound};
    use crate::game::roster::{Player, UNKNOWN_PLAYER};
    use crate::history::record::tests::record;

    fn duel(p1: &str, p2: &str, s1: u32, s2: u32) -> DuelResult {
        DuelResult { p1_id: p1.into(), p2_id: p2.into(), s1, s2 }
    }

    fn roster() -> Roster {
        Roster {
            players: vec![
                Player::new("a", "Ana"),
                Player::new("b", "Beto"),
                Player::new("c", "Caro"),
            ],
            teams: Vec::new(),
        }
    }

    #[test]
    fn test_empty_history() {
        let rankings = compute_rankings(&[], &Roster::default());
        assert!(rankings.teams.is_empty());
        assert!(rankings.players.is_empty());
        assert!(rankings.most_effective.is_none());
        assert!(rankings.most_combative.is_none());
    }

    #[test]
    fn test_team_rankings_by_wins_then_rate() {
        let mut r1 = record("game-1", "Nosotros", "Ellos", 1);
        r1.score2 = 12;
        let r2 = record("game-2", "Ellos", "Nosotros", 2);
        let r3 = record("game-3", "Nosotros", "Otros", 3);

        let teams = team_rankings(&[r1, r2, r3]);
        assert_eq!(teams[0].name, "Nosotros");
        assert_eq!((teams[0].games, teams[0].wins), (3, 2));
        assert_eq!(teams[0].total_points, 30 + 10 + 30);

        // Ellos and Otros: Ellos has 1 win, Otros none
        assert_eq!(teams[1].name, "Ellos");
        assert_eq!(teams[1].total_points, 12 + 30);
        assert!((teams[1].win_rate - 50.0).abs() < 1e-9);
        assert_eq!(teams[2].name, "Otros");
        assert_eq!(teams[2].win_rate, 0.0);
    }

    #[test]
    fn test_equal_wins_break_on_rate() {
        let r1 = record("game-1", "A", "B", 1);
        let r2 = record("game-2", "B", "C", 2);
        let r3 = record("game-3", "C", "B", 3);

        // A: 1/1, B: 1/3, C: 1/2
        let names: Vec<_> = team_rankings(&[r1, r2, r3]).into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["A", "C", "B"]);
    }

    #[test]
    fn test_player_duel_stats() {
        let mut r = record("game-1", "A", "B", 1);
        r.duel_rounds = vec![
            DuelRound([duel("a", "b", 3, 1), duel("c", "x", 0, 0), duel("a", "b", 1, 2)]),
        ];

        let rankings = compute_rankings(&[r], &roster());
        let a = rankings.players.iter().find(|p| p.player_id.as_str() == "a").unwrap();
        assert_eq!((a.points, a.wins, a.duels, a.max_in_one), (4, 1, 2, 3));
        assert!((a.win_rate - 50.0).abs() < 1e-9);

        let b = rankings.players.iter().find(|p| p.player_id.as_str() == "b").unwrap();
        assert_eq!((b.points, b.wins, b.duels), (3, 1, 2));

        // Tie counts as a duel but not a win
        let c = rankings.players.iter().find(|p| p.player_id.as_str() == "c").unwrap();
        assert_eq!((c.wins, c.duels), (0, 1));

        let x = rankings.players.iter().find(|p| p.player_id.as_str() == "x").unwrap();
        assert_eq!(x.name, UNKNOWN_PLAYER);

        assert_eq!(rankings.players[0].name, "Ana");
    }

    #[test]
    fn test_leaders() {
        let mut r = record("game-1", "A", "B", 1);
        r.duel_rounds = vec![
            DuelRound([duel("a", "b", 5, 0), duel("c", "b", 1, 0), duel("c", "b", 1, 0)]),
        ];

        let rankings = compute_rankings(&[r], &roster());
        // a leads on points; a and c both 100%, a comes first
        assert_eq!(rankings.most_effective.unwrap().name, "Ana");
        // b played three duels
        assert_eq!(rankings.most_combative.unwrap().name, "Beto");
    }

    #[test]
    fn test_deleted_record_stops_counting() {
        let r1 = record("game-1", "A", "B", 1);
        let r2 = record("game-2", "A", "B", 2);
        let mut history = vec![r1, r2];
        history.retain(|r| r.id.as_str() != "game-1");

        let teams = team_rankings(&history);
        assert_eq!(teams[0].wins, 1);
    }
}
