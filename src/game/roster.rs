//! Roster
//!
//! Master player list and teams. The engine reads it to attribute duels
//! and adjusts team win counters when matches are recorded or deleted.

use serde::{Serialize, Deserialize};

use crate::config::SEATS;
use crate::core::ids::{PlayerId, TeamId};

/// Display name used when a player id no longer resolves.
pub const UNKNOWN_PLAYER: &str = "Unknown";

/// Separator between player names in a lineup.
pub const LINEUP_SEPARATOR: &str = " · ";

// =============================================================================
// PLAYER / TEAM
// =============================================================================

/// A player from the master list. Names are not unique.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Unique player ID
    pub id: PlayerId,
    /// Display name
    pub name: String,
}

impl Player {
    /// Create a player.
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

/// A team. `player_ids` order is the duel seating.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    /// Unique team ID
    pub id: TeamId,
    /// Display name; history groups by this name
    pub name: String,
    /// Seated players, at most three, no repeats
    pub player_ids: Vec<PlayerId>,
    /// Matches won
    #[serde(default)]
    pub wins: u32,
}

impl Team {
    /// Create an empty team.
    pub fn new(id: impl Into<TeamId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            player_ids: Vec::new(),
            wins: 0,
        }
    }

    /// Builder: seat players in order.
    pub fn with_players<I, P>(mut self, players: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PlayerId>,
    {
        self.player_ids = players.into_iter().map(Into::into).collect();
        self
    }

    /// Does every seat have a player?
    pub fn is_full(&self) -> bool {
        self.player_ids.len() == SEATS
    }

    /// Is the player seated on this team?
    pub fn has_player(&self, id: &PlayerId) -> bool {
        self.player_ids.contains(id)
    }

    /// Exchange the players in two seats.
    pub fn swap_seats(&mut self, a: usize, b: usize) -> Result<(), RosterError> {
        let len = self.player_ids.len();
        if a >= len || b >= len {
            return Err(RosterError::SeatOutOfRange { seat: a.max(b), len });
        }
        self.player_ids.swap(a, b);
        Ok(())
    }

    fn validate(&self) -> Result<(), RosterError> {
        if self.player_ids.len() > SEATS {
            return Err(RosterError::TeamFull(self.id.clone()));
        }
        for (i, id) in self.player_ids.iter().enumerate() {
            if self.player_ids[..i].contains(id) {
                return Err(RosterError::DuplicatePlayer(id.clone()));
            }
        }
        Ok(())
    }
}

// =============================================================================
// SEED DATA
// =============================================================================

/// Initial roster supplied by the host when no stored roster exists.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SeedData {
    /// Players to start with
    pub players: Vec<Player>,
    /// Teams to start with
    pub teams: Vec<Team>,
}

// =============================================================================
// ROSTER
// =============================================================================

/// Players and teams known to the engine.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    /// Master player list
    pub players: Vec<Player>,
    /// All teams
    pub teams: Vec<Team>,
}

impl Roster {
    /// Build a roster from caller-supplied seed data.
    pub fn from_seed(seed: SeedData) -> Self {
        Self { players: seed.players, teams: seed.teams }
    }

    /// Get a player by ID.
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    /// Display name for a player, falling back to [`UNKNOWN_PLAYER`].
    pub fn player_name(&self, id: &PlayerId) -> &str {
        self.player(id).map(|p| p.name.as_str()).unwrap_or(UNKNOWN_PLAYER)
    }

    /// Case-insensitive lookup by display name. First match wins.
    pub fn find_player_by_name(&self, name: &str) -> Option<&Player> {
        let wanted = name.to_lowercase();
        self.players.iter().find(|p| p.name.to_lowercase() == wanted)
    }

    /// Player names of a team in seat order.
    pub fn lineup_names(&self, team: &Team) -> String {
        team.player_ids
            .iter()
            .map(|id| self.player_name(id))
            .collect::<Vec<_>>()
            .join(LINEUP_SEPARATOR)
    }

    /// Insert a player, or replace the one with the same id.
    pub fn save_player(&mut self, player: Player) {
        match self.players.iter_mut().find(|p| p.id == player.id) {
            Some(existing) => *existing = player,
            None => self.players.push(player),
        }
    }

    /// Remove a player. Refused while any team still seats them.
    pub fn delete_player(&mut self, id: &PlayerId) -> Result<Player, RosterError> {
        if let Some(team) = self.teams.iter().find(|t| t.has_player(id)) {
            return Err(RosterError::PlayerInUse {
                player: id.clone(),
                team: team.name.clone(),
            });
        }
        let idx = self.players
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| RosterError::PlayerNotFound(id.clone()))?;
        Ok(self.players.remove(idx))
    }

    /// Get a team by ID.
    pub fn team(&self, id: &TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| &t.id == id)
    }

    /// Get a team mutably by ID.
    pub fn team_mut(&mut self, id: &TeamId) -> Option<&mut Team> {
        self.teams.iter_mut().find(|t| &t.id == id)
    }

    /// Insert a team, or replace the one with the same id.
    pub fn save_team(&mut self, team: Team) -> Result<(), RosterError> {
        team.validate()?;
        match self.team_mut(&team.id) {
            Some(existing) => *existing = team,
            None => self.teams.push(team),
        }
        Ok(())
    }

    /// Remove a team.
    pub fn delete_team(&mut self, id: &TeamId) -> Option<Team> {
        let idx = self.teams.iter().position(|t| &t.id == id)?;
        Some(self.teams.remove(idx))
    }

    /// Seat or unseat a player. Returns whether the player is now seated.
    pub fn toggle_member(&mut self, team_id: &TeamId, player_id: &PlayerId) -> Result<bool, RosterError> {
        let known = self.player(player_id).is_some();
        let team = self.team_mut(team_id)
            .ok_or_else(|| RosterError::TeamNotFound(team_id.clone()))?;

        if let Some(idx) = team.player_ids.iter().position(|id| id == player_id) {
            team.player_ids.remove(idx);
            return Ok(false);
        }
        if !known {
            return Err(RosterError::PlayerNotFound(player_id.clone()));
        }
        if team.is_full() {
            return Err(RosterError::TeamFull(team_id.clone()));
        }
        team.player_ids.push(player_id.clone());
        Ok(true)
    }

    /// Credit a win to a team. Returns false when the team is unknown.
    pub fn record_win(&mut self, id: &TeamId) -> bool {
        match self.team_mut(id) {
            Some(team) => {
                team.wins += 1;
                true
            }
            None => false,
        }
    }

    /// Take one win back from the team with this name, floored at 0.
    ///
    /// Returns false when no team carries the name any more.
    pub fn revoke_win(&mut self, team_name: &str) -> bool {
        match self.teams.iter_mut().find(|t| t.name == team_name) {
            Some(team) => {
                team.wins = team.wins.saturating_sub(1);
                true
            }
            None => false,
        }
    }
}

/// Roster errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    /// Player is still seated on a team.
    #[error("Player {player} is still seated on team {team}")]
    PlayerInUse {
        /// Player that was going to be deleted.
        player: PlayerId,
        /// Name of a team seating them.
        team: String,
    },

    /// Player not found.
    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerId),

    /// Team not found.
    #[error("Team not found: {0}")]
    TeamNotFound(TeamId),

    /// Team already has three players.
    #[error("Team {0} already has three players")]
    TeamFull(TeamId),

    /// Same player seated twice.
    #[error("Player {0} is seated twice")]
    DuplicatePlayer(PlayerId),

    /// Seat index past the lineup.
    #[error("Seat {seat} out of range for lineup of {len}")]
    SeatOutOfRange {
        /// Offending seat.
        seat: usize,
        /// Lineup length.
        len: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_roster() -> Roster {
        Roster::from_seed(SeedData {
            players: vec![
                Player::new("p1", "Ana"),
                Player::new("p2", "Beto"),
                Player::new("p3", "Caro"),
                Player::new("p4", "Dani"),
            ],
            teams: vec![Team::new("team-1", "Nosotros").with_players(["p1", "p2"])],
        })
    }

    #[test]
    fn test_player_name_fallback() {
        let roster = sample_roster();
        assert_eq!(roster.player_name(&"p1".into()), "Ana");
        assert_eq!(roster.player_name(&"ghost".into()), UNKNOWN_PLAYER);
    }

    #[test]
    fn test_lineup_names() {
        let roster = sample_roster();
        let team = roster.team(&"team-1".into()).unwrap();
        assert_eq!(roster.lineup_names(team), "Ana · Beto");
    }

    #[test]
    fn test_find_player_case_insensitive() {
        let roster = sample_roster();
        assert_eq!(roster.find_player_by_name("cARO").unwrap().id, PlayerId::new("p3"));
        assert!(roster.find_player_by_name("Eve").is_none());
    }

    #[test]
    fn test_delete_player_in_use_is_refused() {
        let mut roster = sample_roster();
        let result = roster.delete_player(&"p1".into());
        assert!(matches!(result, Err(RosterError::PlayerInUse { .. })));
        assert_eq!(roster.players.len(), 4);

        let removed = roster.delete_player(&"p4".into()).unwrap();
        assert_eq!(removed.name, "Dani");
        assert_eq!(roster.players.len(), 3);
    }

    #[test]
    fn test_toggle_member_respects_three_seats() {
        let mut roster = sample_roster();
        let team_id = TeamId::new("team-1");

        assert!(roster.toggle_member(&team_id, &"p3".into()).unwrap());
        let result = roster.toggle_member(&team_id, &"p4".into());
        assert!(matches!(result, Err(RosterError::TeamFull(_))));

        // Toggling a seated player unseats them
        assert!(!roster.toggle_member(&team_id, &"p1".into()).unwrap());
        assert_eq!(
            roster.team(&team_id).unwrap().player_ids,
            vec![PlayerId::new("p2"), PlayerId::new("p3")]
        );
    }

    #[test]
    fn test_save_team_validates_lineup() {
        let mut roster = sample_roster();
        let too_many = Team::new("team-2", "Ellos").with_players(["p1", "p2", "p3", "p4"]);
        assert!(matches!(roster.save_team(too_many), Err(RosterError::TeamFull(_))));

        let repeated = Team::new("team-2", "Ellos").with_players(["p3", "p3"]);
        assert!(matches!(roster.save_team(repeated), Err(RosterError::DuplicatePlayer(_))));

        let renamed = Team::new("team-1", "Los de Siempre").with_players(["p1"]);
        roster.save_team(renamed).unwrap();
        assert_eq!(roster.teams.len(), 1);
        assert_eq!(roster.teams[0].name, "Los de Siempre");
    }

    #[test]
    fn test_swap_seats() {
        let mut team = Team::new("t", "T").with_players(["a", "b", "c"]);
        team.swap_seats(0, 2).unwrap();
        assert_eq!(team.player_ids[0], PlayerId::new("c"));
        assert_eq!(team.player_ids[2], PlayerId::new("a"));
        assert!(team.swap_seats(0, 3).is_err());
    }

    #[test]
    fn test_win_counters() {
        let mut roster = sample_roster();
        assert!(roster.record_win(&"team-1".into()));
        assert_eq!(roster.teams[0].wins, 1);

        assert!(roster.revoke_win("Nosotros"));
        assert!(roster.revoke_win("Nosotros"));
        assert_eq!(roster.teams[0].wins, 0);

        assert!(!roster.revoke_win("Nadie"));
        assert!(!roster.record_win(&"team-9".into()));
    }
}
