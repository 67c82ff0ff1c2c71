//! Load-Time Migration
//!
//! Converts stored documents into canonical game types. Legacy teams have
//! their seat names resolved against the player list (case-insensitive);
//! names nobody answers to become new players. Running a migration on its
//! own output changes nothing.

use tracing::{debug, info, warn};

use crate::config::SEATS;
use crate::core::ids::PlayerId;
use crate::game::roster::{Player, Roster, Team};
use crate::game::state::MatchState;
use crate::history::record::{CompletedMatch, MatchHistory};
use crate::store::document::{LegacyTeam, MatchDocument, RecordDocument, StoreError, TeamDocument};

/// Canonicalize one team, adding any spawned players to `roster.players`.
pub fn migrate_team(doc: TeamDocument, roster: &mut Roster) -> Team {
    match doc {
        TeamDocument::Current(team) => team,
        TeamDocument::Legacy(legacy) => upgrade_legacy(legacy, roster),
    }
}

fn upgrade_legacy(legacy: LegacyTeam, roster: &mut Roster) -> Team {
    let mut player_ids: Vec<PlayerId> = Vec::with_capacity(SEATS);

    for name in &legacy.players {
        if player_ids.len() == SEATS {
            break;
        }
        let id = match roster.find_player_by_name(name) {
            Some(player) => player.id.clone(),
            None => {
                let player = Player::new(PlayerId::generate(), name.clone());
                debug!(name = %name, id = %player.id, "Spawned player for legacy team");
                let id = player.id.clone();
                roster.save_player(player);
                id
            }
        };
        if !player_ids.contains(&id) {
            player_ids.push(id);
        }
    }

    info!(team = %legacy.name, seats = player_ids.len(), "Migrated legacy team");

    Team {
        id: legacy.id,
        name: legacy.name,
        player_ids,
        wins: legacy.wins,
    }
}

/// Build the roster from stored players and teams.
pub fn load_roster(players: Vec<Player>, teams: Vec<TeamDocument>) -> Roster {
    let mut roster = Roster { players, teams: Vec::with_capacity(teams.len()) };
    for doc in teams {
        let team = migrate_team(doc, &mut roster);
        roster.teams.push(team);
    }
    roster
}

/// Decode a stored match. Embedded legacy teams are migrated against `roster`.
pub fn load_match(doc: MatchDocument, roster: &mut Roster) -> Result<MatchState, StoreError> {
    let duel_rounds = doc.duel_rounds.decode()?;
    let team1 = migrate_team(doc.team1, roster);
    let team2 = migrate_team(doc.team2, roster);

    Ok(MatchState {
        team1,
        team2,
        score1: doc.score1.min(doc.max_points.value()),
        score2: doc.score2.min(doc.max_points.value()),
        max_points: doc.max_points,
        next_hand_is_pica: doc.next_hand_is_pica,
        duel_rounds,
    })
}

/// Decode stored history into a bounded history.
///
/// Records whose duel blob cannot be decoded are dropped with a warning;
/// the rest load in order.
pub fn load_history(docs: Vec<RecordDocument>, capacity: usize) -> MatchHistory {
    let records = docs
        .into_iter()
        .filter_map(|doc| {
            let id = doc.id.clone();
            match CompletedMatch::try_from(doc) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(record = %id, error = %e, "Skipping unreadable history record");
                    None
                }
            }
        })
        .collect();
    MatchHistory::from_records(records, capacity)
}
