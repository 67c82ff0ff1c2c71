//! Truco Scorer
//!
//! Demo host for the scoring engine. Plays a scripted match on one
//! session while a second session follows it through a shared store.
//!
//! Usage: `truco-scorer [config.json]`

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use truco_scorer::{
    EngineConfig, MaxPoints, MemoryStore, Player, ScoringSession, SeedData, SnapshotWriter,
    Team, VERSION,
    core::{hash::short_hex, tally, Half},
    session::{apply_pushed, dirty_topics, RemoteFeed},
    ScoreEvent, ScoreEventData, Topic,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => EngineConfig::from_json_file(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => EngineConfig::default(),
    };

    info!("Truco Scorer v{}", VERSION);
    info!(
        "Pica a pica between {} and {}, loser penalty under {}",
        config.duel_entry_score, config.duel_exit_score, config.loser_penalty_threshold
    );

    demo_match(config).await
}

/// Default roster for a fresh store.
fn seed_data() -> SeedData {
    let names = ["Juan", "Pedro", "Luis", "Ana", "Sofía", "Marta"];
    let players: Vec<Player> = names
        .iter()
        .enumerate()
        .map(|(i, name)| Player::new(format!("player-{}", i + 1), *name))
        .collect();

    SeedData {
        teams: vec![
            Team::new("team-1", "Nosotros").with_players(players[..3].iter().map(|p| p.id.clone())),
            Team::new("team-2", "Ellos").with_players(players[3..].iter().map(|p| p.id.clone())),
        ],
        players,
    }
}

/// Play a scripted match and mirror it onto a second session.
async fn demo_match(config: EngineConfig) -> anyhow::Result<()> {
    info!("=== Starting Demo Match ===");

    let store = MemoryStore::shared();
    let mut feed = RemoteFeed::subscribe(store.as_ref());

    let (mut session, dirty) = ScoringSession::load(config.clone(), store.as_ref(), seed_data())?;
    let mut writer = SnapshotWriter::new(store.clone());
    session.persist(&mut writer, &dirty)?;

    let (mut mirror, dirty) = ScoringSession::load(config, store.as_ref(), SeedData::default())?;
    let mut mirror_writer = SnapshotWriter::new(store.clone());
    mirror.persist(&mut mirror_writer, &dirty)?;

    let mut events = vec![session.start_match(&"team-1".into(), &"team-2".into(), MaxPoints::Thirty)?];
    events.extend(session.confirm_hand(3, 0)?);
    events.extend(session.confirm_hand(2, 1)?);

    // 5-1: pica a pica
    let mut sheet = session.open_duel_sheet()?;
    sheet.set(0, (1, 0));
    sheet.set(1, (0, 1));
    sheet.set(2, (2, 0));
    events.extend(session.submit_duel_sheet(&sheet)?);

    events.extend(session.confirm_hand(4, 0)?);
    // Taking the hand back reopens the duel turn
    events.push(session.undo()?);
    events.extend(session.resolve_duel_round(&[(3, 1), (0, 2), (1, 1)])?);
    events.extend(session.confirm_hand(0, 2)?);

    while session.outcome().is_none() {
        if session.is_duel_turn() {
            events.extend(session.resolve_duel_round(&[(2, 0), (1, 0), (0, 0)])?);
        } else {
            events.extend(session.confirm_hand(3, 1)?);
        }
    }
    events.push(session.finalize(Some("Demo".into()))?);

    for event in &events {
        report(event, MaxPoints::Thirty);
        session.persist(&mut writer, dirty_topics(&event.data))?;
    }

    // Drain what the mirror has been sent
    while let Ok(Some((topic, value))) =
        tokio::time::timeout(Duration::from_millis(50), feed.next()).await
    {
        let dirty = apply_pushed(&mut mirror, &mut mirror_writer, topic, value)?;
        mirror.persist(&mut mirror_writer, &dirty)?;
    }

    info!("=== Results ===");
    for team in &mirror.roster().teams {
        info!("{}: {} wins", team.name, team.wins);
    }

    let rankings = mirror.compute_rankings();
    for team in &rankings.teams {
        info!("{}: {}/{} ({:.0}%), {} points", team.name, team.wins, team.games, team.win_rate, team.total_points);
    }
    for player in &rankings.players {
        info!(
            "{}: {} points in {} duels, best {}",
            player.name, player.points, player.duels, player.max_in_one
        );
    }
    if let Some(best) = &rankings.most_effective {
        info!("Most effective: {} ({:.0}%)", best.name, best.win_rate);
    }
    if let Some(busy) = &rankings.most_combative {
        info!("Most combative: {} ({} duels)", busy.name, busy.duels);
    }

    let history = writer.last_digest(Topic::History).map(short_hex).unwrap_or_default();
    let mirrored = mirror_writer.last_digest(Topic::History).map(short_hex).unwrap_or_default();
    info!("History digest: {} (mirror {})", history, mirrored);

    if history == mirrored {
        info!("MIRROR IN SYNC");
    } else {
        info!("MIRROR DIVERGED");
    }
    Ok(())
}

fn report(event: &ScoreEvent, max_points: MaxPoints) {
    match &event.data {
        ScoreEventData::HandConfirmed { score1, score2, .. } => {
            info!(
                "#{} hand -> {}-{} [{:?} {:?} / {:?} {:?}]",
                event.hand, score1, score2,
                Half::of(*score1, max_points.value()), tally(*score1),
                Half::of(*score2, max_points.value()), tally(*score2)
            );
        }
        ScoreEventData::DuelRoundResolved { delta1, delta2, score1, score2, .. } => {
            info!("#{} pica a pica +{}/+{} -> {}-{}", event.hand, delta1, delta2, score1, score2);
        }
        ScoreEventData::MatchEnded { outcome } => {
            info!(
                "Match ended {}-{}{}",
                outcome.winner_score,
                outcome.loser_score,
                if outcome.loser_sleeps_outside { ", loser sleeps outside" } else { "" }
            );
        }
        other => info!("#{} {:?}", event.hand, other),
    }
}
