//! Persistence Wiring
//!
//! Loading a session from a store, writing the documents an event touched,
//! and applying documents pushed from other devices.
//!
//! ```text
//! local action ──► ScoreEvent ──► dirty_topics ──► SnapshotWriter ──► store
//!                                                                       │
//! apply_remote ◄── RemoteFeed ◄── subscribe(topic) ◄────────────────────┘
//! ```

use serde_json::Value;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::game::events::ScoreEventData;
use crate::game::roster::{Player, SeedData};
use crate::session::engine::ScoringSession;
use crate::store::document::{
    MatchDocument, RecordDocument, StoreError, StoredDocuments, TeamDocument,
};
use crate::store::migrate::{load_history, load_match, load_roster, migrate_team};
use crate::store::snapshot::{SnapshotStore, SnapshotWriter, Topic};

/// Documents changed by an event.
pub fn dirty_topics(event: &ScoreEventData) -> &'static [Topic] {
    match event {
        ScoreEventData::MatchStarted { .. }
        | ScoreEventData::HandConfirmed { .. }
        | ScoreEventData::DuelRoundResolved { .. }
        | ScoreEventData::HandUndone { .. }
        | ScoreEventData::ProgressReset
        | ScoreEventData::MatchDiscarded => &[Topic::CurrentGame],
        ScoreEventData::MatchEnded { .. } => &[],
        ScoreEventData::MatchFinalized { .. } | ScoreEventData::RematchStarted { .. } => {
            &[Topic::History, Topic::Teams, Topic::CurrentGame]
        }
        ScoreEventData::RecordDeleted { .. } => &[Topic::History, Topic::Teams],
    }
}

impl ScoringSession {
    /// Build a session from documents.
    ///
    /// Legacy teams are migrated against the player list, roster teams
    /// first and then the teams embedded in the current game. Also returns
    /// the topics whose stored form is now stale: `Players` when migration
    /// spawned players, `Teams` and `CurrentGame` when they held legacy
    /// teams. Unreadable history records are skipped.
    pub fn from_documents(
        config: EngineConfig,
        docs: StoredDocuments,
    ) -> Result<(Self, Vec<Topic>), StoreError> {
        let stored_players = docs.players.len();
        let legacy_teams = docs.teams.iter().any(TeamDocument::is_legacy);
        let legacy_match = docs.current_game.as_ref().is_some_and(MatchDocument::has_legacy_team);

        let mut roster = load_roster(docs.players, docs.teams);
        let history = load_history(docs.history, config.history_capacity);
        let current = docs
            .current_game
            .map(|doc| load_match(doc, &mut roster))
            .transpose()?;

        let dirty = [
            (Topic::Players, roster.players.len() > stored_players),
            (Topic::Teams, legacy_teams),
            (Topic::CurrentGame, legacy_match),
        ]
        .into_iter()
        .filter_map(|(topic, stale)| stale.then_some(topic))
        .collect();

        let mut session = Self::new(config, SeedData::default());
        session.roster = roster;
        session.history = history;
        session.current = current;
        Ok((session, dirty))
    }

    /// Load a session from a store, with the topics that should be written
    /// back.
    ///
    /// `seed` is used only when the store holds neither a player list nor
    /// teams. Stores written before player ids existed have teams but no
    /// player list; their players are rebuilt from the seat names.
    pub fn load(
        config: EngineConfig,
        store: &dyn SnapshotStore,
        seed: SeedData,
    ) -> Result<(Self, Vec<Topic>), StoreError> {
        let players = store.load(Topic::Players);
        let teams = store.load(Topic::Teams);
        let seeded = players.is_none() && teams.is_none();

        let docs = if seeded {
            info!("No stored roster, starting from seed data");
            StoredDocuments {
                players: seed.players,
                teams: seed.teams.into_iter().map(TeamDocument::from).collect(),
                history: decode_or_default(store.load(Topic::History))?,
                current_game: decode_or_default(store.load(Topic::CurrentGame))?,
            }
        } else {
            StoredDocuments {
                players: decode_or_default(players)?,
                teams: decode_or_default(teams)?,
                history: decode_or_default(store.load(Topic::History))?,
                current_game: decode_or_default(store.load(Topic::CurrentGame))?,
            }
        };

        let (session, mut dirty) = Self::from_documents(config, docs)?;
        if seeded {
            dirty.extend([Topic::Players, Topic::Teams]);
            dirty.sort();
            dirty.dedup();
        }
        info!(
            "Loaded {} players, {} teams, {} records, match active: {}",
            session.roster.players.len(),
            session.roster.teams.len(),
            session.history.len(),
            session.current.is_some()
        );
        if !dirty.is_empty() {
            debug!("Stored documents out of date: {:?}", dirty);
        }
        Ok((session, dirty))
    }

    /// All four documents in stored form.
    pub fn export(&self) -> Result<StoredDocuments, StoreError> {
        Ok(StoredDocuments {
            players: self.roster.players.clone(),
            teams: self.roster.teams.iter().cloned().map(TeamDocument::from).collect(),
            history: self
                .history
                .records()
                .iter()
                .map(RecordDocument::from_record)
                .collect::<Result<_, _>>()?,
            current_game: self.current.as_ref().map(MatchDocument::from_state).transpose()?,
        })
    }

    /// One document in stored form.
    pub fn document(&self, topic: Topic) -> Result<Value, StoreError> {
        let value = match topic {
            Topic::Players => serde_json::to_value(&self.roster.players)?,
            Topic::Teams => serde_json::to_value(&self.roster.teams)?,
            Topic::History => {
                let records = self
                    .history
                    .records()
                    .iter()
                    .map(RecordDocument::from_record)
                    .collect::<Result<Vec<_>, _>>()?;
                serde_json::to_value(records)?
            }
            Topic::CurrentGame => {
                let doc = self.current.as_ref().map(MatchDocument::from_state).transpose()?;
                serde_json::to_value(doc)?
            }
        };
        Ok(value)
    }

    /// Write the given documents. Returns how many actually changed.
    pub fn persist(&self, writer: &mut SnapshotWriter, topics: &[Topic]) -> Result<usize, StoreError> {
        let mut written = 0;
        for &topic in topics {
            if writer.write(topic, self.document(topic)?) {
                written += 1;
            }
        }
        Ok(written)
    }

    /// Write every document.
    pub fn persist_all(&self, writer: &mut SnapshotWriter) -> Result<usize, StoreError> {
        self.persist(writer, &Topic::ALL)
    }

    /// Overwrite the local copy of a document with one pushed from
    /// elsewhere. The last push applied wins.
    ///
    /// Returns the topics the push left stale in the store: legacy teams
    /// come back canonical, and players spawned for their seat names must
    /// be written so every device sees the same ids.
    ///
    /// A replaced current game forgets the undo slot: the action it held
    /// may not exist in the pushed state.
    pub fn apply_remote(&mut self, topic: Topic, value: Value) -> Result<Vec<Topic>, StoreError> {
        let known_players = self.roster.players.len();
        let mut dirty = Vec::new();
        match topic {
            Topic::Players => {
                let players: Vec<Player> = serde_json::from_value(value)?;
                self.roster.players = players;
            }
            Topic::Teams => {
                let docs: Vec<TeamDocument> = serde_json::from_value(value)?;
                if docs.iter().any(TeamDocument::is_legacy) {
                    dirty.push(Topic::Teams);
                }
                let teams = docs
                    .into_iter()
                    .map(|doc| migrate_team(doc, &mut self.roster))
                    .collect();
                self.roster.teams = teams;
            }
            Topic::History => {
                let docs: Vec<RecordDocument> = serde_json::from_value(value)?;
                self.history = load_history(docs, self.config.history_capacity);
            }
            Topic::CurrentGame => {
                let doc: Option<MatchDocument> = serde_json::from_value(value)?;
                if doc.as_ref().is_some_and(MatchDocument::has_legacy_team) {
                    dirty.push(Topic::CurrentGame);
                }
                self.current = doc.map(|d| load_match(d, &mut self.roster)).transpose()?;
                self.ledger.clear();
                self.hands = 0;
            }
        }
        if topic != Topic::Players && self.roster.players.len() > known_players {
            dirty.insert(0, Topic::Players);
        }
        debug!("Applied remote {}", topic);
        Ok(dirty)
    }
}

fn decode_or_default<T>(value: Option<Value>) -> Result<T, StoreError>
where
    T: serde::de::DeserializeOwned + Default,
{
    match value {
        Some(Value::Null) | None => Ok(T::default()),
        Some(v) => Ok(serde_json::from_value(v)?),
    }
}

// =============================================================================
// REMOTE FEED
// =============================================================================

/// Merged subscription to every topic of a store.
pub struct RemoteFeed {
    players: broadcast::Receiver<Value>,
    teams: broadcast::Receiver<Value>,
    history: broadcast::Receiver<Value>,
    current_game: broadcast::Receiver<Value>,
}

impl RemoteFeed {
    /// Subscribe to all four topics.
    pub fn subscribe(store: &dyn SnapshotStore) -> Self {
        Self {
            players: store.subscribe(Topic::Players),
            teams: store.subscribe(Topic::Teams),
            history: store.subscribe(Topic::History),
            current_game: store.subscribe(Topic::CurrentGame),
        }
    }

    /// Next pushed document. `None` once the store is gone.
    ///
    /// Pushes dropped because the subscriber fell behind are skipped; only
    /// the newest document per topic matters.
    pub async fn next(&mut self) -> Option<(Topic, Value)> {
        loop {
            let (topic, result) = tokio::select! {
                r = self.players.recv() => (Topic::Players, r),
                r = self.teams.recv() => (Topic::Teams, r),
                r = self.history.recv() => (Topic::History, r),
                r = self.current_game.recv() => (Topic::CurrentGame, r),
            };
            match result {
                Ok(value) => return Some((topic, value)),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Remote feed for {} lagged, skipped {}", topic, skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

/// Apply a pushed document and remember it so it is not written back.
///
/// Returns the topics to persist afterwards, as `apply_remote` does.
pub fn apply_pushed(
    session: &mut ScoringSession,
    writer: &mut SnapshotWriter,
    topic: Topic,
    value: Value,
) -> Result<Vec<Topic>, StoreError> {
    writer.observe(topic, &value);
    session.apply_remote(topic, value)
}
