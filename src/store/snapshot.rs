//! Snapshot Store
//!
//! The persistence seam. The engine writes whole documents per topic and
//! receives pushed documents from other devices through subscriptions.
//! Writes are fire-and-forget; pushes may be stale, and the last one
//! applied wins.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, RwLock};

use serde::{Serialize, Deserialize};
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, trace};

use crate::core::hash::{digest_document, short_hex, SnapshotDigest};
use crate::store::document::StoreError;

/// Buffered pushes per subscriber before the oldest are dropped.
pub const SUBSCRIPTION_BUFFER: usize = 16;

// =============================================================================
// TOPICS
// =============================================================================

/// The four persisted documents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Topic {
    /// Master player list
    Players,
    /// Teams
    Teams,
    /// Completed matches
    History,
    /// In-progress match
    CurrentGame,
}

impl Topic {
    /// Every topic, in load order.
    pub const ALL: [Topic; 4] = [Topic::Players, Topic::Teams, Topic::History, Topic::CurrentGame];

    /// Document name.
    pub fn as_str(self) -> &'static str {
        match self {
            Topic::Players => "players",
            Topic::Teams => "teams",
            Topic::History => "history",
            Topic::CurrentGame => "currentGame",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topic::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| StoreError::UnknownTopic(s.to_string()))
    }
}

// =============================================================================
// STORE
// =============================================================================

/// Document persistence.
pub trait SnapshotStore: Send + Sync {
    /// Persist a document. Never blocks on the backend and never fails
    /// from the caller's point of view.
    fn save(&self, topic: Topic, value: Value);

    /// Last document persisted under a topic.
    fn load(&self, topic: Topic) -> Option<Value>;

    /// Receive every document saved under a topic from now on.
    fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Value>;
}

/// In-process store. Every save is pushed to subscribers of its topic.
pub struct MemoryStore {
    documents: RwLock<BTreeMap<Topic, Value>>,
    channels: BTreeMap<Topic, broadcast::Sender<Value>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        let channels = Topic::ALL
            .into_iter()
            .map(|topic| (topic, broadcast::channel(SUBSCRIPTION_BUFFER).0))
            .collect();
        Self {
            documents: RwLock::new(BTreeMap::new()),
            channels,
        }
    }

    /// Create a store shared between handles.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore for MemoryStore {
    fn save(&self, topic: Topic, value: Value) {
        {
            let mut documents = self.documents.write().unwrap_or_else(|e| e.into_inner());
            documents.insert(topic, value.clone());
        }
        if let Some(tx) = self.channels.get(&topic) {
            // No subscribers is fine
            let _ = tx.send(value);
        }
    }

    fn load(&self, topic: Topic) -> Option<Value> {
        let documents = self.documents.read().unwrap_or_else(|e| e.into_inner());
        documents.get(&topic).cloned()
    }

    fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Value> {
        match self.channels.get(&topic) {
            Some(tx) => tx.subscribe(),
            None => broadcast::channel(1).1,
        }
    }
}

// =============================================================================
// WRITER
// =============================================================================

/// Writes documents through a store, skipping bodies identical to the last
/// one seen for the topic.
///
/// Applying a remote push records its digest too, so writing the same
/// document straight back is suppressed.
pub struct SnapshotWriter {
    store: Arc<dyn SnapshotStore>,
    last: BTreeMap<Topic, SnapshotDigest>,
}

impl SnapshotWriter {
    /// Wrap a store.
    pub fn new(store: Arc<dyn SnapshotStore>) -> Self {
        Self { store, last: BTreeMap::new() }
    }

    /// Underlying store.
    pub fn store(&self) -> &Arc<dyn SnapshotStore> {
        &self.store
    }

    /// Write a document unless it is unchanged. Returns whether it was written.
    pub fn write(&mut self, topic: Topic, value: Value) -> bool {
        let digest = digest_document(topic.as_str().as_bytes(), &value);
        if self.last.get(&topic) == Some(&digest) {
            trace!(%topic, digest = %short_hex(&digest), "Skipping unchanged snapshot");
            return false;
        }

        #[cfg(feature = "debug-tracing")]
        trace!(%topic, body = %value, "Snapshot body");

        debug!(%topic, digest = %short_hex(&digest), "Writing snapshot");
        self.last.insert(topic, digest);
        self.store.save(topic, value);
        true
    }

    /// Remember a document that arrived from elsewhere.
    pub fn observe(&mut self, topic: Topic, value: &Value) {
        let digest = digest_document(topic.as_str().as_bytes(), value);
        self.last.insert(topic, digest);
    }

    /// Digest of the last document written or observed for a topic.
    pub fn last_digest(&self, topic: Topic) -> Option<&SnapshotDigest> {
        self.last.get(&topic)
    }
}
