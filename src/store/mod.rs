//! Persistence
//!
//! - `document`: Stored document shapes, including legacy variants
//! - `migrate`: Conversion of stored documents to game types
//! - `snapshot`: Topics, the store trait, and the de-duplicating writer

pub mod document;
pub mod migrate;
pub mod snapshot;

pub use document::{
    DuelRoundsBlob, LegacyTeam, MatchDocument, RecordDocument, StoreError, StoredDocuments,
    TeamDocument,
};
pub use migrate::{load_history, load_match, load_roster, migrate_team};
pub use snapshot::{MemoryStore, SnapshotStore, SnapshotWriter, Topic};
