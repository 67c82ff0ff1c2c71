//! Core primitives.
//!
//! Identifiers, snapshot digests and score tally helpers shared by the
//! game, history and store layers.

pub mod ids;
pub mod hash;
pub mod tally;

// Re-export core types
pub use ids::{PlayerId, TeamId, RecordId};
pub use hash::{SnapshotDigest, digest_document};
pub use tally::{tally, Half};
