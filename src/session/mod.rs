//! Scoring Session
//!
//! The façade hosts talk to.
//!
//! - `engine`: Operations on the roster, the active match and history
//! - `remote`: Loading, persisting and applying pushed documents

pub mod engine;
pub mod remote;

pub use engine::{EngineError, ScoringSession};
pub use remote::{apply_pushed, dirty_topics, RemoteFeed};
