//! # Truco Scorer
//!
//! Match scoring engine for truco: ordinary hands, pica a pica duel rounds,
//! single-step undo, game-over evaluation and history rankings.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TRUCO SCORER                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Primitives                                │
//! │  ├── ids.rs      - Player, team and record identifiers       │
//! │  ├── hash.rs     - Snapshot digests                          │
//! │  └── tally.rs    - Match-stick tally and malas/buenas        │
//! │                                                              │
//! │  game/           - Scoring rules (pure)                      │
//! │  ├── roster.rs   - Players, teams, seed data                 │
//! │  ├── state.rs    - Match state and duel eligibility          │
//! │  ├── hand.rs     - Ordinary hands                            │
//! │  ├── duel.rs     - Pica a pica rounds and duel sheets        │
//! │  ├── undo.rs     - Single-slot undo ledger                   │
//! │  ├── outcome.rs  - Game over and loser penalty               │
//! │  └── events.rs   - Score events                              │
//! │                                                              │
//! │  history/        - Completed matches                         │
//! │  ├── record.rs   - Records and bounded history               │
//! │  └── rankings.rs - Team and player leaderboards              │
//! │                                                              │
//! │  store/          - Persistence                               │
//! │  ├── document.rs - Stored shapes, legacy variants            │
//! │  ├── migrate.rs  - Load-time conversion                      │
//! │  └── snapshot.rs - Topics, store trait, writer               │
//! │                                                              │
//! │  session/        - Host façade                               │
//! │  ├── engine.rs   - Scoring operations                        │
//! │  └── remote.rs   - Load, persist, apply pushes               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules in Brief
//!
//! - Scores never leave `[0, max_points]`
//! - Between 5 and 25 points a 3v3 match alternates hands and duel rounds
//! - A duel round credits only the net difference of its three duels
//! - Undo reverses exactly the last hand or duel round
//! - The loser "sleeps outside" when finishing under 15

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod game;
pub mod history;
pub mod store;
pub mod session;

// Re-export commonly used types
pub use config::{EngineConfig, SEATS};
pub use crate::core::ids::{PlayerId, TeamId, RecordId};
pub use game::{MatchState, MaxPoints, Side, Team, Player, SeedData, ScoreEvent, ScoreEventData};
pub use history::{CompletedMatch, Rankings};
pub use session::{EngineError, ScoringSession};
pub use store::{MemoryStore, SnapshotStore, SnapshotWriter, StoreError, Topic};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
