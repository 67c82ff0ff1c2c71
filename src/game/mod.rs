//! Game Logic Module
//!
//! All scoring rules. Pure and single-threaded: every function runs to
//! completion on the state it is handed.
//!
//! ## Module Structure
//!
//! - `roster`: Players, teams, seed data
//! - `state`: Match state, sides, match target
//! - `hand`: Ordinary hands and the pending hand accumulator
//! - `duel`: Pica a pica duel rounds
//! - `undo`: Single-slot undo ledger
//! - `outcome`: Game over and loser penalty
//! - `events`: Score events reported to the host

pub mod roster;
pub mod state;
pub mod hand;
pub mod duel;
pub mod undo;
pub mod outcome;
pub mod events;

// Re-export key types
pub use roster::{Player, Team, Roster, RosterError, SeedData};
pub use state::{MatchState, MatchPhase, MaxPoints, Side};
pub use hand::{PendingHand, HandResolution, confirm_hand};
pub use duel::{DuelResult, DuelRound, DuelSheet, DuelResolution, SeatScore, resolve_duel_round, resolve_sheet};
pub use undo::{UndoEntry, UndoLedger};
pub use outcome::{GameOutcome, evaluate};
pub use events::{ScoreEvent, ScoreEventData};
