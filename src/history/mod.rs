//! Match History
//!
//! - `record`: Completed match records and the bounded history
//! - `rankings`: Team and player leaderboards derived from history

pub mod record;
pub mod rankings;

pub use record::{CompletedMatch, MatchHistory};
pub use rankings::{compute_rankings, PlayerDuelStats, Rankings, TeamRanking};
