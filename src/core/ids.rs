//! Identifiers
//!
//! String-backed identifiers for players, teams and completed matches.
//! Stored documents already carry ids such as `player-1712345` or `team-1`,
//! so the wrapped value is kept verbatim and never reparsed.

use std::fmt;
use serde::{Serialize, Deserialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Wrap an existing identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a fresh identifier with a random UUID suffix.
            pub fn generate() -> Self {
                Self(format!(concat!($prefix, "-{}"), uuid::Uuid::new_v4().simple()))
            }

            /// Borrow the raw identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(
    /// Unique player identifier from the master player list.
    PlayerId, "player"
);

string_id!(
    /// Unique team identifier.
    TeamId, "team"
);

string_id!(
    /// Identifier of a completed match record in history.
    RecordId, "game"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_carry_prefix() {
        let player = PlayerId::generate();
        let team = TeamId::generate();
        let record = RecordId::generate();

        assert!(player.as_str().starts_with("player-"));
        assert!(team.as_str().starts_with("team-"));
        assert!(record.as_str().starts_with("game-"));
        assert_ne!(PlayerId::generate(), player);
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = PlayerId::new("player-42");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"player-42\"");

        let back: PlayerId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
