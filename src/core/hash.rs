//! Snapshot Hashing
//!
//! Provides stable digests of persisted documents for:
//! - Skipping writes whose body did not change
//! - Recognising a remote push that echoes our own last write
//! - Compact log fields

use sha2::{Sha256, Digest};

/// Digest output type (256 bits / 32 bytes)
pub type SnapshotDigest = [u8; 32];

/// Deterministic hasher for document snapshots.
///
/// Wraps SHA-256 with a domain separator so equal bodies stored under
/// different topics never collide.
pub struct SnapshotHasher {
    hasher: Sha256,
}

impl SnapshotHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Update with raw bytes.
    #[inline]
    pub fn update_bytes(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Update with a JSON value.
    ///
    /// `serde_json::Map` keeps keys sorted, so two equal values always
    /// serialize to the same bytes.
    pub fn update_json(&mut self, value: &serde_json::Value) {
        // Serializing a Value cannot fail: keys are strings by construction.
        let bytes = serde_json::to_vec(value).unwrap_or_default();
        self.hasher.update(&bytes);
    }

    /// Finalize and return the digest.
    pub fn finalize(self) -> SnapshotDigest {
        self.hasher.finalize().into()
    }
}

/// Digest a document body stored under `domain`.
pub fn digest_document(domain: &[u8], body: &serde_json::Value) -> SnapshotDigest {
    let mut hasher = SnapshotHasher::new(domain);
    hasher.update_json(body);
    hasher.finalize()
}

/// Short hex prefix of a digest, for log lines.
pub fn short_hex(digest: &SnapshotDigest) -> String {
    hex::encode(&digest[..4])
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_digest_determinism() {
        let body = json!({ "list": [{ "id": "team-1", "wins": 3 }] });
        assert_eq!(digest_document(b"teams", &body), digest_document(b"teams", &body));
    }

    #[test]
    fn test_key_order_does_not_matter() {
        let a: serde_json::Value = serde_json::from_str(r#"{"a":1,"b":2}"#).unwrap();
        let b: serde_json::Value = serde_json::from_str(r#"{"b":2,"a":1}"#).unwrap();
        assert_eq!(digest_document(b"x", &a), digest_document(b"x", &b));
    }

    #[test]
    fn test_domain_separation() {
        let body = json!({ "list": [] });
        assert_ne!(digest_document(b"teams", &body), digest_document(b"history", &body));
    }

    #[test]
    fn test_short_hex() {
        let digest = [0xab; 32];
        assert_eq!(short_hex(&digest), "abababab");
    }
}
