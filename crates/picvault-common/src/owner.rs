//! Owner identity hashing.
//!
//! Callers identify themselves with a raw `uid` string. That string is never
//! stored: every operation runs it through [`hash_owner_id`] and scopes its
//! reads and writes by the resulting [`OwnerHash`].

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Length of a hex-encoded SHA-256 digest.
pub const OWNER_HASH_LEN: usize = 64;

/// SHA-256 hex digest of a caller-supplied identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerHash(String);

impl OwnerHash {
    /// Wrap a hash read back from storage.
    ///
    /// The table's `CHECK(length(owner_hash) = 64)` constraint is what
    /// guarantees the shape here; no re-hashing takes place.
    pub fn from_stored(hash: String) -> Self {
        Self(hash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the owner hash for a raw identifier.
///
/// Returns the lowercase hex SHA-256 digest of the identifier's UTF-8 bytes.
pub fn hash_owner_id(owner_id: &str) -> OwnerHash {
    let mut hasher = Sha256::new();
    hasher.update(owner_id.as_bytes());
    OwnerHash(hex::encode(hasher.finalize()))
}
