//! Typed ID wrapper for image records.
//!
//! Image ids are assigned by SQLite (`INTEGER PRIMARY KEY AUTOINCREMENT`),
//! so unlike a random UUID there is no `new()`; an [`ImageId`] only ever
//! comes from storage or from a caller naming an existing row.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an image record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(i64);

impl ImageId {
    /// Return the raw row id.
    #[must_use]
    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for ImageId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<ImageId> for i64 {
    fn from(id: ImageId) -> Self {
        id.0
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
