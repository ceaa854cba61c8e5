//! Rust structs mapping to database tables.
//!
//! Each model implements `from_row` for constructing itself from a
//! `rusqlite::Row`.

use picvault_common::{ImageId, OwnerHash};
use serde::Serialize;

/// One row of the `images` table.
///
/// Serializes with the field names clients of the `/app3` endpoints expect:
/// `uid` carries the owner hash, never the raw identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRecord {
    pub id: ImageId,
    #[serde(rename = "uid")]
    pub owner_hash: OwnerHash,
    pub image_name: String,
    #[serde(rename = "base64Image")]
    pub image_data: String,
    #[serde(rename = "created")]
    pub created_at: String,
    #[serde(rename = "updated")]
    pub updated_at: String,
}

impl ImageRecord {
    /// Column list matching [`ImageRecord::from_row`].
    pub const COLUMNS: &'static str =
        "id, owner_hash, image_name, image_data, created_at, updated_at";

    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: ImageId::from(row.get::<_, i64>(0)?),
            owner_hash: OwnerHash::from_stored(row.get(1)?),
            image_name: row.get(2)?,
            image_data: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }
}
