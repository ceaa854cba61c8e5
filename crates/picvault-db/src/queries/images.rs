//! Image record queries.
//!
//! Mutations are owner-scoped: `UPDATE` and `DELETE` match on both the row
//! id and the owner hash, and report only whether a row was affected.

use chrono::{SecondsFormat, Utc};
use picvault_common::{Error, ImageId, OwnerHash, Result};
use rusqlite::Connection;

use crate::models::ImageRecord;

fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Insert a new image record and return it as stored.
pub fn insert_image(
    conn: &Connection,
    owner: &OwnerHash,
    image_name: &str,
    image_data: &str,
) -> Result<ImageRecord> {
    let now = now_timestamp();

    conn.execute(
        "INSERT INTO images (owner_hash, image_name, image_data, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?4)",
        rusqlite::params![owner.as_str(), image_name, image_data, now],
    )
    .map_err(|e| Error::database("Failed to create record.", e))?;

    Ok(ImageRecord {
        id: ImageId::from(conn.last_insert_rowid()),
        owner_hash: owner.clone(),
        image_name: image_name.to_string(),
        image_data: image_data.to_string(),
        created_at: now.clone(),
        updated_at: now,
    })
}

/// List every image record, oldest first.
pub fn list_images(conn: &Connection) -> Result<Vec<ImageRecord>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {} FROM images ORDER BY id ASC",
            ImageRecord::COLUMNS
        ))
        .map_err(|e| Error::database("Failed to retrieve records.", e))?;

    let rows = stmt
        .query_map([], ImageRecord::from_row)
        .map_err(|e| Error::database("Failed to retrieve records.", e))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database("Failed to retrieve records.", e))?;

    Ok(rows)
}

/// List the image records belonging to one owner, oldest first.
pub fn list_images_by_owner(conn: &Connection, owner: &OwnerHash) -> Result<Vec<ImageRecord>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {} FROM images WHERE owner_hash = ?1 ORDER BY id ASC",
            ImageRecord::COLUMNS
        ))
        .map_err(|e| Error::database("Failed to retrieve records.", e))?;

    let rows = stmt
        .query_map([owner.as_str()], ImageRecord::from_row)
        .map_err(|e| Error::database("Failed to retrieve records.", e))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database("Failed to retrieve records.", e))?;

    Ok(rows)
}

/// Replace the name and payload of an image the owner holds.
///
/// Refreshes `updated_at`; `created_at` is untouched.
///
/// # Returns
///
/// * `Ok(true)` - If a row matched both `id` and `owner`
/// * `Ok(false)` - If no row matched
/// * `Err(Error)` - If a database error occurs
pub fn update_owned_image(
    conn: &Connection,
    id: ImageId,
    owner: &OwnerHash,
    image_name: &str,
    image_data: &str,
) -> Result<bool> {
    let n = conn
        .execute(
            "UPDATE images
             SET image_name = ?1, image_data = ?2, updated_at = ?3
             WHERE id = ?4 AND owner_hash = ?5",
            rusqlite::params![image_name, image_data, now_timestamp(), id.get(), owner.as_str()],
        )
        .map_err(|e| Error::database("Failed to update record.", e))?;
    Ok(n > 0)
}

/// Delete an image the owner holds. Returns true if a row was deleted.
pub fn delete_owned_image(conn: &Connection, id: ImageId, owner: &OwnerHash) -> Result<bool> {
    let n = conn
        .execute(
            "DELETE FROM images WHERE id = ?1 AND owner_hash = ?2",
            rusqlite::params![id.get(), owner.as_str()],
        )
        .map_err(|e| Error::database("Failed to delete record.", e))?;
    Ok(n > 0)
}
