//! The image record store.
//!
//! [`RecordStore`] is the only component that touches the `images` table on
//! behalf of clients. Every operation validates its input first, derives the
//! owner hash from the raw `uid`, and then issues a single storage call.
//!
//! Inputs arrive loosely typed: an `Option<&str>` or `Option<i64>` of `None`
//! means the field was missing or had the wrong JSON type, and is rejected
//! the same way as a value that breaks a length or content rule.

use picvault_common::validate::{self, Field};
use picvault_common::{hash_owner_id, Error, ImageId, Result};
use picvault_db::migrations;
use picvault_db::models::ImageRecord;
use picvault_db::pool::{get_conn, DbPool};
use picvault_db::queries::images;
use serde::Serialize;
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Result of [`RecordStore::read`].
#[derive(Debug, Clone, Serialize)]
pub struct ImageListing {
    /// Every record in the table.
    #[serde(rename = "all_json")]
    pub all: Vec<ImageRecord>,
    /// Records owned by the requested `uid`, when one was given.
    #[serde(rename = "uid_json", skip_serializing_if = "Option::is_none")]
    pub owned: Option<Vec<ImageRecord>>,
}

/// Validated, owner-scoped access to the image table.
///
/// Cloning is cheap; clones share the same connection pool.
#[derive(Clone)]
pub struct RecordStore {
    pool: DbPool,
    init_password: Arc<str>,
}

impl RecordStore {
    pub fn new(pool: DbPool, init_password: impl Into<String>) -> Self {
        Self {
            pool,
            init_password: Arc::from(init_password.into()),
        }
    }

    /// Drop and recreate the image table if `password` is the init secret.
    ///
    /// A wrong or missing secret returns [`Error::Unauthorized`] without
    /// touching storage.
    pub fn initialize(&self, password: Option<&str>) -> Result<()> {
        let authorized = password
            .map(|p| bool::from(p.as_bytes().ct_eq(self.init_password.as_bytes())))
            .unwrap_or(false);

        if !authorized {
            tracing::warn!("Rejected database initialization: bad password");
            return Err(Error::Unauthorized("Invalid password.".into()));
        }

        let conn = get_conn(&self.pool)?;
        migrations::reset_images_table(&conn)?;

        tracing::info!("Image table reset");
        Ok(())
    }

    /// Validate and insert a new record.
    ///
    /// Fields are checked in the order `uid`, `image_name`, `base64Image`;
    /// the first one that fails is named in the error.
    pub fn create(
        &self,
        owner_id: Option<&str>,
        image_name: Option<&str>,
        image_data: Option<&str>,
    ) -> Result<ImageRecord> {
        let owner_id = require(Field::OwnerId, owner_id)?;
        let image_name = require(Field::ImageName, image_name)?;
        let image_data = require(Field::ImageData, image_data)?;

        let owner = hash_owner_id(owner_id);
        let conn = get_conn(&self.pool)?;
        let record = images::insert_image(&conn, &owner, image_name, image_data)?;

        tracing::info!(id = %record.id, "Image record created");
        Ok(record)
    }

    /// Fetch all records, plus the subset owned by `owner_id` if one is given.
    ///
    /// `owner_id` is not validated; an empty string counts as absent.
    pub fn read(&self, owner_id: Option<&str>) -> Result<ImageListing> {
        let conn = get_conn(&self.pool)?;
        let all = images::list_images(&conn)?;

        let owned = match owner_id.filter(|id| !id.is_empty()) {
            Some(owner_id) => Some(images::list_images_by_owner(&conn, &hash_owner_id(owner_id))?),
            None => None,
        };

        tracing::debug!(
            total = all.len(),
            owned = owned.as_ref().map(Vec::len),
            "Image records read"
        );
        Ok(ImageListing { all, owned })
    }

    /// Replace the name and payload of a record the caller owns.
    ///
    /// Any invalid field yields the same generic validation error. A missing
    /// id and an id owned by someone else both yield
    /// [`Error::NotFoundOrOwnerMismatch`].
    pub fn update(
        &self,
        id: Option<i64>,
        owner_id: Option<&str>,
        image_name: Option<&str>,
        image_data: Option<&str>,
    ) -> Result<()> {
        let (Some(id), Some(owner_id), Some(image_name), Some(image_data)) =
            (id, owner_id, image_name, image_data)
        else {
            return Err(Error::validation(validate::INVALID_INPUT));
        };

        if !(validate::is_valid_owner_id(owner_id)
            && validate::is_valid_image_name(image_name)
            && validate::is_valid_image_data(image_data))
        {
            return Err(Error::validation(validate::INVALID_INPUT));
        }

        let id = ImageId::from(id);
        let conn = get_conn(&self.pool)?;
        let changed =
            images::update_owned_image(&conn, id, &hash_owner_id(owner_id), image_name, image_data)?;

        if !changed {
            tracing::debug!(%id, "Update matched no owned record");
            return Err(Error::NotFoundOrOwnerMismatch);
        }

        tracing::info!(%id, "Image record updated");
        Ok(())
    }

    /// Delete a record the caller owns.
    ///
    /// Only the types are checked: `owner_id` may be any string, including
    /// one longer than `create` would accept.
    pub fn delete(&self, id: Option<i64>, owner_id: Option<&str>) -> Result<()> {
        let (Some(id), Some(owner_id)) = (id, owner_id) else {
            return Err(Error::validation(validate::INVALID_INPUT));
        };

        let id = ImageId::from(id);
        let conn = get_conn(&self.pool)?;
        let deleted = images::delete_owned_image(&conn, id, &hash_owner_id(owner_id))?;

        if !deleted {
            tracing::debug!(%id, "Delete matched no owned record");
            return Err(Error::NotFoundOrOwnerMismatch);
        }

        tracing::info!(%id, "Image record deleted");
        Ok(())
    }
}

fn require(field: Field, value: Option<&str>) -> Result<&str> {
    field.require(value).inspect_err(|_| {
        tracing::debug!(field = field.wire_name(), "Create rejected");
    })
}
