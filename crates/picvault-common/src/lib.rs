//! Picvault-Common: Shared types and rules for the image record service.
//!
//! This crate provides the pieces every layer of picvault agrees on:
//!
//! - **Typed IDs**: [`ImageId`] wrapping the storage-assigned row id
//! - **Owner hashing**: [`OwnerHash`] and [`hash_owner_id`], the only way a
//!   raw caller identifier is turned into an ownership key
//! - **Validation**: length and content rules for every user-supplied field
//! - **Error Handling**: Common error type and result alias
//!
//! # Examples
//!
//! ```
//! use picvault_common::{hash_owner_id, validate, Error, Result};
//!
//! let owner = hash_owner_id("alice");
//! assert_eq!(owner.as_str().len(), 64);
//!
//! assert!(validate::is_valid_image_name("sunset_01.png"));
//! assert!(!validate::is_valid_image_name("my image"));
//!
//! fn example() -> Result<()> {
//!     Err(Error::NotFoundOrOwnerMismatch)
//! }
//! assert!(example().is_err());
//! ```

pub mod error;
pub mod ids;
pub mod owner;
pub mod validate;

pub use error::{Error, Result};
pub use ids::ImageId;
pub use owner::{hash_owner_id, OwnerHash};
