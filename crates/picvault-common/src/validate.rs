//! Field validation rules for image records.
//!
//! The same limits are enforced twice: here, before any storage call, and
//! as `CHECK` constraints on the `images` table. Lengths are counted in
//! Unicode scalar values so both layers agree with SQLite's `length()`.

use crate::{Error, Result};

/// Minimum length of a raw owner identifier.
pub const OWNER_ID_MIN_LEN: usize = 1;
/// Maximum length of a raw owner identifier.
pub const OWNER_ID_MAX_LEN: usize = 50;
/// Minimum length of an image name.
pub const IMAGE_NAME_MIN_LEN: usize = 1;
/// Maximum length of an image name.
pub const IMAGE_NAME_MAX_LEN: usize = 100;
/// Minimum length of the base64 payload (1 KiB).
pub const IMAGE_DATA_MIN_LEN: usize = 1024;
/// Maximum length of the base64 payload (128 KiB).
pub const IMAGE_DATA_MAX_LEN: usize = 131_072;

/// Message returned when update/delete input is rejected.
pub const INVALID_INPUT: &str = "Invalid input.";

/// A user-supplied record field, in the order `create` checks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    OwnerId,
    ImageName,
    ImageData,
}

impl Field {
    /// Name of the field on the wire.
    pub fn wire_name(self) -> &'static str {
        match self {
            Field::OwnerId => "uid",
            Field::ImageName => "image_name",
            Field::ImageData => "base64Image",
        }
    }

    /// Message reported when this field is the first to fail in `create`.
    pub fn invalid_message(self) -> &'static str {
        match self {
            Field::OwnerId => {
                "Invalid uid. It must be a string between 1 and 50 characters."
            }
            Field::ImageName => {
                "Invalid image_name. It must be a string between 1 and 100 characters without spaces."
            }
            Field::ImageData => {
                "Invalid base64Image. It must be a base64 string between 1KB and 128KB."
            }
        }
    }

    /// Whether `value` satisfies this field's rule.
    pub fn accepts(self, value: &str) -> bool {
        match self {
            Field::OwnerId => is_valid_owner_id(value),
            Field::ImageName => is_valid_image_name(value),
            Field::ImageData => is_valid_image_data(value),
        }
    }

    /// Check a loosely-typed field, reporting this field by name on failure.
    ///
    /// `None` stands for a value that was missing or not a string.
    pub fn require(self, value: Option<&str>) -> Result<&str> {
        match value {
            Some(v) if self.accepts(v) => Ok(v),
            _ => Err(Error::validation(self.invalid_message())),
        }
    }
}

fn char_len_within(value: &str, min: usize, max: usize) -> bool {
    let len = value.chars().count();
    (min..=max).contains(&len)
}

/// Raw owner identifier: 1 to 50 characters.
pub fn is_valid_owner_id(value: &str) -> bool {
    char_len_within(value, OWNER_ID_MIN_LEN, OWNER_ID_MAX_LEN)
}

/// Image name: 1 to 100 characters, no whitespace anywhere.
pub fn is_valid_image_name(value: &str) -> bool {
    char_len_within(value, IMAGE_NAME_MIN_LEN, IMAGE_NAME_MAX_LEN)
        && !value.chars().any(is_name_whitespace)
}

/// Unicode `White_Space` plus U+FEFF ZERO WIDTH NO-BREAK SPACE.
fn is_name_whitespace(c: char) -> bool {
    c.is_whitespace() || c == '\u{FEFF}'
}

/// Base64 payload: 1024 to 131072 characters.
///
/// Only the length is checked; the alphabet is not.
pub fn is_valid_image_data(value: &str) -> bool {
    char_len_within(value, IMAGE_DATA_MIN_LEN, IMAGE_DATA_MAX_LEN)
}
