//! Database query modules.
//!
//! - images: image record CRUD, owner-scoped mutation

pub mod images;
