// Gateway contract shared by every store adapter
pub mod database;

// Store-access failure
pub mod error;

pub use database::*;
pub use error::{StoreError, StoreResult};
