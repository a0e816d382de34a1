//! Durable storage
//!
//! The SQLite-backed user/profile tables and the profile picture directory.

pub mod database;
pub mod pictures;
pub mod records;

pub use database::Database;
pub use pictures::PictureStore;
pub use records::{ProfileRecord, UserRecord};
