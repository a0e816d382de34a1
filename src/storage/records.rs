//! Storage record types
//!
//! Rows as they are stored in the `users` and `profiles` tables.

use sqlx::FromRow;

/// A row of the `users` table. `password_hash` never leaves the storage and
/// registry layers.
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
}

/// A row of the `profiles` table
#[derive(Debug, Clone, FromRow)]
pub struct ProfileRecord {
    pub id: String,
    pub user_id: String,
    pub profile_picture_path: String,
}
