//! Database access
//!
//! Owns the SQLite connection pool and every query the registry issues. The unique
//! indexes on `users.email` and `users.phone` are the authoritative uniqueness guard.

use log::info;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, SqliteConnection, Transaction};
use std::str::FromStr;
use std::time::Duration;

use crate::error::StorageError;
use crate::storage::records::{ProfileRecord, UserRecord};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: [&str; 5] = [
    "CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY NOT NULL,
        full_name TEXT NOT NULL,
        email TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        phone TEXT NOT NULL
    )",
    "CREATE UNIQUE INDEX IF NOT EXISTS ix_users_email ON users (email)",
    "CREATE UNIQUE INDEX IF NOT EXISTS ix_users_phone ON users (phone)",
    "CREATE INDEX IF NOT EXISTS ix_users_full_name ON users (full_name)",
    "CREATE TABLE IF NOT EXISTS profiles (
        id TEXT PRIMARY KEY NOT NULL,
        user_id TEXT NOT NULL REFERENCES users (id),
        profile_picture_path TEXT NOT NULL
    )",
];

/// Shared handle to the registry database. Cloning shares the pool.
#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open a pool for `url`, creating the database file if needed.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        info!("Connected to database {url} (max {max_connections} connections)");
        Ok(Self { pool })
    }

    /// Create tables and indexes that do not exist yet.
    pub async fn migrate(&self) -> Result<(), StorageError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Start a transaction on a pooled connection; dropping it uncommitted rolls back.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>, StorageError> {
        Ok(self.pool.begin().await?)
    }

    /// Whether any user already holds this email or this phone number
    pub async fn email_or_phone_taken(
        &self,
        email: &str,
        phone: &str,
    ) -> Result<bool, StorageError> {
        let matches =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email = ? OR phone = ?")
                .bind(email)
                .bind(phone)
                .fetch_one(&self.pool)
                .await?;
        Ok(matches > 0)
    }

    pub async fn insert_user(
        conn: &mut SqliteConnection,
        user: &UserRecord,
    ) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO users (id, full_name, email, password_hash, phone) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&user.id)
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.phone)
        .execute(conn)
        .await
        .map_err(StorageError::from_write)?;
        Ok(())
    }

    pub async fn insert_profile(
        conn: &mut SqliteConnection,
        profile: &ProfileRecord,
    ) -> Result<(), StorageError> {
        sqlx::query("INSERT INTO profiles (id, user_id, profile_picture_path) VALUES (?, ?, ?)")
            .bind(&profile.id)
            .bind(&profile.user_id)
            .bind(&profile.profile_picture_path)
            .execute(conn)
            .await
            .map_err(StorageError::from_write)?;
        Ok(())
    }

    pub async fn find_user(&self, user_id: &str) -> Result<Option<UserRecord>, StorageError> {
        let user = sqlx::query_as::<_, UserRecord>(
            "SELECT id, full_name, email, password_hash, phone FROM users WHERE id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn find_profile_for_user(
        &self,
        user_id: &str,
    ) -> Result<Option<ProfileRecord>, StorageError> {
        let profile = sqlx::query_as::<_, ProfileRecord>(
            "SELECT id, user_id, profile_picture_path FROM profiles WHERE user_id = ? LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    /// Number of rows in `users`
    pub async fn count_users(&self) -> Result<i64, StorageError> {
        Ok(sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?)
    }

    /// Number of rows in `profiles`
    pub async fn count_profiles(&self) -> Result<i64, StorageError> {
        Ok(sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM profiles")
            .fetch_one(&self.pool)
            .await?)
    }

    /// The underlying pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
