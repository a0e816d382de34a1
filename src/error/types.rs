//! Error types
//!
//! Defines domain-specific error types for each module of the registry service.

use std::io;

use thiserror::Error;

/// Credential manager errors
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Invalid hashing parameters: {0}")]
    InvalidParams(String),
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}

/// Storage module errors (database and picture files)
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Invalid path: {0}")]
    InvalidPath(String),
    #[error("File too large: {size} bytes exceeds limit of {limit} bytes")]
    FileTooLarge { size: u64, limit: u64 },
}

impl StorageError {
    /// Classify a sqlx error, separating unique index violations from other failures.
    pub fn from_write(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StorageError::UniqueViolation(db_err.message().to_string())
            }
            _ => StorageError::Database(error),
        }
    }
}

/// Registration and lookup errors, the ones surfaced to HTTP clients
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Email or phone number already registered")]
    Conflict,
    #[error("User not found")]
    NotFound,
    #[error("Invalid form: {0}")]
    InvalidForm(String),
    #[error("Profile picture exceeds the {limit_mb} MB limit")]
    PayloadTooLarge { limit_mb: u64 },
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),
    #[error("Background task failed: {0}")]
    Task(String),
}

/// Failures while bringing the server up
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Credential setup failed: {0}")]
    Credential(#[from] CredentialError),
    #[error("Storage setup failed: {0}")]
    Storage(#[from] StorageError),
    #[error("Failed to bind {addr}: {source}")]
    Bind { addr: String, source: io::Error },
    #[error("Server error: {0}")]
    Serve(io::Error),
}
