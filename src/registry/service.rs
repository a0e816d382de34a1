//! Registration and lookup
//!
//! Orchestrates the uniqueness check, password hashing, id generation and the
//! user/profile/picture writes. Holds no per-request state; every clone shares the
//! same pool, hasher and picture store.

use log::{info, warn};
use sqlx::{Sqlite, Transaction};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::validator::normalize_email;
use crate::auth::{CredentialManager, RegistrationForm};
use crate::error::{RegistryError, StorageError};
use crate::registry::results::UserWithProfile;
use crate::storage::{Database, PictureStore, ProfileRecord, UserRecord};

#[derive(Clone)]
pub struct RegistryService {
    db: Database,
    credentials: Arc<CredentialManager>,
    pictures: Arc<PictureStore>,
}

impl RegistryService {
    pub fn new(db: Database, credentials: CredentialManager, pictures: PictureStore) -> Self {
        Self {
            db,
            credentials: Arc::new(credentials),
            pictures: Arc::new(pictures),
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn pictures(&self) -> &PictureStore {
        &self.pictures
    }

    /// Register a new user with its profile picture.
    ///
    /// The user and profile rows are written in one transaction. A failed picture
    /// write rolls the user back; a failed profile write or commit removes the
    /// picture again.
    pub async fn register(
        &self,
        form: RegistrationForm,
    ) -> Result<UserWithProfile, RegistryError> {
        let email = normalize_email(&form.email);
        if self.db.email_or_phone_taken(&email, &form.phone).await? {
            return Err(RegistryError::Conflict);
        }

        let password_hash = self.hash_password(form.password).await?;

        let user = UserRecord {
            id: Uuid::new_v4().to_string(),
            full_name: form.full_name,
            email,
            password_hash,
            phone: form.phone,
        };

        let mut tx = self.db.begin().await?;
        Database::insert_user(&mut tx, &user).await?;

        let profile_id = Uuid::new_v4().to_string();
        // On error the transaction is dropped uncommitted, taking the user row with it.
        let locator = self.pictures.save(&profile_id, &form.profile_picture).await?;

        let profile = ProfileRecord {
            id: profile_id,
            user_id: user.id.clone(),
            profile_picture_path: locator,
        };

        if let Err(e) = commit_profile(tx, &profile).await {
            self.pictures.remove(&profile.profile_picture_path).await;
            return Err(e.into());
        }

        info!("Registered user {} with profile {}", user.id, profile.id);
        Ok(UserWithProfile::assemble(user, profile))
    }

    /// Look up a user and its profile by user id.
    ///
    /// A user row without a profile is reported as `NotFound`.
    pub async fn get_by_id(&self, user_id: &str) -> Result<UserWithProfile, RegistryError> {
        let user = self
            .db
            .find_user(user_id)
            .await?
            .ok_or(RegistryError::NotFound)?;

        let Some(profile) = self.db.find_profile_for_user(&user.id).await? else {
            warn!("User {} has no profile; treating as not found", user.id);
            return Err(RegistryError::NotFound);
        };

        Ok(UserWithProfile::assemble(user, profile))
    }

    /// Check a candidate password for a stored user.
    pub async fn verify_password(
        &self,
        user_id: &str,
        candidate: &str,
    ) -> Result<bool, RegistryError> {
        let user = self
            .db
            .find_user(user_id)
            .await?
            .ok_or(RegistryError::NotFound)?;

        let credentials = Arc::clone(&self.credentials);
        let candidate = candidate.to_string();
        tokio::task::spawn_blocking(move || credentials.verify(&candidate, &user.password_hash))
            .await
            .map_err(|e| RegistryError::Task(e.to_string()))
    }

    /// Argon2 is CPU-bound, so it runs on the blocking pool.
    async fn hash_password(&self, password: String) -> Result<String, RegistryError> {
        let credentials = Arc::clone(&self.credentials);
        let digest = tokio::task::spawn_blocking(move || credentials.hash(&password))
            .await
            .map_err(|e| RegistryError::Task(e.to_string()))??;
        Ok(digest)
    }
}

async fn commit_profile(
    mut tx: Transaction<'static, Sqlite>,
    profile: &ProfileRecord,
) -> Result<(), StorageError> {
    Database::insert_profile(&mut tx, profile).await?;
    tx.commit().await?;
    Ok(())
}
