#![allow(dead_code)]

use axum::body::Bytes;
use profile_registry::RegistryService;
use profile_registry::auth::{RegistrationForm, RegistrationFormBuilder};
use profile_registry::config::{HashingConfig, ServerConfig, StartupConfig};
use profile_registry::server::build_registry;
use std::path::PathBuf;
use tempfile::TempDir;

/// A registry backed by a throwaway SQLite file and picture directory.
pub struct TestRegistry {
    pub dir: TempDir,
    pub service: RegistryService,
}

impl TestRegistry {
    pub async fn new() -> Self {
        Self::with_picture_limit_mb(1).await
    }

    pub async fn with_picture_limit_mb(max_picture_size_mb: u64) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir, max_picture_size_mb);
        config.validate().unwrap();
        let service = build_registry(&config).await.unwrap();
        Self { dir, service }
    }

    pub fn picture_dir(&self) -> PathBuf {
        self.dir.path().join("profile_pictures")
    }

    pub fn stored_pictures(&self) -> usize {
        std::fs::read_dir(self.picture_dir()).unwrap().count()
    }

    pub async fn user_count(&self) -> i64 {
        self.service.database().count_users().await.unwrap()
    }

    pub async fn profile_count(&self) -> i64 {
        self.service.database().count_profiles().await.unwrap()
    }
}

pub fn test_config(dir: &TempDir, max_picture_size_mb: u64) -> ServerConfig {
    ServerConfig {
        startup: StartupConfig {
            bind_address: "127.0.0.1".into(),
            port: 8000,
            database_url: format!("sqlite://{}", dir.path().join("registry.db").display()),
            max_connections: 8,
            picture_dir: dir.path().join("profile_pictures").display().to_string(),
            picture_extension: "jpg".into(),
            max_picture_size_mb,
        },
        // Cheap parameters keep the tests fast.
        hashing: HashingConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        },
    }
}

pub fn form(full_name: &str, email: &str, password: &str, phone: &str) -> RegistrationForm {
    let mut builder = RegistrationFormBuilder::default();
    builder
        .full_name(full_name.into())
        .email(email.into())
        .password(password.into())
        .phone(phone.into())
        .profile_picture(Bytes::from_static(b"\xff\xd8\xff\xe0JFIF\x00\x01"));
    builder.build().unwrap()
}

pub fn ada() -> RegistrationForm {
    form("Ada Lovelace", "ada@example.com", "s3cr3t", "+15550100")
}
