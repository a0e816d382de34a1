//! Configuration management for the profile registry
//!
//! Layers built-in defaults, an optional `config.toml`, and `PROFILE_REGISTRY_*`
//! environment variables. Everything here is read once at startup.

use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Config files tried in order; both are optional.
const CONFIG_PATHS: [&str; 2] = [
    "profile-registry/config", // Container layout: /app/profile-registry/config.toml
    "config",                  // Local development: ./config.toml
];

const ENV_PREFIX: &str = "PROFILE_REGISTRY";

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Upper bound on `max_picture_size_mb` (1 TiB)
const MAX_PICTURE_SIZE_MB: u64 = 1024 * 1024;

/// Complete service configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(flatten)]
    pub startup: StartupConfig,

    pub hashing: HashingConfig,
}

/// Network, database and picture storage settings
#[derive(Debug, Deserialize, Clone)]
pub struct StartupConfig {
    /// IP address the HTTP listener binds to
    pub bind_address: String,

    /// Port for the HTTP listener
    pub port: u16,

    /// sqlx connection URL, e.g. `sqlite://registry.db`
    pub database_url: String,

    /// Upper bound on pooled database connections
    pub max_connections: u32,

    /// Directory receiving uploaded profile pictures
    pub picture_dir: String,

    /// Fixed extension given to every stored picture
    pub picture_extension: String,

    /// Maximum accepted picture size in MB
    pub max_picture_size_mb: u64,
}

/// Argon2id cost parameters
#[derive(Debug, Deserialize, Clone)]
pub struct HashingConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

impl ServerConfig {
    /// Load configuration from defaults, config.toml and environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Self::defaults()?;
        for path in CONFIG_PATHS {
            builder = builder.add_source(File::with_name(path).required(false));
        }

        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let hashing = HashingConfig::default();
        Config::builder()
            .set_default("bind_address", "0.0.0.0")?
            .set_default("port", 8000)?
            .set_default("database_url", "sqlite://registry.db")?
            .set_default("max_connections", 10)?
            .set_default("picture_dir", "profile_pictures")?
            .set_default("picture_extension", "jpg")?
            .set_default("max_picture_size_mb", 10)?
            .set_default("hashing.memory_kib", i64::from(hashing.memory_kib))?
            .set_default("hashing.iterations", i64::from(hashing.iterations))?
            .set_default("hashing.parallelism", i64::from(hashing.parallelism))
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.startup.port == 0 {
            return Err(ConfigError::Message("port cannot be 0".into()));
        }

        if self.startup.database_url.trim().is_empty() {
            return Err(ConfigError::Message("database_url cannot be empty".into()));
        }

        if self.startup.max_connections == 0 {
            return Err(ConfigError::Message(
                "max_connections must be greater than 0".into(),
            ));
        }

        if self.startup.picture_dir.trim().is_empty() {
            return Err(ConfigError::Message("picture_dir cannot be empty".into()));
        }

        let ext = &self.startup.picture_extension;
        if ext.is_empty() || ext.contains(['.', '/', '\\']) {
            return Err(ConfigError::Message(format!(
                "picture_extension must be a bare extension, got {ext:?}"
            )));
        }

        if self.startup.max_picture_size_mb == 0 {
            return Err(ConfigError::Message(
                "max_picture_size_mb must be greater than 0".into(),
            ));
        }

        if self.startup.max_picture_size_mb > MAX_PICTURE_SIZE_MB {
            return Err(ConfigError::Message(format!(
                "max_picture_size_mb cannot exceed {MAX_PICTURE_SIZE_MB}"
            )));
        }

        argon2::Params::new(
            self.hashing.memory_kib,
            self.hashing.iterations,
            self.hashing.parallelism,
            None,
        )
        .map_err(|e| ConfigError::Message(format!("invalid hashing parameters: {e}")))?;

        Ok(())
    }
}

impl StartupConfig {
    /// Bind address and port as a socket address
    pub fn http_socket(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_address, self.port)
            .parse()
            .map_err(|e| ConfigError::Message(format!("invalid bind address: {e}")))
    }

    /// Picture directory as PathBuf
    pub fn picture_dir_path(&self) -> PathBuf {
        PathBuf::from(&self.picture_dir)
    }

    /// Maximum picture size in bytes
    pub fn max_picture_size_bytes(&self) -> u64 {
        self.max_picture_size_mb.saturating_mul(BYTES_PER_MB)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ServerConfig {
        ServerConfig {
            startup: StartupConfig {
                bind_address: "127.0.0.1".into(),
                port: 8000,
                database_url: "sqlite::memory:".into(),
                max_connections: 5,
                picture_dir: "profile_pictures".into(),
                picture_extension: "jpg".into(),
                max_picture_size_mb: 10,
            },
            hashing: HashingConfig::default(),
        }
    }

    #[test]
    fn accepts_sample_config() {
        let config = sample();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.startup.http_socket().unwrap().to_string(),
            "127.0.0.1:8000"
        );
        assert_eq!(config.startup.max_picture_size_bytes(), 10 * 1024 * 1024);
    }

    #[test]
    fn rejects_dotted_extension() {
        let mut config = sample();
        config.startup.picture_extension = ".jpg".into();
        assert!(config.validate().is_err());

        config.startup.picture_extension = "a/b".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_limits() {
        let mut config = sample();
        config.startup.max_picture_size_mb = 0;
        assert!(config.validate().is_err());

        let mut config = sample();
        config.startup.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_oversized_picture_limit() {
        let mut config = sample();
        config.startup.max_picture_size_mb = u64::MAX;
        assert!(config.validate().is_err());
        assert_eq!(config.startup.max_picture_size_bytes(), u64::MAX);

        config.startup.max_picture_size_mb = MAX_PICTURE_SIZE_MB;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_unusable_hashing_params() {
        let mut config = sample();
        config.hashing.parallelism = 0;
        assert!(config.validate().is_err());
    }
}
