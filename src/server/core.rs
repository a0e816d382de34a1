use axum::Router;
use log::{info, warn};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::auth::CredentialManager;
use crate::config::ServerConfig;
use crate::error::StartupError;
use crate::registry::RegistryService;
use crate::server::routes::router;
use crate::storage::{Database, PictureStore};

pub struct Server {
    listener: TcpListener,
    app: Router,
}

impl Server {
    /// Open the database, prepare picture storage and bind the listener.
    pub async fn new(config: ServerConfig) -> Result<Self, StartupError> {
        let registry = build_registry(&config).await?;

        let addr = config.startup.http_socket()?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| StartupError::Bind {
                addr: addr.to_string(),
                source,
            })?;
        info!("Server bound to {addr}");

        Ok(Self {
            listener,
            app: router(registry),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve requests until Ctrl-C.
    pub async fn start(self) -> Result<(), StartupError> {
        info!("Starting profile registry on {}", self.local_addr().map_err(StartupError::Serve)?);

        axum::serve(self.listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(StartupError::Serve)
    }
}

/// Build the registry service from configuration: pool, schema, picture
/// directory and password hasher.
pub async fn build_registry(config: &ServerConfig) -> Result<RegistryService, StartupError> {
    let startup = &config.startup;

    let db = Database::connect(&startup.database_url, startup.max_connections).await?;
    db.migrate().await?;

    let pictures = PictureStore::new(
        startup.picture_dir_path(),
        startup.picture_extension.clone(),
        startup.max_picture_size_bytes(),
    );
    pictures.ensure_dir().await?;

    let credentials = CredentialManager::new(&config.hashing)?;

    Ok(RegistryService::new(db, credentials, pictures))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
