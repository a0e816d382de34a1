pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod registry;
pub mod server;
pub mod storage;

pub use registry::{RegistryService, UserWithProfile};
pub use server::Server;
