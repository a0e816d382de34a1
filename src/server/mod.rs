//! Server core functionality
//!
//! This module contains the HTTP server, its routes and the wiring of the
//! registry service from configuration.

pub mod core;
pub mod routes;

pub use self::core::{Server, build_registry};
pub use self::routes::router;
