//! Error handling
//!
//! Defines error types and their HTTP mapping for the registry service.

pub mod handlers;
pub mod types;

pub use types::*;
