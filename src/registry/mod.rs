//! User registration and lookup

pub mod results;
pub mod service;

pub use results::{ProfileView, UserWithProfile};
pub use service::RegistryService;
