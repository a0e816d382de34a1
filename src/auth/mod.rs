//! Credentials and input validation
//!
//! Password hashing for stored users and syntax checks for registration forms.

pub mod credentials;
pub mod validator;

pub use self::credentials::CredentialManager;
pub use self::validator::{RegistrationForm, RegistrationFormBuilder, validate_form};
