//! Registration input validation
//!
//! Turns loosely typed form fields into a checked `RegistrationForm` before any of
//! them reach the registry service.

use axum::body::Bytes;
use std::fmt;
use validator::Validate;

use crate::error::RegistryError;

/// Registration request after multipart decoding
#[derive(Clone, Validate)]
pub struct RegistrationForm {
    pub full_name: String,

    #[validate(email(message = "value is not a valid email address"))]
    pub email: String,

    pub password: String,

    pub phone: String,

    pub profile_picture: Bytes,
}

impl fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("phone", &self.phone)
            .field("profile_picture", &format_args!("{} bytes", self.profile_picture.len()))
            .finish()
    }
}

/// Collects form fields in any order and reports the first one missing.
#[derive(Default)]
pub struct RegistrationFormBuilder {
    full_name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    phone: Option<String>,
    profile_picture: Option<Bytes>,
}

impl fmt::Debug for RegistrationFormBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationFormBuilder")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("phone", &self.phone)
            .field("profile_picture", &self.profile_picture.as_ref().map(Bytes::len))
            .finish()
    }
}

impl RegistrationFormBuilder {
    pub fn full_name(&mut self, value: String) -> &mut Self {
        self.full_name = Some(value);
        self
    }

    pub fn email(&mut self, value: String) -> &mut Self {
        self.email = Some(value);
        self
    }

    pub fn password(&mut self, value: String) -> &mut Self {
        self.password = Some(value);
        self
    }

    pub fn phone(&mut self, value: String) -> &mut Self {
        self.phone = Some(value);
        self
    }

    pub fn profile_picture(&mut self, value: Bytes) -> &mut Self {
        self.profile_picture = Some(value);
        self
    }

    /// Build and validate the form. The email comes back with its domain lowercased.
    pub fn build(self) -> Result<RegistrationForm, RegistryError> {
        let mut form = RegistrationForm {
            full_name: required(self.full_name, "full_name")?,
            email: required(self.email, "email")?,
            password: required(self.password, "password")?,
            phone: required(self.phone, "phone")?,
            profile_picture: required(self.profile_picture, "profile_picture")?,
        };
        validate_form(&form)?;
        form.email = normalize_email(&form.email);
        Ok(form)
    }
}

/// Lowercase the domain part; the local part is kept as typed.
pub fn normalize_email(email: &str) -> String {
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => email.to_string(),
    }
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, RegistryError> {
    value.ok_or_else(|| RegistryError::InvalidForm(format!("field required: {field}")))
}

/// Validates field syntax; uniqueness is left to the registry service.
pub fn validate_form(form: &RegistrationForm) -> Result<(), RegistryError> {
    form.validate().map_err(|e| RegistryError::InvalidForm(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_builder() -> RegistrationFormBuilder {
        let mut builder = RegistrationFormBuilder::default();
        builder
            .full_name("Ada Lovelace".into())
            .email("ada@example.com".into())
            .password("s3cr3t".into())
            .phone("+15550100".into())
            .profile_picture(Bytes::from_static(b"0123456789"));
        builder
    }

    #[test]
    fn builds_complete_form() {
        let form = complete_builder().build().unwrap();
        assert_eq!(form.email, "ada@example.com");
        assert_eq!(form.profile_picture.len(), 10);
    }

    #[test]
    fn rejects_malformed_email() {
        let mut builder = complete_builder();
        builder.email("not-an-email".into());
        match builder.build() {
            Err(RegistryError::InvalidForm(msg)) => assert!(msg.contains("email")),
            other => panic!("expected InvalidForm, got {other:?}"),
        }
    }

    #[test]
    fn reports_missing_field() {
        let mut builder = RegistrationFormBuilder::default();
        builder
            .full_name("Ada Lovelace".into())
            .email("ada@example.com".into())
            .password("s3cr3t".into())
            .profile_picture(Bytes::from_static(b"x"));
        match builder.build() {
            Err(RegistryError::InvalidForm(msg)) => assert_eq!(msg, "field required: phone"),
            other => panic!("expected InvalidForm, got {other:?}"),
        }
    }

    #[test]
    fn lowercases_email_domain_only() {
        let mut builder = complete_builder();
        builder.email("Ada.Lovelace@EXAMPLE.Com".into());
        let form = builder.build().unwrap();
        assert_eq!(form.email, "Ada.Lovelace@example.com");
    }

    #[test]
    fn debug_output_hides_password() {
        let form = complete_builder().build().unwrap();
        let rendered = format!("{form:?}");
        assert!(!rendered.contains("s3cr3t"));
        assert!(rendered.contains("ada@example.com"));

        let rendered = format!("{:?}", complete_builder());
        assert!(!rendered.contains("s3cr3t"));
    }

    #[test]
    fn empty_picture_is_accepted() {
        let mut builder = complete_builder();
        builder.profile_picture(Bytes::new());
        assert!(builder.build().is_ok());
    }
}
