//! HTTP routes
//!
//! `POST /register` takes a multipart form, `GET /user/{user_id}` returns the
//! combined user + profile view.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router, middleware};

use crate::auth::{RegistrationForm, RegistrationFormBuilder};
use crate::error::RegistryError;
use crate::middleware::log_request;
use crate::registry::{RegistryService, UserWithProfile};

/// Room for the text fields and multipart framing on top of the picture itself.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    registry: RegistryService,
    max_picture_size_mb: u64,
}

/// Build the application router around a registry service.
pub fn router(registry: RegistryService) -> Router {
    let max_picture_size = registry.pictures().max_size();
    let state = AppState {
        registry,
        max_picture_size_mb: max_picture_size.div_ceil(1024 * 1024),
    };
    let body_limit = usize::try_from(max_picture_size)
        .unwrap_or(usize::MAX)
        .saturating_add(FORM_OVERHEAD_BYTES);

    Router::new()
        .route("/register", post(register_user))
        .route("/user/{user_id}", get(get_user))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

async fn register_user(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UserWithProfile>, RegistryError> {
    let multipart = multipart.map_err(|e| RegistryError::InvalidForm(e.body_text()))?;
    let form = read_registration_form(multipart, state.max_picture_size_mb).await?;
    let view = state.registry.register(form).await?;
    Ok(Json(view))
}

async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserWithProfile>, RegistryError> {
    let view = state.registry.get_by_id(&user_id).await?;
    Ok(Json(view))
}

/// Decode the multipart body into a validated form. Unknown fields are ignored.
async fn read_registration_form(
    mut multipart: Multipart,
    limit_mb: u64,
) -> Result<RegistrationForm, RegistryError> {
    let to_error = |e: MultipartError| multipart_error(e, limit_mb);
    let mut builder = RegistrationFormBuilder::default();

    while let Some(field) = multipart.next_field().await.map_err(to_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "full_name" => {
                builder.full_name(field.text().await.map_err(to_error)?);
            }
            "email" => {
                builder.email(field.text().await.map_err(to_error)?);
            }
            "password" => {
                builder.password(field.text().await.map_err(to_error)?);
            }
            "phone" => {
                builder.phone(field.text().await.map_err(to_error)?);
            }
            "profile_picture" => {
                builder.profile_picture(field.bytes().await.map_err(to_error)?);
            }
            _ => {}
        }
    }

    builder.build()
}

fn multipart_error(err: MultipartError, limit_mb: u64) -> RegistryError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        RegistryError::PayloadTooLarge { limit_mb }
    } else {
        RegistryError::InvalidForm(err.body_text())
    }
}
