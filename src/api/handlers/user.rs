//! Handlers for registration, email confirmation and profile endpoints.

use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::api::dto::envelope::StatusResponse;
use crate::api::dto::user::{
    ConfirmRequest, ProfileResponse, RegisterRequest, UpdateDetailsRequest,
};
use crate::api::extract::Payload;
use crate::api::middleware::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::validation::check;

/// Registers a new (inactive) buyer account.
///
/// # Endpoint
///
/// `POST /api/v1/user/register`
///
/// # Request Body
///
/// ```json
/// {
///   "first_name": "Name1",
///   "last_name": "Name2",
///   "email": "name2@mail.com",
///   "password": "name1name2",
///   "company": "Company1",
///   "position": "Position1",
///   "contacts": []
/// }
/// ```
///
/// A confirmation token is sent to the user; the account can log in after
/// `POST /user/register/confirm`.
///
/// # Errors
///
/// - 400 if any required field is missing (all missing fields are listed)
/// - 403 if a field is malformed (bad email, weak password, ...)
/// - 409 if the email is already registered
pub async fn register_handler(
    State(state): State<AppState>,
    Payload(payload): Payload<RegisterRequest>,
) -> Result<(StatusCode, Json<ProfileResponse>), AppError> {
    check(&payload).map_err(|e| e.into_account_error())?;

    let profile = state.user_service.register(payload.into()).await?;
    tracing::info!(user_id = profile.user.id, "User registered");

    Ok((StatusCode::CREATED, Json(profile.into())))
}

/// Activates an account with the emailed confirmation token.
///
/// # Endpoint
///
/// `POST /api/v1/user/register/confirm`
///
/// # Request Body
///
/// ```json
/// { "email": "name2@mail.com", "token": "..." }
/// ```
///
/// # Errors
///
/// - 400 if a field is missing
/// - 403 if the email is unknown or the token does not match
pub async fn confirm_handler(
    State(state): State<AppState>,
    Payload(payload): Payload<ConfirmRequest>,
) -> Result<Json<StatusResponse>, AppError> {
    check(&payload).map_err(|e| e.into_bad_request())?;

    let email = payload.email.unwrap_or_default();
    let token = payload.token.unwrap_or_default();
    state.user_service.confirm(&email, &token).await?;

    Ok(Json(StatusResponse::ok()))
}

/// Returns the authenticated user's profile with contacts.
///
/// # Endpoint
///
/// `GET /api/v1/user/details`
pub async fn details_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = state.user_service.profile(&user).await?;
    Ok(Json(profile.into()))
}

/// Partially updates the authenticated user's profile.
///
/// # Endpoint
///
/// `POST /api/v1/user/details`
///
/// Only present fields are changed. A new password is re-hashed; a new email
/// must not belong to another account.
///
/// # Errors
///
/// - 403 if a present field is malformed
/// - 409 if the new email is taken
pub async fn update_details_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Payload(payload): Payload<UpdateDetailsRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    check(&payload).map_err(|e| e.into_account_error())?;

    let profile = state
        .user_service
        .update_profile(&user, payload.into())
        .await?;

    Ok(Json(profile.into()))
}
