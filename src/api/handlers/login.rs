//! Handler for the login endpoint.

use axum::{Json, extract::State};

use crate::api::dto::login::{LoginRequest, LoginResponse};
use crate::api::extract::Payload;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::validation::check;

/// Exchanges credentials for the user's auth token.
///
/// # Endpoint
///
/// `POST /api/v1/user/login`
///
/// # Request Body
///
/// ```json
/// { "email": "name2@mail.com", "password": "name1name2" }
/// ```
///
/// # Response
///
/// ```json
/// { "Status": true, "Token": "3f9c...e1" }
/// ```
///
/// Repeated logins return the same token.
///
/// # Errors
///
/// - 400 if a field is missing; credentials are not checked
/// - 403 if the credentials are wrong or the account is not yet confirmed
pub async fn login_handler(
    State(state): State<AppState>,
    Payload(payload): Payload<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    check(&payload).map_err(|e| e.into_bad_request())?;

    let email = payload.email.unwrap_or_default();
    let password = payload.password.unwrap_or_default();
    let token = state.auth_service.login(&email, &password).await?;

    Ok(Json(LoginResponse {
        status: true,
        token: token.key,
    }))
}
