//! Token authentication middleware.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

use crate::application::services::auth_service::LOGIN_REQUIRED;
use crate::domain::entities::User;
use crate::{error::AppError, state::AppState};

/// The authenticated user, inserted into request extensions by [`layer`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Extracts the key from `Authorization: Token <key>`.
///
/// The scheme is case-insensitive and `Bearer` is accepted as well.
fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, key) = value.trim().split_once(' ')?;

    if scheme.eq_ignore_ascii_case("token") || scheme.eq_ignore_ascii_case("bearer") {
        Some(key.trim())
    } else {
        None
    }
}

/// Authenticates requests using the token from the Authorization header.
///
/// # Header Format
///
/// ```text
/// Authorization: Token <key>
/// ```
///
/// # Authentication Flow
///
/// 1. Extract key from `Authorization` header
/// 2. Resolve key to its user
/// 3. Require the user to be active
/// 4. Record the user id on the request span
/// 5. Insert [`CurrentUser`] into request extensions
///
/// # Errors
///
/// Returns `403 Forbidden` with `{ "Status": false, "Error": "Log in required" }`
/// if the header is missing or malformed, or the key does not resolve to an
/// active user.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, routing::get, middleware};
/// use crate::api::middleware::auth;
///
/// let protected = Router::new()
///     .route("/user/details", get(details_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let key = token_from_headers(req.headers())
        .ok_or_else(|| AppError::unauthorized(LOGIN_REQUIRED))?
        .to_string();

    let user = st.auth_service.authenticate(&key).await?;
    tracing::Span::current().record("user_id", user.id);
    tracing::debug!(user_id = user.id, "Request authenticated");

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}
