//! API route configuration.
//!
//! Routes are grouped by access level so that the top-level router can give
//! each group its own rate limit. [`api_router`] assembles all groups
//! without rate limits.

use crate::api::handlers::{
    confirm_handler, create_contact_handler, delete_contacts_handler, details_handler,
    list_contacts_handler, login_handler, register_handler, update_contact_handler,
    update_details_handler,
};
use crate::api::middleware::auth;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// Unauthenticated account routes.
///
/// # Endpoints
///
/// - `POST /user/register`         - Create an inactive account
/// - `POST /user/register/confirm` - Activate it with the emailed token
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/user/register", post(register_handler))
        .route("/user/register/confirm", post(confirm_handler))
}

/// Credential exchange.
///
/// # Endpoints
///
/// - `POST /user/login` - Returns the user's auth token
pub fn login_routes() -> Router<AppState> {
    Router::new().route("/user/login", post(login_handler))
}

/// Routes that require `Authorization: Token <key>`.
///
/// The guard is attached with `route_layer`, so unknown paths still yield 404.
///
/// # Endpoints
///
/// - `GET    /user/details` - Profile with contacts
/// - `POST   /user/details` - Partial profile update
/// - `GET    /user/contact` - List contacts
/// - `POST   /user/contact` - Create a contact
/// - `PUT    /user/contact` - Update a contact
/// - `DELETE /user/contact` - Delete contacts by id
pub fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/user/details",
            get(details_handler).post(update_details_handler),
        )
        .route(
            "/user/contact",
            get(list_contacts_handler)
                .post(create_contact_handler)
                .put(update_contact_handler)
                .delete(delete_contacts_handler),
        )
        .route_layer(middleware::from_fn_with_state(state, auth::layer))
}

/// Every API route, ready to be nested under `/api/v1`.
pub fn api_router(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(public_routes())
        .merge(login_routes())
        .merge(protected_routes(state))
}
