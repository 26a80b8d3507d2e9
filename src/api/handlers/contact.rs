//! Handlers for the contact endpoints.

use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::api::dto::contact::{
    ContactListResponse, ContactRequest, ContactResponse, ContactView, DeleteContactsRequest,
    DeleteContactsResponse, UpdateContactRequest,
};
use crate::api::extract::Payload;
use crate::api::middleware::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::validation::{FieldErrors, check};

/// Lists the authenticated user's contacts.
///
/// # Endpoint
///
/// `GET /api/v1/user/contact`
pub async fn list_contacts_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<ContactListResponse>, AppError> {
    let contacts = state.contact_service.list(user.id).await?;

    Ok(Json(ContactListResponse {
        status: true,
        contacts: contacts.into_iter().map(ContactView::from).collect(),
    }))
}

/// Adds a contact.
///
/// # Endpoint
///
/// `POST /api/v1/user/contact`
///
/// # Request Body
///
/// ```json
/// {
///   "city": "Miass", "street": "Veteranov", "house": "9", "structure": "0",
///   "building": "0", "apartment": "0", "phone": "8-800-555-35-35"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 listing every missing or malformed field.
pub async fn create_contact_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Payload(payload): Payload<ContactRequest>,
) -> Result<(StatusCode, Json<ContactResponse>), AppError> {
    check(&payload).map_err(|e| e.into_bad_request())?;

    let contact = state
        .contact_service
        .create(user.id, payload.into())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ContactResponse {
            status: true,
            contact: contact.into(),
        }),
    ))
}

/// Partially updates one of the user's contacts.
///
/// # Endpoint
///
/// `PUT /api/v1/user/contact`
///
/// `id` may be a number or a numeric string.
///
/// # Errors
///
/// - 400 if `id` is missing or a present field is malformed
/// - 404 if the user owns no contact with that id
pub async fn update_contact_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Payload(payload): Payload<UpdateContactRequest>,
) -> Result<Json<ContactResponse>, AppError> {
    check(&payload).map_err(|e| e.into_bad_request())?;

    let (id, patch) = payload.into_parts();
    let id = id.ok_or_else(|| FieldErrors::missing("id").into_bad_request())?;

    let contact = state.contact_service.update(user.id, id, patch).await?;

    Ok(Json(ContactResponse {
        status: true,
        contact: contact.into(),
    }))
}

/// Deletes contacts by id.
///
/// # Endpoint
///
/// `DELETE /api/v1/user/contact`
///
/// # Request Body
///
/// ```json
/// { "items": "10, 11" }
/// ```
///
/// An array (`[10, 11]`) is accepted too. Ids that are unknown or belong to
/// another user are skipped; the response reports how many were deleted.
///
/// # Errors
///
/// Returns 400 if `items` is absent, empty, or contains a non-integer.
pub async fn delete_contacts_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Payload(payload): Payload<DeleteContactsRequest>,
) -> Result<Json<DeleteContactsResponse>, AppError> {
    let ids = payload.ids().map_err(|e| e.into_bad_request())?;

    let deleted = state.contact_service.delete(user.id, &ids).await?;

    Ok(Json(DeleteContactsResponse {
        status: true,
        deleted,
    }))
}
