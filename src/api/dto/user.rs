//! DTOs for registration, confirmation and profile endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::dto::contact::{ContactRequest, ContactView};
use crate::application::services::{ProfileUpdate, Registration, UserProfile};
use crate::domain::entities::UserType;
use crate::utils::validation::{not_blank, password_strength};

/// Request body for `POST /user/register`.
///
/// ```json
/// {
///   "first_name": "Name1",
///   "last_name": "Name2",
///   "email": "name2@mail.com",
///   "password": "name1name2",
///   "company": "Company1",
///   "position": "Position1",
///   "contacts": [ { "city": "Miass", ... } ]
/// }
/// ```
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        required(message = "This field is required."),
        custom(function = "not_blank"),
        length(max = 100, message = "Ensure this field has no more than 100 characters.")
    )]
    pub first_name: Option<String>,

    #[validate(
        required(message = "This field is required."),
        custom(function = "not_blank"),
        length(max = 100, message = "Ensure this field has no more than 100 characters.")
    )]
    pub last_name: Option<String>,

    #[validate(
        required(message = "This field is required."),
        email(message = "Enter a valid email address."),
        length(max = 254, message = "Ensure this field has no more than 254 characters.")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "This field is required."),
        custom(function = "password_strength")
    )]
    pub password: Option<String>,

    #[validate(
        required(message = "This field is required."),
        custom(function = "not_blank"),
        length(max = 100, message = "Ensure this field has no more than 100 characters.")
    )]
    pub company: Option<String>,

    #[validate(
        required(message = "This field is required."),
        custom(function = "not_blank"),
        length(max = 100, message = "Ensure this field has no more than 100 characters.")
    )]
    pub position: Option<String>,

    /// Optional initial address book.
    #[serde(default)]
    #[validate(nested)]
    pub contacts: Vec<ContactRequest>,
}

impl From<RegisterRequest> for Registration {
    /// Call only after validation; absent fields become empty strings.
    fn from(req: RegisterRequest) -> Self {
        Registration {
            email: req.email.unwrap_or_default(),
            password: req.password.unwrap_or_default(),
            first_name: req.first_name.unwrap_or_default(),
            last_name: req.last_name.unwrap_or_default(),
            company: req.company.unwrap_or_default(),
            position: req.position.unwrap_or_default(),
            contacts: req.contacts.into_iter().map(Into::into).collect(),
        }
    }
}

/// Request body for `POST /user/register/confirm`.
#[derive(Debug, Deserialize, Validate)]
pub struct ConfirmRequest {
    #[validate(required(message = "This field is required."))]
    pub email: Option<String>,

    #[validate(
        required(message = "This field is required."),
        custom(function = "not_blank")
    )]
    pub token: Option<String>,
}

/// Request body for `POST /user/details`.
///
/// Every field is optional; present fields follow the registration rules.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateDetailsRequest {
    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "Ensure this field has no more than 100 characters.")
    )]
    pub first_name: Option<String>,

    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "Ensure this field has no more than 100 characters.")
    )]
    pub last_name: Option<String>,

    #[validate(
        email(message = "Enter a valid email address."),
        length(max = 254, message = "Ensure this field has no more than 254 characters.")
    )]
    pub email: Option<String>,

    #[validate(custom(function = "password_strength"))]
    pub password: Option<String>,

    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "Ensure this field has no more than 100 characters.")
    )]
    pub company: Option<String>,

    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "Ensure this field has no more than 100 characters.")
    )]
    pub position: Option<String>,
}

impl From<UpdateDetailsRequest> for ProfileUpdate {
    fn from(req: UpdateDetailsRequest) -> Self {
        ProfileUpdate {
            email: req.email,
            password: req.password,
            first_name: req.first_name,
            last_name: req.last_name,
            company: req.company,
            position: req.position,
        }
    }
}

/// Public view of a user. The password hash is never included.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub position: String,
    #[serde(rename = "type")]
    pub user_type: UserType,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
    pub contacts: Vec<ContactView>,
}

/// `{ "Status": true, "id": ..., "email": ..., ..., "contacts": [...] }`
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(rename = "Status")]
    pub status: bool,

    #[serde(flatten)]
    pub user: UserView,
}

impl From<UserProfile> for ProfileResponse {
    fn from(profile: UserProfile) -> Self {
        let UserProfile { user, contacts } = profile;

        ProfileResponse {
            status: true,
            user: UserView {
                id: user.id,
                email: user.email,
                first_name: user.first_name,
                last_name: user.last_name,
                company: user.company,
                position: user.position,
                user_type: user.user_type,
                is_active: user.is_active,
                date_joined: user.date_joined,
                contacts: contacts.into_iter().map(ContactView::from).collect(),
            },
        }
    }
}
