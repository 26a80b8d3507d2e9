//! DTOs for the contact endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};
use validator::Validate;

use crate::domain::entities::{Contact, ContactPatch, NewContact};
use crate::utils::validation::{FailureKind, FieldErrors, PHONE_REGEX, not_blank};

/// Request body for `POST /user/contact`; also the element type of the
/// optional `contacts` list in registration.
///
/// Every field is required.
#[derive(Debug, Deserialize, Validate)]
pub struct ContactRequest {
    #[validate(
        required(message = "This field is required."),
        custom(function = "not_blank"),
        length(max = 100, message = "Ensure this field has no more than 100 characters.")
    )]
    pub city: Option<String>,

    #[validate(
        required(message = "This field is required."),
        custom(function = "not_blank"),
        length(max = 100, message = "Ensure this field has no more than 100 characters.")
    )]
    pub street: Option<String>,

    #[validate(
        required(message = "This field is required."),
        custom(function = "not_blank"),
        length(max = 100, message = "Ensure this field has no more than 100 characters.")
    )]
    pub house: Option<String>,

    #[validate(
        required(message = "This field is required."),
        custom(function = "not_blank"),
        length(max = 100, message = "Ensure this field has no more than 100 characters.")
    )]
    pub structure: Option<String>,

    #[validate(
        required(message = "This field is required."),
        custom(function = "not_blank"),
        length(max = 100, message = "Ensure this field has no more than 100 characters.")
    )]
    pub building: Option<String>,

    #[validate(
        required(message = "This field is required."),
        custom(function = "not_blank"),
        length(max = 100, message = "Ensure this field has no more than 100 characters.")
    )]
    pub apartment: Option<String>,

    #[validate(
        required(message = "This field is required."),
        regex(path = "*PHONE_REGEX", message = "Enter a valid phone number.")
    )]
    pub phone: Option<String>,
}

impl From<ContactRequest> for NewContact {
    /// Call only after validation; absent fields become empty strings.
    fn from(req: ContactRequest) -> Self {
        NewContact {
            city: req.city.unwrap_or_default(),
            street: req.street.unwrap_or_default(),
            house: req.house.unwrap_or_default(),
            structure: req.structure.unwrap_or_default(),
            building: req.building.unwrap_or_default(),
            apartment: req.apartment.unwrap_or_default(),
            phone: req.phone.unwrap_or_default(),
        }
    }
}

/// Request body for `PUT /user/contact`.
///
/// `id` is required and accepted as a number or a numeric string; the other
/// fields are optional and follow the create rules when present.
#[serde_as]
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateContactRequest {
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[validate(required(message = "This field is required."))]
    pub id: Option<i64>,

    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "Ensure this field has no more than 100 characters.")
    )]
    pub city: Option<String>,

    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "Ensure this field has no more than 100 characters.")
    )]
    pub street: Option<String>,

    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "Ensure this field has no more than 100 characters.")
    )]
    pub house: Option<String>,

    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "Ensure this field has no more than 100 characters.")
    )]
    pub structure: Option<String>,

    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "Ensure this field has no more than 100 characters.")
    )]
    pub building: Option<String>,

    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "Ensure this field has no more than 100 characters.")
    )]
    pub apartment: Option<String>,

    #[validate(regex(path = "*PHONE_REGEX", message = "Enter a valid phone number."))]
    pub phone: Option<String>,
}

impl UpdateContactRequest {
    /// Splits the request into the target id and the field patch.
    pub fn into_parts(self) -> (Option<i64>, ContactPatch) {
        (
            self.id,
            ContactPatch {
                city: self.city,
                street: self.street,
                house: self.house,
                structure: self.structure,
                building: self.building,
                apartment: self.apartment,
                phone: self.phone,
            },
        )
    }
}

/// Ids to delete, as `10`, `"10, 11"` or `[10, "11"]`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum IdList {
    Single(i64),
    Delimited(String),
    List(Vec<IdItem>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum IdItem {
    Number(i64),
    Text(String),
}

/// Request body for `DELETE /user/contact`.
#[derive(Debug, Deserialize)]
pub struct DeleteContactsRequest {
    #[serde(default)]
    pub items: Option<IdList>,
}

impl DeleteContactsRequest {
    /// Parses `items` into contact ids.
    ///
    /// # Errors
    ///
    /// - Missing when `items` is absent, empty, or only separators
    /// - Invalid when any entry is not an integer
    pub fn ids(&self) -> Result<Vec<i64>, FieldErrors> {
        let tokens: Vec<String> = match &self.items {
            None => Vec::new(),
            Some(IdList::Single(id)) => vec![id.to_string()],
            Some(IdList::Delimited(text)) => text.split(',').map(str::to_string).collect(),
            Some(IdList::List(items)) => items
                .iter()
                .map(|item| match item {
                    IdItem::Number(id) => id.to_string(),
                    IdItem::Text(text) => text.clone(),
                })
                .collect(),
        };

        let mut ids = Vec::with_capacity(tokens.len());
        let mut bad = Vec::new();

        for token in tokens.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
            match token.parse::<i64>() {
                Ok(id) => ids.push(id),
                Err(_) => bad.push(token),
            }
        }

        if !bad.is_empty() {
            return Err(FieldErrors::single(
                "items",
                FailureKind::Invalid,
                format!("Invalid contact ids: {}.", bad.join(", ")),
            ));
        }

        if ids.is_empty() {
            return Err(FieldErrors::missing("items"));
        }

        Ok(ids)
    }
}

/// A contact as returned to its owner.
#[derive(Debug, Serialize)]
pub struct ContactView {
    pub id: i64,
    pub city: String,
    pub street: String,
    pub house: String,
    pub structure: String,
    pub building: String,
    pub apartment: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

impl From<Contact> for ContactView {
    fn from(contact: Contact) -> Self {
        ContactView {
            id: contact.id,
            city: contact.city,
            street: contact.street,
            house: contact.house,
            structure: contact.structure,
            building: contact.building,
            apartment: contact.apartment,
            phone: contact.phone,
            created_at: contact.created_at,
        }
    }
}

/// `{ "Status": true, "Contacts": [...] }`
#[derive(Debug, Serialize)]
pub struct ContactListResponse {
    #[serde(rename = "Status")]
    pub status: bool,

    #[serde(rename = "Contacts")]
    pub contacts: Vec<ContactView>,
}

/// `{ "Status": true, "Contact": {...} }`
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    #[serde(rename = "Status")]
    pub status: bool,

    #[serde(rename = "Contact")]
    pub contact: ContactView,
}

/// `{ "Status": true, "Deleted": n }`
#[derive(Debug, Serialize)]
pub struct DeleteContactsResponse {
    #[serde(rename = "Status")]
    pub status: bool,

    #[serde(rename = "Deleted")]
    pub deleted: u64,
}
