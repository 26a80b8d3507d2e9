//! DTOs for the login endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request body for `POST /user/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(required(message = "This field is required."))]
    pub email: Option<String>,

    #[validate(required(message = "This field is required."))]
    pub password: Option<String>,
}

/// `{ "Status": true, "Token": "<40 hex chars>" }`
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(rename = "Status")]
    pub status: bool,

    #[serde(rename = "Token")]
    pub token: String,
}
