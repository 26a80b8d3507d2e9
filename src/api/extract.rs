//! Request extractors.

use axum::extract::FromRequest;

use crate::error::AppError;

/// JSON body extractor whose rejections use the service error envelope.
///
/// Behaves like [`axum::Json`]; a missing content type, malformed JSON or a
/// type mismatch becomes a 400 `{ "Status": false, "Errors": { "body": [...] } }`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Payload<T>(pub T);
