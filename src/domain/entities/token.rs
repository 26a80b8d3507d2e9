//! Auth token entity.

use chrono::{DateTime, Utc};

/// Bearer credential bound one-to-one to a user.
///
/// The key is what clients send as `Authorization: Token <key>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken {
    pub key: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}
