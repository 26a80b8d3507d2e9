//! Helpers for classifying database errors by constraint.

/// Unique constraint on `users.email`.
pub const USERS_EMAIL_CONSTRAINT: &str = "users_email_key";

/// Returns true if `e` is a unique violation of the named constraint.
pub fn is_unique_violation_on(e: &sqlx::Error, constraint: &str) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    db_err.constraint() == Some(constraint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_error_is_not_violation() {
        assert!(!is_unique_violation_on(
            &sqlx::Error::RowNotFound,
            USERS_EMAIL_CONSTRAINT
        ));
    }
}
