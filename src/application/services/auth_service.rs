//! Authentication service: login, token issuing and token resolution.

use std::sync::Arc;

use serde_json::Value;

use crate::domain::entities::{AuthToken, User, normalize_email};
use crate::domain::repositories::{TokenRepository, UserRepository};
use crate::error::AppError;
use crate::utils::password::{dummy_hash, verify_password_blocking};
use crate::utils::token_generator::generate_auth_key;

/// Message returned for every failed token resolution.
pub const LOGIN_REQUIRED: &str = "Log in required";

/// Message returned for every failed login, whatever the cause.
pub const INVALID_CREDENTIALS: &str = "Could not authenticate: invalid email or password";

/// Hash a login attempt is checked against. Unknown emails use the dummy
/// hash so that every attempt pays for one Argon2 verification.
fn credential_hash(user: Option<&User>) -> String {
    match user {
        Some(user) => user.password_hash.clone(),
        None => dummy_hash().to_string(),
    }
}

/// Service for authenticating users by password or token.
///
/// Keys are stored verbatim so that get-or-create can hand the same key back
/// on every login.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn TokenRepository>,
}

impl AuthService {
    /// Creates a new authentication service.
    pub fn new(users: Arc<dyn UserRepository>, tokens: Arc<dyn TokenRepository>) -> Self {
        Self { users, tokens }
    }

    /// Checks credentials and returns the user's token.
    ///
    /// The password is always verified, on the blocking pool, even when the
    /// email is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] with the same message whether the email
    /// is unknown, the password is wrong, or the account is inactive.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthToken, AppError> {
        let email = normalize_email(email);

        let user = self.users.find_by_email(&email).await?;
        let matches =
            verify_password_blocking(password.to_string(), credential_hash(user.as_ref())).await?;

        let Some(user) = user.filter(|user| matches && user.is_active) else {
            tracing::info!("Login rejected");
            return Err(AppError::forbidden(INVALID_CREDENTIALS, Value::Null));
        };

        let token = self.get_or_create_token(&user).await?;
        tracing::info!(user_id = user.id, "User logged in");

        Ok(token)
    }

    /// Returns the user's token, creating one on first use.
    ///
    /// Idempotent: repeated calls return the same key.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn get_or_create_token(&self, user: &User) -> Result<AuthToken, AppError> {
        self.tokens
            .get_or_create(user.id, &generate_auth_key())
            .await
    }

    /// Resolves a token key to its active owner.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the key is empty, unknown, or
    /// belongs to an inactive user.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn authenticate(&self, key: &str) -> Result<User, AppError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(AppError::unauthorized(LOGIN_REQUIRED));
        }

        let token = self
            .tokens
            .find_by_key(key)
            .await?
            .ok_or_else(|| AppError::unauthorized(LOGIN_REQUIRED))?;

        self.users
            .find_by_id(token.user_id)
            .await?
            .filter(|user| user.is_active)
            .ok_or_else(|| AppError::unauthorized(LOGIN_REQUIRED))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::UserType;
    use crate::domain::repositories::{MockTokenRepository, MockUserRepository};
    use crate::utils::password::hash_password;
    use chrono::Utc;

    const PASSWORD: &str = "name1name2";

    fn create_test_user(id: i64, is_active: bool) -> User {
        User {
            id,
            email: "name2@mail.com".to_string(),
            password_hash: hash_password(PASSWORD).unwrap(),
            first_name: "Name1".to_string(),
            last_name: "Name2".to_string(),
            company: "Company1".to_string(),
            position: "Position1".to_string(),
            user_type: UserType::Buyer,
            is_active,
            date_joined: Utc::now(),
        }
    }

    fn create_test_token(user_id: i64) -> AuthToken {
        AuthToken {
            key: "a".repeat(40),
            user_id,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_login_success() {
        let mut users = MockUserRepository::new();
        let mut tokens = MockTokenRepository::new();

        let user = create_test_user(1, true);
        users
            .expect_find_by_email()
            .withf(|email| email == "name2@mail.com")
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        tokens
            .expect_get_or_create()
            .withf(|user_id, candidate| *user_id == 1 && candidate.len() == 40)
            .times(1)
            .returning(|user_id, _| Ok(create_test_token(user_id)));

        let service = AuthService::new(Arc::new(users), Arc::new(tokens));

        let token = service.login(" Name2@Mail.com ", PASSWORD).await.unwrap();

        assert_eq!(token.user_id, 1);
        assert_eq!(token.key.len(), 40);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let mut users = MockUserRepository::new();
        let user = create_test_user(1, true);
        users
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = AuthService::new(Arc::new(users), Arc::new(MockTokenRepository::new()));

        let err = service.login("name2@mail.com", "wrong-password").await.unwrap_err();

        assert!(matches!(err, AppError::Forbidden { .. }));
        assert_eq!(err.to_string(), INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn test_login_unknown_email_same_error() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        let service = AuthService::new(Arc::new(users), Arc::new(MockTokenRepository::new()));

        let err = service.login("nobody@mail.com", PASSWORD).await.unwrap_err();

        assert!(matches!(err, AppError::Forbidden { .. }));
        assert_eq!(err.to_string(), INVALID_CREDENTIALS);
    }

    #[test]
    fn test_unknown_email_is_checked_against_dummy_hash() {
        assert_eq!(credential_hash(None), dummy_hash());
        assert!(dummy_hash().starts_with("$argon2id$"));

        let user = create_test_user(1, false);
        assert_eq!(credential_hash(Some(&user)), user.password_hash);
    }

    #[tokio::test]
    async fn test_login_inactive_user_rejected() {
        let mut users = MockUserRepository::new();
        let user = create_test_user(1, false);
        users
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = AuthService::new(Arc::new(users), Arc::new(MockTokenRepository::new()));

        let err = service.login("name2@mail.com", PASSWORD).await.unwrap_err();

        assert!(matches!(err, AppError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn test_get_or_create_token_returns_stored_key() {
        let mut tokens = MockTokenRepository::new();
        tokens
            .expect_get_or_create()
            .times(2)
            .returning(|user_id, _| Ok(create_test_token(user_id)));

        let service = AuthService::new(Arc::new(MockUserRepository::new()), Arc::new(tokens));
        let user = create_test_user(7, true);

        let first = service.get_or_create_token(&user).await.unwrap();
        let second = service.get_or_create_token(&user).await.unwrap();

        assert_eq!(first.key, second.key);
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let mut users = MockUserRepository::new();
        let mut tokens = MockTokenRepository::new();

        tokens
            .expect_find_by_key()
            .withf(|key| key == "abc")
            .times(1)
            .returning(|_| Ok(Some(create_test_token(3))));

        let user = create_test_user(3, true);
        users
            .expect_find_by_id()
            .withf(|id| *id == 3)
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = AuthService::new(Arc::new(users), Arc::new(tokens));

        let resolved = service.authenticate(" abc ").await.unwrap();

        assert_eq!(resolved.id, 3);
    }

    #[tokio::test]
    async fn test_authenticate_unknown_key() {
        let mut tokens = MockTokenRepository::new();
        tokens.expect_find_by_key().times(1).returning(|_| Ok(None));

        let service = AuthService::new(Arc::new(MockUserRepository::new()), Arc::new(tokens));

        let err = service.authenticate("missing").await.unwrap_err();

        assert!(matches!(err, AppError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_authenticate_empty_key_skips_lookup() {
        let service = AuthService::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(MockTokenRepository::new()),
        );

        let err = service.authenticate("   ").await.unwrap_err();

        assert!(matches!(err, AppError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_authenticate_inactive_owner() {
        let mut users = MockUserRepository::new();
        let mut tokens = MockTokenRepository::new();

        tokens
            .expect_find_by_key()
            .times(1)
            .returning(|_| Ok(Some(create_test_token(4))));

        let user = create_test_user(4, false);
        users
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = AuthService::new(Arc::new(users), Arc::new(tokens));

        let err = service.authenticate("key").await.unwrap_err();

        assert!(matches!(err, AppError::Unauthorized { .. }));
    }
}
