#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, routing::get};
use axum_test::TestServer;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

use orders_backend::api::handlers::health_handler;
use orders_backend::api::routes::api_router;
use orders_backend::application::notifier::ConfirmationNotifier;
use orders_backend::domain::entities::{NewUser, User, UserType};
use orders_backend::domain::repositories::{ConfirmationRepository, UserRepository};
use orders_backend::error::AppError;
use orders_backend::infrastructure::memory::MemoryStore;
use orders_backend::state::{AppState, Repositories};
use orders_backend::utils::password::hash_password;

pub const PASSWORD: &str = "name1name2";

/// Captures issued confirmation tokens instead of sending them.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    /// Last token sent to `email`.
    pub fn token_for(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _)| to == email)
            .map(|(_, token)| token.clone())
    }
}

#[async_trait]
impl ConfirmationNotifier for RecordingNotifier {
    async fn send_confirmation(&self, user: &User, token: &str) -> Result<(), AppError> {
        self.sent
            .lock()
            .unwrap()
            .push((user.email.clone(), token.to_string()));
        Ok(())
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
}

/// Fresh in-memory application with the API nested under `/api/v1`.
pub fn make_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let repositories = Repositories::in_memory_with(store.clone());
    build_app(store, repositories)
}

/// In-memory application whose confirmations go to `confirmations`.
pub fn make_app_with_confirmations(confirmations: Arc<dyn ConfirmationRepository>) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let repositories = Repositories {
        confirmations,
        ..Repositories::in_memory_with(store.clone())
    };
    build_app(store, repositories)
}

fn build_app(store: Arc<MemoryStore>, repositories: Repositories) -> TestApp {
    let notifier = Arc::new(RecordingNotifier::default());

    let state = AppState::new(
        repositories,
        notifier.clone(),
        "test-signing-secret".to_string(),
    );

    let app = Router::new()
        .route("/health", get(health_handler))
        .nest("/api/v1", api_router(state.clone()))
        .with_state(state.clone());

    TestApp {
        server: TestServer::new(app).unwrap(),
        state,
        store,
        notifier,
    }
}

/// Confirmation store whose writes always fail.
pub struct FailingConfirmations;

#[async_trait]
impl ConfirmationRepository for FailingConfirmations {
    async fn store(&self, _user_id: i64, _token_hash: &str) -> Result<(), AppError> {
        Err(AppError::internal("Database error", json!({ "reason": "unavailable" })))
    }

    async fn consume(&self, _user_id: i64, _token_hash: &str) -> Result<bool, AppError> {
        Ok(false)
    }
}

/// Inserts an active buyer with [`PASSWORD`].
pub async fn create_active_user(store: &MemoryStore, email: &str) -> User {
    UserRepository::create(
        store,
        NewUser {
            email: email.to_string(),
            password_hash: hash_password(PASSWORD).unwrap(),
            first_name: "Name1".to_string(),
            last_name: "Name2".to_string(),
            company: "Company1".to_string(),
            position: "Position1".to_string(),
            user_type: UserType::Buyer,
            is_active: true,
        },
    )
    .await
    .unwrap()
}

/// Creates an active user and returns its `Authorization` header value.
pub async fn authorized_user(app: &TestApp, email: &str) -> (User, String) {
    let user = create_active_user(&app.store, email).await;
    let token = app
        .state
        .auth_service
        .get_or_create_token(&user)
        .await
        .unwrap();
    (user, format!("Token {}", token.key))
}

pub fn registration_body() -> Value {
    json!({
        "first_name": "Name1",
        "last_name": "Name2",
        "email": "name2@mail.com",
        "password": PASSWORD,
        "company": "Company1",
        "position": "Position1"
    })
}

pub fn contact_body() -> Value {
    json!({
        "city": "Miass",
        "street": "Veteranov",
        "house": "9",
        "structure": "0",
        "building": "0",
        "apartment": "0",
        "phone": "8-800-555-35-35"
    })
}
