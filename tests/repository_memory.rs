use orders_backend::domain::entities::{NewContact, NewUser, UserPatch, UserType};
use orders_backend::domain::repositories::{
    ConfirmationRepository, ContactRepository, TokenRepository, UserRepository,
};
use orders_backend::error::AppError;
use orders_backend::infrastructure::memory::MemoryStore;

fn new_user(email: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        password_hash: "$argon2id$hash".to_string(),
        first_name: "Name1".to_string(),
        last_name: "Name2".to_string(),
        company: "Company1".to_string(),
        position: "Position1".to_string(),
        user_type: UserType::Buyer,
        is_active: false,
    }
}

fn new_contact() -> NewContact {
    NewContact {
        city: "Miass".to_string(),
        street: "Veteranov".to_string(),
        house: "9".to_string(),
        structure: "0".to_string(),
        building: "0".to_string(),
        apartment: "0".to_string(),
        phone: "8-800-555-35-35".to_string(),
    }
}

#[tokio::test]
async fn test_duplicate_email_is_conflict() {
    let store = MemoryStore::new();
    UserRepository::create(&store, new_user("name2@mail.com"))
        .await
        .unwrap();

    let err = UserRepository::create(&store, new_user("name2@mail.com"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict { .. }));
    assert_eq!(UserRepository::count(&store).await.unwrap(), 1);
}

#[tokio::test]
async fn test_update_email_to_taken_one_is_conflict() {
    let store = MemoryStore::new();
    UserRepository::create(&store, new_user("taken@mail.com"))
        .await
        .unwrap();
    let user = UserRepository::create(&store, new_user("name2@mail.com"))
        .await
        .unwrap();

    let patch = UserPatch {
        email: Some("taken@mail.com".to_string()),
        ..Default::default()
    };
    let err = UserRepository::update(&store, user.id, patch)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict { .. }));
}

#[tokio::test]
async fn test_token_get_or_create_is_idempotent() {
    let store = MemoryStore::new();
    let user = UserRepository::create(&store, new_user("name2@mail.com"))
        .await
        .unwrap();

    let first = store.get_or_create(user.id, "first-key").await.unwrap();
    let second = store.get_or_create(user.id, "second-key").await.unwrap();

    assert_eq!(first.key, "first-key");
    assert_eq!(second, first);
    assert_eq!(TokenRepository::count(&store).await.unwrap(), 1);
    assert!(store.find_by_key("second-key").await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_is_scoped_to_owner() {
    let store = MemoryStore::new();
    let owner = UserRepository::create(&store, new_user("owner@mail.com"))
        .await
        .unwrap();
    let other = UserRepository::create(&store, new_user("other@mail.com"))
        .await
        .unwrap();
    let owned = ContactRepository::create(&store, owner.id, new_contact())
        .await
        .unwrap();
    let foreign = ContactRepository::create(&store, other.id, new_contact())
        .await
        .unwrap();

    let deleted = store
        .delete_by_ids(owner.id, &[owned.id, foreign.id, 999])
        .await
        .unwrap();

    assert_eq!(deleted, 1);
    assert!(store.list_by_user(owner.id).await.unwrap().is_empty());
    assert_eq!(store.list_by_user(other.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_confirmation_is_single_use() {
    let store = MemoryStore::new();
    let user = UserRepository::create(&store, new_user("name2@mail.com"))
        .await
        .unwrap();

    store.store(user.id, "hash-1").await.unwrap();

    assert!(!store.consume(user.id, "other-hash").await.unwrap());
    assert!(store.consume(user.id, "hash-1").await.unwrap());
    assert!(!store.consume(user.id, "hash-1").await.unwrap());
}

#[tokio::test]
async fn test_new_confirmation_replaces_pending_one() {
    let store = MemoryStore::new();
    let user = UserRepository::create(&store, new_user("name2@mail.com"))
        .await
        .unwrap();

    store.store(user.id, "hash-1").await.unwrap();
    store.store(user.id, "hash-2").await.unwrap();

    assert!(!store.consume(user.id, "hash-1").await.unwrap());
    assert!(store.consume(user.id, "hash-2").await.unwrap());
}

#[tokio::test]
async fn test_delete_user_removes_owned_rows() {
    let store = MemoryStore::new();
    let user = UserRepository::create(&store, new_user("name2@mail.com"))
        .await
        .unwrap();
    ContactRepository::create(&store, user.id, new_contact())
        .await
        .unwrap();
    store.get_or_create(user.id, "key").await.unwrap();
    store.store(user.id, "hash-1").await.unwrap();

    assert!(UserRepository::delete(&store, user.id).await.unwrap());
    assert!(!UserRepository::delete(&store, user.id).await.unwrap());

    assert!(store.find_by_email("name2@mail.com").await.unwrap().is_none());
    assert!(store.list_by_user(user.id).await.unwrap().is_empty());
    assert!(store.find_by_key("key").await.unwrap().is_none());
    assert!(!store.consume(user.id, "hash-1").await.unwrap());

    UserRepository::create(&store, new_user("name2@mail.com"))
        .await
        .unwrap();
}
