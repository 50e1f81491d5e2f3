//! On-disk local store and session persistence across reopen

use resale_client::api::models::{ProfileUpdate, UserProfile};
use resale_client::session::{SessionManager, SessionStatus};
use resale_client::store::migrations;
use resale_client::store::{LocalStore, StorageKey};
use serde_json::json;

fn user() -> UserProfile {
    serde_json::from_value(json!({
        "id": 42,
        "email": "asha@example.com",
        "first_name": "Asha",
        "last_name": "Rao",
        "contactNumber": "9876543210",
        "pincode": "411001",
        "role": "customer"
    }))
    .unwrap()
}

/// Values written to a store file are readable after reopening it
#[tokio::test]
async fn test_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("store.db");

    let store = LocalStore::open(&path).await.unwrap();
    assert_eq!(store.location(), Some(path.as_path()));
    store.set("recent_searches", &vec!["galaxy", "iphone"]).await.unwrap();
    store.set(StorageKey::SkipLogin, &true).await.unwrap();
    store.close().await;

    let reopened = LocalStore::open(&path).await.unwrap();
    let searches: Option<Vec<String>> = reopened.get("recent_searches").await.unwrap();
    assert_eq!(searches, Some(vec!["galaxy".to_string(), "iphone".to_string()]));
    assert!(reopened.flag(StorageKey::SkipLogin).await.unwrap());
    assert_eq!(
        reopened.keys().await.unwrap(),
        vec!["recent_searches".to_string(), "skip_login".to_string()]
    );
}

/// Reopening runs no migration twice
#[tokio::test]
async fn test_migrations_applied_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.db");

    let store = LocalStore::open(&path).await.unwrap();
    store.close().await;
    let store = LocalStore::open(&path).await.unwrap();
    let pool = resale_client::store::db::connect(&path).await.unwrap();

    let applied = migrations::applied_migrations(&pool).await.unwrap();
    assert_eq!(applied.len(), migrations::load_migrations().len());
    store.close().await;
    pool.close().await;
}

/// A login survives a restart; a logout clears every auth key
#[tokio::test]
async fn test_session_round_trip_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.db");

    let store = LocalStore::open(&path).await.unwrap();
    let mut manager = SessionManager::restore(store.clone()).await.unwrap();
    manager.login(user()).await.unwrap();
    store.close().await;

    let store = LocalStore::open(&path).await.unwrap();
    let mut manager = SessionManager::restore(store.clone()).await.unwrap();
    assert_eq!(manager.session().status(), SessionStatus::SignedIn);
    let restored = manager.current_user().unwrap();
    assert_eq!(restored.display_name(), "Asha Rao");
    assert_eq!(restored.extra.get("role"), Some(&json!("customer")));

    let update = ProfileUpdate {
        first_name: "Asha".into(),
        last_name: "Rao".into(),
        email: "asha@example.com".into(),
        contact_number: 9123456780,
        pincode: 560001,
    };
    assert!(manager.update_profile(&update).await.unwrap());
    manager.logout().await.unwrap();
    for key in [StorageKey::IsLoggedIn, StorageKey::UserData, StorageKey::UserToken] {
        assert!(store.get::<_, serde_json::Value>(key).await.unwrap().is_none());
    }
    store.close().await;

    let store = LocalStore::open(&path).await.unwrap();
    let manager = SessionManager::restore(store).await.unwrap();
    assert_eq!(manager.session().status(), SessionStatus::SignedOut);
}

/// A guest choice is remembered until the user signs in
#[tokio::test]
async fn test_guest_then_login() {
    let store = LocalStore::in_memory().await.unwrap();
    let mut manager = SessionManager::restore(store.clone()).await.unwrap();

    manager.skip().await.unwrap();
    let guest = SessionManager::restore(store.clone()).await.unwrap();
    assert_eq!(guest.session().status(), SessionStatus::Guest);
    assert!(guest.current_user().is_none());

    manager.login(user()).await.unwrap();
    let signed_in = SessionManager::restore(store).await.unwrap();
    assert_eq!(signed_in.session().status(), SessionStatus::SignedIn);
}
