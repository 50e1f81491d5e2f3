//! Signed-in state, passed explicitly to whoever needs it
//!
//! [`AuthSession`] holds the in-memory flags; [`SessionManager`] keeps them in step with the
//! local store so the next run starts where this one ended.

use crate::api::models::{ProfileUpdate, UserProfile};
use crate::store::{LocalStore, StorageKey};
use anyhow::Result;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthSession {
    pub is_logged_in: bool,
    pub is_skipped: bool,
    pub user: Option<UserProfile>,
    pub loading: bool,
}

/// Coarse view of an [`AuthSession`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    SignedIn,
    /// Browsing without an account
    Guest,
    SignedOut,
}

impl AuthSession {
    pub fn login_success(&mut self, user: UserProfile) {
        self.is_logged_in = true;
        self.user = Some(user);
        self.loading = false;
        self.is_skipped = false;
    }

    pub fn logout(&mut self) {
        self.is_logged_in = false;
        self.user = None;
        self.is_skipped = false;
    }

    pub fn skip_login(&mut self) {
        self.is_skipped = true;
        self.is_logged_in = false;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn status(&self) -> SessionStatus {
        match (self.is_logged_in && self.user.is_some(), self.is_skipped) {
            (true, _) => SessionStatus::SignedIn,
            (false, true) => SessionStatus::Guest,
            (false, false) => SessionStatus::SignedOut,
        }
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref().filter(|_| self.is_logged_in)
    }
}

/// Persists an [`AuthSession`] through the local store
pub struct SessionManager {
    store: LocalStore,
    session: AuthSession,
}

impl SessionManager {
    /// Rebuild the session saved by a previous run
    ///
    /// A stored login needs both the flag and the profile; otherwise a stored skip makes a
    /// guest session, and anything else starts signed out.
    pub async fn restore(store: LocalStore) -> Result<Self> {
        let is_logged_in = store.flag(StorageKey::IsLoggedIn).await?;
        let is_skipped = store.flag(StorageKey::SkipLogin).await?;
        let user: Option<UserProfile> = store.get(StorageKey::UserData).await?;

        let mut session = AuthSession::default();
        match user {
            Some(user) if is_logged_in => session.login_success(user),
            _ if is_skipped => session.skip_login(),
            _ => {}
        }
        log::debug!("Restored session: {:?}", session.status());

        Ok(Self { store, session })
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub fn current_user(&self) -> Option<&UserProfile> {
        self.session.user()
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.session.set_loading(loading);
    }

    pub async fn login(&mut self, user: UserProfile) -> Result<()> {
        self.store.set(StorageKey::IsLoggedIn, &true).await?;
        self.store.set(StorageKey::UserData, &user).await?;
        self.store.remove(StorageKey::SkipLogin).await?;

        log::info!("Signed in user {}", user.id);
        self.session.login_success(user);
        Ok(())
    }

    pub async fn logout(&mut self) -> Result<()> {
        self.store.remove(StorageKey::IsLoggedIn).await?;
        self.store.remove(StorageKey::UserData).await?;
        self.store.remove(StorageKey::UserToken).await?;
        self.store.remove(StorageKey::SkipLogin).await?;

        log::info!("Signed out");
        self.session.logout();
        Ok(())
    }

    pub async fn skip(&mut self) -> Result<()> {
        self.store.set(StorageKey::SkipLogin, &true).await?;
        self.session.skip_login();
        Ok(())
    }

    /// Apply a saved profile edit to the cached user
    ///
    /// Returns false when nobody is signed in.
    pub async fn update_profile(&mut self, update: &ProfileUpdate) -> Result<bool> {
        let Some(mut user) = self.session.user().cloned() else {
            return Ok(false);
        };

        user.first_name = Some(update.first_name.clone());
        user.last_name = Some(update.last_name.clone());
        user.email = update.email.clone();
        user.contact_number = Some(update.contact_number.to_string());
        user.pincode = Some(update.pincode.to_string());

        self.store.set(StorageKey::UserData, &user).await?;
        self.session.login_success(user);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user() -> UserProfile {
        serde_json::from_value(json!({
            "id": 42,
            "email": "asha@example.com",
            "first_name": "Asha",
            "last_name": "Rao",
            "contactNumber": 9876543210u64,
            "pincode": 411001
        }))
        .unwrap()
    }

    #[test]
    fn test_transitions() {
        let mut session = AuthSession::default();
        assert_eq!(session.status(), SessionStatus::SignedOut);

        session.skip_login();
        assert_eq!(session.status(), SessionStatus::Guest);

        session.set_loading(true);
        session.login_success(user());
        assert_eq!(session.status(), SessionStatus::SignedIn);
        assert!(!session.is_skipped);
        assert!(!session.loading);

        session.logout();
        assert_eq!(session.status(), SessionStatus::SignedOut);
        assert!(session.user().is_none());
    }

    #[tokio::test]
    async fn test_restore_follows_stored_flags() {
        let store = LocalStore::in_memory().await.unwrap();

        let manager = SessionManager::restore(store.clone()).await.unwrap();
        assert_eq!(manager.session().status(), SessionStatus::SignedOut);

        // flag without profile is not a login
        store.set(StorageKey::IsLoggedIn, &true).await.unwrap();
        store.set(StorageKey::SkipLogin, &true).await.unwrap();
        let manager = SessionManager::restore(store.clone()).await.unwrap();
        assert_eq!(manager.session().status(), SessionStatus::Guest);

        store.set(StorageKey::UserData, &user()).await.unwrap();
        let manager = SessionManager::restore(store).await.unwrap();
        assert_eq!(manager.session().status(), SessionStatus::SignedIn);
        assert_eq!(manager.current_user().unwrap().email, "asha@example.com");
    }

    #[tokio::test]
    async fn test_login_logout_persist() {
        let store = LocalStore::in_memory().await.unwrap();
        let mut manager = SessionManager::restore(store.clone()).await.unwrap();

        manager.skip().await.unwrap();
        manager.login(user()).await.unwrap();
        assert!(!store.flag(StorageKey::SkipLogin).await.unwrap());

        let restored = SessionManager::restore(store.clone()).await.unwrap();
        assert_eq!(restored.current_user(), Some(&user()));

        manager.logout().await.unwrap();
        assert!(store.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_profile() {
        let store = LocalStore::in_memory().await.unwrap();
        let mut manager = SessionManager::restore(store.clone()).await.unwrap();

        let update = ProfileUpdate {
            first_name: "Asha".into(),
            last_name: "Kulkarni".into(),
            email: "asha.k@example.com".into(),
            contact_number: 9123456780,
            pincode: 560001,
        };
        assert!(!manager.update_profile(&update).await.unwrap());

        manager.login(user()).await.unwrap();
        assert!(manager.update_profile(&update).await.unwrap());

        let stored: UserProfile = store.get(StorageKey::UserData).await.unwrap().unwrap();
        assert_eq!(stored.last_name.as_deref(), Some("Kulkarni"));
        assert_eq!(stored.contact_number.as_deref(), Some("9123456780"));
        assert_eq!(stored.id, user().id);
    }
}
