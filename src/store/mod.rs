//! Device-local key-value store
//!
//! Values are kept JSON-encoded in a single SQLite table, so anything `serde` can handle
//! round-trips. A value that no longer decodes as the requested type reads as absent.

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};

pub mod db;
pub mod migrations;

/// Keys shared with the rest of the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKey {
    UserToken,
    UserData,
    IsLoggedIn,
    SkipLogin,
}

impl StorageKey {
    pub const ALL: [StorageKey; 4] = [
        StorageKey::UserToken,
        StorageKey::UserData,
        StorageKey::IsLoggedIn,
        StorageKey::SkipLogin,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StorageKey::UserToken => "user_token",
            StorageKey::UserData => "user_data",
            StorageKey::IsLoggedIn => "is_logged_in",
            StorageKey::SkipLogin => "skip_login",
        }
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[derive(Debug, Clone)]
pub struct LocalStore {
    pool: SqlitePool,
    location: Option<PathBuf>,
}

impl LocalStore {
    /// Open the store file, creating and migrating it as needed
    pub async fn open(path: &Path) -> Result<Self> {
        let pool = db::connect(path).await?;
        migrations::migrate_up(&pool).await?;
        Ok(Self { pool, location: Some(path.to_path_buf()) })
    }

    pub async fn in_memory() -> Result<Self> {
        let pool = db::connect_memory().await?;
        migrations::migrate_up(&pool).await?;
        Ok(Self { pool, location: None })
    }

    /// Database file, `None` for an in-memory store
    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    pub async fn set<K, T>(&self, key: K, value: &T) -> Result<()>
    where
        K: AsRef<str>,
        T: Serialize + ?Sized,
    {
        let key = key.as_ref();
        let encoded = serde_json::to_string(value).with_context(|| format!("Failed to encode value for '{}'", key))?;

        sqlx::query("INSERT OR REPLACE INTO kv_store (key, value, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)")
            .bind(key)
            .bind(&encoded)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to store '{}'", key))?;

        log::debug!("Stored key: {}", key);
        Ok(())
    }

    pub async fn get<K, T>(&self, key: K) -> Result<Option<T>>
    where
        K: AsRef<str>,
        T: DeserializeOwned,
    {
        let key = key.as_ref();
        let raw: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to read '{}'", key))?;

        let Some(raw) = raw else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                log::warn!("Ignoring unreadable value for '{}': {}", key, e);
                Ok(None)
            }
        }
    }

    /// Read a boolean flag; absent means false
    pub async fn flag<K: AsRef<str>>(&self, key: K) -> Result<bool> {
        Ok(self.get::<K, bool>(key).await?.unwrap_or(false))
    }

    pub async fn remove<K: AsRef<str>>(&self, key: K) -> Result<()> {
        let key = key.as_ref();
        let result = sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to remove '{}'", key))?;

        if result.rows_affected() > 0 {
            log::debug!("Removed key: {}", key);
        }
        Ok(())
    }

    pub async fn clear(&self) -> Result<()> {
        let result = sqlx::query("DELETE FROM kv_store")
            .execute(&self.pool)
            .await
            .context("Failed to clear store")?;

        log::debug!("Cleared {} keys", result.rows_affected());
        Ok(())
    }

    pub async fn keys(&self) -> Result<Vec<String>> {
        sqlx::query_scalar("SELECT key FROM kv_store ORDER BY key")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list keys")
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
