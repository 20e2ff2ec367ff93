//! Process-wide storage handle.
//!
//! # Design
//! The handle is connected at most once. `connect` takes a read lock on the
//! fast path; the first caller upgrades to the write lock and re-checks
//! before connecting, so concurrent first requests share one connection.
//! A failed connection caches nothing and the next request tries again.

use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::{StoreError, StoreResult, SurrealStore, TodoStore};

/// Shared, type-erased store.
pub type SharedStore = Arc<dyn TodoStore>;

/// Validated connection settings.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub url: String,
    pub name: String,
    pub namespace: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl DatabaseSettings {
    /// Root credentials, when both halves are configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some((user.as_str(), pass.as_str())),
            _ => None,
        }
    }
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("url", &super::surreal::sanitize_url(&self.url))
            .field("name", &self.name)
            .field("namespace", &self.namespace)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

enum Source {
    /// Connect on first use. Holds the error to report when the settings
    /// were incomplete.
    Settings(Result<DatabaseSettings, String>),
    Preconnected,
}

/// Lazily connected storage handle shared by every request.
pub struct Database {
    source: Source,
    store: RwLock<Option<SharedStore>>,
}

impl Database {
    /// A handle that connects with `settings` on first use. Incomplete
    /// settings are reported by `connect`, not here.
    pub fn new(settings: Result<DatabaseSettings, String>) -> Self {
        Self {
            source: Source::Settings(settings),
            store: RwLock::new(None),
        }
    }

    /// A handle around an already available store.
    pub fn preconnected(store: SharedStore) -> Self {
        Self {
            source: Source::Preconnected,
            store: RwLock::new(Some(store)),
        }
    }

    /// Return the store, connecting first if needed.
    pub async fn connect(&self) -> StoreResult<SharedStore> {
        if let Some(store) = self.store.read().await.as_ref() {
            return Ok(Arc::clone(store));
        }

        let mut slot = self.store.write().await;
        if let Some(store) = slot.as_ref() {
            return Ok(Arc::clone(store));
        }

        let settings = match &self.source {
            Source::Settings(Ok(settings)) => settings,
            Source::Settings(Err(reason)) => return Err(StoreError::Config(reason.clone())),
            Source::Preconnected => {
                return Err(StoreError::Config("store has been closed".to_string()))
            }
        };

        let store: SharedStore = Arc::new(SurrealStore::connect(settings).await?);
        *slot = Some(Arc::clone(&store));
        Ok(store)
    }

    pub async fn is_connected(&self) -> bool {
        self.store.read().await.is_some()
    }

    /// Drop the handle. Requests still holding a clone finish with it.
    pub async fn close(&self) {
        if self.store.write().await.take().is_some() {
            tracing::info!("storage connection closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn settings() -> DatabaseSettings {
        DatabaseSettings {
            url: "ws://admin:secret@localhost:8000".to_string(),
            name: "todos".to_string(),
            namespace: "todo".to_string(),
            username: Some("root".to_string()),
            password: Some("hunter2".to_string()),
        }
    }

    #[test]
    fn debug_hides_secrets() {
        let printed = format!("{:?}", settings());
        assert!(!printed.contains("secret"));
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("localhost:8000"));
    }

    #[test]
    fn credentials_need_both_halves() {
        let mut s = settings();
        assert_eq!(s.credentials(), Some(("root", "hunter2")));
        s.password = None;
        assert_eq!(s.credentials(), None);
    }

    #[tokio::test]
    async fn missing_settings_fail_every_time() {
        let db = Database::new(Err("database_url is not set".to_string()));
        for _ in 0..2 {
            let err = db.connect().await.err().unwrap();
            assert!(matches!(err, StoreError::Config(ref msg) if msg.contains("database_url")));
        }
        assert!(!db.is_connected().await);
    }

    fn mem_settings() -> DatabaseSettings {
        DatabaseSettings {
            url: "mem://".to_string(),
            name: "todos".to_string(),
            namespace: "test".to_string(),
            username: None,
            password: None,
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_first_connects_share_one_store() {
        let db = Arc::new(Database::new(Ok(mem_settings())));
        assert!(!db.is_connected().await);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let db = Arc::clone(&db);
                tokio::spawn(async move { db.connect().await.unwrap() })
            })
            .collect();
        let mut stores = Vec::new();
        for handle in handles {
            stores.push(handle.await.unwrap());
        }

        assert!(stores.iter().all(|s| Arc::ptr_eq(s, &stores[0])));
        assert!(db.is_connected().await);

        let again = db.connect().await.unwrap();
        assert!(Arc::ptr_eq(&again, &stores[0]));
    }

    #[tokio::test]
    async fn close_drops_a_lazily_connected_store() {
        let db = Database::new(Ok(mem_settings()));
        db.connect().await.unwrap();
        db.close().await;
        assert!(!db.is_connected().await);
    }

    #[tokio::test]
    async fn preconnected_store_is_reused() {
        let db = Database::preconnected(Arc::new(MemoryStore::new()));
        let a = db.connect().await.unwrap();
        let b = db.connect().await.unwrap();
        assert!(Arc::ptr_eq(&a, &b));

        db.close().await;
        assert!(!db.is_connected().await);
        assert!(db.connect().await.is_err());
    }
}
