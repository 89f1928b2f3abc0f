//! Connection provider
//!
//! Owns the single SQLite connection of the process. The connection is
//! opened on the first `get()` and handed out unchanged afterwards; it is
//! never closed or re-opened once established. A failed attempt leaves the
//! slot empty, so the next request tries again.

use rusqlite::{Connection, OpenFlags};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use super::schema;
use crate::config::ConfigStore;
use crate::error::{AppError, AppResult};
use crate::logger;

/// Shared handle to the process connection
pub type ConnectionHandle = Arc<Mutex<Connection>>;

type Opener = Box<dyn Fn() -> rusqlite::Result<Connection> + Send + Sync>;

/// Connection parameters, read from the `database.*` keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub dsn: String,
    pub busy_timeout_ms: u64,
    pub read_only: bool,
    pub init_schema: bool,
}

impl ConnectionSettings {
    pub fn from_store(store: &ConfigStore) -> Self {
        Self {
            dsn: store.get("database.dsn", "wordlog.db".to_string()),
            busy_timeout_ms: store.get("database.busy_timeout_ms", 5000),
            read_only: store.get("database.read_only", false),
            init_schema: store.get("database.init_schema", true),
        }
    }

    /// Open and prepare a connection
    pub fn open(&self) -> rusqlite::Result<Connection> {
        let flags = if self.read_only {
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI
        } else {
            OpenFlags::default()
        };
        let conn = Connection::open_with_flags(&self.dsn, flags)?;
        conn.busy_timeout(Duration::from_millis(self.busy_timeout_ms))?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;

        if self.init_schema && !self.read_only {
            schema::init(&conn)?;
        }
        Ok(conn)
    }
}

enum Source {
    /// Read `database.*` from the store on first use
    Config(Arc<ConfigStore>),
    /// Caller-supplied opener, labelled for logging
    Opener(String, Opener),
}

pub struct ConnectionProvider {
    source: Source,
    handle: Mutex<Option<ConnectionHandle>>,
}

impl ConnectionProvider {
    /// Provider configured from the `database.*` keys of `store`
    pub fn new(store: Arc<ConfigStore>) -> Self {
        Self {
            source: Source::Config(store),
            handle: Mutex::new(None),
        }
    }

    /// Provider that opens its connection with `opener`
    pub fn with_opener<F>(label: impl Into<String>, opener: F) -> Self
    where
        F: Fn() -> rusqlite::Result<Connection> + Send + Sync + 'static,
    {
        Self {
            source: Source::Opener(label.into(), Box::new(opener)),
            handle: Mutex::new(None),
        }
    }

    /// Private in-memory database with the application schema
    pub fn in_memory() -> Self {
        Self::with_opener(":memory:", || {
            let conn = Connection::open_in_memory()?;
            schema::init(&conn)?;
            Ok(conn)
        })
    }

    /// The process connection, opening it on first call
    pub fn get(&self) -> AppResult<ConnectionHandle> {
        let mut slot = self.handle.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = slot.as_ref() {
            return Ok(Arc::clone(handle));
        }

        let (label, opened) = match &self.source {
            Source::Config(store) => {
                let settings = ConnectionSettings::from_store(store);
                let opened = settings.open();
                (settings.dsn, opened)
            }
            Source::Opener(label, opener) => (label.clone(), opener()),
        };

        match opened {
            Ok(conn) => {
                logger::log_db_connected(&label);
                let handle = Arc::new(Mutex::new(conn));
                *slot = Some(Arc::clone(&handle));
                Ok(handle)
            }
            Err(e) => {
                logger::log_db_connect_failed(&label, &e);
                Err(AppError::Connection(e.to_string()))
            }
        }
    }

    pub fn is_connected(&self) -> bool {
        self.handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn store_with(dsn: &str) -> Arc<ConfigStore> {
        let settings = config::Config::builder()
            .set_override("database.dsn", dsn)
            .unwrap()
            .build()
            .unwrap();
        Arc::new(ConfigStore::from_settings(settings))
    }

    #[test]
    fn test_connection_is_lazy() {
        let provider = ConnectionProvider::in_memory();
        assert!(!provider.is_connected());
        provider.get().unwrap();
        assert!(provider.is_connected());
    }

    #[test]
    fn test_same_handle_every_call() {
        let opened = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&opened);
        let provider = ConnectionProvider::with_opener("counted", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Connection::open_in_memory()
        });

        let first = provider.get().unwrap();
        for _ in 0..5 {
            assert!(Arc::ptr_eq(&first, &provider.get().unwrap()));
        }
        assert_eq!(opened.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_connect_failure_is_reported_and_retried() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);
        let provider = ConnectionProvider::with_opener("broken", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Connection::open_with_flags(
                "/nonexistent-dir/wordlog/test.db",
                OpenFlags::SQLITE_OPEN_READ_WRITE,
            )
        });

        let err = provider.get().unwrap_err();
        assert!(matches!(err, AppError::Connection(_)));
        assert!(err.to_string().starts_with("connect error: "));
        assert!(!provider.is_connected());

        assert!(provider.get().is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_settings_from_store() {
        let store = store_with("/tmp/x.db");
        let settings = ConnectionSettings::from_store(&store);
        assert_eq!(settings.dsn, "/tmp/x.db");
        assert_eq!(settings.busy_timeout_ms, 5000);
        assert!(!settings.read_only);
        assert!(settings.init_schema);
    }

    #[test]
    fn test_config_source_creates_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.db");
        let provider = ConnectionProvider::new(store_with(path.to_str().unwrap()));

        let handle = provider.get().unwrap();
        let conn = handle.lock().unwrap();
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('words', 'week')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 2);
        assert!(path.exists());
    }
}
