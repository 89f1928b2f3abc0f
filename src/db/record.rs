//! Active-record base
//!
//! [`Database`] executes built statements on the provider's connection;
//! [`Model`] scopes those primitives to one table.

use rusqlite::types::Value;
use rusqlite::{Connection, Row};
use std::sync::{Arc, PoisonError};

use super::provider::ConnectionProvider;
use super::statement::{self, FieldMap, Statement};
use crate::error::{AppError, AppResult};
use crate::logger;

/// Most keys bound in one `IN (...)` lookup
pub const IN_CHUNK: usize = 500;

/// Statement executor over the process connection
pub struct Database {
    provider: Arc<ConnectionProvider>,
}

impl Database {
    pub const fn new(provider: Arc<ConnectionProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &ConnectionProvider {
        &self.provider
    }

    /// Run `f` against the connection, logging statement failures
    fn run<T>(
        &self,
        stmt: &Statement,
        f: impl FnOnce(&Connection, &Statement) -> rusqlite::Result<T>,
    ) -> AppResult<T> {
        let handle = self.provider.get()?;
        let conn = handle.lock().unwrap_or_else(PoisonError::into_inner);
        f(&conn, stmt).map_err(|e| {
            logger::log_statement_failed(&stmt.sql, &e);
            AppError::from(e)
        })
    }

    /// Insert one row; returns the new row id, or 0 when nothing was inserted
    pub fn insert(&self, table: &str, fields: &FieldMap, modifier: &str) -> AppResult<i64> {
        let stmt = statement::insert(table, fields, modifier)?;
        self.run(&stmt, |conn, stmt| {
            let changed = conn
                .prepare(&stmt.sql)?
                .execute(stmt.named_params().as_slice())?;
            Ok(if changed > 0 { conn.last_insert_rowid() } else { 0 })
        })
    }

    /// Rows of `table` whose `column` is one of `keys`, mapped by `map`
    ///
    /// Large key sets are queried [`IN_CHUNK`] keys at a time so a statement
    /// never exceeds SQLite's bound-variable limit.
    pub fn select_in<T, F>(
        &self,
        table: &str,
        column: &str,
        keys: &[Value],
        mut map: F,
    ) -> AppResult<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut found = Vec::new();
        for chunk in keys.chunks(IN_CHUNK) {
            let stmt = statement::select_in(table, column, chunk)?;
            let rows: Vec<T> = self.run(&stmt, |conn, stmt| {
                let mut prepared = conn.prepare(&stmt.sql)?;
                let rows = prepared.query_map(stmt.named_params().as_slice(), |row| map(row))?;
                rows.collect()
            })?;
            found.extend(rows);
        }
        Ok(found)
    }

    /// Add one to `column` of the row whose `key_column` equals `key`;
    /// returns the number of rows touched
    pub fn increment(
        &self,
        table: &str,
        column: &str,
        key_column: &str,
        key: impl Into<Value>,
    ) -> AppResult<usize> {
        let stmt = statement::increment(table, column, key_column, key.into())?;
        self.run(&stmt, |conn, stmt| {
            conn.prepare(&stmt.sql)?
                .execute(stmt.named_params().as_slice())
        })
    }
}

/// Table-scoped access for a concrete model
pub trait Model {
    const TABLE: &'static str;
    const PRIMARY_KEY: &'static str = "id";

    fn insert(db: &Database, fields: &FieldMap) -> AppResult<i64> {
        db.insert(Self::TABLE, fields, "")
    }

    fn insert_with(db: &Database, fields: &FieldMap, modifier: &str) -> AppResult<i64> {
        db.insert(Self::TABLE, fields, modifier)
    }

    fn find_in<T, F>(db: &Database, column: &str, keys: &[Value], map: F) -> AppResult<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        db.select_in(Self::TABLE, column, keys, map)
    }

    fn increment(db: &Database, column: &str, id: i64) -> AppResult<usize> {
        db.increment(Self::TABLE, column, Self::PRIMARY_KEY, id)
    }
}
