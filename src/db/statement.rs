//! Statement builder
//!
//! Produces SQL text plus named parameters. Values are never spliced into
//! the SQL; only table and column names are, and those must be plain
//! identifiers.

use rusqlite::types::Value;
use rusqlite::ToSql;

use crate::error::{AppError, AppResult};

/// Conflict clauses accepted between `INSERT` and `INTO`
const INSERT_MODIFIERS: [&str; 5] = ["OR ABORT", "OR FAIL", "OR IGNORE", "OR REPLACE", "OR ROLLBACK"];

/// Ordered column -> value mapping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    fields: Vec<(String, Value)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`FieldMap::set`]
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    /// Set a column, keeping its original position if already present
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        let column = column.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(c, _)| *c == column) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.iter().find(|(c, _)| c == column).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(c, v)| (c.as_str(), v))
    }
}

/// SQL text with its named parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<(String, Value)>,
}

impl Statement {
    /// Parameters in the form `rusqlite` binds by name
    pub fn named_params(&self) -> Vec<(&str, &dyn ToSql)> {
        self.params
            .iter()
            .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
            .collect()
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn ident(name: &str) -> AppResult<String> {
    if is_identifier(name) {
        Ok(format!("\"{name}\""))
    } else {
        Err(AppError::StatementExecution(format!(
            "invalid identifier '{name}'"
        )))
    }
}

fn modifier_clause(modifier: &str) -> AppResult<String> {
    let normalized = modifier.split_whitespace().collect::<Vec<_>>().join(" ").to_ascii_uppercase();
    if normalized.is_empty() {
        return Ok(String::new());
    }
    if INSERT_MODIFIERS.contains(&normalized.as_str()) {
        Ok(format!(" {normalized}"))
    } else {
        Err(AppError::StatementExecution(format!(
            "unsupported insert modifier '{modifier}'"
        )))
    }
}

/// `INSERT <modifier> INTO <table> (<columns>) VALUES (:<column>, ...)`
pub fn insert(table: &str, fields: &FieldMap, modifier: &str) -> AppResult<Statement> {
    if fields.is_empty() {
        return Err(AppError::StatementExecution(format!(
            "no fields to insert into '{table}'"
        )));
    }

    let table = ident(table)?;
    let modifier = modifier_clause(modifier)?;
    let mut columns = Vec::with_capacity(fields.len());
    let mut placeholders = Vec::with_capacity(fields.len());
    let mut params = Vec::with_capacity(fields.len());
    for (column, value) in fields.iter() {
        columns.push(ident(column)?);
        let name = format!(":{column}");
        placeholders.push(name.clone());
        params.push((name, value.clone()));
    }

    Ok(Statement {
        sql: format!(
            "INSERT{modifier} INTO {table} ({}) VALUES ({})",
            columns.join(", "),
            placeholders.join(", ")
        ),
        params,
    })
}

/// `SELECT * FROM <table> WHERE <column> IN (:k0, :k1, ...)`
///
/// `keys` must not be empty; an empty `IN ()` is not valid SQL.
pub fn select_in(table: &str, column: &str, keys: &[Value]) -> AppResult<Statement> {
    if keys.is_empty() {
        return Err(AppError::StatementExecution(
            "empty key set for IN lookup".to_string(),
        ));
    }

    let params: Vec<(String, Value)> = keys
        .iter()
        .enumerate()
        .map(|(i, key)| (format!(":k{i}"), key.clone()))
        .collect();
    let placeholders: Vec<&str> = params.iter().map(|(name, _)| name.as_str()).collect();

    Ok(Statement {
        sql: format!(
            "SELECT * FROM {} WHERE {} IN ({})",
            ident(table)?,
            ident(column)?,
            placeholders.join(", ")
        ),
        params,
    })
}

/// `UPDATE <table> SET <column> = <column> + 1 WHERE <key_column> = :key`
pub fn increment(table: &str, column: &str, key_column: &str, key: Value) -> AppResult<Statement> {
    let column = ident(column)?;
    Ok(Statement {
        sql: format!(
            "UPDATE {} SET {column} = {column} + 1 WHERE {} = :key",
            ident(table)?,
            ident(key_column)?
        ),
        params: vec![(":key".to_string(), key)],
    })
}
