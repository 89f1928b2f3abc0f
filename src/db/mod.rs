//! Data-access layer
//!
//! One lazily opened SQLite connection per process ([`ConnectionProvider`]),
//! a statement builder that binds every value as a named parameter, and
//! active-record style helpers on top ([`Database`], [`Model`]).

mod provider;
mod record;
mod schema;
pub mod statement;

pub use provider::{ConnectionHandle, ConnectionProvider, ConnectionSettings};
pub use record::{Database, Model};
pub use statement::FieldMap;
