//! Kernel
//!
//! Runs one request through the dispatcher and guarantees a single JSON
//! envelope comes back, whatever failed along the way.

use serde_json::Value;

use crate::db::Database;
use crate::dispatch::{Dispatcher, RequestContext};
use crate::http::FormData;
use crate::logger;

/// Everything a handler may read about the request
#[derive(Debug, Clone, Default)]
pub struct RequestInput {
    pub method: String,
    /// Raw query string
    pub selector: String,
    pub form: FormData,
}

impl RequestInput {
    pub fn new(method: impl Into<String>, selector: impl Into<String>, form: FormData) -> Self {
        Self {
            method: method.into(),
            selector: selector.into(),
            form,
        }
    }
}

pub struct Kernel {
    dispatcher: Dispatcher,
    db: Database,
}

impl Kernel {
    pub const fn new(dispatcher: Dispatcher, db: Database) -> Self {
        Self { dispatcher, db }
    }

    /// Dispatch `input`; errors become `{code: -1, msg}`
    pub fn handle(&self, input: &RequestInput) -> Value {
        let ctx = RequestContext {
            method: &input.method,
            selector: &input.selector,
            form: &input.form,
            db: &self.db,
        };

        match self.dispatcher.dispatch(&ctx) {
            Ok(envelope) => envelope,
            Err(e) => {
                logger::log_warning(&format!(
                    "{} '{}' failed: {e}",
                    input.method, input.selector
                ));
                e.to_envelope().into_value()
            }
        }
    }
}
