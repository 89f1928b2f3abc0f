use serde_json::{json, Value};

use crate::dispatch::{Controller, RequestContext};
use crate::error::AppResult;

/// Liveness probe
pub struct Ping;

impl Controller for Ping {
    fn call(&self, action: &str, _ctx: &RequestContext<'_>) -> Option<AppResult<Value>> {
        match action {
            "pong" => Some(Ok(json!("pong"))),
            _ => None,
        }
    }
}

pub fn factory() -> Box<dyn Controller> {
    Box::new(Ping)
}
