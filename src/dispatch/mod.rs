//! Request dispatch
//!
//! Resolves a route to a controller constructor registered by name,
//! instantiates the controller and runs the named action.

mod envelope;

pub use envelope::{normalize, Envelope};

use serde_json::Value;
use std::collections::HashMap;

use crate::db::Database;
use crate::error::{AppError, AppResult};
use crate::http::FormData;
use crate::routing::{HttpMethod, RouteTable, RouteTarget};

/// Ambient request state handed to every action
pub struct RequestContext<'a> {
    pub method: &'a str,
    pub selector: &'a str,
    pub form: &'a FormData,
    pub db: &'a Database,
}

/// A controller type: a set of named actions
pub trait Controller {
    /// Run `action`; `None` when this controller has no such action
    fn call(&self, action: &str, ctx: &RequestContext<'_>) -> Option<AppResult<Value>>;
}

/// Default constructor of a controller type
pub type ControllerFactory = fn() -> Box<dyn Controller>;

/// Route table plus the controller types routes may point at
#[derive(Default)]
pub struct Dispatcher {
    routes: RouteTable,
    controllers: HashMap<String, ControllerFactory>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a controller type available under `name`
    pub fn add_controller(&mut self, name: impl Into<String>, factory: ControllerFactory) {
        self.controllers.insert(name.into(), factory);
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn routes_mut(&mut self) -> &mut RouteTable {
        &mut self.routes
    }

    /// Resolve and run the handler for `ctx.method` + `ctx.selector`
    ///
    /// The returned value always has the envelope shape.
    pub fn dispatch(&self, ctx: &RequestContext<'_>) -> AppResult<Value> {
        let target = HttpMethod::parse(ctx.method)
            .and_then(|method| self.routes.lookup(method, ctx.selector))
            .ok_or(AppError::RouteNotFound)?;

        let controller = self.instantiate(target)?;
        let value = controller.call(&target.action, ctx).ok_or_else(|| {
            AppError::HandlerResolution(format!(
                "method {}::{}() does not exist",
                target.controller, target.action
            ))
        })??;

        Ok(normalize(value))
    }

    fn instantiate(&self, target: &RouteTarget) -> AppResult<Box<dyn Controller>> {
        let factory = self.controllers.get(&target.controller).ok_or_else(|| {
            AppError::HandlerResolution(format!(
                "controller {} does not exist",
                target.controller
            ))
        })?;
        Ok(factory())
    }

    /// Routes whose controller type is not registered
    pub fn unresolved_routes(&self) -> Vec<String> {
        let mut missing: Vec<String> = self
            .routes
            .iter()
            .filter(|(_, _, target)| !self.controllers.contains_key(&target.controller))
            .map(|(method, selector, target)| format!("{method} '{selector}' -> {target}"))
            .collect();
        missing.sort();
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{ConnectionProvider, Database};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Echoes which action ran
    struct Probe;

    impl Controller for Probe {
        fn call(&self, action: &str, ctx: &RequestContext<'_>) -> Option<AppResult<Value>> {
            match action {
                "first" => Some(Ok(json!("first"))),
                "second" => Some(Ok(json!("second"))),
                "envelope" => Some(Ok(Envelope::success("done", ctx.selector).into())),
                "fail" => Some(Err(AppError::Validation("bad input".to_string()))),
                _ => None,
            }
        }
    }

    fn probe() -> Box<dyn Controller> {
        Box::new(Probe)
    }

    fn dispatcher() -> Dispatcher {
        let mut d = Dispatcher::new();
        d.add_controller("probe", probe);
        let routes = d.routes_mut();
        routes.register("GET", "one", "probe", "first");
        routes.register("POST", "two", "probe", "second");
        routes.register("GET", "env", "probe", "envelope");
        routes.register("GET", "fail", "probe", "fail");
        routes.register("GET", "ghost", "probe", "missing");
        routes.register("GET", "orphan", "nobody", "home");
        d
    }

    fn database() -> Database {
        Database::new(Arc::new(ConnectionProvider::in_memory()))
    }

    fn run(d: &Dispatcher, method: &str, selector: &str) -> AppResult<Value> {
        let form = FormData::default();
        let db = database();
        d.dispatch(&RequestContext {
            method,
            selector,
            form: &form,
            db: &db,
        })
    }

    #[test]
    fn test_invokes_registered_action_only() {
        let d = dispatcher();
        assert_eq!(run(&d, "GET", "one").unwrap(), json!({"code": 0, "data": "first"}));
        assert_eq!(run(&d, "POST", "two").unwrap(), json!({"code": 0, "data": "second"}));
    }

    #[test]
    fn test_envelope_result_passes_through() {
        let d = dispatcher();
        assert_eq!(
            run(&d, "GET", "env").unwrap(),
            json!({"code": 0, "msg": "done", "data": "env"})
        );
    }

    static COUNTED_CREATED: AtomicUsize = AtomicUsize::new(0);

    fn counted() -> Box<dyn Controller> {
        COUNTED_CREATED.fetch_add(1, Ordering::SeqCst);
        Box::new(Probe)
    }

    #[test]
    fn test_unknown_route_creates_no_controller() {
        let mut d = Dispatcher::new();
        d.add_controller("counted", counted);
        d.routes_mut().register("GET", "one", "counted", "first");

        for (method, selector) in [("GET", "nope"), ("POST", "nope"), ("POST", "one"), ("HEAD", "one")] {
            let err = run(&d, method, selector).unwrap_err();
            assert!(matches!(err, AppError::RouteNotFound));
            assert_eq!(err.to_envelope().into_value(), json!({"code": -1, "msg": "404 NOT FOUND"}));
        }
        assert_eq!(COUNTED_CREATED.load(Ordering::SeqCst), 0);

        run(&d, "GET", "one").unwrap();
        assert_eq!(COUNTED_CREATED.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_missing_controller_and_action() {
        let d = dispatcher();
        let err = run(&d, "GET", "orphan").unwrap_err();
        assert!(matches!(err, AppError::HandlerResolution(_)));
        assert_eq!(err.to_string(), "route error: controller nobody does not exist");

        let err = run(&d, "GET", "ghost").unwrap_err();
        assert_eq!(err.to_string(), "route error: method probe::missing() does not exist");
    }

    #[test]
    fn test_action_error_propagates() {
        let d = dispatcher();
        let err = run(&d, "GET", "fail").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_unresolved_routes() {
        let d = dispatcher();
        assert_eq!(d.unresolved_routes(), vec!["GET 'orphan' -> nobody@home".to_string()]);
    }
}
