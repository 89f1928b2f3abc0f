use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

mod config;
mod controllers;
mod db;
mod dispatch;
mod error;
mod handler;
mod http;
mod kernel;
mod logger;
mod models;
mod routing;
mod server;

use crate::config::{AppState, Config, ConfigStore};
use crate::db::{ConnectionProvider, Database};
use crate::dispatch::Dispatcher;
use crate::kernel::Kernel;
use crate::server::{create_reusable_listener, start_server_loop, start_signal_handler, SignalHandler};

/// Config file path (without extension) used when none is given
const DEFAULT_CONFIG_PATH: &str = "config";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let store = Arc::new(ConfigStore::load(&path)?);
    let cfg = Config::load_from(&store)?;
    logger::init(&cfg)?;

    // Tokio runtime sized by `server.workers`
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg, store))
}

/// Built-in routes first, then `routes.extra` so config can override them
fn build_dispatcher(cfg: &Config) -> Dispatcher {
    let mut dispatcher = Dispatcher::new();
    controllers::register(&mut dispatcher);

    for entry in &cfg.routes.extra {
        if let Err(e) = dispatcher
            .routes_mut()
            .register_str(&entry.method, entry.selector.as_str(), &entry.handler)
        {
            logger::log_error(&format!(
                "Skipping route {} '{}': {e}",
                entry.method, entry.selector
            ));
        }
    }

    for route in dispatcher.unresolved_routes() {
        logger::log_warning(&format!("Route has no controller: {route}"));
    }
    dispatcher
}

async fn async_main(cfg: Config, store: Arc<ConfigStore>) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = create_reusable_listener(addr)?;

    let dispatcher = build_dispatcher(&cfg);
    let route_count = dispatcher.routes().len();
    let db = Database::new(Arc::new(ConnectionProvider::new(store)));
    let state = Arc::new(AppState::new(&cfg, Kernel::new(dispatcher, db)));
    let active_connections = Arc::new(AtomicUsize::new(0));

    let signals = Arc::new(SignalHandler::new());
    start_signal_handler(Arc::clone(&signals));

    logger::log_server_start(&addr, &cfg, route_count);

    // Connection tasks use spawn_local
    let local = tokio::task::LocalSet::new();
    local
        .run_until(start_server_loop(
            listener,
            state,
            active_connections,
            Arc::clone(&signals.shutdown),
        ))
        .await
}
