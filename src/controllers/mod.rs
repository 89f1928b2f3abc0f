//! Built-in controller types and their routes

mod ping;
mod quick;
mod words;

use crate::dispatch::Dispatcher;

/// Make the built-in controllers available and map their routes
pub fn register(dispatcher: &mut Dispatcher) {
    dispatcher.add_controller("ping", ping::factory);
    dispatcher.add_controller("words", words::factory);
    dispatcher.add_controller("quick", quick::factory);

    let routes = dispatcher.routes_mut();
    routes.register("GET", "ping", "ping", "pong");
    routes.register("POST", "word/save", "words", "save");
    routes.register("POST", "d", "quick", "daily");
}

/// `Y-m-d H:M:S`, the layout every stored timestamp uses
pub(crate) const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
