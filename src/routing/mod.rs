//! Routing module
//!
//! Query-string routing: the raw query string of a request is the selector,
//! matched exactly together with the HTTP method.

mod table;

pub use table::{HttpMethod, RouteTable, RouteTarget};
