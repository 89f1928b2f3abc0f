//! HTTP protocol layer module
//!
//! Body decoding and JSON response building, decoupled from dispatch.

pub mod form;
pub mod response;

// Re-export commonly used types
pub use form::FormData;
pub use response::{add_preflight_headers, build_json_response};
