//! Request handler module
//!
//! Turns one HTTP request into a kernel call and its JSON reply.

pub mod router;

// Re-export main entry point
pub use router::handle_request;
