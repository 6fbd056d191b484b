//! Shared types and adapter traits for the Hiatus maintenance gate.
//!
//! Adapter crates depend only on this crate, so storage and identity backends
//! compile independently of the gate and the web server.

pub mod auth_adapter;
pub mod error;
pub mod prelude;
pub mod store_adapter;

// vim: ts=4
