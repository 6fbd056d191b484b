//! Hiatus puts a web application into maintenance mode.
//!
//! # Features
//!
//! - Visitors get a configurable maintenance page with `503 Service Unavailable`
//!   and `Retry-After`
//! - Operators with a bypass role keep using the application
//! - Scheduled tasks, API and RPC traffic are never blocked
//! - Operators preview the page on any URL with `?maintenance_preview=1`
//! - Settings are sanitized on every write and every read
//! - Storage and identity are pluggable adapters

// Re-export shared types and adapter traits from hiatus-types
pub use hiatus_types::auth_adapter;
pub use hiatus_types::error;
pub use hiatus_types::store_adapter;

// Feature crate re-exports
pub use hiatus_admin as admin;
pub use hiatus_core::settings;

// Local modules
pub mod app;
pub mod prelude;
pub mod routes;
pub mod webserver;

pub use crate::app::{App, AppBuilder};

// vim: ts=4
