//! Core of the Hiatus maintenance gate.
//!
//! Holds the settings model and its sanitizer, the interception gate, the
//! operator preview and page rendering, together with the axum middlewares
//! that wire them into a request pipeline.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod app;
pub mod extract;
pub mod gate;
pub mod intercept;
pub mod middleware;
pub mod prelude;
pub mod preview;
pub mod render;
pub mod settings;
pub mod system;

// Re-export commonly used types
pub use app::{App, AppBuilderOpts, AppState};
pub use extract::{Auth, OptionalAuth};
pub use render::{SiteInfo, TemplateEngine};
pub use settings::{Configuration, SettingsService};
pub use system::{SystemCtx, SystemRoutes};

// vim: ts=4
