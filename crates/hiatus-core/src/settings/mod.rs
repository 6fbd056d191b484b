//! Maintenance settings: record shape, sanitizer and service

pub mod html;
pub mod sanitize;
pub mod service;
pub mod types;

pub use sanitize::sanitize;
pub use service::SettingsService;
pub use types::{ADMIN_ROLE, Configuration, SETTINGS_KEY};

// vim: ts=4
