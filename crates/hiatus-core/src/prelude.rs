pub use crate::app::App;
pub use hiatus_types::prelude::*;

// vim: ts=4
