pub use hiatus_core::prelude::*;

// vim: ts=4
