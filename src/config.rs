//! Settings schema and loader.
//!
//! Settings cover the player tick, default chrome, sleep-timer presets,
//! directory scanning and logging. They are read once at startup.

mod load;
mod schema;

pub use schema::*;
