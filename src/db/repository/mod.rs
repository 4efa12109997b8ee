//! Repository layer — entity-scoped database operations.
//!
//! Free functions over `rusqlite::Connection`, one sub-module per
//! collection. All public functions are re-exported here.

mod appointment;
mod profile;
mod report;

pub use appointment::*;
pub use profile::*;
pub use report::*;
