//! Repository layer: table-scoped database operations.

mod history;

pub use history::*;
