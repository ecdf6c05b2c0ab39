//! CSV row store: loads the source dataset and any prior result, and computes
//! where a run should resume.
//!
//! # Resume cursor
//!
//! The cursor is one past the *last* row (scanning from the end) whose scores are all
//! present. Rows before it that are still incomplete ("holes", e.g. rows that failed
//! terminally in an earlier run) are not revisited; [`load`] logs how many there are.

pub mod error;
mod loader;
mod model;

#[cfg(test)]
mod tests;

pub use error::{TableError, TableResult};
pub use loader::{LoadedTables, load, result_path_for};
pub use model::{ResultTable, Row, SourceTable};
