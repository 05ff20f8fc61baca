//! Storage for named graphs.
//!
//! Saved graphs are opaque `{name, title, nodes, edges}` records keyed by
//! name. Nothing in the graph core depends on their durability.

mod data;
mod mem;
mod store;

use std::error::Error;

use chrono::Utc;

use crate::{CrewgraphError, Result};

pub use data::SavedGraph;
pub use mem::MemStore;
pub use store::Store;

/// Maps backend errors to CrewgraphError.
fn map_store_err(err: impl Error) -> CrewgraphError {
    CrewgraphError::Store(err.to_string())
}

fn time_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Collection of saved graphs keyed by name.
pub trait GraphCollection: Send + Sync {
    /// Checks if a graph with the given name exists.
    fn exists(
        &self,
        name: &str,
    ) -> Result<bool>;

    /// Finds a graph by name.
    fn find(
        &self,
        name: &str,
    ) -> Result<SavedGraph>;

    /// Names of all saved graphs, sorted.
    fn list(&self) -> Result<Vec<String>>;

    /// Creates a new record.
    fn create(
        &self,
        data: &SavedGraph,
    ) -> Result<bool>;

    /// Updates an existing record.
    fn update(
        &self,
        data: &SavedGraph,
    ) -> Result<bool>;

    /// Deletes a record by name.
    fn delete(
        &self,
        name: &str,
    ) -> Result<bool>;
}
