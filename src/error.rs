//! Error types for Crewgraph.
//!
//! All errors in Crewgraph are represented by the `CrewgraphError` enum.
//! Rejected connections are not errors, see [`crate::Verdict`].

use std::io::ErrorKind;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for all Crewgraph operations.
#[derive(Deserialize, Serialize, Error, Debug, Clone, PartialEq)]
pub enum CrewgraphError {
    /// Configuration parsing or validation errors.
    #[error("{0}")]
    Config(String),

    /// Data conversion errors (JSON, YAML, TOML).
    #[error("{0}")]
    Convert(String),

    /// Graph-level invariant violations (duplicate ids, second begin node).
    #[error("{0}")]
    Graph(String),

    /// Node definition or data errors.
    #[error("{0}")]
    Node(String),

    /// Edge definition errors.
    #[error("{0}")]
    Edge(String),

    /// A referenced node or edge does not exist.
    #[error("{kind} {id} not found")]
    NotFound {
        kind: String,
        id: String,
    },

    /// Storage operation errors.
    #[error("{0}")]
    Store(String),

    /// I/O operation errors.
    #[error("{0}")]
    IoError(String),
}

impl CrewgraphError {
    pub(crate) fn node_not_found(id: &str) -> Self {
        CrewgraphError::NotFound {
            kind: "node".to_string(),
            id: id.to_string(),
        }
    }

    pub(crate) fn edge_not_found(id: &str) -> Self {
        CrewgraphError::NotFound {
            kind: "edge".to_string(),
            id: id.to_string(),
        }
    }

    /// Whether this error only reports a missing node or edge.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CrewgraphError::NotFound { .. })
    }
}

impl From<CrewgraphError> for String {
    fn from(val: CrewgraphError) -> Self {
        val.to_string()
    }
}

impl From<std::io::Error> for CrewgraphError {
    fn from(error: std::io::Error) -> Self {
        CrewgraphError::IoError(error.to_string())
    }
}

impl From<CrewgraphError> for std::io::Error {
    fn from(val: CrewgraphError) -> Self {
        #[allow(clippy::io_other_error)]
        std::io::Error::new(ErrorKind::Other, val.to_string())
    }
}

impl From<serde_json::Error> for CrewgraphError {
    fn from(error: serde_json::Error) -> Self {
        CrewgraphError::Convert(error.to_string())
    }
}

impl From<serde_yaml::Error> for CrewgraphError {
    fn from(error: serde_yaml::Error) -> Self {
        CrewgraphError::Convert(error.to_string())
    }
}

impl From<toml::de::Error> for CrewgraphError {
    fn from(error: toml::de::Error) -> Self {
        CrewgraphError::Config(error.to_string())
    }
}
