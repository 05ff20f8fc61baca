use serde::{Deserialize, Serialize};

use crate::graph::node::Position;

/// Node record as exchanged with the canvas and the saved-graph store.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NodeModel {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub data: serde_json::Value,
}
