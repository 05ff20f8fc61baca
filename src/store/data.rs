use serde::{Deserialize, Serialize};

use crate::model::{EdgeModel, GraphModel, NodeModel};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SavedGraph {
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub nodes: Vec<NodeModel>,
    #[serde(default)]
    pub edges: Vec<EdgeModel>,
    #[serde(default)]
    pub create_time: i64,
    #[serde(default)]
    pub update_time: i64,
}

impl SavedGraph {
    pub fn model(&self) -> GraphModel {
        GraphModel {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }
}
