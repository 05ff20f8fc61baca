use std::{collections::HashSet, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    CrewgraphError, Result,
    graph::{
        Graph,
        edge::{Edge, Handle},
        node::{Node, NodeData, NodeKind},
    },
    model::{EdgeModel, NodeModel},
};

/// Serializable shape of a whole graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GraphModel {
    #[serde(default)]
    pub nodes: Vec<NodeModel>,
    #[serde(default)]
    pub edges: Vec<EdgeModel>,
}

impl GraphModel {
    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str::<GraphModel>(s).map_err(|e| CrewgraphError::Graph(format!("{}", e)))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn parse_handle(handle: &Option<String>) -> Result<Option<Handle>> {
    handle
        .as_deref()
        .map(|h| Handle::from_str(h).map_err(|_| CrewgraphError::Edge(format!("invalid handle '{}'", h))))
        .transpose()
}

impl TryFrom<&NodeModel> for Node {
    type Error = CrewgraphError;

    fn try_from(model: &NodeModel) -> Result<Self> {
        let kind = NodeKind::from_str(&model.kind).map_err(|_| CrewgraphError::Node(format!("invalid node type '{}'", model.kind)))?;
        let data = NodeData::from_value(kind, model.data.clone())?;
        Ok(Node::new(model.id.clone(), model.position, data))
    }
}

impl TryFrom<&Node> for NodeModel {
    type Error = CrewgraphError;

    fn try_from(node: &Node) -> Result<Self> {
        Ok(NodeModel {
            id: node.id.clone(),
            kind: node.kind().to_string(),
            position: node.position,
            data: node.data.to_value()?,
        })
    }
}

impl From<&Edge> for EdgeModel {
    fn from(edge: &Edge) -> Self {
        EdgeModel {
            id: edge.id.clone(),
            source: edge.source.clone(),
            source_handle: edge.source_handle.map(|h| h.to_string()),
            target: edge.target.clone(),
            target_handle: edge.target_handle.map(|h| h.to_string()),
            is_execution_line: edge.is_execution_line,
        }
    }
}

/// Rebuilds a graph from saved records.
///
/// Saved edges were accepted when drawn and are not re-validated, but their
/// endpoints must exist. Node ids must be unique and at most one begin node
/// may be present.
impl TryFrom<&GraphModel> for Graph {
    type Error = CrewgraphError;

    fn try_from(model: &GraphModel) -> Result<Self> {
        let mut graph = Graph::new();
        for node in model.nodes.iter() {
            graph = graph.add_node(Node::try_from(node)?)?;
        }

        let mut edge_ids = HashSet::new();
        let mut edges = Vec::with_capacity(model.edges.len());
        for edge in model.edges.iter() {
            if !edge_ids.insert(edge.id.as_str()) {
                return Err(CrewgraphError::Edge(format!("edge {} already exists", edge.id)));
            }
            if graph.node(&edge.source).is_none() {
                return Err(CrewgraphError::Edge(format!("source node {} not found", edge.source)));
            }
            if graph.node(&edge.target).is_none() {
                return Err(CrewgraphError::Edge(format!("target node {} not found", edge.target)));
            }
            edges.push(Edge {
                id: edge.id.clone(),
                source: edge.source.clone(),
                source_handle: parse_handle(&edge.source_handle)?,
                target: edge.target.clone(),
                target_handle: parse_handle(&edge.target_handle)?,
                is_execution_line: edge.is_execution_line,
            });
        }

        Ok(Graph::from_parts(graph.nodes().to_vec(), edges))
    }
}

impl TryFrom<&Graph> for GraphModel {
    type Error = CrewgraphError;

    fn try_from(graph: &Graph) -> Result<Self> {
        let nodes = graph.nodes().iter().map(NodeModel::try_from).collect::<Result<Vec<_>>>()?;
        let edges = graph.edges().iter().map(EdgeModel::from).collect();
        Ok(GraphModel { nodes, edges })
    }
}
