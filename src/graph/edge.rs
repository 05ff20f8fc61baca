//! Edges between node handles.
//!
//! Task nodes expose `exec-in` and `agent` inputs and `exec-out` and `agent-out`
//! outputs, begin nodes an `exec-out` output and agent nodes an `agent-out` output.
//! Reroute handles are untyped and carry no name.

use serde::{Deserialize, Serialize};

use crate::graph::node::NodeId;

/// Unique identifier for an edge within a graph.
pub type EdgeId = String;

/// Named port of a node.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, strum::AsRefStr, strum::EnumString, strum::Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Handle {
    /// Task execution input.
    ExecIn,
    /// Task agent input.
    Agent,
    /// Begin/task execution output.
    ExecOut,
    /// Agent/task agent output.
    AgentOut,
}

/// A proposed edge, as reported by the canvas when the user drags a line.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub source: NodeId,
    pub source_handle: Option<Handle>,
    pub target: NodeId,
    pub target_handle: Option<Handle>,
}

impl Connection {
    pub fn new(
        source: impl Into<NodeId>,
        source_handle: Option<Handle>,
        target: impl Into<NodeId>,
        target_handle: Option<Handle>,
    ) -> Self {
        Self {
            source: source.into(),
            source_handle,
            target: target.into(),
            target_handle,
        }
    }
}

/// Line style of an accepted edge.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EdgeStyle {
    /// Control flow, dashed white and animated.
    Execution,
    /// Agent assignment, solid yellow.
    Agent,
}

impl EdgeStyle {
    pub fn from_execution_line(is_execution_line: bool) -> Self {
        if is_execution_line { EdgeStyle::Execution } else { EdgeStyle::Agent }
    }

    pub fn is_execution_line(&self) -> bool {
        *self == EdgeStyle::Execution
    }

    pub fn animated(&self) -> bool {
        self.is_execution_line()
    }

    /// Stroke color, also used for the arrow marker.
    pub fn stroke(&self) -> &'static str {
        match self {
            EdgeStyle::Execution => "white",
            EdgeStyle::Agent => "yellow",
        }
    }

    pub fn dash_array(&self) -> &'static str {
        match self {
            EdgeStyle::Execution => "5,5",
            EdgeStyle::Agent => "none",
        }
    }

    pub fn stroke_width(&self) -> u32 {
        2
    }
}

/// Accepted edge of the graph.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    /// Unique edge identifier, independent of the endpoints.
    pub id: EdgeId,
    /// ID of the source node.
    pub source: NodeId,
    pub source_handle: Option<Handle>,
    /// ID of the target node.
    pub target: NodeId,
    pub target_handle: Option<Handle>,
    /// Derived when the edge was accepted.
    pub is_execution_line: bool,
}

impl Edge {
    pub(crate) fn from_connection(
        id: EdgeId,
        connection: &Connection,
        style: EdgeStyle,
    ) -> Self {
        Self {
            id,
            source: connection.source.clone(),
            source_handle: connection.source_handle,
            target: connection.target.clone(),
            target_handle: connection.target_handle,
            is_execution_line: style.is_execution_line(),
        }
    }

    pub fn style(&self) -> EdgeStyle {
        EdgeStyle::from_execution_line(self.is_execution_line)
    }

    /// Whether the edge touches the node on either end.
    pub fn touches(
        &self,
        nid: &str,
    ) -> bool {
        self.source == nid || self.target == nid
    }
}
