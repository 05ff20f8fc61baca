//! Node variants of the crew graph.
//!
//! A node is an id, a free-form canvas position and a data record whose
//! shape is fixed by the node kind.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{CrewgraphError, Result};

/// node id
pub type NodeId = String;

/// Kind tag of a node, as used by the canvas (`begin`, `agent`, ...).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, strum::AsRefStr, strum::EnumString, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NodeKind {
    Begin,
    Agent,
    Task,
    Reroute,
}

/// Semantic type a reroute node takes on from its first inbound connection.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ClaimedType {
    /// Carries control flow between tasks.
    Execution,
    /// Carries an agent assignment.
    Agent,
}

/// Canvas position. Not used by any graph rule.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(
        x: f64,
        y: f64,
    ) -> Self {
        Self { x, y }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct BeginData {}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct AgentData {
    pub name: String,
    pub role: String,
    pub goal: String,
    pub backstory: String,
    /// comma separated tool names
    pub tools: String,
}

impl AgentData {
    /// Tool tokens in declaration order, trimmed, blanks dropped.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.split(',').map(str::trim).filter(|t| !t.is_empty()).collect()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct TaskData {
    pub name: String,
    pub description: String,
    pub expected_output: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct RerouteData {
    #[serde(rename = "claimedType", skip_serializing_if = "Option::is_none")]
    claimed_type: Option<ClaimedType>,
}

impl RerouteData {
    pub fn claimed_type(&self) -> Option<ClaimedType> {
        self.claimed_type
    }

    /// Sets the claimed type if none is set yet. Returns whether it was set.
    pub(crate) fn claim(
        &mut self,
        claimed: ClaimedType,
    ) -> bool {
        if self.claimed_type.is_some() {
            return false;
        }
        self.claimed_type = Some(claimed);
        true
    }
}

/// Kind-specific node payload.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Begin(BeginData),
    Agent(AgentData),
    Task(TaskData),
    Reroute(RerouteData),
}

impl NodeData {
    /// Empty record for a freshly dropped node.
    pub fn empty(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Begin => NodeData::Begin(BeginData::default()),
            NodeKind::Agent => NodeData::Agent(AgentData::default()),
            NodeKind::Task => NodeData::Task(TaskData::default()),
            NodeKind::Reroute => NodeData::Reroute(RerouteData::default()),
        }
    }

    /// Decodes a saved data record for the given kind. `null` yields an empty record,
    /// unknown fields (labels, styles) are ignored.
    pub fn from_value(
        kind: NodeKind,
        value: Value,
    ) -> Result<Self> {
        if value.is_null() {
            return Ok(Self::empty(kind));
        }
        let invalid = |e: serde_json::Error| CrewgraphError::Node(format!("invalid {} data: {}", kind, e));
        let data = match kind {
            NodeKind::Begin => NodeData::Begin(serde_json::from_value(value).map_err(invalid)?),
            NodeKind::Agent => NodeData::Agent(serde_json::from_value(value).map_err(invalid)?),
            NodeKind::Task => NodeData::Task(serde_json::from_value(value).map_err(invalid)?),
            NodeKind::Reroute => NodeData::Reroute(serde_json::from_value(value).map_err(invalid)?),
        };
        Ok(data)
    }

    pub fn to_value(&self) -> Result<Value> {
        let value = match self {
            NodeData::Begin(d) => serde_json::to_value(d)?,
            NodeData::Agent(d) => serde_json::to_value(d)?,
            NodeData::Task(d) => serde_json::to_value(d)?,
            NodeData::Reroute(d) => serde_json::to_value(d)?,
        };
        Ok(value)
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Begin(_) => NodeKind::Begin,
            NodeData::Agent(_) => NodeKind::Agent,
            NodeData::Task(_) => NodeKind::Task,
            NodeData::Reroute(_) => NodeKind::Reroute,
        }
    }

    /// Merges one text field into the record, leaving the others untouched.
    pub fn set_field(
        &mut self,
        field: &str,
        value: &str,
    ) -> Result<()> {
        let slot = match (self, field) {
            (NodeData::Agent(d), "name") => &mut d.name,
            (NodeData::Agent(d), "role") => &mut d.role,
            (NodeData::Agent(d), "goal") => &mut d.goal,
            (NodeData::Agent(d), "backstory") => &mut d.backstory,
            (NodeData::Agent(d), "tools") => &mut d.tools,
            (NodeData::Task(d), "name") => &mut d.name,
            (NodeData::Task(d), "description") => &mut d.description,
            (NodeData::Task(d), "expected_output") => &mut d.expected_output,
            (data, _) => return Err(CrewgraphError::Node(format!("{} node has no editable field '{}'", data.kind(), field))),
        };
        *slot = value.to_string();
        Ok(())
    }
}

/// A node of the crew graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// node id, stable for the graph lifetime
    pub id: NodeId,
    /// canvas position
    pub position: Position,
    /// kind-specific payload
    pub data: NodeData,
}

impl Node {
    pub fn new(
        id: impl Into<NodeId>,
        position: Position,
        data: NodeData,
    ) -> Self {
        Self {
            id: id.into(),
            position,
            data,
        }
    }

    pub fn begin(id: impl Into<NodeId>) -> Self {
        Self::new(id, Position::default(), NodeData::empty(NodeKind::Begin))
    }

    pub fn agent(
        id: impl Into<NodeId>,
        data: AgentData,
    ) -> Self {
        Self::new(id, Position::default(), NodeData::Agent(data))
    }

    pub fn task(
        id: impl Into<NodeId>,
        data: TaskData,
    ) -> Self {
        Self::new(id, Position::default(), NodeData::Task(data))
    }

    pub fn reroute(id: impl Into<NodeId>) -> Self {
        Self::new(id, Position::default(), NodeData::empty(NodeKind::Reroute))
    }

    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    pub fn is(
        &self,
        kind: NodeKind,
    ) -> bool {
        self.kind() == kind
    }

    /// Human-entered name of agent and task nodes.
    pub fn name(&self) -> Option<&str> {
        match &self.data {
            NodeData::Agent(d) => Some(&d.name),
            NodeData::Task(d) => Some(&d.name),
            _ => None,
        }
    }

    pub fn as_agent(&self) -> Option<&AgentData> {
        match &self.data {
            NodeData::Agent(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_task(&self) -> Option<&TaskData> {
        match &self.data {
            NodeData::Task(d) => Some(d),
            _ => None,
        }
    }

    /// Claimed type of a reroute node, `None` for other kinds or while unclaimed.
    pub fn claimed_type(&self) -> Option<ClaimedType> {
        match &self.data {
            NodeData::Reroute(d) => d.claimed_type(),
            _ => None,
        }
    }
}
