//! Graph snapshot and its pure transformations.
//!
//! Every operation borrows the current snapshot and returns a new one, so the
//! caller decides which snapshot is current. Nodes and edges keep insertion
//! order, which the sequencer and the renderers rely on.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::{
    CrewgraphError, Result,
    graph::{
        connection::{self, Verdict},
        edge::{Connection, Edge, EdgeId, Handle},
        node::{ClaimedType, Node, NodeData, NodeId, NodeKind},
        sequence,
    },
};

/// Crew graph: begin, agent, task and reroute nodes joined by accepted edges.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph without checking any invariant.
    pub(crate) fn from_parts(
        nodes: Vec<Node>,
        edges: Vec<Edge>,
    ) -> Self {
        Self { nodes, edges }
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(
        &self,
        id: &str,
    ) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(
        &self,
        id: &str,
    ) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn begin_node(&self) -> Option<&Node> {
        self.nodes.iter().find(|n| n.is(NodeKind::Begin))
    }

    pub fn agents(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.is(NodeKind::Agent))
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.is(NodeKind::Task))
    }

    /// Edges leaving the node, in insertion order.
    pub fn outgoing<'a>(
        &'a self,
        nid: &'a str,
    ) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.source == nid)
    }

    /// Edges entering the node, in insertion order.
    pub fn incoming<'a>(
        &'a self,
        nid: &'a str,
    ) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.target == nid)
    }

    /// add node to graph
    ///
    /// Fails when the id is taken or when a second begin node is added.
    pub fn add_node(
        &self,
        node: Node,
    ) -> Result<Graph> {
        trace!("graph::add_node({})", node.id);
        if self.node(&node.id).is_some() {
            return Err(CrewgraphError::Graph(format!("node {} already exists", node.id)));
        }
        if node.is(NodeKind::Begin) && let Some(begin) = self.begin_node() {
            return Err(CrewgraphError::Graph(format!("begin node {} already exists", begin.id)));
        }

        let mut next = self.clone();
        next.nodes.push(node);
        Ok(next)
    }

    /// remove node and every edge touching it
    pub fn remove_node(
        &self,
        id: &str,
    ) -> Result<Graph> {
        trace!("graph::remove_node({})", id);
        if self.node(id).is_none() {
            return Err(CrewgraphError::node_not_found(id));
        }

        let nodes = self.nodes.iter().filter(|n| n.id != id).cloned().collect();
        let edges = self.edges.iter().filter(|e| !e.touches(id)).cloned().collect();
        Ok(Self { nodes, edges })
    }

    /// Validates the connection and, when accepted, appends it as edge `id`.
    ///
    /// An unclaimed reroute target claims its type before the edge is added.
    /// On rejection the returned graph equals `self`.
    pub fn add_edge(
        &self,
        connection: &Connection,
        id: impl Into<EdgeId>,
    ) -> (Graph, Verdict) {
        let id = id.into();
        trace!("graph::add_edge({}: {} -> {})", id, connection.source, connection.target);

        let decision = connection::decide(self, connection);
        let Verdict::Accepted(style) = decision.verdict else {
            debug!(
                from = %connection.source,
                to = %connection.target,
                handle = ?connection.target_handle,
                "connection rejected"
            );
            return (self.clone(), Verdict::Rejected);
        };

        let mut next = self.clone();
        if let Some(claim) = decision.claim {
            next.claim(&connection.target, claim);
        }
        next.edges.push(Edge::from_connection(id, connection, style));
        (next, decision.verdict)
    }

    /// remove edge by id
    pub fn remove_edge(
        &self,
        id: &str,
    ) -> Result<Graph> {
        trace!("graph::remove_edge({})", id);
        if self.edge(id).is_none() {
            return Err(CrewgraphError::edge_not_found(id));
        }

        let mut next = self.clone();
        next.edges.retain(|e| e.id != id);
        Ok(next)
    }

    /// Merges `field = value` into the node's data record.
    pub fn update_node_data(
        &self,
        id: &str,
        field: &str,
        value: &str,
    ) -> Result<Graph> {
        trace!("graph::update_node_data({}, {})", id, field);
        let mut next = self.clone();
        let node = next.nodes.iter_mut().find(|n| n.id == id).ok_or_else(|| CrewgraphError::node_not_found(id))?;
        node.data.set_field(field, value)?;
        Ok(next)
    }

    /// Splits an edge with a reroute node.
    ///
    /// The edge is retargeted to `reroute`, and a new edge `new_edge_id` leads
    /// from the reroute to the old target with the old target handle. The
    /// reroute claims its type from the edge source.
    pub fn split_edge(
        &self,
        edge_id: &str,
        reroute: Node,
        new_edge_id: impl Into<EdgeId>,
    ) -> Result<Graph> {
        let new_edge_id = new_edge_id.into();
        trace!("graph::split_edge({}, {})", edge_id, reroute.id);
        if !reroute.is(NodeKind::Reroute) {
            return Err(CrewgraphError::Node(format!("node {} is not a reroute node", reroute.id)));
        }
        if self.edge(&new_edge_id).is_some() {
            return Err(CrewgraphError::Edge(format!("edge {} already exists", new_edge_id)));
        }
        let edge = self.edge(edge_id).cloned().ok_or_else(|| CrewgraphError::edge_not_found(edge_id))?;
        let source = self.node(&edge.source).ok_or_else(|| CrewgraphError::node_not_found(&edge.source))?;
        let claim = match source.kind() {
            NodeKind::Reroute => source.claimed_type(),
            _ => connection::infer_claim(source, edge.source_handle),
        };

        let rid = reroute.id.clone();
        let mut next = self.add_node(reroute)?;
        if let Some(claim) = claim {
            next.claim(&rid, claim);
        }

        let tail = Edge {
            id: new_edge_id,
            source: rid.clone(),
            source_handle: None,
            target: edge.target.clone(),
            target_handle: edge.target_handle,
            is_execution_line: edge.is_execution_line,
        };
        let position = next.edges.iter().position(|e| e.id == edge_id).ok_or_else(|| CrewgraphError::edge_not_found(edge_id))?;
        let head = &mut next.edges[position];
        head.target = rid;
        head.target_handle = None;
        next.edges.insert(position + 1, tail);
        Ok(next)
    }

    /// Authoritative task order, see [`sequence::sequence`].
    pub fn sequence(&self) -> Vec<NodeId> {
        sequence::sequence(self)
    }

    /// Agent assigned to the task: the first agent feeding its `agent` input,
    /// directly or through agent reroutes.
    pub fn agent_for(
        &self,
        task_id: &str,
    ) -> Option<&Node> {
        self.upstream(task_id, Handle::Agent, ClaimedType::Agent).into_iter().find(|n| n.is(NodeKind::Agent))
    }

    /// Tasks whose execution line leads into this task, in edge order.
    pub fn predecessors(
        &self,
        task_id: &str,
    ) -> Vec<&Node> {
        let mut seen = HashSet::new();
        let mut tasks = Vec::new();
        for node in self.upstream(task_id, Handle::ExecIn, ClaimedType::Execution) {
            if node.is(NodeKind::Task) && node.id != task_id && seen.insert(node.id.as_str()) {
                tasks.push(node);
            }
        }
        tasks
    }

    /// Non-reroute sources reaching `nid` through `handle`, walking back
    /// through reroutes that claimed `via`.
    fn upstream(
        &self,
        nid: &str,
        handle: Handle,
        via: ClaimedType,
    ) -> Vec<&Node> {
        let mut found = Vec::new();
        let mut walked = HashSet::new();
        let mut stack: Vec<&Edge> = self.incoming(nid).filter(|e| e.target_handle == Some(handle)).collect();
        stack.reverse();

        while let Some(edge) = stack.pop() {
            let Some(source) = self.node(&edge.source) else {
                continue;
            };
            if !sequence::carries(source, edge, via) {
                continue;
            }
            if !source.is(NodeKind::Reroute) {
                found.push(source);
                continue;
            }
            if source.claimed_type() != Some(via) || !walked.insert(source.id.as_str()) {
                continue;
            }
            let mut feeding: Vec<&Edge> = self.incoming(&source.id).collect();
            feeding.reverse();
            stack.extend(feeding);
        }
        found
    }

    fn claim(
        &mut self,
        nid: &str,
        claimed: ClaimedType,
    ) {
        if let Some(node) = self.nodes.iter_mut().find(|n| n.id == nid)
            && let NodeData::Reroute(data) = &mut node.data
            && data.claim(claimed)
        {
            debug!(node = %nid, claimed = claimed.as_ref(), "reroute claimed");
        }
    }

    /// Output a human-readable representation of the graph
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();

        lines.push("=== Crew Graph ===".to_string());
        lines.push(format!("Nodes: {}, Edges: {}", self.node_count(), self.edge_count()));
        lines.push(String::new());

        lines.push("--- Nodes ---".to_string());
        for node in &self.nodes {
            let label = match (node.name(), node.claimed_type()) {
                (Some(name), _) => format!(" {}", name),
                (None, Some(claimed)) => format!(" <{}>", claimed.as_ref()),
                (None, None) => String::new(),
            };
            lines.push(format!("[{}]{} (type: {})", node.id, label, node.kind()));
        }
        lines.push(String::new());

        lines.push("--- Edges ---".to_string());
        let handle = |h: Option<Handle>| h.map(|h| h.to_string()).unwrap_or_else(|| "*".to_string());
        for edge in &self.edges {
            lines.push(format!(
                "{}.{} --[{}]--> {}.{} (id: {})",
                edge.source,
                handle(edge.source_handle),
                edge.style().as_ref(),
                edge.target,
                handle(edge.target_handle),
                edge.id
            ));
        }
        lines.push(String::new());

        lines.push("--- Task Sequence ---".to_string());
        for (i, nid) in self.sequence().iter().enumerate() {
            let name = self.node(nid).and_then(Node::name).unwrap_or_default();
            lines.push(format!("{}. {} ({})", i + 1, name, nid));
        }

        lines.join("\n")
    }
}
