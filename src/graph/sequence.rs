//! Task sequencing.
//!
//! Orders task nodes for code generation: depth-first from the begin node
//! along execution lines, pre-order, each task at its first-discovered
//! position. Tasks not reached from begin follow in insertion order.

use std::collections::{HashMap, HashSet};

use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};

use crate::graph::{
    Graph,
    edge::{Edge, Handle},
    node::{ClaimedType, Node, NodeId, NodeKind},
};

/// Ordered ids of every task node, each exactly once.
pub fn sequence(graph: &Graph) -> Vec<NodeId> {
    let mut dag: DiGraph<&Node, &Edge> = DiGraph::new();
    let mut indices = HashMap::new();
    for node in graph.nodes() {
        indices.insert(node.id.as_str(), dag.add_node(node));
    }
    for edge in graph.edges() {
        if let (Some(&from), Some(&to)) = (indices.get(edge.source.as_str()), indices.get(edge.target.as_str())) {
            dag.add_edge(from, to, edge);
        }
    }

    let mut order = Vec::new();
    let mut visited: HashSet<NodeIndex> = HashSet::new();

    if let Some(begin) = graph.begin_node().and_then(|n| indices.get(n.id.as_str())) {
        let mut stack = vec![*begin];
        while let Some(idx) = stack.pop() {
            if !visited.insert(idx) {
                continue;
            }
            if dag[idx].is(NodeKind::Task) {
                order.push(dag[idx].id.clone());
            }

            // petgraph walks outgoing edges newest first; restore insertion order
            let mut next: Vec<_> = dag
                .edges_directed(idx, Direction::Outgoing)
                .filter(|e| follows(dag[e.source()], dag[e.target()], e.weight()))
                .map(|e| (e.id(), e.target()))
                .collect();
            next.sort_by_key(|(eid, _)| *eid);
            stack.extend(next.into_iter().rev().map(|(_, target)| target).filter(|t| !visited.contains(t)));
        }
    }

    let reached: HashSet<NodeId> = order.iter().cloned().collect();
    order.extend(graph.tasks().filter(|t| !reached.contains(&t.id)).map(|t| t.id.clone()));
    order
}

/// Execution lines into a task, or hops into an execution reroute.
fn follows(
    source: &Node,
    target: &Node,
    edge: &Edge,
) -> bool {
    if source.is(NodeKind::Agent) || !carries(source, edge, ClaimedType::Execution) {
        return false;
    }
    match target.kind() {
        NodeKind::Task => edge.target_handle == Some(Handle::ExecIn),
        NodeKind::Reroute => target.claimed_type() == Some(ClaimedType::Execution),
        _ => false,
    }
}

/// Whether the edge can carry a `kind` line out of `source`.
///
/// A task's `agent-out` never carries execution and its `exec-out` never
/// carries an agent.
pub(crate) fn carries(
    source: &Node,
    edge: &Edge,
    kind: ClaimedType,
) -> bool {
    if !source.is(NodeKind::Task) {
        return true;
    }
    match kind {
        ClaimedType::Execution => edge.source_handle != Some(Handle::AgentOut),
        ClaimedType::Agent => edge.source_handle != Some(Handle::ExecOut),
    }
}
