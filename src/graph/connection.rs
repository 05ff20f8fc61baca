//! Connection rules.
//!
//! Decides whether a proposed edge may enter the graph, which line style it
//! gets, and which type an unclaimed reroute target takes on.
//!
//! Rules, first match wins:
//! 1. any edge into a reroute is accepted
//! 2. an edge out of a reroute needs a claimed type matching the target handle
//! 3. agent → task `agent`, task → task `exec-in`, begin → task `exec-in`
//! 4. everything else is rejected

use super::{
    Graph,
    edge::{Connection, EdgeStyle, Handle},
    node::{ClaimedType, Node, NodeKind},
};

/// Outcome of a proposed connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted(EdgeStyle),
    Rejected,
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted(_))
    }
}

/// Verdict plus the type to claim on the reroute target, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Decision {
    pub verdict: Verdict,
    pub claim: Option<ClaimedType>,
}

impl Decision {
    fn rejected() -> Self {
        Self {
            verdict: Verdict::Rejected,
            claim: None,
        }
    }
}

/// Checks a connection against the graph without changing it.
///
/// Connections naming a node that is not in the graph are rejected.
pub fn validate(
    graph: &Graph,
    connection: &Connection,
) -> Verdict {
    decide(graph, connection).verdict
}

pub(crate) fn decide(
    graph: &Graph,
    connection: &Connection,
) -> Decision {
    match (graph.node(&connection.source), graph.node(&connection.target)) {
        (Some(source), Some(target)) => evaluate(source, target, connection),
        _ => Decision::rejected(),
    }
}

fn evaluate(
    source: &Node,
    target: &Node,
    connection: &Connection,
) -> Decision {
    let target_handle = connection.target_handle;

    if target.is(NodeKind::Reroute) {
        let claim = match target.claimed_type() {
            Some(_) => None,
            None => infer_claim(source, connection.source_handle),
        };
        return Decision {
            verdict: Verdict::Accepted(style(source, target, target_handle)),
            claim,
        };
    }

    let accepted = if source.is(NodeKind::Reroute) {
        match source.claimed_type() {
            Some(ClaimedType::Execution) => target_handle == Some(Handle::ExecIn),
            Some(ClaimedType::Agent) => target_handle == Some(Handle::Agent),
            None => false,
        }
    } else {
        matches!(
            (source.kind(), target.kind(), target_handle),
            (NodeKind::Agent, NodeKind::Task, Some(Handle::Agent))
                | (NodeKind::Task, NodeKind::Task, Some(Handle::ExecIn))
                | (NodeKind::Begin, NodeKind::Task, Some(Handle::ExecIn))
        )
    };

    if !accepted {
        return Decision::rejected();
    }

    Decision {
        verdict: Verdict::Accepted(style(source, target, target_handle)),
        claim: None,
    }
}

/// Type a reroute takes on when fed from `source` through `source_handle`.
pub fn infer_claim(
    source: &Node,
    source_handle: Option<Handle>,
) -> Option<ClaimedType> {
    match (source.kind(), source_handle) {
        (NodeKind::Begin, _) | (NodeKind::Task, Some(Handle::ExecOut)) => Some(ClaimedType::Execution),
        (NodeKind::Agent, _) | (NodeKind::Task, Some(Handle::AgentOut)) => Some(ClaimedType::Agent),
        _ => None,
    }
}

fn style(
    source: &Node,
    target: &Node,
    target_handle: Option<Handle>,
) -> EdgeStyle {
    let source_executes = source.claimed_type() == Some(ClaimedType::Execution);
    let is_execution_line = target_handle == Some(Handle::ExecIn)
        || (source_executes && target.is(NodeKind::Reroute))
        || (source.is(NodeKind::Reroute) && source_executes);
    EdgeStyle::from_execution_line(is_execution_line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::{AgentData, NodeData, Position, RerouteData, TaskData};

    fn claimed_reroute(
        id: &str,
        claimed: ClaimedType,
    ) -> Node {
        let mut data = RerouteData::default();
        data.claim(claimed);
        Node::new(id, Position::default(), NodeData::Reroute(data))
    }

    fn graph() -> Graph {
        Graph::from_parts(
            vec![
                Node::begin("begin"),
                Node::agent("writer", AgentData::default()),
                Node::task("draft", TaskData::default()),
                Node::task("review", TaskData::default()),
                Node::reroute("r"),
                claimed_reroute("r_exec", ClaimedType::Execution),
                claimed_reroute("r_agent", ClaimedType::Agent),
            ],
            vec![],
        )
    }

    fn conn(
        source: &str,
        source_handle: Option<Handle>,
        target: &str,
        target_handle: Option<Handle>,
    ) -> Connection {
        Connection::new(source, source_handle, target, target_handle)
    }

    #[test]
    fn test_direct_rules() {
        let g = graph();
        assert_eq!(
            validate(&g, &conn("writer", Some(Handle::AgentOut), "draft", Some(Handle::Agent))),
            Verdict::Accepted(EdgeStyle::Agent)
        );
        assert_eq!(
            validate(&g, &conn("draft", Some(Handle::ExecOut), "review", Some(Handle::ExecIn))),
            Verdict::Accepted(EdgeStyle::Execution)
        );
        assert_eq!(
            validate(&g, &conn("begin", Some(Handle::ExecOut), "draft", Some(Handle::ExecIn))),
            Verdict::Accepted(EdgeStyle::Execution)
        );
    }

    #[test]
    fn test_rejected_combinations() {
        let g = graph();
        // task into an agent
        assert_eq!(validate(&g, &conn("draft", Some(Handle::AgentOut), "writer", Some(Handle::Agent))), Verdict::Rejected);
        // agent into the execution input
        assert_eq!(validate(&g, &conn("writer", Some(Handle::AgentOut), "draft", Some(Handle::ExecIn))), Verdict::Rejected);
        // begin into the agent input
        assert_eq!(validate(&g, &conn("begin", Some(Handle::ExecOut), "draft", Some(Handle::Agent))), Verdict::Rejected);
        // task into the agent input
        assert_eq!(validate(&g, &conn("draft", Some(Handle::AgentOut), "review", Some(Handle::Agent))), Verdict::Rejected);
        // missing endpoint
        assert_eq!(validate(&g, &conn("ghost", None, "draft", Some(Handle::ExecIn))), Verdict::Rejected);
    }

    #[test]
    fn test_into_reroute_always_accepted() {
        let g = graph();
        for source in ["begin", "writer", "draft", "r"] {
            assert!(validate(&g, &conn(source, None, "r", None)).is_accepted());
        }
    }

    #[test]
    fn test_claim_inference() {
        let g = graph();
        let claim = |source: &str, handle| decide(&g, &conn(source, handle, "r", None)).claim;
        assert_eq!(claim("begin", Some(Handle::ExecOut)), Some(ClaimedType::Execution));
        assert_eq!(claim("draft", Some(Handle::ExecOut)), Some(ClaimedType::Execution));
        assert_eq!(claim("writer", Some(Handle::AgentOut)), Some(ClaimedType::Agent));
        assert_eq!(claim("draft", Some(Handle::AgentOut)), Some(ClaimedType::Agent));
        assert_eq!(claim("draft", None), None);
        assert_eq!(claim("r_exec", None), None);
    }

    #[test]
    fn test_no_claim_on_claimed_target() {
        let g = graph();
        let decision = decide(&g, &conn("writer", Some(Handle::AgentOut), "r_exec", None));
        assert!(decision.verdict.is_accepted());
        assert_eq!(decision.claim, None);
    }

    #[test]
    fn test_out_of_reroute() {
        let g = graph();
        assert_eq!(validate(&g, &conn("r_exec", None, "draft", Some(Handle::ExecIn))), Verdict::Accepted(EdgeStyle::Execution));
        assert_eq!(validate(&g, &conn("r_exec", None, "draft", Some(Handle::Agent))), Verdict::Rejected);
        assert_eq!(validate(&g, &conn("r_agent", None, "draft", Some(Handle::Agent))), Verdict::Accepted(EdgeStyle::Agent));
        assert_eq!(validate(&g, &conn("r_agent", None, "draft", Some(Handle::ExecIn))), Verdict::Rejected);
        assert_eq!(validate(&g, &conn("r", None, "draft", Some(Handle::ExecIn))), Verdict::Rejected);
        assert_eq!(validate(&g, &conn("r", None, "draft", Some(Handle::Agent))), Verdict::Rejected);
    }

    #[test]
    fn test_reroute_chain_style() {
        let g = graph();
        assert_eq!(validate(&g, &conn("r_exec", None, "r", None)), Verdict::Accepted(EdgeStyle::Execution));
        assert_eq!(validate(&g, &conn("r_agent", None, "r", None)), Verdict::Accepted(EdgeStyle::Agent));
        // the line into a reroute only dashes when its source already carries execution
        assert_eq!(validate(&g, &conn("begin", Some(Handle::ExecOut), "r", None)), Verdict::Accepted(EdgeStyle::Agent));
    }
}
