//! Name sanitization.
//!
//! A sanitized name is the human-entered name with every whitespace run
//! replaced by one underscore. It is the join key between the declarative
//! config and the scaffold.

use std::{
    collections::{HashMap, HashSet},
    sync::LazyLock,
};

use regex::Regex;
use tracing::warn;

use crate::graph::{
    Graph,
    node::{Node, NodeKind},
};

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

/// Names the scaffold class already defines.
const RESERVED: [&str; 7] = ["agent", "task", "crew", "agents", "tasks", "agents_config", "tasks_config"];

pub fn sanitize(name: &str) -> String {
    WHITESPACE.replace_all(name, "_").into_owned()
}

/// Collision-free identifiers for every agent and task node.
///
/// Agents and tasks share one namespace in graph insertion order. A name
/// whose sanitized form is taken or reserved gets the first free `_2`, `_3`,
/// ... suffix; an empty name falls back to the node kind.
#[derive(Debug, Clone, Default)]
pub struct Identifiers {
    by_node: HashMap<String, String>,
}

impl Identifiers {
    pub fn resolve(graph: &Graph) -> Self {
        let mut taken: HashSet<String> = RESERVED.iter().map(|s| s.to_string()).collect();
        let mut by_node = HashMap::new();

        for node in graph.nodes().iter().filter(|n| n.is(NodeKind::Agent) || n.is(NodeKind::Task)) {
            let base = match node.name().map(sanitize) {
                Some(name) if !name.is_empty() => name,
                _ => node.kind().to_string(),
            };
            let mut ident = base.clone();
            let mut n = 2;
            while taken.contains(&ident) {
                ident = format!("{}_{}", base, n);
                n += 1;
            }
            if ident != base {
                warn!(node = %node.id, name = %base, ident = %ident, "identifier collision, renamed");
            }
            taken.insert(ident.clone());
            by_node.insert(node.id.clone(), ident);
        }

        Self { by_node }
    }

    pub fn get(
        &self,
        nid: &str,
    ) -> Option<&str> {
        self.by_node.get(nid).map(String::as_str)
    }

    /// Identifier of the node, sanitizing its name for nodes not resolved here.
    pub fn of(
        &self,
        node: &Node,
    ) -> String {
        match self.get(&node.id) {
            Some(ident) => ident.to_string(),
            None => sanitize(node.name().unwrap_or_default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::{AgentData, TaskData};

    fn agent(
        id: &str,
        name: &str,
    ) -> Node {
        Node::agent(
            id,
            AgentData {
                name: name.to_string(),
                ..Default::default()
            },
        )
    }

    fn task(
        id: &str,
        name: &str,
    ) -> Node {
        Node::task(
            id,
            TaskData {
                name: name.to_string(),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("Senior Researcher"), "Senior_Researcher");
        assert_eq!(sanitize("write \t\n the  post"), "write_the_post");
        assert_eq!(sanitize("Writer"), "Writer");
        assert_eq!(sanitize(" padded "), "_padded_");
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn test_identifiers_plain() {
        let graph = [agent("a", "Senior Writer"), task("t", "Draft Post"), Node::begin("b")]
            .into_iter()
            .fold(Graph::new(), |g, n| g.add_node(n).unwrap());
        let ids = Identifiers::resolve(&graph);
        assert_eq!(ids.get("a"), Some("Senior_Writer"));
        assert_eq!(ids.get("t"), Some("Draft_Post"));
        assert_eq!(ids.get("b"), None);
    }

    #[test]
    fn test_identifiers_collisions() {
        let graph = [
            agent("a1", "Writer"),
            agent("a2", "Writer"),
            task("t1", "Writer"),
            task("t2", "crew"),
            task("t3", ""),
            task("t4", "  "),
        ]
        .into_iter()
        .fold(Graph::new(), |g, n| g.add_node(n).unwrap());

        let ids = Identifiers::resolve(&graph);
        assert_eq!(ids.get("a1"), Some("Writer"));
        assert_eq!(ids.get("a2"), Some("Writer_2"));
        assert_eq!(ids.get("t1"), Some("Writer_3"));
        assert_eq!(ids.get("t2"), Some("crew_2"));
        assert_eq!(ids.get("t3"), Some("task_2"));
        assert_eq!(ids.get("t4"), Some("_"));
    }
}
