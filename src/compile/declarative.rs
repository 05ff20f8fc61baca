//! Declarative renderer: agent and task config documents.
//!
//! Agents come out in graph order with their role, goal and backstory.
//! Tasks come out in graph order with their description, expected output
//! and the identifier of their assigned agent, or [`NO_AGENT`].

use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::{
    Result,
    compile::{CompileConfig, sanitize::Identifiers},
    graph::Graph,
};

/// Agent reference of a task without an assigned agent.
pub const NO_AGENT: &str = "None";

#[derive(Serialize)]
struct AgentConfig<'a> {
    role: &'a str,
    goal: &'a str,
    backstory: &'a str,
}

#[derive(Serialize)]
struct TaskConfig<'a> {
    description: &'a str,
    expected_output: &'a str,
    agent: String,
}

/// Agents document, keyed by agent identifier.
pub fn render_agents(
    graph: &Graph,
    ids: &Identifiers,
) -> Result<String> {
    let mut doc = Mapping::new();
    for node in graph.agents() {
        let Some(agent) = node.as_agent() else {
            continue;
        };
        let config = AgentConfig {
            role: &agent.role,
            goal: &agent.goal,
            backstory: &agent.backstory,
        };
        doc.insert(Value::String(ids.of(node)), serde_yaml::to_value(config)?);
    }
    Ok(serde_yaml::to_string(&doc)?)
}

/// Tasks document, keyed by task identifier.
pub fn render_tasks(
    graph: &Graph,
    ids: &Identifiers,
) -> Result<String> {
    let mut doc = Mapping::new();
    for node in graph.tasks() {
        let Some(task) = node.as_task() else {
            continue;
        };
        let agent = graph.agent_for(&node.id).map(|a| ids.of(a)).unwrap_or_else(|| NO_AGENT.to_string());
        let config = TaskConfig {
            description: &task.description,
            expected_output: &task.expected_output,
            agent,
        };
        doc.insert(Value::String(ids.of(node)), serde_yaml::to_value(config)?);
    }
    Ok(serde_yaml::to_string(&doc)?)
}

/// Both documents as one YAML stream, each headed by its file path.
pub fn render(
    graph: &Graph,
    config: &CompileConfig,
) -> Result<String> {
    let ids = Identifiers::resolve(graph);
    let agents = render_agents(graph, &ids)?;
    let tasks = render_tasks(graph, &ids)?;
    Ok(format!("# {}\n{}---\n# {}\n{}", config.agents_config, agents, config.tasks_config, tasks))
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;
    use crate::graph::{
        edge::{Connection, Handle},
        node::{AgentData, Node, TaskData},
    };

    fn docs(text: &str) -> Vec<Value> {
        serde_yaml::Deserializer::from_str(text).map(|d| Value::deserialize(d).unwrap()).collect()
    }

    fn crew() -> Graph {
        let writer = Node::agent(
            "a1",
            AgentData {
                name: "Writer".to_string(),
                role: "Staff writer".to_string(),
                goal: "Write clear posts".to_string(),
                backstory: "Ten years at a newspaper.\nHates jargon.".to_string(),
                tools: "SerperDevTool".to_string(),
            },
        );
        let draft = Node::task(
            "t1",
            TaskData {
                name: "Draft".to_string(),
                description: "Write the first draft".to_string(),
                expected_output: "A markdown post".to_string(),
            },
        );
        let review = Node::task(
            "t2",
            TaskData {
                name: "Final Review".to_string(),
                description: "Check: facts, tone".to_string(),
                expected_output: "Notes".to_string(),
            },
        );
        let graph = [writer, draft, review].into_iter().fold(Graph::new(), |g, n| g.add_node(n).unwrap());
        let (graph, verdict) = graph.add_edge(&Connection::new("a1", Some(Handle::AgentOut), "t1", Some(Handle::Agent)), "e1");
        assert!(verdict.is_accepted());
        graph
    }

    #[test]
    fn test_agent_assignment() {
        let text = render(&crew(), &CompileConfig::default()).unwrap();
        assert!(text.contains("agent: Writer"));

        let docs = docs(&text);
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1]["Draft"]["agent"], Value::String("Writer".to_string()));
        assert_eq!(docs[1]["Final_Review"]["agent"], Value::String(NO_AGENT.to_string()));
    }

    #[test]
    fn test_agent_reference_matches_agent_key() {
        let senior = Node::agent(
            "a2",
            AgentData {
                name: "Senior Writer".to_string(),
                ..Default::default()
            },
        );
        let graph = crew().add_node(senior).unwrap();
        let (graph, verdict) = graph.add_edge(&Connection::new("a2", Some(Handle::AgentOut), "t2", Some(Handle::Agent)), "e2");
        assert!(verdict.is_accepted());

        let docs = docs(&render(&graph, &CompileConfig::default()).unwrap());
        assert!(docs[0].get("Senior_Writer").is_some());
        assert_eq!(docs[1]["Final_Review"]["agent"], Value::String("Senior_Writer".to_string()));
    }

    #[test]
    fn test_fields_verbatim() {
        let text = render(&crew(), &CompileConfig::default()).unwrap();
        let docs = docs(&text);

        let writer = &docs[0]["Writer"];
        assert_eq!(writer["role"], Value::String("Staff writer".to_string()));
        assert_eq!(writer["backstory"], Value::String("Ten years at a newspaper.\nHates jargon.".to_string()));
        assert!(writer.get("tools").is_none());

        let review = &docs[1]["Final_Review"];
        assert_eq!(review["description"], Value::String("Check: facts, tone".to_string()));
        assert_eq!(review["expected_output"], Value::String("Notes".to_string()));
    }

    #[test]
    fn test_headers_and_order() {
        let text = render(&crew(), &CompileConfig::default()).unwrap();
        assert!(text.starts_with("# config/agents.yaml\n"));
        assert!(text.contains("---\n# config/tasks.yaml\n"));
        assert!(text.find("Draft:").unwrap() < text.find("Final_Review:").unwrap());
    }

    #[test]
    fn test_empty_graph() {
        let text = render(&Graph::new(), &CompileConfig::default()).unwrap();
        let docs = docs(&text);
        assert_eq!(docs.len(), 2);
        assert!(docs[0].as_mapping().unwrap().is_empty());
        assert!(docs[1].as_mapping().unwrap().is_empty());
    }
}
