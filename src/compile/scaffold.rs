//! Executable scaffold renderer: a Python crew module.
//!
//! One `@agent` factory per agent in graph order, one `@task` factory per task
//! in sequenced order, and a `@crew` aggregate running every task
//! sequentially.

use std::collections::HashSet;

use crate::{
    compile::{
        CompileConfig,
        sanitize::{Identifiers, sanitize},
    },
    graph::Graph,
};

const INDENT: &str = "    ";

/// Single-quoted Python string literal, control characters escaped.
fn py_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

fn py_bool(b: bool) -> &'static str {
    if b { "True" } else { "False" }
}

fn calls(idents: &[String]) -> String {
    idents.iter().map(|i| format!("self.{}()", i)).collect::<Vec<_>>().join(", ")
}

pub fn render(
    graph: &Graph,
    config: &CompileConfig,
) -> String {
    let ids = Identifiers::resolve(graph);
    let order = graph.sequence();
    let i1 = INDENT;
    let i2 = INDENT.repeat(2);
    let i3 = INDENT.repeat(3);
    let mut lines = Vec::new();

    // imports
    let mut tools = Vec::new();
    let mut seen = HashSet::new();
    for agent in graph.agents().filter_map(|n| n.as_agent()) {
        for tool in agent.tool_names().into_iter().map(sanitize) {
            if seen.insert(tool.clone()) {
                tools.push(tool);
            }
        }
    }
    lines.push("from crewai import Agent, Crew, Process, Task".to_string());
    lines.push("from crewai.project import CrewBase, agent, crew, task".to_string());
    if !tools.is_empty() {
        lines.push(format!("from crewai_tools import {}", tools.join(", ")));
    }
    lines.push(String::new());
    lines.push(String::new());

    let class_name = sanitize(&config.crew_name);
    lines.push("@CrewBase".to_string());
    lines.push(format!("class {}:", class_name));
    lines.push(format!("{}\"\"\"{} crew\"\"\"", i1, class_name));
    lines.push(String::new());
    lines.push(format!("{}agents_config = {}", i1, py_str(&config.agents_config)));
    lines.push(format!("{}tasks_config = {}", i1, py_str(&config.tasks_config)));

    let mut agent_idents = Vec::new();
    for node in graph.agents() {
        let Some(agent) = node.as_agent() else {
            continue;
        };
        let ident = ids.of(node);
        let tools: Vec<String> = agent.tool_names().into_iter().map(|t| format!("{}()", sanitize(t))).collect();

        lines.push(String::new());
        lines.push(format!("{}@agent", i1));
        lines.push(format!("{}def {}(self) -> Agent:", i1, ident));
        lines.push(format!("{}return Agent(", i2));
        lines.push(format!("{}config=self.agents_config[{}],", i3, py_str(&ident)));
        lines.push(format!("{}tools=[{}],", i3, tools.join(", ")));
        lines.push(format!("{}verbose={},", i3, py_bool(config.verbose)));
        lines.push(format!("{})", i2));
        agent_idents.push(ident);
    }

    let mut task_idents = Vec::new();
    for nid in order.iter() {
        let Some(node) = graph.node(nid) else {
            continue;
        };
        let ident = ids.of(node);
        let context: Vec<String> = graph.predecessors(nid).into_iter().map(|p| ids.of(p)).collect();

        lines.push(String::new());
        lines.push(format!("{}@task", i1));
        lines.push(format!("{}def {}(self) -> Task:", i1, ident));
        lines.push(format!("{}return Task(", i2));
        lines.push(format!("{}config=self.tasks_config[{}],", i3, py_str(&ident)));
        lines.push(format!("{}output_file={},", i3, py_str(&format!("{}.md", ident))));
        if !context.is_empty() {
            lines.push(format!("{}context=[{}],", i3, calls(&context)));
        }
        lines.push(format!("{})", i2));
        task_idents.push(ident);
    }

    lines.push(String::new());
    lines.push(format!("{}@crew", i1));
    lines.push(format!("{}def crew(self) -> Crew:", i1));
    lines.push(format!("{}return Crew(", i2));
    lines.push(format!("{}agents=[{}],", i3, calls(&agent_idents)));
    lines.push(format!("{}tasks=[{}],", i3, calls(&task_idents)));
    lines.push(format!("{}process=Process.sequential,", i3));
    lines.push(format!("{}verbose={},", i3, py_bool(config.verbose)));
    lines.push(format!("{})", i2));
    lines.push(String::new());

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{
        edge::{Connection, Handle},
        node::{AgentData, Node, TaskData},
    };

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

    fn connect(
        graph: Graph,
        id: &str,
        source: &str,
        source_handle: Handle,
        target: &str,
        target_handle: Handle,
    ) -> Graph {
        let (next, verdict) = graph.add_edge(&Connection::new(source, Some(source_handle), target, Some(target_handle)), id);
        assert!(verdict.is_accepted());
        next
    }

    fn crew() -> Graph {
        let researcher = Node::agent(
            "a1",
            AgentData {
                name: "Lead Researcher".to_string(),
                tools: "SerperDevTool, ,ScrapeWebsiteTool".to_string(),
                ..Default::default()
            },
        );
        let writer = Node::agent(
            "a2",
            AgentData {
                name: "Writer".to_string(),
                tools: "SerperDevTool".to_string(),
                ..Default::default()
            },
        );
        let nodes = vec![
            task("t_write", "Write Post"),
            researcher,
            task("t_research", "Research"),
            writer,
            task("t_outline", "Outline"),
            Node::begin("b"),
        ];
        let g = nodes.into_iter().fold(Graph::new(), |g, n| g.add_node(n).unwrap());
        let g = connect(g, "e1", "b", Handle::ExecOut, "t_research", Handle::ExecIn);
        let g = connect(g, "e2", "t_research", Handle::ExecOut, "t_write", Handle::ExecIn);
        let g = connect(g, "e3", "t_outline", Handle::ExecOut, "t_write", Handle::ExecIn);
        let g = connect(g, "e4", "a1", Handle::AgentOut, "t_research", Handle::Agent);
        connect(g, "e5", "a2", Handle::AgentOut, "t_write", Handle::Agent)
    }

    #[test]
    fn test_imports_deduplicated() {
        let text = render(&crew(), &CompileConfig::default());
        assert!(text.contains("from crewai_tools import SerperDevTool, ScrapeWebsiteTool\n"));
    }

    #[test]
    fn test_no_tools_import_without_tools() {
        let g = Graph::new().add_node(task("t", "Only")).unwrap();
        let text = render(&g, &CompileConfig::default());
        assert!(!text.contains("crewai_tools"));
        assert!(text.contains("tasks=[self.Only()],"));
        assert!(text.contains("agents=[],"));
    }

    #[test]
    fn test_agent_factories() {
        let text = render(&crew(), &CompileConfig::default());
        let expected = [
            "    @agent",
            "    def Lead_Researcher(self) -> Agent:",
            "        return Agent(",
            "            config=self.agents_config['Lead_Researcher'],",
            "            tools=[SerperDevTool(), ScrapeWebsiteTool()],",
            "            verbose=True,",
            "        )",
        ]
        .join("\n");
        assert!(text.contains(&expected), "{}", text);
    }

    #[test]
    fn test_task_factories_in_sequence() {
        let text = render(&crew(), &CompileConfig::default());
        let research = text.find("def Research(self)").unwrap();
        let write = text.find("def Write_Post(self)").unwrap();
        let outline = text.find("def Outline(self)").unwrap();
        assert!(research < write && write < outline);

        let expected = [
            "    def Write_Post(self) -> Task:",
            "        return Task(",
            "            config=self.tasks_config['Write_Post'],",
            "            output_file='Write_Post.md',",
            "            context=[self.Research(), self.Outline()],",
            "        )",
        ]
        .join("\n");
        assert!(text.contains(&expected), "{}", text);
        assert!(!text[research..write].contains("context="));
    }

    #[test]
    fn test_crew_aggregate() {
        let text = render(&crew(), &CompileConfig::default());
        assert!(text.contains("@CrewBase\nclass GeneratedCrew:"));
        assert!(text.contains("    agents_config = 'config/agents.yaml'"));
        assert!(text.contains("            agents=[self.Lead_Researcher(), self.Writer()],"));
        assert!(text.contains("            tasks=[self.Research(), self.Write_Post(), self.Outline()],"));
        assert!(text.contains("            process=Process.sequential,"));
    }

    #[test]
    fn test_config_applied() {
        let config = CompileConfig {
            crew_name: "Blog Crew".to_string(),
            verbose: false,
            ..Default::default()
        };
        let text = render(&crew(), &config);
        assert!(text.contains("class Blog_Crew:"));
        assert!(text.contains("verbose=False,"));
        assert!(!text.contains("verbose=True"));
    }

    #[test]
    fn test_py_str_escapes() {
        assert_eq!(py_str("it's"), "'it\\'s'");
        assert_eq!(py_str("a\\b"), "'a\\\\b'");
        assert_eq!(py_str("a\r\nb\tc"), "'a\\r\\nb\\tc'");
        assert_eq!(py_str("bell\u{7}"), "'bell\\x07'");
    }

    #[test]
    fn test_config_paths_escaped() {
        let config = CompileConfig {
            agents_config: "config/agents.yaml\r".to_string(),
            ..Default::default()
        };
        let text = render(&Graph::new(), &config);
        assert!(text.contains("agents_config = 'config/agents.yaml\\r'"));
        assert!(!text.contains('\r'));
    }
}
