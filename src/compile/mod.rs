//! Graph-to-artifact compiler.
//!
//! Two renderers share nothing but the graph snapshot and run in any order:
//! the declarative agent/task config and the executable crew scaffold.

pub mod declarative;
pub mod sanitize;
pub mod scaffold;

use tracing::debug;

use crate::{Result, config::CompileConfig, graph::Graph};

/// Renders both artifacts with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    config: CompileConfig,
}

impl Compiler {
    pub fn new(config: CompileConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompileConfig {
        &self.config
    }

    pub fn declarative(
        &self,
        graph: &Graph,
    ) -> Result<String> {
        debug!(agents = graph.agents().count(), tasks = graph.tasks().count(), "render declarative");
        declarative::render(graph, &self.config)
    }

    pub fn scaffold(
        &self,
        graph: &Graph,
    ) -> String {
        debug!(agents = graph.agents().count(), tasks = graph.tasks().count(), "render scaffold");
        scaffold::render(graph, &self.config)
    }
}

/// Declarative artifact with the default configuration.
pub fn render_declarative(graph: &Graph) -> Result<String> {
    Compiler::default().declarative(graph)
}

/// Scaffold artifact with the default configuration.
pub fn render_scaffold(graph: &Graph) -> String {
    Compiler::default().scaffold(graph)
}
