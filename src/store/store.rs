use std::sync::Arc;

use tracing::trace;

use crate::{
    CrewgraphError, Result,
    graph::Graph,
    model::GraphModel,
    store::{GraphCollection, MemStore, SavedGraph, time_millis},
};

/// Saved-graph store over a pluggable collection.
#[derive(Clone)]
pub struct Store {
    graphs: Arc<dyn GraphCollection>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(Arc::new(MemStore::new()))
    }
}

impl Store {
    pub fn new(graphs: Arc<dyn GraphCollection>) -> Self {
        Self { graphs }
    }

    pub fn graphs(&self) -> Arc<dyn GraphCollection> {
        self.graphs.clone()
    }

    /// Saves the graph under `name`, replacing an earlier save of that name.
    pub fn save(
        &self,
        name: &str,
        title: &str,
        graph: &Graph,
    ) -> Result<bool> {
        trace!("store::save({})", name);
        if name.trim().is_empty() {
            return Err(CrewgraphError::Store("name required to save".into()));
        }
        let model = GraphModel::try_from(graph)?;
        let mut data = SavedGraph {
            name: name.to_string(),
            title: title.to_string(),
            nodes: model.nodes,
            edges: model.edges,
            create_time: time_millis(),
            update_time: 0,
        };
        if !self.graphs.exists(name)? {
            return self.graphs.create(&data);
        }
        let saved = self.graphs.find(name)?;
        data.create_time = saved.create_time;
        data.update_time = time_millis();
        self.graphs.update(&data)
    }

    /// Loads the graph saved under `name`, with its title.
    pub fn load(
        &self,
        name: &str,
    ) -> Result<(String, Graph)> {
        trace!("store::load({})", name);
        let data = self.graphs.find(name)?;
        let graph = Graph::try_from(&data.model())?;
        Ok((data.title, graph))
    }

    pub fn list(&self) -> Result<Vec<String>> {
        self.graphs.list()
    }

    pub fn delete(
        &self,
        name: &str,
    ) -> Result<bool> {
        trace!("store::delete({})", name);
        self.graphs.delete(name)
    }
}
