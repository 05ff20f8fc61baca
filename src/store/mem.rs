use std::collections::HashMap;

use crate::{
    CrewgraphError, Result, ShareLock,
    store::{GraphCollection, SavedGraph, map_store_err},
};

/// In-memory graph collection.
#[derive(Debug, Clone, Default)]
pub struct MemStore {
    graphs: ShareLock<HashMap<String, SavedGraph>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GraphCollection for MemStore {
    fn exists(
        &self,
        name: &str,
    ) -> Result<bool> {
        let graphs = self.graphs.read().map_err(map_store_err)?;
        Ok(graphs.contains_key(name))
    }

    fn find(
        &self,
        name: &str,
    ) -> Result<SavedGraph> {
        let graphs = self.graphs.read().map_err(map_store_err)?;
        graphs.get(name).cloned().ok_or_else(|| CrewgraphError::Store(format!("graph {} not found", name)))
    }

    fn list(&self) -> Result<Vec<String>> {
        let graphs = self.graphs.read().map_err(map_store_err)?;
        let mut names: Vec<String> = graphs.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn create(
        &self,
        data: &SavedGraph,
    ) -> Result<bool> {
        let mut graphs = self.graphs.write().map_err(map_store_err)?;
        if graphs.contains_key(&data.name) {
            return Ok(false);
        }
        graphs.insert(data.name.clone(), data.clone());
        Ok(true)
    }

    fn update(
        &self,
        data: &SavedGraph,
    ) -> Result<bool> {
        let mut graphs = self.graphs.write().map_err(map_store_err)?;
        match graphs.get_mut(&data.name) {
            Some(slot) => {
                *slot = data.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete(
        &self,
        name: &str,
    ) -> Result<bool> {
        let mut graphs = self.graphs.write().map_err(map_store_err)?;
        Ok(graphs.remove(name).is_some())
    }
}
