//! Editing session over a crew graph.
//!
//! The editor owns the current snapshot and the id generator, and is the one
//! place where canvas actions turn into graph transformations. All mutations
//! go through `&mut self`, so a host that shares an editor across threads has
//! to serialize them, e.g. behind a `Mutex`.
//!
//! Operations naming a node or edge that no longer exists are ignored.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    Config, CrewgraphError, Result,
    compile::Compiler,
    graph::{
        Graph,
        connection::Verdict,
        edge::{Connection, EdgeId},
        node::{Node, NodeData, NodeId, NodeKind, Position},
    },
    ids::{self, IdGenerator},
    store::Store,
};

/// Draws a generator may spend on ids that are already taken.
const MAX_ID_ATTEMPTS: usize = 64;

pub struct Editor {
    graph: Graph,
    ids: Box<dyn IdGenerator>,
    selected: Option<NodeId>,
    compiler: Compiler,
}

impl Editor {
    pub fn new(ids: impl IdGenerator + 'static) -> Self {
        Self {
            graph: Graph::new(),
            ids: Box::new(ids),
            selected: None,
            compiler: Compiler::default(),
        }
    }

    pub fn with_config(config: &Config) -> Self {
        Self {
            graph: Graph::new(),
            ids: ids::from_config(&config.ids),
            selected: None,
            compiler: Compiler::new(config.compile.clone()),
        }
    }

    /// Replaces the current snapshot, clearing the selection.
    pub fn with_graph(
        mut self,
        graph: Graph,
    ) -> Self {
        self.graph = graph;
        self.selected = None;
        self
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn compiler(&self) -> &Compiler {
        &self.compiler
    }

    /// An id not used by any node or edge of the current graph, nor in `reserved`.
    fn fresh_id(
        &mut self,
        reserved: &[&str],
    ) -> Result<String> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.next_id();
            if self.graph.node(&id).is_none() && self.graph.edge(&id).is_none() && !reserved.contains(&id.as_str()) {
                return Ok(id);
            }
        }
        warn!("id generator repeated taken ids {} times", MAX_ID_ATTEMPTS);
        Err(CrewgraphError::Graph("id generator exhausted".into()))
    }

    fn ignore_missing(
        &self,
        result: Result<Graph>,
    ) -> Result<Option<Graph>> {
        match result {
            Ok(graph) => Ok(Some(graph)),
            Err(e) if e.is_not_found() => {
                debug!("ignored: {}", e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Instantiates a dropped node, optionally from previously saved data.
    ///
    /// A second begin node is refused.
    pub fn drop_node(
        &mut self,
        kind: NodeKind,
        position: Position,
        saved: Option<Value>,
    ) -> Result<NodeId> {
        let data = match saved {
            Some(value) => NodeData::from_value(kind, value)?,
            None => NodeData::empty(kind),
        };
        let id = self.fresh_id(&[])?;
        match self.graph.add_node(Node::new(id.clone(), position, data)) {
            Ok(graph) => {
                info!(node = %id, kind = kind.as_ref(), "node dropped");
                self.graph = graph;
                Ok(id)
            }
            Err(e) => {
                warn!("drop refused: {}", e);
                Err(e)
            }
        }
    }

    /// Proposes a connection; accepted ones become edges with a fresh id.
    ///
    /// Fails only when no fresh edge id can be drawn.
    pub fn connect(
        &mut self,
        connection: Connection,
    ) -> Result<Verdict> {
        let id = self.fresh_id(&[])?;
        let (graph, verdict) = self.graph.add_edge(&connection, id);
        self.graph = graph;
        Ok(verdict)
    }

    /// Change notification from a node's field editor.
    pub fn change(
        &mut self,
        nid: &str,
        field: &str,
        value: &str,
    ) -> Result<()> {
        if let Some(graph) = self.ignore_missing(self.graph.update_node_data(nid, field, value))? {
            self.graph = graph;
        }
        Ok(())
    }

    pub fn select(
        &mut self,
        nid: Option<NodeId>,
    ) {
        self.selected = nid.filter(|id| self.graph.node(id).is_some());
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Deletes the selected node with its edges and returns its id.
    pub fn delete_selected(&mut self) -> Option<NodeId> {
        let nid = self.selected.take()?;
        self.delete_node(&nid);
        Some(nid)
    }

    pub fn delete_node(
        &mut self,
        nid: &str,
    ) {
        if let Ok(graph) = self.graph.remove_node(nid) {
            self.graph = graph;
            if self.selected.as_deref() == Some(nid) {
                self.selected = None;
            }
        } else {
            debug!("ignored delete of missing node {}", nid);
        }
    }

    pub fn delete_edge(
        &mut self,
        edge_id: &str,
    ) {
        if let Ok(graph) = self.graph.remove_edge(edge_id) {
            self.graph = graph;
        } else {
            debug!("ignored delete of missing edge {}", edge_id);
        }
    }

    /// Splits the edge with a new reroute node and returns the reroute id.
    ///
    /// Returns `None` when the edge does not exist.
    pub fn split_edge(
        &mut self,
        edge_id: &str,
        position: Position,
    ) -> Result<Option<NodeId>> {
        let rid = self.fresh_id(&[])?;
        let reroute = Node::new(rid.clone(), position, NodeData::empty(NodeKind::Reroute));
        let tail: EdgeId = self.fresh_id(&[rid.as_str()])?;
        match self.ignore_missing(self.graph.split_edge(edge_id, reroute, tail))? {
            Some(graph) => {
                self.graph = graph;
                Ok(Some(rid))
            }
            None => Ok(None),
        }
    }

    pub fn render_declarative(&self) -> Result<String> {
        self.compiler.declarative(&self.graph)
    }

    pub fn render_scaffold(&self) -> String {
        self.compiler.scaffold(&self.graph)
    }

    pub fn save(
        &self,
        store: &Store,
        name: &str,
        title: &str,
    ) -> Result<bool> {
        store.save(name, title, &self.graph)
    }

    /// Replaces the current graph with a saved one and returns its title.
    pub fn load(
        &mut self,
        store: &Store,
        name: &str,
    ) -> Result<String> {
        if name.trim().is_empty() {
            return Err(CrewgraphError::Store("name required to load".into()));
        }
        let (title, graph) = store.load(name)?;
        self.graph = graph;
        self.selected = None;
        Ok(title)
    }
}
