//! # Crewgraph
//!
//! Crewgraph is the core of a visual crew editor. A crew is drawn as a
//! directed graph of begin, agent, task and reroute nodes, and compiled into
//! a declarative agent/task config plus an executable crew scaffold.
//!
//! ## Core Features
//!
//! - **Typed Graph Model**: Immutable snapshots with pure add/remove/update operations
//! - **Connection Rules**: Every proposed edge is accepted or rejected, reroutes infer their type
//! - **Task Sequencing**: Deterministic depth-first task order from the begin node
//! - **Artifact Compiler**: Agents/tasks YAML and a Python crew module
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use crewgraph::{Connection, Editor, Handle, NodeKind, Position, ids::SequentialIds};
//!
//! let mut editor = Editor::new(SequentialIds::default());
//! let begin = editor.drop_node(NodeKind::Begin, Position::default(), None)?;
//! let task = editor.drop_node(NodeKind::Task, Position::default(), None)?;
//! editor.change(&task, "name", "Draft")?;
//! editor.connect(Connection::new(begin, Some(Handle::ExecOut), task, Some(Handle::ExecIn)))?;
//!
//! let config = editor.render_declarative()?;
//! let scaffold = editor.render_scaffold();
//! ```

pub mod compile;
mod config;
mod editor;
mod error;
pub mod graph;
pub mod ids;
mod model;
pub mod store;

use std::sync::{Arc, RwLock};

pub use compile::{Compiler, render_declarative, render_scaffold};
pub use config::{CompileConfig, Config, IdStrategy, IdsConfig};
pub use editor::Editor;
pub use error::CrewgraphError;
pub use graph::{
    Graph,
    connection::{Verdict, validate},
    edge::{Connection, Edge, EdgeId, EdgeStyle, Handle},
    node::{AgentData, ClaimedType, Node, NodeData, NodeId, NodeKind, Position, TaskData},
};
pub use model::*;

/// Result type alias for Crewgraph operations.
pub type Result<T> = std::result::Result<T, CrewgraphError>;

/// Thread-safe shared lock wrapper using Arc<RwLock<T>>.
pub(crate) type ShareLock<T> = Arc<RwLock<T>>;
