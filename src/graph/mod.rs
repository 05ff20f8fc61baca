pub mod connection;
pub mod edge;
mod graph;
pub mod node;
pub mod sequence;

pub use graph::Graph;
