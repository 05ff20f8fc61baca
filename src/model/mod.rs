mod edge;
mod graph;
mod node;

pub use edge::EdgeModel;
pub use graph::GraphModel;
pub use node::NodeModel;
