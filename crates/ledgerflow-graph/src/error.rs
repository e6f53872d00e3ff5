use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
  #[error("node not found: {0}")]
  NodeNotFound(String),

  #[error("duplicate node id: {0}")]
  DuplicateNode(String),

  #[error("duplicate edge id: {0}")]
  DuplicateEdge(String),

  #[error("edge '{edge_id}' references unknown node: source={source_id}, target={target_id}")]
  DanglingEdge {
    edge_id: String,
    source_id: String,
    target_id: String,
  },
}
