use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::adjacency::Adjacency;
use crate::error::GraphError;
use crate::record::{StateRecord, TransitionRecord};

/// Structural role of a node, as understood by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
  /// Interior node.
  #[default]
  Default,
  /// Workflow entry.
  Input,
  /// Workflow terminus (no outgoing transition).
  Output,
}

/// Presentation position of a node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
  pub x: f64,
  pub y: f64,
}

impl Position {
  pub fn new(x: f64, y: f64) -> Self {
    Self { x, y }
  }
}

impl From<(f64, f64)> for Position {
  fn from((x, y): (f64, f64)) -> Self {
    Self { x, y }
  }
}

/// Arrow marker drawn at the target end of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerStyle {
  #[default]
  ArrowClosed,
  Arrow,
}

/// A state placed in the diagram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
  #[serde(flatten)]
  record: StateRecord,
  pub role: NodeRole,
  pub position: Position,
}

impl Node {
  pub fn new(record: StateRecord, position: Position) -> Self {
    Self {
      record,
      role: NodeRole::Default,
      position,
    }
  }

  pub fn id(&self) -> &str {
    self.record.id()
  }

  pub fn label(&self) -> &str {
    self.record.label()
  }

  pub fn record(&self) -> &StateRecord {
    &self.record
  }
}

/// A transition drawn in the diagram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
  #[serde(flatten)]
  record: TransitionRecord,
  #[serde(rename = "marker_end")]
  pub marker: MarkerStyle,
}

impl Edge {
  pub fn new(record: TransitionRecord) -> Self {
    Self {
      record,
      marker: MarkerStyle::ArrowClosed,
    }
  }

  pub fn id(&self) -> &str {
    self.record.id()
  }

  pub fn label(&self) -> &str {
    self.record.label()
  }

  pub fn source_id(&self) -> &str {
    self.record.source_id()
  }

  pub fn target_id(&self) -> &str {
    self.record.target_id()
  }

  pub fn animated(&self) -> bool {
    self.record.animated()
  }

  pub fn record(&self) -> &TransitionRecord {
    &self.record
  }
}

/// The diagram graph: ordered nodes and edges.
///
/// Nodes and edges are only ever appended. After insertion, the only mutable
/// parts of a node are its role and position.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Graph {
  pub(crate) nodes: Vec<Node>,
  pub(crate) edges: Vec<Edge>,
  #[serde(skip)]
  node_ids: HashSet<String>,
  #[serde(skip)]
  edge_ids: HashSet<String>,
}

impl Graph {
  /// Create an empty graph.
  pub fn new() -> Self {
    Self::default()
  }

  pub fn nodes(&self) -> &[Node] {
    &self.nodes
  }

  pub fn edges(&self) -> &[Edge] {
    &self.edges
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty() && self.edges.is_empty()
  }

  /// Get a node by ID.
  pub fn node(&self, node_id: &str) -> Option<&Node> {
    self.nodes.iter().find(|n| n.id() == node_id)
  }

  /// Get an edge by ID.
  pub fn edge(&self, edge_id: &str) -> Option<&Edge> {
    self.edges.iter().find(|e| e.id() == edge_id)
  }

  pub fn contains_node(&self, node_id: &str) -> bool {
    self.node_ids.contains(node_id)
  }

  /// Append a node for the given state.
  pub fn push_node(
    &mut self,
    record: StateRecord,
    position: Position,
  ) -> Result<&Node, GraphError> {
    if !self.node_ids.insert(record.id().to_string()) {
      return Err(GraphError::DuplicateNode(record.id().to_string()));
    }
    self.nodes.push(Node::new(record, position));
    Ok(&self.nodes[self.nodes.len() - 1])
  }

  /// Append an edge for the given transition.
  ///
  /// Endpoints are not checked; see [`Graph::check_endpoints`].
  pub fn push_edge(&mut self, record: TransitionRecord) -> Result<&Edge, GraphError> {
    if !self.edge_ids.insert(record.id().to_string()) {
      return Err(GraphError::DuplicateEdge(record.id().to_string()));
    }
    self.edges.push(Edge::new(record));
    Ok(&self.edges[self.edges.len() - 1])
  }

  /// Verify that both endpoints of a transition are nodes of this graph.
  pub fn check_endpoints(&self, record: &TransitionRecord) -> Result<(), GraphError> {
    if self.contains_node(record.source_id()) && self.contains_node(record.target_id()) {
      return Ok(());
    }
    Err(GraphError::DanglingEdge {
      edge_id: record.id().to_string(),
      source_id: record.source_id().to_string(),
      target_id: record.target_id().to_string(),
    })
  }

  /// Edges with at least one endpoint that is not a node.
  pub fn dangling_edges(&self) -> Vec<&Edge> {
    self
      .edges
      .iter()
      .filter(|e| !self.contains_node(e.source_id()) || !self.contains_node(e.target_id()))
      .collect()
  }

  /// Override the role of a node.
  pub fn set_role(&mut self, node_id: &str, role: NodeRole) -> Result<(), GraphError> {
    let node = self.node_mut(node_id)?;
    node.role = role;
    Ok(())
  }

  /// Move a node, e.g. after the user dragged it.
  pub fn move_node(&mut self, node_id: &str, position: Position) -> Result<(), GraphError> {
    let node = self.node_mut(node_id)?;
    node.position = position;
    Ok(())
  }

  /// Build the adjacency view for traversal.
  pub fn adjacency(&self) -> Adjacency {
    Adjacency::new(&self.nodes, &self.edges)
  }

  /// Serialize the current layout.
  pub fn to_json(&self) -> serde_json::Value {
    serde_json::json!({
      "nodes": self.nodes,
      "edges": self.edges,
    })
  }

  fn node_mut(&mut self, node_id: &str) -> Result<&mut Node, GraphError> {
    self
      .nodes
      .iter_mut()
      .find(|n| n.id() == node_id)
      .ok_or_else(|| GraphError::NodeNotFound(node_id.to_string()))
  }
}
