use std::collections::HashMap;

use crate::graph::{Edge, Node};

/// Adjacency view of a graph for traversal and analysis.
///
/// Built on demand from the node and edge lists; it does not track later
/// changes to the graph.
#[derive(Debug, Clone)]
pub struct Adjacency {
  /// Adjacency list: node_id -> list of downstream node_ids.
  adjacency: HashMap<String, Vec<String>>,
  /// Reverse adjacency: node_id -> list of upstream node_ids.
  reverse_adjacency: HashMap<String, Vec<String>>,
  /// Nodes with no outgoing edges, in node order.
  terminals: Vec<String>,
}

impl Adjacency {
  pub(crate) fn new(nodes: &[Node], edges: &[Edge]) -> Self {
    let mut adjacency: HashMap<String, Vec<String>> = HashMap::new();
    let mut reverse_adjacency: HashMap<String, Vec<String>> = HashMap::new();

    for node in nodes {
      adjacency.entry(node.id().to_string()).or_default();
      reverse_adjacency.entry(node.id().to_string()).or_default();
    }

    // Dangling endpoints get entries too, the renderer decides what they mean
    for edge in edges {
      adjacency
        .entry(edge.source_id().to_string())
        .or_default()
        .push(edge.target_id().to_string());
      reverse_adjacency
        .entry(edge.target_id().to_string())
        .or_default()
        .push(edge.source_id().to_string());
    }

    let terminals: Vec<String> = nodes
      .iter()
      .filter(|n| adjacency.get(n.id()).is_none_or(|v| v.is_empty()))
      .map(|n| n.id().to_string())
      .collect();

    Self {
      adjacency,
      reverse_adjacency,
      terminals,
    }
  }

  /// Get downstream nodes for a given node.
  pub fn downstream(&self, node_id: &str) -> &[String] {
    self
      .adjacency
      .get(node_id)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  /// Get upstream nodes for a given node.
  pub fn upstream(&self, node_id: &str) -> &[String] {
    self
      .reverse_adjacency
      .get(node_id)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  /// Check if a node has no outgoing edges.
  pub fn is_terminal(&self, node_id: &str) -> bool {
    self.downstream(node_id).is_empty()
  }

  /// Get all terminal nodes (no outgoing edges).
  pub fn terminals(&self) -> &[String] {
    &self.terminals
  }
}
