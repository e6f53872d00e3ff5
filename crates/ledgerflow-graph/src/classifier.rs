use std::collections::HashSet;

use crate::graph::{Edge, Graph, Node, NodeRole};

/// Marks structural roles on a fully populated graph.
///
/// The node whose id is [`GraphClassifier::INPUT_NODE_ID`] becomes `Input`.
/// Every node that is not the source of any edge becomes `Output`, and that
/// check runs second: a node matching both rules ends up `Output`. All other
/// nodes are `Default`.
///
/// Classification is a pure function of the node and edge lists, so running
/// it again yields the same roles.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphClassifier;

impl GraphClassifier {
  /// Id of the workflow entry node. Compared as a string.
  pub const INPUT_NODE_ID: &'static str = "1";

  pub fn new() -> Self {
    Self
  }

  /// Compute the role of every node, in node order.
  pub fn assign_roles(&self, nodes: &[Node], edges: &[Edge]) -> Vec<NodeRole> {
    let sources: HashSet<&str> = edges.iter().map(|e| e.source_id()).collect();

    nodes
      .iter()
      .map(|node| {
        let mut role = NodeRole::Default;
        if node.id() == Self::INPUT_NODE_ID {
          role = NodeRole::Input;
        }
        if !sources.contains(node.id()) {
          role = NodeRole::Output;
        }
        role
      })
      .collect()
  }

  /// Apply roles to the graph in place.
  pub fn classify(&self, graph: &mut Graph) {
    let roles = self.assign_roles(&graph.nodes, &graph.edges);
    for (node, role) in graph.nodes.iter_mut().zip(roles) {
      node.role = role;
    }
  }
}
