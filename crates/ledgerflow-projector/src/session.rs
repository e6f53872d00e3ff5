//! Diagram session lifecycle.
//!
//! A session owns one graph for the lifetime of a page load: it starts empty,
//! is populated and classified once by [`DiagramSession::load`], and afterwards
//! only reacts to renderer callbacks. A fresh session is the only way to
//! re-read the ledger.

use serde::Serialize;
use tracing::{debug, info};

use ledgerflow_graph::{Graph, NodeRole, Position};

use crate::error::ProjectError;
use crate::projector::{ProjectionSummary, Projector};

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
  /// Nothing loaded yet.
  Empty,
  /// A projection is writing to the graph.
  Populating,
  /// The graph is complete and classified.
  Classified,
  /// The projection failed; the graph may be partial.
  Failed,
}

/// Commands issued to the renderer's viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewportCommand {
  /// Fit the whole diagram into view.
  FitView,
}

/// One diagram, from empty graph to rendered workflow.
pub struct DiagramSession<P: Projector> {
  projector: P,
  graph: Graph,
  phase: SessionPhase,
  summary: Option<ProjectionSummary>,
}

impl<P: Projector> DiagramSession<P> {
  pub fn new(projector: P) -> Self {
    Self {
      projector,
      graph: Graph::new(),
      phase: SessionPhase::Empty,
      summary: None,
    }
  }

  pub fn graph(&self) -> &Graph {
    &self.graph
  }

  pub fn phase(&self) -> SessionPhase {
    self.phase
  }

  /// Summary of the last successful load.
  pub fn summary(&self) -> Option<&ProjectionSummary> {
    self.summary.as_ref()
  }

  /// Run the projection. Only allowed once per session.
  pub async fn load(&mut self) -> Result<ProjectionSummary, ProjectError> {
    if self.phase != SessionPhase::Empty {
      return Err(ProjectError::AlreadyLoaded);
    }

    self.phase = SessionPhase::Populating;
    match self.projector.project(&mut self.graph).await {
      Ok(summary) => {
        self.phase = SessionPhase::Classified;
        self.summary = Some(summary);
        Ok(summary)
      }
      Err(e) => {
        self.phase = SessionPhase::Failed;
        Err(e)
      }
    }
  }

  /// The renderer finished initializing.
  ///
  /// Returns a fit command once the graph is classified; a partial or
  /// pending graph is left as is.
  pub fn on_initialized(&self) -> Option<ViewportCommand> {
    match self.phase {
      SessionPhase::Classified => Some(ViewportCommand::FitView),
      _ => None,
    }
  }

  /// The user dropped a node at a new position.
  pub fn on_node_dragged(&mut self, node_id: &str, position: Position) -> Result<(), ProjectError> {
    self.graph.move_node(node_id, position)?;
    debug!(node_id, x = position.x, y = position.y, "node moved");
    Ok(())
  }

  /// The user drew a connection between two nodes.
  ///
  /// Transitions only come from the ledger, so the graph is left unchanged.
  pub fn on_connected(&self, source_id: &str, target_id: &str) {
    info!(source = source_id, target = target_id, "connection drawn, not persisted");
  }

  /// Override the role of one node.
  pub fn set_role(&mut self, node_id: &str, role: NodeRole) -> Result<(), ProjectError> {
    self.graph.set_role(node_id, role)?;
    Ok(())
  }

  /// Current layout, nodes and edges as the renderer sees them.
  pub fn layout(&self) -> serde_json::Value {
    self.graph.to_json()
  }
}
