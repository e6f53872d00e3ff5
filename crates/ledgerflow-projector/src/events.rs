//! Projection events and notifiers for observability.
//!
//! Events are emitted while a projection runs so that a renderer can follow
//! progress and, on `Ready`, fit the diagram to the viewport.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Events emitted during a projection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProjectionEvent {
  /// The projection has started.
  Started,

  /// Both counters have been read.
  CountsFetched {
    state_count: u64,
    transition_count: u64,
  },

  /// A state was appended as a node.
  NodeAdded { node_id: String },

  /// A transition was appended as an edge.
  EdgeAdded { edge_id: String },

  /// The graph is complete and classified.
  Ready { nodes: usize, edges: usize },

  /// The projection was aborted. No `Ready` follows.
  Failed { error: String },
}

/// Trait for receiving projection events.
///
/// The projector calls `notify` for each event; implementations decide what
/// to do with them (render, log, forward, ignore).
pub trait ProjectionNotifier: Send + Sync {
  fn notify(&self, event: ProjectionEvent);
}

/// A no-op notifier that discards all events.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

impl ProjectionNotifier for NoopNotifier {
  fn notify(&self, _event: ProjectionEvent) {}
}

/// A notifier that sends events to an unbounded channel.
///
/// Sending never blocks the projector; events are dropped once the receiver
/// is gone.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
  sender: mpsc::UnboundedSender<ProjectionEvent>,
}

impl ChannelNotifier {
  pub fn new(sender: mpsc::UnboundedSender<ProjectionEvent>) -> Self {
    Self { sender }
  }
}

impl ProjectionNotifier for ChannelNotifier {
  fn notify(&self, event: ProjectionEvent) {
    // Receiver may have been dropped
    let _ = self.sender.send(event);
  }
}
