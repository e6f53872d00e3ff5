//! Ledgerflow Graph
//!
//! This crate provides the in-memory diagram graph that a ledger-resident
//! state machine is projected into, and the classifier that marks its
//! structural roles.
//!
//! Key properties:
//! - Nodes and edges are append-only and keep fetch order
//! - Ids are strings everywhere, including numeric ledger indexes
//! - Only node roles and positions change after insertion
//! - Edge endpoints are not required to resolve to nodes

mod adjacency;
mod classifier;
mod error;
mod graph;
mod record;

pub use adjacency::Adjacency;
pub use classifier::GraphClassifier;
pub use error::GraphError;
pub use graph::{Edge, Graph, MarkerStyle, Node, NodeRole, Position};
pub use record::{StateRecord, TransitionRecord};
