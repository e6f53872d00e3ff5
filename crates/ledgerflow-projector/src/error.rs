use ledgerflow_graph::GraphError;
use ledgerflow_ledger::LedgerError;

/// Errors that abort a projection run.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
  /// A ledger read failed. Not retried.
  #[error("ledger read {call} failed")]
  Ledger {
    call: String,
    #[source]
    source: LedgerError,
  },

  /// A ledger read returned a tuple that cannot be turned into a record.
  #[error("malformed record from {call}: {reason}")]
  MalformedRecord { call: String, reason: String },

  /// The graph refused a node or edge.
  #[error(transparent)]
  Graph(#[from] GraphError),

  /// The session already ran its projection.
  #[error("session already loaded")]
  AlreadyLoaded,
}
