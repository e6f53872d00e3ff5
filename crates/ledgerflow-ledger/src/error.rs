use thiserror::Error;

/// Errors raised while reading from a ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
  /// The record store has no such field.
  #[error("field not found: {0}")]
  FieldNotFound(String),

  /// The indexed field has no record at this index.
  #[error("no record at {field}({index})")]
  IndexNotFound { field: String, index: u64 },

  /// The call arguments do not fit the field.
  #[error("invalid arguments for {field}: {message}")]
  InvalidArguments { field: String, message: String },

  /// A raw value could not be converted to the requested type.
  #[error("cannot read {value} as {expected}")]
  Coercion { value: String, expected: &'static str },

  /// The remote call failed (network, timeout, revert).
  #[error("ledger call failed: {0}")]
  Transport(String),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
}
