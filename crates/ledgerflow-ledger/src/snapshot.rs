use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use crate::error::LedgerError;
use crate::reader::LedgerReader;
use crate::value::RawValue;

/// A captured copy of a ledger record store.
///
/// ```text
/// {
///   "address": "0x5FbDB2315678afecb367f032d93F642f64180aa3",
///   "scalars": { "stateIndex": [3], "transitionIndex": [2] },
///   "tables": {
///     "states": { "1": ["Draft"], "2": ["Published"] },
///     "transitions": { "1": ["publish", 1, 2, true] }
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
  /// Address of the record store the snapshot was taken from.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub address: Option<String>,
  /// Fields read without arguments.
  #[serde(default)]
  pub scalars: HashMap<String, Vec<RawValue>>,
  /// Fields read by 1-based index.
  #[serde(default)]
  pub tables: HashMap<String, BTreeMap<u64, Vec<RawValue>>>,
}

impl LedgerSnapshot {
  /// Set a scalar field.
  pub fn with_scalar(mut self, field: impl Into<String>, tuple: Vec<RawValue>) -> Self {
    self.scalars.insert(field.into(), tuple);
    self
  }

  /// Set one record of an indexed field.
  pub fn with_record(mut self, field: impl Into<String>, index: u64, tuple: Vec<RawValue>) -> Self {
    self.tables.entry(field.into()).or_default().insert(index, tuple);
    self
  }
}

/// Ledger reader backed by a [`LedgerSnapshot`].
#[derive(Debug, Clone)]
pub struct SnapshotLedger {
  snapshot: LedgerSnapshot,
}

impl SnapshotLedger {
  pub fn new(snapshot: LedgerSnapshot) -> Self {
    Self { snapshot }
  }

  /// Load a snapshot from a JSON file.
  pub async fn load(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
    let content = fs::read_to_string(path.as_ref()).await?;
    let snapshot: LedgerSnapshot = serde_json::from_str(&content)?;
    debug!(
      path = %path.as_ref().display(),
      scalars = snapshot.scalars.len(),
      tables = snapshot.tables.len(),
      "loaded ledger snapshot"
    );
    Ok(Self::new(snapshot))
  }

  pub fn address(&self) -> Option<&str> {
    self.snapshot.address.as_deref()
  }

  pub fn snapshot(&self) -> &LedgerSnapshot {
    &self.snapshot
  }

  fn read_scalar(&self, field: &str) -> Result<Vec<RawValue>, LedgerError> {
    if let Some(tuple) = self.snapshot.scalars.get(field) {
      return Ok(tuple.clone());
    }
    if self.snapshot.tables.contains_key(field) {
      return Err(LedgerError::InvalidArguments {
        field: field.to_string(),
        message: "indexed field requires an index".to_string(),
      });
    }
    Err(LedgerError::FieldNotFound(field.to_string()))
  }

  fn read_record(&self, field: &str, index: &RawValue) -> Result<Vec<RawValue>, LedgerError> {
    let table = match self.snapshot.tables.get(field) {
      Some(table) => table,
      None if self.snapshot.scalars.contains_key(field) => {
        return Err(LedgerError::InvalidArguments {
          field: field.to_string(),
          message: "scalar field takes no arguments".to_string(),
        });
      }
      None => return Err(LedgerError::FieldNotFound(field.to_string())),
    };

    let index = index.as_count()?;
    table
      .get(&index)
      .cloned()
      .ok_or_else(|| LedgerError::IndexNotFound {
        field: field.to_string(),
        index,
      })
  }
}

#[async_trait]
impl LedgerReader for SnapshotLedger {
  async fn read_field(
    &self,
    field: &str,
    args: &[RawValue],
  ) -> Result<Vec<RawValue>, LedgerError> {
    match args {
      [] => self.read_scalar(field),
      [index] => self.read_record(field, index),
      _ => Err(LedgerError::InvalidArguments {
        field: field.to_string(),
        message: format!("expected at most one argument, got {}", args.len()),
      }),
    }
  }
}
