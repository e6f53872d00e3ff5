use serde::{Deserialize, Serialize};

/// A workflow state as read from the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRecord {
  id: String,
  label: String,
}

impl StateRecord {
  /// Build a record for the state stored at `index`.
  pub fn new(index: u64, label: impl Into<String>) -> Self {
    Self {
      id: index.to_string(),
      label: label.into(),
    }
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn label(&self) -> &str {
    &self.label
  }
}

/// A workflow transition as read from the record store.
///
/// `source_id` and `target_id` refer to state ids by value only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
  id: String,
  label: String,
  #[serde(rename = "source")]
  source_id: String,
  #[serde(rename = "target")]
  target_id: String,
  animated: bool,
}

impl TransitionRecord {
  /// Build a record for the transition stored at `index`.
  pub fn new(
    index: u64,
    label: impl Into<String>,
    source_id: impl Into<String>,
    target_id: impl Into<String>,
    animated: bool,
  ) -> Self {
    Self {
      id: index.to_string(),
      label: label.into(),
      source_id: source_id.into(),
      target_id: target_id.into(),
      animated,
    }
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn label(&self) -> &str {
    &self.label
  }

  pub fn source_id(&self) -> &str {
    &self.source_id
  }

  pub fn target_id(&self) -> &str {
    &self.target_id
  }

  pub fn animated(&self) -> bool {
    self.animated
  }
}
