use serde::{Deserialize, Serialize};

/// Names of the record store fields read during projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldNames {
  /// Scalar field holding the state counter.
  pub state_count: String,
  /// Scalar field holding the transition counter.
  pub transition_count: String,
  /// Indexed field returning `(label, ..)` per state.
  pub states: String,
  /// Indexed field returning `(label, source, target, flag)` per transition.
  pub transitions: String,
}

impl Default for FieldNames {
  fn default() -> Self {
    Self {
      state_count: "stateIndex".to_string(),
      transition_count: "transitionIndex".to_string(),
      states: "states".to_string(),
      transitions: "transitions".to_string(),
    }
  }
}
