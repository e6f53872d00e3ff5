use serde::{Deserialize, Serialize};

use crate::enums::{EdgePolicy, LoopBound};
use crate::fields::FieldNames;
use crate::layout::LayoutConfig;

/// Settings for a single projection run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
  pub fields: FieldNames,
  pub loop_bound: LoopBound,
  pub edge_policy: EdgePolicy,
  pub layout: LayoutConfig,
}

impl ProjectionConfig {
  /// Parse a config document. Missing fields take their defaults.
  pub fn from_json_str(content: &str) -> Result<Self, serde_json::Error> {
    serde_json::from_str(content)
  }
}
