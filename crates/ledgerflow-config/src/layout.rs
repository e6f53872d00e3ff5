use serde::{Deserialize, Serialize};

/// Deterministic placement of projected nodes.
///
/// Nodes are stacked in a single column: node `n` (0-based fetch order) lands
/// at `(x, y_start + n * y_step)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
  pub x: f64,
  pub y_start: f64,
  pub y_step: f64,
}

impl Default for LayoutConfig {
  fn default() -> Self {
    Self {
      x: 250.0,
      y_start: 150.0,
      y_step: 100.0,
    }
  }
}

impl LayoutConfig {
  /// Position of the node at the given 0-based slot.
  pub fn slot(&self, slot: usize) -> (f64, f64) {
    (self.x, self.y_start + slot as f64 * self.y_step)
  }
}
