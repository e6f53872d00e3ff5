use serde::{Deserialize, Serialize};

/// How the fetched record count bounds the index loop.
///
/// Records are addressed from index 1. With `Exclusive` the loop stops before
/// `count`, so the record stored at index `count` is never read. `Inclusive`
/// reads it too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopBound {
  #[default]
  Exclusive,
  Inclusive,
}

impl LoopBound {
  /// Indexes to fetch for a given record count.
  pub fn indices(self, count: u64) -> impl Iterator<Item = u64> {
    let end = match self {
      LoopBound::Exclusive => count,
      LoopBound::Inclusive => count.saturating_add(1),
    };
    1..end.max(1)
  }
}

/// What to do with a transition whose endpoints are not known states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgePolicy {
  /// Keep the edge and leave resolution to the renderer.
  #[default]
  Permissive,
  /// Abort the projection.
  Strict,
}
