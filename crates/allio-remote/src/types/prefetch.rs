/*! Prefetch flags for element lookups. */

use super::{AllioError, AllioResult};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
  /// How much of the surrounding tree the remote side should return alongside
  /// the requested element. Only affects round-trip count, never cache semantics.
  #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
  pub struct PrefetchFlags: u8 {
    const PREDECESSORS = 1 << 0;
    /// Requires `PREDECESSORS`.
    const SIBLINGS = 1 << 1;
    const DESCENDANTS = 1 << 2;
  }
}

impl PrefetchFlags {
  /// Reject combinations the remote side cannot serve.
  pub fn validate(self) -> AllioResult<Self> {
    if self.contains(Self::SIBLINGS) && !self.contains(Self::PREDECESSORS) {
      return Err(AllioError::InvalidArgument(
        "sibling prefetch requires predecessor prefetch".into(),
      ));
    }
    Ok(self)
  }
}
