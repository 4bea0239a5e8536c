/*! Error types for allio-remote operations. */

use super::{ConnectionId, InteractionId};

/// Errors that can occur while mirroring or querying a remote tree.
///
/// Remote misbehaviour never surfaces as a panic. Most of these are collapsed
/// to "no result" at the [`QueryClient`](crate::QueryClient) boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllioError {
  #[error("Cannot modify sealed {what}")]
  Sealed { what: &'static str },

  #[error("Invalid argument: {0}")]
  InvalidArgument(String),

  #[error("Connection not found: {0}")]
  ConnectionNotFound(ConnectionId),

  #[error("No reply for interaction {interaction_id} within {waited_ms}ms")]
  Timeout {
    interaction_id: InteractionId,
    waited_ms: u64,
  },

  #[error("Interaction {awaited} was overtaken by {recorded}")]
  Superseded {
    awaited: InteractionId,
    recorded: InteractionId,
  },

  #[error("Interaction ids exhausted")]
  InteractionIdsExhausted,

  #[error("Remote call failed: {0}")]
  Transport(String),
}

/// Result type for allio-remote operations.
pub type AllioResult<T> = Result<T, AllioError>;

/// Failure reported by a [`RemoteConnection`](crate::RemoteConnection) while
/// issuing a call to the remote side.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct RemoteError(pub String);

impl RemoteError {
  pub fn new(reason: impl Into<String>) -> Self {
    Self(reason.into())
  }
}

impl From<RemoteError> for AllioError {
  fn from(e: RemoteError) -> Self {
    Self::Transport(e.0)
  }
}
