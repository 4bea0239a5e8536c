/*! Branded ID types for windows, elements, connections and requests. */

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Window identifier, as assigned by the remote side.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  TS,
  Display,
  From,
  Into,
)]
#[ts(export)]
pub struct WindowId(pub i32);

impl WindowId {
  /// No window.
  pub const UNDEFINED: Self = Self(-1);
  /// Whichever window is active when the remote side handles the request.
  pub const ACTIVE: Self = Self(i32::MAX);
}

impl Default for WindowId {
  fn default() -> Self {
    Self::UNDEFINED
  }
}

/// Element identifier within a window.
///
/// Packs two ids: the low 32 bits identify the real UI component (the *owner*),
/// the high 32 bits identify a virtual descendant reported by that component.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, From, Into)]
#[ts(export)]
pub struct NodeId(pub u64);

impl NodeId {
  /// Owner id that means "not set".
  pub const UNDEFINED_ITEM: i32 = i32::MAX;
  /// Owner id of the root of a window.
  pub const ROOT_ITEM: i32 = i32::MAX - 1;
  /// Virtual descendant id that refers to the owner component itself.
  pub const HOST_VIEW: i32 = -1;

  /// No element.
  pub const UNDEFINED: Self = Self::new(Self::UNDEFINED_ITEM, Self::UNDEFINED_ITEM);
  /// The root element of a window.
  pub const ROOT: Self = Self::new(Self::ROOT_ITEM, Self::HOST_VIEW);

  /// Pack an owner id and a virtual descendant id.
  #[allow(clippy::cast_sign_loss)]
  pub const fn new(owner_id: i32, virtual_descendant_id: i32) -> Self {
    Self(((virtual_descendant_id as u32 as u64) << 32) | (owner_id as u32 as u64))
  }

  /// Id for a real component with no virtual descendant.
  pub const fn for_owner(owner_id: i32) -> Self {
    Self::new(owner_id, Self::HOST_VIEW)
  }

  /// The real UI component this id belongs to.
  #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
  pub const fn owner_id(self) -> i32 {
    self.0 as u32 as i32
  }

  /// The virtual descendant within the owner, or [`NodeId::HOST_VIEW`].
  #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
  pub const fn virtual_descendant_id(self) -> i32 {
    (self.0 >> 32) as u32 as i32
  }

  pub const fn is_undefined(self) -> bool {
    self.0 == Self::UNDEFINED.0
  }
}

impl std::fmt::Display for NodeId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}:{}", self.owner_id(), self.virtual_descendant_id())
  }
}

impl std::fmt::Debug for NodeId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "NodeId({self})")
  }
}

impl Default for NodeId {
  fn default() -> Self {
    Self::UNDEFINED
  }
}

/// Identifies one registered remote connection.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, Display, From, Into,
)]
#[ts(export)]
pub struct ConnectionId(pub i32);

impl ConnectionId {
  /// Not attached to any connection.
  pub const NONE: Self = Self(-1);
}

impl Default for ConnectionId {
  fn default() -> Self {
    Self::NONE
  }
}

/// Tag correlating a request with its asynchronous reply.
///
/// Issued per client in strictly increasing order.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  TS,
  Display,
  From,
  Into,
)]
#[ts(export)]
pub struct InteractionId(pub u32);
