/*! Change notifications pushed by the remote side. */

use super::{NodeId, WindowId};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// What changed on the remote side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum ChangeKind {
  AccessibilityFocused,
  AccessibilityFocusCleared,
  /// Input focus moved to the source element.
  Focused,
  Selected,
  TextChanged,
  Clicked,
  TextSelectionChanged,
  /// Content of the source element changed. `subtree` means its descendants
  /// may have been added, removed or rearranged.
  ContentChanged { subtree: bool },
  Scrolled,
  WindowsChanged,
  WindowStateChanged,

  // Kinds the cache does not act on.
  LongClicked,
  HoverEnter,
  HoverExit,
  Announcement,
}

/// One change event from the remote side, identifying its source element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChangeNotification {
  pub kind: ChangeKind,
  pub window_id: WindowId,
  pub source_id: NodeId,
}

impl ChangeNotification {
  pub const fn new(kind: ChangeKind, window_id: WindowId, source_id: NodeId) -> Self {
    Self {
      kind,
      window_id,
      source_id,
    }
  }

  /// A window-structure change with no source element.
  pub const fn windows_changed() -> Self {
    Self::new(ChangeKind::WindowsChanged, WindowId::UNDEFINED, NodeId::UNDEFINED)
  }
}
