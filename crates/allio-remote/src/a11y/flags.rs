//! Boolean state carried by element and window snapshots.

#![allow(missing_docs)]

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

bitflags! {
  /// Boolean element state, as a set.
  #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
  pub struct ElementFlags: u32 {
    const FOCUSABLE = 1 << 0;
    const FOCUSED = 1 << 1;
    const SELECTED = 1 << 2;
    const CHECKABLE = 1 << 3;
    const CHECKED = 1 << 4;
    const SCROLLABLE = 1 << 5;
    const CLICKABLE = 1 << 6;
    const LONG_CLICKABLE = 1 << 7;
    const ENABLED = 1 << 8;
    const VISIBLE = 1 << 9;
    const PASSWORD = 1 << 10;
    const EDITABLE = 1 << 11;
    const ACCESSIBILITY_FOCUSED = 1 << 12;
    const MULTI_LINE = 1 << 13;
    /// Reported as important for accessibility by the remote side.
    const IMPORTANT = 1 << 14;
  }
}

bitflags! {
  /// Boolean window state, as a set.
  #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
  pub struct WindowFlags: u8 {
    const ACTIVE = 1 << 0;
    const FOCUSED = 1 << 1;
    const ACCESSIBILITY_FOCUSED = 1 << 2;
    const PICTURE_IN_PICTURE = 1 << 3;
  }
}

/// What kind of surface a window is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum WindowType {
  #[default]
  Application,
  InputMethod,
  System,
  AccessibilityOverlay,
  SplitScreenDivider,
}
