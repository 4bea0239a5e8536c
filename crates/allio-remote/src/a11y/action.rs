//! Accessibility actions.
//!
//! Actions are operations a caller can ask the remote side to perform on an
//! element. Arguments (e.g. the text for [`Action::SetText`]) travel separately
//! as a JSON object.

#![allow(missing_docs)]

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Action that can be performed on a remote element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Action {
  /// Give input focus.
  Focus,
  ClearFocus,
  Select,
  ClearSelection,
  /// Primary activation (click, press).
  Click,
  LongClick,
  /// Move the accessibility cursor onto the element.
  AccessibilityFocus,
  ClearAccessibilityFocus,
  ScrollForward,
  ScrollBackward,
  Expand,
  Collapse,
  Dismiss,
  /// Replace the element's text. Expects a `text` argument.
  SetText,
  /// Select a range of text. Expects `start` and `end` arguments.
  SetSelection,
  Copy,
  Paste,
  Cut,
  ShowOnScreen,
}
