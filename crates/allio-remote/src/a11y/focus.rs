//! Focus lookup and focus search parameters.

#![allow(missing_docs)]

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Which focus a `find_focus` request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum FocusKind {
  /// Keyboard/input focus.
  Input,
  /// The accessibility cursor.
  Accessibility,
}

/// Direction for a `focus_search` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum FocusDirection {
  Up,
  Down,
  Left,
  Right,
  Forward,
  Backward,
}
