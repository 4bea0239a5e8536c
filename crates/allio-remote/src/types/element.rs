/*!
Element snapshot: one remote UI element as last reported by the remote side.

Snapshots are plain values. The cache keeps its own unsealed copy of each
element; everything handed to callers is a separate, sealed copy, so a caller
can never mutate (or drop) what the cache holds.

Once [`ElementSnapshot::seal`] has been called every setter fails with
[`AllioError::Sealed`].
*/

use super::{AllioError, AllioResult, Bounds, ConnectionId, NodeId, WindowId};
use crate::a11y::{Action, CollectionInfo, CollectionItemInfo, ElementFlags, RangeInfo};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One touch-delegate region: touches inside `region` are routed to `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TouchDelegateTarget {
  pub region: Bounds,
  pub target: NodeId,
}

/// Snapshot of one remote UI element.
///
/// Elements are flat: children are ids, not nested snapshots.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ElementSnapshot {
  // === Identity & hierarchy ===
  id: NodeId,
  window_id: WindowId,
  connection_id: ConnectionId,
  /// `NodeId::UNDEFINED` for window roots.
  parent_id: NodeId,
  children: Vec<NodeId>,

  // === Geometry ===
  bounds: Bounds,

  // === States ===
  #[ts(type = "string")]
  flags: ElementFlags,

  // === Text ===
  text: Option<String>,
  content_description: Option<String>,
  hint: Option<String>,
  error: Option<String>,
  tooltip: Option<String>,

  // === Actions ===
  actions: Vec<Action>,

  // === Metadata ===
  range_info: Option<RangeInfo>,
  collection_info: Option<CollectionInfo>,
  collection_item_info: Option<CollectionItemInfo>,
  touch_delegate: Vec<TouchDelegateTarget>,

  // === Provenance ===
  package_name: Option<String>,
  class_name: Option<String>,
  /// Resource name of the view, used by `find_by_view_tag`.
  view_id_resource_name: Option<String>,

  #[serde(skip)]
  #[ts(skip)]
  sealed: bool,
}

impl PartialEq for ElementSnapshot {
  /// Compare element data. The seal state is not part of an element's data.
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
      && self.window_id == other.window_id
      && self.connection_id == other.connection_id
      && self.parent_id == other.parent_id
      && self.children == other.children
      && self.bounds == other.bounds
      && self.flags == other.flags
      && self.text == other.text
      && self.content_description == other.content_description
      && self.hint == other.hint
      && self.error == other.error
      && self.tooltip == other.tooltip
      && self.actions == other.actions
      && self.range_info == other.range_info
      && self.collection_info == other.collection_info
      && self.collection_item_info == other.collection_item_info
      && self.touch_delegate == other.touch_delegate
      && self.package_name == other.package_name
      && self.class_name == other.class_name
      && self.view_id_resource_name == other.view_id_resource_name
  }
}

impl ElementSnapshot {
  /// Create an empty, unsealed snapshot for `id` in `window_id`.
  pub fn new(window_id: WindowId, id: NodeId) -> Self {
    Self {
      id,
      window_id,
      parent_id: NodeId::UNDEFINED,
      ..Self::default()
    }
  }

  fn ensure_not_sealed(&self) -> AllioResult<()> {
    if self.sealed {
      return Err(AllioError::Sealed { what: "element" });
    }
    Ok(())
  }

  /// Make this snapshot immutable. One-way.
  pub fn seal(&mut self) {
    self.sealed = true;
  }

  pub const fn is_sealed(&self) -> bool {
    self.sealed
  }

  /// Owned, mutable copy of this snapshot's data.
  #[must_use]
  pub fn unsealed_copy(&self) -> Self {
    let mut copy = self.clone();
    copy.sealed = false;
    copy
  }

  /// Sealed copy of this snapshot's data.
  #[must_use]
  pub fn sealed_copy(&self) -> Self {
    let mut copy = self.clone();
    copy.sealed = true;
    copy
  }

  /// Overwrite all data with `fresh`, a newer snapshot of the same element.
  pub fn refresh_from(&mut self, fresh: &ElementSnapshot) -> AllioResult<()> {
    self.ensure_not_sealed()?;
    *self = fresh.unsealed_copy();
    Ok(())
  }

  // === Getters ===

  pub const fn id(&self) -> NodeId {
    self.id
  }

  pub const fn window_id(&self) -> WindowId {
    self.window_id
  }

  pub const fn connection_id(&self) -> ConnectionId {
    self.connection_id
  }

  pub const fn parent_id(&self) -> NodeId {
    self.parent_id
  }

  pub fn children(&self) -> &[NodeId] {
    &self.children
  }

  pub const fn bounds(&self) -> Bounds {
    self.bounds
  }

  pub const fn flags(&self) -> ElementFlags {
    self.flags
  }

  pub const fn has_flag(&self, flag: ElementFlags) -> bool {
    self.flags.contains(flag)
  }

  pub const fn is_focused(&self) -> bool {
    self.has_flag(ElementFlags::FOCUSED)
  }

  pub const fn is_accessibility_focused(&self) -> bool {
    self.has_flag(ElementFlags::ACCESSIBILITY_FOCUSED)
  }

  pub fn text(&self) -> Option<&str> {
    self.text.as_deref()
  }

  pub fn content_description(&self) -> Option<&str> {
    self.content_description.as_deref()
  }

  pub fn hint(&self) -> Option<&str> {
    self.hint.as_deref()
  }

  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  pub fn tooltip(&self) -> Option<&str> {
    self.tooltip.as_deref()
  }

  pub fn actions(&self) -> &[Action] {
    &self.actions
  }

  pub const fn range_info(&self) -> Option<&RangeInfo> {
    self.range_info.as_ref()
  }

  pub const fn collection_info(&self) -> Option<&CollectionInfo> {
    self.collection_info.as_ref()
  }

  pub const fn collection_item_info(&self) -> Option<&CollectionItemInfo> {
    self.collection_item_info.as_ref()
  }

  pub fn touch_delegate(&self) -> &[TouchDelegateTarget] {
    &self.touch_delegate
  }

  pub fn package_name(&self) -> Option<&str> {
    self.package_name.as_deref()
  }

  pub fn class_name(&self) -> Option<&str> {
    self.class_name.as_deref()
  }

  pub fn view_id_resource_name(&self) -> Option<&str> {
    self.view_id_resource_name.as_deref()
  }

  // === Setters (fail once sealed) ===

  pub fn set_id(&mut self, id: NodeId) -> AllioResult<()> {
    self.ensure_not_sealed()?;
    self.id = id;
    Ok(())
  }

  pub fn set_window_id(&mut self, window_id: WindowId) -> AllioResult<()> {
    self.ensure_not_sealed()?;
    self.window_id = window_id;
    Ok(())
  }

  pub fn set_connection_id(&mut self, connection_id: ConnectionId) -> AllioResult<()> {
    self.ensure_not_sealed()?;
    self.connection_id = connection_id;
    Ok(())
  }

  pub fn set_parent(&mut self, parent_id: NodeId) -> AllioResult<()> {
    self.ensure_not_sealed()?;
    self.parent_id = parent_id;
    Ok(())
  }

  pub fn set_children(&mut self, children: Vec<NodeId>) -> AllioResult<()> {
    self.ensure_not_sealed()?;
    self.children = children;
    Ok(())
  }

  /// Append a child id. Adding an id that is already a child is a no-op.
  pub fn add_child(&mut self, child: NodeId) -> AllioResult<()> {
    self.ensure_not_sealed()?;
    if !self.children.contains(&child) {
      self.children.push(child);
    }
    Ok(())
  }

  /// Remove a child id. Returns whether it was present.
  pub fn remove_child(&mut self, child: NodeId) -> AllioResult<bool> {
    self.ensure_not_sealed()?;
    let before = self.children.len();
    self.children.retain(|&c| c != child);
    Ok(self.children.len() != before)
  }

  pub fn set_bounds(&mut self, bounds: Bounds) -> AllioResult<()> {
    self.ensure_not_sealed()?;
    self.bounds = bounds;
    Ok(())
  }

  pub fn set_flags(&mut self, flags: ElementFlags) -> AllioResult<()> {
    self.ensure_not_sealed()?;
    self.flags = flags;
    Ok(())
  }

  pub fn set_flag(&mut self, flag: ElementFlags, value: bool) -> AllioResult<()> {
    self.ensure_not_sealed()?;
    self.flags.set(flag, value);
    Ok(())
  }

  pub fn set_text(&mut self, text: Option<String>) -> AllioResult<()> {
    self.ensure_not_sealed()?;
    self.text = text;
    Ok(())
  }

  pub fn set_content_description(&mut self, description: Option<String>) -> AllioResult<()> {
    self.ensure_not_sealed()?;
    self.content_description = description;
    Ok(())
  }

  pub fn set_hint(&mut self, hint: Option<String>) -> AllioResult<()> {
    self.ensure_not_sealed()?;
    self.hint = hint;
    Ok(())
  }

  pub fn set_error(&mut self, error: Option<String>) -> AllioResult<()> {
    self.ensure_not_sealed()?;
    self.error = error;
    Ok(())
  }

  pub fn set_tooltip(&mut self, tooltip: Option<String>) -> AllioResult<()> {
    self.ensure_not_sealed()?;
    self.tooltip = tooltip;
    Ok(())
  }

  pub fn add_action(&mut self, action: Action) -> AllioResult<()> {
    self.ensure_not_sealed()?;
    if !self.actions.contains(&action) {
      self.actions.push(action);
    }
    Ok(())
  }

  pub fn remove_action(&mut self, action: Action) -> AllioResult<()> {
    self.ensure_not_sealed()?;
    self.actions.retain(|&a| a != action);
    Ok(())
  }

  pub fn set_range_info(&mut self, info: Option<RangeInfo>) -> AllioResult<()> {
    self.ensure_not_sealed()?;
    self.range_info = info;
    Ok(())
  }

  pub fn set_collection_info(&mut self, info: Option<CollectionInfo>) -> AllioResult<()> {
    self.ensure_not_sealed()?;
    self.collection_info = info;
    Ok(())
  }

  pub fn set_collection_item_info(&mut self, info: Option<CollectionItemInfo>) -> AllioResult<()> {
    self.ensure_not_sealed()?;
    self.collection_item_info = info;
    Ok(())
  }

  pub fn set_touch_delegate(&mut self, targets: Vec<TouchDelegateTarget>) -> AllioResult<()> {
    self.ensure_not_sealed()?;
    self.touch_delegate = targets;
    Ok(())
  }

  pub fn set_package_name(&mut self, package_name: Option<String>) -> AllioResult<()> {
    self.ensure_not_sealed()?;
    self.package_name = package_name;
    Ok(())
  }

  pub fn set_class_name(&mut self, class_name: Option<String>) -> AllioResult<()> {
    self.ensure_not_sealed()?;
    self.class_name = class_name;
    Ok(())
  }

  pub fn set_view_id_resource_name(&mut self, name: Option<String>) -> AllioResult<()> {
    self.ensure_not_sealed()?;
    self.view_id_resource_name = name;
    Ok(())
  }
}
