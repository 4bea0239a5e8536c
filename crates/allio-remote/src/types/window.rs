/*! Window snapshot: one remote top-level surface. Same seal rules as elements. */

use super::{AllioError, AllioResult, Bounds, ConnectionId, NodeId, WindowId};
use crate::a11y::{WindowFlags, WindowType};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Snapshot of one remote window.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WindowSnapshot {
  id: WindowId,
  connection_id: ConnectionId,
  parent_id: Option<WindowId>,
  children: Vec<WindowId>,
  /// Z-order: higher layers are drawn above lower ones.
  layer: i32,
  window_type: WindowType,
  bounds: Bounds,
  title: Option<String>,
  /// Element this window is anchored to (e.g. a popup's opener).
  anchor_id: NodeId,
  #[ts(type = "string")]
  flags: WindowFlags,

  #[serde(skip)]
  #[ts(skip)]
  sealed: bool,
}

impl PartialEq for WindowSnapshot {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
      && self.connection_id == other.connection_id
      && self.parent_id == other.parent_id
      && self.children == other.children
      && self.layer == other.layer
      && self.window_type == other.window_type
      && self.bounds == other.bounds
      && self.title == other.title
      && self.anchor_id == other.anchor_id
      && self.flags == other.flags
  }
}

impl WindowSnapshot {
  /// Create an empty, unsealed snapshot for window `id`.
  pub fn new(id: WindowId) -> Self {
    Self {
      id,
      anchor_id: NodeId::UNDEFINED,
      ..Self::default()
    }
  }

  fn ensure_not_sealed(&self) -> AllioResult<()> {
    if self.sealed {
      return Err(AllioError::Sealed { what: "window" });
    }
    Ok(())
  }

  pub fn seal(&mut self) {
    self.sealed = true;
  }

  pub const fn is_sealed(&self) -> bool {
    self.sealed
  }

  #[must_use]
  pub fn unsealed_copy(&self) -> Self {
    let mut copy = self.clone();
    copy.sealed = false;
    copy
  }

  #[must_use]
  pub fn sealed_copy(&self) -> Self {
    let mut copy = self.clone();
    copy.sealed = true;
    copy
  }

  pub const fn id(&self) -> WindowId {
    self.id
  }

  pub const fn connection_id(&self) -> ConnectionId {
    self.connection_id
  }

  pub const fn parent_id(&self) -> Option<WindowId> {
    self.parent_id
  }

  pub fn children(&self) -> &[WindowId] {
    &self.children
  }

  pub const fn layer(&self) -> i32 {
    self.layer
  }

  pub const fn window_type(&self) -> WindowType {
    self.window_type
  }

  pub const fn bounds(&self) -> Bounds {
    self.bounds
  }

  pub fn title(&self) -> Option<&str> {
    self.title.as_deref()
  }

  pub const fn anchor_id(&self) -> NodeId {
    self.anchor_id
  }

  pub const fn flags(&self) -> WindowFlags {
    self.flags
  }

  pub const fn is_active(&self) -> bool {
    self.flags.contains(WindowFlags::ACTIVE)
  }

  pub const fn is_focused(&self) -> bool {
    self.flags.contains(WindowFlags::FOCUSED)
  }

  pub fn set_id(&mut self, id: WindowId) -> AllioResult<()> {
    self.ensure_not_sealed()?;
    self.id = id;
    Ok(())
  }

  pub fn set_connection_id(&mut self, connection_id: ConnectionId) -> AllioResult<()> {
    self.ensure_not_sealed()?;
    self.connection_id = connection_id;
    Ok(())
  }

  pub fn set_parent(&mut self, parent_id: Option<WindowId>) -> AllioResult<()> {
    self.ensure_not_sealed()?;
    self.parent_id = parent_id;
    Ok(())
  }

  pub fn add_child(&mut self, child: WindowId) -> AllioResult<()> {
    self.ensure_not_sealed()?;
    if !self.children.contains(&child) {
      self.children.push(child);
    }
    Ok(())
  }

  pub fn set_children(&mut self, children: Vec<WindowId>) -> AllioResult<()> {
    self.ensure_not_sealed()?;
    self.children = children;
    Ok(())
  }

  pub fn set_layer(&mut self, layer: i32) -> AllioResult<()> {
    self.ensure_not_sealed()?;
    self.layer = layer;
    Ok(())
  }

  pub fn set_window_type(&mut self, window_type: WindowType) -> AllioResult<()> {
    self.ensure_not_sealed()?;
    self.window_type = window_type;
    Ok(())
  }

  pub fn set_bounds(&mut self, bounds: Bounds) -> AllioResult<()> {
    self.ensure_not_sealed()?;
    self.bounds = bounds;
    Ok(())
  }

  pub fn set_title(&mut self, title: Option<String>) -> AllioResult<()> {
    self.ensure_not_sealed()?;
    self.title = title;
    Ok(())
  }

  pub fn set_anchor(&mut self, anchor_id: NodeId) -> AllioResult<()> {
    self.ensure_not_sealed()?;
    self.anchor_id = anchor_id;
    Ok(())
  }

  pub fn set_flag(&mut self, flag: WindowFlags, value: bool) -> AllioResult<()> {
    self.ensure_not_sealed()?;
    self.flags.set(flag, value);
    Ok(())
  }
}
