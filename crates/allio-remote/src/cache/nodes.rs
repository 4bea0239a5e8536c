/*!
Element operations for the cache.

`add` is the merge step: it reconciles an incoming snapshot with the cached
copy of the same element, evicting whatever the remote side has deleted or
moved before storing a private copy.
*/

use super::{CacheState, RefreshTarget, RemoteTreeCache};
use crate::types::{ElementSnapshot, NodeId, WindowId};

impl CacheState {
  pub(super) fn node(&self, window_id: WindowId, node_id: NodeId) -> Option<&ElementSnapshot> {
    self.nodes.get(&window_id)?.get(node_id)
  }

  pub(super) fn contains_node(&self, window_id: WindowId, node_id: NodeId) -> bool {
    self.node(window_id, node_id).is_some()
  }

  /// Evict `root` and everything below it in `window_id`.
  pub(super) fn clear_subtree(&mut self, window_id: WindowId, root: NodeId) {
    if let Some(nodes) = self.nodes.get_mut(&window_id) {
      let removed = nodes.remove_subtree(root);
      if !removed.is_empty() {
        log::debug!(
          "Evicted {} element(s) under {root} in window {window_id}",
          removed.len()
        );
      }
    }
  }

  /// Insert or merge `element`. Focus holders displaced by it are appended to
  /// `refreshes`, to be refreshed once the lock is released.
  pub(super) fn insert(&mut self, element: &ElementSnapshot, refreshes: &mut Vec<RefreshTarget>) {
    let window_id = element.window_id();
    let id = element.id();
    let nodes = self.nodes.entry(window_id).or_default();

    if let Some(old) = nodes.get(id) {
      let old_parent = old.parent_id();
      let removed_children: Vec<NodeId> = old
        .children()
        .iter()
        .copied()
        .filter(|child| !element.children().contains(child))
        .collect();

      for child in removed_children {
        nodes.remove_subtree(child);
        if !nodes.contains(id) {
          // The element was its own descendant. The remote side sent a cycle;
          // nothing in this window can be trusted.
          log::warn!("Element {id} is its own ancestor in window {window_id}, clearing window");
          self.nodes.remove(&window_id);
          return;
        }
      }

      // A new parent may be a descendant of the old one. Dropping the old
      // parent's subtree keeps a single path to this element.
      if element.parent_id() != old_parent {
        nodes.remove_subtree(old_parent);
      }
    }

    // Reports that never overlapped a cached entry can still close a loop.
    if nodes.reaches(element.children(), id) {
      log::warn!("Element {id} would become its own ancestor in window {window_id}, clearing window");
      self.nodes.remove(&window_id);
      return;
    }

    nodes.insert(element.unsealed_copy());

    if element.is_accessibility_focused() {
      let previous = self.accessibility_focus;
      if previous != NodeId::UNDEFINED && previous != id {
        refreshes.push(RefreshTarget {
          window_id,
          node_id: previous,
        });
      }
      self.accessibility_focus = id;
    } else if self.accessibility_focus == id {
      self.accessibility_focus = NodeId::UNDEFINED;
    }

    if element.is_focused() {
      self.input_focus = id;
    } else if self.input_focus == id {
      self.input_focus = NodeId::UNDEFINED;
    }
  }
}

impl RemoteTreeCache {
  /// Sealed copy of a cached element, or `None` on a miss.
  pub fn get_node(&self, window_id: WindowId, node_id: NodeId) -> Option<ElementSnapshot> {
    self.with_state(|s| s.node(window_id, node_id).map(ElementSnapshot::sealed_copy))
  }

  /// Merge `element` into the cache. The cache stores its own copy.
  ///
  /// Children present in the cached copy but missing from `element` are evicted
  /// with their subtrees, as is the old parent's subtree if the parent changed.
  /// If `element` turns out to be its own ancestor the whole window is dropped.
  pub fn add(&self, element: &ElementSnapshot) {
    let refreshes = self.with_state(|s| {
      let mut refreshes = Vec::new();
      s.insert(element, &mut refreshes);
      refreshes
    });
    self.run_refreshes(refreshes);
  }

  /// Number of elements cached for `window_id`.
  pub fn node_count(&self, window_id: WindowId) -> usize {
    self.with_state(|s| s.nodes.get(&window_id).map_or(0, super::tree::WindowNodes::len))
  }

  /// Element currently tracked as holding accessibility focus.
  pub fn accessibility_focus(&self) -> Option<NodeId> {
    self.with_state(|s| Some(s.accessibility_focus).filter(|id| !id.is_undefined()))
  }

  /// Element currently tracked as holding input focus.
  pub fn input_focus(&self) -> Option<NodeId> {
    self.with_state(|s| Some(s.input_focus).filter(|id| !id.is_undefined()))
  }
}
