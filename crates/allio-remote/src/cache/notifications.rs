/*!
Change-notification policy.

Decides, per change kind, whether cached entries are refreshed, evicted, or the
whole cache dropped. Kinds not listed are ignored.
*/

use super::{CacheState, RefreshTarget, RemoteTreeCache, CHECK_INTEGRITY};
use crate::types::{ChangeKind, ChangeNotification, NodeId, WindowId};

impl CacheState {
  /// Apply `change` and return the elements that must be refreshed.
  fn apply_notification(&mut self, change: &ChangeNotification) -> Vec<RefreshTarget> {
    let window_id = change.window_id;
    let source = change.source_id;
    let target = |node_id: NodeId| RefreshTarget { window_id, node_id };
    let mut refreshes = Vec::new();

    match change.kind {
      ChangeKind::AccessibilityFocused => {
        let previous = self.accessibility_focus;
        if previous != NodeId::UNDEFINED {
          refreshes.push(target(previous));
        }
        self.accessibility_focus = source;
        refreshes.push(target(source));
      }

      ChangeKind::AccessibilityFocusCleared => {
        if self.accessibility_focus == source {
          refreshes.push(target(source));
          self.accessibility_focus = NodeId::UNDEFINED;
        }
      }

      ChangeKind::Focused => {
        let previous = self.input_focus;
        if previous != NodeId::UNDEFINED {
          refreshes.push(target(previous));
        }
        self.input_focus = source;
        refreshes.push(target(source));
      }

      ChangeKind::Selected
      | ChangeKind::TextChanged
      | ChangeKind::Clicked
      | ChangeKind::TextSelectionChanged
      | ChangeKind::ContentChanged { subtree: false } => {
        refreshes.push(target(source));
      }

      ChangeKind::ContentChanged { subtree: true } | ChangeKind::Scrolled => {
        self.clear_subtree(window_id, source);
      }

      ChangeKind::WindowsChanged | ChangeKind::WindowStateChanged => {
        self.clear();
      }

      ChangeKind::LongClicked
      | ChangeKind::HoverEnter
      | ChangeKind::HoverExit
      | ChangeKind::Announcement => {}
    }

    // Previous and new holder may be the same element.
    refreshes.dedup();
    refreshes
  }
}

impl RemoteTreeCache {
  /// Feed one remote change event into the cache.
  pub fn on_change_notification(&self, change: &ChangeNotification) {
    log::debug!(
      "Change {:?} for {} in window {}",
      change.kind,
      change.source_id,
      change.window_id
    );
    let refreshes = self.with_state(|s| s.apply_notification(change));
    self.run_refreshes(refreshes);

    if CHECK_INTEGRITY {
      self.check_integrity();
    }
  }

  /// Evict one element's subtree, as a `ContentChanged { subtree: true }` would.
  pub fn clear_subtree(&self, window_id: WindowId, node_id: NodeId) {
    self.with_state(|s| s.clear_subtree(window_id, node_id));
  }
}
