/*! Window operations for the cache. */

use super::{CacheState, RemoteTreeCache};
use crate::types::{WindowId, WindowSnapshot};
use std::collections::BTreeMap;

impl CacheState {
  pub(super) fn clear_windows(&mut self) {
    self.windows.clear();
    self.all_windows_cached = false;
  }

  fn put_window(&mut self, window: &WindowSnapshot) {
    self.windows.insert(window.id(), window.unsealed_copy());
  }
}

impl RemoteTreeCache {
  /// Sealed copy of a cached window, or `None` on a miss.
  pub fn get_window(&self, window_id: WindowId) -> Option<WindowSnapshot> {
    self.with_state(|s| s.windows.get(&window_id).map(WindowSnapshot::sealed_copy))
  }

  /// All windows, highest layer first, or `None` unless the full list has been
  /// cached via [`set_windows`](Self::set_windows).
  ///
  /// Windows are ordered by layer alone. When two windows share a layer only
  /// the one with the higher id is returned.
  pub fn get_windows(&self) -> Option<Vec<WindowSnapshot>> {
    self.with_state(|s| {
      if !s.all_windows_cached {
        return None;
      }

      let mut by_layer: BTreeMap<i32, &WindowSnapshot> = BTreeMap::new();
      for window in s.windows.values() {
        if let Some(shadowed) = by_layer.insert(window.layer(), window) {
          log::debug!(
            "Windows {} and {} share layer {}, dropping {}",
            shadowed.id(),
            window.id(),
            window.layer(),
            shadowed.id()
          );
        }
      }

      Some(
        by_layer
          .values()
          .rev()
          .map(|w| w.sealed_copy())
          .collect(),
      )
    })
  }

  /// Replace the whole window list and mark it complete.
  pub fn set_windows(&self, windows: &[WindowSnapshot]) {
    self.with_state(|s| {
      s.clear_windows();
      for window in windows {
        s.put_window(window);
      }
      s.all_windows_cached = true;
    });
  }

  /// Insert or replace one window. A single window arriving outside a full
  /// fetch may be one the list has never seen, so the list is no longer
  /// treated as complete.
  pub fn add_window(&self, window: &WindowSnapshot) {
    self.with_state(|s| {
      s.put_window(window);
      s.all_windows_cached = false;
    });
  }
}
