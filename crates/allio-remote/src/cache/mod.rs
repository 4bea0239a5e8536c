/*!
Remote Tree Cache - the partial mirror of the remote window/element tree.

Holds sealed-copy-on-read snapshots of windows and, per window, of elements.
All state sits behind one lock, and every public method holds it for its full
duration, eviction cascades included.

The cache never talks to the remote side itself. Refreshing a stale entry is
delegated to a [`NodeRefresher`], and that call is made with the lock released:
work is planned under the lock, refreshes run unlocked, and their outcomes are
applied under the lock again.

## Module Structure

- `mod.rs` - `RemoteTreeCache`, `CacheState`, focus trackers, refresh plumbing
- `nodes.rs` - element insert/merge, lookup, subtree eviction
- `windows.rs` - window lookup, full and partial window updates
- `notifications.rs` - change-notification policy
- `integrity.rs` - consistency alarm (diagnostic only)
- `tree.rs` - `WindowNodes`, one window's element map
*/

mod integrity;
mod nodes;
mod notifications;
mod tree;
mod windows;

pub use integrity::IntegrityViolation;

use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};

use crate::types::{ElementSnapshot, NodeId, WindowId, WindowSnapshot};
use tree::WindowNodes;

/// Whether integrity alarms run after notifications and on multi-element replies.
pub(crate) const CHECK_INTEGRITY: bool = cfg!(any(debug_assertions, feature = "integrity-checks"));

/// Re-fetches the live state of one cached element.
pub trait NodeRefresher: Send + Sync {
  /// Overwrite `node` with its current remote state.
  ///
  /// Returns `false` if the element no longer exists remotely (or could not be
  /// reached), in which case the cache evicts its subtree.
  fn refresh_node(&self, node: &mut ElementSnapshot, bypass_cache: bool) -> bool;
}

/// A cached element that needs its state re-fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RefreshTarget {
  pub(crate) window_id: WindowId,
  pub(crate) node_id: NodeId,
}

/// Lock-protected cache contents.
#[derive(Default)]
pub(crate) struct CacheState {
  windows: BTreeMap<WindowId, WindowSnapshot>,
  nodes: HashMap<WindowId, WindowNodes>,
  all_windows_cached: bool,
  // Tracked across all windows, not per window. Default is `NodeId::UNDEFINED`.
  accessibility_focus: NodeId,
  input_focus: NodeId,
}

impl CacheState {
  /// Drop windows, all node maps, and both focus trackers.
  pub(super) fn clear(&mut self) {
    self.clear_windows();
    self.nodes.clear();
    self.accessibility_focus = NodeId::UNDEFINED;
    self.input_focus = NodeId::UNDEFINED;
  }
}

/// Process-wide cache of remote windows and elements.
pub struct RemoteTreeCache {
  state: Mutex<CacheState>,
  refresher: Box<dyn NodeRefresher>,
}

impl std::fmt::Debug for RemoteTreeCache {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let state = self.state.lock();
    f.debug_struct("RemoteTreeCache")
      .field("windows", &state.windows.len())
      .field("node_windows", &state.nodes.len())
      .field("all_windows_cached", &state.all_windows_cached)
      .finish_non_exhaustive()
  }
}

impl RemoteTreeCache {
  /// Create an empty cache that refreshes stale entries through `refresher`.
  pub fn new(refresher: Box<dyn NodeRefresher>) -> Self {
    Self {
      state: Mutex::new(CacheState::default()),
      refresher,
    }
  }

  /// Run `f` with the cache locked. Never call out to the remote side inside.
  #[inline]
  pub(crate) fn with_state<R>(&self, f: impl FnOnce(&mut CacheState) -> R) -> R {
    f(&mut self.state.lock())
  }

  /// Drop everything: windows, elements, focus trackers.
  pub fn clear(&self) {
    log::debug!("Clearing remote tree cache");
    self.with_state(CacheState::clear);
  }

  /// Refresh each target with the lock released, then apply the outcome.
  ///
  /// Refreshed state is written back through the normal insert/merge path;
  /// refreshes that insert would schedule in turn are dropped. A failed refresh
  /// evicts the target's subtree. Targets evicted in the meantime are skipped.
  pub(crate) fn run_refreshes(&self, targets: Vec<RefreshTarget>) {
    for target in targets {
      let Some(mut copy) = self.with_state(|s| s.node(target.window_id, target.node_id).cloned())
      else {
        continue;
      };

      let refreshed = self.refresher.refresh_node(&mut copy, true)
        && copy.id() == target.node_id
        && copy.window_id() == target.window_id;

      self.with_state(|s| {
        if !s.contains_node(target.window_id, target.node_id) {
          return;
        }
        if refreshed {
          s.insert(&copy, &mut Vec::new());
        } else {
          log::debug!(
            "Refresh of {} in window {} failed, evicting subtree",
            target.node_id,
            target.window_id
          );
          s.clear_subtree(target.window_id, target.node_id);
        }
      });
    }
  }
}
