/*!
Consistency alarm for the cache.

Walks every cached window and element looking for states the remote side
should never produce. Findings are logged; nothing is repaired or rejected.
*/

use super::{CacheState, RemoteTreeCache};
use crate::types::{NodeId, WindowId};
use derive_more::Display;

/// One inconsistency found by [`RemoteTreeCache::check_integrity`].
///
/// Fields name the window and elements involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[allow(missing_docs)]
pub enum IntegrityViolation {
  #[display("Duplicate active window: {first} and {second}")]
  DuplicateActiveWindow { first: WindowId, second: WindowId },

  #[display("Duplicate focused window: {first} and {second}")]
  DuplicateFocusedWindow { first: WindowId, second: WindowId },

  #[display("Element {node} filed under {key} in window {window}")]
  DuplicateNode {
    window: WindowId,
    key: NodeId,
    node: NodeId,
  },

  #[display("Duplicate accessibility focus in window {window}: {first} and {second}")]
  DuplicateAccessibilityFocus {
    window: WindowId,
    first: NodeId,
    second: NodeId,
  },

  #[display("Duplicate input focus in window {window}: {first} and {second}")]
  DuplicateInputFocus {
    window: WindowId,
    first: NodeId,
    second: NodeId,
  },

  #[display("Parent {parent} does not list child {child} in window {window}")]
  ParentMissingChild {
    window: WindowId,
    parent: NodeId,
    child: NodeId,
  },

  #[display("Child {child} of {parent} names another parent in window {window}")]
  ChildNamesOtherParent {
    window: WindowId,
    parent: NodeId,
    child: NodeId,
  },
}

impl CacheState {
  fn integrity_violations(&self) -> Vec<IntegrityViolation> {
    let mut violations = Vec::new();

    let mut active: Option<WindowId> = None;
    let mut focused: Option<WindowId> = None;
    for window in self.windows.values() {
      if window.is_active() {
        match active {
          Some(first) => violations.push(IntegrityViolation::DuplicateActiveWindow {
            first,
            second: window.id(),
          }),
          None => active = Some(window.id()),
        }
      }
      if window.is_focused() {
        match focused {
          Some(first) => violations.push(IntegrityViolation::DuplicateFocusedWindow {
            first,
            second: window.id(),
          }),
          None => focused = Some(window.id()),
        }
      }
    }

    for (&window, nodes) in &self.nodes {
      let mut accessibility_focus: Option<NodeId> = None;
      let mut input_focus: Option<NodeId> = None;

      for (key, node) in nodes.iter() {
        if key != node.id() {
          violations.push(IntegrityViolation::DuplicateNode {
            window,
            key,
            node: node.id(),
          });
          continue;
        }

        if node.is_accessibility_focused() {
          match accessibility_focus {
            Some(first) => violations.push(IntegrityViolation::DuplicateAccessibilityFocus {
              window,
              first,
              second: key,
            }),
            None => accessibility_focus = Some(key),
          }
        }
        if node.is_focused() {
          match input_focus {
            Some(first) => violations.push(IntegrityViolation::DuplicateInputFocus {
              window,
              first,
              second: key,
            }),
            None => input_focus = Some(key),
          }
        }

        if let Some(parent) = nodes.get(node.parent_id()) {
          if !parent.children().contains(&key) {
            violations.push(IntegrityViolation::ParentMissingChild {
              window,
              parent: parent.id(),
              child: key,
            });
          }
        }

        for &child_id in node.children() {
          if let Some(child) = nodes.get(child_id) {
            if child.parent_id() != key {
              violations.push(IntegrityViolation::ChildNamesOtherParent {
                window,
                parent: key,
                child: child_id,
              });
            }
          }
        }
      }
    }

    violations
  }
}

impl RemoteTreeCache {
  /// Check cached state for inconsistencies, logging each one found.
  ///
  /// Diagnostic only: runs after every change notification in debug builds or
  /// with the `integrity-checks` feature, and never alters the cache.
  pub fn check_integrity(&self) -> Vec<IntegrityViolation> {
    let violations = self.with_state(|s| s.integrity_violations());
    for violation in &violations {
      log::error!("Cache integrity: {violation}");
    }
    violations
  }
}
