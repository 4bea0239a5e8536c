/*!
One window's element map.

Parent/child relationships live in the snapshots themselves (each element
records its parent id and ordered child ids), so this map is keyed by id only.
The remote side is not trusted to send a tree: links may dangle, disagree, or
form cycles. Eviction is therefore iterative and never revisits a node.
*/

use crate::types::{ElementSnapshot, NodeId};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
pub(crate) struct WindowNodes {
  nodes: HashMap<NodeId, ElementSnapshot>,
}

impl WindowNodes {
  pub(super) fn get(&self, id: NodeId) -> Option<&ElementSnapshot> {
    self.nodes.get(&id)
  }

  pub(super) fn contains(&self, id: NodeId) -> bool {
    self.nodes.contains_key(&id)
  }

  /// Store `node`, replacing any entry with the same id.
  pub(super) fn insert(&mut self, node: ElementSnapshot) {
    self.nodes.insert(node.id(), node);
  }

  pub(super) fn len(&self) -> usize {
    self.nodes.len()
  }

  pub(super) fn iter(&self) -> impl Iterator<Item = (NodeId, &ElementSnapshot)> {
    self.nodes.iter().map(|(id, node)| (*id, node))
  }

  /// Remove an element and everything reachable through its child links.
  /// Returns removed ids, parents before children.
  /// Iterative to bound stack depth on deep or cyclic input.
  pub(super) fn remove_subtree(&mut self, root: NodeId) -> Vec<NodeId> {
    let mut removed = Vec::new();
    let mut stack = vec![root];

    while let Some(id) = stack.pop() {
      // Already-removed ids yield nothing, so cycles terminate.
      let Some(node) = self.nodes.remove(&id) else {
        continue;
      };
      stack.extend(node.children().iter().rev().copied());
      removed.push(id);
    }

    removed
  }

  /// Whether `target` is reachable from any of `from` through child links.
  pub(super) fn reaches(&self, from: &[NodeId], target: NodeId) -> bool {
    let mut seen = HashSet::new();
    let mut stack = from.to_vec();

    while let Some(id) = stack.pop() {
      if id == target {
        return true;
      }
      if !seen.insert(id) {
        continue;
      }
      if let Some(node) = self.nodes.get(&id) {
        stack.extend(node.children().iter().copied());
      }
    }

    false
  }

  #[cfg(test)]
  pub(super) fn insert_raw(&mut self, key: NodeId, node: ElementSnapshot) {
    self.nodes.insert(key, node);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::testing::{element, nid};

  fn tree_of(elements: Vec<ElementSnapshot>) -> WindowNodes {
    let mut nodes = WindowNodes::default();
    for e in elements {
      nodes.insert(e);
    }
    nodes
  }

  #[test]
  fn remove_subtree_takes_descendants_only() {
    // 1 -> [2, 3], 2 -> [4, 5]
    let mut nodes = tree_of(vec![
      element(1, None, &[2, 3]),
      element(2, Some(1), &[4, 5]),
      element(3, Some(1), &[]),
      element(4, Some(2), &[]),
      element(5, Some(2), &[]),
    ]);

    let removed = nodes.remove_subtree(nid(2));

    assert_eq!(removed, vec![nid(2), nid(4), nid(5)]);
    assert!(nodes.contains(nid(1)));
    assert!(nodes.contains(nid(3)));
    assert_eq!(nodes.len(), 2);
  }

  #[test]
  fn remove_subtree_terminates_on_cycles() {
    // 1 -> 2 -> 3 -> 1
    let mut nodes = tree_of(vec![
      element(1, Some(3), &[2]),
      element(2, Some(1), &[3]),
      element(3, Some(2), &[1]),
    ]);

    let removed = nodes.remove_subtree(nid(2));

    assert_eq!(removed.len(), 3);
    assert_eq!(nodes.len(), 0);
  }

  #[test]
  fn remove_missing_is_noop() {
    let mut nodes = tree_of(vec![element(1, None, &[])]);
    assert!(nodes.remove_subtree(nid(9)).is_empty());
    assert_eq!(nodes.len(), 1);
  }

  #[test]
  fn reaches_follows_child_links() {
    let nodes = tree_of(vec![element(1, None, &[2]), element(2, Some(1), &[3])]);
    assert!(nodes.reaches(&[nid(1)], nid(3)));
    assert!(nodes.reaches(&[nid(3)], nid(3)), "a node reaches itself");
    assert!(!nodes.reaches(&[nid(2)], nid(1)));
    assert!(!nodes.reaches(&[nid(9)], nid(1)));
  }

  #[test]
  fn dangling_children_are_skipped() {
    let mut nodes = tree_of(vec![element(1, None, &[2, 7]), element(2, Some(1), &[])]);
    assert_eq!(nodes.remove_subtree(nid(1)), vec![nid(1), nid(2)]);
  }
}
