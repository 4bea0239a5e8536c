/*!
Post-processing applied to every reply before it reaches the caller.

Each element is rewritten against the package allow-list, stamped with its
connection id, sealed, and (unless the caller bypassed the cache) added to the
cache. Windows get the same treatment minus the package rewrite.
*/

use derive_more::Display;
use std::collections::{HashMap, HashSet, VecDeque};

use crate::cache::RemoteTreeCache;
use crate::types::{AllioResult, ConnectionId, ElementSnapshot, NodeId, WindowSnapshot};

/// Replace the package of an element the caller may not see with the first
/// allowed package. An empty or absent list allows everything.
fn apply_allow_list(element: &mut ElementSnapshot, allowed: Option<&[String]>) -> AllioResult<()> {
  let Some(first) = allowed.and_then(<[String]>::first) else {
    return Ok(());
  };
  let permitted = element
    .package_name()
    .is_some_and(|package| allowed.is_some_and(|list| list.iter().any(|p| p == package)));
  if !permitted {
    log::debug!(
      "Rewriting package {:?} of {} to {first}",
      element.package_name(),
      element.id()
    );
    element.set_package_name(Some(first.clone()))?;
  }
  Ok(())
}

pub(super) fn finalize_element(
  cache: &RemoteTreeCache,
  element: ElementSnapshot,
  connection_id: ConnectionId,
  bypass_cache: bool,
  allowed: Option<&[String]>,
) -> AllioResult<ElementSnapshot> {
  let mut element = if element.is_sealed() {
    element.unsealed_copy()
  } else {
    element
  };
  apply_allow_list(&mut element, allowed)?;
  element.set_connection_id(connection_id)?;
  element.seal();
  if !bypass_cache {
    cache.add(&element);
  }
  Ok(element)
}

/// Finalize each element, dropping (and logging) any that fail.
pub(super) fn finalize_elements(
  cache: &RemoteTreeCache,
  elements: Vec<ElementSnapshot>,
  connection_id: ConnectionId,
  bypass_cache: bool,
  allowed: Option<&[String]>,
) -> Vec<ElementSnapshot> {
  elements
    .into_iter()
    .filter_map(|element| {
      let id = element.id();
      finalize_element(cache, element, connection_id, bypass_cache, allowed)
        .inspect_err(|e| log::warn!("Dropping reply element {id}: {e}"))
        .ok()
    })
    .collect()
}

/// Stamp and seal a window. Caching is left to the caller, since full window
/// lists replace the cached set wholesale.
pub(super) fn finalize_window(
  window: WindowSnapshot,
  connection_id: ConnectionId,
) -> AllioResult<WindowSnapshot> {
  let mut window = if window.is_sealed() {
    window.unsealed_copy()
  } else {
    window
  };
  window.set_connection_id(connection_id)?;
  window.seal();
  Ok(window)
}

/// Structural problem in a prefetched element list.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub(crate) enum ReplyViolation {
  #[display("no root in reply")]
  NoRoot,
  #[display("more than one root in reply: {first} and {second}")]
  MultipleRoots { first: NodeId, second: NodeId },
  #[display("duplicate node {_0} in reply")]
  DuplicateNode(NodeId),
  #[display("node {_0} not connected to the reply root")]
  Disconnected(NodeId),
}

/// Check that a prefetched list forms one connected tree: exactly one element
/// whose parent is outside the list, no element reached twice, none left over.
pub(super) fn check_element_list(elements: &[ElementSnapshot]) -> Vec<ReplyViolation> {
  let mut violations = Vec::new();
  if elements.len() < 2 {
    return violations;
  }

  let by_id: HashMap<NodeId, &ElementSnapshot> = elements.iter().map(|e| (e.id(), e)).collect();

  let mut root: Option<NodeId> = None;
  for element in elements {
    if by_id.contains_key(&element.parent_id()) {
      continue;
    }
    match root {
      None => root = Some(element.id()),
      Some(first) => violations.push(ReplyViolation::MultipleRoots {
        first,
        second: element.id(),
      }),
    }
  }
  let Some(root) = root else {
    violations.push(ReplyViolation::NoRoot);
    return violations;
  };

  let mut seen = HashSet::from([root]);
  let mut fringe = VecDeque::from([root]);
  while let Some(id) = fringe.pop_front() {
    let Some(element) = by_id.get(&id) else {
      continue;
    };
    for &child in element.children() {
      if !by_id.contains_key(&child) {
        continue;
      }
      if seen.insert(child) {
        fringe.push_back(child);
      } else {
        violations.push(ReplyViolation::DuplicateNode(child));
      }
    }
  }

  for element in elements {
    if !seen.contains(&element.id()) {
      violations.push(ReplyViolation::Disconnected(element.id()));
    }
  }
  violations
}
