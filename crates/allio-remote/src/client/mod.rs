/*!
Synchronous Query Client - blocking queries over asynchronous remote calls.

Each thread that issues queries gets its own [`QueryClient`]. A query issues an
async call tagged with a fresh interaction id, then blocks until the matching
reply is recorded, a newer reply overtakes it, or the timeout elapses. Replies
arrive through the client's [`QueryCallback`] impl, from any thread.

Lookups by id try the cache first. Everything a reply carries is finalized
(package allow-list, connection id, seal) and cached unless the caller asked to
bypass the cache.

## Module Structure

- `mod.rs` - `QueryClient`, `ClientConfig`, query operations
- `connection.rs` - `RemoteConnection`, `QueryCallback`, `ConnectionRegistry`
- `pending.rs` - pending-result slot and the wait loop
- `finalize.rs` - reply post-processing and the list integrity check
- `registry.rs` - `ClientRegistry`, one client per thread
- `refresh.rs` - `ClientRefresher`, the cache's way back to the remote side
*/

mod connection;
mod finalize;
mod pending;
mod refresh;
mod registry;

#[cfg(test)]
pub(crate) mod testing;

pub use connection::{
  ActionArgs, ConnectionRegistry, PackageAllowList, QueryCallback, RemoteConnection,
  RemoteResult, RequestContext, SameThreadMessage,
};
pub use refresh::ClientRefresher;
pub use registry::ClientRegistry;

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread::{self, ThreadId};
use std::time::Duration;

use crate::a11y::{Action, FocusDirection, FocusKind};
use crate::cache::{RemoteTreeCache, CHECK_INTEGRITY};
use crate::types::{
  AllioError, AllioResult, ConnectionId, ElementSnapshot, InteractionId, NodeId, PrefetchFlags,
  WindowId, WindowSnapshot,
};
use pending::{PendingResult, PendingSlot};

/// Default time to wait for a reply.
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Settings shared by every client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
  /// How long a query waits for its reply.
  pub timeout: Duration,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
    }
  }
}

/// Blocking query front-end for one thread.
///
/// Operations take `self: &Arc<Self>` because the client hands itself to the
/// remote side as the reply callback.
pub struct QueryClient {
  owner: ThreadId,
  cache: Arc<RemoteTreeCache>,
  connections: Arc<ConnectionRegistry>,
  config: ClientConfig,
  next_interaction: AtomicU32,
  slot: PendingSlot,
}

impl std::fmt::Debug for QueryClient {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("QueryClient")
      .field("owner", &self.owner)
      .field("config", &self.config)
      .finish_non_exhaustive()
  }
}

impl QueryClient {
  pub(crate) fn new(
    owner: ThreadId,
    cache: Arc<RemoteTreeCache>,
    connections: Arc<ConnectionRegistry>,
    config: ClientConfig,
  ) -> Self {
    Self {
      owner,
      cache,
      connections,
      config,
      next_interaction: AtomicU32::new(1),
      slot: PendingSlot::new(),
    }
  }

  /// Thread this client was created for.
  pub const fn owner(&self) -> ThreadId {
    self.owner
  }

  /// The shared cache this client reads through.
  pub const fn cache(&self) -> &Arc<RemoteTreeCache> {
    &self.cache
  }

  /// Ids never wrap: a wrapped id would compare older than a reply already
  /// recorded and be ignored until timeout.
  fn next_interaction_id(&self) -> AllioResult<InteractionId> {
    self
      .next_interaction
      .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_add(1))
      .map(InteractionId)
      .map_err(|_| AllioError::InteractionIdsExhausted)
  }

  /// Issue one remote call and block for its reply.
  ///
  /// Returns `None` if the connection is unknown, the call could not be
  /// issued, or no matching reply arrived in time.
  fn request(
    self: &Arc<Self>,
    connection_id: ConnectionId,
    operation: &'static str,
    issue: impl FnOnce(&dyn RemoteConnection, RequestContext) -> RemoteResult,
  ) -> Option<(PendingResult, PackageAllowList)> {
    match self.try_request(connection_id, issue) {
      Ok(reply) => Some(reply),
      Err(e @ AllioError::ConnectionNotFound(_)) => {
        log::debug!("{operation}: {e}");
        None
      }
      Err(e) => {
        log::warn!("{operation} on connection {connection_id}: {e}");
        None
      }
    }
  }

  fn try_request(
    self: &Arc<Self>,
    connection_id: ConnectionId,
    issue: impl FnOnce(&dyn RemoteConnection, RequestContext) -> RemoteResult,
  ) -> AllioResult<(PendingResult, PackageAllowList)> {
    let connection = self
      .connections
      .get(connection_id)
      .ok_or(AllioError::ConnectionNotFound(connection_id))?;

    let interaction_id = self.next_interaction_id()?;
    let ctx = RequestContext {
      interaction_id,
      callback: Arc::clone(self) as Arc<dyn QueryCallback>,
      thread: thread::current().id(),
    };

    let allowed = issue(connection.as_ref(), ctx).map_err(|e| {
      self.slot.clear();
      AllioError::from(e)
    })?;
    let result = self.slot.wait_for(interaction_id, self.config.timeout)?;
    Ok((result, allowed))
  }

  fn finish_element(
    &self,
    result: PendingResult,
    allowed: Option<&[String]>,
    connection_id: ConnectionId,
  ) -> Option<ElementSnapshot> {
    let element = result.into_element()?;
    let id = element.id();
    finalize::finalize_element(&self.cache, element, connection_id, false, allowed)
      .inspect_err(|e| log::warn!("Dropping reply element {id}: {e}"))
      .ok()
  }

  /// Look up a window, from the cache unless `bypass_cache`.
  pub fn get_window(
    self: &Arc<Self>,
    connection_id: ConnectionId,
    window_id: WindowId,
    bypass_cache: bool,
  ) -> Option<WindowSnapshot> {
    if !bypass_cache {
      if let Some(cached) = self.cache.get_window(window_id) {
        log::debug!("Window cache hit: {window_id}");
        return Some(cached);
      }
    }

    let (result, _) =
      self.request(connection_id, "get_window", |c, ctx| c.get_window(window_id, ctx))?;
    let window = finalize::finalize_window(result.into_window()?, connection_id)
      .inspect_err(|e| log::warn!("Dropping reply window {window_id}: {e}"))
      .ok()?;
    if !bypass_cache {
      self.cache.add_window(&window);
    }
    Some(window)
  }

  /// All windows. Once the full list has been fetched it is served from the
  /// cache, highest layer first. Empty if the remote side cannot be reached.
  pub fn get_windows(self: &Arc<Self>, connection_id: ConnectionId) -> Vec<WindowSnapshot> {
    if let Some(cached) = self.cache.get_windows() {
      log::debug!("Window list cache hit ({} windows)", cached.len());
      return cached;
    }

    let Some((result, _)) =
      self.request(connection_id, "get_windows", |c, ctx| c.get_windows(ctx))
    else {
      return Vec::new();
    };
    let Some(reply) = result.into_windows() else {
      return Vec::new();
    };
    let windows: Vec<_> = reply
      .into_iter()
      .filter_map(|w| {
        let id = w.id();
        finalize::finalize_window(w, connection_id)
          .inspect_err(|e| log::warn!("Dropping reply window {id}: {e}"))
          .ok()
      })
      .collect();
    self.cache.set_windows(&windows);
    windows
  }

  /// Look up an element by id, from the cache unless `bypass_cache`.
  ///
  /// On a miss the remote side may return neighbours along with the target, as
  /// selected by `prefetch`; all of them are cached. The target is the first
  /// element of the reply.
  pub fn find_by_id(
    self: &Arc<Self>,
    connection_id: ConnectionId,
    window_id: WindowId,
    node_id: NodeId,
    bypass_cache: bool,
    prefetch: PrefetchFlags,
    args: Option<&ActionArgs>,
  ) -> AllioResult<Option<ElementSnapshot>> {
    let prefetch = prefetch.validate()?;

    if !bypass_cache {
      if let Some(cached) = self.cache.get_node(window_id, node_id) {
        log::debug!("Node cache hit: {node_id} in window {window_id}");
        return Ok(Some(cached));
      }
    }

    let Some((result, allowed)) = self.request(connection_id, "find_by_id", |c, ctx| {
      c.find_by_id(window_id, node_id, prefetch, args, ctx)
    }) else {
      return Ok(None);
    };
    let Some(reply) = result.into_elements() else {
      return Ok(None);
    };

    let elements = finalize::finalize_elements(
      &self.cache,
      reply,
      connection_id,
      bypass_cache,
      allowed.as_deref(),
    );
    if CHECK_INTEGRITY {
      for violation in finalize::check_element_list(&elements) {
        log::error!("find_by_id({node_id}) reply: {violation}");
      }
    }
    Ok(elements.into_iter().next())
  }

  /// Root of whichever window is active.
  pub fn root_in_active_window(
    self: &Arc<Self>,
    connection_id: ConnectionId,
  ) -> Option<ElementSnapshot> {
    self
      .find_by_id(
        connection_id,
        WindowId::ACTIVE,
        NodeId::ROOT,
        false,
        PrefetchFlags::DESCENDANTS,
        None,
      )
      .ok()
      .flatten()
  }

  /// Elements under `node_id` whose view tag matches `view_tag`.
  pub fn find_by_view_tag(
    self: &Arc<Self>,
    connection_id: ConnectionId,
    window_id: WindowId,
    node_id: NodeId,
    view_tag: &str,
  ) -> Vec<ElementSnapshot> {
    self.find_list(connection_id, "find_by_view_tag", |c, ctx| {
      c.find_by_view_tag(window_id, node_id, view_tag, ctx)
    })
  }

  /// Elements under `node_id` whose text contains `text`.
  pub fn find_by_text(
    self: &Arc<Self>,
    connection_id: ConnectionId,
    window_id: WindowId,
    node_id: NodeId,
    text: &str,
  ) -> Vec<ElementSnapshot> {
    self.find_list(connection_id, "find_by_text", |c, ctx| {
      c.find_by_text(window_id, node_id, text, ctx)
    })
  }

  fn find_list(
    self: &Arc<Self>,
    connection_id: ConnectionId,
    operation: &'static str,
    issue: impl FnOnce(&dyn RemoteConnection, RequestContext) -> RemoteResult,
  ) -> Vec<ElementSnapshot> {
    let Some((result, allowed)) = self.request(connection_id, operation, issue) else {
      return Vec::new();
    };
    let Some(reply) = result.into_elements() else {
      return Vec::new();
    };
    finalize::finalize_elements(
      &self.cache,
      reply,
      connection_id,
      false,
      allowed.as_deref(),
    )
  }

  /// The element holding `kind` focus, searched from `node_id`.
  pub fn find_focus(
    self: &Arc<Self>,
    connection_id: ConnectionId,
    window_id: WindowId,
    node_id: NodeId,
    kind: FocusKind,
  ) -> Option<ElementSnapshot> {
    let (result, allowed) = self.request(connection_id, "find_focus", |c, ctx| {
      c.find_focus(window_id, node_id, kind, ctx)
    })?;
    self.finish_element(result, allowed.as_deref(), connection_id)
  }

  /// The next focusable element from `node_id` in `direction`.
  pub fn focus_search(
    self: &Arc<Self>,
    connection_id: ConnectionId,
    window_id: WindowId,
    node_id: NodeId,
    direction: FocusDirection,
  ) -> Option<ElementSnapshot> {
    let (result, allowed) = self.request(connection_id, "focus_search", |c, ctx| {
      c.focus_search(window_id, node_id, direction, ctx)
    })?;
    self.finish_element(result, allowed.as_deref(), connection_id)
  }

  /// Ask the remote side to perform `action` on an element. `false` on any
  /// failure, including timeouts.
  pub fn perform_action(
    self: &Arc<Self>,
    connection_id: ConnectionId,
    window_id: WindowId,
    node_id: NodeId,
    action: Action,
    args: Option<&ActionArgs>,
  ) -> bool {
    self
      .request(connection_id, "perform_action", |c, ctx| {
        c.perform_action(window_id, node_id, action, args, ctx)
      })
      .and_then(|(result, _)| result.into_action())
      .unwrap_or(false)
  }

  /// Drop the whole shared cache.
  pub fn clear_cache(&self) {
    self.cache.clear();
  }
}

impl QueryCallback for QueryClient {
  fn on_element_result(&self, element: Option<ElementSnapshot>, interaction_id: InteractionId) {
    self.slot.record(interaction_id, PendingResult::Element(element));
  }

  fn on_element_list_result(&self, elements: Vec<ElementSnapshot>, interaction_id: InteractionId) {
    self.slot.record(interaction_id, PendingResult::Elements(elements));
  }

  fn on_action_result(&self, success: bool, interaction_id: InteractionId) {
    self.slot.record(interaction_id, PendingResult::Action(success));
  }

  fn on_window_result(&self, window: Option<WindowSnapshot>, interaction_id: InteractionId) {
    self.slot.record(interaction_id, PendingResult::Window(window));
  }

  fn on_window_list_result(&self, windows: Vec<WindowSnapshot>, interaction_id: InteractionId) {
    self.slot.record(interaction_id, PendingResult::Windows(windows));
  }

  fn set_same_thread_message(&self, message: SameThreadMessage) {
    self.slot.set_same_thread_message(message);
  }
}

#[cfg(test)]
mod tests {
  use super::testing::{FakeConnection, Reply};
  use super::*;
  use crate::a11y::ElementFlags;
  use crate::cache::testing::{element, nid, with_flag, ScriptedRefresher};
  use std::time::Instant;

  const CONN: ConnectionId = ConnectionId(3);
  const W: WindowId = WindowId(1);

  fn setup(timeout_ms: u64) -> (Arc<QueryClient>, Arc<FakeConnection>) {
    let cache = Arc::new(RemoteTreeCache::new(Box::new(ScriptedRefresher::default())));
    let connections = Arc::new(ConnectionRegistry::default());
    let remote = Arc::new(FakeConnection::default());
    connections.add(CONN, Arc::clone(&remote) as Arc<dyn RemoteConnection>);
    let config = ClientConfig {
      timeout: Duration::from_millis(timeout_ms),
    };
    let client = Arc::new(QueryClient::new(
      thread::current().id(),
      cache,
      connections,
      config,
    ));
    (client, remote)
  }

  /// Remote tree: 1 -> [2, 3], 2 -> [4].
  fn populate(remote: &FakeConnection) {
    remote.put(element(1, None, &[2, 3]));
    remote.put(element(2, Some(1), &[4]));
    remote.put(element(3, Some(1), &[]));
    remote.put(element(4, Some(2), &[]));
  }

  fn fetch(client: &Arc<QueryClient>, n: i32, bypass_cache: bool) -> Option<ElementSnapshot> {
    client
      .find_by_id(CONN, W, nid(n), bypass_cache, PrefetchFlags::empty(), None)
      .unwrap()
  }

  fn window(id: i32, layer: i32) -> WindowSnapshot {
    let mut w = WindowSnapshot::new(WindowId(id));
    w.set_layer(layer).unwrap();
    w
  }

  #[test]
  fn find_by_id_fetches_seals_and_caches_prefetched() {
    let (client, remote) = setup(5_000);
    populate(&remote);

    let root = client
      .find_by_id(CONN, W, nid(1), false, PrefetchFlags::DESCENDANTS, None)
      .unwrap()
      .unwrap();
    assert_eq!(root.id(), nid(1));
    assert!(root.is_sealed());
    assert_eq!(root.connection_id(), CONN);
    assert_eq!(client.cache().node_count(W), 4);

    let grandchild = fetch(&client, 4, false).unwrap();
    assert_eq!(grandchild.parent_id(), nid(2));
    assert_eq!(remote.calls(), vec!["find_by_id"], "second lookup served from cache");
  }

  #[test]
  fn bypass_cache_asks_remote_and_leaves_cache_alone() {
    let (client, remote) = setup(5_000);
    populate(&remote);

    assert!(fetch(&client, 1, true).is_some());
    assert_eq!(client.cache().node_count(W), 0);
    assert!(fetch(&client, 1, true).is_some());
    assert_eq!(remote.calls().len(), 2);
  }

  #[test]
  fn missing_element_is_none() {
    let (client, remote) = setup(5_000);
    populate(&remote);
    assert!(fetch(&client, 42, false).is_none());
  }

  #[test]
  fn siblings_without_predecessors_rejected_before_any_call() {
    let (client, remote) = setup(5_000);
    let err = client
      .find_by_id(CONN, W, nid(1), false, PrefetchFlags::SIBLINGS, None)
      .unwrap_err();
    assert!(matches!(err, AllioError::InvalidArgument(_)));
    assert!(remote.calls().is_empty());
  }

  #[test]
  fn unknown_connection_yields_nothing() {
    let (client, remote) = setup(5_000);
    populate(&remote);
    let found = client
      .find_by_id(ConnectionId(99), W, nid(1), false, PrefetchFlags::empty(), None)
      .unwrap();
    assert!(found.is_none());
    assert!(!client.perform_action(ConnectionId(99), W, nid(1), Action::Click, None));
    assert!(remote.calls().is_empty());
  }

  #[test]
  fn interaction_ids_stop_instead_of_wrapping() {
    let (client, remote) = setup(5_000);
    populate(&remote);
    client.next_interaction.store(u32::MAX - 1, Ordering::Relaxed);

    assert!(fetch(&client, 1, true).is_some());
    assert!(fetch(&client, 1, true).is_none());
    assert!(matches!(
      client.next_interaction_id(),
      Err(AllioError::InteractionIdsExhausted)
    ));
    assert_eq!(remote.calls(), vec!["find_by_id"], "exhausted client issues nothing");
  }

  #[test]
  fn request_carries_calling_thread() {
    let (client, remote) = setup(5_000);
    populate(&remote);
    fetch(&client, 1, true);
    assert_eq!(remote.caller_threads(), vec![thread::current().id()]);
  }

  #[test]
  fn reply_from_another_thread_completes_query() {
    let (client, remote) = setup(5_000);
    populate(&remote);
    remote.set_reply(Reply::FromThread(Duration::from_millis(20)));

    let found = fetch(&client, 3, false).unwrap();
    assert_eq!(found.id(), nid(3));
  }

  #[test]
  fn same_thread_reply_runs_inline_without_waiting_out_timeout() {
    let (client, remote) = setup(5_000);
    populate(&remote);
    remote.set_reply(Reply::SameThread);

    let start = Instant::now();
    let found = fetch(&client, 2, false).unwrap();
    assert_eq!(found.id(), nid(2));
    assert!(start.elapsed() < Duration::from_secs(1), "took {:?}", start.elapsed());
  }

  #[test]
  fn silent_remote_times_out_then_client_recovers() {
    let (client, remote) = setup(100);
    populate(&remote);
    remote.set_reply(Reply::Never);

    let start = Instant::now();
    assert!(fetch(&client, 1, false).is_none());
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(100));
    assert!(elapsed < Duration::from_millis(1_500), "took {elapsed:?}");

    remote.set_reply(Reply::Immediate);
    assert!(fetch(&client, 1, false).is_some());
  }

  #[test]
  fn stale_reply_does_not_satisfy_query() {
    let (client, remote) = setup(100);
    populate(&remote);
    remote.set_reply(Reply::Stale);
    assert!(fetch(&client, 1, false).is_none());
    assert_eq!(client.cache().node_count(W), 0);
  }

  #[test]
  fn overtaken_query_fails_without_waiting() {
    let (client, remote) = setup(5_000);
    populate(&remote);
    remote.set_reply(Reply::Overtaken);

    let start = Instant::now();
    assert!(fetch(&client, 1, false).is_none());
    assert!(start.elapsed() < Duration::from_secs(1));
  }

  #[test]
  fn late_reply_cannot_answer_the_next_query() {
    let (client, remote) = setup(50);
    populate(&remote);
    remote.set_reply(Reply::FromThread(Duration::from_millis(150)));
    assert!(fetch(&client, 1, true).is_none());

    // Let the late reply for node 1 land in the slot.
    thread::sleep(Duration::from_millis(300));
    remote.set_reply(Reply::Immediate);
    let found = fetch(&client, 2, true).unwrap();
    assert_eq!(found.id(), nid(2));
  }

  #[test]
  fn transport_failure_yields_nothing() {
    let (client, remote) = setup(5_000);
    populate(&remote);
    remote.set_reply(Reply::Fail);

    let start = Instant::now();
    assert!(fetch(&client, 1, false).is_none());
    assert!(!client.perform_action(CONN, W, nid(1), Action::Click, None));
    assert!(client.get_windows(CONN).is_empty());
    assert!(start.elapsed() < Duration::from_secs(1), "no waiting on failed issue");
  }

  #[test]
  fn wrong_kind_window_list_reply_is_not_cached() {
    let (client, remote) = setup(5_000);
    remote.set_windows(vec![window(1, 1), window(2, 2)]);
    remote.set_reply(Reply::WrongKind);

    assert!(client.get_windows(CONN).is_empty());
    assert!(client.cache().get_windows().is_none(), "list must stay incomplete");

    remote.set_reply(Reply::Immediate);
    assert_eq!(client.get_windows(CONN).len(), 2);
    assert_eq!(remote.calls(), vec!["get_windows", "get_windows"]);
  }

  #[test]
  fn wrong_kind_replies_yield_nothing() {
    let (client, remote) = setup(5_000);
    populate(&remote);
    remote.set_action_result(true);
    remote.set_reply(Reply::WrongKind);

    assert!(fetch(&client, 1, false).is_none());
    assert!(client.find_by_text(CONN, W, NodeId::ROOT, "x").is_empty());
    assert!(!client.perform_action(CONN, W, nid(1), Action::Click, None));
    assert!(client.get_window(CONN, WindowId(1), false).is_none());
    assert_eq!(client.cache().node_count(W), 0);
  }

  #[test]
  fn disallowed_package_rewritten_in_result_and_cache() {
    let (client, remote) = setup(5_000);
    let mut e = element(1, None, &[]);
    e.set_package_name(Some("com.other".into())).unwrap();
    remote.put(e);
    remote.set_allowed(&["com.mine", "com.mine.extra"]);

    let found = fetch(&client, 1, false).unwrap();
    assert_eq!(found.package_name(), Some("com.mine"));
    let cached = client.cache().get_node(W, nid(1)).unwrap();
    assert_eq!(cached.package_name(), Some("com.mine"));
  }

  #[test]
  fn windows_fetched_once_then_served_by_layer() {
    let (client, remote) = setup(5_000);
    remote.set_windows(vec![window(1, 1), window(2, 5), window(3, 3)]);

    let fetched = client.get_windows(CONN);
    assert_eq!(fetched.len(), 3);
    assert!(fetched.iter().all(|w| w.is_sealed() && w.connection_id() == CONN));

    let cached: Vec<_> = client.get_windows(CONN).iter().map(WindowSnapshot::id).collect();
    assert_eq!(cached, vec![WindowId(2), WindowId(3), WindowId(1)]);
    assert_eq!(remote.calls(), vec!["get_windows"]);
  }

  #[test]
  fn single_window_cached_unless_bypassed() {
    let (client, remote) = setup(5_000);
    remote.set_windows(vec![window(7, 2)]);

    assert!(client.get_window(CONN, WindowId(7), true).is_some());
    assert!(client.cache().get_window(WindowId(7)).is_none());

    let w = client.get_window(CONN, WindowId(7), false).unwrap();
    assert_eq!(w.layer(), 2);
    assert!(client.get_window(CONN, WindowId(7), false).is_some());
    assert_eq!(remote.calls().len(), 2);

    assert!(client.get_window(CONN, WindowId(8), false).is_none());
  }

  #[test]
  fn root_in_active_window_asks_for_root() {
    let (client, remote) = setup(5_000);
    let mut root = ElementSnapshot::new(W, NodeId::ROOT);
    root.set_children(vec![nid(5)]).unwrap();
    let mut child = element(5, None, &[]);
    child.set_parent(NodeId::ROOT).unwrap();
    remote.put(root);
    remote.put(child);

    let found = client.root_in_active_window(CONN).unwrap();
    assert_eq!(found.id(), NodeId::ROOT);
    assert!(client.cache().get_node(W, nid(5)).is_some(), "descendants prefetched");
  }

  #[test]
  fn text_and_view_tag_searches_return_and_cache_matches() {
    let (client, remote) = setup(5_000);
    let mut ok = element(1, None, &[]);
    ok.set_text(Some("OK".into())).unwrap();
    ok.set_view_id_resource_name(Some("app:id/ok".into())).unwrap();
    let mut okay = element(2, None, &[]);
    okay.set_text(Some("OK then".into())).unwrap();
    remote.put(ok);
    remote.put(okay);
    remote.put(element(3, None, &[]));

    let by_text = client.find_by_text(CONN, W, NodeId::ROOT, "OK");
    assert_eq!(by_text.len(), 2);
    assert_eq!(client.cache().node_count(W), 2);

    let by_tag = client.find_by_view_tag(CONN, W, NodeId::ROOT, "app:id/ok");
    assert_eq!(by_tag.iter().map(ElementSnapshot::id).collect::<Vec<_>>(), vec![nid(1)]);
    assert!(client.find_by_text(CONN, W, NodeId::ROOT, "nope").is_empty());
  }

  #[test]
  fn focus_queries() {
    let (client, remote) = setup(5_000);
    remote.put(element(1, None, &[2]));
    remote.put(with_flag(element(2, Some(1), &[]), ElementFlags::FOCUSED));

    let input = client.find_focus(CONN, W, NodeId::ROOT, FocusKind::Input).unwrap();
    assert_eq!(input.id(), nid(2));
    assert!(client
      .find_focus(CONN, W, NodeId::ROOT, FocusKind::Accessibility)
      .is_none());
    assert_eq!(client.cache().input_focus(), Some(nid(2)));

    let next = client.focus_search(CONN, W, nid(1), FocusDirection::Forward).unwrap();
    assert_eq!(next.id(), nid(2));
  }

  #[test]
  fn perform_action_reports_remote_outcome() {
    let (client, remote) = setup(5_000);
    remote.set_action_result(true);
    assert!(client.perform_action(CONN, W, nid(1), Action::Click, None));
    remote.set_action_result(false);
    assert!(!client.perform_action(CONN, W, nid(1), Action::Click, None));
  }

  #[test]
  fn clear_cache_forces_refetch() {
    let (client, remote) = setup(5_000);
    populate(&remote);
    fetch(&client, 1, false);
    client.clear_cache();
    fetch(&client, 1, false);
    assert_eq!(remote.calls().len(), 2);
  }
}
