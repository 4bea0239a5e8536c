/*!
The seam to the remote side: outbound calls and inbound result callbacks.

A [`RemoteConnection`] issues requests. Every call gets a [`RequestContext`]
carrying the interaction id, the callback to reply through, and the identity of
the calling thread. The reply itself arrives later through [`QueryCallback`],
from any thread.
*/

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::thread::ThreadId;

use crate::a11y::{Action, FocusDirection, FocusKind};
use crate::types::{
  ConnectionId, ElementSnapshot, InteractionId, NodeId, PrefetchFlags, RemoteError, WindowId,
  WindowSnapshot,
};

/// Extra arguments for an action or a lookup, passed through untouched.
pub type ActionArgs = serde_json::Map<String, serde_json::Value>;

/// Packages the caller may see. `None` means no filtering.
pub type PackageAllowList = Option<Vec<String>>;

/// Outcome of issuing a remote call.
///
/// `Ok` means the request went out; its reply arrives through the callback.
pub type RemoteResult = Result<PackageAllowList, RemoteError>;

/// Work that must run on the waiting thread itself.
pub type SameThreadMessage = Box<dyn FnOnce() + Send>;

/// Per-request data handed to the remote side.
#[derive(Clone)]
pub struct RequestContext {
  /// Tag the reply must carry.
  pub interaction_id: InteractionId,
  /// Where the reply goes.
  pub callback: Arc<dyn QueryCallback>,
  /// Thread that issued the request and is blocked waiting for the reply.
  pub thread: ThreadId,
}

impl std::fmt::Debug for RequestContext {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("RequestContext")
      .field("interaction_id", &self.interaction_id)
      .field("thread", &self.thread)
      .finish_non_exhaustive()
  }
}

/// Receives replies for requests issued through a [`RemoteConnection`].
///
/// Every callback is ignored unless `interaction_id` is newer than the last
/// reply recorded, and every callback wakes the waiting thread.
pub trait QueryCallback: Send + Sync {
  /// Reply to a single-element lookup (`find_focus`, `focus_search`).
  fn on_element_result(&self, element: Option<ElementSnapshot>, interaction_id: InteractionId);

  /// Reply to `find_by_id` (target first, then prefetched elements) or to a
  /// text / view-tag search.
  fn on_element_list_result(&self, elements: Vec<ElementSnapshot>, interaction_id: InteractionId);

  /// Outcome of `perform_action`.
  fn on_action_result(&self, success: bool, interaction_id: InteractionId);

  /// Reply to `get_window`.
  fn on_window_result(&self, window: Option<WindowSnapshot>, interaction_id: InteractionId);

  /// Reply to `get_windows`: the complete window list.
  fn on_window_list_result(&self, windows: Vec<WindowSnapshot>, interaction_id: InteractionId);

  /// Hand over work that must run on the thread waiting for the reply. The
  /// remote side uses this when it is itself running on that thread.
  fn set_same_thread_message(&self, message: SameThreadMessage);
}

/// Outbound calls to one remote endpoint.
///
/// Implementations must not block on the reply. Return once the request is
/// handed off, or fail with [`RemoteError`] if it could not be.
///
/// Every method replies once through `ctx.callback`, tagged with
/// `ctx.interaction_id`.
pub trait RemoteConnection: Send + Sync {
  /// Fetch one window. Replies via `on_window_result`.
  fn get_window(&self, window_id: WindowId, ctx: RequestContext) -> RemoteResult;

  /// Fetch every window. Replies via `on_window_list_result`.
  fn get_windows(&self, ctx: RequestContext) -> RemoteResult;

  /// Fetch one element plus the neighbours selected by `prefetch`. Replies
  /// via `on_element_list_result` with the target first.
  fn find_by_id(
    &self,
    window_id: WindowId,
    node_id: NodeId,
    prefetch: PrefetchFlags,
    args: Option<&ActionArgs>,
    ctx: RequestContext,
  ) -> RemoteResult;

  /// Elements under `node_id` with a matching view tag. Replies via
  /// `on_element_list_result`.
  fn find_by_view_tag(
    &self,
    window_id: WindowId,
    node_id: NodeId,
    view_tag: &str,
    ctx: RequestContext,
  ) -> RemoteResult;

  /// Elements under `node_id` whose text contains `text`. Replies via
  /// `on_element_list_result`.
  fn find_by_text(
    &self,
    window_id: WindowId,
    node_id: NodeId,
    text: &str,
    ctx: RequestContext,
  ) -> RemoteResult;

  /// The element holding `kind` focus. Replies via `on_element_result`.
  fn find_focus(
    &self,
    window_id: WindowId,
    node_id: NodeId,
    kind: FocusKind,
    ctx: RequestContext,
  ) -> RemoteResult;

  /// The next focusable element in `direction`. Replies via
  /// `on_element_result`.
  fn focus_search(
    &self,
    window_id: WindowId,
    node_id: NodeId,
    direction: FocusDirection,
    ctx: RequestContext,
  ) -> RemoteResult;

  /// Perform `action` on an element. Replies via `on_action_result`.
  fn perform_action(
    &self,
    window_id: WindowId,
    node_id: NodeId,
    action: Action,
    args: Option<&ActionArgs>,
    ctx: RequestContext,
  ) -> RemoteResult;
}

/// Registered connections by id.
#[derive(Default)]
pub struct ConnectionRegistry {
  connections: RwLock<HashMap<ConnectionId, Arc<dyn RemoteConnection>>>,
}

impl std::fmt::Debug for ConnectionRegistry {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let ids: Vec<_> = self.connections.read().keys().copied().collect();
    f.debug_struct("ConnectionRegistry")
      .field("connections", &ids)
      .finish()
  }
}

impl ConnectionRegistry {
  /// Register `connection`, replacing any previous one under `id`.
  pub fn add(&self, id: ConnectionId, connection: Arc<dyn RemoteConnection>) {
    log::debug!("Registering connection {id}");
    self.connections.write().insert(id, connection);
  }

  /// Unregister and return the connection under `id`.
  pub fn remove(&self, id: ConnectionId) -> Option<Arc<dyn RemoteConnection>> {
    log::debug!("Removing connection {id}");
    self.connections.write().remove(&id)
  }

  /// The connection under `id`, if registered.
  pub fn get(&self, id: ConnectionId) -> Option<Arc<dyn RemoteConnection>> {
    self.connections.read().get(&id).cloned()
  }

  /// Number of registered connections.
  pub fn len(&self) -> usize {
    self.connections.read().len()
  }

  /// Whether no connection is registered.
  pub fn is_empty(&self) -> bool {
    self.connections.read().is_empty()
  }
}
