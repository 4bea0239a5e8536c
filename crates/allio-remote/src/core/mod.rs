/*!
Core mirror instance - owns the cache, the connection set, and per-thread clients.

# Example

```ignore
use allio_remote::{ConnectionId, NodeId, PrefetchFlags, RemoteMirror, WindowId};

let mirror = RemoteMirror::builder().timeout_ms(2_000).build();
mirror.add_connection(ConnectionId(1), connection);

// Blocking lookup through the calling thread's client
let client = mirror.client();
let root = client.root_in_active_window(ConnectionId(1));

// Keep the cache honest as the remote side changes
mirror.on_change_notification(&change);
```
*/

use std::sync::Arc;
use std::thread::ThreadId;

use crate::cache::{NodeRefresher, RemoteTreeCache};
use crate::client::{
  ClientConfig, ClientRefresher, ClientRegistry, ConnectionRegistry, QueryClient, RemoteConnection,
};
use crate::types::{ChangeNotification, ConnectionId};

/// Main mirror instance.
///
/// Clone is cheap (Arc bumps) - share freely across threads.
#[derive(Clone)]
pub struct RemoteMirror {
  clients: Arc<ClientRegistry>,
}

impl std::fmt::Debug for RemoteMirror {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("RemoteMirror").finish_non_exhaustive()
  }
}

/// Builder for configuring a [`RemoteMirror`].
///
/// # Example
///
/// ```ignore
/// let mirror = RemoteMirror::builder()
///     .timeout_ms(500)
///     .build();
/// ```
#[derive(Default)]
#[must_use = "Builder does nothing until .build() is called"]
pub struct RemoteMirrorBuilder {
  config: ClientConfig,
  refresher: Option<Box<dyn NodeRefresher>>,
}

impl std::fmt::Debug for RemoteMirrorBuilder {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("RemoteMirrorBuilder")
      .field("config", &self.config)
      .field("custom_refresher", &self.refresher.is_some())
      .finish()
  }
}

impl RemoteMirrorBuilder {
  /// How long a query waits for its reply. Default: 5000ms.
  pub fn timeout_ms(mut self, ms: u64) -> Self {
    self.config.timeout = std::time::Duration::from_millis(ms);
    self
  }

  /// Refresh stale cache entries with `refresher` instead of re-querying
  /// through the calling thread's client.
  pub fn refresher(mut self, refresher: Box<dyn NodeRefresher>) -> Self {
    self.refresher = Some(refresher);
    self
  }

  /// Build the mirror with the configured options.
  pub fn build(self) -> RemoteMirror {
    let Self { config, refresher } = self;
    let connections = Arc::new(ConnectionRegistry::default());

    // The default refresher reaches back into the registry that (through the
    // cache) owns it, so it only holds a weak handle.
    let clients = Arc::new_cyclic(|clients| {
      let refresher =
        refresher.unwrap_or_else(|| Box::new(ClientRefresher::new(clients.clone())));
      ClientRegistry::new(
        Arc::new(RemoteTreeCache::new(refresher)),
        connections,
        config,
      )
    });

    RemoteMirror { clients }
  }
}

impl Default for RemoteMirror {
  fn default() -> Self {
    Self::new()
  }
}

impl RemoteMirror {
  /// Create a mirror with default options.
  ///
  /// For custom configuration, use [`RemoteMirror::builder()`].
  pub fn new() -> Self {
    Self::builder().build()
  }

  /// Start configuring a mirror.
  pub fn builder() -> RemoteMirrorBuilder {
    RemoteMirrorBuilder::default()
  }

  /// The calling thread's query client.
  pub fn client(&self) -> Arc<QueryClient> {
    self.clients.current()
  }

  /// The query client for `thread`, created if needed.
  pub fn client_for(&self, thread: ThreadId) -> Arc<QueryClient> {
    self.clients.client_for(thread)
  }

  /// Per-thread query clients.
  pub const fn clients(&self) -> &Arc<ClientRegistry> {
    &self.clients
  }

  /// The shared tree cache.
  pub fn cache(&self) -> &Arc<RemoteTreeCache> {
    self.clients.cache()
  }

  /// Registered remote connections.
  pub fn connections(&self) -> &Arc<ConnectionRegistry> {
    self.clients.connections()
  }

  /// Register `connection` under `id`, replacing any previous one.
  pub fn add_connection(&self, id: ConnectionId, connection: Arc<dyn RemoteConnection>) {
    self.connections().add(id, connection);
  }

  /// Unregister a connection. Everything cached is dropped with it.
  pub fn remove_connection(&self, id: ConnectionId) -> bool {
    let removed = self.connections().remove(id).is_some();
    if removed {
      self.cache().clear();
    }
    removed
  }

  /// Feed one remote change event into the cache.
  pub fn on_change_notification(&self, change: &ChangeNotification) {
    self.cache().on_change_notification(change);
  }

  /// Drop everything cached.
  pub fn clear_cache(&self) {
    self.cache().clear();
  }
}
