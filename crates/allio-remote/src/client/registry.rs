/*! One [`QueryClient`] per thread, created on first use. */

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::thread::{self, ThreadId};

use super::{ClientConfig, ConnectionRegistry, QueryClient};
use crate::cache::RemoteTreeCache;

/// Thread-keyed map of query clients sharing one cache and connection set.
pub struct ClientRegistry {
  clients: Mutex<HashMap<ThreadId, Arc<QueryClient>>>,
  cache: Arc<RemoteTreeCache>,
  connections: Arc<ConnectionRegistry>,
  config: ClientConfig,
}

impl std::fmt::Debug for ClientRegistry {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ClientRegistry")
      .field("clients", &self.clients.lock().len())
      .field("config", &self.config)
      .finish_non_exhaustive()
  }
}

impl ClientRegistry {
  pub(crate) fn new(
    cache: Arc<RemoteTreeCache>,
    connections: Arc<ConnectionRegistry>,
    config: ClientConfig,
  ) -> Self {
    Self {
      clients: Mutex::new(HashMap::new()),
      cache,
      connections,
      config,
    }
  }

  /// The client for `thread`, creating it if needed.
  pub fn client_for(&self, thread: ThreadId) -> Arc<QueryClient> {
    Arc::clone(self.clients.lock().entry(thread).or_insert_with(|| {
      log::debug!("Creating query client for {thread:?}");
      Arc::new(QueryClient::new(
        thread,
        Arc::clone(&self.cache),
        Arc::clone(&self.connections),
        self.config,
      ))
    }))
  }

  /// The calling thread's client.
  pub fn current(&self) -> Arc<QueryClient> {
    self.client_for(thread::current().id())
  }

  /// The client for `thread`, if one exists. Used to route replies.
  pub fn get(&self, thread: ThreadId) -> Option<Arc<QueryClient>> {
    self.clients.lock().get(&thread).cloned()
  }

  /// Forget the client for `thread`.
  pub fn remove(&self, thread: ThreadId) -> Option<Arc<QueryClient>> {
    self.clients.lock().remove(&thread)
  }

  /// The cache shared by every client.
  pub const fn cache(&self) -> &Arc<RemoteTreeCache> {
    &self.cache
  }

  /// The connections every client queries through.
  pub const fn connections(&self) -> &Arc<ConnectionRegistry> {
    &self.connections
  }

  /// Number of live clients.
  pub fn len(&self) -> usize {
    self.clients.lock().len()
  }

  /// Whether no client exists yet.
  pub fn is_empty(&self) -> bool {
    self.clients.lock().is_empty()
  }
}
