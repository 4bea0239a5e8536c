/*! The cache's refresher: re-fetch an element through the calling thread's client. */

use std::sync::Weak;

use super::ClientRegistry;
use crate::cache::NodeRefresher;
use crate::types::{ElementSnapshot, PrefetchFlags};

/// Refreshes cached elements with a bypassing, non-prefetching `find_by_id`.
///
/// Holds the registry weakly: the registry owns the cache, which owns this.
#[derive(Debug, Clone)]
pub struct ClientRefresher {
  clients: Weak<ClientRegistry>,
}

impl ClientRefresher {
  /// Refresh through the clients in `clients`.
  pub const fn new(clients: Weak<ClientRegistry>) -> Self {
    Self { clients }
  }
}

impl NodeRefresher for ClientRefresher {
  fn refresh_node(&self, node: &mut ElementSnapshot, bypass_cache: bool) -> bool {
    let Some(clients) = self.clients.upgrade() else {
      return false;
    };
    let id = node.id();
    let fresh = clients.current().find_by_id(
      node.connection_id(),
      node.window_id(),
      id,
      bypass_cache,
      PrefetchFlags::empty(),
      None,
    );
    match fresh {
      Ok(Some(fresh)) => node
        .refresh_from(&fresh)
        .inspect_err(|e| log::warn!("Cannot refresh {id}: {e}"))
        .is_ok(),
      Ok(None) => false,
      Err(e) => {
        log::warn!("Refresh of {id} failed: {e}");
        false
      }
    }
  }
}
