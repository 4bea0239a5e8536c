/*!
Allio Remote - cached mirror and synchronous queries for remote accessibility trees.

A client process inspects UI living in other processes. Requests go out
asynchronously over a [`RemoteConnection`]; replies come back tagged with an
interaction id. This crate turns that into blocking queries and keeps a
partial, event-driven mirror of the remote window and element trees so
repeated lookups stay local.

```ignore
use allio_remote::{ConnectionId, NodeId, PrefetchFlags, RemoteMirror, WindowId};

let mirror = RemoteMirror::new();
mirror.add_connection(ConnectionId(1), connection);

let client = mirror.client();
let windows = client.get_windows(ConnectionId(1));                  // remote once, then cached
let node = client.find_by_id(
  ConnectionId(1), WindowId(4), NodeId::for_owner(12),
  false, PrefetchFlags::DESCENDANTS, None,
)?;                                                                  // cache first

// Remote change events keep the mirror current
mirror.on_change_notification(&change);
```
*/

mod cache;
mod client;
mod core;

pub mod a11y;

mod types;
pub use types::*;

pub use crate::cache::{IntegrityViolation, NodeRefresher, RemoteTreeCache};
pub use crate::client::{
  ActionArgs, ClientConfig, ClientRefresher, ClientRegistry, ConnectionRegistry, PackageAllowList,
  QueryCallback, QueryClient, RemoteConnection, RemoteResult, RequestContext, SameThreadMessage,
  DEFAULT_TIMEOUT_MS,
};
pub use crate::core::{RemoteMirror, RemoteMirrorBuilder};
