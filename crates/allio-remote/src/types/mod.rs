/*! Core types for allio-remote.

Public types derive `ts_rs::TS`; `cargo test` writes their TypeScript bindings.
*/

#![allow(missing_docs)]

mod element;
mod error;
mod event;
mod geometry;
mod ids;
mod prefetch;
mod window;

pub use element::{ElementSnapshot, TouchDelegateTarget};
pub use error::{AllioError, AllioResult, RemoteError};
pub use event::{ChangeKind, ChangeNotification};
pub use geometry::Bounds;
pub use ids::{ConnectionId, InteractionId, NodeId, WindowId};
pub use prefetch::PrefetchFlags;
pub use window::WindowSnapshot;
