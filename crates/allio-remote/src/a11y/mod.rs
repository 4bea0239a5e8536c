/*!
Accessibility vocabulary shared by snapshots, the cache and the query client.

These types describe what the remote side reports about an element (flags,
actions, range/collection metadata) and what a caller can ask of it (focus
lookups, focus search, actions).
*/

mod action;
mod flags;
mod focus;
mod info;

pub use action::Action;
pub use flags::{ElementFlags, WindowFlags, WindowType};
pub use focus::{FocusDirection, FocusKind};
pub use info::{CollectionInfo, CollectionItemInfo, RangeInfo, RangeType};
