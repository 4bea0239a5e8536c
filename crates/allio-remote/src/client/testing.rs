//! Scripted remote side for client tests.

use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::thread::{self, ThreadId};
use std::time::Duration;

use super::connection::{
  ActionArgs, PackageAllowList, QueryCallback, RemoteConnection, RemoteResult, RequestContext,
};
use crate::a11y::{Action, FocusDirection, FocusKind};
use crate::types::{
  ElementSnapshot, InteractionId, NodeId, PrefetchFlags, RemoteError, WindowId, WindowSnapshot,
};

/// How the fake delivers its replies.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) enum Reply {
  /// Call the callback before returning from the request.
  #[default]
  Immediate,
  /// Call the callback from another thread after a delay.
  FromThread(Duration),
  /// Hand the reply to the waiting thread as a same-thread message.
  SameThread,
  /// Never reply.
  Never,
  /// Reply tagged with the previous interaction id.
  Stale,
  /// Reply tagged with the next interaction id.
  Overtaken,
  /// Fail to issue the request.
  Fail,
  /// Reply through a callback of the wrong kind.
  WrongKind,
}

enum Payload {
  Element(Option<ElementSnapshot>),
  Elements(Vec<ElementSnapshot>),
  Action(bool),
  Window(Option<WindowSnapshot>),
  Windows(Vec<WindowSnapshot>),
}

impl Payload {
  fn wrong_kind(self) -> Self {
    match self {
      Self::Element(_) | Self::Elements(_) => Self::Action(false),
      Self::Action(_) | Self::Window(_) | Self::Windows(_) => Self::Elements(Vec::new()),
    }
  }

  fn send(self, callback: &dyn QueryCallback, id: InteractionId) {
    match self {
      Self::Element(e) => callback.on_element_result(e, id),
      Self::Elements(list) => callback.on_element_list_result(list, id),
      Self::Action(ok) => callback.on_action_result(ok, id),
      Self::Window(w) => callback.on_window_result(w, id),
      Self::Windows(list) => callback.on_window_list_result(list, id),
    }
  }
}

/// Remote side backed by an in-memory tree.
#[derive(Default)]
pub(crate) struct FakeConnection {
  reply: Mutex<Reply>,
  allowed: Mutex<PackageAllowList>,
  elements: Mutex<HashMap<NodeId, ElementSnapshot>>,
  windows: Mutex<Vec<WindowSnapshot>>,
  action_result: Mutex<bool>,
  calls: Mutex<Vec<&'static str>>,
  threads: Mutex<Vec<ThreadId>>,
}

impl FakeConnection {
  pub(crate) fn set_reply(&self, reply: Reply) {
    *self.reply.lock() = reply;
  }

  pub(crate) fn set_allowed(&self, allowed: &[&str]) {
    *self.allowed.lock() = Some(allowed.iter().map(|s| (*s).to_owned()).collect());
  }

  pub(crate) fn put(&self, element: ElementSnapshot) {
    self.elements.lock().insert(element.id(), element);
  }

  pub(crate) fn remove(&self, id: NodeId) {
    self.elements.lock().remove(&id);
  }

  pub(crate) fn set_windows(&self, windows: Vec<WindowSnapshot>) {
    *self.windows.lock() = windows;
  }

  pub(crate) fn set_action_result(&self, ok: bool) {
    *self.action_result.lock() = ok;
  }

  pub(crate) fn calls(&self) -> Vec<&'static str> {
    self.calls.lock().clone()
  }

  pub(crate) fn caller_threads(&self) -> Vec<ThreadId> {
    self.threads.lock().clone()
  }

  fn deliver(&self, operation: &'static str, payload: Payload, ctx: RequestContext) -> RemoteResult {
    self.calls.lock().push(operation);
    self.threads.lock().push(ctx.thread);

    let RequestContext {
      interaction_id: id,
      callback,
      ..
    } = ctx;
    let reply = *self.reply.lock();
    match reply {
      Reply::Immediate => payload.send(callback.as_ref(), id),
      Reply::FromThread(delay) => {
        thread::spawn(move || {
          thread::sleep(delay);
          payload.send(callback.as_ref(), id);
        });
      }
      Reply::SameThread => {
        let target = Arc::clone(&callback);
        callback.set_same_thread_message(Box::new(move || payload.send(target.as_ref(), id)));
      }
      Reply::Never => {}
      Reply::Stale => payload.send(callback.as_ref(), InteractionId(id.0 - 1)),
      Reply::Overtaken => payload.send(callback.as_ref(), InteractionId(id.0 + 1)),
      Reply::Fail => return Err(RemoteError::new("remote side went away")),
      Reply::WrongKind => payload.wrong_kind().send(callback.as_ref(), id),
    }
    Ok(self.allowed.lock().clone())
  }

  fn lookup(&self, id: NodeId) -> Option<ElementSnapshot> {
    self.elements.lock().get(&id).cloned()
  }

  /// The target followed by the requested neighbours.
  fn prefetched(&self, id: NodeId, prefetch: PrefetchFlags) -> Vec<ElementSnapshot> {
    let elements = self.elements.lock();
    let Some(target) = elements.get(&id) else {
      return Vec::new();
    };
    let mut out = vec![target.clone()];

    if prefetch.contains(PrefetchFlags::PREDECESSORS) {
      let mut parent = target.parent_id();
      while let Some(p) = elements.get(&parent) {
        out.push(p.clone());
        parent = p.parent_id();
      }
    }
    if prefetch.contains(PrefetchFlags::DESCENDANTS) {
      let mut fringe: VecDeque<NodeId> = target.children().iter().copied().collect();
      while let Some(child) = fringe.pop_front() {
        if let Some(e) = elements.get(&child) {
          fringe.extend(e.children().iter().copied());
          out.push(e.clone());
        }
      }
    }
    out
  }

  fn matching(&self, pred: impl Fn(&ElementSnapshot) -> bool) -> Vec<ElementSnapshot> {
    let mut found: Vec<_> = self.elements.lock().values().filter(|e| pred(e)).cloned().collect();
    found.sort_by_key(|e| e.id().owner_id());
    found
  }
}

impl RemoteConnection for FakeConnection {
  fn get_window(&self, window_id: WindowId, ctx: RequestContext) -> RemoteResult {
    let window = self.windows.lock().iter().find(|w| w.id() == window_id).cloned();
    self.deliver("get_window", Payload::Window(window), ctx)
  }

  fn get_windows(&self, ctx: RequestContext) -> RemoteResult {
    let windows = self.windows.lock().clone();
    self.deliver("get_windows", Payload::Windows(windows), ctx)
  }

  fn find_by_id(
    &self,
    _window_id: WindowId,
    node_id: NodeId,
    prefetch: PrefetchFlags,
    _args: Option<&ActionArgs>,
    ctx: RequestContext,
  ) -> RemoteResult {
    let found = self.prefetched(node_id, prefetch);
    self.deliver("find_by_id", Payload::Elements(found), ctx)
  }

  fn find_by_view_tag(
    &self,
    _window_id: WindowId,
    _node_id: NodeId,
    view_tag: &str,
    ctx: RequestContext,
  ) -> RemoteResult {
    let found = self.matching(|e| e.view_id_resource_name() == Some(view_tag));
    self.deliver("find_by_view_tag", Payload::Elements(found), ctx)
  }

  fn find_by_text(
    &self,
    _window_id: WindowId,
    _node_id: NodeId,
    text: &str,
    ctx: RequestContext,
  ) -> RemoteResult {
    let found = self.matching(|e| e.text().is_some_and(|t| t.contains(text)));
    self.deliver("find_by_text", Payload::Elements(found), ctx)
  }

  fn find_focus(
    &self,
    _window_id: WindowId,
    _node_id: NodeId,
    kind: FocusKind,
    ctx: RequestContext,
  ) -> RemoteResult {
    let found = self
      .matching(|e| match kind {
        FocusKind::Input => e.is_focused(),
        FocusKind::Accessibility => e.is_accessibility_focused(),
      })
      .into_iter()
      .next();
    self.deliver("find_focus", Payload::Element(found), ctx)
  }

  fn focus_search(
    &self,
    _window_id: WindowId,
    node_id: NodeId,
    _direction: FocusDirection,
    ctx: RequestContext,
  ) -> RemoteResult {
    let next = self
      .lookup(node_id)
      .and_then(|e| e.children().first().copied())
      .and_then(|child| self.lookup(child));
    self.deliver("focus_search", Payload::Element(next), ctx)
  }

  fn perform_action(
    &self,
    _window_id: WindowId,
    _node_id: NodeId,
    _action: Action,
    _args: Option<&ActionArgs>,
    ctx: RequestContext,
  ) -> RemoteResult {
    let ok = *self.action_result.lock();
    self.deliver("perform_action", Payload::Action(ok), ctx)
  }
}
