/*!
Pending-result slot and the wait loop that blocks on it.

One slot per client. Replies are recorded by interaction id and only ever move
forward: a reply tagged with an id at or below the last recorded one is
dropped, so a slow reply can never clobber a newer one.
*/

use parking_lot::{Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use super::connection::SameThreadMessage;
use crate::types::{AllioError, AllioResult, ElementSnapshot, InteractionId, WindowSnapshot};

/// Payload recorded by a result callback.
#[derive(Debug, Default)]
pub(crate) enum PendingResult {
  #[default]
  Empty,
  Element(Option<ElementSnapshot>),
  Elements(Vec<ElementSnapshot>),
  Action(bool),
  Window(Option<WindowSnapshot>),
  Windows(Vec<WindowSnapshot>),
}

impl PendingResult {
  pub(crate) fn into_element(self) -> Option<ElementSnapshot> {
    match self {
      Self::Element(element) => element,
      Self::Elements(elements) => elements.into_iter().next(),
      other => other.mismatch("element"),
    }
  }

  /// `None` when the reply was of another kind.
  pub(crate) fn into_elements(self) -> Option<Vec<ElementSnapshot>> {
    match self {
      Self::Elements(elements) => Some(elements),
      Self::Element(element) => Some(element.into_iter().collect()),
      other => other.mismatch("element list"),
    }
  }

  pub(crate) fn into_action(self) -> Option<bool> {
    match self {
      Self::Action(success) => Some(success),
      other => other.mismatch("action result"),
    }
  }

  pub(crate) fn into_window(self) -> Option<WindowSnapshot> {
    match self {
      Self::Window(window) => window,
      other => other.mismatch("window"),
    }
  }

  /// Only a full list counts; anything else is `None`, so a misbehaving
  /// remote can never mark a partial or empty list as complete.
  pub(crate) fn into_windows(self) -> Option<Vec<WindowSnapshot>> {
    match self {
      Self::Windows(windows) => Some(windows),
      other => other.mismatch("window list"),
    }
  }

  fn mismatch<T>(self, expected: &str) -> Option<T> {
    log::warn!("Expected {expected} reply, got {self:?}");
    None
  }
}

struct SlotState {
  recorded: Option<InteractionId>,
  result: PendingResult,
  same_thread_message: Option<SameThreadMessage>,
}

impl SlotState {
  fn clear(&mut self) {
    self.recorded = None;
    self.result = PendingResult::Empty;
    self.same_thread_message = None;
  }
}

/// Lock, condition variable and state for one client's in-flight request.
pub(crate) struct PendingSlot {
  state: Mutex<SlotState>,
  changed: Condvar,
}

impl PendingSlot {
  pub(crate) fn new() -> Self {
    Self {
      state: Mutex::new(SlotState {
        recorded: None,
        result: PendingResult::Empty,
        same_thread_message: None,
      }),
      changed: Condvar::new(),
    }
  }

  /// Record `result` if `interaction_id` is newer than anything recorded.
  /// Always wakes the waiter.
  pub(crate) fn record(&self, interaction_id: InteractionId, result: PendingResult) {
    let mut state = self.state.lock();
    if state.recorded.is_none_or(|recorded| interaction_id > recorded) {
      state.recorded = Some(interaction_id);
      state.result = result;
    } else {
      log::debug!(
        "Dropping reply for interaction {interaction_id}, already have {:?}",
        state.recorded
      );
    }
    self.changed.notify_all();
  }

  /// Queue work the waiter must run on its own thread.
  pub(crate) fn set_same_thread_message(&self, message: SameThreadMessage) {
    let mut state = self.state.lock();
    state.same_thread_message = Some(message);
    self.changed.notify_all();
  }

  pub(crate) fn clear(&self) {
    self.state.lock().clear();
  }

  /// Block until the reply for `awaited` arrives, a newer one overtakes it, or
  /// `timeout` elapses. Same-thread messages are run inline while waiting.
  ///
  /// The slot is cleared on every exit path.
  pub(crate) fn wait_for(
    &self,
    awaited: InteractionId,
    timeout: Duration,
  ) -> AllioResult<PendingResult> {
    let deadline = Instant::now() + timeout;
    let mut state = self.state.lock();

    loop {
      if let Some(message) = state.same_thread_message.take() {
        // The message delivers its reply through `record`, which takes this lock.
        MutexGuard::unlocked(&mut state, message);
        continue;
      }

      match state.recorded {
        Some(recorded) if recorded == awaited => {
          let result = std::mem::take(&mut state.result);
          state.clear();
          return Ok(result);
        }
        Some(recorded) if recorded > awaited => {
          state.clear();
          return Err(AllioError::Superseded { awaited, recorded });
        }
        _ => {}
      }

      if Instant::now() >= deadline {
        state.clear();
        return Err(AllioError::Timeout {
          interaction_id: awaited,
          waited_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        });
      }

      self.changed.wait_until(&mut state, deadline);
    }
  }

  #[cfg(test)]
  pub(crate) fn peek(&self) -> (Option<InteractionId>, String) {
    let state = self.state.lock();
    (state.recorded, format!("{:?}", state.result))
  }
}
