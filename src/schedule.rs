//! Delayed continuations: the bulk-clear expiry and the committed half of an animated deletion.
//!
//! Scheduled [`Task`]s never run inside the call that scheduled them.
//! The owner of a [`Scheduler`] is handed back each due task together with its [`TimerHandle`]
//! and decides itself whether that handle is still current.

use crate::note::NoteId;
use core::{cell::RefCell, convert::TryFrom};
use hashbrown::HashMap;
use std::rc::Rc;
use tracing::{error, instrument, trace};
use wasm_bindgen::{closure::Closure, JsCast};

/// Identifies one scheduled [`Task`]. Never reused by the same [`Scheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u32);
impl TimerHandle {
	#[must_use]
	pub fn id(self) -> u32 {
		self.0
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
	/// The bulk-clear confirmation window ran out.
	DisarmClear,
	/// A row's removal animation finished.
	CommitDelete(NoteId),
}

pub trait Scheduler {
	/// Milliseconds on a monotonic-enough clock.
	fn now(&self) -> f64;

	/// Arranges for `task` to be handed back after `delay_ms`.
	fn schedule(&mut self, delay_ms: u32, task: Task) -> TimerHandle;

	/// Makes sure `handle`'s task won't be handed back. Unknown or already-run handles are ignored.
	fn cancel(&mut self, handle: TimerHandle);
}

/// A deterministic [`Scheduler`] with a manually advanced clock.
///
/// Used to drive the widget outside of a browser.
#[derive(Debug, Default)]
pub struct ManualScheduler {
	now: f64,
	next_id: u32,
	pending: Vec<(f64, TimerHandle, Task)>,
}
impl ManualScheduler {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Moves the clock forward and returns the tasks that became due, earliest first.
	pub fn advance(&mut self, ms: u32) -> Vec<(TimerHandle, Task)> {
		self.now += f64::from(ms);
		let now = self.now;
		let mut due = Vec::new();
		let mut i = 0;
		while i < self.pending.len() {
			if self.pending[i].0 <= now {
				due.push(self.pending.remove(i));
			} else {
				i += 1;
			}
		}
		due.sort_by(|(a, h_a, _), (b, h_b, _)| a.partial_cmp(b).unwrap_or(core::cmp::Ordering::Equal).then(h_a.cmp(h_b)));
		due.into_iter().map(|(_, handle, task)| (handle, task)).collect()
	}

	#[must_use]
	pub fn pending_count(&self) -> usize {
		self.pending.len()
	}

	#[must_use]
	pub fn is_pending(&self, handle: TimerHandle) -> bool {
		self.pending.iter().any(|(_, h, _)| *h == handle)
	}
}
impl Scheduler for ManualScheduler {
	fn now(&self) -> f64 {
		self.now
	}

	fn schedule(&mut self, delay_ms: u32, task: Task) -> TimerHandle {
		let handle = TimerHandle(self.next_id);
		self.next_id += 1;
		self.pending.push((self.now + f64::from(delay_ms), handle, task));
		handle
	}

	fn cancel(&mut self, handle: TimerHandle) {
		self.pending.retain(|(_, h, _)| *h != handle);
	}
}

/// [`Scheduler`] backed by [***setTimeout***](https://developer.mozilla.org/en-US/docs/Web/API/setTimeout).
///
/// Due tasks are passed to the `dispatch` callback given on construction,
/// each in its own browser task. Dropping the scheduler clears all outstanding timeouts.
pub struct WindowScheduler {
	window: web_sys::Window,
	dispatch: Rc<dyn Fn(TimerHandle, Task)>,
	next_id: u32,
	/// Our handles to the browser's timeout ids.
	pending: Rc<RefCell<HashMap<TimerHandle, i32>>>,
}
impl WindowScheduler {
	pub fn new(window: web_sys::Window, dispatch: impl 'static + Fn(TimerHandle, Task)) -> Self {
		Self {
			window,
			dispatch: Rc::new(dispatch),
			next_id: 0,
			pending: Rc::default(),
		}
	}
}
impl core::fmt::Debug for WindowScheduler {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("WindowScheduler")
			.field("next_id", &self.next_id)
			.field("pending", &self.pending.borrow().len())
			.finish_non_exhaustive()
	}
}
impl Scheduler for WindowScheduler {
	fn now(&self) -> f64 {
		js_sys::Date::now()
	}

	#[instrument(skip(self))]
	fn schedule(&mut self, delay_ms: u32, task: Task) -> TimerHandle {
		let handle = TimerHandle(self.next_id);
		self.next_id += 1;

		let dispatch = Rc::clone(&self.dispatch);
		let pending = Rc::clone(&self.pending);
		let callback = Closure::once_into_js(move || {
			if pending.borrow_mut().remove(&handle).is_some() {
				trace!(?handle, "Timeout fired.");
				dispatch(handle, task);
			}
		});

		let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
		match self.window.set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay) {
			Ok(timeout_id) => {
				self.pending.borrow_mut().insert(handle, timeout_id);
			}
			Err(error) => error!("Failed to schedule timeout: {:?}", error),
		}
		handle
	}

	#[instrument(skip(self))]
	fn cancel(&mut self, handle: TimerHandle) {
		if let Some(timeout_id) = self.pending.borrow_mut().remove(&handle) {
			self.window.clear_timeout_with_handle(timeout_id);
			trace!("Cleared timeout.");
		}
	}
}
impl Drop for WindowScheduler {
	fn drop(&mut self) {
		for (_, timeout_id) in self.pending.borrow_mut().drain() {
			self.window.clear_timeout_with_handle(timeout_id);
		}
	}
}
