//! The two-step confirmation guarding bulk clear.

use crate::schedule::{Scheduler, Task, TimerHandle};
use tracing::{debug, instrument, trace};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfirmationState {
	Idle,
	/// The next click clears all notes, unless `deadline` passes first.
	Armed { timer: TimerHandle, deadline: f64 },
}

/// What a click on the bulk-clear control amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearDecision {
	/// Nothing to clear. The state is unchanged.
	Ignore,
	/// First click: now waiting for a confirming one.
	Arm,
	/// Second click inside the window: clear now.
	Confirm,
}

/// `Idle --click--> Armed --click--> Idle (clear)`, with `Armed --timeout--> Idle`.
///
/// At most one expiry timer is outstanding at any time.
#[derive(Debug, Clone)]
pub struct ClearConfirmation {
	state: ConfirmationState,
	timeout_ms: u32,
}
impl ClearConfirmation {
	#[must_use]
	pub fn new(timeout_ms: u32) -> Self {
		Self {
			state: ConfirmationState::Idle,
			timeout_ms,
		}
	}

	#[must_use]
	pub fn state(&self) -> ConfirmationState {
		self.state
	}

	#[must_use]
	pub fn is_armed(&self) -> bool {
		matches!(self.state, ConfirmationState::Armed { .. })
	}

	#[must_use]
	pub fn timeout_ms(&self) -> u32 {
		self.timeout_ms
	}

	/// Handles a click on the bulk-clear control.
	///
	/// A click with nothing to clear is ignored in either state.
	/// A click arriving after the deadline (if the expiry timer was throttled) counts as a new first click.
	#[instrument(skip(self, scheduler))]
	pub fn click(&mut self, has_notes: bool, scheduler: &mut impl Scheduler) -> ClearDecision {
		if !has_notes {
			trace!("Nothing to clear.");
			return ClearDecision::Ignore;
		}

		match self.state {
			ConfirmationState::Armed { timer, deadline } if scheduler.now() < deadline => {
				scheduler.cancel(timer);
				self.state = ConfirmationState::Idle;
				debug!("Confirmed.");
				ClearDecision::Confirm
			}
			ConfirmationState::Armed { .. } => {
				debug!("Confirmation window already passed, re-arming.");
				self.arm(scheduler);
				ClearDecision::Arm
			}
			ConfirmationState::Idle => {
				self.arm(scheduler);
				ClearDecision::Arm
			}
		}
	}

	fn arm(&mut self, scheduler: &mut impl Scheduler) {
		if let ConfirmationState::Armed { timer, .. } = self.state {
			scheduler.cancel(timer);
		}
		let timer = scheduler.schedule(self.timeout_ms, Task::DisarmClear);
		self.state = ConfirmationState::Armed {
			timer,
			deadline: scheduler.now() + f64::from(self.timeout_ms),
		};
		debug!(?timer, "Armed.");
	}

	/// Handles the expiry timer firing.
	///
	/// Returns whether this disarmed the confirmation. Stale handles don't.
	#[instrument(skip(self))]
	pub fn expire(&mut self, handle: TimerHandle) -> bool {
		match self.state {
			ConfirmationState::Armed { timer, .. } if timer == handle => {
				self.state = ConfirmationState::Idle;
				debug!("Expired.");
				true
			}
			_ => {
				trace!("Ignored stale expiry.");
				false
			}
		}
	}

	/// Returns to [`ConfirmationState::Idle`] without clearing, cancelling the timer.
	///
	/// Returns whether the confirmation was armed.
	pub fn disarm(&mut self, scheduler: &mut impl Scheduler) -> bool {
		match self.state {
			ConfirmationState::Armed { timer, .. } => {
				scheduler.cancel(timer);
				self.state = ConfirmationState::Idle;
				true
			}
			ConfirmationState::Idle => false,
		}
	}
}
