//! The notes widget: every user interaction and timer continuation, independent of the browser.
//!
//! Each handler mutates the [`NoteStore`] (which persists), then re-renders the whole [`Surface`].
//! Handlers run one at a time, so no further synchronisation is needed.

use crate::{
	config::Config,
	confirm::{ClearConfirmation, ClearDecision},
	note::{Note, NoteId},
	render::{RenderPass, Surface},
	schedule::{ManualScheduler, Scheduler, Task, TimerHandle},
	storage::{Storage, StorageError},
	store::NoteStore,
};
use hashbrown::HashMap;
use tracing::{debug, instrument, trace, warn};

#[derive(Debug)]
pub struct NotesWidget<S: Storage, V: Surface, T: Scheduler> {
	store: NoteStore<S>,
	surface: V,
	scheduler: T,
	confirmation: ClearConfirmation,
	/// Notes whose rows are animating out.
	pending_deletes: HashMap<NoteId, TimerHandle>,
	delete_fade_ms: u32,
	storage_error: String,
}
impl<S: Storage, V: Surface, T: Scheduler> NotesWidget<S, V, T> {
	/// Takes over an already loaded store. Nothing is drawn until [`render`](`NotesWidget::render`) is called.
	pub fn new(store: NoteStore<S>, surface: V, scheduler: T, config: &Config) -> Self {
		Self {
			store,
			surface,
			scheduler,
			confirmation: ClearConfirmation::new(config.confirm_timeout_ms),
			pending_deletes: HashMap::new(),
			delete_fade_ms: config.delete_fade_ms,
			storage_error: config.labels.storage_error.clone(),
		}
	}

	#[must_use]
	pub fn notes(&self) -> &[Note] {
		self.store.notes()
	}

	#[must_use]
	pub fn store(&self) -> &NoteStore<S> {
		&self.store
	}

	#[must_use]
	pub fn surface(&self) -> &V {
		&self.surface
	}

	pub fn surface_mut(&mut self) -> &mut V {
		&mut self.surface
	}

	#[must_use]
	pub fn scheduler(&self) -> &T {
		&self.scheduler
	}

	#[must_use]
	pub fn confirmation(&self) -> &ClearConfirmation {
		&self.confirmation
	}

	#[must_use]
	pub fn is_deleting(&self, id: &NoteId) -> bool {
		self.pending_deletes.contains_key(id)
	}

	/// One full render pass of the current list.
	#[instrument(skip(self))]
	pub fn render(&mut self) {
		let pass = RenderPass::of(self.store.notes());
		trace!(rows = pass.rows.len(), "Rendering.");
		self.surface.apply(&pass);
	}

	/// Adds a note from the input form.
	///
	/// Blank text is ignored and leaves the form as it is.
	#[instrument(skip(self, text))]
	pub fn submit(&mut self, text: &str) -> Option<Note> {
		let result = self.store.add(text);
		match self.settle(result) {
			Some(Some(note)) => {
				self.render();
				self.surface.reset_input();
				Some(note)
			}
			Some(None) | None => None,
		}
	}

	/// Handles a click on a row's delete control.
	///
	/// Unknown ids and rows that are already animating out are ignored.
	/// Returns whether a deletion was started.
	#[instrument(skip(self, id), fields(id = %id))]
	pub fn request_delete(&mut self, id: NoteId) -> bool {
		if !self.store.contains(&id) {
			trace!("Delete target is not a note (anymore).");
			return false;
		}
		if self.pending_deletes.contains_key(&id) {
			trace!("Already deleting.");
			return false;
		}

		if self.delete_fade_ms == 0 {
			return self.commit_delete(&id);
		}

		self.surface.mark_removing(&id);
		let handle = self.scheduler.schedule(self.delete_fade_ms, Task::CommitDelete(id.clone()));
		self.pending_deletes.insert(id, handle);
		true
	}

	/// Removes the note now. Removing a missing note is a no-op.
	#[instrument(skip(self, id), fields(id = %id))]
	pub fn commit_delete(&mut self, id: &NoteId) -> bool {
		if let Some(handle) = self.pending_deletes.remove(id) {
			self.scheduler.cancel(handle);
		}

		let result = self.store.remove(id);
		let removed = self.settle(result).unwrap_or(false);
		self.after_shrink();
		self.render();
		removed
	}

	/// Handles a click on the bulk-clear control.
	#[instrument(skip(self))]
	pub fn click_clear(&mut self) -> ClearDecision {
		let decision = self.confirmation.click(!self.store.is_empty(), &mut self.scheduler);
		match decision {
			ClearDecision::Ignore => (),
			ClearDecision::Arm => self.surface.show_clear_armed(true),
			ClearDecision::Confirm => {
				let result = self.store.clear();
				if self.settle(result).is_some() {
					for (_, handle) in self.pending_deletes.drain() {
						self.scheduler.cancel(handle);
					}
				}
				self.surface.show_clear_armed(false);
				self.render();
			}
		}
		decision
	}

	/// Runs a task handed back by the [`Scheduler`].
	#[instrument(skip(self))]
	pub fn run(&mut self, handle: TimerHandle, task: Task) {
		match task {
			Task::DisarmClear => {
				if self.confirmation.expire(handle) {
					self.surface.show_clear_armed(false);
				}
			}
			Task::CommitDelete(id) => {
				if self.pending_deletes.get(&id) == Some(&handle) {
					self.commit_delete(&id);
				} else {
					trace!(id = %id, "Ignored stale deletion.");
				}
			}
		}
	}

	pub fn show_advice(&mut self, text: &str) {
		self.surface.show_advice(text);
	}

	/// Cancels everything still scheduled. Pending deletions are dropped, not committed.
	#[instrument(skip(self))]
	pub fn shut_down(&mut self) {
		if self.confirmation.disarm(&mut self.scheduler) {
			self.surface.show_clear_armed(false);
		}
		for (_, handle) in self.pending_deletes.drain() {
			self.scheduler.cancel(handle);
		}
		debug!("Shut down.");
	}

	/// Surfaces storage failures, clearing a previous failure message on success.
	///
	/// Returns `None` iff the operation failed (and was rolled back by the store).
	fn settle<R>(&mut self, result: Result<R, StorageError>) -> Option<R> {
		match result {
			Ok(value) => {
				self.surface.show_status(None);
				Some(value)
			}
			Err(error) => {
				warn!("Change not saved: {}", error);
				self.surface.show_status(Some(&self.storage_error));
				None
			}
		}
	}

	/// The bulk-clear control is hidden once nothing is left, so it shouldn't stay armed behind the scenes.
	fn after_shrink(&mut self) {
		if self.store.is_empty() && self.confirmation.disarm(&mut self.scheduler) {
			self.surface.show_clear_armed(false);
		}
	}
}

impl<S: Storage, V: Surface> NotesWidget<S, V, ManualScheduler> {
	/// Advances the [`ManualScheduler`]'s clock and runs every task that became due.
	pub fn advance(&mut self, ms: u32) {
		for (handle, task) in self.scheduler.advance(ms) {
			self.run(handle, task);
		}
	}
}
