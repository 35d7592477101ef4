//! Projection of the note list onto a display [`Surface`].

use crate::note::{Note, NoteId};
use hashbrown::HashSet;

/// One displayed note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteRow<'a> {
	/// Tagged onto the row's delete control.
	pub id: &'a NoteId,
	/// Shown as plain text, never interpreted as markup.
	pub text: &'a str,
}

/// Everything a render pass puts on screen, derived only from the note list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPass<'a> {
	pub rows: Vec<NoteRow<'a>>,
	pub clear_visible: bool,
}
impl<'a> RenderPass<'a> {
	#[must_use]
	pub fn of(notes: &'a [Note]) -> Self {
		Self {
			rows: notes.iter().map(|note| NoteRow { id: &note.id, text: &note.text }).collect(),
			clear_visible: !notes.is_empty(),
		}
	}
}

/// The display the widget draws into.
pub trait Surface {
	/// Replaces all previously shown rows with `pass.rows` and sets the bulk-clear control's visibility.
	///
	/// Applying the same pass twice in a row must look the same as applying it once.
	fn apply(&mut self, pass: &RenderPass<'_>);

	/// Shows (`true`) or withdraws the "are you sure?" affordance on the bulk-clear control.
	fn show_clear_armed(&mut self, armed: bool);

	/// Starts the removal animation of the row for `id`, if it is shown.
	fn mark_removing(&mut self, id: &NoteId);

	fn show_advice(&mut self, text: &str);

	/// Shows or hides (`None`) a message about a failed save.
	fn show_status(&mut self, message: Option<&str>);

	/// Empties the input form after a note was added.
	fn reset_input(&mut self);
}

/// A [`Surface`] that just remembers what it shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySurface {
	pub rows: Vec<(NoteId, String)>,
	pub clear_visible: bool,
	pub clear_armed: bool,
	pub removing: HashSet<NoteId>,
	pub advice: Option<String>,
	pub status: Option<String>,
	pub input_resets: usize,
	pub passes: usize,
}
impl MemorySurface {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn texts(&self) -> Vec<&str> {
		self.rows.iter().map(|(_, text)| text.as_str()).collect()
	}
}
impl Surface for MemorySurface {
	fn apply(&mut self, pass: &RenderPass<'_>) {
		self.rows = pass.rows.iter().map(|row| (row.id.clone(), row.text.to_owned())).collect();
		self.removing.retain(|id| pass.rows.iter().any(|row| row.id == id));
		self.clear_visible = pass.clear_visible;
		self.passes += 1;
	}

	fn show_clear_armed(&mut self, armed: bool) {
		self.clear_armed = armed;
	}

	fn mark_removing(&mut self, id: &NoteId) {
		if self.rows.iter().any(|(row_id, _)| row_id == id) {
			self.removing.insert(id.clone());
		}
	}

	fn show_advice(&mut self, text: &str) {
		self.advice = Some(text.to_owned());
	}

	fn show_status(&mut self, message: Option<&str>) {
		self.status = message.map(ToOwned::to_owned);
	}

	fn reset_input(&mut self) {
		self.input_resets += 1;
	}
}
