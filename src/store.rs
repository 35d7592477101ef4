//! The in-memory note list and its synchronisation with [`Storage`].

use crate::{
	note::{Note, NoteId},
	storage::{Storage, StorageError},
};
use core::mem;
use hashbrown::HashSet;
use serde::Deserialize;
use tracing::{debug, error, info, instrument, trace, warn};

/// Single source of truth for the note list.
///
/// # Invariant
///
/// Whenever a mutating method returns, the list held in memory is exactly the one last written to storage.
/// If that write fails, the mutation is rolled back before the error is returned.
#[derive(Debug)]
pub struct NoteStore<S: Storage> {
	storage: S,
	key: String,
	notes: Vec<Note>,
}

/// Shapes accepted when loading.
#[derive(Deserialize)]
#[serde(untagged)]
enum Persisted {
	Notes(Vec<Note>),
	/// Older pages stored bare strings and addressed them by position.
	Texts(Vec<String>),
}

impl<S: Storage> NoteStore<S> {
	/// Loads the list stored under `key`.
	///
	/// A missing key, unreadable storage or malformed content all result in an empty list.
	/// This never fails.
	#[instrument(skip(storage))]
	pub fn load(storage: S, key: &str) -> Self {
		let notes = match storage.get(key) {
			Ok(Some(json)) => parse(&json),
			Ok(None) => {
				trace!("No stored notes.");
				Vec::new()
			}
			Err(error) => {
				warn!("Failed to read stored notes, starting empty: {}", error);
				Vec::new()
			}
		};
		info!("Loaded {} note(s).", notes.len());
		Self {
			storage,
			key: key.to_owned(),
			notes,
		}
	}

	#[must_use]
	pub fn notes(&self) -> &[Note] {
		&self.notes
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.notes.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.notes.is_empty()
	}

	#[must_use]
	pub fn get(&self, id: &NoteId) -> Option<&Note> {
		self.notes.iter().find(|note| &note.id == id)
	}

	#[must_use]
	pub fn contains(&self, id: &NoteId) -> bool {
		self.get(id).is_some()
	}

	#[must_use]
	pub fn storage(&self) -> &S {
		&self.storage
	}

	#[must_use]
	pub fn key(&self) -> &str {
		&self.key
	}

	/// Appends a new note with a fresh id.
	///
	/// Blank `text` is rejected with `Ok(None)` and leaves both the list and storage alone.
	///
	/// # Errors
	///
	/// Iff the updated list couldn't be written. The note is not kept in that case.
	#[instrument(skip(self, text), fields(len = text.len()))]
	pub fn add(&mut self, text: &str) -> Result<Option<Note>, StorageError> {
		let note = match Note::new(text) {
			Some(note) => note,
			None => {
				trace!("Rejected blank note.");
				return Ok(None);
			}
		};

		self.notes.push(note.clone());
		if let Err(error) = self.persist() {
			self.notes.pop();
			return Err(error);
		}

		if cfg!(feature = "dangerous-logging") {
			debug!(id = %note.id, text = %note.text, "Added note.");
		} else {
			debug!(id = %note.id, "Added note.");
		}
		Ok(Some(note))
	}

	/// Removes the note with the given `id`.
	///
	/// Returns `false`, without writing anything, if there is no such note.
	/// Removing the same id twice therefore only ever removes one note.
	///
	/// # Errors
	///
	/// Iff the updated list couldn't be written. The note is restored in place in that case.
	#[instrument(skip(self, id), fields(id = %id))]
	pub fn remove(&mut self, id: &NoteId) -> Result<bool, StorageError> {
		let index = match self.notes.iter().position(|note| &note.id == id) {
			Some(index) => index,
			None => {
				trace!("No such note.");
				return Ok(false);
			}
		};

		let removed = self.notes.remove(index);
		if let Err(error) = self.persist() {
			self.notes.insert(index, removed);
			return Err(error);
		}
		debug!("Removed note.");
		Ok(true)
	}

	/// Removes all notes.
	///
	/// # Errors
	///
	/// Iff the empty list couldn't be written. The previous notes are restored in that case.
	#[instrument(skip(self))]
	pub fn clear(&mut self) -> Result<(), StorageError> {
		let previous = mem::take(&mut self.notes);
		if let Err(error) = self.persist() {
			self.notes = previous;
			return Err(error);
		}
		debug!("Cleared {} note(s).", previous.len());
		Ok(())
	}

	/// Writes the whole current list to storage in one `set`.
	///
	/// # Errors
	///
	/// Iff the storage rejected the write.
	#[instrument(skip(self))]
	pub fn persist(&mut self) -> Result<(), StorageError> {
		let json = serde_json::to_string(&self.notes).map_err(|error| StorageError::Encode(error.to_string()))?;
		self.storage.set(&self.key, &json).map_err(|error| {
			error!("Failed to persist {} note(s): {}", self.notes.len(), error);
			error
		})
	}
}

/// Parses stored notes, trimming texts, dropping blank entries and replacing duplicate ids.
fn parse(json: &str) -> Vec<Note> {
	let mut notes = match serde_json::from_str::<Persisted>(json) {
		Ok(Persisted::Notes(notes)) => notes,
		Ok(Persisted::Texts(texts)) => {
			info!("Migrating {} note(s) stored without ids.", texts.len());
			texts.iter().map(String::as_str).filter_map(Note::new).collect()
		}
		Err(error) => {
			warn!("Stored notes are malformed, starting empty: {}", error);
			return Vec::new();
		}
	};

	for note in &mut notes {
		let trimmed = note.text.trim();
		if trimmed.len() != note.text.len() {
			note.text = trimmed.to_owned();
		}
	}
	notes.retain(|note| !note.text.is_empty());

	let mut seen = HashSet::with_capacity(notes.len());
	for note in &mut notes {
		if !seen.insert(note.id.clone()) {
			warn!(id = %note.id, "Duplicate stored note id, assigning a new one.");
			note.id = NoteId::generate();
			seen.insert(note.id.clone());
		}
	}
	notes
}
