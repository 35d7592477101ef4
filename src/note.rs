//! The note data model.

use core::fmt::{self, Display, Formatter};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque, stable identity of a [`Note`].
///
/// Generated once when the note is created and never derived from the note's position,
/// so removals stay correct while other rows are animating out or after the list changed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);
impl NoteId {
	/// Generates a fresh random (v4 UUID) id.
	#[must_use]
	pub fn generate() -> Self {
		Self(Uuid::new_v4().to_string())
	}

	#[must_use]
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl From<String> for NoteId {
	fn from(id: String) -> Self {
		Self(id)
	}
}
impl From<&str> for NoteId {
	fn from(id: &str) -> Self {
		Self(id.to_owned())
	}
}
impl AsRef<str> for NoteId {
	fn as_ref(&self) -> &str {
		self.as_str()
	}
}
impl Display for NoteId {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// A single user-entered text item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
	pub id: NoteId,
	/// Trimmed, never empty.
	pub text: String,
}
impl Note {
	/// Creates a note with a freshly generated id.
	///
	/// Returns [`None`] if `text` is blank once trimmed.
	#[must_use]
	pub fn new(text: &str) -> Option<Self> {
		let text = text.trim();
		if text.is_empty() {
			None
		} else {
			Some(Self {
				id: NoteId::generate(),
				text: text.to_owned(),
			})
		}
	}
}
