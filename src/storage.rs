//! Synchronous key-value persistence, as provided by [***Window.localStorage***](https://developer.mozilla.org/en-US/docs/Web/API/Window/localStorage).

use hashbrown::HashMap;
use thiserror::Error;
use tracing::{instrument, trace};
use wasm_bindgen::JsValue;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
	#[error("storage is unavailable: {0}")]
	Unavailable(String),
	#[error("storage quota exceeded while writing {key:?} ({needed} bytes needed, {available} available)")]
	QuotaExceeded { key: String, needed: usize, available: usize },
	#[error("storage access failed: {0}")]
	Js(String),
	#[error("failed to encode notes: {0}")]
	Encode(String),
}
impl From<JsValue> for StorageError {
	fn from(error: JsValue) -> Self {
		Self::Js(error.as_string().unwrap_or_else(|| format!("{:?}", error)))
	}
}

/// A string-to-string store scoped to one origin.
///
/// Last write wins. There is no contention, since all access happens on the UI thread.
pub trait Storage {
	/// # Errors
	///
	/// Iff the backing store couldn't be read at all. A missing key is `Ok(None)`.
	fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

	/// Replaces the value stored under `key` in one step.
	///
	/// # Errors
	///
	/// Iff the value wasn't written, for example because the quota was exceeded.
	fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for &mut S {
	fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
		(**self).get(key)
	}

	fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
		(**self).set(key, value)
	}
}

impl<S: Storage + ?Sized> Storage for Box<S> {
	fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
		(**self).get(key)
	}

	fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
		(**self).set(key, value)
	}
}

/// In-process [`Storage`], with an optional byte quota to emulate a full `localStorage`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
	entries: HashMap<String, String>,
	quota: Option<usize>,
}
impl MemoryStorage {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Limits the summed length of all keys and values to `quota` bytes.
	#[must_use]
	pub fn with_quota(quota: usize) -> Self {
		Self {
			entries: HashMap::new(),
			quota: Some(quota),
		}
	}

	pub fn set_quota(&mut self, quota: Option<usize>) {
		self.quota = quota;
	}

	fn used_except(&self, key: &str) -> usize {
		self.entries.iter().filter(|(k, _)| k.as_str() != key).map(|(k, v)| k.len() + v.len()).sum()
	}
}
impl Storage for MemoryStorage {
	fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
		Ok(self.entries.get(key).cloned())
	}

	#[instrument(skip(self, value), fields(len = value.len()))]
	fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
		if let Some(quota) = self.quota {
			let needed = key.len() + value.len();
			let available = quota.saturating_sub(self.used_except(key));
			if needed > available {
				return Err(StorageError::QuotaExceeded {
					key: key.to_owned(),
					needed,
					available,
				});
			}
		}
		self.entries.insert(key.to_owned(), value.to_owned());
		trace!("Stored.");
		Ok(())
	}
}

/// [`Storage`] backed by a [`web_sys::Storage`], normally the window's `localStorage`.
#[derive(Debug, Clone)]
pub struct WebStorage(web_sys::Storage);
impl WebStorage {
	#[must_use]
	pub fn new(storage: web_sys::Storage) -> Self {
		Self(storage)
	}

	/// # Errors
	///
	/// Iff `localStorage` is disabled or inaccessible, e.g. in some privacy modes.
	pub fn local(window: &web_sys::Window) -> Result<Self, StorageError> {
		match window.local_storage()? {
			Some(storage) => Ok(Self(storage)),
			None => Err(StorageError::Unavailable("`window.localStorage` is `null`".to_owned())),
		}
	}
}
impl Storage for WebStorage {
	fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
		Ok(self.0.get_item(key)?)
	}

	#[instrument(skip(self, value), fields(len = value.len()))]
	fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
		self.0.set_item(key, value)?;
		trace!("Stored.");
		Ok(())
	}
}
