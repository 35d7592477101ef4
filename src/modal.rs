//! The page's dialog: one control opens it, any number of controls close it.

use crate::{config::ModalConfig, listener::EventListener};
use tracing::{debug, error, instrument, trace};
use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

#[derive(Debug)]
pub struct Modal {
	dialog: Element,
	class: String,
	_listeners: Vec<EventListener>,
}
impl Modal {
	/// Wires up the dialog in `document`.
	///
	/// Returns [`None`] if the page has no dialog or no control to open it.
	///
	/// # Errors
	///
	/// Iff a selector is invalid or a listener couldn't be added.
	#[instrument(skip(document))]
	pub fn attach(document: &Document, config: &ModalConfig) -> Result<Option<Self>, JsValue> {
		let (dialog, open) = match (document.query_selector(&config.dialog)?, document.query_selector(&config.open)?) {
			(Some(dialog), Some(open)) => (dialog, open),
			_ => {
				trace!("No dialog on this page.");
				return Ok(None);
			}
		};

		let mut listeners = vec![EventListener::new(open.as_ref(), "click", {
			let dialog = dialog.clone();
			let class = config.class.clone();
			move |_| set_open(&dialog, &class, true)
		})?];

		let closers = document.query_selector_all(&config.close)?;
		for closer in (0..closers.length()).filter_map(|i| closers.get(i)) {
			let dialog = dialog.clone();
			let class = config.class.clone();
			listeners.push(EventListener::new(closer.as_ref(), "click", move |_| set_open(&dialog, &class, false))?);
		}
		debug!("Dialog wired with {} closing control(s).", listeners.len() - 1);

		Ok(Some(Self {
			dialog,
			class: config.class.clone(),
			_listeners: listeners,
		}))
	}

	#[must_use]
	pub fn is_open(&self) -> bool {
		self.dialog.class_list().contains(&self.class)
	}

	pub fn open(&self) {
		set_open(&self.dialog, &self.class, true);
	}

	pub fn close(&self) {
		set_open(&self.dialog, &self.class, false);
	}
}

fn set_open(dialog: &Element, class: &str, open: bool) {
	let class_list = dialog.class_list();
	let result = if open { class_list.add_1(class) } else { class_list.remove_1(class) };
	match result {
		Ok(()) => trace!(open, "Toggled dialog."),
		Err(error) => error!("Failed to toggle dialog: {:?}", error),
	}
}
