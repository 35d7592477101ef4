//! The browser [`Surface`]: rows cloned from a `<template>` into the page's note list.

use crate::{
	config::{Classes, Config, Labels, Selectors},
	note::NoteId,
	render::{RenderPass, Surface},
	storage::StorageError,
};
use hashbrown::HashSet;
use thiserror::Error;
use tracing::{error, instrument, trace, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, DocumentFragment, Element, Event, HtmlElement, HtmlFormElement, HtmlInputElement, HtmlTemplateElement};

/// Attribute carrying a note's id on its delete control.
pub const ID_ATTRIBUTE: &str = "data-id";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MountError {
	#[error("no global `window` exists")]
	NoWindow,
	#[error("the window has no document")]
	NoDocument,
	#[error("no element matches {selector:?}")]
	MissingElement { selector: String },
	#[error("the element matching {selector:?} is not a {expected}")]
	WrongElement { selector: String, expected: &'static str },
	#[error("invalid selector {selector:?}: {message}")]
	Selector { selector: String, message: String },
	#[error("invalid configuration: {0}")]
	Config(String),
	#[error("failed to add event listener: {0}")]
	Listener(String),
	#[error(transparent)]
	Storage(#[from] StorageError),
}
impl From<MountError> for JsValue {
	fn from(error: MountError) -> Self {
		js_sys::Error::new(&error.to_string()).into()
	}
}

fn describe(error: &JsValue) -> String {
	error.as_string().unwrap_or_else(|| format!("{:?}", error))
}

/// Finds the element matching `selector` and casts it to `E`.
///
/// # Errors
///
/// Iff the selector is invalid, matches nothing, or matches an element of another type.
pub fn find<E: JsCast>(document: &Document, selector: &str, expected: &'static str) -> Result<E, MountError> {
	document
		.query_selector(selector)
		.map_err(|error| MountError::Selector {
			selector: selector.to_owned(),
			message: describe(&error),
		})?
		.ok_or_else(|| MountError::MissingElement { selector: selector.to_owned() })?
		.dyn_into::<E>()
		.map_err(|_| MountError::WrongElement {
			selector: selector.to_owned(),
			expected,
		})
}

/// Maps a click anywhere in the note list to the note whose delete control was hit.
///
/// Starts at the event's target and walks up to the nearest element matching `delete_selector`.
/// Returns [`None`] for clicks elsewhere and for controls without an id.
#[must_use]
pub fn delete_target(event: &Event, delete_selector: &str) -> Option<NoteId> {
	let target = event.target()?;
	let element = match target.dyn_into::<Element>() {
		Ok(element) => element,
		Err(target) => target.dyn_into::<web_sys::Node>().ok()?.parent_element()?,
	};
	let control = match element.closest(delete_selector) {
		Ok(control) => control?,
		Err(error) => {
			error!("Invalid delete control selector {:?}: {:?}", delete_selector, error);
			return None;
		}
	};
	control.get_attribute(ID_ATTRIBUTE).filter(|id| !id.is_empty()).map(NoteId::from)
}

/// Draws into the stock page markup.
#[derive(Debug)]
pub struct DomSurface {
	document: Document,
	form: HtmlFormElement,
	input: HtmlInputElement,
	list: Element,
	template: HtmlTemplateElement,
	clear_button: HtmlElement,
	advice: Element,
	status: Option<HtmlElement>,
	/// Rows mid-animation. Redrawn rows keep fading.
	removing: HashSet<NoteId>,
	selectors: Selectors,
	classes: Classes,
	labels: Labels,
}
impl DomSurface {
	/// Locates all parts of the widget.
	///
	/// The status element is optional. Everything else has to exist.
	///
	/// # Errors
	///
	/// Iff a required element is missing or of the wrong kind.
	#[instrument(skip(document, config))]
	pub fn new(document: &Document, config: &Config) -> Result<Self, MountError> {
		let selectors = &config.selectors;
		let status = match &selectors.status {
			Some(selector) => match find::<HtmlElement>(document, selector, "HTML element") {
				Ok(status) => Some(status),
				Err(error) => {
					trace!("No status element: {}", error);
					None
				}
			},
			None => None,
		};

		Ok(Self {
			document: document.clone(),
			form: find(document, &selectors.form, "<form>")?,
			input: find(document, &selectors.input, "<input>")?,
			list: find(document, &selectors.list, "element")?,
			template: find(document, &selectors.template, "<template>")?,
			clear_button: find(document, &selectors.clear_all, "HTML element")?,
			advice: find(document, &selectors.advice, "element")?,
			status,
			removing: HashSet::new(),
			selectors: selectors.clone(),
			classes: config.classes.clone(),
			labels: config.labels.clone(),
		})
	}

	#[must_use]
	pub fn form(&self) -> &HtmlFormElement {
		&self.form
	}

	#[must_use]
	pub fn input(&self) -> &HtmlInputElement {
		&self.input
	}

	#[must_use]
	pub fn list(&self) -> &Element {
		&self.list
	}

	#[must_use]
	pub fn clear_button(&self) -> &HtmlElement {
		&self.clear_button
	}

	/// Builds one row off-tree.
	fn build_row(&self, id: &NoteId, text: &str) -> Result<DocumentFragment, JsValue> {
		let row: DocumentFragment = self.template.content().clone_node_with_deep(true)?.unchecked_into();

		match row.query_selector(&self.selectors.note_text)? {
			// Text only: `set_text_content` never parses markup.
			Some(text_element) => text_element.set_text_content(Some(text)),
			None => warn!("Row template has no {:?} element.", self.selectors.note_text),
		}
		match row.query_selector(&self.selectors.delete_button)? {
			Some(delete_button) => delete_button.set_attribute(ID_ATTRIBUTE, id.as_str())?,
			None => warn!("Row template has no {:?} element.", self.selectors.delete_button),
		}
		if self.removing.contains(id) {
			if let Some(element) = row.query_selector(&self.selectors.row)? {
				element.class_list().add_1(&self.classes.removing)?;
			}
		}
		Ok(row)
	}

	/// The element animated out when `id`'s note is deleted.
	fn row_element(&self, id: &NoteId) -> Option<Element> {
		let controls = self.list.query_selector_all(&self.selectors.delete_button).ok()?;
		let control = (0..controls.length())
			.filter_map(|i| controls.get(i))
			.filter_map(|node| node.dyn_into::<Element>().ok())
			.find(|control| control.get_attribute(ID_ATTRIBUTE).as_deref() == Some(id.as_str()))?;
		match control.closest(&self.selectors.row) {
			Ok(Some(row)) => Some(row),
			_ => control.parent_element(),
		}
	}
}
impl Surface for DomSurface {
	#[instrument(skip(self, pass), fields(rows = pass.rows.len()))]
	fn apply(&mut self, pass: &RenderPass<'_>) {
		self.removing.retain(|id| pass.rows.iter().any(|row| row.id == id));

		let fragment = self.document.create_document_fragment();
		for row in &pass.rows {
			match self.build_row(row.id, row.text) {
				Ok(built) => {
					if let Err(error) = fragment.append_child(&built) {
						error!("Failed to collect row: {:?}", error);
					}
				}
				Err(error) => error!("Failed to build row for {}: {:?}", row.id, error),
			}
		}

		// Emptied and refilled in the same task.
		self.list.set_text_content(None);
		if let Err(error) = self.list.append_child(&fragment) {
			error!("Failed to insert rows: {:?}", error);
		}

		let visibility = if pass.clear_visible { "visible" } else { "hidden" };
		if let Err(error) = self.clear_button.style().set_property("visibility", visibility) {
			error!("Failed to set bulk-clear visibility: {:?}", error);
		}
	}

	#[instrument(skip(self))]
	fn show_clear_armed(&mut self, armed: bool) {
		let class_list = self.clear_button.class_list();
		let result = if armed {
			class_list.add_1(&self.classes.confirming)
		} else {
			class_list.remove_1(&self.classes.confirming)
		};
		if let Err(error) = result {
			error!("Failed to toggle {:?}: {:?}", self.classes.confirming, error);
		}

		let label = if armed { &self.labels.confirm } else { &self.labels.clear_all };
		self.clear_button.set_text_content(Some(label.as_str()));
		if let Err(error) = self.clear_button.set_attribute("aria-pressed", if armed { "true" } else { "false" }) {
			error!("Failed to set aria-pressed: {:?}", error);
		}
	}

	#[instrument(skip(self, id), fields(id = %id))]
	fn mark_removing(&mut self, id: &NoteId) {
		self.removing.insert(id.clone());
		match self.row_element(id) {
			Some(row) => {
				if let Err(error) = row.class_list().add_1(&self.classes.removing) {
					error!("Failed to start removal animation: {:?}", error);
				}
			}
			None => trace!("No row shown."),
		}
	}

	fn show_advice(&mut self, text: &str) {
		self.advice.set_text_content(Some(text));
	}

	fn show_status(&mut self, message: Option<&str>) {
		match (&self.status, message) {
			(Some(status), message) => {
				status.set_text_content(message);
				status.set_hidden(message.is_none());
			}
			(None, Some(message)) => warn!("No status element to show {:?} in.", message),
			(None, None) => (),
		}
	}

	fn reset_input(&mut self) {
		self.form.reset();
	}
}
