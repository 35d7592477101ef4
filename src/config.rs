//! Widget configuration.
//!
//! Every field has a default matching the stock page markup, so an empty JSON object (`{}`) is a valid configuration.
//! Keys are camel-cased to match the JavaScript side, e.g. `{"storageKey": "my-notes", "confirmTimeoutMs": 5000}`.

use serde::{de, Deserialize};
use serde_json::Value;

pub const DEFAULT_ADVICE_URL: &str = "https://api.adviceslip.com/advice";
pub const DEFAULT_ADVICE_FALLBACK: &str = "Progress is progress, no matter how small.";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
	pub selectors: Selectors,
	pub classes: Classes,
	pub labels: Labels,
	/// `localStorage` key of the note list.
	pub storage_key: String,
	/// How long the bulk-clear control waits for the confirming click.
	pub confirm_timeout_ms: u32,
	/// Duration of a row's removal animation. `0` removes rows immediately.
	pub delete_fade_ms: u32,
	pub advice: AdviceConfig,
	pub reveal: RevealConfig,
	pub modal: ModalConfig,
}
impl Default for Config {
	fn default() -> Self {
		Self {
			selectors: Selectors::default(),
			classes: Classes::default(),
			labels: Labels::default(),
			storage_key: "notes".to_owned(),
			confirm_timeout_ms: 3000,
			delete_fade_ms: 300,
			advice: AdviceConfig::default(),
			reveal: RevealConfig::default(),
			modal: ModalConfig::default(),
		}
	}
}
impl Config {
	/// # Errors
	///
	/// Iff `json` isn't an object of known configuration keys.
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		let value: Value = serde_json::from_str(json)?;
		// Derived struct visitors also accept arrays, which `default` would silently pad out.
		if !value.is_object() || contains_array(&value) {
			return Err(de::Error::custom("configuration sections must be JSON objects"));
		}
		serde_json::from_value(value)
	}
}

/// No configuration value is a list.
fn contains_array(value: &Value) -> bool {
	match value {
		Value::Array(_) => true,
		Value::Object(map) => map.values().any(contains_array),
		_ => false,
	}
}

/// CSS selectors locating the widget's parts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Selectors {
	pub form: String,
	pub input: String,
	pub list: String,
	pub clear_all: String,
	pub advice: String,
	/// A `<template>` holding the markup of one row.
	pub template: String,
	/// Inside the template: receives the note text.
	pub note_text: String,
	/// Inside the template: the delete control, tagged with `data-id`.
	pub delete_button: String,
	/// Inside the template: the element animated out on deletion.
	pub row: String,
	/// Optional element for save failures.
	pub status: Option<String>,
}
impl Default for Selectors {
	fn default() -> Self {
		Self {
			form: "#noteForm".to_owned(),
			input: "#noteInput".to_owned(),
			list: "#notesList".to_owned(),
			clear_all: "#clearAllBtn".to_owned(),
			advice: "#adviceDisplay".to_owned(),
			template: "#noteTemplate".to_owned(),
			note_text: ".note-text".to_owned(),
			delete_button: ".delete-btn".to_owned(),
			row: "li".to_owned(),
			status: Some("#noteStatus".to_owned()),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Classes {
	/// Set on the bulk-clear control while armed.
	pub confirming: String,
	/// Set on a row while it animates out.
	pub removing: String,
	/// Removed from `<html>` on start.
	pub no_js: String,
}
impl Default for Classes {
	fn default() -> Self {
		Self {
			confirming: "confirming".to_owned(),
			removing: "fade-out".to_owned(),
			no_js: "no-js".to_owned(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Labels {
	pub clear_all: String,
	pub confirm: String,
	pub storage_error: String,
}
impl Default for Labels {
	fn default() -> Self {
		Self {
			clear_all: "Clear All".to_owned(),
			confirm: "Are you sure?".to_owned(),
			storage_error: "Your notes couldn't be saved. Browser storage may be full.".to_owned(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct AdviceConfig {
	pub url: String,
	/// Shown whenever the fetch fails. Blank values fall back to [`DEFAULT_ADVICE_FALLBACK`].
	pub fallback: String,
}
impl Default for AdviceConfig {
	fn default() -> Self {
		Self {
			url: DEFAULT_ADVICE_URL.to_owned(),
			fallback: DEFAULT_ADVICE_FALLBACK.to_owned(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct RevealConfig {
	pub selector: String,
	/// Added once an element was seen.
	pub class: String,
	/// Intersection ratio at which an observed element counts as seen.
	pub threshold: f64,
	/// Scroll fallback: an element is seen once its top is above this fraction of the viewport height.
	pub viewport_fraction: f64,
}
impl Default for RevealConfig {
	fn default() -> Self {
		Self {
			selector: ".observe".to_owned(),
			class: "show".to_owned(),
			threshold: 0.1,
			viewport_fraction: 0.85,
		}
	}
}

/// The page's optional dialog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ModalConfig {
	/// The control that opens the dialog. Only the first match is used.
	pub open: String,
	pub dialog: String,
	/// Every match closes the dialog.
	pub close: String,
	/// Present on the dialog while it's open.
	pub class: String,
}
impl Default for ModalConfig {
	fn default() -> Self {
		Self {
			open: "[data-modal-open]".to_owned(),
			dialog: "[data-modal]".to_owned(),
			close: "[data-modal-close]".to_owned(),
			class: "active".to_owned(),
		}
	}
}
