#![cfg(target_arch = "wasm32")]
#![allow(dead_code)]

use notes_dom::Config;
use wasm_bindgen::JsCast;
use web_sys::{window, Document, HtmlElement, Window};

pub const MARKUP: &str = r#"
<form id="noteForm"><input id="noteInput" name="note"><button type="submit">Add</button></form>
<ul id="notesList"></ul>
<button id="clearAllBtn" type="button" aria-pressed="false">Clear All</button>
<p id="noteStatus" hidden></p>
<blockquote id="adviceDisplay"></blockquote>
<template id="noteTemplate"><li><span class="note-text"></span><button class="delete-btn" type="button">×</button></li></template>
<section class="observe">Welcome</section>
<button type="button" data-modal-open>About</button>
<div data-modal><p>Notes stay in this browser.</p><button type="button" data-modal-close>×</button><button type="button" data-modal-close>OK</button></div>
"#;

/// The stock page markup, removed again on drop.
pub struct Fixture {
	pub window: Window,
	pub document: Document,
	pub container: HtmlElement,
	pub config: Config,
}
impl Fixture {
	/// `name` keeps each test's notes apart in `localStorage`.
	pub fn new(name: &str) -> Self {
		let _ = tracing_wasm::try_set_as_global_default();

		let window = window().unwrap();
		let document = window.document().unwrap();
		let container: HtmlElement = document.create_element("div").unwrap().dyn_into().unwrap();
		container.set_inner_html(MARKUP);
		document.body().unwrap().append_child(&container).unwrap();

		let config = Config {
			storage_key: format!("notes-dom-test-{}", name),
			delete_fade_ms: 0,
			..Config::default()
		};
		window.local_storage().unwrap().unwrap().remove_item(&config.storage_key).unwrap();

		Self {
			window,
			document,
			container,
			config,
		}
	}

	pub fn query(&self, selector: &str) -> HtmlElement {
		self.document.query_selector(selector).unwrap().unwrap().dyn_into().unwrap()
	}

	pub fn rows(&self) -> u32 {
		self.document.query_selector_all("#notesList > li").unwrap().length()
	}

	pub fn stored(&self) -> Option<String> {
		self.window.local_storage().unwrap().unwrap().get_item(&self.config.storage_key).unwrap()
	}
}
impl Drop for Fixture {
	fn drop(&mut self) {
		self.container.remove();
		let _ = self.window.local_storage().unwrap().unwrap().remove_item(&self.config.storage_key);
	}
}
