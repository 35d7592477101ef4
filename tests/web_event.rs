#![cfg(target_arch = "wasm32")]

use notes_dom::{storage::WebStorage, App, MemoryStorage, NoteStore, Storage};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{Event, HtmlInputElement};

wasm_bindgen_test_configure!(run_in_browser);

mod web_fixture_;
use web_fixture_::Fixture;

fn submit(fixture: &Fixture, text: &str) {
	let input: HtmlInputElement = fixture.query("#noteInput").dyn_into().unwrap();
	input.set_value(text);
	fixture.query("#noteForm").dispatch_event(&Event::new("submit").unwrap()).unwrap();
}

#[wasm_bindgen_test]
fn submit_adds_and_persists() {
	let fixture = Fixture::new("event-submit");
	let app = App::mount(&fixture.window, &fixture.document, &fixture.config).unwrap();

	submit(&fixture, "  Buy milk ");
	submit(&fixture, "   ");
	assert_eq!(fixture.rows(), 1);
	assert_eq!(app.widget().borrow().notes()[0].text, "Buy milk");

	let input: HtmlInputElement = fixture.query("#noteInput").dyn_into().unwrap();
	assert_eq!(input.value(), "   ", "blank input isn't cleared");

	let stored = NoteStore::load(WebStorage::local(&fixture.window).unwrap(), &fixture.config.storage_key);
	assert_eq!(stored.notes(), app.widget().borrow().notes());
}

#[wasm_bindgen_test]
fn delegated_delete_click() {
	let fixture = Fixture::new("event-delete");
	let app = App::mount(&fixture.window, &fixture.document, &fixture.config).unwrap();
	submit(&fixture, "Buy milk");
	submit(&fixture, "Walk dog");
	assert_eq!(fixture.rows(), 2);

	// Clicking the text does nothing.
	fixture.query("#notesList .note-text").click();
	assert_eq!(fixture.rows(), 2);

	// Rows drawn after mounting are handled without extra wiring.
	fixture.query("#notesList .delete-btn").click();
	assert_eq!(fixture.rows(), 1);
	assert_eq!(app.widget().borrow().notes()[0].text, "Walk dog");
	assert!(fixture.stored().unwrap().contains("Walk dog"));
	assert!(!fixture.stored().unwrap().contains("Buy milk"));
}

#[wasm_bindgen_test]
fn clear_needs_two_clicks() {
	let fixture = Fixture::new("event-clear");
	let app = App::mount(&fixture.window, &fixture.document, &fixture.config).unwrap();
	let clear = fixture.query("#clearAllBtn");

	clear.click();
	assert!(!app.widget().borrow().confirmation().is_armed());

	submit(&fixture, "a");
	submit(&fixture, "b");
	clear.click();
	assert!(app.widget().borrow().confirmation().is_armed());
	assert_eq!(fixture.rows(), 2);

	clear.click();
	assert_eq!(fixture.rows(), 0);
	assert_eq!(fixture.stored().as_deref(), Some("[]"));
	assert_eq!(clear.text_content().unwrap(), "Clear All");
}

#[wasm_bindgen_test]
fn stored_notes_are_shown_on_mount() {
	let fixture = Fixture::new("event-load");
	let mut seeded = NoteStore::load(WebStorage::local(&fixture.window).unwrap(), &fixture.config.storage_key);
	seeded.add("from last time").unwrap();

	let _app = App::mount(&fixture.window, &fixture.document, &fixture.config).unwrap();
	assert_eq!(fixture.rows(), 1);
	assert_eq!(fixture.query("#notesList .note-text").text_content().unwrap(), "from last time");
}

#[wasm_bindgen_test]
fn dropping_the_app_detaches_listeners() {
	let fixture = Fixture::new("event-drop");
	let app = App::mount(&fixture.window, &fixture.document, &fixture.config).unwrap();
	submit(&fixture, "a");
	drop(app);

	submit(&fixture, "b");
	fixture.query("#notesList .delete-btn").click();
	assert_eq!(fixture.rows(), 1);
	assert_eq!(fixture.query("#notesList .note-text").text_content().unwrap(), "a");
}

#[wasm_bindgen_test]
fn missing_markup_is_an_error() {
	let fixture = Fixture::new("event-missing");
	fixture.query("#noteTemplate").remove();
	assert!(App::mount(&fixture.window, &fixture.document, &fixture.config).is_err());
}

#[wasm_bindgen_test]
fn web_storage_round_trip() {
	let fixture = Fixture::new("event-storage");
	let mut storage = WebStorage::local(&fixture.window).unwrap();
	assert_eq!(storage.get(&fixture.config.storage_key).unwrap(), None);
	storage.set(&fixture.config.storage_key, "[]").unwrap();
	assert_eq!(storage.get(&fixture.config.storage_key).unwrap().as_deref(), Some("[]"));

	let mut memory = MemoryStorage::new();
	memory.set("k", "v").unwrap();
	assert_eq!(memory.get("k").unwrap().as_deref(), Some("v"));
}

#[wasm_bindgen_test]
fn mounting_removes_no_js() {
	let fixture = Fixture::new("event-no-js");
	let root = fixture.document.document_element().unwrap();
	root.class_list().add_1("no-js").unwrap();

	let _app = App::mount(&fixture.window, &fixture.document, &fixture.config).unwrap();
	assert!(!root.class_list().contains("no-js"));
}

#[wasm_bindgen_test]
fn mounting_starts_the_reveal() {
	let fixture = Fixture::new("event-reveal");
	let app = App::mount(&fixture.window, &fixture.document, &fixture.config).unwrap();
	assert!(app.reveal().unwrap().is_observing());
}

#[wasm_bindgen_test]
fn start_and_stop() {
	let fixture = Fixture::new("event-start");
	notes_dom::web::start_with(fixture.config.clone()).unwrap();
	submit(&fixture, "started");
	assert_eq!(fixture.rows(), 1);

	notes_dom::stop();
	submit(&fixture, "stopped");
	assert_eq!(fixture.rows(), 1);
}

#[wasm_bindgen_test]
fn unknown_config_keys_are_rejected() {
	let _fixture = Fixture::new("event-config");
	assert!(notes_dom::start_with_config(r#"{"storageKee": "typo"}"#).is_err());
	assert!(notes_dom::start_with_config("not json").is_err());
}

#[cfg(feature = "manual-start")]
#[wasm_bindgen_test]
fn exported_start_mounts_the_stock_page() {
	let fixture = Fixture::new("event-manual-start");
	let storage = fixture.window.local_storage().unwrap().unwrap();
	storage.remove_item("notes").unwrap();

	notes_dom::start().unwrap();
	submit(&fixture, "by hand");
	assert_eq!(fixture.rows(), 1);
	assert!(storage.get_item("notes").unwrap().unwrap().contains("by hand"));

	notes_dom::stop();
	storage.remove_item("notes").unwrap();
}
