#![cfg(target_arch = "wasm32")]

use notes_dom::{
	dom::{DomSurface, ID_ATTRIBUTE},
	MemoryStorage, NoteStore, RenderPass, Surface,
};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

wasm_bindgen_test_configure!(run_in_browser);

mod web_fixture_;
use web_fixture_::Fixture;

#[wasm_bindgen_test]
fn rows_are_plain_text_and_tagged() {
	let fixture = Fixture::new("render-plain");
	let mut surface = DomSurface::new(&fixture.document, &fixture.config).unwrap();

	let mut store = NoteStore::load(MemoryStorage::new(), "notes");
	let markup = store.add("<img src=x onerror=alert(1)>").unwrap().unwrap();
	store.add("Walk dog").unwrap();
	surface.apply(&RenderPass::of(store.notes()));

	assert_eq!(fixture.rows(), 2);
	let list = fixture.query("#notesList");
	assert!(list.query_selector("img").unwrap().is_none());
	let text = list.query_selector(".note-text").unwrap().unwrap();
	assert_eq!(text.text_content().unwrap(), markup.text);
	let delete = list.query_selector(".delete-btn").unwrap().unwrap();
	assert_eq!(delete.get_attribute(ID_ATTRIBUTE).unwrap(), markup.id.as_str());
}

#[wasm_bindgen_test]
fn rendering_twice_looks_the_same() {
	let fixture = Fixture::new("render-twice");
	let mut surface = DomSurface::new(&fixture.document, &fixture.config).unwrap();

	let mut store = NoteStore::load(MemoryStorage::new(), "notes");
	store.add("a").unwrap();
	store.add("b").unwrap();

	surface.apply(&RenderPass::of(store.notes()));
	let once = fixture.query("#notesList").inner_html();
	surface.apply(&RenderPass::of(store.notes()));
	assert_eq!(fixture.query("#notesList").inner_html(), once);
	assert_eq!(fixture.rows(), 2);
}

#[wasm_bindgen_test]
fn shorter_lists_leave_no_stale_rows() {
	let fixture = Fixture::new("render-shrink");
	let mut surface = DomSurface::new(&fixture.document, &fixture.config).unwrap();
	let clear = fixture.query("#clearAllBtn");

	let mut store = NoteStore::load(MemoryStorage::new(), "notes");
	for text in ["a", "b", "c"] {
		store.add(text).unwrap();
	}
	surface.apply(&RenderPass::of(store.notes()));
	assert_eq!(fixture.rows(), 3);
	assert_eq!(clear.style().get_property_value("visibility").unwrap(), "visible");

	let first = store.notes()[0].id.clone();
	store.remove(&first).unwrap();
	surface.apply(&RenderPass::of(store.notes()));
	assert_eq!(fixture.rows(), 2);

	store.clear().unwrap();
	surface.apply(&RenderPass::of(store.notes()));
	assert_eq!(fixture.rows(), 0);
	assert_eq!(clear.style().get_property_value("visibility").unwrap(), "hidden");
}

#[wasm_bindgen_test]
fn armed_affordance() {
	let fixture = Fixture::new("render-armed");
	let mut surface = DomSurface::new(&fixture.document, &fixture.config).unwrap();
	let clear = fixture.query("#clearAllBtn");

	surface.show_clear_armed(true);
	assert!(clear.class_list().contains("confirming"));
	assert_eq!(clear.text_content().unwrap(), "Are you sure?");
	assert_eq!(clear.get_attribute("aria-pressed").unwrap(), "true");

	surface.show_clear_armed(false);
	assert!(!clear.class_list().contains("confirming"));
	assert_eq!(clear.text_content().unwrap(), "Clear All");
	assert_eq!(clear.get_attribute("aria-pressed").unwrap(), "false");
}

#[wasm_bindgen_test]
fn status_and_advice() {
	let fixture = Fixture::new("render-status");
	let mut surface = DomSurface::new(&fixture.document, &fixture.config).unwrap();
	let status = fixture.query("#noteStatus");

	surface.show_status(Some("full"));
	assert!(!status.hidden());
	assert_eq!(status.text_content().unwrap(), "full");
	surface.show_status(None);
	assert!(status.hidden());

	surface.show_advice("\"Be kind.\"");
	assert_eq!(fixture.query("#adviceDisplay").text_content().unwrap(), "\"Be kind.\"");
}

#[wasm_bindgen_test]
fn removing_rows_fade() {
	let fixture = Fixture::new("render-fade");
	let mut surface = DomSurface::new(&fixture.document, &fixture.config).unwrap();

	let mut store = NoteStore::load(MemoryStorage::new(), "notes");
	let note = store.add("a").unwrap().unwrap();
	surface.apply(&RenderPass::of(store.notes()));
	surface.mark_removing(&note.id);

	let row = fixture.query("#notesList > li");
	assert!(row.class_list().contains("fade-out"));
}

#[wasm_bindgen_test]
fn redrawn_rows_keep_fading() {
	let fixture = Fixture::new("render-fade-redraw");
	let mut surface = DomSurface::new(&fixture.document, &fixture.config).unwrap();

	let mut store = NoteStore::load(MemoryStorage::new(), "notes");
	let fading = store.add("a").unwrap().unwrap();
	surface.apply(&RenderPass::of(store.notes()));
	surface.mark_removing(&fading.id);

	// Another note arrives while the first one is still animating out.
	store.add("b").unwrap();
	surface.apply(&RenderPass::of(store.notes()));
	let rows = fixture.document.query_selector_all("#notesList > li").unwrap();
	assert_eq!(rows.length(), 2);
	let first: web_sys::Element = rows.get(0).unwrap().dyn_into().unwrap();
	let second: web_sys::Element = rows.get(1).unwrap().dyn_into().unwrap();
	assert!(first.class_list().contains("fade-out"));
	assert!(!second.class_list().contains("fade-out"));

	// Once the note is gone, a note reusing its slot starts out visible.
	store.remove(&fading.id).unwrap();
	surface.apply(&RenderPass::of(store.notes()));
	assert!(!fixture.query("#notesList > li").class_list().contains("fade-out"));
}
