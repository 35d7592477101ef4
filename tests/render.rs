use notes_dom::{MemoryStorage, MemorySurface, NoteStore, RenderPass, Surface};

#[test]
fn render_pass_mirrors_the_list() {
	let mut store = NoteStore::load(MemoryStorage::new(), "notes");
	assert!(!RenderPass::of(store.notes()).clear_visible);

	store.add("<b>bold</b>").unwrap();
	store.add("second").unwrap();
	let pass = RenderPass::of(store.notes());
	assert!(pass.clear_visible);
	assert_eq!(pass.rows.iter().map(|row| row.text).collect::<Vec<_>>(), ["<b>bold</b>", "second"]);
	assert_eq!(pass.rows[0].id, &store.notes()[0].id);
	assert_eq!(pass, RenderPass::of(store.notes()));
}

#[test]
fn memory_surface_replaces_rows() {
	let mut store = NoteStore::load(MemoryStorage::new(), "notes");
	let a = store.add("a").unwrap().unwrap();
	store.add("b").unwrap();

	let mut surface = MemorySurface::new();
	surface.apply(&RenderPass::of(store.notes()));
	surface.mark_removing(&a.id);
	assert!(surface.removing.contains(&a.id));

	store.remove(&a.id).unwrap();
	surface.apply(&RenderPass::of(store.notes()));
	assert_eq!(surface.texts(), ["b"]);
	assert!(surface.removing.is_empty());
	assert!(surface.clear_visible);
}
