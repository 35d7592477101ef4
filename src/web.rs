//! Wiring the widget into a page, and the JavaScript entry points.

use crate::{
	advice,
	config::Config,
	dom::{self, DomSurface, MountError},
	listener::EventListener,
	modal::Modal,
	reveal::ScrollReveal,
	schedule::WindowScheduler,
	storage::{MemoryStorage, Storage, WebStorage},
	store::NoteStore,
	widget::NotesWidget,
};
use core::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::{error, info, instrument, trace, warn};
use wasm_bindgen::{prelude::wasm_bindgen, JsValue};
use web_sys::{Document, Window};

pub type WebWidget = NotesWidget<Box<dyn Storage>, DomSurface, WindowScheduler>;

/// A widget mounted into a page.
///
/// Dropping it removes its event listeners and cancels its timers. Rows already drawn stay on the page.
pub struct App {
	// Dropped in this order: listeners hold strong references to the widget.
	reveal: Option<ScrollReveal>,
	modal: Option<Modal>,
	listeners: Vec<EventListener>,
	widget: Rc<RefCell<WebWidget>>,
}
impl App {
	/// Mounts into `document`: loads the stored notes, draws them, wires the form and buttons,
	/// starts the advice fetch and the scroll reveal and wires the dialog if there is one.
	///
	/// # Errors
	///
	/// Iff a required element is missing or a listener couldn't be added.
	#[instrument(skip(window, document, config))]
	pub fn mount(window: &Window, document: &Document, config: &Config) -> Result<Self, MountError> {
		if let Some(root) = document.document_element() {
			if let Err(error) = root.class_list().remove_1(&config.classes.no_js) {
				warn!("Failed to remove {:?}: {:?}", config.classes.no_js, error);
			}
		}

		let surface = DomSurface::new(document, config)?;
		let storage: Box<dyn Storage> = match WebStorage::local(window) {
			Ok(storage) => Box::new(storage),
			Err(error) => {
				warn!("{}; notes will only last until the page is closed.", error);
				Box::new(MemoryStorage::new())
			}
		};
		let store = NoteStore::load(storage, &config.storage_key);

		let widget = Rc::new_cyclic(|weak: &Weak<RefCell<WebWidget>>| {
			let weak = weak.clone();
			let scheduler = WindowScheduler::new(window.clone(), move |handle, task| match weak.upgrade() {
				Some(widget) => widget.borrow_mut().run(handle, task),
				None => trace!("Widget is gone, dropping {:?}.", task),
			});
			RefCell::new(NotesWidget::new(store, surface, scheduler, config))
		});
		widget.borrow_mut().render();

		let listeners = Self::listen(&widget, config)?;
		Self::fetch_advice(window, Rc::downgrade(&widget), config);

		let reveal = match ScrollReveal::start(window, document, &config.reveal) {
			Ok(reveal) => Some(reveal),
			Err(error) => {
				error!("Scroll reveal unavailable: {:?}", error);
				None
			}
		};

		let modal = Modal::attach(document, &config.modal).unwrap_or_else(|error| {
			error!("Dialog unavailable: {:?}", error);
			None
		});

		info!("Mounted with {} note(s).", widget.borrow().notes().len());
		Ok(Self {
			reveal,
			modal,
			listeners,
			widget,
		})
	}

	fn listen(widget: &Rc<RefCell<WebWidget>>, config: &Config) -> Result<Vec<EventListener>, MountError> {
		let (form, input, list, clear_button) = {
			let widget = widget.borrow();
			let surface = widget.surface();
			(surface.form().clone(), surface.input().clone(), surface.list().clone(), surface.clear_button().clone())
		};
		let listener_error = |error: JsValue| MountError::Listener(format!("{:?}", error));

		let submit = {
			let widget = Rc::clone(widget);
			EventListener::new(form.as_ref(), "submit", move |event| {
				event.prevent_default();
				widget.borrow_mut().submit(&input.value());
			})
			.map_err(listener_error)?
		};

		// One delegated listener covers rows drawn later, too.
		let delete = {
			let widget = Rc::clone(widget);
			let delete_selector = config.selectors.delete_button.clone();
			EventListener::new(list.as_ref(), "click", move |event| match dom::delete_target(&event, &delete_selector) {
				Some(id) => {
					widget.borrow_mut().request_delete(id);
				}
				None => trace!("Click outside of delete controls."),
			})
			.map_err(listener_error)?
		};

		let clear = {
			let widget = Rc::clone(widget);
			EventListener::new(clear_button.as_ref(), "click", move |_| {
				widget.borrow_mut().click_clear();
			})
			.map_err(listener_error)?
		};

		Ok(vec![submit, delete, clear])
	}

	fn fetch_advice(window: &Window, widget: Weak<RefCell<WebWidget>>, config: &Config) {
		let window = window.clone();
		let url = config.advice.url.clone();
		let fallback = config.advice.fallback.clone();
		wasm_bindgen_futures::spawn_local(async move {
			let text = advice::display_text(advice::fetch(&window, &url).await, &fallback);
			match widget.upgrade() {
				Some(widget) => widget.borrow_mut().show_advice(&text),
				None => trace!("Widget is gone, not showing advice."),
			}
		});
	}

	#[must_use]
	pub fn widget(&self) -> &Rc<RefCell<WebWidget>> {
		&self.widget
	}

	#[must_use]
	pub fn reveal(&self) -> Option<&ScrollReveal> {
		self.reveal.as_ref()
	}

	#[must_use]
	pub fn modal(&self) -> Option<&Modal> {
		self.modal.as_ref()
	}
}
impl core::fmt::Debug for App {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("App")
			.field("reveal", &self.reveal)
			.field("modal", &self.modal)
			.field("listeners", &self.listeners)
			.finish_non_exhaustive()
	}
}
impl Drop for App {
	fn drop(&mut self) {
		self.listeners.clear();
		match self.widget.try_borrow_mut() {
			Ok(mut widget) => widget.shut_down(),
			Err(_) => error!("Stopped from inside a widget handler; timers are cancelled on drop only."),
		}
	}
}

thread_local! {
	static APP: RefCell<Option<App>> = RefCell::new(None);
}

/// Starts the widget with the default [`Config`].
///
/// Runs automatically when the module is instantiated.
/// With the `manual-start` feature it is exported as `start` instead, for the page to call.
/// Does nothing on pages without the note form.
///
/// # Errors
///
/// Iff the page has the note form but the widget couldn't be mounted.
#[cfg_attr(not(feature = "manual-start"), wasm_bindgen(start))]
#[cfg_attr(feature = "manual-start", wasm_bindgen)]
pub fn start() -> Result<(), JsValue> {
	start_with(Config::default())
}

/// Like [`start`], with a JSON-encoded [`Config`].
///
/// # Errors
///
/// Iff the configuration is invalid or the widget couldn't be mounted.
#[wasm_bindgen(js_name = startWithConfig)]
pub fn start_with_config(json: &str) -> Result<(), JsValue> {
	let config = Config::from_json(json).map_err(|error| MountError::Config(error.to_string()))?;
	start_with(config)
}

/// Mounts the widget, replacing (and stopping) one started earlier.
///
/// # Errors
///
/// Iff the page has the note form but the widget couldn't be mounted.
pub fn start_with(config: Config) -> Result<(), JsValue> {
	init_tracing();

	let window = web_sys::window().ok_or(MountError::NoWindow)?;
	let document = window.document().ok_or(MountError::NoDocument)?;
	if document.query_selector(&config.selectors.form)?.is_none() {
		info!("No {:?} on this page, not starting.", config.selectors.form);
		return Ok(());
	}

	let app = App::mount(&window, &document, &config)?;
	APP.with(|slot| slot.borrow_mut().replace(app));
	Ok(())
}

/// Stops the running widget, if any.
#[wasm_bindgen]
pub fn stop() {
	if let Some(app) = APP.with(|slot| slot.borrow_mut().take()) {
		drop(app);
		info!("Stopped.");
	}
}

#[cfg(feature = "console-tracing")]
fn init_tracing() {
	if tracing_wasm::try_set_as_global_default().is_ok() {
		trace!("Installed console tracing.");
	}
}

#[cfg(not(feature = "console-tracing"))]
fn init_tracing() {}
