//! One-time "scroll into view" reveal of page sections.
//!
//! Uses an [***IntersectionObserver***](https://developer.mozilla.org/en-US/docs/Web/API/IntersectionObserver) where available
//! and otherwise re-checks element positions on every `scroll` event.
//! Either way an element is revealed at most once and never hidden again.

use crate::{
	config::RevealConfig,
	listener::{Detacher, EventListener, ListenerOptions},
};
use core::cell::RefCell;
use hashbrown::HashSet;
use js_sys::{Array, Reflect};
use std::rc::Rc;
use tracing::{debug, error, info, instrument, trace};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Document, Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, Window};

const INDEX_ATTRIBUTE: &str = "data-reveal-index";

/// Which of `len` elements were revealed so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevealTracker {
	len: usize,
	revealed: HashSet<usize>,
}
impl RevealTracker {
	#[must_use]
	pub fn new(len: usize) -> Self {
		Self {
			len,
			revealed: HashSet::with_capacity(len),
		}
	}

	/// Push path: an observer reported element `index` crossing its threshold.
	///
	/// Returns whether the element should be revealed now.
	pub fn intersected(&mut self, index: usize, is_intersecting: bool) -> bool {
		is_intersecting && self.reveal(index)
	}

	/// Pull path: element `index`'s top edge is at `top` in a viewport `viewport_height` high.
	///
	/// Returns whether the element should be revealed now.
	pub fn scrolled(&mut self, index: usize, top: f64, viewport_height: f64, viewport_fraction: f64) -> bool {
		top < viewport_height * viewport_fraction && self.reveal(index)
	}

	fn reveal(&mut self, index: usize) -> bool {
		index < self.len && self.revealed.insert(index)
	}

	#[must_use]
	pub fn is_revealed(&self, index: usize) -> bool {
		self.revealed.contains(&index)
	}

	#[must_use]
	pub fn revealed_count(&self) -> usize {
		self.revealed.len()
	}

	#[must_use]
	pub fn is_complete(&self) -> bool {
		self.revealed.len() == self.len
	}
}

enum Mode {
	Observer {
		observer: IntersectionObserver,
		_callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
	},
	/// [`None`] once everything was revealed during setup.
	Scroll { listener: Option<EventListener> },
}

/// Keeps the reveal machinery alive. Dropping it stops revealing further elements.
pub struct ScrollReveal {
	mode: Mode,
	tracker: Rc<RefCell<RevealTracker>>,
}
impl ScrollReveal {
	/// Starts watching every element matching `config.selector`.
	///
	/// # Errors
	///
	/// Iff the selector is invalid or the browser refused the observer or listener.
	pub fn start(window: &Window, document: &Document, config: &RevealConfig) -> Result<Self, JsValue> {
		let observe = Reflect::has(window, &JsValue::from_str("IntersectionObserver"))?;
		Self::start_with(window, document, config, observe)
	}

	/// Like [`ScrollReveal::start`], but always re-checks on `scroll`.
	///
	/// # Errors
	///
	/// Iff the selector is invalid or the browser refused the listener.
	pub fn start_scrolling(window: &Window, document: &Document, config: &RevealConfig) -> Result<Self, JsValue> {
		Self::start_with(window, document, config, false)
	}

	#[instrument(skip(window, document))]
	fn start_with(window: &Window, document: &Document, config: &RevealConfig, observe: bool) -> Result<Self, JsValue> {
		let found = document.query_selector_all(&config.selector)?;
		let mut elements = Vec::with_capacity(found.length() as usize);
		for node in (0..found.length()).filter_map(|i| found.get(i)) {
			if let Ok(element) = node.dyn_into::<Element>() {
				element.set_attribute(INDEX_ATTRIBUTE, &elements.len().to_string())?;
				elements.push(element);
			}
		}
		let tracker = Rc::new(RefCell::new(RevealTracker::new(elements.len())));

		let mode = if observe {
			info!("Revealing {} element(s) on intersection.", elements.len());
			Self::observe(elements, config, Rc::clone(&tracker))?
		} else {
			info!("Revealing {} element(s) on scroll.", elements.len());
			Self::poll(window, elements, config, Rc::clone(&tracker))?
		};
		Ok(Self { mode, tracker })
	}

	fn observe(elements: Vec<Element>, config: &RevealConfig, tracker: Rc<RefCell<RevealTracker>>) -> Result<Mode, JsValue> {
		let class = config.class.clone();
		let callback = Closure::wrap(Box::new(move |entries: Array, observer: IntersectionObserver| {
			for entry in entries.iter() {
				let entry: IntersectionObserverEntry = entry.unchecked_into();
				let target = entry.target();
				let index = match target.get_attribute(INDEX_ATTRIBUTE).and_then(|index| index.parse::<usize>().ok()) {
					Some(index) => index,
					None => continue,
				};
				if tracker.borrow_mut().intersected(index, entry.is_intersecting()) {
					reveal(&target, &class);
					observer.unobserve(&target);
				}
			}
		}) as Box<dyn FnMut(Array, IntersectionObserver)>);

		let mut init = IntersectionObserverInit::new();
		init.threshold(&JsValue::from_f64(config.threshold));
		let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
		for element in &elements {
			observer.observe(element);
		}
		Ok(Mode::Observer { observer, _callback: callback })
	}

	fn poll(window: &Window, elements: Vec<Element>, config: &RevealConfig, tracker: Rc<RefCell<RevealTracker>>) -> Result<Mode, JsValue> {
		// Returns whether everything is revealed now.
		let check = {
			let window = window.clone();
			let class = config.class.clone();
			let fraction = config.viewport_fraction;
			move || {
				let mut tracker = tracker.borrow_mut();
				if tracker.is_complete() {
					return true;
				}
				let viewport_height = match window.inner_height().map(|height| height.as_f64()) {
					Ok(Some(height)) => height,
					other => {
						error!("Couldn't read the viewport height: {:?}", other);
						return false;
					}
				};
				for (index, element) in elements.iter().enumerate() {
					if !tracker.is_revealed(index) && tracker.scrolled(index, element.get_bounding_client_rect().top(), viewport_height, fraction) {
						reveal(element, &class);
					}
				}
				tracker.is_complete()
			}
		};

		// Whatever is already on screen doesn't wait for the first scroll.
		if check() {
			debug!("All elements revealed.");
			return Ok(Mode::Scroll { listener: None });
		}

		let detacher = Rc::new(RefCell::new(None::<Detacher>));
		let listener = EventListener::new_with_options(window.as_ref(), "scroll", ListenerOptions::passive(), {
			let detacher = Rc::clone(&detacher);
			move |_| {
				if check() {
					debug!("All elements revealed.");
					if let Some(detacher) = detacher.borrow().as_ref() {
						detacher.detach();
					}
				}
			}
		})?;
		*detacher.borrow_mut() = Some(listener.detacher());
		Ok(Mode::Scroll { listener: Some(listener) })
	}

	/// Whether a `scroll` listener is still attached.
	#[must_use]
	pub fn is_listening(&self) -> bool {
		match &self.mode {
			Mode::Scroll { listener: Some(listener) } => listener.is_attached(),
			_ => false,
		}
	}

	#[must_use]
	pub fn is_observing(&self) -> bool {
		matches!(self.mode, Mode::Observer { .. })
	}

	#[must_use]
	pub fn revealed_count(&self) -> usize {
		self.tracker.borrow().revealed_count()
	}
}
impl core::fmt::Debug for ScrollReveal {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("ScrollReveal")
			.field("observing", &self.is_observing())
			.field("tracker", &self.tracker)
			.finish()
	}
}
impl Drop for ScrollReveal {
	fn drop(&mut self) {
		if let Mode::Observer { observer, .. } = &self.mode {
			observer.disconnect();
		}
	}
}

fn reveal(element: &Element, class: &str) {
	match element.class_list().add_1(class) {
		Ok(()) => trace!("Revealed."),
		Err(error) => error!("Failed to reveal element: {:?}", error),
	}
}
