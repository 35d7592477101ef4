use core::cell::Cell;
use js_sys::Function;
use std::rc::Rc;
use tracing::{error, trace};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{AddEventListenerOptions, Event, EventTarget};

/// Listener flags. See [***addEventListener***](https://developer.mozilla.org/en-US/docs/Web/API/EventTarget/addEventListener#parameters).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerOptions {
	pub capture: bool,
	pub passive: bool,
}
impl ListenerOptions {
	#[must_use]
	pub fn passive() -> Self {
		Self { capture: false, passive: true }
	}
}

/// An event listener that is removed from its target when dropped, together with its [`Closure`].
///
/// Listeners are owned by the running app rather than [leaked](`Closure::forget`),
/// so stopping the app detaches all of them.
pub struct EventListener {
	target: EventTarget,
	name: &'static str,
	options: ListenerOptions,
	closure: Closure<dyn FnMut(Event)>,
	attached: Rc<Cell<bool>>,
}
impl EventListener {
	/// # Errors
	///
	/// Iff the browser refused to add the listener.
	pub fn new(target: &EventTarget, name: &'static str, handler: impl 'static + FnMut(Event)) -> Result<Self, JsValue> {
		Self::new_with_options(target, name, ListenerOptions::default(), handler)
	}

	/// # Errors
	///
	/// Iff the browser refused to add the listener.
	pub fn new_with_options(target: &EventTarget, name: &'static str, options: ListenerOptions, handler: impl 'static + FnMut(Event)) -> Result<Self, JsValue> {
		let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);

		let mut web_options = AddEventListenerOptions::new();
		web_options.capture(options.capture).passive(options.passive);
		target.add_event_listener_with_callback_and_add_event_listener_options(name, closure.as_ref().unchecked_ref(), &web_options)?;
		trace!("Added {:?} listener.", name);

		Ok(Self {
			target: target.clone(),
			name,
			options,
			closure,
			attached: Rc::new(Cell::new(true)),
		})
	}

	/// A handle that can remove this listener early, including from inside its own handler.
	///
	/// The [`Closure`] stays alive until the [`EventListener`] is dropped.
	#[must_use]
	pub fn detacher(&self) -> Detacher {
		Detacher {
			target: self.target.clone(),
			name: self.name,
			capture: self.options.capture,
			function: self.closure.as_ref().unchecked_ref::<Function>().clone(),
			attached: Rc::clone(&self.attached),
		}
	}

	#[must_use]
	pub fn is_attached(&self) -> bool {
		self.attached.get()
	}

	#[must_use]
	pub fn name(&self) -> &'static str {
		self.name
	}
}
impl core::fmt::Debug for EventListener {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("EventListener")
			.field("target", &self.target)
			.field("name", &self.name)
			.field("options", &self.options)
			.finish_non_exhaustive()
	}
}
impl Drop for EventListener {
	fn drop(&mut self) {
		self.detacher().detach();
	}
}

/// See [`EventListener::detacher`].
#[derive(Debug, Clone)]
pub struct Detacher {
	target: EventTarget,
	name: &'static str,
	capture: bool,
	function: Function,
	attached: Rc<Cell<bool>>,
}
impl Detacher {
	/// Removes the listener. Does nothing if it was removed already.
	pub fn detach(&self) {
		if !self.attached.replace(false) {
			return;
		}
		if let Err(error) = self.target.remove_event_listener_with_callback_and_bool(self.name, &self.function, self.capture) {
			error!("Failed to remove event listener {:?} (capture: {}): {:?}", self.name, self.capture, error);
		} else {
			trace!("Removed {:?} listener.", self.name);
		}
	}
}
