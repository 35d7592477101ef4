#![doc(html_root_url = "https://docs.rs/notes-dom/0.0.1")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! A browser notes widget: add notes, delete them, clear them all after a confirming second click.
//!
//! The notes live in `localStorage` and are redrawn in full after every change.
//! Everything except [`dom`], [`web`] and the browser halves of [`schedule`], [`storage`], [`advice`] and [`reveal`]
//! is independent of the browser, so [`NotesWidget`] can be driven with [`MemoryStorage`], [`MemorySurface`] and [`ManualScheduler`].

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod advice;
pub mod config;
pub mod confirm;
pub mod dom;
pub mod listener;
pub mod modal;
pub mod note;
pub mod render;
pub mod reveal;
pub mod schedule;
pub mod storage;
pub mod store;
pub mod web;
pub mod widget;

pub use config::Config;
pub use confirm::{ClearConfirmation, ClearDecision, ConfirmationState};
pub use note::{Note, NoteId};
pub use render::{MemorySurface, RenderPass, Surface};
pub use schedule::{ManualScheduler, Scheduler, Task, TimerHandle};
pub use storage::{MemoryStorage, Storage, StorageError};
pub use store::NoteStore;
pub use web::{start, start_with_config, stop, App};
pub use widget::NotesWidget;
