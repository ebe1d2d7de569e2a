//! The session editor.
//!
//! [`SessionEditor`] is the single owner of a session and everything that
//! changes with it. Every mutation follows one path: an edit is posted to
//! the undo manager, which applies it to the session and returns events;
//! the events update the document first and are then fired to subscribers.
//! Events raised while handling an event are delivered after it, in order.

mod find;
mod reload;

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use tierline_document::{
	AlignmentExtension, DerivedTier, DocumentOutcome, EditRequest, FreezeToken, RejectReason,
	SyllabificationExtension, TranscriptDocument, ValidationDiagnostic, default_extensions,
};
use tierline_edit::{
	AddElementEdit, DeleteElementEdit, EditContext, EditorEvent, EventManager, MoveElementEdit,
	SessionEdit, UndoManager,
};
use tierline_find::FindManager;
use tierline_model::{Session, TranscriptElement, TranscriptElementLocation};
use tracing::{debug, warn};

pub use find::ReplaceSummary;
pub use reload::ExternalChange;

use crate::config::EditorConfig;
use crate::error::Result;

/// Owns a session together with its undo history, event bus, document and
/// find state.
#[derive(Debug)]
pub struct SessionEditor {
	session: Session,
	current: usize,
	config: EditorConfig,
	undo: UndoManager,
	events: EventManager,
	document: TranscriptDocument,
	find: FindManager,
	modified: bool,
	loaded_at: Option<DateTime<Utc>>,
	diagnostics: Vec<ValidationDiagnostic>,
}

fn extensions(config: &EditorConfig) -> Vec<Box<dyn DerivedTier>> {
	let mut extensions = default_extensions();
	for ext in &mut extensions {
		match ext.name() {
			SyllabificationExtension::NAME => ext.set_enabled(config.show_syllabification),
			AlignmentExtension::NAME => ext.set_enabled(config.show_alignment),
			_ => {}
		}
	}
	extensions
}

impl SessionEditor {
	/// Opens `session` with the first element current.
	pub fn new(session: Session, config: EditorConfig) -> Self {
		let document =
			TranscriptDocument::with_session(&session, 0, config.document_options(), extensions(&config));
		debug!(
			elements = session.transcript().len(),
			chars = document.len_chars(),
			"session opened"
		);
		Self {
			current: 0,
			undo: UndoManager::with_limit(config.undo_limit),
			events: EventManager::new(),
			find: FindManager::new(config.find_expr(), config.find_filter()),
			document,
			session,
			config,
			modified: false,
			loaded_at: None,
			diagnostics: Vec::new(),
		}
	}

	/// Records the modification time of the file the session was loaded from.
	pub fn with_loaded_at(mut self, mtime: DateTime<Utc>) -> Self {
		self.loaded_at = Some(mtime);
		self
	}

	pub fn session(&self) -> &Session {
		&self.session
	}

	pub fn config(&self) -> &EditorConfig {
		&self.config
	}

	pub fn document(&self) -> &TranscriptDocument {
		&self.document
	}

	pub fn undo_manager(&self) -> &UndoManager {
		&self.undo
	}

	/// The event bus, to subscribe or to pump queued deliveries.
	pub fn events(&mut self) -> &mut EventManager {
		&mut self.events
	}

	/// Runs one owner cycle of the event bus.
	///
	/// Events sent by workers update the document and find state like any
	/// other event, then queued subscribers receive everything pending.
	/// Returns the number of queued deliveries.
	pub fn pump(&mut self) -> usize {
		let received = self.events.drain_received();
		self.dispatch(received);
		self.events.pump()
	}

	/// Index of the current element.
	pub fn current_element(&self) -> usize {
		self.current
	}

	/// Returns true if the session changed since it was opened or last saved.
	pub fn is_modified(&self) -> bool {
		self.modified
	}

	/// Clears the modified flag after the session was written out.
	pub fn mark_saved(&mut self) {
		self.set_modified(false);
	}

	/// Drains validation diagnostics collected since the last call.
	pub fn take_diagnostics(&mut self) -> Vec<ValidationDiagnostic> {
		std::mem::take(&mut self.diagnostics)
	}

	fn set_modified(&mut self, modified: bool) {
		if self.modified != modified {
			self.modified = modified;
			self.dispatch([EditorEvent::ModifiedFlagChanged(modified)]);
		}
	}

	/// Makes `index` the current element.
	pub fn set_current_element(&mut self, index: usize) {
		if index < self.session.transcript().len() && index != self.current {
			self.dispatch([EditorEvent::CurrentRecordChanged { element_index: index }]);
		}
	}

	/// Applies `edit` and records it for undo.
	pub fn post(&mut self, edit: impl Into<SessionEdit>) -> Result<()> {
		let edit = edit.into();
		let rebuild = rebuild_target(&edit);
		let posted = self
			.undo
			.post(edit, &mut EditContext::new(&mut self.session, &mut self.current));
		match posted {
			Ok(events) => {
				self.dispatch(events);
				self.set_modified(true);
				Ok(())
			}
			Err(err) => {
				warn!(error = %err, "edit failed, rebuilding");
				match rebuild {
					Some(element) => self.document.rebuild_element(&self.session, element),
					None => self.document.rebuild_all(&self.session),
				}
				Err(err.into())
			}
		}
	}

	/// Posts `edits` as one undo group named `name`.
	pub fn post_group(&mut self, name: &str, edits: impl IntoIterator<Item = SessionEdit>) -> Result<()> {
		self.undo.begin_update(name);
		let mut result = Ok(());
		for edit in edits {
			result = self.post(edit);
			if result.is_err() {
				break;
			}
		}
		self.undo.end_update()?;
		result
	}

	/// Reverts the last undo group. Returns false if there was none.
	pub fn undo(&mut self) -> Result<bool> {
		self.flush()?;
		let events = self
			.undo
			.undo(&mut EditContext::new(&mut self.session, &mut self.current))?;
		Ok(self.history_step(events))
	}

	/// Replays the last undone group. Returns false if there was none.
	pub fn redo(&mut self) -> Result<bool> {
		self.flush()?;
		let events = self
			.undo
			.redo(&mut EditContext::new(&mut self.session, &mut self.current))?;
		Ok(self.history_step(events))
	}

	fn history_step(&mut self, events: Vec<EditorEvent>) -> bool {
		if events.is_empty() {
			return false;
		}
		self.dispatch(events);
		self.set_modified(true);
		true
	}

	/// Inserts `element` at `index`.
	pub fn add_element(&mut self, index: usize, element: TranscriptElement) -> Result<()> {
		self.flush()?;
		self.post(AddElementEdit::new(index, element))
	}

	/// Deletes the element at `index`.
	pub fn delete_element(&mut self, index: usize) -> Result<()> {
		self.flush()?;
		self.post(DeleteElementEdit::new(index))
	}

	/// Moves the element at `from` to `to`.
	pub fn move_element(&mut self, from: usize, to: usize) -> Result<()> {
		self.flush()?;
		self.post(MoveElementEdit::new(from, to))
	}

	/// Types into the document buffer. Returns why the request was refused, if it was.
	pub fn edit_text(&mut self, request: EditRequest) -> Result<Option<RejectReason>> {
		let outcome = self.document.apply_edit(&self.session, request);
		self.apply_outcome(outcome)
	}

	/// Commits uncommitted buffer text.
	pub fn flush(&mut self) -> Result<()> {
		let outcome = self.document.flush(&self.session);
		self.apply_outcome(outcome).map(|_| ())
	}

	pub fn set_caret(&mut self, offset: usize) -> Result<()> {
		let outcome = self.document.set_caret(&self.session, offset);
		self.apply_outcome(outcome).map(|_| ())
	}

	pub fn step_caret(&mut self, forward: bool) -> Result<()> {
		let outcome = self.document.step_caret(&self.session, forward);
		self.apply_outcome(outcome).map(|_| ())
	}

	/// Moves the caret to `location`. Returns false if it is not rendered.
	pub fn set_caret_location(&mut self, location: &TranscriptElementLocation) -> Result<bool> {
		match self.document.set_caret_location(&self.session, location) {
			Some(outcome) => self.apply_outcome(outcome).map(|_| true),
			None => Ok(false),
		}
	}

	pub fn enter_syllabification_edit(&mut self) -> Result<()> {
		let outcome = self.document.enter_syllabification_edit(&self.session);
		self.apply_outcome(outcome).map(|_| ())
	}

	pub fn cancel_syllabification_edit(&mut self) -> Result<()> {
		let outcome = self.document.cancel_syllabification_edit(&self.session);
		self.apply_outcome(outcome).map(|_| ())
	}

	/// Shows or hides a derived tier extension by name.
	pub fn set_derived_tier_visible(&mut self, extension: &str, visible: bool) -> Result<()> {
		let outcome = self.document.set_extension_enabled(&self.session, extension, visible);
		self.apply_outcome(outcome).map(|_| ())
	}

	/// Suspends caret reports until the token is released.
	pub fn freeze_caret(&mut self) -> FreezeToken {
		self.document.freeze_caret()
	}

	pub fn release_caret(&mut self, token: FreezeToken) {
		if let Some(event) = self.document.release_caret(token) {
			self.dispatch([event]);
		}
	}

	/// Posts the edits of a document outcome, then delivers its events.
	fn apply_outcome(&mut self, outcome: DocumentOutcome) -> Result<Option<RejectReason>> {
		let DocumentOutcome {
			edits,
			events,
			diagnostics,
			rejected,
		} = outcome;
		self.diagnostics.extend(diagnostics);
		if edits.len() > 1 {
			self.post_group("document edit", edits)?;
		} else {
			for edit in edits {
				self.post(edit)?;
			}
		}
		self.dispatch(events);
		Ok(rejected)
	}

	/// Delivers events: the document first, then find state, then subscribers.
	fn dispatch(&mut self, events: impl IntoIterator<Item = EditorEvent>) {
		let mut queue: VecDeque<EditorEvent> = events.into_iter().collect();
		while let Some(event) = queue.pop_front() {
			match &event {
				EditorEvent::CurrentRecordChanged { element_index } => self.current = *element_index,
				EditorEvent::TierChange { .. } | EditorEvent::RecordChanged { .. } => self.find.invalidate(),
				e if e.is_structural() => self.find.invalidate(),
				_ => {}
			}
			queue.extend(self.document.handle_event(&self.session, &event));
			self.events.fire(event);
		}
	}
}

/// Element to rebuild when `edit` fails to apply; [`None`] rebuilds everything.
fn rebuild_target(edit: &SessionEdit) -> Option<usize> {
	match edit {
		SessionEdit::Tier(edit) => Some(edit.element_index()),
		_ => None,
	}
}
