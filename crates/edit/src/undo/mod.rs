//! Grouped undo history over session edits.
//!
//! Every posted edit is applied immediately and recorded. Edits posted
//! between [`UndoManager::begin_update`] and [`UndoManager::end_update`]
//! form one undo group. Outside a group, a value-adjusting tier edit
//! absorbs the next edit to the same tier value, so a run of live typing
//! followed by its commit undoes as one step.
//!
//! Undo and redo take the manager mutably, so no edit can be posted while a
//! previous one is being applied or reverted.


use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::edits::{EditContext, SessionEdit};
use crate::error::{EditError, Result};
use crate::events::EditorEvent;

/// Default maximum number of undo groups.
pub const DEFAULT_UNDO_LIMIT: usize = 100;

/// Edits undone and redone together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoGroup {
	name: String,
	edits: Vec<SessionEdit>,
}

impl UndoGroup {
	fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			edits: Vec::new(),
		}
	}

	/// Label shown in undo menus.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Edits in application order.
	pub fn edits(&self) -> &[SessionEdit] {
		&self.edits
	}

	fn push(&mut self, edit: SessionEdit) {
		if let Some(edit) = absorb(self.edits.last_mut(), edit) {
			self.edits.push(edit);
		}
	}
}

/// Folds `edit` into `prev` when both target the same transient tier value.
///
/// Returns the edit back when it was not absorbed.
fn absorb(prev: Option<&mut SessionEdit>, edit: SessionEdit) -> Option<SessionEdit> {
	match (prev, edit) {
		(Some(SessionEdit::Tier(prev)), SessionEdit::Tier(next)) if prev.can_absorb(&next) => {
			prev.absorb(next);
			None
		}
		(_, edit) => Some(edit),
	}
}

/// Undo and redo stacks of edit groups.
#[derive(Debug)]
pub struct UndoManager {
	undo_stack: VecDeque<UndoGroup>,
	redo_stack: Vec<UndoGroup>,
	limit: usize,
	open: Option<UndoGroup>,
	depth: usize,
}

impl Default for UndoManager {
	fn default() -> Self {
		Self::with_limit(DEFAULT_UNDO_LIMIT)
	}
}

impl UndoManager {
	/// Creates a manager keeping at most [`DEFAULT_UNDO_LIMIT`] groups.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a manager keeping at most `limit` groups. Zero means unbounded.
	pub fn with_limit(limit: usize) -> Self {
		Self {
			undo_stack: VecDeque::new(),
			redo_stack: Vec::new(),
			limit,
			open: None,
			depth: 0,
		}
	}

	/// Returns whether undo is available.
	pub fn can_undo(&self) -> bool {
		!self.undo_stack.is_empty()
	}

	/// Returns whether redo is available.
	pub fn can_redo(&self) -> bool {
		!self.redo_stack.is_empty()
	}

	/// Number of undo groups.
	pub fn undo_len(&self) -> usize {
		self.undo_stack.len()
	}

	/// Number of redo groups.
	pub fn redo_len(&self) -> usize {
		self.redo_stack.len()
	}

	/// Name of the group [`Self::undo`] would revert.
	pub fn undo_name(&self) -> Option<&str> {
		self.undo_stack.back().map(UndoGroup::name)
	}

	/// Name of the group [`Self::redo`] would replay.
	pub fn redo_name(&self) -> Option<&str> {
		self.redo_stack.last().map(UndoGroup::name)
	}

	/// Returns true between `begin_update` and the matching `end_update`.
	pub fn is_updating(&self) -> bool {
		self.open.is_some()
	}

	/// Opens an undo group. Nested calls join the outermost group.
	pub fn begin_update(&mut self, name: impl Into<String>) {
		self.depth += 1;
		if self.open.is_none() {
			self.open = Some(UndoGroup::new(name));
		}
	}

	/// Closes the group opened by the matching `begin_update`.
	pub fn end_update(&mut self) -> Result<()> {
		if self.depth == 0 {
			return Err(EditError::UnbalancedUpdate);
		}
		self.depth -= 1;
		if self.depth == 0
			&& let Some(group) = self.open.take()
			&& !group.edits.is_empty()
		{
			debug!(group = %group.name, edits = group.edits.len(), "undo group closed");
			self.push_undo(group);
		}
		Ok(())
	}

	/// Applies `edit` and records it for undo.
	///
	/// A failed apply leaves both the session and the history untouched.
	pub fn post(&mut self, edit: impl Into<SessionEdit>, cx: &mut EditContext<'_>) -> Result<Vec<EditorEvent>> {
		let mut edit = edit.into();
		let events = edit.apply(cx)?;
		debug!(edit = edit.name(), adjusting = edit.is_value_adjusting(), "edit posted");
		self.redo_stack.clear();

		if let Some(group) = self.open.as_mut() {
			group.push(edit);
			return Ok(events);
		}
		let last = self
			.undo_stack
			.back_mut()
			.filter(|g| g.edits.len() == 1)
			.and_then(|g| g.edits.last_mut());
		if let Some(edit) = absorb(last, edit) {
			let mut group = UndoGroup::new(edit.name());
			group.edits.push(edit);
			self.push_undo(group);
		}
		Ok(events)
	}

	/// Reverts the most recent group.
	///
	/// Returns no events when there is nothing to undo. If an edit fails to
	/// revert, the edits of the group already reverted are replayed and the
	/// group stays on the undo stack.
	pub fn undo(&mut self, cx: &mut EditContext<'_>) -> Result<Vec<EditorEvent>> {
		if let Some(open) = &self.open {
			return Err(EditError::UpdateOpen("undo", open.name.clone()));
		}
		let Some(mut group) = self.undo_stack.pop_back() else {
			return Ok(Vec::new());
		};
		let mut events = Vec::new();
		for i in (0..group.edits.len()).rev() {
			match group.edits[i].unapply(cx) {
				Ok(ev) => events.extend(ev),
				Err(err) => {
					warn!(group = %group.name, error = %err, "undo failed, replaying group");
					for edit in &mut group.edits[i + 1..] {
						if let Err(err) = edit.apply(cx) {
							warn!(edit = edit.name(), error = %err, "replay failed");
						}
					}
					self.undo_stack.push_back(group);
					return Err(err);
				}
			}
		}
		debug!(group = %group.name, edits = group.edits.len(), "undo");
		self.redo_stack.push(group);
		Ok(events)
	}

	/// Replays the most recently undone group.
	pub fn redo(&mut self, cx: &mut EditContext<'_>) -> Result<Vec<EditorEvent>> {
		if let Some(open) = &self.open {
			return Err(EditError::UpdateOpen("redo", open.name.clone()));
		}
		let Some(mut group) = self.redo_stack.pop() else {
			return Ok(Vec::new());
		};
		let mut events = Vec::new();
		for i in 0..group.edits.len() {
			match group.edits[i].apply(cx) {
				Ok(ev) => events.extend(ev),
				Err(err) => {
					warn!(group = %group.name, error = %err, "redo failed, reverting group");
					for edit in group.edits[..i].iter_mut().rev() {
						if let Err(err) = edit.unapply(cx) {
							warn!(edit = edit.name(), error = %err, "revert failed");
						}
					}
					self.redo_stack.push(group);
					return Err(err);
				}
			}
		}
		debug!(group = %group.name, edits = group.edits.len(), "redo");
		self.undo_stack.push_back(group);
		self.enforce_limit();
		Ok(events)
	}

	/// Drops all history, including any open group.
	pub fn clear(&mut self) {
		self.undo_stack.clear();
		self.redo_stack.clear();
		self.open = None;
		self.depth = 0;
	}

	fn push_undo(&mut self, group: UndoGroup) {
		self.undo_stack.push_back(group);
		self.enforce_limit();
	}

	fn enforce_limit(&mut self) {
		while self.limit > 0 && self.undo_stack.len() > self.limit {
			self.undo_stack.pop_front();
		}
	}
}
