//! Keeping the buffer in step with session changes.

use tierline_edit::EditorEvent;
use tierline_model::{ElementId, Session};
use tracing::{debug, trace, warn};

use super::TranscriptDocument;
use crate::mode::ModeTransition;

impl TranscriptDocument {
	/// Updates the buffer for an event fired after the session changed.
	///
	/// Returns follow-up events, such as leaving syllabification edit mode.
	pub fn handle_event(&mut self, session: &Session, event: &EditorEvent) -> Vec<EditorEvent> {
		let mut follow_up = Vec::new();
		if event.is_structural() && self.edit_state.cancel() == ModeTransition::Exited {
			follow_up.push(EditorEvent::SyllabificationEditMode { active: false });
		}
		match event {
			EditorEvent::RecordAdded { element_index, id } => self.element_added(session, *element_index, *id),
			EditorEvent::RecordDeleted { element_index, id } => {
				self.element_deleted(session, *element_index, *id)
			}
			EditorEvent::RecordMoved { from, to } => self.element_moved(session, *from, *to),
			EditorEvent::RecordChanged { element_index } => self.rebuild_element(session, *element_index),
			EditorEvent::CurrentRecordChanged { element_index } => {
				self.focus_changed(session, *element_index, &mut follow_up)
			}
			EditorEvent::TierChange {
				element_index,
				tier,
				value_adjusting,
			} => self.tier_changed(session, *element_index, tier, *value_adjusting),
			EditorEvent::SessionChanged | EditorEvent::TierViewChanged | EditorEvent::EditorReloadFromDisk => {
				self.dirty = None;
				self.rebuild_all(session);
			}
			EditorEvent::DerivedTierToggled { .. }
			| EditorEvent::SyllabificationEditMode { .. }
			| EditorEvent::CaretMoved { .. }
			| EditorEvent::SessionMetadataChanged
			| EditorEvent::ModifiedFlagChanged(_) => {}
		}
		follow_up
	}

	/// Remaps every stored element index. [`None`] drops the reference.
	fn remap_indices(&mut self, f: impl Fn(usize) -> Option<usize>) {
		self.caret_location = self
			.caret_location
			.take()
			.and_then(|mut loc| f(loc.element_index).map(|i| {
				loc.element_index = i;
				loc
			}));
		self.dirty = self
			.dirty
			.take()
			.and_then(|(element, tier)| f(element).map(|i| (i, tier)));
	}

	fn element_added(&mut self, session: &Session, index: usize, id: ElementId) {
		self.remap_indices(|i| Some(if i >= index { i + 1 } else { i }));
		if self.options.single_record_view {
			return self.rebuild_all(session);
		}
		if session.transcript().get(index).map(|e| e.id()) != Some(id) {
			warn!(index, id = %id, "added element not at its index, rebuilding document");
			return self.rebuild_all(session);
		}
		self.map.renumber(index, 1);
		let spliced = self
			.prepare_element(session, index)
			.map(|prepared| self.splice_prepared(prepared));
		match spliced {
			Some(Ok(true)) => trace!(index, "element inserted"),
			_ => return self.rebuild_all(session),
		}
		// The element that carried the derived lines moved up by one.
		if self.focused >= index && self.extensions.iter().any(|e| e.is_enabled()) {
			self.rebuild_element(session, self.focused + 1);
		}
		self.restore_caret();
	}

	fn element_deleted(&mut self, session: &Session, index: usize, id: ElementId) {
		self.remap_indices(|i| match i.cmp(&index) {
			std::cmp::Ordering::Less => Some(i),
			std::cmp::Ordering::Equal => None,
			std::cmp::Ordering::Greater => Some(i - 1),
		});
		self.stamps.remove(&id);
		if self.options.single_record_view {
			return self.rebuild_all(session);
		}
		let Some(runs) = self.map.element_runs(index) else {
			return self.rebuild_all(session);
		};
		if self.map.runs()[runs.start].attrs.element_id != id {
			warn!(index, id = %id, "deleted element not at its index, rebuilding document");
			return self.rebuild_all(session);
		}
		if let Err(err) = self.splice_runs(runs, Vec::new()) {
			warn!(index, error = %err, "element removal failed, rebuilding document");
			return self.rebuild_all(session);
		}
		self.map.renumber(index + 1, -1);
		trace!(index, "element removed");
		if self.focused == index {
			self.rebuild_element(session, index);
		}
		self.restore_caret();
	}

	fn element_moved(&mut self, session: &Session, from: usize, to: usize) {
		self.remap_indices(|i| {
			Some(if i == from {
				to
			} else if from < to && (from + 1..=to).contains(&i) {
				i - 1
			} else if to < from && (to..from).contains(&i) {
				i + 1
			} else {
				i
			})
		});
		if self.options.single_record_view {
			return self.rebuild_all(session);
		}
		self.rebuild_range(session, from.min(to)..from.max(to) + 1);
	}

	fn focus_changed(&mut self, session: &Session, index: usize, follow_up: &mut Vec<EditorEvent>) {
		let old = std::mem::replace(&mut self.focused, index);
		if old == index {
			return;
		}
		debug!(from = old, to = index, "focus changed");
		if self.edit_state.element_index().is_some_and(|e| e != index)
			&& self.edit_state.cancel() == ModeTransition::Exited
		{
			follow_up.push(EditorEvent::SyllabificationEditMode { active: false });
		}
		if self.options.single_record_view {
			return self.rebuild_all(session);
		}
		if self.extensions.iter().any(|e| e.is_enabled()) {
			self.rebuild_element(session, old);
			self.rebuild_element(session, index);
		}
	}

	fn tier_changed(&mut self, session: &Session, index: usize, tier: &str, value_adjusting: bool) {
		let at_caret = self
			.caret_location
			.as_ref()
			.is_some_and(|l| l.element_index == index && l.tier == tier);
		if value_adjusting && at_caret {
			return;
		}
		if !value_adjusting
			&& at_caret
			&& self.dirty.as_ref().is_some_and(|(e, t)| *e == index && t == tier)
		{
			self.dirty = None;
		}
		let derived = self.derived_target(session) == Some(index)
			&& self
				.extensions
				.iter()
				.any(|e| e.is_enabled() && e.depends_on(session, tier));
		if derived {
			self.rebuild_element(session, index);
		} else {
			self.rebuild_tier(session, index, tier);
		}
	}
}
