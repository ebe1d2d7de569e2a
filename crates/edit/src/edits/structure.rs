use tierline_model::{ModelError, Speaker, TranscriptElement};
use tracing::debug;

use super::EditContext;
use crate::error::{EditError, Result};
use crate::events::EditorEvent;

/// Inserts a transcript element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddElementEdit {
	index: usize,
	element: TranscriptElement,
	prev_current: Option<usize>,
}

impl AddElementEdit {
	/// Inserts `element` so that it ends up at `index`.
	pub fn new(index: usize, element: TranscriptElement) -> Self {
		Self {
			index,
			element,
			prev_current: None,
		}
	}

	/// Target index.
	pub fn index(&self) -> usize {
		self.index
	}

	/// Element being inserted.
	pub fn element(&self) -> &TranscriptElement {
		&self.element
	}

	pub(super) fn apply(&mut self, cx: &mut EditContext<'_>) -> Result<Vec<EditorEvent>> {
		let id = self.element.id();
		cx.session
			.transcript_mut()
			.insert(self.index, self.element.clone())?;
		let current = *cx.current_element;
		self.prev_current = Some(current);
		debug!(index = self.index, id = %id, "element added");

		let mut events = vec![EditorEvent::RecordAdded {
			element_index: self.index,
			id,
		}];
		if self.element.is_record() {
			cx.set_current(self.index, &mut events);
		} else if current >= self.index && cx.session.transcript().len() > 1 {
			cx.set_current(current + 1, &mut events);
		}
		Ok(events)
	}

	pub(super) fn unapply(&mut self, cx: &mut EditContext<'_>) -> Result<Vec<EditorEvent>> {
		let prev = self.prev_current.ok_or(EditError::NotApplied("add element"))?;
		self.element = cx.session.transcript_mut().remove(self.index)?;
		let mut events = vec![EditorEvent::RecordDeleted {
			element_index: self.index,
			id: self.element.id(),
		}];
		cx.set_current(prev, &mut events);
		Ok(events)
	}
}

/// Inserts a copy of a record, under a fresh id, right after it. The copy
/// becomes current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateRecordEdit {
	index: usize,
	insert: Option<AddElementEdit>,
}

impl DuplicateRecordEdit {
	/// Duplicates the record at `index`.
	pub fn new(index: usize) -> Self {
		Self { index, insert: None }
	}

	pub(super) fn apply(&mut self, cx: &mut EditContext<'_>) -> Result<Vec<EditorEvent>> {
		let insert = match self.insert.take() {
			Some(insert) => insert,
			None => {
				let copy = cx.session.transcript().record(self.index)?.duplicate();
				AddElementEdit::new(self.index + 1, TranscriptElement::Record(copy))
			}
		};
		debug!(index = self.index, "record duplicated");
		self.insert.insert(insert).apply(cx)
	}

	pub(super) fn unapply(&mut self, cx: &mut EditContext<'_>) -> Result<Vec<EditorEvent>> {
		self.insert
			.as_mut()
			.ok_or(EditError::NotApplied("duplicate record"))?
			.unapply(cx)
	}
}

/// Removes a transcript element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteElementEdit {
	index: usize,
	removed: Option<TranscriptElement>,
	prev_current: usize,
}

impl DeleteElementEdit {
	/// Removes the element at `index`.
	pub fn new(index: usize) -> Self {
		Self {
			index,
			removed: None,
			prev_current: 0,
		}
	}

	/// Index of the removed element.
	pub fn index(&self) -> usize {
		self.index
	}

	pub(super) fn apply(&mut self, cx: &mut EditContext<'_>) -> Result<Vec<EditorEvent>> {
		let removed = cx.session.transcript_mut().remove(self.index)?;
		let id = removed.id();
		self.removed = Some(removed);
		let current = *cx.current_element;
		self.prev_current = current;
		debug!(index = self.index, id = %id, "element deleted");

		let len = cx.session.transcript().len();
		let next = if len == 0 {
			0
		} else if current > self.index {
			current - 1
		} else {
			current.min(len - 1)
		};
		let mut events = vec![EditorEvent::RecordDeleted {
			element_index: self.index,
			id,
		}];
		cx.set_current(next, &mut events);
		Ok(events)
	}

	pub(super) fn unapply(&mut self, cx: &mut EditContext<'_>) -> Result<Vec<EditorEvent>> {
		let element = self
			.removed
			.clone()
			.ok_or(EditError::NotApplied("delete element"))?;
		let id = element.id();
		cx.session.transcript_mut().insert(self.index, element)?;
		self.removed = None;
		let mut events = vec![EditorEvent::RecordAdded {
			element_index: self.index,
			id,
		}];
		cx.set_current(self.prev_current, &mut events);
		Ok(events)
	}
}

/// Moves a transcript element to another index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveElementEdit {
	from: usize,
	to: usize,
	prev_current: Option<usize>,
}

impl MoveElementEdit {
	/// Moves the element at `from` so that it ends up at `to`.
	pub fn new(from: usize, to: usize) -> Self {
		Self {
			from,
			to,
			prev_current: None,
		}
	}

	pub(super) fn apply(&mut self, cx: &mut EditContext<'_>) -> Result<Vec<EditorEvent>> {
		cx.session.transcript_mut().move_element(self.from, self.to)?;
		let current = *cx.current_element;
		self.prev_current = Some(current);
		debug!(from = self.from, to = self.to, "element moved");

		let next = if current == self.from {
			self.to
		} else if self.from < current && current <= self.to {
			current - 1
		} else if self.to <= current && current < self.from {
			current + 1
		} else {
			current
		};
		let mut events = vec![EditorEvent::RecordMoved {
			from: self.from,
			to: self.to,
		}];
		cx.set_current(next, &mut events);
		Ok(events)
	}

	pub(super) fn unapply(&mut self, cx: &mut EditContext<'_>) -> Result<Vec<EditorEvent>> {
		let prev = self.prev_current.ok_or(EditError::NotApplied("move element"))?;
		cx.session.transcript_mut().move_element(self.to, self.from)?;
		let mut events = vec![EditorEvent::RecordMoved {
			from: self.to,
			to: self.from,
		}];
		cx.set_current(prev, &mut events);
		Ok(events)
	}
}

/// Reassigns a record's speaker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSpeakerEdit {
	element_index: usize,
	speaker: Speaker,
	old: Option<Speaker>,
}

impl ChangeSpeakerEdit {
	/// Assigns `speaker` to the record at `element_index`.
	pub fn new(element_index: usize, speaker: Speaker) -> Self {
		Self {
			element_index,
			speaker,
			old: None,
		}
	}

	pub(super) fn apply(&mut self, cx: &mut EditContext<'_>) -> Result<Vec<EditorEvent>> {
		let record = cx.session.transcript_mut().record_mut(self.element_index)?;
		self.old = Some(record.set_speaker(self.speaker.clone()));
		Ok(vec![EditorEvent::RecordChanged {
			element_index: self.element_index,
		}])
	}

	pub(super) fn unapply(&mut self, cx: &mut EditContext<'_>) -> Result<Vec<EditorEvent>> {
		let old = self.old.clone().ok_or(EditError::NotApplied("change speaker"))?;
		cx.session
			.transcript_mut()
			.record_mut(self.element_index)?
			.set_speaker(old);
		Ok(vec![EditorEvent::RecordChanged {
			element_index: self.element_index,
		}])
	}
}

/// Replaces the text of a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeCommentEdit {
	element_index: usize,
	text: String,
	old: Option<String>,
}

impl ChangeCommentEdit {
	/// Sets the text of the comment at `element_index`.
	pub fn new(element_index: usize, text: impl Into<String>) -> Self {
		Self {
			element_index,
			text: text.into(),
			old: None,
		}
	}

	fn swap(&self, cx: &mut EditContext<'_>, text: String) -> Result<String> {
		match cx.session.transcript_mut().element_mut(self.element_index)? {
			TranscriptElement::Comment(comment) => Ok(std::mem::replace(&mut comment.text, text)),
			_ => Err(ModelError::NotAComment(self.element_index).into()),
		}
	}

	pub(super) fn apply(&mut self, cx: &mut EditContext<'_>) -> Result<Vec<EditorEvent>> {
		self.old = Some(self.swap(cx, self.text.clone())?);
		Ok(vec![EditorEvent::RecordChanged {
			element_index: self.element_index,
		}])
	}

	pub(super) fn unapply(&mut self, cx: &mut EditContext<'_>) -> Result<Vec<EditorEvent>> {
		let old = self.old.clone().ok_or(EditError::NotApplied("change comment"))?;
		self.swap(cx, old)?;
		Ok(vec![EditorEvent::RecordChanged {
			element_index: self.element_index,
		}])
	}
}

/// Replaces the label of a gem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeGemEdit {
	element_index: usize,
	label: String,
	old: Option<String>,
}

impl ChangeGemEdit {
	/// Sets the label of the gem at `element_index`.
	pub fn new(element_index: usize, label: impl Into<String>) -> Self {
		Self {
			element_index,
			label: label.into(),
			old: None,
		}
	}

	fn swap(&self, cx: &mut EditContext<'_>, label: String) -> Result<String> {
		match cx.session.transcript_mut().element_mut(self.element_index)? {
			TranscriptElement::Gem(gem) => Ok(std::mem::replace(&mut gem.label, label)),
			_ => Err(ModelError::NotAGem(self.element_index).into()),
		}
	}

	pub(super) fn apply(&mut self, cx: &mut EditContext<'_>) -> Result<Vec<EditorEvent>> {
		self.old = Some(self.swap(cx, self.label.clone())?);
		Ok(vec![EditorEvent::RecordChanged {
			element_index: self.element_index,
		}])
	}

	pub(super) fn unapply(&mut self, cx: &mut EditContext<'_>) -> Result<Vec<EditorEvent>> {
		let old = self.old.clone().ok_or(EditError::NotApplied("change gem"))?;
		self.swap(cx, old)?;
		Ok(vec![EditorEvent::RecordChanged {
			element_index: self.element_index,
		}])
	}
}
