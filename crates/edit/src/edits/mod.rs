//! Invertible edits over a [`Session`].
//!
//! Each edit records whatever it needs to revert itself while applying, so
//! `unapply` after `apply` restores the session exactly, and `apply` after
//! `unapply` replays it exactly. Both return the events describing the
//! change; callers deliver them.

mod metadata;
mod structure;
mod syllables;
mod tier;

use tierline_model::Session;

pub use metadata::{MediaLocationEdit, SessionDateEdit};
pub use structure::{
	AddElementEdit, ChangeCommentEdit, ChangeGemEdit, ChangeSpeakerEdit, DeleteElementEdit,
	DuplicateRecordEdit, MoveElementEdit,
};
pub use syllables::{ResetSyllabificationEdit, ScTypeEdit, ToggleDiphthongEdit};
pub use tier::{
	AddTierEdit, RemoveTierEdit, RenameTierEdit, TierEdit, TierViewEdit, ToggleBlindTierEdit,
};

use crate::error::Result;
use crate::events::EditorEvent;

/// Mutable state an edit operates on.
#[derive(Debug)]
pub struct EditContext<'a> {
	/// Session being edited.
	pub session: &'a mut Session,
	/// Element index the editor considers current.
	pub current_element: &'a mut usize,
}

impl<'a> EditContext<'a> {
	/// Bundles a session and current element index.
	pub fn new(session: &'a mut Session, current_element: &'a mut usize) -> Self {
		Self {
			session,
			current_element,
		}
	}

	fn set_current(&mut self, index: usize, events: &mut Vec<EditorEvent>) {
		if *self.current_element != index {
			*self.current_element = index;
			events.push(EditorEvent::CurrentRecordChanged { element_index: index });
		}
	}
}

/// Any edit the undo manager can hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEdit {
	AddElement(AddElementEdit),
	DeleteElement(DeleteElementEdit),
	MoveElement(MoveElementEdit),
	Tier(TierEdit),
	ChangeSpeaker(ChangeSpeakerEdit),
	ChangeComment(ChangeCommentEdit),
	ChangeGem(ChangeGemEdit),
	TierView(TierViewEdit),
	ToggleBlindTier(ToggleBlindTierEdit),
	AddTier(AddTierEdit),
	RemoveTier(RemoveTierEdit),
	ScType(ScTypeEdit),
	ToggleDiphthong(ToggleDiphthongEdit),
	ResetSyllabification(ResetSyllabificationEdit),
	RenameTier(RenameTierEdit),
	DuplicateRecord(DuplicateRecordEdit),
	SessionDate(SessionDateEdit),
	MediaLocation(MediaLocationEdit),
}

macro_rules! dispatch {
	($self:ident, $edit:ident => $body:expr) => {
		match $self {
			SessionEdit::AddElement($edit) => $body,
			SessionEdit::DeleteElement($edit) => $body,
			SessionEdit::MoveElement($edit) => $body,
			SessionEdit::Tier($edit) => $body,
			SessionEdit::ChangeSpeaker($edit) => $body,
			SessionEdit::ChangeComment($edit) => $body,
			SessionEdit::ChangeGem($edit) => $body,
			SessionEdit::TierView($edit) => $body,
			SessionEdit::ToggleBlindTier($edit) => $body,
			SessionEdit::AddTier($edit) => $body,
			SessionEdit::RemoveTier($edit) => $body,
			SessionEdit::ScType($edit) => $body,
			SessionEdit::ToggleDiphthong($edit) => $body,
			SessionEdit::ResetSyllabification($edit) => $body,
			SessionEdit::RenameTier($edit) => $body,
			SessionEdit::DuplicateRecord($edit) => $body,
			SessionEdit::SessionDate($edit) => $body,
			SessionEdit::MediaLocation($edit) => $body,
		}
	};
}

impl SessionEdit {
	/// Applies the edit, returning the resulting events.
	///
	/// On error the session is left untouched.
	pub fn apply(&mut self, cx: &mut EditContext<'_>) -> Result<Vec<EditorEvent>> {
		dispatch!(self, edit => edit.apply(cx))
	}

	/// Reverts a previously applied edit.
	pub fn unapply(&mut self, cx: &mut EditContext<'_>) -> Result<Vec<EditorEvent>> {
		dispatch!(self, edit => edit.unapply(cx))
	}

	/// Short human readable name, used for undo menu labels.
	pub fn name(&self) -> &'static str {
		match self {
			Self::AddElement(_) => "add element",
			Self::DeleteElement(_) => "delete element",
			Self::MoveElement(_) => "move element",
			Self::Tier(_) => "change tier",
			Self::ChangeSpeaker(_) => "change speaker",
			Self::ChangeComment(_) => "change comment",
			Self::ChangeGem(_) => "change gem",
			Self::TierView(_) => "change tier view",
			Self::ToggleBlindTier(_) => "toggle blind tier",
			Self::AddTier(_) => "add tier",
			Self::RemoveTier(_) => "remove tier",
			Self::ScType(_) => "change syllable constituent",
			Self::ToggleDiphthong(_) => "toggle diphthong",
			Self::ResetSyllabification(_) => "reset syllabification",
			Self::RenameTier(_) => "rename tier",
			Self::DuplicateRecord(_) => "duplicate record",
			Self::SessionDate(_) => "change session date",
			Self::MediaLocation(_) => "change media location",
		}
	}

	/// True for transient edits that coalesce with their successor.
	pub fn is_value_adjusting(&self) -> bool {
		matches!(self, Self::Tier(edit) if edit.value_adjusting)
	}
}

macro_rules! impl_from {
	($($variant:ident($ty:ty)),* $(,)?) => {
		$(impl From<$ty> for SessionEdit {
			fn from(edit: $ty) -> Self {
				Self::$variant(edit)
			}
		})*
	};
}

impl_from!(
	AddElement(AddElementEdit),
	DeleteElement(DeleteElementEdit),
	MoveElement(MoveElementEdit),
	Tier(TierEdit),
	ChangeSpeaker(ChangeSpeakerEdit),
	ChangeComment(ChangeCommentEdit),
	ChangeGem(ChangeGemEdit),
	TierView(TierViewEdit),
	ToggleBlindTier(ToggleBlindTierEdit),
	AddTier(AddTierEdit),
	RemoveTier(RemoveTierEdit),
	ScType(ScTypeEdit),
	ToggleDiphthong(ToggleDiphthongEdit),
	ResetSyllabification(ResetSyllabificationEdit),
	RenameTier(RenameTierEdit),
	DuplicateRecord(DuplicateRecordEdit),
	SessionDate(SessionDateEdit),
	MediaLocation(MediaLocationEdit),
);

#[cfg(test)]
mod tests;
