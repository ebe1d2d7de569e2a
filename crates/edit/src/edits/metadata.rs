use chrono::NaiveDate;
use tracing::debug;

use super::EditContext;
use crate::error::{EditError, Result};
use crate::events::EditorEvent;

/// Sets or clears the session date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDateEdit {
	date: Option<NaiveDate>,
	old: Option<Option<NaiveDate>>,
}

impl SessionDateEdit {
	/// Sets the session date to `date`.
	pub fn new(date: Option<NaiveDate>) -> Self {
		Self { date, old: None }
	}

	pub(super) fn apply(&mut self, cx: &mut EditContext<'_>) -> Result<Vec<EditorEvent>> {
		self.old = Some(std::mem::replace(&mut cx.session.date, self.date));
		debug!(date = ?self.date, "session date changed");
		Ok(vec![EditorEvent::SessionMetadataChanged])
	}

	pub(super) fn unapply(&mut self, cx: &mut EditContext<'_>) -> Result<Vec<EditorEvent>> {
		cx.session.date = self
			.old
			.take()
			.ok_or(EditError::NotApplied("change session date"))?;
		Ok(vec![EditorEvent::SessionMetadataChanged])
	}
}

/// Sets or clears the media file the session is transcribed against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaLocationEdit {
	media: Option<String>,
	old: Option<Option<String>>,
}

impl MediaLocationEdit {
	/// Points the session at `media`.
	pub fn new(media: Option<String>) -> Self {
		Self { media, old: None }
	}

	pub(super) fn apply(&mut self, cx: &mut EditContext<'_>) -> Result<Vec<EditorEvent>> {
		self.old = Some(std::mem::replace(&mut cx.session.media, self.media.clone()));
		debug!(media = ?self.media, "media location changed");
		Ok(vec![EditorEvent::SessionMetadataChanged])
	}

	pub(super) fn unapply(&mut self, cx: &mut EditContext<'_>) -> Result<Vec<EditorEvent>> {
		cx.session.media = self
			.old
			.take()
			.ok_or(EditError::NotApplied("change media location"))?;
		Ok(vec![EditorEvent::SessionMetadataChanged])
	}
}
