use tierline_model::{
	ModelError, Record, RemovedTier, SystemTier, Tier, TierContent, TierDescription, TierValue,
	TierView,
};
use tracing::{debug, trace};

use super::EditContext;
use crate::error::{EditError, Result};
use crate::events::EditorEvent;

fn tier_mut<'r>(record: &'r mut Record, name: &str) -> Result<&'r mut Tier> {
	record
		.tier_mut(name)
		.ok_or_else(|| ModelError::UnknownTier(name.to_owned()).into())
}

/// Replaces the content of one tier of one record.
///
/// A committed change to IPA Target or IPA Actual also recomputes the
/// record's Alignment tier as part of the same edit. With a transcriber
/// set, the edit writes that transcriber's blind content instead of the
/// shared value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierEdit {
	element_index: usize,
	tier: String,
	transcriber: Option<String>,
	content: TierContent,
	/// True for transient live-typing changes.
	pub value_adjusting: bool,
	old: Option<Option<TierContent>>,
	old_alignment: Option<TierContent>,
}

impl TierEdit {
	/// Sets `tier` of the record at `element_index` to `content`.
	pub fn new(element_index: usize, tier: impl Into<String>, content: TierContent) -> Self {
		Self {
			element_index,
			tier: tier.into(),
			transcriber: None,
			content,
			value_adjusting: false,
			old: None,
			old_alignment: None,
		}
	}

	/// Marks the edit as transient.
	pub fn with_value_adjusting(mut self, value_adjusting: bool) -> Self {
		self.value_adjusting = value_adjusting;
		self
	}

	/// Writes blind content for `transcriber` instead of the shared value.
	pub fn for_transcriber(mut self, transcriber: impl Into<String>) -> Self {
		self.transcriber = Some(transcriber.into());
		self
	}

	/// Record index.
	pub fn element_index(&self) -> usize {
		self.element_index
	}

	/// Tier name.
	pub fn tier(&self) -> &str {
		&self.tier
	}

	/// Blind transcriber, if any.
	pub fn transcriber(&self) -> Option<&str> {
		self.transcriber.as_deref()
	}

	/// New content.
	pub fn content(&self) -> &TierContent {
		&self.content
	}

	/// Returns true if `next` edits the same value and may be folded into this edit.
	pub fn can_absorb(&self, next: &TierEdit) -> bool {
		self.value_adjusting
			&& self.element_index == next.element_index
			&& self.tier == next.tier
			&& self.transcriber == next.transcriber
	}

	/// Folds an already applied `next` into this edit: the original value is
	/// kept, the newest value wins.
	pub fn absorb(&mut self, next: TierEdit) {
		self.content = next.content;
		self.value_adjusting = next.value_adjusting;
		self.old_alignment = self.old_alignment.take().or(next.old_alignment);
	}

	fn drives_alignment(&self) -> bool {
		self.transcriber.is_none()
			&& matches!(
				SystemTier::from_name(&self.tier),
				Some(SystemTier::IpaTarget | SystemTier::IpaActual)
			)
	}

	pub(super) fn apply(&mut self, cx: &mut EditContext<'_>) -> Result<Vec<EditorEvent>> {
		let record = cx.session.transcript_mut().record_mut(self.element_index)?;
		let tier = tier_mut(record, &self.tier)?;
		self.old = Some(match &self.transcriber {
			Some(t) => tier.set_blind_content(t, Some(self.content.clone())),
			None => Some(tier.set_content(self.content.clone())),
		});
		trace!(
			element = self.element_index,
			tier = %self.tier,
			adjusting = self.value_adjusting,
			"tier value set"
		);

		let mut events = vec![EditorEvent::TierChange {
			element_index: self.element_index,
			tier: self.tier.clone(),
			value_adjusting: self.value_adjusting,
		}];
		if !self.value_adjusting && self.drives_alignment() {
			let alignment = record.compute_alignment();
			let name = SystemTier::Alignment.name();
			if let Some(tier) = record.tier_mut(name) {
				self.old_alignment =
					Some(tier.set_content(TierContent::Value(TierValue::Alignment(alignment))));
				events.push(EditorEvent::TierChange {
					element_index: self.element_index,
					tier: name.to_owned(),
					value_adjusting: false,
				});
			}
		}
		Ok(events)
	}

	pub(super) fn unapply(&mut self, cx: &mut EditContext<'_>) -> Result<Vec<EditorEvent>> {
		let old = self.old.clone().ok_or(EditError::NotApplied("change tier"))?;
		let record = cx.session.transcript_mut().record_mut(self.element_index)?;
		let tier = tier_mut(record, &self.tier)?;
		match (&self.transcriber, old) {
			(Some(t), old) => {
				tier.set_blind_content(t, old);
			}
			(None, Some(old)) => {
				tier.set_content(old);
			}
			(None, None) => return Err(EditError::NotApplied("change tier")),
		}

		let mut events = vec![EditorEvent::TierChange {
			element_index: self.element_index,
			tier: self.tier.clone(),
			value_adjusting: false,
		}];
		if let Some(alignment) = self.old_alignment.take() {
			let name = SystemTier::Alignment.name();
			tier_mut(record, name)?.set_content(alignment);
			events.push(EditorEvent::TierChange {
				element_index: self.element_index,
				tier: name.to_owned(),
				value_adjusting: false,
			});
		}
		Ok(events)
	}
}

/// Replaces the tier view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierViewEdit {
	view: TierView,
	old: Option<TierView>,
}

impl TierViewEdit {
	/// Installs `view`; it must reference every declared tier exactly once.
	pub fn new(view: TierView) -> Self {
		Self { view, old: None }
	}

	pub(super) fn apply(&mut self, cx: &mut EditContext<'_>) -> Result<Vec<EditorEvent>> {
		self.old = Some(cx.session.set_tier_view(self.view.clone())?);
		debug!("tier view changed");
		Ok(vec![EditorEvent::TierViewChanged])
	}

	pub(super) fn unapply(&mut self, cx: &mut EditContext<'_>) -> Result<Vec<EditorEvent>> {
		let old = self.old.clone().ok_or(EditError::NotApplied("change tier view"))?;
		cx.session.set_tier_view(old)?;
		Ok(vec![EditorEvent::TierViewChanged])
	}
}

/// Adds a tier to the blind set or removes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleBlindTierEdit {
	tier: String,
	was_blind: Option<bool>,
}

impl ToggleBlindTierEdit {
	/// Toggles blind transcription on `tier`.
	pub fn new(tier: impl Into<String>) -> Self {
		Self {
			tier: tier.into(),
			was_blind: None,
		}
	}

	pub(super) fn apply(&mut self, cx: &mut EditContext<'_>) -> Result<Vec<EditorEvent>> {
		if cx.session.tier_type(&self.tier).is_none() {
			return Err(ModelError::UnknownTier(self.tier.clone()).into());
		}
		let was = cx.session.is_blind(&self.tier);
		cx.session.set_blind(&self.tier, !was);
		self.was_blind = Some(was);
		debug!(tier = %self.tier, blind = !was, "blind tier toggled");
		Ok(vec![EditorEvent::TierViewChanged])
	}

	pub(super) fn unapply(&mut self, cx: &mut EditContext<'_>) -> Result<Vec<EditorEvent>> {
		let was = self.was_blind.ok_or(EditError::NotApplied("toggle blind tier"))?;
		cx.session.set_blind(&self.tier, was);
		Ok(vec![EditorEvent::TierViewChanged])
	}
}

/// Declares a user tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddTierEdit {
	description: TierDescription,
	removed: Option<RemovedTier>,
}

impl AddTierEdit {
	/// Declares `description` on the session and every record.
	pub fn new(description: TierDescription) -> Self {
		Self {
			description,
			removed: None,
		}
	}

	pub(super) fn apply(&mut self, cx: &mut EditContext<'_>) -> Result<Vec<EditorEvent>> {
		match self.removed.take() {
			Some(removed) => cx.session.restore_user_tier(removed),
			None => cx.session.add_user_tier(self.description.clone())?,
		}
		debug!(tier = %self.description.name, "tier added");
		Ok(vec![EditorEvent::TierViewChanged])
	}

	pub(super) fn unapply(&mut self, cx: &mut EditContext<'_>) -> Result<Vec<EditorEvent>> {
		self.removed = Some(cx.session.remove_user_tier(&self.description.name)?);
		Ok(vec![EditorEvent::TierViewChanged])
	}
}

/// Removes a user tier along with its values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveTierEdit {
	name: String,
	removed: Option<RemovedTier>,
}

impl RemoveTierEdit {
	/// Removes the user tier `name`.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			removed: None,
		}
	}

	pub(super) fn apply(&mut self, cx: &mut EditContext<'_>) -> Result<Vec<EditorEvent>> {
		self.removed = Some(cx.session.remove_user_tier(&self.name)?);
		debug!(tier = %self.name, "tier removed");
		Ok(vec![EditorEvent::TierViewChanged])
	}

	pub(super) fn unapply(&mut self, cx: &mut EditContext<'_>) -> Result<Vec<EditorEvent>> {
		let removed = self
			.removed
			.take()
			.ok_or(EditError::NotApplied("remove tier"))?;
		cx.session.restore_user_tier(removed);
		Ok(vec![EditorEvent::TierViewChanged])
	}
}

/// Renames a user tier everywhere it is referenced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameTierEdit {
	old: String,
	new: String,
	applied: bool,
}

impl RenameTierEdit {
	/// Renames the user tier `old` to `new`.
	pub fn new(old: impl Into<String>, new: impl Into<String>) -> Self {
		Self {
			old: old.into(),
			new: new.into(),
			applied: false,
		}
	}

	pub(super) fn apply(&mut self, cx: &mut EditContext<'_>) -> Result<Vec<EditorEvent>> {
		cx.session.rename_user_tier(&self.old, &self.new)?;
		self.applied = true;
		debug!(old = %self.old, new = %self.new, "tier renamed");
		Ok(vec![EditorEvent::TierViewChanged])
	}

	pub(super) fn unapply(&mut self, cx: &mut EditContext<'_>) -> Result<Vec<EditorEvent>> {
		if !self.applied {
			return Err(EditError::NotApplied("rename tier"));
		}
		cx.session.rename_user_tier(&self.new, &self.old)?;
		self.applied = false;
		Ok(vec![EditorEvent::TierViewChanged])
	}
}
