use tierline_model::{IpaTranscript, ModelError, Session, SyllabificationInfo, SyllableConstituentType};
use tracing::debug;

use super::EditContext;
use crate::error::{EditError, Result};
use crate::events::EditorEvent;

fn ipa_mut<'s>(session: &'s mut Session, element_index: usize, tier: &str) -> Result<&'s mut IpaTranscript> {
	session
		.transcript_mut()
		.record_mut(element_index)?
		.tier_mut(tier)
		.ok_or_else(|| EditError::from(ModelError::UnknownTier(tier.to_owned())))?
		.ipa_mut()
		.ok_or_else(|| EditError::NotIpa(tier.to_owned()))
}

fn info_at(ipa: &IpaTranscript, index: usize) -> Result<SyllabificationInfo> {
	ipa.get(index)
		.map(|e| e.syllabification())
		.ok_or_else(|| {
			ModelError::PhoneIndex {
				index,
				len: ipa.len(),
			}
			.into()
		})
}

fn restore(ipa: &mut IpaTranscript, index: usize, info: SyllabificationInfo) -> Result<()> {
	ipa.set_constituent(index, info.constituent)?;
	ipa.set_diphthong_member(index, info.diphthong_member)?;
	Ok(())
}

fn changed(element_index: usize, tier: &str) -> Vec<EditorEvent> {
	vec![EditorEvent::TierChange {
		element_index,
		tier: tier.to_owned(),
		value_adjusting: false,
	}]
}

/// Reassigns the constituent type of one IPA element.
///
/// Leaving the nucleus position also drops any diphthong pairing, on both
/// members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScTypeEdit {
	element_index: usize,
	tier: String,
	phone_index: usize,
	constituent: SyllableConstituentType,
	old: Option<SyllabificationInfo>,
	old_partner: Option<(usize, SyllabificationInfo)>,
}

impl ScTypeEdit {
	/// Sets element `phone_index` of IPA tier `tier` to `constituent`.
	pub fn new(
		element_index: usize,
		tier: impl Into<String>,
		phone_index: usize,
		constituent: SyllableConstituentType,
	) -> Self {
		Self {
			element_index,
			tier: tier.into(),
			phone_index,
			constituent,
			old: None,
			old_partner: None,
		}
	}

	pub(super) fn apply(&mut self, cx: &mut EditContext<'_>) -> Result<Vec<EditorEvent>> {
		let ipa = ipa_mut(cx.session, self.element_index, &self.tier)?;
		let old = info_at(ipa, self.phone_index)?;
		let leaves_nucleus = self.constituent != SyllableConstituentType::Nucleus;
		let partner = match ipa.member_partner(self.phone_index) {
			Some(partner) if leaves_nucleus => Some((partner, info_at(ipa, partner)?)),
			_ => None,
		};
		ipa.set_constituent(self.phone_index, self.constituent)?;
		if leaves_nucleus {
			ipa.set_diphthong_member(self.phone_index, false)?;
		}
		if let Some((partner, _)) = partner {
			ipa.set_diphthong_member(partner, false)?;
		}
		self.old = Some(old);
		self.old_partner = partner;
		debug!(
			element = self.element_index,
			tier = %self.tier,
			phone = self.phone_index,
			constituent = %self.constituent,
			"constituent set"
		);
		Ok(changed(self.element_index, &self.tier))
	}

	pub(super) fn unapply(&mut self, cx: &mut EditContext<'_>) -> Result<Vec<EditorEvent>> {
		let old = self.old.ok_or(EditError::NotApplied("change syllable constituent"))?;
		let ipa = ipa_mut(cx.session, self.element_index, &self.tier)?;
		restore(ipa, self.phone_index, old)?;
		if let Some((partner, info)) = self.old_partner {
			restore(ipa, partner, info)?;
		}
		Ok(changed(self.element_index, &self.tier))
	}
}

/// Flips the diphthong pairing of two nuclei together.
///
/// Both elements become nuclei flagged as diphthong members when the first
/// was not one, and lose the flag otherwise. Reverting restores both
/// elements' previous metadata exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleDiphthongEdit {
	element_index: usize,
	tier: String,
	phones: [usize; 2],
	old: Option<[SyllabificationInfo; 2]>,
}

impl ToggleDiphthongEdit {
	/// Toggles the pairing of elements `first` and `second` of IPA tier `tier`.
	pub fn new(element_index: usize, tier: impl Into<String>, first: usize, second: usize) -> Self {
		Self {
			element_index,
			tier: tier.into(),
			phones: [first, second],
			old: None,
		}
	}

	/// The two paired element indices.
	pub fn phones(&self) -> [usize; 2] {
		self.phones
	}

	pub(super) fn apply(&mut self, cx: &mut EditContext<'_>) -> Result<Vec<EditorEvent>> {
		let ipa = ipa_mut(cx.session, self.element_index, &self.tier)?;
		let old = [info_at(ipa, self.phones[0])?, info_at(ipa, self.phones[1])?];
		let member = !old[0].diphthong_member;
		for &index in &self.phones {
			ipa.set_constituent(index, SyllableConstituentType::Nucleus)?;
			ipa.set_diphthong_member(index, member)?;
		}
		self.old = Some(old);
		debug!(
			element = self.element_index,
			tier = %self.tier,
			first = self.phones[0],
			second = self.phones[1],
			member,
			"diphthong toggled"
		);
		Ok(changed(self.element_index, &self.tier))
	}

	pub(super) fn unapply(&mut self, cx: &mut EditContext<'_>) -> Result<Vec<EditorEvent>> {
		let old = self.old.ok_or(EditError::NotApplied("toggle diphthong"))?;
		let ipa = ipa_mut(cx.session, self.element_index, &self.tier)?;
		for (&index, info) in self.phones.iter().zip(old) {
			restore(ipa, index, info)?;
		}
		Ok(changed(self.element_index, &self.tier))
	}
}

/// Re-runs the syllabifier over an IPA tier, discarding manual edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetSyllabificationEdit {
	element_index: usize,
	tier: String,
	old: Option<Vec<SyllabificationInfo>>,
}

impl ResetSyllabificationEdit {
	/// Resets IPA tier `tier` of the record at `element_index`.
	pub fn new(element_index: usize, tier: impl Into<String>) -> Self {
		Self {
			element_index,
			tier: tier.into(),
			old: None,
		}
	}

	pub(super) fn apply(&mut self, cx: &mut EditContext<'_>) -> Result<Vec<EditorEvent>> {
		let ipa = ipa_mut(cx.session, self.element_index, &self.tier)?;
		self.old = Some(ipa.syllabification());
		ipa.syllabify();
		Ok(changed(self.element_index, &self.tier))
	}

	pub(super) fn unapply(&mut self, cx: &mut EditContext<'_>) -> Result<Vec<EditorEvent>> {
		let old = self
			.old
			.as_deref()
			.ok_or(EditError::NotApplied("reset syllabification"))?;
		ipa_mut(cx.session, self.element_index, &self.tier)?.restore_syllabification(old);
		Ok(changed(self.element_index, &self.tier))
	}
}
