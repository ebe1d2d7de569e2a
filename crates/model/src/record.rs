use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::alignment::PhoneAlignment;
use crate::ids::ElementId;
use crate::ipa::IpaTranscript;
use crate::orthography::Orthography;
use crate::participant::Speaker;
use crate::segment::MediaSegment;
use crate::tier::{SystemTier, Tier, TierType, TierValue};

/// One transcribed utterance.
///
/// Created through [`Session::new_record`](crate::Session::new_record) so
/// that it carries one tier per declared tier name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
	id: ElementId,
	speaker: Speaker,
	tiers: IndexMap<String, Tier>,
	#[serde(default)]
	exclude_from_searches: bool,
}

impl Record {
	pub(crate) fn new(speaker: Speaker, tiers: impl IntoIterator<Item = (String, TierType)>) -> Self {
		Self {
			id: ElementId::new(),
			speaker,
			tiers: tiers
				.into_iter()
				.map(|(name, ty)| (name.clone(), Tier::new(name, ty)))
				.collect(),
			exclude_from_searches: false,
		}
	}

	/// Stable id.
	pub fn id(&self) -> ElementId {
		self.id
	}

	/// Speaker reference.
	pub fn speaker(&self) -> &Speaker {
		&self.speaker
	}

	/// Replaces the speaker, returning the previous one.
	pub fn set_speaker(&mut self, speaker: Speaker) -> Speaker {
		std::mem::replace(&mut self.speaker, speaker)
	}

	/// Returns true if find should skip this record.
	pub fn is_excluded_from_searches(&self) -> bool {
		self.exclude_from_searches
	}

	/// Sets the search exclusion flag.
	pub fn set_excluded_from_searches(&mut self, excluded: bool) {
		self.exclude_from_searches = excluded;
	}

	/// Tier by name.
	pub fn tier(&self, name: &str) -> Option<&Tier> {
		self.tiers.get(name)
	}

	/// Mutable tier by name.
	pub fn tier_mut(&mut self, name: &str) -> Option<&mut Tier> {
		self.tiers.get_mut(name)
	}

	/// All tiers in declaration order.
	pub fn tiers(&self) -> impl Iterator<Item = &Tier> {
		self.tiers.values()
	}

	/// Returns true if a tier with this name exists.
	pub fn has_tier(&self, name: &str) -> bool {
		self.tiers.contains_key(name)
	}

	/// Adds a tier, replacing any existing tier with the same name.
	pub fn put_tier(&mut self, tier: Tier) -> Option<Tier> {
		self.tiers.insert(tier.name().to_owned(), tier)
	}

	/// Removes a tier.
	pub fn remove_tier(&mut self, name: &str) -> Option<Tier> {
		self.tiers.shift_remove(name)
	}

	/// Renames a tier in place, keeping its position. Returns false when
	/// `old` is absent.
	pub(crate) fn rename_tier(&mut self, old: &str, new: &str) -> bool {
		let Some((index, _, mut tier)) = self.tiers.shift_remove_full(old) else {
			return false;
		};
		tier.set_name(new);
		self.tiers.shift_insert(index, new.to_owned(), tier);
		true
	}

	/// Copy of this record under a fresh id.
	pub fn duplicate(&self) -> Self {
		Self {
			id: ElementId::new(),
			..self.clone()
		}
	}

	/// Text of the named tier, empty when absent.
	pub fn tier_text(&self, name: &str) -> String {
		self.tier(name).map(Tier::text).unwrap_or_default()
	}

	fn system_value(&self, tier: SystemTier) -> Option<&TierValue> {
		self.tier(tier.name()).and_then(Tier::value)
	}

	/// Orthography value, if valid.
	pub fn orthography(&self) -> Option<&Orthography> {
		match self.system_value(SystemTier::Orthography) {
			Some(TierValue::Orthography(o)) => Some(o),
			_ => None,
		}
	}

	/// IPA Target value, if valid.
	pub fn ipa_target(&self) -> Option<&IpaTranscript> {
		self.system_value(SystemTier::IpaTarget)
			.and_then(TierValue::as_ipa)
	}

	/// IPA Actual value, if valid.
	pub fn ipa_actual(&self) -> Option<&IpaTranscript> {
		self.system_value(SystemTier::IpaActual)
			.and_then(TierValue::as_ipa)
	}

	/// Media segment, if valid.
	pub fn segment(&self) -> Option<MediaSegment> {
		match self.system_value(SystemTier::Segment) {
			Some(TierValue::Segment(s)) => Some(*s),
			_ => None,
		}
	}

	/// Phone alignment, if present.
	pub fn alignment(&self) -> Option<&PhoneAlignment> {
		match self.system_value(SystemTier::Alignment) {
			Some(TierValue::Alignment(a)) => Some(a),
			_ => None,
		}
	}

	/// Alignment computed from the current IPA Target and IPA Actual values.
	///
	/// Missing or invalid IPA tiers count as empty.
	pub fn compute_alignment(&self) -> PhoneAlignment {
		let empty = IpaTranscript::default();
		PhoneAlignment::from_transcripts(
			self.ipa_target().unwrap_or(&empty),
			self.ipa_actual().unwrap_or(&empty),
		)
	}
}
