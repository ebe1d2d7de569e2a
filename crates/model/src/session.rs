use std::collections::BTreeSet;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::ids::ElementId;
use crate::location::TranscriptElementLocation;
use crate::participant::{Participant, Speaker};
use crate::record::Record;
use crate::tier::{SystemTier, Tier, TierDescription, TierType, ipa_tier_for_syllables};
use crate::tier_view::{TierView, TierViewItem};
use crate::transcript::{Transcript, TranscriptElement};

/// The person entering tier values.
///
/// When a session has an active transcriber, edits to blind tiers are stored
/// per transcriber and non-blind tiers are read-only. Without one the editor
/// acts as the validator and edits the shared values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcriber {
	/// Login name, used as the blind value key.
	pub username: String,
	/// Display name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub real_name: Option<String>,
}

impl Transcriber {
	/// Creates a transcriber.
	pub fn new(username: impl Into<String>) -> Self {
		Self {
			username: username.into(),
			real_name: None,
		}
	}
}

/// State removed by [`Session::remove_user_tier`], sufficient to restore it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedTier {
	/// The removed declaration.
	pub description: TierDescription,
	/// Position it held in the tier view.
	pub view_index: usize,
	/// The tier view item.
	pub view_item: TierViewItem,
	/// Whether the tier was blind.
	pub blind: bool,
	/// Per-record tier values.
	pub tiers: Vec<(ElementId, Tier)>,
}

/// A transcription session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
	/// Corpus the session belongs to.
	pub corpus: String,
	/// Session name.
	pub name: String,
	/// Recording date.
	#[serde(default)]
	pub date: Option<NaiveDate>,
	/// Language codes.
	#[serde(default)]
	pub languages: Vec<String>,
	/// Media file reference.
	#[serde(default)]
	pub media: Option<String>,
	participants: Vec<Participant>,
	#[serde(default)]
	tier_descriptions: IndexMap<String, TierDescription>,
	tier_view: TierView,
	#[serde(default)]
	blind_tiers: BTreeSet<String>,
	#[serde(default)]
	transcriber: Option<Transcriber>,
	transcript: Transcript,
}

impl Default for Session {
	fn default() -> Self {
		Self::new("", "")
	}
}

impl Session {
	/// Creates an empty session with the default tier view.
	pub fn new(corpus: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			corpus: corpus.into(),
			name: name.into(),
			date: None,
			languages: Vec::new(),
			media: None,
			participants: Vec::new(),
			tier_descriptions: IndexMap::new(),
			tier_view: TierView::new(
				SystemTier::stored()
					.map(|t| TierViewItem::new(t.name()))
					.collect(),
			),
			blind_tiers: BTreeSet::new(),
			transcriber: None,
			transcript: Transcript::default(),
		}
	}

	/// Declared participants.
	pub fn participants(&self) -> &[Participant] {
		&self.participants
	}

	/// Participant by id.
	pub fn participant(&self, id: &str) -> Option<&Participant> {
		self.participants.iter().find(|p| p.id == id)
	}

	/// Adds a participant.
	pub fn add_participant(&mut self, participant: Participant) {
		self.participants.push(participant);
	}

	/// Creates a record carrying one empty tier per declared tier.
	pub fn new_record(&self, speaker: Speaker) -> Record {
		Record::new(speaker, self.declared_tiers())
	}

	/// Stored system tiers followed by user tiers, with their types.
	pub fn declared_tiers(&self) -> Vec<(String, TierType)> {
		SystemTier::stored()
			.map(|t| (t.name().to_owned(), t.tier_type()))
			.chain(
				self.tier_descriptions
					.values()
					.map(|d| (d.name.clone(), d.tier_type)),
			)
			.collect()
	}

	/// User tier declarations.
	pub fn user_tiers(&self) -> impl Iterator<Item = &TierDescription> {
		self.tier_descriptions.values()
	}

	/// Type of a declared or virtual tier.
	pub fn tier_type(&self, name: &str) -> Option<TierType> {
		if let Some(system) = SystemTier::from_name(name) {
			return Some(system.tier_type());
		}
		if let Some(desc) = self.tier_descriptions.get(name) {
			return Some(desc.tier_type);
		}
		let ipa = ipa_tier_for_syllables(name)?;
		(self.tier_type(&ipa)? == TierType::Ipa).then_some(TierType::Ipa)
	}

	/// Declares a user tier, adding it to the tier view and every record.
	pub fn add_user_tier(&mut self, description: TierDescription) -> Result<()> {
		if SystemTier::from_name(&description.name).is_some() {
			return Err(ModelError::SystemTier(description.name));
		}
		if self.tier_descriptions.contains_key(&description.name) {
			return Err(ModelError::DuplicateTier(description.name));
		}
		for i in 0..self.transcript.len() {
			if let Ok(record) = self.transcript.record_mut(i) {
				record.put_tier(Tier::new(description.name.clone(), description.tier_type));
			}
		}
		self.tier_view
			.push(TierViewItem::new(description.name.clone()));
		self.tier_descriptions
			.insert(description.name.clone(), description);
		Ok(())
	}

	/// Removes a user tier from the declarations, tier view and every record.
	pub fn remove_user_tier(&mut self, name: &str) -> Result<RemovedTier> {
		if SystemTier::from_name(name).is_some() {
			return Err(ModelError::SystemTier(name.to_owned()));
		}
		let description = self
			.tier_descriptions
			.shift_remove(name)
			.ok_or_else(|| ModelError::UnknownTier(name.to_owned()))?;
		let view_index = self.tier_view.index_of(name).unwrap_or(0);
		let view_item = self
			.tier_view
			.remove(name)
			.unwrap_or_else(|| TierViewItem::new(name));
		let blind = self.blind_tiers.remove(name);
		let mut tiers = Vec::new();
		for i in 0..self.transcript.len() {
			if let Ok(record) = self.transcript.record_mut(i)
				&& let Some(tier) = record.remove_tier(name)
			{
				tiers.push((record.id(), tier));
			}
		}
		Ok(RemovedTier {
			description,
			view_index,
			view_item,
			blind,
			tiers,
		})
	}

	/// Restores a tier removed with [`Self::remove_user_tier`].
	pub fn restore_user_tier(&mut self, removed: RemovedTier) {
		let name = removed.description.name.clone();
		self.tier_descriptions
			.insert(name.clone(), removed.description);
		let mut items = self.tier_view.items().to_vec();
		items.insert(removed.view_index.min(items.len()), removed.view_item);
		self.tier_view = TierView::new(items);
		if removed.blind {
			self.blind_tiers.insert(name);
		}
		for (id, tier) in removed.tiers {
			if let Some(index) = self.transcript.index_of(id)
				&& let Ok(record) = self.transcript.record_mut(index)
			{
				record.put_tier(tier);
			}
		}
	}

	/// Renames a user tier in its declaration, the tier view, the blind set
	/// and every record. Positions are kept.
	pub fn rename_user_tier(&mut self, old: &str, new: &str) -> Result<()> {
		for name in [old, new] {
			if SystemTier::from_name(name).is_some() {
				return Err(ModelError::SystemTier(name.to_owned()));
			}
		}
		if self.tier_type(new).is_some() {
			return Err(ModelError::DuplicateTier(new.to_owned()));
		}
		let (index, _, mut description) = self
			.tier_descriptions
			.shift_remove_full(old)
			.ok_or_else(|| ModelError::UnknownTier(old.to_owned()))?;
		description.name = new.to_owned();
		self.tier_descriptions
			.shift_insert(index, new.to_owned(), description);
		if let Some(item) = self.tier_view.get_mut(old) {
			item.tier_name = new.to_owned();
		}
		if self.blind_tiers.remove(old) {
			self.blind_tiers.insert(new.to_owned());
		}
		for i in 0..self.transcript.len() {
			if let Ok(record) = self.transcript.record_mut(i) {
				record.rename_tier(old, new);
			}
		}
		Ok(())
	}

	/// Current tier view.
	pub fn tier_view(&self) -> &TierView {
		&self.tier_view
	}

	/// Checks that `view` references every declared tier exactly once and nothing else.
	pub fn validate_tier_view(&self, view: &TierView) -> Result<()> {
		let declared = self.declared_tiers();
		let mut seen = BTreeSet::new();
		for item in view.items() {
			if !declared.iter().any(|(name, _)| *name == item.tier_name) {
				return Err(ModelError::TierView(format!(
					"'{}' is not declared",
					item.tier_name
				)));
			}
			if !seen.insert(item.tier_name.as_str()) {
				return Err(ModelError::TierView(format!(
					"'{}' listed twice",
					item.tier_name
				)));
			}
		}
		if let Some((missing, _)) = declared
			.iter()
			.find(|(name, _)| !seen.contains(name.as_str()))
		{
			return Err(ModelError::TierView(format!("'{missing}' missing")));
		}
		Ok(())
	}

	/// Replaces the tier view after validating it, returning the previous view.
	pub fn set_tier_view(&mut self, view: TierView) -> Result<TierView> {
		self.validate_tier_view(&view)?;
		Ok(std::mem::replace(&mut self.tier_view, view))
	}

	/// Blind tier names.
	pub fn blind_tiers(&self) -> &BTreeSet<String> {
		&self.blind_tiers
	}

	/// Returns true if `tier` is blind.
	pub fn is_blind(&self, tier: &str) -> bool {
		self.blind_tiers.contains(tier)
	}

	/// Marks or unmarks `tier` as blind, returning the previous state.
	pub fn set_blind(&mut self, tier: &str, blind: bool) -> bool {
		if blind {
			!self.blind_tiers.insert(tier.to_owned())
		} else {
			self.blind_tiers.remove(tier)
		}
	}

	/// Active transcriber, [`None`] when acting as validator.
	pub fn transcriber(&self) -> Option<&Transcriber> {
		self.transcriber.as_ref()
	}

	/// Sets the active transcriber.
	pub fn set_transcriber(&mut self, transcriber: Option<Transcriber>) -> Option<Transcriber> {
		std::mem::replace(&mut self.transcriber, transcriber)
	}

	/// Returns true when no transcriber is active.
	pub fn is_validator(&self) -> bool {
		self.transcriber.is_none()
	}

	/// The transcript.
	pub fn transcript(&self) -> &Transcript {
		&self.transcript
	}

	/// Mutable transcript.
	pub fn transcript_mut(&mut self) -> &mut Transcript {
		&mut self.transcript
	}

	/// Returns true if `loc` addresses an existing element and a tier it has.
	///
	/// Comments and gems expose a single pseudo tier named after their kind.
	pub fn is_valid_location(&self, loc: &TranscriptElementLocation) -> bool {
		match self.transcript.get(loc.element_index) {
			Some(TranscriptElement::Record(record)) => {
				record.has_tier(&loc.tier)
					|| ipa_tier_for_syllables(&loc.tier).is_some_and(|ipa| record.has_tier(&ipa))
			}
			Some(TranscriptElement::Comment(_)) => loc.tier == TranscriptElementLocation::COMMENT_TIER,
			Some(TranscriptElement::Gem(_)) => loc.tier == TranscriptElementLocation::GEM_TIER,
			None => false,
		}
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn new_record_has_declared_tiers() {
		let mut session = Session::new("corpus", "s1");
		session
			.add_user_tier(TierDescription::new("Morphology", TierType::Text))
			.unwrap();
		let record = session.new_record(Speaker::participant("CHI"));
		let names: Vec<&str> = record.tiers().map(Tier::name).collect();
		assert_eq!(
			names,
			["Orthography", "IPA Target", "IPA Actual", "Alignment", "Segment", "Notes", "Morphology"]
		);
	}

	#[test]
	fn default_tier_view_is_valid() {
		let session = Session::default();
		session.validate_tier_view(session.tier_view()).unwrap();
	}

	#[test]
	fn tier_view_must_reference_every_tier_once() {
		let mut session = Session::default();
		let mut items = session.tier_view().items().to_vec();
		items.pop();
		assert!(session.set_tier_view(TierView::new(items.clone())).is_err());
		items.push(TierViewItem::new("Orthography"));
		assert!(session.set_tier_view(TierView::new(items)).is_err());
	}

	#[test]
	fn user_tier_remove_and_restore() {
		let mut session = Session::default();
		session
			.add_user_tier(TierDescription::new("Morphology", TierType::Text))
			.unwrap();
		let mut record = session.new_record(Speaker::Unknown);
		record.tier_mut("Morphology").unwrap().set_text("n|dog");
		session.transcript_mut().push(TranscriptElement::Record(record));
		session.set_blind("Morphology", true);
		let before = session.clone();

		let removed = session.remove_user_tier("Morphology").unwrap();
		assert!(!session.transcript().record(0).unwrap().has_tier("Morphology"));
		assert!(session.tier_view().get("Morphology").is_none());

		session.restore_user_tier(removed);
		assert_eq!(session, before);
	}

	#[test]
	fn user_tier_rename_keeps_positions() {
		let mut session = Session::default();
		session
			.add_user_tier(TierDescription::new("Morphology", TierType::Text))
			.unwrap();
		session
			.add_user_tier(TierDescription::new("Gloss", TierType::Text))
			.unwrap();
		let mut record = session.new_record(Speaker::Unknown);
		record.tier_mut("Morphology").unwrap().set_text("n|dog");
		session.transcript_mut().push(TranscriptElement::Record(record));
		session.set_blind("Morphology", true);
		let view_index = session.tier_view().index_of("Morphology");

		session.rename_user_tier("Morphology", "Mor").unwrap();

		let record = session.transcript().record(0).unwrap();
		let names: Vec<&str> = record.tiers().map(Tier::name).collect();
		assert_eq!(names[6..], ["Mor", "Gloss"]);
		assert_eq!(record.tier_text("Mor"), "n|dog");
		assert!(!record.has_tier("Morphology"));
		assert_eq!(session.tier_view().index_of("Mor"), view_index);
		assert!(session.is_blind("Mor"));
		assert!(!session.is_blind("Morphology"));
		assert_eq!(session.user_tiers().next().map(|d| d.name.as_str()), Some("Mor"));
		session.validate_tier_view(session.tier_view()).unwrap();
	}

	#[test]
	fn user_tier_rename_rejects_taken_names() {
		let mut session = Session::default();
		session
			.add_user_tier(TierDescription::new("Morphology", TierType::Text))
			.unwrap();
		assert_eq!(
			session.rename_user_tier("Morphology", "Notes").unwrap_err(),
			ModelError::SystemTier("Notes".into())
		);
		session
			.add_user_tier(TierDescription::new("Dialect", TierType::Ipa))
			.unwrap();
		assert_eq!(
			session.rename_user_tier("Morphology", "Dialect Syllables").unwrap_err(),
			ModelError::DuplicateTier("Dialect Syllables".into())
		);
		assert_eq!(
			session.rename_user_tier("Morphology", "Dialect").unwrap_err(),
			ModelError::DuplicateTier("Dialect".into())
		);
		assert_eq!(
			session.rename_user_tier("Gloss", "Mor").unwrap_err(),
			ModelError::UnknownTier("Gloss".into())
		);
	}

	#[test]
	fn duplicated_record_gets_a_fresh_id() {
		let mut session = Session::default();
		let mut record = session.new_record(Speaker::participant("CHI"));
		record.tier_mut("Orthography").unwrap().set_text("hello");
		let copy = record.duplicate();
		assert_ne!(copy.id(), record.id());
		assert_eq!(copy.tier_text("Orthography"), "hello");
		assert_eq!(copy.speaker(), record.speaker());
	}

	#[test]
	fn system_tiers_cannot_be_redeclared() {
		let mut session = Session::default();
		let err = session
			.add_user_tier(TierDescription::new("Notes", TierType::Text))
			.unwrap_err();
		assert_eq!(err, ModelError::SystemTier("Notes".into()));
	}

	#[test]
	fn virtual_syllable_tier_types() {
		let session = Session::default();
		assert_eq!(session.tier_type("Target Syllables"), Some(TierType::Ipa));
		assert_eq!(session.tier_type("Notes Syllables"), None);
	}

	#[test]
	fn location_validity() {
		let mut session = Session::default();
		let record = session.new_record(Speaker::Unknown);
		session.transcript_mut().push(TranscriptElement::Record(record));
		assert!(session.is_valid_location(&TranscriptElementLocation::new(0, "Orthography", 0)));
		assert!(session.is_valid_location(&TranscriptElementLocation::new(0, "Actual Syllables", 0)));
		assert!(!session.is_valid_location(&TranscriptElementLocation::new(0, "Morphology", 0)));
		assert!(!session.is_valid_location(&TranscriptElementLocation::new(1, "Orthography", 0)));
	}

	#[test]
	fn json_round_trip_keeps_unvalidated_text() {
		let mut session = Session::new("corpus", "s1");
		session.date = chrono::NaiveDate::from_ymd_opt(2024, 3, 1);
		let mut record = session.new_record(Speaker::participant("CHI"));
		record.tier_mut("IPA Target").unwrap().set_text("hi ðɛr");
		record.tier_mut("IPA Actual").unwrap().set_text("h3");
		session.transcript_mut().push(TranscriptElement::Record(record));

		let json = serde_json::to_string(&session).unwrap();
		let back: Session = serde_json::from_str(&json).unwrap();
		assert_eq!(back, session);
		assert_eq!(back.transcript().record(0).unwrap().tier_text("IPA Actual"), "h3");
	}
}
