//! Which elements and tiers a search visits.

use std::collections::BTreeSet;

use tierline_model::{Session, Speaker, TierType, TranscriptElement};

/// Restricts records to a set of speakers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeakerFilter {
	/// Accepted participant ids.
	pub participants: BTreeSet<String>,
	/// Accept records without a speaker.
	pub include_unknown: bool,
}

impl SpeakerFilter {
	pub fn new(participants: impl IntoIterator<Item = impl Into<String>>) -> Self {
		Self {
			participants: participants.into_iter().map(Into::into).collect(),
			include_unknown: false,
		}
	}

	pub fn with_unknown(mut self, include_unknown: bool) -> Self {
		self.include_unknown = include_unknown;
		self
	}

	pub fn accepts(&self, speaker: &Speaker) -> bool {
		match speaker {
			Speaker::Unknown => self.include_unknown,
			Speaker::Participant(id) => self.participants.contains(id),
		}
	}
}

/// Search scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindFilter {
	/// Tiers to search, in result order. Empty means every visible tier in
	/// tier-view order.
	pub tiers: Vec<String>,
	/// Speaker restriction for records; [`None`] accepts all.
	pub speakers: Option<SpeakerFilter>,
	pub include_comments: bool,
	pub include_gems: bool,
}

impl Default for FindFilter {
	fn default() -> Self {
		Self {
			tiers: Vec::new(),
			speakers: None,
			include_comments: true,
			include_gems: true,
		}
	}
}

impl FindFilter {
	/// Tier names searched on records, in order.
	///
	/// Computed tiers are skipped when the list comes from the tier view.
	pub fn search_tiers(&self, session: &Session) -> Vec<String> {
		if !self.tiers.is_empty() {
			return self.tiers.clone();
		}
		session
			.tier_view()
			.visible_tiers()
			.filter(|t| session.tier_type(t) != Some(TierType::Alignment))
			.map(str::to_owned)
			.collect()
	}

	/// Returns true if `element` is searched at all.
	pub fn accepts(&self, element: &TranscriptElement) -> bool {
		match element {
			TranscriptElement::Record(record) => {
				!record.is_excluded_from_searches()
					&& self.speakers.as_ref().is_none_or(|f| f.accepts(record.speaker()))
			}
			TranscriptElement::Comment(_) => self.include_comments,
			TranscriptElement::Gem(_) => self.include_gems,
		}
	}
}
